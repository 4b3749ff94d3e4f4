pub mod config;
pub mod repo;

pub use config::handle_config_command;
pub use repo::handle_repo_command;
