use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "shelf", version, about = "Manage extension repositories")]
pub struct Cli {
    /// Path to the configuration file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the repository list (overrides storage.path)
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Manage extension repositories
    Repo {
        #[clap(subcommand)]
        command: RepoCommands,
    },
    /// View or change configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum RepoCommands {
    /// Add a repository from the url of its index.min.json
    Add {
        /// e.g. https://example.com/repo/index.min.json
        url: String,
        /// Replace a stored repository signed with the same key
        #[clap(long)]
        replace: bool,
    },
    /// List added repositories
    List,
    /// Remove a repository
    Remove {
        /// Base url of the repository
        base_url: String,
    },
    /// Re-fetch every repository manifest
    Refresh,
    /// Print the number of added repositories
    Count,
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set { key: String, value: String },
    /// Get a configuration value
    Get { key: String },
    /// Show all configuration
    Show,
}
