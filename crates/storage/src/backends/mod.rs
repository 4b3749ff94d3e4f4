//! Backend implementations for the repository storage system.

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemRepoStorage;
pub use memory::MemoryRepoStorage;
