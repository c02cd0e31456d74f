pub mod config;
pub mod fs;
#[cfg(feature = "fuse")]
pub mod fuse;
pub mod github;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use fs::GhFilesystem;
pub use github::{GithubClient, RemoteClient};
