//! Remote API client for the GitHub REST endpoints the filesystem consumes
//!
//! The filesystem only ever needs three read-only lookups, captured by the
//! [`RemoteClient`] trait. [`GithubClient`] implements them over HTTP; tests
//! substitute an in-memory implementation.

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::{GithubClient, DEFAULT_API_URL};
pub use error::ApiError;
pub use types::{Content, ContentKind, Contents, Owner, Repository, User};

/// Read-only view of the remote hierarchy
///
/// Implementations are shared by every node of a mount and called
/// concurrently, hence `Send + Sync`.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn get_user(&self, name: &str) -> Result<User, ApiError>;

    async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository, ApiError>;

    /// Fetch a path inside a repository. An empty path addresses the
    /// repository root.
    async fn get_contents(&self, owner: &str, repo: &str, path: &str) -> Result<Contents, ApiError>;
}
