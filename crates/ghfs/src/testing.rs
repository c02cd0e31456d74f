//! In-memory remote client for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::github::{
    ApiError, Content, ContentKind, Contents, Owner, RemoteClient, Repository, User,
};

/// Serves a fixed hierarchy and counts every remote call it receives.
#[derive(Debug, Default)]
pub(crate) struct FakeClient {
    users: HashMap<String, User>,
    repositories: HashMap<(String, String), Repository>,
    contents: HashMap<(String, String, String), Contents>,
    failing: bool,
    calls: AtomicUsize,
    last_path: Mutex<Option<String>>,
}

fn not_found() -> ApiError {
    ApiError::HttpStatus(StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#.to_string())
}

fn key(owner: &str, repo: &str, path: &str) -> (String, String, String) {
    (owner.to_string(), repo.to_string(), path.to_string())
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_user(mut self, login: &str) -> Self {
        let id = self.users.len() as u64 + 1;
        self.users.insert(
            login.to_string(),
            User {
                login: login.to_string(),
                id,
                name: None,
                public_repos: None,
            },
        );
        self
    }

    pub(crate) fn with_repository(mut self, owner: &str, name: &str) -> Self {
        self.repositories.insert(
            (owner.to_string(), name.to_string()),
            Repository {
                name: name.to_string(),
                full_name: format!("{}/{}", owner, name),
                owner: Owner {
                    login: owner.to_string(),
                },
                private: false,
                default_branch: Some("main".to_string()),
            },
        );
        self
    }

    pub(crate) fn with_file(
        mut self,
        owner: &str,
        repo: &str,
        path: &str,
        encoded: &str,
        size: u64,
    ) -> Self {
        let content = Content {
            encoding: Some("base64".to_string()),
            content: Some(encoded.to_string()),
            ..entry(path, ContentKind::File, size)
        };
        self.contents
            .insert(key(owner, repo, path), Contents::File(content));
        self
    }

    /// A file over the inline limit: metadata only, no payload
    pub(crate) fn with_unencoded_file(mut self, owner: &str, repo: &str, path: &str, size: u64) -> Self {
        let content = Content {
            encoding: Some("none".to_string()),
            content: Some(String::new()),
            ..entry(path, ContentKind::File, size)
        };
        self.contents
            .insert(key(owner, repo, path), Contents::File(content));
        self
    }

    pub(crate) fn with_dir(
        mut self,
        owner: &str,
        repo: &str,
        path: &str,
        children: &[(&str, ContentKind)],
    ) -> Self {
        let entries = children
            .iter()
            .map(|(name, kind)| {
                let child = if path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}/{}", path, name)
                };
                entry(&child, *kind, 0)
            })
            .collect();
        self.contents
            .insert(key(owner, repo, path), Contents::Dir(entries));
        self
    }

    /// Make every call fail as a network error would.
    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `owner/repo/path` of the last contents request
    pub(crate) fn last_path(&self) -> Option<String> {
        self.last_path.lock().clone()
    }

    fn record(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ApiError::HttpStatus(
                StatusCode::SERVICE_UNAVAILABLE,
                "connection reset".to_string(),
            ));
        }
        Ok(())
    }
}

fn entry(path: &str, kind: ContentKind, size: u64) -> Content {
    let name = path.rsplit('/').next().unwrap_or(path).to_string();
    Content {
        name,
        path: path.to_string(),
        kind,
        size,
        sha: None,
        content: None,
        encoding: None,
    }
}

#[async_trait]
impl RemoteClient for FakeClient {
    async fn get_user(&self, name: &str) -> Result<User, ApiError> {
        self.record()?;
        self.users.get(name).cloned().ok_or_else(not_found)
    }

    async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository, ApiError> {
        self.record()?;
        self.repositories
            .get(&(owner.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn get_contents(&self, owner: &str, repo: &str, path: &str) -> Result<Contents, ApiError> {
        self.record()?;
        *self.last_path.lock() = Some(format!("{}/{}/{}", owner, repo, path));
        self.contents
            .get(&key(owner, repo, path))
            .cloned()
            .ok_or_else(not_found)
    }
}
