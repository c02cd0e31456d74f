//! Remote entities returned by the GitHub REST API
//!
//! Only the fields the filesystem projects are decoded; everything else in
//! the JSON payloads is ignored.

use serde::{Deserialize, Serialize};

/// A GitHub user or organization account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: Option<u64>,
}

/// Owner reference embedded in a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One entry of the contents API, either a file (with its payload) or a
/// directory listing item (without one)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Size of the decoded file in bytes
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub sha: Option<String>,
    /// Base64 payload, wrapped with newlines by GitHub
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl Content {
    /// The encoded payload, when the API shipped one inline as base64.
    ///
    /// Files above the inline size limit come back with `encoding: "none"`
    /// and an empty payload.
    pub fn base64_payload(&self) -> Option<&str> {
        match self.encoding.as_deref() {
            Some("base64") | None => self.content.as_deref(),
            Some(_) => None,
        }
    }
}

/// Result of a contents lookup: exactly one of a file or a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Dir(Vec<Content>),
    File(Content),
}
