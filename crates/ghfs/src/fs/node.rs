//! Filesystem nodes and their capabilities
//!
//! Each level of the mount is one [`Node`] variant:
//!
//! ```text
//! /                     Root        lookup → user
//! /<user>               User        lookup → repository
//! /<user>/<repo>        Repository  lookup → file | dir, readdir
//! /<user>/<repo>/<dir>  Dir         lookup → file | dir, readdir
//! /<user>/<repo>/<file> File        open
//! ```
//!
//! Capabilities are separate traits. A variant implements only those it
//! supports and the kernel binding asks for them through `Node::as_*`.
//! Lookups hit the remote API exactly once and always build a fresh node;
//! nothing is cached between lookups.

use std::sync::Arc;

use async_trait::async_trait;

use super::attr::{NodeAttr, NodeKind};
use super::error::{collapse, NodeError};
use super::handle::FileHandle;
use crate::github::{Content, ContentKind, Contents, RemoteClient, Repository, User};

/// Names with this prefix never resolve, at any level.
const HIDDEN_PREFIX: char = '.';

pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_PREFIX)
}

fn reject_hidden(name: &str) -> Result<(), NodeError> {
    if is_hidden(name) {
        tracing::trace!(name, "hidden name rejected");
        return Err(NodeError::NotFound);
    }
    Ok(())
}

/// One directory listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

impl From<&Content> for DirEntry {
    fn from(content: &Content) -> Self {
        let kind = match content.kind {
            ContentKind::Dir => NodeKind::Directory,
            _ => NodeKind::RegularFile,
        };
        Self {
            name: content.name.clone(),
            kind,
        }
    }
}

pub trait Attributes {
    fn attributes(&self) -> NodeAttr;
}

#[async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<Node, NodeError>;
}

#[async_trait]
pub trait ReadDirectory: Send + Sync {
    async fn read_directory(&self) -> Result<Vec<DirEntry>, NodeError>;
}

pub trait Open {
    fn open(&self) -> Result<FileHandle, NodeError>;
}

#[derive(Debug)]
pub enum Node {
    Root(RootNode),
    User(UserNode),
    Repository(RepositoryNode),
    File(FileNode),
    Dir(DirNode),
}

impl Node {
    pub fn as_lookup(&self) -> Option<&dyn Lookup> {
        match self {
            Node::Root(node) => Some(node),
            Node::User(node) => Some(node),
            Node::Repository(node) => Some(node),
            Node::Dir(node) => Some(node),
            Node::File(_) => None,
        }
    }

    pub fn as_read_directory(&self) -> Option<&dyn ReadDirectory> {
        match self {
            Node::Repository(node) => Some(node),
            Node::Dir(node) => Some(node),
            Node::Root(_) | Node::User(_) | Node::File(_) => None,
        }
    }

    pub fn as_open(&self) -> Option<&dyn Open> {
        match self {
            Node::File(node) => Some(node),
            _ => None,
        }
    }
}

impl Attributes for Node {
    fn attributes(&self) -> NodeAttr {
        match self {
            Node::Root(node) => node.attributes(),
            Node::User(node) => node.attributes(),
            Node::Repository(node) => node.attributes(),
            Node::File(node) => node.attributes(),
            Node::Dir(node) => node.attributes(),
        }
    }
}

/// Build the node for a contents lookup result.
fn content_node(
    client: &Arc<dyn RemoteClient>,
    owner: &str,
    repo: &str,
    path: &str,
    contents: Contents,
) -> Node {
    match contents {
        Contents::File(content) => Node::File(FileNode { content }),
        Contents::Dir(entries) => Node::Dir(DirNode {
            client: Arc::clone(client),
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: path.to_string(),
            entries,
        }),
    }
}

// ==================== Root ====================

/// Mount root; children are user logins
pub struct RootNode {
    client: Arc<dyn RemoteClient>,
}

impl RootNode {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }
}

impl Attributes for RootNode {
    fn attributes(&self) -> NodeAttr {
        NodeAttr::directory()
    }
}

#[async_trait]
impl Lookup for RootNode {
    async fn lookup(&self, name: &str) -> Result<Node, NodeError> {
        reject_hidden(name)?;

        let user = self
            .client
            .get_user(name)
            .await
            .map_err(|e| collapse("get_user", name, e))?;

        Ok(Node::User(UserNode {
            client: Arc::clone(&self.client),
            user,
        }))
    }
}

// ==================== User ====================

/// A user or organization; children are its repositories
pub struct UserNode {
    client: Arc<dyn RemoteClient>,
    user: User,
}

impl UserNode {
    pub fn user(&self) -> &User {
        &self.user
    }
}

impl Attributes for UserNode {
    fn attributes(&self) -> NodeAttr {
        NodeAttr::directory()
    }
}

#[async_trait]
impl Lookup for UserNode {
    async fn lookup(&self, name: &str) -> Result<Node, NodeError> {
        reject_hidden(name)?;

        let repository = self
            .client
            .get_repository(&self.user.login, name)
            .await
            .map_err(|e| collapse("get_repository", name, e))?;

        Ok(Node::Repository(RepositoryNode {
            client: Arc::clone(&self.client),
            repository,
        }))
    }
}

// ==================== Repository ====================

/// Repository root; children are its top-level files and directories
pub struct RepositoryNode {
    client: Arc<dyn RemoteClient>,
    repository: Repository,
}

impl RepositoryNode {
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    fn owner(&self) -> &str {
        &self.repository.owner.login
    }
}

impl Attributes for RepositoryNode {
    fn attributes(&self) -> NodeAttr {
        NodeAttr::directory()
    }
}

#[async_trait]
impl Lookup for RepositoryNode {
    async fn lookup(&self, name: &str) -> Result<Node, NodeError> {
        reject_hidden(name)?;

        let contents = self
            .client
            .get_contents(self.owner(), &self.repository.name, name)
            .await
            .map_err(|e| collapse("get_contents", name, e))?;

        Ok(content_node(
            &self.client,
            self.owner(),
            &self.repository.name,
            name,
            contents,
        ))
    }
}

#[async_trait]
impl ReadDirectory for RepositoryNode {
    async fn read_directory(&self) -> Result<Vec<DirEntry>, NodeError> {
        let contents = self
            .client
            .get_contents(self.owner(), &self.repository.name, "")
            .await
            .map_err(|e| collapse("get_contents", &self.repository.full_name, e))?;

        match contents {
            Contents::Dir(entries) => Ok(entries.iter().map(DirEntry::from).collect()),
            Contents::File(_) => {
                tracing::debug!(
                    repository = %self.repository.full_name,
                    "repository root resolved to a file"
                );
                Err(NodeError::NotFound)
            }
        }
    }
}

// ==================== File ====================

/// A file whose full encoded payload was fetched by the lookup
#[derive(Debug)]
pub struct FileNode {
    content: Content,
}

impl FileNode {
    pub fn content(&self) -> &Content {
        &self.content
    }
}

impl Attributes for FileNode {
    fn attributes(&self) -> NodeAttr {
        NodeAttr::file(self.content.size)
    }
}

impl Open for FileNode {
    fn open(&self) -> Result<FileHandle, NodeError> {
        match self.content.base64_payload() {
            Some(payload) => Ok(FileHandle::new(payload)),
            None => {
                tracing::debug!(
                    path = %self.content.path,
                    encoding = ?self.content.encoding,
                    "no inline base64 payload"
                );
                Err(NodeError::NotFound)
            }
        }
    }
}

// ==================== Dir ====================

/// A directory inside a repository, holding the listing its lookup fetched
pub struct DirNode {
    client: Arc<dyn RemoteClient>,
    owner: String,
    repo: String,
    /// Path of this directory relative to the repository root
    path: String,
    entries: Vec<Content>,
}

impl DirNode {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entries(&self) -> &[Content] {
        &self.entries
    }
}

impl Attributes for DirNode {
    fn attributes(&self) -> NodeAttr {
        NodeAttr::directory()
    }
}

#[async_trait]
impl Lookup for DirNode {
    async fn lookup(&self, name: &str) -> Result<Node, NodeError> {
        reject_hidden(name)?;

        let path = format!("{}/{}", self.path, name);
        let contents = self
            .client
            .get_contents(&self.owner, &self.repo, &path)
            .await
            .map_err(|e| collapse("get_contents", &path, e))?;

        Ok(content_node(
            &self.client,
            &self.owner,
            &self.repo,
            &path,
            contents,
        ))
    }
}

#[async_trait]
impl ReadDirectory for DirNode {
    async fn read_directory(&self) -> Result<Vec<DirEntry>, NodeError> {
        Ok(self.entries.iter().map(DirEntry::from).collect())
    }
}

// The client is an opaque capability; show where the node points instead.
impl std::fmt::Debug for RootNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootNode").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for UserNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserNode")
            .field("login", &self.user.login)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for RepositoryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryNode")
            .field("full_name", &self.repository.full_name)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for DirNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirNode")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeClient;

    fn octocat_fake() -> FakeClient {
        FakeClient::new()
                .with_user("octocat")
                .with_repository("octocat", "Hello-World")
                .with_dir(
                    "octocat",
                    "Hello-World",
                    "",
                    &[
                        ("README.md", ContentKind::File),
                        ("src", ContentKind::Dir),
                        ("LICENSE", ContentKind::File),
                    ],
                )
                .with_file("octocat", "Hello-World", "README.md", "aGVsbG8=", 5)
                .with_dir(
                    "octocat",
                    "Hello-World",
                    "src",
                    &[("main.rs", ContentKind::File), ("bin", ContentKind::Dir)],
                )
            .with_file("octocat", "Hello-World", "src/main.rs", "Zm4gbWFpbigpIHt9\n", 12)
    }

    fn octocat() -> Arc<FakeClient> {
        Arc::new(octocat_fake())
    }

    fn root(client: &Arc<FakeClient>) -> RootNode {
        RootNode::new(client.clone() as Arc<dyn RemoteClient>)
    }

    async fn resolve(client: &Arc<FakeClient>, path: &[&str]) -> Result<Node, NodeError> {
        let mut node = Node::Root(root(client));
        for name in path {
            let lookup = node.as_lookup().ok_or(NodeError::NotFound)?;
            node = lookup.lookup(name).await?;
        }
        Ok(node)
    }

    fn read_all(handle: &mut FileHandle) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let bytes = handle.read(4).unwrap();
            if bytes.is_empty() {
                return out;
            }
            out.extend_from_slice(&bytes);
        }
    }

    #[tokio::test]
    async fn test_root_lookup_user() {
        let client = octocat();
        let node = root(&client).lookup("octocat").await.unwrap();

        let Node::User(user) = &node else {
            panic!("expected a user node, got {node:?}");
        };
        assert_eq!(user.user().login, "octocat");
        assert!(node.attributes().is_dir());
        assert_eq!(node.attributes().size, 0);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_user_lookup_repository_and_listing() {
        let client = octocat();
        let node = resolve(&client, &["octocat", "Hello-World"]).await.unwrap();

        assert!(matches!(node, Node::Repository(_)));
        assert!(node.attributes().is_dir());

        let entries = node
            .as_read_directory()
            .unwrap()
            .read_directory()
            .await
            .unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "src", "LICENSE"]);
        assert_eq!(entries[1].kind, NodeKind::Directory);
        assert_eq!(entries[0].kind, NodeKind::RegularFile);
    }

    #[tokio::test]
    async fn test_repository_lookup_file_and_read() {
        let client = octocat();
        let node = resolve(&client, &["octocat", "Hello-World", "README.md"])
            .await
            .unwrap();

        let attr = node.attributes();
        assert!(!attr.is_dir());
        assert_eq!(attr.size, 5);
        assert!(node.as_lookup().is_none());
        assert!(node.as_read_directory().is_none());

        let mut handle = node.as_open().unwrap().open().unwrap();
        assert_eq!(handle.read(10).unwrap(), b"hello");
        assert!(handle.read(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_length_matches_reported_size() {
        let client = octocat();
        let node = resolve(&client, &["octocat", "Hello-World", "src", "main.rs"])
            .await
            .unwrap();

        let mut handle = node.as_open().unwrap().open().unwrap();
        let bytes = read_all(&mut handle);
        assert_eq!(bytes, b"fn main() {}");
        assert_eq!(bytes.len() as u64, node.attributes().size);
    }

    #[tokio::test]
    async fn test_each_open_decodes_from_start() {
        let client = octocat();
        let node = resolve(&client, &["octocat", "Hello-World", "README.md"])
            .await
            .unwrap();
        let opener = node.as_open().unwrap();

        let mut first = opener.open().unwrap();
        assert_eq!(first.read(2).unwrap(), b"he");
        let mut second = opener.open().unwrap();
        assert_eq!(second.read(10).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_hidden_names_never_reach_remote() {
        let client = octocat();
        let dir = resolve(&client, &["octocat", "Hello-World", "src"])
            .await
            .unwrap();
        let before = client.calls();

        for name in [".git", ".", "..", ".hidden"] {
            let root_node = Node::Root(root(&client));
            assert!(matches!(
                root_node.as_lookup().unwrap().lookup(name).await,
                Err(NodeError::NotFound)
            ));
            assert!(matches!(
                dir.as_lookup().unwrap().lookup(name).await,
                Err(NodeError::NotFound)
            ));
        }

        let user = resolve(&client, &["octocat"]).await.unwrap();
        let repository = resolve(&client, &["octocat", "Hello-World"]).await.unwrap();
        let before_hidden = client.calls();
        assert!(user.as_lookup().unwrap().lookup(".github").await.is_err());
        assert!(repository
            .as_lookup()
            .unwrap()
            .lookup(".gitignore")
            .await
            .is_err());

        assert_eq!(client.calls(), before_hidden);
        assert_eq!(before_hidden, before + 3);
    }

    #[tokio::test]
    async fn test_remote_errors_become_not_found() {
        let client = octocat();

        assert!(matches!(
            resolve(&client, &["nobody"]).await,
            Err(NodeError::NotFound)
        ));
        assert!(matches!(
            resolve(&client, &["octocat", "missing"]).await,
            Err(NodeError::NotFound)
        ));
        assert!(matches!(
            resolve(&client, &["octocat", "Hello-World", "missing.txt"]).await,
            Err(NodeError::NotFound)
        ));
        assert!(matches!(
            resolve(&client, &["octocat", "Hello-World", "src", "missing.rs"]).await,
            Err(NodeError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_failing_remote_becomes_not_found() {
        let client = Arc::new(octocat_fake().failing());
        assert!(matches!(
            resolve(&client, &["octocat"]).await,
            Err(NodeError::NotFound)
        ));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_repository_listing_error_is_not_found() {
        let client = Arc::new(
            FakeClient::new()
                .with_user("octocat")
                .with_repository("octocat", "empty"),
        );
        let node = resolve(&client, &["octocat", "empty"]).await.unwrap();
        let result = node.as_read_directory().unwrap().read_directory().await;
        assert!(matches!(result, Err(NodeError::NotFound)));
    }

    #[tokio::test]
    async fn test_lookups_are_not_cached() {
        let client = octocat();
        let first = resolve(&client, &["octocat", "Hello-World", "README.md"])
            .await
            .unwrap();
        let calls = client.calls();
        let second = resolve(&client, &["octocat", "Hello-World", "README.md"])
            .await
            .unwrap();

        assert_eq!(client.calls(), calls * 2);
        assert_eq!(first.attributes(), second.attributes());
    }

    #[tokio::test]
    async fn test_dir_node_lists_fetched_entries_and_resolves_children() {
        let client = octocat();
        let node = resolve(&client, &["octocat", "Hello-World", "src"])
            .await
            .unwrap();

        let Node::Dir(dir) = &node else {
            panic!("expected a dir node, got {node:?}");
        };
        assert_eq!(dir.path(), "src");
        assert!(node.attributes().is_dir());

        let calls = client.calls();
        let entries = node
            .as_read_directory()
            .unwrap()
            .read_directory()
            .await
            .unwrap();
        assert_eq!(client.calls(), calls);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["main.rs", "bin"]);

        let child = node.as_lookup().unwrap().lookup("main.rs").await.unwrap();
        assert_eq!(child.attributes().size, 12);
        assert_eq!(client.calls(), calls + 1);
        assert_eq!(
            client.last_path().as_deref(),
            Some("octocat/Hello-World/src/main.rs")
        );
    }

    #[tokio::test]
    async fn test_open_without_inline_payload() {
        let client = Arc::new(
            FakeClient::new()
                .with_user("octocat")
                .with_repository("octocat", "big")
                .with_unencoded_file("octocat", "big", "huge.bin", 5_000_000),
        );
        let node = resolve(&client, &["octocat", "big", "huge.bin"]).await.unwrap();
        assert_eq!(node.attributes().size, 5_000_000);
        assert!(matches!(
            node.as_open().unwrap().open(),
            Err(NodeError::NotFound)
        ));
    }
}
