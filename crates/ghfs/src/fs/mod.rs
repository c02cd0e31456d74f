//! Remote hierarchy projected as filesystem nodes
//!
//! This module is independent of the kernel transport. It resolves names
//! level by level against a [`RemoteClient`], projects attributes, and
//! streams file content.
//!
//! # Architecture
//!
//! - `GhFilesystem`: Binds the remote client and hands out the root node
//! - `Node`: Root, user, repository, file and directory variants
//! - `NodeAttr`: Type, permission and size projection
//! - `FileHandle`: Forward-only base64 decoding cursor for one open file

mod attr;
mod error;
mod handle;
mod node;

use std::sync::Arc;

use crate::github::RemoteClient;

pub use attr::{NodeAttr, NodeKind, NODE_PERM};
pub use error::NodeError;
pub use handle::FileHandle;
pub use node::{
    is_hidden, Attributes, DirEntry, DirNode, FileNode, Lookup, Node, Open, ReadDirectory,
    RepositoryNode, RootNode, UserNode,
};

/// Entry point of a mounted session
///
/// Created once before mounting and never mutated afterwards; the remote
/// client it holds is the only state shared between requests.
#[derive(Clone)]
pub struct GhFilesystem {
    client: Arc<dyn RemoteClient>,
}

impl GhFilesystem {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }

    pub fn root(&self) -> Node {
        Node::Root(RootNode::new(Arc::clone(&self.client)))
    }
}
