//! Attribute projection for filesystem nodes
//!
//! Every node answers `attributes()` from state it already holds; no remote
//! call is ever made here.

/// Permission bits shared by every node: rwxr-xr-x
pub const NODE_PERM: u16 = 0o755;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    RegularFile,
}

/// Type, permission and size of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAttr {
    pub kind: NodeKind,
    pub perm: u16,
    /// Decoded content length for files, always 0 for directories
    pub size: u64,
}

impl NodeAttr {
    pub fn directory() -> Self {
        Self {
            kind: NodeKind::Directory,
            perm: NODE_PERM,
            size: 0,
        }
    }

    pub fn file(size: u64) -> Self {
        Self {
            kind: NodeKind::RegularFile,
            perm: NODE_PERM,
            size,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}
