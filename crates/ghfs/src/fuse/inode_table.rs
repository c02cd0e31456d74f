//! Inode ↔ node mapping for the FUSE binding
//!
//! FUSE uses 64-bit inode numbers to identify files and directories. Every
//! successful lookup builds a fresh node, so every lookup also gets a fresh
//! inode; entries go away once the kernel forgets them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::fs::Node;

#[derive(Debug)]
struct Entry {
    node: Arc<Node>,
    /// Outstanding kernel references from lookup replies
    lookups: u64,
}

/// Live nodes addressable by inode number
#[derive(Debug)]
pub struct InodeTable {
    nodes: HashMap<u64, Entry>,
    /// Next available inode number (starts at 2, as 1 is reserved for root)
    next_inode: u64,
}

impl InodeTable {
    /// Root inode number (always 1 in FUSE)
    pub const ROOT_INODE: u64 = 1;

    /// Create a new inode table with root pre-registered
    pub fn new(root: Node) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            Self::ROOT_INODE,
            Entry {
                node: Arc::new(root),
                lookups: 1,
            },
        );

        Self {
            nodes,
            next_inode: Self::ROOT_INODE + 1,
        }
    }

    /// Register a freshly resolved node and return its inode
    pub fn insert(&mut self, node: Node) -> u64 {
        let inode = self.next_inode;
        self.next_inode += 1;
        self.nodes.insert(
            inode,
            Entry {
                node: Arc::new(node),
                lookups: 1,
            },
        );
        inode
    }

    /// Get the node for an inode if it is still live
    pub fn get(&self, inode: u64) -> Option<Arc<Node>> {
        self.nodes.get(&inode).map(|entry| Arc::clone(&entry.node))
    }

    /// Drop `nlookup` kernel references. The node is released when none
    /// remain; root is never released.
    pub fn forget(&mut self, inode: u64, nlookup: u64) -> bool {
        if inode == Self::ROOT_INODE {
            return false;
        }

        let Some(entry) = self.nodes.get_mut(&inode) else {
            return false;
        };
        entry.lookups = entry.lookups.saturating_sub(nlookup);
        if entry.lookups == 0 {
            self.nodes.remove(&inode);
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
