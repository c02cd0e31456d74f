//! FUSE filesystem integration for ghfs
//!
//! This module binds the node graph of [`crate::fs`] to the kernel through
//! fuser, allowing users to browse GitHub as local files.
//!
//! # Architecture
//!
//! - `GhFuse`: FUSE filesystem implementation using fuser
//! - `InodeTable`: Inode → live node mapping, released on forget
//! - `HandleTable`: Open file cursors and directory listing snapshots
//! - `mount`: Mount/unmount lifecycle for one session

mod error;
mod gh_fuse;
mod handle_table;
mod inode_table;
mod mount;

pub use gh_fuse::GhFuse;
pub use inode_table::InodeTable;
pub use mount::{mount, mount_options, MountError};
