//! Open file and directory handles
//!
//! Handles are keyed by the `fh` number returned to the kernel and remember
//! the inode they were opened on.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::FuseError;
use crate::fs::{DirEntry, FileHandle};

#[derive(Clone)]
pub(crate) enum OpenHandle {
    /// Decoding cursor of an open file; one reader at a time
    File(Arc<Mutex<FileHandle>>),

    /// Listing snapshot taken at opendir
    Dir(Arc<Vec<DirEntry>>),
}

#[derive(Default)]
pub(crate) struct HandleTable {
    by_fh: BTreeMap<u64, (u64, OpenHandle)>,
}

impl HandleTable {
    pub(crate) fn add(&mut self, ino: u64, handle: OpenHandle) -> u64 {
        let fh = self
            .by_fh
            .last_key_value()
            .map(|(k, _)| *k + 1)
            .unwrap_or(1);
        self.by_fh.insert(fh, (ino, handle));
        fh
    }

    /// Get a handle, checking it belongs to `expected_inode`.
    pub(crate) fn get(&self, fh: u64, expected_inode: u64) -> Result<OpenHandle, FuseError> {
        match self.by_fh.get(&fh) {
            Some((ino, handle)) if *ino == expected_inode => Ok(handle.clone()),
            _ => Err(FuseError::Errno(libc::EBADF)),
        }
    }

    pub(crate) fn remove(&mut self, fh: u64) -> Option<OpenHandle> {
        self.by_fh.remove(&fh).map(|(_, handle)| handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_fh.len()
    }
}
