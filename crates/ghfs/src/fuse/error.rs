//! Errors of the FUSE binding and their errno mapping

use libc::c_int;

use crate::fs::NodeError;

/// Intermediate error type to catch and convert to libc errno to
/// report errors to fuser.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FuseError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("invalid UTF-8 name")]
    Utf8,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("errno {0}")]
    Errno(c_int),
}

impl FuseError {
    /// Return a libc error code to represent this error, fuse-side.
    pub(crate) fn errno(&self) -> c_int {
        match self {
            FuseError::Node(NodeError::NotFound) => libc::ENOENT,
            // GitHub names are UTF-8; anything else cannot exist remotely
            FuseError::Utf8 => libc::ENOENT,
            FuseError::Io(_) => libc::EIO,
            FuseError::Errno(errno) => *errno,
        }
    }

    /// Convert into a libc error code.
    pub(crate) fn log_and_convert(self) -> c_int {
        let errno = self.errno();

        tracing::debug!("FUSE operation error: {self:?} -> {errno}");

        errno
    }
}
