//! `fuser::Filesystem` implementation over [`GhFilesystem`] nodes

use std::ffi::{OsStr, OsString};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use fuser::{
    FileAttr, FileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEmpty, ReplyEntry,
    ReplyOpen, Request,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;

use super::error::FuseError;
use super::handle_table::{HandleTable, OpenHandle};
use super::inode_table::InodeTable;
use crate::fs::{Attributes, DirEntry, GhFilesystem, Node, NodeAttr, NodeKind};

/// How long the kernel may keep entries and attributes
const TTL: Duration = Duration::from_secs(1);

// Kernel ABI open flags (fuse_kernel.h)
const FOPEN_DIRECT_IO: u32 = 1 << 0;
const FOPEN_NONSEEKABLE: u32 = 1 << 2;

const BLOCK_SIZE: u32 = 512;

/// Kernel-facing side of a mount
pub struct GhFuse {
    /// Handle on the main tokio runtime (multithreaded)
    runtime: Handle,

    inner: Arc<Inner>,
}

impl GhFuse {
    pub fn new(fs: GhFilesystem, runtime: Handle) -> Self {
        Self {
            runtime,
            inner: Arc::new(Inner::new(fs)),
        }
    }
}

struct Inner {
    inodes: Mutex<InodeTable>,
    handles: Mutex<HandleTable>,
    mounted_at: SystemTime,
    uid: u32,
    gid: u32,
}

impl Inner {
    fn new(fs: GhFilesystem) -> Self {
        Self {
            inodes: Mutex::new(InodeTable::new(fs.root())),
            handles: Mutex::new(HandleTable::default()),
            mounted_at: SystemTime::now(),
            // SAFETY: getuid/getgid cannot fail and touch no memory
            uid: unsafe { libc::getuid() },
            gid: unsafe { libc::getgid() },
        }
    }

    fn node(&self, ino: u64) -> Result<Arc<Node>, FuseError> {
        self.inodes
            .lock()
            .get(ino)
            .ok_or(FuseError::Errno(libc::ENOENT))
    }

    fn file_attr(&self, ino: u64, attr: NodeAttr) -> FileAttr {
        let (kind, nlink) = match attr.kind {
            NodeKind::Directory => (FileType::Directory, 2),
            NodeKind::RegularFile => (FileType::RegularFile, 1),
        };

        FileAttr {
            ino,
            size: attr.size,
            blocks: attr.size.div_ceil(BLOCK_SIZE as u64),
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            crtime: self.mounted_at,
            kind,
            perm: attr.perm,
            nlink,
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: BLOCK_SIZE,
            flags: 0,
        }
    }

    async fn lookup(&self, parent: u64, name: OsString) -> Result<FileAttr, FuseError> {
        let name = name.to_str().ok_or(FuseError::Utf8)?;
        let parent = self.node(parent)?;
        let resolver = parent
            .as_lookup()
            .ok_or(FuseError::Errno(libc::ENOTDIR))?;

        let child = resolver.lookup(name).await?;
        let attr = child.attributes();
        let ino = self.inodes.lock().insert(child);

        tracing::debug!(ino, name, "resolved");
        Ok(self.file_attr(ino, attr))
    }

    fn forget(&self, ino: u64, nlookup: u64) {
        if self.inodes.lock().forget(ino, nlookup) {
            tracing::trace!(ino, "released");
        }
    }

    fn getattr(&self, ino: u64) -> Result<FileAttr, FuseError> {
        let node = self.node(ino)?;
        Ok(self.file_attr(ino, node.attributes()))
    }

    fn open(&self, ino: u64) -> Result<u64, FuseError> {
        let node = self.node(ino)?;
        let opener = node.as_open().ok_or(FuseError::Errno(libc::EISDIR))?;
        let handle = opener.open()?;

        let fh = self
            .handles
            .lock()
            .add(ino, OpenHandle::File(Arc::new(Mutex::new(handle))));
        Ok(fh)
    }

    fn read(&self, ino: u64, fh: u64, offset: i64, size: u32) -> Result<Vec<u8>, FuseError> {
        let OpenHandle::File(handle) = self.handles.lock().get(fh, ino)? else {
            return Err(FuseError::Errno(libc::EISDIR));
        };

        let mut handle = handle.lock();
        if offset >= 0 && offset as u64 != handle.position() {
            tracing::debug!(
                ino,
                fh,
                offset,
                position = handle.position(),
                "ignoring offset on non-seekable handle"
            );
        }
        Ok(handle.read(size)?)
    }

    async fn opendir(&self, ino: u64) -> Result<u64, FuseError> {
        let node = self.node(ino)?;
        if !node.attributes().is_dir() {
            return Err(FuseError::Errno(libc::ENOTDIR));
        }

        // Root and user levels cannot be enumerated; they list as empty.
        let entries = match node.as_read_directory() {
            Some(lister) => lister.read_directory().await?,
            None => Vec::new(),
        };

        let fh = self
            .handles
            .lock()
            .add(ino, OpenHandle::Dir(Arc::new(entries)));
        Ok(fh)
    }

    fn readdir(
        &self,
        ino: u64,
        fh: u64,
        offset: i64,
        reply: &mut ReplyDirectory,
    ) -> Result<(), FuseError> {
        let OpenHandle::Dir(entries) = self.handles.lock().get(fh, ino)? else {
            return Err(FuseError::Errno(libc::ENOTDIR));
        };

        let dots = [(".", FileType::Directory), ("..", FileType::Directory)];
        let listing = dots.into_iter().chain(
            entries
                .iter()
                .map(|entry: &DirEntry| (entry.name.as_str(), file_type(entry.kind))),
        );

        // Children get their own inodes on lookup; the listing reports the
        // directory's inode as a placeholder.
        for (i, (name, kind)) in listing.enumerate().skip(offset.max(0) as usize) {
            if reply.add(ino, (i + 1) as i64, kind, name) {
                break;
            }
        }
        Ok(())
    }

    fn release(&self, fh: u64) {
        self.handles.lock().remove(fh);
    }
}

fn file_type(kind: NodeKind) -> FileType {
    match kind {
        NodeKind::Directory => FileType::Directory,
        NodeKind::RegularFile => FileType::RegularFile,
    }
}

// Code in this impl runs on the thread started by fuser. Requests that reach
// the remote API are moved onto the tokio runtime and reply from there, so a
// slow call only stalls the request that issued it. Everything else answers
// inline from in-memory state.
impl Filesystem for GhFuse {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let inner = Arc::clone(&self.inner);
        let name = name.to_owned();

        self.runtime.spawn(async move {
            match inner.lookup(parent, name).await {
                Err(err) => reply.error(err.log_and_convert()),
                Ok(attr) => reply.entry(&TTL, &attr, 0),
            }
        });
    }

    fn forget(&mut self, _req: &Request<'_>, ino: u64, nlookup: u64) {
        self.inner.forget(ino, nlookup);
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        match self.inner.getattr(ino) {
            Err(err) => reply.error(err.log_and_convert()),
            Ok(attr) => reply.attr(&TTL, &attr),
        }
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.inner.open(ino) {
            Err(err) => reply.error(err.log_and_convert()),
            Ok(fh) => reply.opened(fh, FOPEN_DIRECT_IO | FOPEN_NONSEEKABLE),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        match self.inner.read(ino, fh, offset, size) {
            Err(err) => reply.error(err.log_and_convert()),
            Ok(data) => reply.data(&data),
        }
    }

    fn release(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        self.inner.release(fh);
        reply.ok();
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        let inner = Arc::clone(&self.inner);

        self.runtime.spawn(async move {
            match inner.opendir(ino).await {
                Err(err) => reply.error(err.log_and_convert()),
                Ok(fh) => reply.opened(fh, 0),
            }
        });
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        match self.inner.readdir(ino, fh, offset, &mut reply) {
            Err(err) => reply.error(err.log_and_convert()),
            Ok(()) => reply.ok(),
        }
    }

    fn releasedir(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        _flags: i32,
        reply: ReplyEmpty,
    ) {
        self.inner.release(fh);
        reply.ok();
    }
}
