//! Mount lifecycle

use std::path::PathBuf;
use std::sync::Arc;

use fuser::MountOption;
use tokio::runtime::Handle;

use super::gh_fuse::GhFuse;
use crate::config::Config;
use crate::fs::GhFilesystem;
use crate::github::{ApiError, GithubClient};

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("mount point does not exist or is not a directory: {0}")]
    InvalidMountPoint(PathBuf),
    #[error("failed to build API client: {0}")]
    Client(#[from] ApiError),
    #[error("mount failed: {0}")]
    Mount(#[source] std::io::Error),
}

/// Options passed to the kernel for a read-only mount
pub fn mount_options(config: &Config) -> Vec<MountOption> {
    let mut options = vec![
        MountOption::RO,
        MountOption::NoDev,
        MountOption::NoSuid,
        MountOption::NoAtime,
        MountOption::FSName("ghfs".to_string()),
        MountOption::Subtype("ghfs".to_string()),
    ];
    if config.allow_other {
        options.push(MountOption::AllowOther);
        options.push(MountOption::AutoUnmount);
    }
    options
}

/// Mount and serve until the filesystem is unmounted.
///
/// Blocks the calling thread; remote calls run on `runtime`.
pub fn mount(config: &Config, runtime: Handle) -> Result<(), MountError> {
    if !config.mount_point.is_dir() {
        return Err(MountError::InvalidMountPoint(config.mount_point.clone()));
    }

    let client = GithubClient::new(&config.api_url, config.token.as_deref())?;
    let fs = GhFilesystem::new(Arc::new(client));
    let fuse = GhFuse::new(fs, runtime);

    tracing::info!(
        mount_point = %config.mount_point.display(),
        api_url = %config.api_url,
        authenticated = config.token.is_some(),
        "mounting"
    );
    fuser::mount2(fuse, &config.mount_point, &mount_options(config)).map_err(MountError::Mount)?;
    tracing::info!(mount_point = %config.mount_point.display(), "unmounted");

    Ok(())
}
