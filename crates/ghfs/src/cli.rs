use std::path::PathBuf;

use clap::Parser;
use url::Url;

use ghfs::github::DEFAULT_API_URL;
use ghfs::Config;

/// Mount GitHub as a read-only filesystem: <mountpoint>/<user>/<repo>/<path>
#[derive(Parser, Debug, Clone)]
#[command(name = "ghfs", version, about)]
pub struct Args {
    /// Directory to mount the filesystem on
    pub mount_point: PathBuf,

    /// Personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// REST API base URL (GitHub Enterprise: https://<host>/api/v3)
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Allow other users to access the mount
    #[arg(long)]
    pub allow_other: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

impl Args {
    pub fn config(&self) -> Config {
        Config {
            mount_point: self.mount_point.clone(),
            token: self.token.clone().filter(|t| !t.is_empty()),
            api_url: self.api_url.clone(),
            allow_other: self.allow_other,
        }
    }
}
