use std::path::PathBuf;

use url::Url;

use crate::github::DEFAULT_API_URL;

/// Settings of one mounted session
#[derive(Clone)]
pub struct Config {
    /// Directory the filesystem is mounted on
    pub mount_point: PathBuf,
    /// Personal access token sent as a bearer credential
    pub token: Option<String>,
    /// Base URL of the REST API
    pub api_url: Url,
    /// Let users other than the mounting one access the mount
    pub allow_other: bool,
}

impl Config {
    pub fn new(mount_point: impl Into<PathBuf>) -> Self {
        Self {
            mount_point: mount_point.into(),
            token: None,
            // the constant is a well-formed absolute URL
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            allow_other: false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("mount_point", &self.mount_point)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url.as_str())
            .field("allow_other", &self.allow_other)
            .finish()
    }
}
