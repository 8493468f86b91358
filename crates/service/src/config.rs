use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use common::prelude::{DEFAULT_EXPIRY_INTERVAL, DEFAULT_TOUCH_INTERVAL};
use url::Url;

/// Runtime settings for a registry service instance.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// External base URL clients are identified under. When unset, a URL is
    /// derived from the listen address.
    pub public_url: Option<Url>,

    /// Path of the sqlite database file. When unset the registry lives in
    /// memory and is lost on shutdown.
    pub sqlite_path: Option<PathBuf>,

    /// Minimum gap between persisted last-used timestamps for a client.
    pub touch_interval: Duration,

    /// How long a registration stays fresh after its last use.
    pub expiry_interval: Duration,

    /// Stdout log verbosity.
    pub log_level: tracing::Level,

    /// Directory for daily rotated log files. When unset, logs only go to
    /// stdout.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: ([0, 0, 0, 0], 3000).into(),
            public_url: None,
            sqlite_path: None,
            touch_interval: DEFAULT_TOUCH_INTERVAL,
            expiry_interval: DEFAULT_EXPIRY_INTERVAL,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
