use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use url::Url;

use service::{spawn_service, Config};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Address to bind the HTTP server to (default 0.0.0.0:3000)
    #[arg(long)]
    pub listen_addr: Option<SocketAddr>,

    /// External base URL client ids are minted under
    #[arg(long)]
    pub public_url: Option<Url>,

    /// Path of the sqlite database file (registry kept in memory if not set)
    #[arg(long)]
    pub sqlite_path: Option<PathBuf>,

    /// Minimum seconds between persisted last-used timestamps
    #[arg(long)]
    pub touch_interval_secs: Option<u64>,

    /// Seconds a registration stays fresh after its last use
    #[arg(long)]
    pub expiry_interval_secs: Option<u64>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log debug output
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("serve failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = Config::default();

        if let Some(listen_addr) = self.listen_addr {
            config.listen_addr = listen_addr;
        }
        if let Some(secs) = self.touch_interval_secs {
            config.touch_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.expiry_interval_secs {
            config.expiry_interval = Duration::from_secs(secs);
        }
        if self.debug {
            config.log_level = tracing::Level::DEBUG;
        }
        config.public_url = self.public_url.clone();
        config.sqlite_path = self.sqlite_path.clone();
        config.log_dir = self.log_dir.clone();

        spawn_service(&config).await;
        Ok("service ended".to_string())
    }
}
