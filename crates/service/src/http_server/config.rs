use std::net::SocketAddr;

use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // Base URL client ids are minted under
    pub public_url: Url,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, public_url: Url, log_level: tracing::Level) -> Self {
        Self {
            listen_addr,
            public_url,
            log_level,
        }
    }
}
