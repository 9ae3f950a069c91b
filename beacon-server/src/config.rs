use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Username/password pair required from every client when set.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

/// Certificate pair and port for the optional secure listener.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub port: u16,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Live connections allowed before registration is refused.
    pub max_connections: usize,
    /// Depth of the hub's command queue.
    pub hub_capacity: usize,
    /// When false, a connection only enters its room after sending `join`.
    pub auto_join: bool,
    pub auth: Option<AuthConfig>,
    /// Serve `wss://` next to `ws://`. Plain HTTP keeps running if the
    /// certificates cannot be loaded.
    pub tls: Option<TlsConfig>,
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn tls_addr(&self) -> Option<SocketAddr> {
        self.tls
            .as_ref()
            .map(|tls| SocketAddr::new(self.host, tls.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            max_connections: 10_000,
            hub_capacity: 1024,
            auto_join: true,
            auth: None,
            tls: None,
            static_dir: None,
        }
    }
}
