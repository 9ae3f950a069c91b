use anyhow::{Result, bail};
use beacon_server::{AuthConfig, ServerConfig, TlsConfig, serve};
use clap::Parser;
use colored::*;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(about = "WebRTC signaling relay: room presence and offer/answer/candidate forwarding")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Live connections accepted before new ones are refused
    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = 10_000)]
    max_connections: usize,

    /// Depth of the hub command queue
    #[arg(long, env = "HUB_CAPACITY", default_value_t = 1024)]
    hub_capacity: usize,

    /// Require clients to send `join` before they enter their room
    #[arg(long, env = "MANUAL_JOIN")]
    manual_join: bool,

    /// Require `username`/`password` query parameters on connect
    #[arg(long, env = "ENABLE_AUTH")]
    enable_auth: bool,

    #[arg(long, env = "AUTH_USERNAME", default_value = "webrtc")]
    auth_username: String,

    #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
    auth_password: Option<String>,

    /// Also serve wss:// with the certificate pair below
    #[arg(long, env = "ENABLE_HTTPS")]
    enable_https: bool,

    #[arg(long, env = "HTTPS_PORT", default_value_t = 8443)]
    https_port: u16,

    #[arg(long, env = "SSL_CERT_PATH", default_value = "certs/server.cert")]
    ssl_cert_path: PathBuf,

    #[arg(long, env = "SSL_KEY_PATH", default_value = "certs/server.key")]
    ssl_key_path: PathBuf,

    /// Directory served at `/`
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        let auth = if self.enable_auth {
            let Some(password) = self.auth_password else {
                bail!("--enable-auth needs --auth-password (or AUTH_PASSWORD)");
            };
            Some(AuthConfig {
                username: self.auth_username,
                password,
            })
        } else {
            None
        };

        let tls = self.enable_https.then(|| TlsConfig {
            port: self.https_port,
            cert_path: self.ssl_cert_path,
            key_path: self.ssl_key_path,
        });

        Ok(ServerConfig {
            host: self.host,
            port: self.port,
            max_connections: self.max_connections,
            hub_capacity: self.hub_capacity,
            auto_join: !self.manual_join,
            auth,
            tls,
            static_dir: self.static_dir,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config()?;

    println!("{}", "📡 Beacon signaling relay".green().bold());
    println!(
        "   {} ws://{}/ws  {}",
        "Connect:".cyan(),
        config.socket_addr(),
        "(or /ws/{room})".dimmed()
    );
    if let Some(addr) = config.tls_addr() {
        println!("   {} wss://{}/ws", "Secure:".cyan(), addr);
    }
    if let Some(auth) = &config.auth {
        println!("   {} enabled for user {}", "Auth:".cyan(), auth.username);
    }

    serve(config, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down signaling server...");
}
