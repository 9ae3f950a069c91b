use crate::config::TlsConfig;
use axum_server::tls_rustls::RustlsConfig;
use tracing::{info, warn};

/// Loads the PEM certificate and key for the secure listener.
///
/// Returns `None` on failure so the caller can carry on with plain HTTP only.
pub async fn load_tls(tls: &TlsConfig) -> Option<RustlsConfig> {
    match RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await {
        Ok(config) => {
            info!("Loaded TLS certificate from {}", tls.cert_path.display());
            Some(config)
        }
        Err(e) => {
            warn!(
                "Failed to load TLS certificates ({}, {}): {}",
                tls.cert_path.display(),
                tls.key_path.display(),
                e
            );
            warn!("HTTPS listener will not be started");
            None
        }
    }
}
