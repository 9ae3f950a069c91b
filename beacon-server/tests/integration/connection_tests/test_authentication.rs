use beacon_server::{Credentials, HubHandle, ServerConfig, SignalingError, StaticCredentials};
use std::sync::Arc;

use crate::utils::init_tracing;

#[tokio::test]
async fn test_authentication_gate() {
    init_tracing();

    let hub = HubHandle::spawn(
        &ServerConfig::default(),
        Arc::new(StaticCredentials::new("webrtc", "signaling")),
    );

    let good = Credentials {
        username: Some("webrtc".to_string()),
        password: Some("signaling".to_string()),
    };
    let bad = Credentials {
        username: Some("webrtc".to_string()),
        password: Some("guess".to_string()),
    };

    assert!(hub.authenticate(&good).await.is_ok());
    assert!(matches!(
        hub.authenticate(&bad).await,
        Err(SignalingError::AuthenticationFailed)
    ));
    assert!(matches!(
        hub.authenticate(&Credentials::default()).await,
        Err(SignalingError::AuthenticationFailed)
    ));
}
