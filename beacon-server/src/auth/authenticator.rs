use async_trait::async_trait;
use serde::Deserialize;

/// Credentials a client presents when opening its connection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Accepted,
    Rejected,
}

/// Pass/fail gate consulted before a connection is registered.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> AuthDecision;
}

/// Accepts everyone.
pub struct AllowAll;

#[async_trait]
impl Authenticator for AllowAll {
    async fn authenticate(&self, _credentials: &Credentials) -> AuthDecision {
        AuthDecision::Accepted
    }
}

/// Single username/password pair fixed at startup.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl Authenticator for StaticCredentials {
    async fn authenticate(&self, credentials: &Credentials) -> AuthDecision {
        let matches = credentials.username.as_deref() == Some(self.username.as_str())
            && credentials.password.as_deref() == Some(self.password.as_str());

        if matches {
            AuthDecision::Accepted
        } else {
            AuthDecision::Rejected
        }
    }
}
