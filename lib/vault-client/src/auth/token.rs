use super::{AuthMethod, SessionToken};
use crate::VaultError;
use crate::client::Endpoint;
use async_trait::async_trait;

/// Static token authentication
pub struct StaticTokenAuth {
    token: String,
}

impl StaticTokenAuth {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AuthMethod for StaticTokenAuth {
    async fn authenticate(&self, _endpoint: &Endpoint) -> Result<SessionToken, VaultError> {
        if self.token.is_empty() {
            return Err(VaultError::AuthError("empty token".to_string()));
        }
        Ok(SessionToken::new(self.token.clone()))
    }

    fn name(&self) -> &'static str {
        "token"
    }
}
