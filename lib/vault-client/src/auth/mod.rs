mod ldap;
mod session_token;
mod token;

pub use ldap::LdapAuth;
pub use session_token::SessionToken;
pub use token::StaticTokenAuth;

use crate::VaultError;
use crate::client::Endpoint;
use async_trait::async_trait;

/// Trait for authentication methods
#[async_trait]
pub trait AuthMethod: Send + Sync {
    /// Obtain a session token. Called once per client; tokens are never renewed.
    async fn authenticate(&self, endpoint: &Endpoint) -> Result<SessionToken, VaultError>;

    /// Method name for logging
    fn name(&self) -> &'static str;
}
