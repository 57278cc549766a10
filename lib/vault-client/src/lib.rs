//! vault-client - HTTP client for the KV v2 secrets engine of HashiCorp Vault
//!
//! Authentication is either a static token or an LDAP login, performed once
//! when the client is built. Tokens are not renewed.

pub mod auth;
mod client;
mod error;
mod models;
mod store;

pub use auth::{AuthMethod, LdapAuth, SessionToken, StaticTokenAuth};
pub use client::{Endpoint, NAMESPACE_HEADER, TOKEN_HEADER, VaultClient, VaultClientBuilder};
pub use error::VaultError;
pub use models::{SecretEntry, SecretValue};
pub use store::{KvEngine, KvStore};
