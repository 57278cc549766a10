use crate::client::VaultClient;
use crate::error::VaultError;
use crate::models::SecretEntry;
use async_trait::async_trait;

/// List/read/write contract of a KV v2 mount, relative to the mount root
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Immediate children of `path`; folders end with `/`. An empty vec is valid.
    async fn list(&self, path: &str) -> Result<Vec<String>, VaultError>;

    /// Current payload of the leaf at `path`
    async fn read(&self, path: &str) -> Result<SecretEntry, VaultError>;

    /// Replace the payload at `path` with `entry`
    async fn write(&self, path: &str, entry: &SecretEntry) -> Result<(), VaultError>;

    /// Mount name, for display
    fn mount(&self) -> &str;
}

/// `KvStore` backed by a `VaultClient` and a fixed mount
#[derive(Debug, Clone)]
pub struct KvEngine {
    client: VaultClient,
    mount: String,
}

impl KvEngine {
    pub fn new(client: VaultClient, mount: impl Into<String>) -> Self {
        Self {
            client,
            mount: mount.into(),
        }
    }
}

#[async_trait]
impl KvStore for KvEngine {
    async fn list(&self, path: &str) -> Result<Vec<String>, VaultError> {
        self.client.kv_list(&self.mount, path).await
    }

    async fn read(&self, path: &str) -> Result<SecretEntry, VaultError> {
        self.client.kv_read(&self.mount, path).await
    }

    async fn write(&self, path: &str, entry: &SecretEntry) -> Result<(), VaultError> {
        self.client.kv_write(&self.mount, path, entry).await
    }

    fn mount(&self) -> &str {
        &self.mount
    }
}
