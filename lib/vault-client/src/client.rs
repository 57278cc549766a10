use crate::auth::{AuthMethod, SessionToken, StaticTokenAuth};
use crate::error::VaultError;
use crate::models::{ErrorResponse, ListResponse, ReadResponse, SecretEntry, WriteRequest};
use crate::store::KvEngine;
use reqwest::{Method, RequestBuilder, Response, Url};
use std::fmt;
use std::sync::Arc;

pub const TOKEN_HEADER: &str = "X-Vault-Token";
pub const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// Base address plus namespace; every request to the server goes through here.
#[derive(Debug, Clone)]
pub struct Endpoint {
    http: reqwest::Client,
    base_url: String,
    namespace: Option<String>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, namespace: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            namespace: namespace.filter(|ns| !ns.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Full URL under `/v1/`. Each segment is percent-encoded on its own,
    /// and an empty last segment leaves a trailing `/`.
    pub fn url<I>(&self, segments: I) -> Result<Url, VaultError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| VaultError::InvalidAddress(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| VaultError::InvalidAddress(self.base_url.clone()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);

        Ok(url)
    }

    /// Unauthenticated request with the JSON content type and namespace header set
    pub fn request<I>(&self, method: Method, segments: I) -> Result<RequestBuilder, VaultError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut request = self
            .http
            .request(method, self.url(segments)?)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(ref namespace) = self.namespace {
            request = request.header(NAMESPACE_HEADER, namespace);
        }

        Ok(request)
    }

    /// Turn a non-2xx response into `RequestError`, otherwise return the raw body
    pub async fn check_status(response: Response) -> Result<Vec<u8>, VaultError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let errors = serde_json::from_str::<ErrorResponse>(&body)
                .unwrap_or_default()
                .errors;
            return Err(VaultError::RequestError {
                status: status.as_u16(),
                status_text: status.to_string(),
                errors,
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| VaultError::Transport(e.to_string()))
    }
}

pub struct VaultClientBuilder {
    base_url: Option<String>,
    namespace: Option<String>,
    token: Option<String>,
    auth_method: Option<Arc<dyn AuthMethod>>,
}

impl Default for VaultClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            namespace: None,
            token: None,
            auth_method: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Use a token directly; takes precedence over `auth_method`
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn auth_method(mut self, method: Arc<dyn AuthMethod>) -> Self {
        self.auth_method = Some(method);
        self
    }

    fn resolve_config(self) -> Result<ResolvedConfig, VaultError> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| VaultError::InvalidAddress("no address configured".to_string()))?;

        let auth_method: Arc<dyn AuthMethod> = match (self.token, self.auth_method) {
            (Some(token), _) => Arc::new(StaticTokenAuth::new(token)),
            (None, Some(method)) => method,
            (None, None) => {
                return Err(VaultError::AuthError(
                    "no token and no login method configured".to_string(),
                ));
            }
        };

        Ok(ResolvedConfig {
            base_url,
            namespace: self.namespace,
            auth_method,
        })
    }

    pub async fn build(self) -> Result<VaultClient, VaultError> {
        let config = self.resolve_config()?;
        let endpoint = Endpoint::new(config.base_url, config.namespace);

        let token = config.auth_method.authenticate(&endpoint).await?;
        tracing::info!(
            method = config.auth_method.name(),
            address = endpoint.base_url(),
            namespace = endpoint.namespace().unwrap_or(""),
            "Authenticated to Vault"
        );

        Ok(VaultClient { endpoint, token })
    }
}

struct ResolvedConfig {
    base_url: String,
    namespace: Option<String>,
    auth_method: Arc<dyn AuthMethod>,
}

#[derive(Debug, Clone)]
pub struct VaultClient {
    endpoint: Endpoint,
    token: SessionToken,
}

impl VaultClient {
    pub fn builder() -> VaultClientBuilder {
        VaultClientBuilder::new()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Handle on one KV v2 mount
    pub fn kv(&self, mount: impl Into<String>) -> KvEngine {
        KvEngine::new(self.clone(), mount)
    }

    fn authed(&self, method: Method, path: &KvPath<'_>) -> Result<RequestBuilder, VaultError> {
        tracing::debug!(method = %method, path = %path, "Vault request");
        Ok(self
            .endpoint
            .request(method, path.segments())?
            .header(TOKEN_HEADER, self.token.as_str()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, VaultError> {
        let response = request
            .send()
            .await
            .map_err(|e| VaultError::Transport(e.to_string()))?;
        Endpoint::check_status(response).await
    }

    /// Immediate children of `path`; folder names end with `/`
    pub async fn kv_list(&self, mount: &str, path: &str) -> Result<Vec<String>, VaultError> {
        let method = Method::from_bytes(b"LIST").map_err(|e| VaultError::Transport(e.to_string()))?;
        let api_path = KvPath::new(mount, "metadata", path);

        let body = self.send(self.authed(method, &api_path)?).await?;

        let resp: ListResponse = serde_json::from_slice(&body)
            .map_err(|e| VaultError::DecodeError(format!("list {}: {}", api_path, e)))?;

        Ok(resp.data.keys)
    }

    /// Current version of the secret at `path`
    pub async fn kv_read(&self, mount: &str, path: &str) -> Result<SecretEntry, VaultError> {
        let api_path = KvPath::new(mount, "data", path);

        let body = self.send(self.authed(Method::GET, &api_path)?).await?;

        let resp: ReadResponse = serde_json::from_slice(&body)
            .map_err(|e| VaultError::DecodeError(format!("read {}: {}", api_path, e)))?;

        Ok(resp.data.data)
    }

    /// Create a new version of the secret at `path` holding exactly `entry`.
    ///
    /// KV v2 replaces the whole payload; keys not in `entry` are gone afterwards.
    pub async fn kv_write(
        &self,
        mount: &str,
        path: &str,
        entry: &SecretEntry,
    ) -> Result<(), VaultError> {
        let api_path = KvPath::new(mount, "data", path);

        let request = self
            .authed(Method::POST, &api_path)?
            .json(&WriteRequest { data: entry });

        self.send(request).await?;
        Ok(())
    }
}

/// `{mount}/{kind}/{path}` split at `/`, so that each name becomes one URL segment
struct KvPath<'a> {
    mount: &'a str,
    kind: &'static str,
    path: &'a str,
}

impl<'a> KvPath<'a> {
    fn new(mount: &'a str, kind: &'static str, path: &'a str) -> Self {
        Self {
            mount: mount_prefix(mount),
            kind,
            path: path.trim_start_matches('/'),
        }
    }

    fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.mount
            .split('/')
            .chain(std::iter::once(self.kind))
            .chain(self.path.split('/'))
    }
}

impl fmt::Display for KvPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.mount, self.kind, self.path)
    }
}

fn mount_prefix(mount: &str) -> &str {
    mount.trim_matches('/')
}
