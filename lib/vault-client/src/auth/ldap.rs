use super::{AuthMethod, SessionToken};
use crate::VaultError;
use crate::client::Endpoint;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// LDAP username/password authentication
pub struct LdapAuth {
    pub username: String,
    password: String,
}

impl LdapAuth {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: AuthData,
}

#[derive(Deserialize)]
struct AuthData {
    client_token: String,
}

#[async_trait]
impl AuthMethod for LdapAuth {
    async fn authenticate(&self, endpoint: &Endpoint) -> Result<SessionToken, VaultError> {
        if self.username.is_empty() {
            return Err(VaultError::AuthError("username is required".to_string()));
        }

        let response = endpoint
            .request(
                reqwest::Method::POST,
                ["auth", "ldap", "login", self.username.as_str()],
            )?
            .json(&LoginRequest {
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| VaultError::Transport(e.to_string()))?;

        let body = Endpoint::check_status(response).await?;

        let login: LoginResponse = serde_json::from_slice(&body)
            .map_err(|e| VaultError::DecodeError(format!("ldap login: {}", e)))?;

        tracing::debug!(username = %self.username, "LDAP login succeeded");

        Ok(SessionToken::new(login.auth.client_token))
    }

    fn name(&self) -> &'static str {
        "ldap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_body() {
        let body = serde_json::to_value(LoginRequest { password: "pw" }).unwrap();
        assert_eq!(body, serde_json::json!({"password": "pw"}));
    }

    #[tokio::test]
    async fn test_empty_username_rejected_before_request() {
        let endpoint = Endpoint::new("http://127.0.0.1:1", None);
        let auth = LdapAuth::new(String::new(), "pw".to_string());
        let result = auth.authenticate(&endpoint).await;
        assert!(matches!(result, Err(VaultError::AuthError(_))));
    }
}
