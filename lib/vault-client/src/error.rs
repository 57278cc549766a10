use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Invalid Vault address: {0}")]
    InvalidAddress(String),

    /// The store answered with a non-2xx status.
    #[error("Vault request failed: {status_text}{}", format_errors(.errors))]
    RequestError {
        status: u16,
        status_text: String,
        errors: Vec<String>,
    },

    /// The response body did not have the expected envelope shape.
    #[error("Unexpected Vault response: {0}")]
    DecodeError(String),

    #[error("Vault transport error: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),
}

impl VaultError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn format_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(" ({})", errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display_with_vault_errors() {
        let err = VaultError::RequestError {
            status: 403,
            status_text: "403 Forbidden".to_string(),
            errors: vec!["permission denied".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Vault request failed: 403 Forbidden (permission denied)"
        );
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_request_error_display_without_vault_errors() {
        let err = VaultError::RequestError {
            status: 502,
            status_text: "502 Bad Gateway".to_string(),
            errors: vec![],
        };
        assert_eq!(err.to_string(), "Vault request failed: 502 Bad Gateway");
    }
}
