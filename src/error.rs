use thiserror::Error;
use vault_client::VaultError;

use crate::config::ConfigError;
use crate::prompt::PromptError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No entries under '{path}' match '{query}'")]
    NoMatches { path: String, query: String },

    #[error("Navigation stopped at '{path}': deeper than {max} folders")]
    DepthExceeded { path: String, max: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to render secret: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// User cancelled an interactive prompt
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Prompt(PromptError::Aborted))
    }
}
