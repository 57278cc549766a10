pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod navigator;
pub mod prompt;
pub mod session;

pub use config::{SessionConfig, VaultProfile};
pub use error::AppError;
pub use format::OutputFormat;
pub use navigator::{filter_entries, NamespacePath, Navigator};
pub use prompt::{PromptError, Prompter};
pub use session::{Action, Session};
