//! Top-level action loop and the one-shot commands.
//!
//! A failed action is logged and the loop shows the action menu again.
//! Only aborting the menu prompt itself (or choosing "Quit") ends the loop.

use std::io::Write;

use vault_client::{KvStore, SecretEntry};

use crate::config::SessionConfig;
use crate::error::AppError;
use crate::format::{render, OutputFormat};
use crate::navigator::Navigator;
use crate::prompt::{PromptError, Prompter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListSecrets,
    AddSecret,
    UpdateSecret,
    Quit,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::ListSecrets,
        Action::AddSecret,
        Action::UpdateSecret,
        Action::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ListSecrets => "List Secrets",
            Self::AddSecret => "Add Secret",
            Self::UpdateSecret => "Update Secret",
            Self::Quit => "Quit",
        }
    }
}

pub struct Session<'a, S: ?Sized, P, W> {
    config: &'a SessionConfig,
    store: &'a S,
    prompter: P,
    out: W,
}

impl<'a, S, P, W> Session<'a, S, P, W>
where
    S: KvStore + ?Sized,
    P: Prompter,
    W: Write,
{
    pub fn new(config: &'a SessionConfig, store: &'a S, prompter: P, out: W) -> Self {
        Self {
            config,
            store,
            prompter,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run actions until the user quits or aborts the action menu
    pub async fn run(&mut self) -> Result<(), AppError> {
        let labels: Vec<String> = Action::ALL.iter().map(|a| a.label().to_string()).collect();

        loop {
            let action = match self.prompter.select("Select Action", &labels) {
                Ok(index) => Action::ALL.get(index).copied().unwrap_or(Action::Quit),
                Err(PromptError::Aborted) => {
                    tracing::info!("Action prompt aborted, exiting");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            if action == Action::Quit {
                return Ok(());
            }

            if let Err(err) = self.perform(action).await {
                report(action, &err);
            }
        }
    }

    pub async fn perform(&mut self, action: Action) -> Result<(), AppError> {
        match action {
            Action::ListSecrets => self.list_and_display().await,
            Action::AddSecret => self.add_secret().await,
            Action::UpdateSecret => self.update_secret().await,
            Action::Quit => Ok(()),
        }
    }

    /// Navigate to a leaf, read it and print it
    pub async fn list_and_display(&mut self) -> Result<(), AppError> {
        let (path, entry) = Navigator::new(self.store, &mut self.prompter)
            .with_max_depth(self.config.max_depth)
            .read_leaf()
            .await?;

        tracing::debug!(path = %path, fields = entry.len(), "Read secret");
        print_entry(&mut self.out, &entry, self.config.output_format)
    }

    /// Prompt for a path and one key/value pair, then write it
    pub async fn add_secret(&mut self) -> Result<(), AppError> {
        let path = self.prompter.input("Secret Path", None)?;
        let key = self.prompter.input("Secret Key", None)?;
        let value = self.prompter.input("Secret Value", None)?;

        write_secret(self.store, &path, &key, &value, &mut self.out).await
    }

    /// Pick an existing secret, then overwrite it with one key/value pair
    pub async fn update_secret(&mut self) -> Result<(), AppError> {
        let path = Navigator::new(self.store, &mut self.prompter)
            .with_max_depth(self.config.max_depth)
            .resolve_leaf()
            .await?;

        let key = self.prompter.input("Secret Key", None)?;
        let value = self.prompter.input("New Secret Value", None)?;

        write_secret(self.store, &path.as_api_path(), &key, &value, &mut self.out).await
    }
}

pub fn report(action: Action, err: &AppError) {
    tracing::error!(action = action.label(), error = %err, "Action failed");
}

/// Print the entries directly under `path`, one per line
pub async fn list_entries<S, W>(store: &S, path: &str, out: &mut W) -> Result<(), AppError>
where
    S: KvStore + ?Sized,
    W: Write,
{
    for entry in store.list(path).await? {
        writeln!(out, "{}", entry)?;
    }
    Ok(())
}

pub async fn read_secret<S, W>(
    store: &S,
    path: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError>
where
    S: KvStore + ?Sized,
    W: Write,
{
    validate_secret_path(path)?;
    let entry = store.read(path).await?;
    print_entry(out, &entry, format)
}

/// Replace the secret at `path` with the single pair `key: value`.
///
/// Any other keys stored at `path` are dropped by the store.
pub async fn write_secret<S, W>(
    store: &S,
    path: &str,
    key: &str,
    value: &str,
    out: &mut W,
) -> Result<(), AppError>
where
    S: KvStore + ?Sized,
    W: Write,
{
    validate_secret_path(path)?;
    if key.trim().is_empty() {
        return Err(AppError::InvalidInput("secret key must not be empty".to_string()));
    }

    store.write(path, &SecretEntry::single(key, value)).await?;
    tracing::info!(mount = store.mount(), path = %path, key = %key, "Secret written");
    writeln!(out, "Secret written to {}/{}", store.mount(), path)?;
    Ok(())
}

fn validate_secret_path(path: &str) -> Result<(), AppError> {
    if path.trim().is_empty() {
        return Err(AppError::InvalidInput("secret path must not be empty".to_string()));
    }
    if path.ends_with('/') {
        return Err(AppError::InvalidInput(format!(
            "'{}' is a folder, not a secret",
            path
        )));
    }
    Ok(())
}

fn print_entry<W: Write>(out: &mut W, entry: &SecretEntry, format: OutputFormat) -> Result<(), AppError> {
    writeln!(out, "{}", render(entry, format)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_labels() {
        let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(
            labels,
            vec!["List Secrets", "Add Secret", "Update Secret", "Quit"]
        );
    }

    #[test]
    fn test_validate_secret_path() {
        assert!(validate_secret_path("db/prod").is_ok());
        assert!(matches!(
            validate_secret_path(""),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_secret_path("db/"),
            Err(AppError::InvalidInput(_))
        ));
    }
}
