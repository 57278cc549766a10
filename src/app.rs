//! Session startup: profile selection, login, and dispatch to a command.

use std::sync::Arc;

use vault_client::{KvEngine, LdapAuth, VaultClient};

use crate::cli::{Cli, Command};
use crate::config::{ConfigError, ProfilesFile, SessionConfig, VaultProfile};
use crate::error::AppError;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::session::{list_entries, read_secret, write_secret, Session};

pub async fn run(cli: Cli) -> Result<(), AppError> {
    let mut prompter = TerminalPrompter::new()?;

    let profiles = ProfilesFile::load_optional(&cli.config)?;
    let profile = select_profile(profiles.as_ref(), cli.profile.as_deref(), &mut prompter)?;
    let config = SessionConfig::resolve(profile.as_ref(), &cli.overrides());

    tracing::debug!(
        profile = config.profile.as_deref().unwrap_or("-"),
        address = %config.address,
        engine = %config.secret_engine,
        "Session configured"
    );

    let client = connect(&config, cli.token.as_deref(), profile.as_ref(), &mut prompter).await?;
    let store: KvEngine = client.kv(config.secret_engine.clone());

    let mut out = std::io::stdout().lock();
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let mut session = Session::new(&config, &store, prompter, &mut out);
            session.run().await
        }
        Command::List { path } => list_entries(&store, &path, &mut out).await,
        Command::Read { path } => read_secret(&store, &path, config.output_format, &mut out).await,
        Command::Write { path, key, value } => {
            write_secret(&store, &path, &key, &value, &mut out).await
        }
    }
}

/// `requested` picks by name; otherwise one profile is used as-is and
/// several are offered in a prompt. No profiles at all is `Ok(None)`.
pub fn select_profile<P: Prompter + ?Sized>(
    profiles: Option<&ProfilesFile>,
    requested: Option<&str>,
    prompter: &mut P,
) -> Result<Option<VaultProfile>, AppError> {
    if let Some(name) = requested {
        let profiles = profiles.ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;
        return Ok(Some(profiles.find(name)?.clone()));
    }

    let vaults = match profiles {
        Some(p) if !p.vaults.is_empty() => &p.vaults,
        _ => {
            tracing::debug!("No Vault profiles configured, using flags and environment");
            return Ok(None);
        }
    };

    if let [only] = vaults.as_slice() {
        return Ok(Some(only.clone()));
    }

    let names: Vec<String> = vaults.iter().map(|v| v.name.clone()).collect();
    let index = prompter.select("Select Vault", &names)?;
    vaults
        .get(index)
        .cloned()
        .map(Some)
        .ok_or_else(|| AppError::InvalidInput(format!("no vault at position {}", index)))
}

/// Username is asked with the profile's as default; the password comes from
/// the profile when present, otherwise from a masked prompt.
pub fn ldap_credentials<P: Prompter + ?Sized>(
    profile: Option<&VaultProfile>,
    prompter: &mut P,
) -> Result<LdapAuth, AppError> {
    let default_username = profile.map(|p| p.username.as_str()).filter(|u| !u.is_empty());
    let username = prompter.input("Username", default_username)?;
    let username = match username.trim() {
        "" => default_username.unwrap_or_default().to_string(),
        name => name.to_string(),
    };

    let password = match profile.map(|p| p.password.as_str()).filter(|p| !p.is_empty()) {
        Some(password) => password.to_string(),
        None => prompter.password("Password")?,
    };

    Ok(LdapAuth::new(username, password))
}

async fn connect<P: Prompter + ?Sized>(
    config: &SessionConfig,
    token: Option<&str>,
    profile: Option<&VaultProfile>,
    prompter: &mut P,
) -> Result<VaultClient, AppError> {
    let mut builder = VaultClient::builder().base_url(config.address.clone());

    if let Some(ref namespace) = config.namespace {
        builder = builder.namespace(namespace.clone());
    }

    builder = match token.filter(|t| !t.is_empty()) {
        Some(token) => builder.token(token),
        None => builder.auth_method(Arc::new(ldap_credentials(profile, prompter)?)),
    };

    Ok(builder.build().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptError;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Answers {
        queue: VecDeque<String>,
        labels: Vec<String>,
    }

    impl Answers {
        fn new(answers: &[&str]) -> Self {
            Self {
                queue: answers.iter().map(|a| a.to_string()).collect(),
                labels: vec![],
            }
        }

        fn next(&mut self, label: &str) -> Result<String, PromptError> {
            self.labels.push(label.to_string());
            self.queue.pop_front().ok_or(PromptError::Aborted)
        }
    }

    impl Prompter for Answers {
        fn show(&mut self, _label: &str, _items: &[String]) -> Result<(), PromptError> {
            Ok(())
        }

        fn select(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError> {
            let answer = self.next(label)?;
            items
                .iter()
                .position(|i| *i == answer)
                .ok_or(PromptError::NoItems(answer))
        }

        fn input(&mut self, label: &str, default: Option<&str>) -> Result<String, PromptError> {
            let answer = self.next(label)?;
            Ok(if answer.is_empty() {
                default.unwrap_or_default().to_string()
            } else {
                answer
            })
        }

        fn password(&mut self, label: &str) -> Result<String, PromptError> {
            self.next(label)
        }
    }

    fn profiles(names: &[&str]) -> ProfilesFile {
        ProfilesFile {
            vaults: names
                .iter()
                .map(|n| VaultProfile {
                    name: n.to_string(),
                    username: format!("{}-user", n),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_select_profile_by_name() {
        let mut prompter = Answers::default();
        let profile = select_profile(Some(&profiles(&["dev", "prod"])), Some("prod"), &mut prompter)
            .unwrap()
            .unwrap();
        assert_eq!(profile.name, "prod");
        assert!(prompter.labels.is_empty());
    }

    #[test]
    fn test_select_unknown_profile() {
        let mut prompter = Answers::default();
        let result = select_profile(Some(&profiles(&["dev"])), Some("qa"), &mut prompter);
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::ProfileNotFound(_)))
        ));

        let result = select_profile(None, Some("qa"), &mut prompter);
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::ProfileNotFound(_)))
        ));
    }

    #[test]
    fn test_single_profile_needs_no_prompt() {
        let mut prompter = Answers::default();
        let profile = select_profile(Some(&profiles(&["only"])), None, &mut prompter)
            .unwrap()
            .unwrap();
        assert_eq!(profile.name, "only");
        assert!(prompter.labels.is_empty());
    }

    #[test]
    fn test_several_profiles_prompt() {
        let mut prompter = Answers::new(&["prod"]);
        let profile = select_profile(Some(&profiles(&["dev", "prod"])), None, &mut prompter)
            .unwrap()
            .unwrap();
        assert_eq!(profile.name, "prod");
        assert_eq!(prompter.labels, vec!["Select Vault"]);
    }

    #[test]
    fn test_no_profiles() {
        let mut prompter = Answers::default();
        assert!(select_profile(None, None, &mut prompter).unwrap().is_none());
        assert!(select_profile(Some(&profiles(&[])), None, &mut prompter)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_aborted_profile_prompt() {
        let mut prompter = Answers::default();
        let result = select_profile(Some(&profiles(&["a", "b"])), None, &mut prompter);
        assert!(result.unwrap_err().is_aborted());
    }

    #[test]
    fn test_ldap_credentials_use_profile_defaults() {
        let profile = VaultProfile {
            username: "alice".to_string(),
            password: "from-file".to_string(),
            ..Default::default()
        };
        let mut prompter = Answers::new(&[""]);
        let auth = ldap_credentials(Some(&profile), &mut prompter).unwrap();
        assert_eq!(auth.username, "alice");
        assert_eq!(prompter.labels, vec!["Username"]);
    }

    #[test]
    fn test_ldap_credentials_prompt_for_password() {
        let mut prompter = Answers::new(&["bob", "s3cret"]);
        let auth = ldap_credentials(None, &mut prompter).unwrap();
        assert_eq!(auth.username, "bob");
        assert_eq!(prompter.labels, vec!["Username", "Password"]);
    }
}
