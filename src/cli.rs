use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Overrides, DEFAULT_CONFIG_PATH};
use crate::format::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "divs-vault")]
#[command(about = "Browse, read and write secrets in a Vault KV v2 engine")]
#[command(version)]
#[command(after_help = r#"PROFILES:
    The profiles file lists named Vault endpoints:
    {"vaults": [{"name": "prod", "address": "https://vault:8200",
                 "namespace": "ops", "username": "alice",
                 "secretengine": "secret"}]}

    Without --token the session logs in over LDAP.

LOGGING:
    RUST_LOG sets the log filter, JSON_LOG=true switches to JSON lines on stderr."#)]
pub struct Cli {
    /// Vault server address
    #[arg(long, env = "VAULT_ADDR")]
    pub vault_addr: Option<String>,

    /// Vault token; skips the LDAP login
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Vault namespace sent as X-Vault-Namespace
    #[arg(long, env = "VAULT_NAMESPACE")]
    pub namespace: Option<String>,

    /// KV v2 mount to browse
    #[arg(long, env = "VAULT_SECRET_ENGINE")]
    pub secret_engine: Option<String>,

    /// Output format (json or text)
    #[arg(long, default_value = "json")]
    pub output_format: String,

    /// Profiles file
    #[arg(long, env = "DIVS_VAULT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Profile to use instead of asking
    #[arg(long, env = "DIVS_VAULT_PROFILE")]
    pub profile: Option<String>,

    /// Maximum number of nested folders to descend while browsing
    #[arg(long)]
    pub max_depth: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive action menu (default)
    Interactive,

    /// Print the entries under a folder
    List {
        /// Folder path, e.g. "db/" (empty for the mount root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Print one secret
    Read {
        /// Secret path, e.g. "db/prod"
        path: String,
    },

    /// Replace a secret with a single key/value pair
    Write {
        path: String,
        key: String,
        value: String,
    },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            address: self.vault_addr.clone(),
            namespace: self.namespace.clone(),
            secret_engine: self.secret_engine.clone(),
            output_format: OutputFormat::from_name(&self.output_format),
            max_depth: self.max_depth,
        }
    }
}
