use vault_client::{SecretEntry, SecretValue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty JSON, two-space indent, keys in store order
    #[default]
    Json,
    /// One `key: value` line per field
    Text,
}

impl OutputFormat {
    /// Unknown names fall back to JSON
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            n if n.eq_ignore_ascii_case("text") => Self::Text,
            n if n.eq_ignore_ascii_case("json") => Self::Json,
            other => {
                tracing::warn!(format = other, "Unknown output format, using json");
                Self::Json
            }
        }
    }
}

pub fn render(entry: &SecretEntry, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(entry),
        OutputFormat::Text => {
            let mut lines = Vec::with_capacity(entry.len());
            for (key, value) in entry.iter() {
                let value = match value {
                    SecretValue::List(_) | SecretValue::Object(_) => serde_json::to_string(value)?,
                    scalar => scalar.to_string(),
                };
                lines.push(format!("{}: {}", key, value));
            }
            Ok(lines.join("\n"))
        }
    }
}
