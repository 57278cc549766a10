//! Interactive terminal input.
//!
//! Everything that asks the user something goes through [`Prompter`], so the
//! navigation and action flows can be driven by a script in tests.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// Ctrl-C or Ctrl-D at a prompt
    #[error("Prompt aborted")]
    Aborted,

    #[error("Nothing to select for '{0}'")]
    NoItems(String),

    #[error("Prompt failed: {0}")]
    Terminal(String),
}

pub trait Prompter {
    /// Print `items` under `label` without asking anything
    fn show(&mut self, label: &str, items: &[String]) -> Result<(), PromptError>;

    /// Pick one of `items`; returns its index
    fn select(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError>;

    /// Free-text line; an empty answer yields `default` when given
    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String, PromptError>;

    /// Masked input
    fn password(&mut self, label: &str) -> Result<String, PromptError>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn show(&mut self, label: &str, items: &[String]) -> Result<(), PromptError> {
        (**self).show(label, items)
    }

    fn select(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError> {
        (**self).select(label, items)
    }

    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String, PromptError> {
        (**self).input(label, default)
    }

    fn password(&mut self, label: &str) -> Result<String, PromptError> {
        (**self).password(label)
    }
}

pub struct TerminalPrompter {
    editor: DefaultEditor,
}

impl TerminalPrompter {
    pub fn new() -> Result<Self, PromptError> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl Prompter for TerminalPrompter {
    fn show(&mut self, label: &str, items: &[String]) -> Result<(), PromptError> {
        eprintln!("{}:", label);
        if items.is_empty() {
            eprintln!("  (empty)");
        }
        for item in items {
            eprintln!("  {}", item);
        }
        Ok(())
    }

    fn select(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError> {
        if items.is_empty() {
            return Err(PromptError::NoItems(label.to_string()));
        }

        eprintln!("{}:", label);
        for (i, item) in items.iter().enumerate() {
            eprintln!("  {:>3}) {}", i + 1, item);
        }

        loop {
            let line = self.editor.readline("> ").map_err(readline_error)?;
            let answer = line.trim();

            if let Some(index) = parse_choice(answer, items) {
                let _ = self.editor.add_history_entry(answer);
                return Ok(index);
            }
            eprintln!("Enter a number between 1 and {}", items.len());
        }
    }

    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String, PromptError> {
        let prompt = format!("{}: ", label);
        let line = match default {
            Some(initial) => self.editor.readline_with_initial(&prompt, (initial, "")),
            None => self.editor.readline(&prompt),
        }
        .map_err(readline_error)?;

        let _ = self.editor.add_history_entry(line.as_str());
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn password(&mut self, label: &str) -> Result<String, PromptError> {
        rpassword::prompt_password(format!("{}: ", label)).map_err(|e| match e.kind() {
            std::io::ErrorKind::Interrupted | std::io::ErrorKind::UnexpectedEof => {
                PromptError::Aborted
            }
            _ => PromptError::Terminal(e.to_string()),
        })
    }
}

/// Exact item text first, then a 1-based index
fn parse_choice(answer: &str, items: &[String]) -> Option<usize> {
    if let Some(index) = items.iter().position(|item| item == answer) {
        return Some(index);
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=items.len()).contains(&n) => Some(n - 1),
        _ => None,
    }
}

fn readline_error(e: ReadlineError) -> PromptError {
    match e {
        ReadlineError::Interrupted | ReadlineError::Eof => PromptError::Aborted,
        other => PromptError::Terminal(other.to_string()),
    }
}
