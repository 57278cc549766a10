#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use divs_vault::prompt::{PromptError, Prompter};
use vault_client::{KvStore, SecretEntry, VaultError};

pub enum Answer {
    /// Select the item with this exact text
    Pick(&'static str),
    Text(&'static str),
    Abort,
}

/// Prompter replaying a fixed list of answers. Running out of answers aborts.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub labels: Vec<String>,
    pub offered: Vec<Vec<String>>,
    pub shown: Vec<(String, Vec<String>)>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            ..Default::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, label: &str) -> Option<Answer> {
        self.labels.push(label.to_string());
        self.answers.pop_front()
    }
}

impl Prompter for ScriptedPrompter {
    fn show(&mut self, label: &str, items: &[String]) -> Result<(), PromptError> {
        self.shown.push((label.to_string(), items.to_vec()));
        Ok(())
    }

    fn select(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError> {
        self.offered.push(items.to_vec());
        match self.next(label) {
            Some(Answer::Pick(name)) => items
                .iter()
                .position(|i| i == name)
                .ok_or_else(|| PromptError::NoItems(name.to_string())),
            Some(Answer::Text(text)) => panic!("select '{}' got text answer '{}'", label, text),
            Some(Answer::Abort) | None => Err(PromptError::Aborted),
        }
    }

    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String, PromptError> {
        match self.next(label) {
            Some(Answer::Text("")) => Ok(default.unwrap_or_default().to_string()),
            Some(Answer::Text(text)) => Ok(text.to_string()),
            Some(Answer::Pick(name)) => panic!("input '{}' got pick answer '{}'", label, name),
            Some(Answer::Abort) | None => Err(PromptError::Aborted),
        }
    }

    fn password(&mut self, label: &str) -> Result<String, PromptError> {
        self.input(label, None)
    }
}

/// In-memory KV mount. Leaves are stored by full path; folders are implied.
pub struct MemoryStore {
    mount: String,
    leaves: Mutex<BTreeMap<String, SecretEntry>>,
    failing: HashSet<String>,
    undecodable: HashSet<String>,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(leaves: &[(&str, &[(&str, &str)])]) -> Self {
        let leaves: BTreeMap<String, SecretEntry> = leaves
            .iter()
            .map(|(path, fields)| (path.to_string(), fields.iter().copied().collect()))
            .collect();

        Self {
            mount: "secret".to_string(),
            leaves: Mutex::new(leaves),
            failing: HashSet::new(),
            undecodable: HashSet::new(),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Requests for `path` answer 500
    pub fn failing_at(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Requests for `path` get a body of the wrong shape
    pub fn undecodable_at(mut self, path: &str) -> Self {
        self.undecodable.insert(path.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, path: &str) -> Option<SecretEntry> {
        self.leaves.lock().unwrap().get(path).cloned()
    }

    fn check(&self, path: &str) -> Result<(), VaultError> {
        if self.failing.contains(path) {
            return Err(VaultError::RequestError {
                status: 500,
                status_text: "500 Internal Server Error".to_string(),
                errors: vec!["internal error".to_string()],
            });
        }
        if self.undecodable.contains(path) {
            return Err(VaultError::DecodeError(format!("no data at {}", path)));
        }
        Ok(())
    }
}

fn not_found() -> VaultError {
    VaultError::RequestError {
        status: 404,
        status_text: "404 Not Found".to_string(),
        errors: vec![],
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn list(&self, path: &str) -> Result<Vec<String>, VaultError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check(path)?;

        let leaves = self.leaves.lock().unwrap();
        let mut children: Vec<String> = Vec::new();
        for key in leaves.keys() {
            let Some(rest) = key.strip_prefix(path) else {
                continue;
            };
            let child = match rest.find('/') {
                Some(i) => &rest[..=i],
                None => rest,
            };
            if children.last().map(String::as_str) != Some(child) {
                children.push(child.to_string());
            }
        }

        if children.is_empty() && !path.is_empty() {
            return Err(not_found());
        }
        Ok(children)
    }

    async fn read(&self, path: &str) -> Result<SecretEntry, VaultError> {
        self.check(path)?;
        self.leaves
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn write(&self, path: &str, entry: &SecretEntry) -> Result<(), VaultError> {
        self.check(path)?;
        self.leaves
            .lock()
            .unwrap()
            .insert(path.to_string(), entry.clone());
        Ok(())
    }

    fn mount(&self) -> &str {
        &self.mount
    }
}
