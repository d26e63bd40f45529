use serde::{Deserialize, Serialize};

/// Terms that may not appear in public free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamRule {
    words: Vec<String>,
}

impl SpamRule {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
