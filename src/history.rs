use chrono::{DateTime, Local};

use crate::translate::TranslationResult;

/// One completed translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub source_label: String,
    pub target_label: String,
    pub text: String,
    pub path: Vec<String>,
}

impl HistoryEntry {
    pub fn new(source_label: &str, target_label: &str, result: &TranslationResult) -> Self {
        Self {
            timestamp: Local::now(),
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            text: result.text.clone(),
            path: result.path.clone(),
        }
    }

    /// Clock time shown as the entry title, e.g. "14:03:59"
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Append-only translation log for one session; lives as long as the session
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Up to `n` most recent entries, most recent first
    pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
