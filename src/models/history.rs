// file: src/models/history.rs
// description: bounded most-recent-first record of answered questions
// reference: in-memory query history of the dashboard view

use crate::utils::Validator;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;
pub const DEFAULT_PREVIEW_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer_preview: String,
    pub asked_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(question: &str, answer: &str, preview_chars: usize) -> Self {
        Self {
            question: question.to_string(),
            answer_preview: Validator::truncate_text(answer, preview_chars),
            asked_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
    preview_chars: usize,
}

impl History {
    pub fn new(limit: usize, preview_chars: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit: limit.max(1),
            preview_chars,
        }
    }

    /// Adds an entry at the front and drops whatever falls past the limit.
    pub fn record(&mut self, question: &str, answer: &str) {
        self.entries
            .push_front(HistoryEntry::new(question, answer, self.preview_chars));
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, DEFAULT_PREVIEW_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_most_recent_first_and_bounded() {
        let mut history = History::default();
        for i in 1..=6 {
            history.record(&format!("q{}", i), &format!("a{}", i));
        }

        let questions: Vec<&str> = history.entries().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["q6", "q5", "q4", "q3", "q2"]);
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn test_preview_truncation() {
        let mut history = History::default();
        let exact = "a".repeat(120);
        history.record("exact", &exact);
        assert_eq!(history.latest().unwrap().answer_preview, exact);

        let long = "b".repeat(121);
        history.record("long", &long);
        assert_eq!(
            history.latest().unwrap().answer_preview,
            format!("{}...", "b".repeat(120))
        );
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(2, 10);
        history.record("q", "a");
        history.clear();
        assert!(history.is_empty());

        for q in ["q1", "q2", "q3"] {
            history.record(q, "a");
        }
        assert_eq!(history.len(), 2);
    }
}
