use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Past draw results, most recent first, never longer than `cap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLog {
    cap: usize,
    entries: VecDeque<Vec<String>>,
}

impl HistoryLog {
    pub fn with_cap(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            entries: VecDeque::with_capacity(cap + 1),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn push(&mut self, result: Vec<String>) {
        self.entries.push_front(result);
        self.entries.truncate(self.cap);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&[String]> {
        self.entries.front().map(Vec::as_slice)
    }

    pub fn get(&self, index: usize) -> Option<&[String]> {
        self.entries.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.entries.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(tag: usize) -> Vec<String> {
        vec![format!("winner-{tag}")]
    }

    #[test]
    fn evicts_oldest_past_cap() {
        let mut log = HistoryLog::with_cap(5);
        for k in 1..=8 {
            log.push(round(k));
            assert_eq!(log.len(), k.min(5));
            assert_eq!(log.latest(), Some(round(k).as_slice()));
        }
        let tags: Vec<_> = log.iter().map(|entry| entry[0].clone()).collect();
        assert_eq!(
            tags,
            ["winner-8", "winner-7", "winner-6", "winner-5", "winner-4"]
        );
    }

    #[test]
    fn zero_cap_is_raised_to_one() {
        let mut log = HistoryLog::with_cap(0);
        log.push(round(1));
        log.push(round(2));
        assert_eq!(log.cap(), 1);
        assert_eq!(log.get(0), Some(round(2).as_slice()));
        assert_eq!(log.get(1), None);
        log.clear();
        assert!(log.is_empty());
    }
}
