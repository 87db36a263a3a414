use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateList {
    names: Vec<String>,
}

impl CandidateList {
    /// Splits on newlines, trims each line and drops blank ones. With `dedupe` only the first
    /// occurrence of each name is kept.
    pub fn parse(text: &str, dedupe: bool) -> Self {
        let lines = text.split('\n').map(str::trim).filter(|line| !line.is_empty());
        let names = if dedupe {
            let mut seen = HashSet::new();
            lines
                .filter(|line| seen.insert(*line))
                .map(str::to_string)
                .collect()
        } else {
            lines.map(str::to_string).collect()
        };
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|item| item == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

pub fn parse_candidates(text: &str, dedupe: bool) -> CandidateList {
    CandidateList::parse(text, dedupe)
}

#[derive(Debug, Clone)]
pub struct RosterInput {
    raw_text: String,
    dedupe: bool,
    candidates: CandidateList,
}

impl Default for RosterInput {
    fn default() -> Self {
        Self::new(String::new(), true)
    }
}

impl RosterInput {
    pub fn new(raw_text: impl Into<String>, dedupe: bool) -> Self {
        let raw_text = raw_text.into();
        let candidates = CandidateList::parse(&raw_text, dedupe);
        Self {
            raw_text,
            dedupe,
            candidates,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn dedupe(&self) -> bool {
        self.dedupe
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn set_raw_text(&mut self, text: impl Into<String>) {
        self.raw_text = text.into();
        self.refresh();
    }

    pub fn set_dedupe(&mut self, dedupe: bool) {
        if self.dedupe != dedupe {
            self.dedupe = dedupe;
            self.refresh();
        }
    }

    pub fn push_char(&mut self, ch: char) {
        self.raw_text.push(ch);
        self.refresh();
    }

    pub fn pop_char(&mut self) -> Option<char> {
        let popped = self.raw_text.pop();
        if popped.is_some() {
            self.refresh();
        }
        popped
    }

    pub fn clear(&mut self) {
        self.set_raw_text(String::new());
    }

    fn refresh(&mut self) {
        self.candidates = CandidateList::parse(&self.raw_text, self.dedupe);
    }
}
