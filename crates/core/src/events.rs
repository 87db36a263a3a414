use crate::DrawError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    DrawStarted {
        generation: u64,
        candidates: usize,
        requested: f64,
        drawing: usize,
    },
    DrawRejected {
        reason: String,
    },
    SpinFrame {
        name: String,
        elapsed_ms: u64,
    },
    DrawRevealed {
        generation: u64,
        winners: Vec<String>,
        frames: u32,
    },
    SpinAborted {
        generation: u64,
    },
    ResultCopied {
        lines: usize,
    },
    CopyFailed {
        reason: String,
    },
    SessionReset,
}

impl Event {
    pub fn rejected(err: &DrawError) -> Self {
        Self::DrawRejected {
            reason: err.to_string(),
        }
    }
}

pub const MAX_PENDING_EVENTS: usize = 256;

/// Undrained events past `MAX_PENDING_EVENTS` push out the oldest ones.
#[derive(Debug, Default)]
pub struct EventBus {
    queue: VecDeque<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        if self.queue.len() >= MAX_PENDING_EVENTS {
            let _ = self.queue.pop_front();
        }
        self.queue.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
