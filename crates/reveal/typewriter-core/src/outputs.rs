//! Output contract from the reveal engine.
//!
//! `start()` and `step()` return the events they produced; hosts forward
//! them to subscribers or ignore them and poll `buffer()` instead. Both
//! observation styles see the same one-step-at-a-time progression.

use serde::{Deserialize, Serialize};

use crate::ids::RunId;

/// Discrete semantic signals emitted while a run progresses.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum RevealEvent {
    /// A run began; `lines` is the size of the derived line sequence
    RunStarted { run: RunId, lines: usize },
    /// One character of `line` was appended to the buffer
    CharRevealed { run: RunId, line: usize, ch: char },
    /// `line` completed; a newline was appended
    LineCompleted { run: RunId, line: usize },
    /// Every line has been revealed; nothing further is scheduled
    RunCompleted { run: RunId },
}

/// Events produced by one engine call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<RevealEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: RevealEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
