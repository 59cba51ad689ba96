//! Mutable state of one reveal run.

use serde::{Deserialize, Serialize};

use crate::lines::LineSequence;

/// Phase of the engine as observed by hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevealPhase {
    /// No run has been started yet
    Idle,
    /// A run has started and is not yet complete (it may be cancelled;
    /// the buffer then stays frozen at its last value)
    Revealing,
    /// The run has revealed every line; nothing is scheduled
    Done,
}

impl RevealPhase {
    /// Get the name of this phase
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Revealing => "revealing",
            Self::Done => "done",
        }
    }

    #[inline]
    pub fn is_revealing(&self) -> bool {
        matches!(self, Self::Revealing)
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Result of one state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One character of `line` was appended to the buffer
    Char { line: usize, ch: char },
    /// `line` was completed: a newline was appended and the cursor moved to
    /// the next line
    LineBreak { line: usize },
}

/// Cursor plus accumulated buffer for the run in progress.
///
/// Invariant: `buffer` is a prefix-consistent reconstruction of the line
/// sequence — every completed line in full followed by `\n`, then exactly
/// `char_index` leading characters of the current line. It never shrinks
/// within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    line_index: usize,
    char_index: usize,
    /// Byte cursor paired with `char_index`, so the next character append is
    /// O(1) on UTF-8 text.
    byte_offset: usize,
    buffer: String,
}

impl RevealState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn line_index(&self) -> usize {
        self.line_index
    }

    #[inline]
    pub fn char_index(&self) -> usize {
        self.char_index
    }

    #[inline]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Terminal when every line has been completed.
    #[inline]
    pub fn is_terminal(&self, lines: &LineSequence) -> bool {
        self.line_index >= lines.len()
    }

    /// Apply one reveal transition: append the next character of the current
    /// line, or complete the line and advance. Returns `None` in terminal
    /// state (nothing to do).
    pub fn apply_step(&mut self, lines: &LineSequence) -> Option<StepOutcome> {
        let line = lines.get(self.line_index)?;
        if self.char_index < line.char_len() {
            if let Some(ch) = line.text()[self.byte_offset..].chars().next() {
                self.buffer.push(ch);
                self.byte_offset += ch.len_utf8();
                self.char_index += 1;
                return Some(StepOutcome::Char {
                    line: self.line_index,
                    ch,
                });
            }
        }
        self.buffer.push('\n');
        let completed = self.line_index;
        self.line_index += 1;
        self.char_index = 0;
        self.byte_offset = 0;
        Some(StepOutcome::LineBreak { line: completed })
    }
}
