//! Line segmentation for reveal runs.
//!
//! Splitting is purely on the literal `.` character with whitespace
//! trimming; segments that are empty after trimming are dropped. No
//! sentence-boundary detection, abbreviation handling, or locale awareness.

use serde::{Deserialize, Serialize};

/// One non-empty, trimmed segment of the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    text: String,
    /// Character count (`chars().count()`), cached so stepping never
    /// re-walks the string. Reveal steps are per character, not per byte.
    char_len: usize,
}

impl Line {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            char_len: text.chars().count(),
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn char_len(&self) -> usize {
        self.char_len
    }
}

/// Ordered sequence of lines derived from one source text. Recomputed only
/// when a run starts; immutable for the lifetime of that run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSequence {
    lines: Vec<Line>,
}

impl LineSequence {
    /// Split `text` on `.`, trim each segment, drop segments empty after
    /// trimming, preserving source order.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(Line::new)
            .collect();
        Self { lines }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Steps a run takes to fully reveal this sequence: one per character
    /// plus one line-completion step per line.
    pub fn total_steps(&self) -> usize {
        self.lines.len() + self.lines.iter().map(Line::char_len).sum::<usize>()
    }

    /// The buffer a completed run holds: every line followed by a newline.
    /// Empty sequences reconstruct to the empty string.
    pub fn final_buffer(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}
