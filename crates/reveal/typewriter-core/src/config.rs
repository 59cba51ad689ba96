//! Reveal run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RevealError;

/// Default delay between successive character reveals, in milliseconds.
pub const DEFAULT_TYPING_SPEED_MS: f64 = 50.0;
/// Default pause after a completed line, in milliseconds.
pub const DEFAULT_LINE_DELAY_MS: f64 = 1000.0;

/// Configuration for one reveal run. Immutable once a run has started;
/// changing any field means a fresh `start()`.
///
/// Delays are carried as raw `f64` milliseconds, the shape the content layer
/// supplies them in, so out-of-range values stay representable and are
/// rejected (not clamped) when a run starts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RevealConfig {
    /// Source text, segmented into lines on the literal `.` character.
    pub text: String,
    /// Delay in milliseconds between successive character reveals within a
    /// line. 0 means "as fast as the scheduler allows", still one step at a
    /// time.
    #[serde(default = "default_typing_speed")]
    pub typing_speed_ms: f64,
    /// Delay in milliseconds after a line completes, before the next line
    /// starts revealing.
    #[serde(default = "default_line_delay")]
    pub line_delay_ms: f64,
}

fn default_typing_speed() -> f64 {
    DEFAULT_TYPING_SPEED_MS
}

fn default_line_delay() -> f64 {
    DEFAULT_LINE_DELAY_MS
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            typing_speed_ms: DEFAULT_TYPING_SPEED_MS,
            line_delay_ms: DEFAULT_LINE_DELAY_MS,
        }
    }
}

impl RevealConfig {
    /// Create a configuration with default delays.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create a configuration with explicit delays in milliseconds.
    pub fn with_delays(text: impl Into<String>, typing_speed_ms: f64, line_delay_ms: f64) -> Self {
        Self {
            text: text.into(),
            typing_speed_ms,
            line_delay_ms,
        }
    }

    /// Validate both delay fields. Negative or non-finite values are
    /// rejected with [`RevealError::InvalidConfiguration`].
    pub fn validate(&self) -> Result<(), RevealError> {
        delay_duration("typingSpeed", self.typing_speed_ms)?;
        delay_duration("lineDelay", self.line_delay_ms)?;
        Ok(())
    }

    /// Typing delay as a `Duration`, or the validation error.
    pub fn typing_speed(&self) -> Result<Duration, RevealError> {
        delay_duration("typingSpeed", self.typing_speed_ms)
    }

    /// Line pause as a `Duration`, or the validation error.
    pub fn line_delay(&self) -> Result<Duration, RevealError> {
        delay_duration("lineDelay", self.line_delay_ms)
    }
}

fn delay_duration(field: &str, ms: f64) -> Result<Duration, RevealError> {
    if !ms.is_finite() || ms < 0.0 {
        return Err(RevealError::invalid_configuration(field, ms));
    }
    Duration::try_from_secs_f64(ms / 1000.0)
        .map_err(|_| RevealError::invalid_configuration(field, ms))
}
