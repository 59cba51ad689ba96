//! Content-layer configuration boundary.
//!
//! The site's data tables carry reveal configurations as JSON objects with
//! camelCase keys and optional delays. This module parses that shape into
//! the canonical [`RevealConfig`] and validates it, so malformed or invalid
//! data is rejected before a run can start.

use serde::Deserialize;

use crate::config::{RevealConfig, DEFAULT_LINE_DELAY_MS, DEFAULT_TYPING_SPEED_MS};
use crate::error::RevealError;

/// Parse content-layer JSON (`{"text": ..., "typingSpeed"?: ...,
/// "lineDelay"?: ...}`) into a validated [`RevealConfig`]. Missing delays
/// take the defaults (50 ms / 1000 ms); negative or non-finite delays are
/// rejected.
pub fn parse_reveal_config_json(s: &str) -> Result<RevealConfig, RevealError> {
    let raw: StoredRevealConfig = serde_json::from_str(s)?;
    let cfg = RevealConfig {
        text: raw.text,
        typing_speed_ms: raw.typing_speed.unwrap_or(DEFAULT_TYPING_SPEED_MS),
        line_delay_ms: raw.line_delay.unwrap_or(DEFAULT_LINE_DELAY_MS),
    };
    cfg.validate()?;
    Ok(cfg)
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct StoredRevealConfig {
    pub text: String,
    #[serde(default)]
    #[serde(rename = "typingSpeed")]
    pub typing_speed: Option<f64>,
    #[serde(default)]
    #[serde(rename = "lineDelay")]
    pub line_delay: Option<f64>,
}
