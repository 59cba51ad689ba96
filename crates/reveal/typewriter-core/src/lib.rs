//! Typewriter Reveal Core (host-agnostic)
//!
//! Incremental text-reveal ("typewriter") engine: splits a source text into
//! period-delimited lines and reveals them one character at a time through a
//! sequence of scheduled steps. The crate owns the state machine only; the
//! host supplies timing through the [`StepScheduler`] contract and drives
//! [`RevealEngine::step`] whenever a scheduled delay elapses. Nothing here
//! blocks, spawns, or reads the clock.

pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod lines;
pub mod outputs;
pub mod scheduler;
pub mod state;
pub mod stored_config;

// Re-exports for consumers (hosts/adapters)
pub use config::RevealConfig;
pub use engine::RevealEngine;
pub use error::RevealError;
pub use ids::{RunId, RunIdAllocator, StepToken};
pub use lines::{Line, LineSequence};
pub use outputs::{Outputs, RevealEvent};
pub use scheduler::{ManualScheduler, StepScheduler, TimerHandle};
pub use state::{RevealPhase, RevealState, StepOutcome};
pub use stored_config::parse_reveal_config_json;

/// Reveal engine result type
pub type Result<T> = core::result::Result<T, RevealError>;
