//! Threaded wall-clock host for reveal engines.
//!
//! `typewriter-core` never blocks or reads the clock; this crate supplies
//! the timer facility it expects from a host. Each [`ThreadedReveal`] owns
//! one engine behind a mutex and one worker thread that waits out the armed
//! delay, then drives `RevealEngine::step` with the armed token and forwards
//! the resulting events to an optional subscriber. [`RevealRegistry`] keys
//! independent reveals for pages hosting several widgets at once.

mod host;
mod registry;

pub use host::{RevealSubscriber, ThreadedReveal};
pub use registry::RevealRegistry;
