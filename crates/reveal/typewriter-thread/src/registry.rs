//! Keyed reveals for pages hosting several typewriter widgets.

use hashbrown::HashMap;

use typewriter_core::{RevealConfig, RevealError, RevealPhase};

use crate::host::ThreadedReveal;

/// Keyed collection of independent [`ThreadedReveal`]s. Widgets are fully
/// independent of one another; no cross-widget ordering holds or is needed.
#[derive(Default)]
pub struct RevealRegistry {
    widgets: HashMap<String, ThreadedReveal>,
}

impl RevealRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the widget registered under `key`, spawning its
    /// worker on first use.
    pub fn start(&mut self, key: &str, cfg: RevealConfig) -> Result<(), RevealError> {
        self.widgets
            .entry_ref(key)
            .or_insert_with(ThreadedReveal::spawn)
            .start(cfg)
    }

    /// Snapshot of a widget's buffer, if the widget exists.
    pub fn buffer(&self, key: &str) -> Option<String> {
        self.widgets.get(key).map(ThreadedReveal::buffer)
    }

    pub fn phase(&self, key: &str) -> Option<RevealPhase> {
        self.widgets.get(key).map(ThreadedReveal::phase)
    }

    /// Stop a widget's pending step. Returns false for unknown keys.
    pub fn cancel(&self, key: &str) -> bool {
        match self.widgets.get(key) {
            Some(widget) => {
                widget.cancel();
                true
            }
            None => false,
        }
    }

    /// Tear a widget down, stopping its worker thread. Returns false for
    /// unknown keys.
    pub fn remove(&mut self, key: &str) -> bool {
        self.widgets.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
