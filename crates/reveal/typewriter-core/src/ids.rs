//! Identifiers for reveal runs and scheduled steps.

use serde::{Deserialize, Serialize};

/// Identity of one reveal run. Every `start()` allocates a fresh RunId, so
/// steps queued for a superseded run can never match the live one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RunId(pub u32);

/// Identity of one scheduled step: the run it belongs to plus the step's
/// sequence number within that run. The engine honors a token only while it
/// is the pending one; anything else is stale and dropped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StepToken {
    pub run: RunId,
    pub seq: u32,
}

/// Monotonic allocator for RunId.
#[derive(Default, Debug)]
pub struct RunIdAllocator {
    next_run: u32,
}

impl RunIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_run(&mut self) -> RunId {
        let id = RunId(self.next_run);
        self.next_run = self.next_run.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
