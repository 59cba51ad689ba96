//! Scheduler contract between the engine and its host.
//!
//! The engine never blocks or reads the clock; it asks the host to arm a
//! one-shot timer for the next step and to cancel it when a run is
//! superseded. At most one step is armed per engine at any time.

use std::time::Duration;

use crate::ids::StepToken;

/// Opaque handle for a scheduled step, allocated by the scheduler. Lets the
/// engine deschedule a timer the host has not fired yet.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimerHandle(pub u64);

/// One-shot timer capability supplied by the host.
///
/// `cancel` is best-effort descheduling: a timer may already have fired and
/// its callback may already be queued when `cancel` runs. Hosts therefore
/// always pass the armed [`StepToken`] back into `RevealEngine::step`, which
/// drops anything that is no longer the pending step. The token guard, not
/// the timer cancel, is what makes cancellation airtight.
pub trait StepScheduler {
    /// Arm a one-shot timer; after `delay`, the host calls
    /// `RevealEngine::step(token)`.
    fn schedule(&mut self, token: StepToken, delay: Duration) -> TimerHandle;

    /// Deschedule a previously armed timer. Unknown or already-fired handles
    /// are a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

/// One step armed with the [`ManualScheduler`].
#[derive(Copy, Clone, Debug)]
struct ArmedStep {
    handle: TimerHandle,
    token: StepToken,
    due: Duration,
}

/// Deterministic virtual-clock scheduler for tests and headless hosts.
///
/// Nothing fires on its own: callers advance the clock with
/// [`ManualScheduler::advance`] or jump straight to the next deadline with
/// [`ManualScheduler::fire_next`], then feed the returned tokens into
/// `RevealEngine::step`. Every intermediate state stays observable even at
/// zero delay, because due steps are handed out one list at a time and
/// stepping is still explicit.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_handle: u64,
    armed: Vec<ArmedStep>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed (not yet due) steps.
    #[inline]
    pub fn pending(&self) -> usize {
        self.armed.len()
    }

    /// Absolute due time of the earliest armed step.
    pub fn next_due(&self) -> Option<Duration> {
        self.armed.iter().map(|step| step.due).min()
    }

    /// Advance the virtual clock by `delta`, returning every token that came
    /// due, ordered by due time.
    pub fn advance(&mut self, delta: Duration) -> Vec<StepToken> {
        self.now += delta;
        let now = self.now;
        let mut due: Vec<ArmedStep> = Vec::new();
        self.armed.retain(|step| {
            if step.due <= now {
                due.push(*step);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|step| step.due);
        due.into_iter().map(|step| step.token).collect()
    }

    /// Jump the clock to the earliest deadline and return its token.
    pub fn fire_next(&mut self) -> Option<StepToken> {
        let due = self.next_due()?;
        let delta = due.saturating_sub(self.now);
        self.advance(delta).into_iter().next()
    }
}

impl StepScheduler for ManualScheduler {
    fn schedule(&mut self, token: StepToken, delay: Duration) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.armed.push(ArmedStep {
            handle,
            token,
            due: self.now + delay,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.armed.retain(|step| step.handle != handle);
    }
}
