//! Engine: run ownership and public API (start/step/cancel/buffer).
//!
//! One engine reveals one text at a time. `start` derives the line sequence
//! and arms the first step; the host's timer facility then calls `step` with
//! the armed token each time a delay elapses, and every step arms its
//! successor until the run is done. At most one step is ever armed per
//! engine: `start` cancels before re-arming, and stale tokens are dropped,
//! so two runs can never interleave their writes into one buffer.

use std::time::Duration;

use crate::config::RevealConfig;
use crate::error::RevealError;
use crate::ids::{RunId, RunIdAllocator, StepToken};
use crate::lines::LineSequence;
use crate::outputs::{Outputs, RevealEvent};
use crate::scheduler::{StepScheduler, TimerHandle};
use crate::state::{RevealPhase, RevealState, StepOutcome};

/// A step currently armed with the scheduler.
#[derive(Copy, Clone, Debug)]
struct PendingStep {
    token: StepToken,
    handle: TimerHandle,
}

/// Everything owned by one run: derived lines, validated delays, cursor.
#[derive(Debug)]
struct ActiveRun {
    id: RunId,
    lines: LineSequence,
    typing_speed: Duration,
    line_delay: Duration,
    state: RevealState,
    next_seq: u32,
    done: bool,
}

/// The reveal engine. Generic over the host-supplied timer facility.
#[derive(Debug)]
pub struct RevealEngine<S: StepScheduler> {
    scheduler: S,
    ids: RunIdAllocator,
    run: Option<ActiveRun>,
    pending: Option<PendingStep>,
    outputs: Outputs,
}

impl<S: StepScheduler> RevealEngine<S> {
    /// Create an engine around the host's scheduler. No run is active until
    /// `start` is called.
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            ids: RunIdAllocator::new(),
            run: None,
            pending: None,
            outputs: Outputs::default(),
        }
    }

    /// Begin or restart a run.
    ///
    /// Validates the configuration (rejecting, never clamping, bad delays),
    /// cancels any step still armed for the previous run, recomputes the
    /// line sequence, and resets the cursor and buffer. A text with no
    /// non-empty segments yields a run that is immediately done with an
    /// empty buffer. On `Err` nothing changes: the previous run's buffer
    /// stays observable.
    pub fn start(&mut self, cfg: RevealConfig) -> Result<&Outputs, RevealError> {
        let typing_speed = cfg.typing_speed()?;
        let line_delay = cfg.line_delay()?;

        self.cancel();

        let id = self.ids.alloc_run();
        let lines = LineSequence::from_text(&cfg.text);
        let done = lines.is_empty();
        let run = ActiveRun {
            id,
            typing_speed,
            line_delay,
            state: RevealState::new(),
            next_seq: 0,
            done,
            lines,
        };

        self.outputs.clear();
        self.outputs.push_event(RevealEvent::RunStarted {
            run: id,
            lines: run.lines.len(),
        });
        if done {
            self.outputs.push_event(RevealEvent::RunCompleted { run: id });
        }
        self.run = Some(run);
        if !done {
            self.arm_next(typing_speed);
        }
        Ok(&self.outputs)
    }

    /// Apply one scheduled transition. Called by the host when the delay for
    /// `token` has elapsed; not called directly by consumers.
    ///
    /// Tokens that are not the pending step — an older run, a superseded
    /// sequence number, or nothing armed at all — are dropped without
    /// touching any state. This is what makes `cancel` airtight even when
    /// the host's timer callback was already queued.
    pub fn step(&mut self, token: StepToken) -> &Outputs {
        self.outputs.clear();
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
            }
            _ => return &self.outputs,
        }

        let mut next_delay = None;
        if let Some(run) = self.run.as_mut() {
            match run.state.apply_step(&run.lines) {
                Some(StepOutcome::Char { line, ch }) => {
                    self.outputs.push_event(RevealEvent::CharRevealed {
                        run: run.id,
                        line,
                        ch,
                    });
                    next_delay = Some(run.typing_speed);
                }
                Some(StepOutcome::LineBreak { line }) => {
                    self.outputs
                        .push_event(RevealEvent::LineCompleted { run: run.id, line });
                    if run.state.is_terminal(&run.lines) {
                        run.done = true;
                        self.outputs
                            .push_event(RevealEvent::RunCompleted { run: run.id });
                    } else {
                        next_delay = Some(run.line_delay);
                    }
                }
                None => {}
            }
        }
        if let Some(delay) = next_delay {
            self.arm_next(delay);
        }
        &self.outputs
    }

    /// Stop the pending scheduled step without altering the buffer. Safe to
    /// call at any time, including when nothing is pending.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.handle);
        }
    }

    /// Read-only snapshot of the accumulated output. Empty before the first
    /// run starts.
    pub fn buffer(&self) -> &str {
        self.run
            .as_ref()
            .map(|run| run.state.buffer())
            .unwrap_or("")
    }

    /// Phase as observed by hosts.
    pub fn phase(&self) -> RevealPhase {
        match &self.run {
            None => RevealPhase::Idle,
            Some(run) if run.done => RevealPhase::Done,
            Some(_) => RevealPhase::Revealing,
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.phase().is_done()
    }

    /// Identity of the current run, if one has started.
    pub fn current_run(&self) -> Option<RunId> {
        self.run.as_ref().map(|run| run.id)
    }

    /// Line sequence of the current run, if one has started.
    pub fn lines(&self) -> Option<&LineSequence> {
        self.run.as_ref().map(|run| &run.lines)
    }

    /// Cursor of the current run, if one has started.
    pub fn state(&self) -> Option<&RevealState> {
        self.run.as_ref().map(|run| &run.state)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Arm the successor step. `self.pending` must be empty here; `start`
    /// cancels and `step` consumes before arming.
    fn arm_next(&mut self, delay: Duration) {
        if let Some(run) = self.run.as_mut() {
            let token = StepToken {
                run: run.id,
                seq: run.next_seq,
            };
            run.next_seq = run.next_seq.wrapping_add(1);
            let handle = self.scheduler.schedule(token, delay);
            self.pending = Some(PendingStep { token, handle });
        }
    }
}
