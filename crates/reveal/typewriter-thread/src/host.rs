//! One engine, one worker thread, real delays.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use typewriter_core::{
    RevealConfig, RevealEngine, RevealError, RevealEvent, RevealPhase, StepScheduler, StepToken,
    TimerHandle,
};

/// Callback invoked with every event the engine emits. Runs on the worker
/// thread, outside the engine lock.
pub type RevealSubscriber = Box<dyn FnMut(&RevealEvent) + Send>;

/// One step armed against the wall clock.
#[derive(Copy, Clone, Debug)]
struct ArmedStep {
    token: StepToken,
    handle: TimerHandle,
    due: Instant,
}

/// State shared between the engine's scheduler and the worker thread. The
/// engine guarantees at most one armed step, so a slot suffices.
#[derive(Debug, Default)]
struct TimerSlot {
    armed: Option<ArmedStep>,
    /// Events produced on the caller's thread (by `start`) waiting for the
    /// worker to deliver them to the subscriber.
    queued_events: VecDeque<RevealEvent>,
}

#[derive(Debug, Default)]
struct SharedSlot {
    slot: Mutex<TimerSlot>,
    cv: Condvar,
}

fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Scheduler handed to the engine: arming a step writes the slot and wakes
/// the worker. Notifications happen with the slot mutex held so the worker
/// cannot miss a wakeup between its predicate check and its wait.
#[derive(Debug)]
struct SlotScheduler {
    shared: Arc<SharedSlot>,
    next_handle: u64,
}

impl StepScheduler for SlotScheduler {
    fn schedule(&mut self, token: StepToken, delay: Duration) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        let mut slot = lock_recover(&self.shared.slot);
        slot.armed = Some(ArmedStep {
            token,
            handle,
            due: Instant::now() + delay,
        });
        log::trace!("armed step {:?} in {:?}", token, delay);
        self.shared.cv.notify_all();
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let mut slot = lock_recover(&self.shared.slot);
        if slot.armed.map_or(false, |armed| armed.handle == handle) {
            slot.armed = None;
            self.shared.cv.notify_all();
        }
    }
}

/// A reveal engine driven by real wall-clock delays on a dedicated worker
/// thread.
///
/// `start`, `cancel` and the read accessors may be called from any thread;
/// the engine mutex serializes them against the worker's steps, and the
/// engine's stale-token guard covers the remaining race (a timer that fired
/// just before a cancel or restart landed).
pub struct ThreadedReveal {
    engine: Arc<Mutex<RevealEngine<SlotScheduler>>>,
    shared: Arc<SharedSlot>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadedReveal {
    /// Spawn a reveal host with no subscriber; consumers poll `buffer()`.
    pub fn spawn() -> Self {
        Self::spawn_inner(None)
    }

    /// Spawn a reveal host that forwards every event to `subscriber`.
    pub fn spawn_with_subscriber(
        subscriber: impl FnMut(&RevealEvent) + Send + 'static,
    ) -> Self {
        Self::spawn_inner(Some(Box::new(subscriber)))
    }

    fn spawn_inner(subscriber: Option<RevealSubscriber>) -> Self {
        let shared = Arc::new(SharedSlot::default());
        let engine = Arc::new(Mutex::new(RevealEngine::new(SlotScheduler {
            shared: shared.clone(),
            next_handle: 0,
        })));
        let running = Arc::new(AtomicBool::new(true));
        let worker = {
            let engine = engine.clone();
            let shared = shared.clone();
            let running = running.clone();
            thread::spawn(move || worker_loop(engine, shared, running, subscriber))
        };
        Self {
            engine,
            shared,
            running,
            worker: Some(worker),
        }
    }

    /// Begin or restart the reveal. Events from the start itself
    /// (`RunStarted`, plus `RunCompleted` for empty texts) are queued for the
    /// subscriber.
    pub fn start(&self, cfg: RevealConfig) -> Result<(), RevealError> {
        let mut engine = lock_recover(&self.engine);
        let events = engine.start(cfg)?.events.clone();
        // Queue while still holding the engine lock: a racing worker step
        // needs that lock before it can produce events, so these always
        // enter the queue first.
        let mut slot = lock_recover(&self.shared.slot);
        slot.queued_events.extend(events);
        self.shared.cv.notify_all();
        Ok(())
    }

    /// Stop the pending step; the buffer freezes at its current value.
    pub fn cancel(&self) {
        lock_recover(&self.engine).cancel();
    }

    /// Snapshot of the accumulated output.
    pub fn buffer(&self) -> String {
        lock_recover(&self.engine).buffer().to_string()
    }

    pub fn phase(&self) -> RevealPhase {
        lock_recover(&self.engine).phase()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.phase().is_done()
    }

    /// Stop the worker thread. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        {
            // Hold the slot lock while notifying so the worker is either
            // already waiting (and wakes) or has yet to re-check `running`.
            let _slot = lock_recover(&self.shared.slot);
            self.shared.cv.notify_all();
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("reveal worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for ThreadedReveal {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    engine: Arc<Mutex<RevealEngine<SlotScheduler>>>,
    shared: Arc<SharedSlot>,
    running: Arc<AtomicBool>,
    mut subscriber: Option<RevealSubscriber>,
) {
    let mut guard = lock_recover(&shared.slot);
    while running.load(Ordering::SeqCst) {
        if !guard.queued_events.is_empty() {
            let drained: Vec<RevealEvent> = guard.queued_events.drain(..).collect();
            drop(guard);
            deliver(&mut subscriber, &drained);
            guard = lock_recover(&shared.slot);
            continue;
        }

        let Some(armed) = guard.armed else {
            guard = wait(&shared, guard);
            continue;
        };

        let now = Instant::now();
        if armed.due > now {
            guard = wait_timeout(&shared, guard, armed.due - now);
            continue;
        }

        guard.armed = None;
        drop(guard);
        // Step with the slot unlocked; lock order is engine then slot. A
        // restart racing this fire is harmless: the engine drops stale
        // tokens.
        let events = {
            let mut eng = lock_recover(&engine);
            eng.step(armed.token).events.clone()
        };
        guard = lock_recover(&shared.slot);
        // Step events join the same queue the caller's start events use, so
        // the subscriber sees one totally ordered stream.
        guard.queued_events.extend(events);
    }
}

fn deliver(subscriber: &mut Option<RevealSubscriber>, events: &[RevealEvent]) {
    if let Some(cb) = subscriber.as_mut() {
        for event in events {
            cb(event);
        }
    }
}

fn wait<'a>(
    shared: &'a SharedSlot,
    guard: MutexGuard<'a, TimerSlot>,
) -> MutexGuard<'a, TimerSlot> {
    match shared.cv.wait(guard) {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn wait_timeout<'a>(
    shared: &'a SharedSlot,
    guard: MutexGuard<'a, TimerSlot>,
    timeout: Duration,
) -> MutexGuard<'a, TimerSlot> {
    match shared.cv.wait_timeout(guard, timeout) {
        Ok((guard, _)) => guard,
        Err(poisoned) => poisoned.into_inner().0,
    }
}
