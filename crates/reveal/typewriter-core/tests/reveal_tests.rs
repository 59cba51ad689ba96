use std::time::Duration;

use typewriter_core::{
    LineSequence, ManualScheduler, RevealConfig, RevealEngine, RevealError, RevealEvent,
    RevealPhase,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn engine() -> RevealEngine<ManualScheduler> {
    RevealEngine::new(ManualScheduler::new())
}

/// Fire due steps until the run is done (or `max` steps have run), returning
/// how many steps were applied.
fn drive_to_done(eng: &mut RevealEngine<ManualScheduler>, max: usize) -> usize {
    let mut steps = 0;
    while steps < max && !eng.is_done() {
        let token = match eng.scheduler_mut().fire_next() {
            Some(t) => t,
            None => break,
        };
        eng.step(token);
        steps += 1;
    }
    steps
}

/// it should reach Done in exactly (total chars + line count) steps and
/// reconstruct join(lines, "\n") + "\n"
#[test]
fn termination_and_reconstruction() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays("Hello world. Bye.", 0.0, 0.0))
        .unwrap();

    let lines = eng.lines().expect("run started").clone();
    let steps = drive_to_done(&mut eng, 1000);
    assert_eq!(steps, lines.total_steps());
    assert_eq!(steps, (11 + 3) + 2);
    assert!(eng.is_done());
    assert_eq!(eng.buffer(), "Hello world\nBye\n");
    assert_eq!(eng.buffer(), lines.final_buffer());
}

/// it should grow the buffer through the exact discrete sequence
/// "" -> "A" -> "A\n" -> "A\nB" -> "A\nB\n" even at zero delay
#[test]
fn zero_delay_keeps_steps_discrete() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays("A.B", 0.0, 0.0)).unwrap();

    let mut seen = vec![eng.buffer().to_string()];
    while let Some(token) = eng.scheduler_mut().fire_next() {
        eng.step(token);
        seen.push(eng.buffer().to_string());
    }
    assert_eq!(seen, vec!["", "A", "A\n", "A\nB", "A\nB\n"]);
    assert!(eng.is_done());
}

/// it should schedule typingSpeed before each character and the line-break
/// step, and lineDelay before the next line's first character
#[test]
fn delay_placement_follows_step_kind() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays("A.B", 10.0, 5.0)).unwrap();

    // First character armed at typingSpeed.
    assert_eq!(eng.scheduler().next_due(), Some(ms(10)));
    let t = eng.scheduler_mut().fire_next().unwrap();
    eng.step(t); // "A"
    assert_eq!(eng.buffer(), "A");

    // Line-break step also follows typingSpeed.
    assert_eq!(eng.scheduler().next_due(), Some(ms(20)));
    let t = eng.scheduler_mut().fire_next().unwrap();
    eng.step(t); // "A\n"
    assert_eq!(eng.buffer(), "A\n");

    // Next line's first character waits out lineDelay.
    assert_eq!(eng.scheduler().next_due(), Some(ms(25)));
    let t = eng.scheduler_mut().fire_next().unwrap();
    eng.step(t); // "A\nB"
    assert_eq!(eng.buffer(), "A\nB");

    assert_eq!(eng.scheduler().next_due(), Some(ms(35)));
    let t = eng.scheduler_mut().fire_next().unwrap();
    eng.step(t); // "A\nB\n" -> done
    assert!(eng.is_done());
    assert_eq!(eng.scheduler().pending(), 0);
}

/// it should keep the buffer monotonically non-decreasing within a run
#[test]
fn buffer_is_monotonic() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays(
        "Systems move slowly. Text reveals quickly. Done.",
        1.0,
        2.0,
    ))
    .unwrap();

    let mut last = String::new();
    while let Some(token) = eng.scheduler_mut().fire_next() {
        eng.step(token);
        assert!(eng.buffer().len() >= last.len());
        assert!(eng.buffer().starts_with(&last));
        last = eng.buffer().to_string();
    }
    assert!(eng.is_done());
}

/// it should keep exactly one step armed from start until Done
#[test]
fn one_pending_step_at_a_time() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays("ab. cd.", 1.0, 1.0)).unwrap();

    while !eng.is_done() {
        assert_eq!(eng.scheduler().pending(), 1);
        let token = eng.scheduler_mut().fire_next().expect("armed step");
        eng.step(token);
    }
    assert_eq!(eng.scheduler().pending(), 0);
}

/// it should treat punctuation-only text as an immediately-done empty run
#[test]
fn empty_line_sequence_is_immediately_done() {
    let mut eng = engine();
    let out = eng.start(RevealConfig::with_delays("...  .", 10.0, 10.0)).unwrap();
    let events = out.events.clone();

    assert!(matches!(events[0], RevealEvent::RunStarted { lines: 0, .. }));
    assert!(matches!(events[1], RevealEvent::RunCompleted { .. }));
    assert!(eng.is_done());
    assert_eq!(eng.buffer(), "");
    assert_eq!(eng.scheduler().pending(), 0);
}

/// it should reject negative delays synchronously and leave the previous
/// run's buffer untouched
#[test]
fn invalid_configuration_rejected_without_side_effects() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays("Old text.", 0.0, 0.0)).unwrap();
    drive_to_done(&mut eng, 100);
    assert_eq!(eng.buffer(), "Old text\n");
    let prior_run = eng.current_run();

    let err = eng
        .start(RevealConfig::with_delays("New text.", -1.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, RevealError::InvalidConfiguration { .. }));

    // No partial run began: buffer, run identity and phase are unchanged.
    assert_eq!(eng.buffer(), "Old text\n");
    assert_eq!(eng.current_run(), prior_run);
    assert!(eng.is_done());
    assert_eq!(eng.scheduler().pending(), 0);
}

/// it should reset the buffer and recompute lines on a mid-run restart,
/// and drop the superseded run's queued step
#[test]
fn restart_mid_run_discards_prior_progress() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays("abcdef.", 10.0, 10.0)).unwrap();

    // Reveal two characters of the first run.
    for _ in 0..2 {
        let token = eng.scheduler_mut().fire_next().unwrap();
        eng.step(token);
    }
    assert_eq!(eng.buffer(), "ab");

    // The next step is already due at the host when the restart lands.
    let stale = eng.scheduler_mut().fire_next().unwrap();

    eng.start(RevealConfig::with_delays("Z.", 0.0, 0.0)).unwrap();
    assert_eq!(eng.buffer(), "");

    // The stale delivery must not touch the fresh run.
    eng.step(stale);
    assert_eq!(eng.buffer(), "");

    drive_to_done(&mut eng, 100);
    assert_eq!(eng.buffer(), "Z\n");
}

/// it should guarantee no buffer mutation after cancel, even for a step
/// that was already queued when cancel was invoked
#[test]
fn cancel_is_airtight_against_queued_steps() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays("abc.", 5.0, 5.0)).unwrap();

    let token = eng.scheduler_mut().fire_next().unwrap();
    eng.step(token);
    assert_eq!(eng.buffer(), "a");

    // Host already popped the timer callback for the next step...
    let queued = eng.scheduler_mut().fire_next().unwrap();
    // ...when cancel arrives.
    eng.cancel();

    eng.step(queued);
    assert_eq!(eng.buffer(), "a");
    assert_eq!(eng.scheduler().pending(), 0);

    // Waiting longer than any configured delay changes nothing either.
    assert!(eng.scheduler_mut().advance(ms(1000)).is_empty());
    assert_eq!(eng.buffer(), "a");
}

/// it should make cancel a no-op when nothing is pending
#[test]
fn cancel_without_pending_step_is_safe() {
    let mut eng = engine();
    eng.cancel();
    assert_eq!(eng.phase(), RevealPhase::Idle);

    eng.start(RevealConfig::with_delays("a.", 0.0, 0.0)).unwrap();
    drive_to_done(&mut eng, 10);
    eng.cancel();
    eng.cancel();
    assert_eq!(eng.buffer(), "a\n");
}

/// it should report Idle before the first start, Revealing during a run,
/// and Done afterwards
#[test]
fn phase_transitions() {
    let mut eng = engine();
    assert_eq!(eng.phase(), RevealPhase::Idle);
    assert_eq!(eng.phase().name(), "idle");
    assert_eq!(eng.buffer(), "");

    eng.start(RevealConfig::with_delays("Hi.", 1.0, 1.0)).unwrap();
    assert!(eng.phase().is_revealing());

    drive_to_done(&mut eng, 100);
    assert!(eng.phase().is_done());
}

/// it should emit RunStarted, per-step events in order, then RunCompleted
#[test]
fn event_stream_order() {
    let mut eng = engine();
    let mut events = eng
        .start(RevealConfig::with_delays("Hi.", 0.0, 0.0))
        .unwrap()
        .events
        .clone();
    while let Some(token) = eng.scheduler_mut().fire_next() {
        events.extend(eng.step(token).events.iter().cloned());
    }

    let run = eng.current_run().unwrap();
    assert_eq!(
        events,
        vec![
            RevealEvent::RunStarted { run, lines: 1 },
            RevealEvent::CharRevealed {
                run,
                line: 0,
                ch: 'H'
            },
            RevealEvent::CharRevealed {
                run,
                line: 0,
                ch: 'i'
            },
            RevealEvent::LineCompleted { run, line: 0 },
            RevealEvent::RunCompleted { run },
        ]
    );
}

/// it should reveal multi-byte text one character per step
#[test]
fn unicode_reveals_per_character() {
    let mut eng = engine();
    eng.start(RevealConfig::with_delays("Héllo wörld. Ça va", 0.0, 0.0))
        .unwrap();

    let lines = eng.lines().unwrap().clone();
    let steps = drive_to_done(&mut eng, 1000);
    assert_eq!(steps, lines.total_steps());
    assert_eq!(eng.buffer(), "Héllo wörld\nÇa va\n");
}

/// it should run fixture configurations end to end
#[test]
fn fixture_configs_drive_runs() {
    let raw = typewriter_test_fixtures::configs::json("hero-intro").unwrap();
    let cfg = typewriter_core::parse_reveal_config_json(&raw).unwrap();

    let mut eng = engine();
    eng.start(cfg.clone()).unwrap();
    drive_to_done(&mut eng, 10_000);
    assert_eq!(eng.buffer(), LineSequence::from_text(&cfg.text).final_buffer());
}

/// it should reject the invalid fixture configuration at the boundary
#[test]
fn invalid_fixture_config_is_rejected() {
    let raw = typewriter_test_fixtures::configs::json("negative-speed").unwrap();
    let err = typewriter_core::parse_reveal_config_json(&raw).unwrap_err();
    assert!(matches!(err, RevealError::InvalidConfiguration { .. }));
}

/// it should behave identically across engines given the same inputs
#[test]
fn determinism_same_sequence_same_outputs() {
    let cfg = RevealConfig::with_delays("Same in. Same out.", 3.0, 7.0);
    let mut e1 = engine();
    let mut e2 = engine();
    e1.start(cfg.clone()).unwrap();
    e2.start(cfg).unwrap();

    loop {
        let t1 = e1.scheduler_mut().fire_next();
        let t2 = e2.scheduler_mut().fire_next();
        assert_eq!(t1.is_some(), t2.is_some());
        let (Some(t1), Some(t2)) = (t1, t2) else { break };
        let j1 = serde_json::to_string(e1.step(t1)).unwrap();
        let j2 = serde_json::to_string(e2.step(t2)).unwrap();
        assert_eq!(j1, j2);
        assert_eq!(e1.buffer(), e2.buffer());
    }
    assert!(e1.is_done() && e2.is_done());
}
