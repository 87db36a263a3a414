use rolldraw_core::{
    Clock, CopyError, DrawConfig, DrawError, DrawPorts, DrawSession, DrawState, Event,
    ManualClock, Notice, NoopPorts, SpinStep, MAX_PENDING_EVENTS,
};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Default)]
struct RecordingPorts {
    notices: Vec<Notice>,
    frames: Vec<Option<String>>,
    results: Vec<Vec<String>>,
    celebrations: Vec<u32>,
    copied: Vec<String>,
    clipboard_broken: bool,
}

impl DrawPorts for RecordingPorts {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn copy_text(&mut self, text: &str) -> Result<(), CopyError> {
        if self.clipboard_broken {
            return Err(CopyError::Failed("broken".to_string()));
        }
        self.copied.push(text.to_string());
        Ok(())
    }

    fn render_spin_frame(&mut self, name: Option<&str>) {
        self.frames.push(name.map(str::to_string));
    }

    fn render_result(&mut self, result: &[String]) {
        self.results.push(result.to_vec());
    }

    fn celebrate(&mut self, bursts: u32) {
        self.celebrations.push(bursts);
    }
}

const ROSTER: &str = "张三\n李四\n\n张三\n 王五  \n赵六\n钱七\n";

fn session(seed: u64) -> DrawSession<RecordingPorts> {
    let mut session = DrawSession::new(DrawConfig::default(), seed, RecordingPorts::default());
    session.set_raw_text(ROSTER);
    session
}

fn assert_valid_draw(result: &[String], roster: &[String], expected_len: usize) {
    assert_eq!(result.len(), expected_len);
    let unique: HashSet<_> = result.iter().collect();
    assert_eq!(unique.len(), result.len(), "duplicate winner in {result:?}");
    assert!(result.iter().all(|name| roster.contains(name)));
}

#[test]
fn full_draw_spins_for_the_roll_duration_then_reveals() {
    let mut s = session(42);
    s.set_requested(2.0);
    let mut clock = ManualClock::new();
    let result = s.drive(&mut clock).expect("draw").expect("revealed");

    assert_valid_draw(&result, s.candidates().names(), 2);
    assert_eq!(s.state(), DrawState::Revealed);
    assert_eq!(s.result(), result.as_slice());
    assert_eq!(s.history().latest(), Some(result.as_slice()));

    assert!(clock.elapsed() >= Duration::from_millis(2200));
    assert!(clock.elapsed() < Duration::from_millis(2200 + 300));

    let frames = &s.ports().frames;
    assert!(frames.len() >= 8, "only {} frames", frames.len());
    let roster = s.candidates().names().to_vec();
    assert!(frames
        .iter()
        .all(|frame| frame.as_ref().is_some_and(|name| roster.contains(name))));
    assert_eq!(s.ports().celebrations, vec![3]);
    assert!(s.ports().notices.is_empty());
    assert_eq!(s.ports().results.first(), Some(&Vec::new()));
    assert_eq!(s.ports().results.last(), Some(&result));
}

#[test]
fn spin_delays_grow_toward_the_max_tick() {
    let mut s = session(5);
    let mut clock = ManualClock::new();
    let mut ticket = s.request_draw(clock.now()).expect("start");
    let mut gaps = Vec::new();
    loop {
        clock.sleep_until(ticket.wake_at());
        let step = s.resume(&mut ticket, clock.now());
        if step != SpinStep::Continue {
            break;
        }
        gaps.push(ticket.wake_at() - clock.now());
    }
    assert_eq!(gaps.first(), Some(&Duration::from_millis(60)));
    assert!(gaps.windows(2).all(|pair| pair[0] <= pair[1]), "{gaps:?}");
    assert!(gaps.iter().all(|gap| *gap <= Duration::from_millis(300)));
}

#[test]
fn over_request_is_rescoped_with_notice() {
    let mut s = session(1);
    s.set_requested(9.0);
    let result = s
        .drive(&mut ManualClock::new())
        .expect("draw")
        .expect("revealed");
    let available = s.candidates().len();
    assert_eq!(available, 5);
    assert_valid_draw(&result, s.candidates().names(), available);
    assert_eq!(
        s.ports().notices,
        vec![Notice::OverRequest {
            available,
            drawing: available
        }]
    );
}

#[test]
fn fractional_request_is_floored() {
    let mut s = session(8);
    s.set_requested(2.9);
    let result = s
        .drive(&mut ManualClock::new())
        .expect("draw")
        .expect("revealed");
    assert_eq!(result.len(), 2);
}

#[test]
fn empty_roster_is_rejected_with_notice() {
    let mut s = DrawSession::new(DrawConfig::default(), 0, RecordingPorts::default());
    s.set_raw_text(" \n\n  \n");
    let err = s.request_draw(ManualClock::new().now()).expect_err("reject");
    assert_eq!(err, DrawError::EmptyRoster);
    assert_eq!(s.state(), DrawState::Idle);
    assert_eq!(s.ports().notices, vec![Notice::EmptyRoster]);
    assert!(s.ports().frames.is_empty());
}

#[test]
fn non_positive_or_non_finite_counts_are_rejected() {
    for requested in [0.0, -3.0, 0.5, f64::NAN, f64::INFINITY] {
        let mut s = session(0);
        s.set_requested(requested);
        let err = s.drive(&mut ManualClock::new()).expect_err("reject");
        assert_eq!(err, DrawError::InvalidCount, "requested={requested}");
        assert_eq!(s.ports().notices, vec![Notice::InvalidCount]);
        assert_eq!(s.state(), DrawState::Idle);
        assert!(s.history().is_empty());
    }
}

#[test]
fn draw_request_while_rolling_changes_nothing() {
    let mut s = session(77);
    let mut clock = ManualClock::new();
    s.drive(&mut clock).expect("first").expect("revealed");
    let history_before = s.history().clone();

    let mut ticket = s.request_draw(clock.now()).expect("second");
    assert_eq!(s.resume(&mut ticket, clock.now()), SpinStep::Continue);
    let result_before = s.result().to_vec();
    let generation = s.generation();

    let err = s.request_draw(clock.now()).expect_err("re-entrant");
    assert_eq!(err, DrawError::AlreadyRolling);
    assert_eq!(s.result(), result_before.as_slice());
    assert_eq!(s.history(), &history_before);
    assert_eq!(s.generation(), generation);
    assert!(s.ports().notices.is_empty());
    assert!(s.is_rolling());

    match s.run_spin(ticket, &mut clock) {
        SpinStep::Revealed(result) => assert_eq!(s.history().latest(), Some(result.as_slice())),
        other => panic!("unexpected step {other:?}"),
    }
    assert_eq!(s.history().len(), 2);
}

#[test]
fn reset_mid_spin_aborts_without_result() {
    let mut s = session(3);
    s.set_requested(3.0);
    let mut clock = ManualClock::new();
    s.drive(&mut clock).expect("first").expect("revealed");

    let mut ticket = s.request_draw(clock.now()).expect("start");
    for _ in 0..3 {
        clock.sleep_until(ticket.wake_at());
        assert_eq!(s.resume(&mut ticket, clock.now()), SpinStep::Continue);
    }
    assert!(s.spin_name().is_some());
    let celebrations = s.ports().celebrations.len();

    s.reset();
    assert_eq!(s.state(), DrawState::Idle);
    assert_eq!(s.roster().raw_text(), "");
    assert!(s.result().is_empty());
    assert!(s.history().is_empty());
    assert_eq!(s.spin_name(), None);
    assert_eq!(s.requested(), 1.0);
    assert_eq!(s.ports().notices.last(), Some(&Notice::ResetDone));

    clock.advance(Duration::from_secs(5));
    assert_eq!(s.resume(&mut ticket, clock.now()), SpinStep::Aborted);
    assert!(s.result().is_empty());
    assert!(s.history().is_empty());
    assert_eq!(s.ports().celebrations.len(), celebrations);

    // A stale ticket must not drive a newer spin either.
    s.set_raw_text("a\nb\nc");
    let fresh = s.request_draw(clock.now()).expect("fresh");
    assert_ne!(fresh.generation(), ticket.generation());
    assert_eq!(s.resume(&mut ticket, clock.now()), SpinStep::Aborted);
    assert!(s.is_rolling());
    assert!(matches!(s.run_spin(fresh, &mut clock), SpinStep::Revealed(_)));
}

#[test]
fn history_is_capped_most_recent_first() {
    let mut s = session(2024);
    let mut clock = ManualClock::new();
    let mut last = Vec::new();
    for k in 1..=7 {
        last = s.drive(&mut clock).expect("draw").expect("revealed");
        assert_eq!(s.history().len(), k.min(5));
        assert_eq!(s.history().latest(), Some(last.as_slice()));
    }
    assert_eq!(s.history().get(0), Some(last.as_slice()));
    assert_eq!(s.history().iter().count(), 5);
}

#[test]
fn in_flight_draw_uses_the_snapshot_from_request_time() {
    let mut s = DrawSession::new(DrawConfig::default(), 9, RecordingPorts::default());
    s.set_raw_text("A\nB\nC");
    s.set_requested(3.0);
    let mut clock = ManualClock::new();
    let mut ticket = s.request_draw(clock.now()).expect("start");
    s.resume(&mut ticket, clock.now());
    s.set_raw_text("X\nY");
    s.set_dedupe(false);

    let SpinStep::Revealed(mut result) = s.run_spin(ticket, &mut clock) else {
        panic!("spin did not reveal");
    };
    result.sort();
    assert_eq!(result, vec!["A", "B", "C"]);
    assert!(s
        .ports()
        .frames
        .iter()
        .flatten()
        .all(|name| ["A", "B", "C"].contains(&name.as_str())));
}

#[test]
fn early_wake_does_not_advance_the_spin() {
    let mut s = session(4);
    let mut clock = ManualClock::new();
    let mut ticket = s.request_draw(clock.now()).expect("start");
    assert_eq!(s.resume(&mut ticket, clock.now()), SpinStep::Continue);
    let frames = s.ports().frames.len();
    let wake_at = ticket.wake_at();
    clock.advance(Duration::from_millis(10));
    assert!(!ticket.is_due(clock.now()));
    assert_eq!(s.resume(&mut ticket, clock.now()), SpinStep::Continue);
    assert_eq!(s.ports().frames.len(), frames);
    assert_eq!(ticket.wake_at(), wake_at);
}

#[test]
fn zero_duration_reveals_on_first_resume() {
    let config = DrawConfig {
        roll_duration_ms: 0,
        ..DrawConfig::default()
    };
    let mut s = DrawSession::new(config, 6, RecordingPorts::default());
    s.set_raw_text("solo");
    let result = s
        .drive(&mut ManualClock::new())
        .expect("draw")
        .expect("revealed");
    assert_eq!(result, vec!["solo"]);
    assert!(s.ports().frames.is_empty());
}

#[test]
fn same_seed_reproduces_frames_and_winners() {
    let run = |seed| {
        let mut s = session(seed);
        s.set_requested(3.0);
        let result = s.drive(&mut ManualClock::new()).expect("draw");
        (result, s.ports().frames.clone())
    };
    assert_eq!(run(123), run(123));
}

#[test]
fn copy_reports_through_notices() {
    let mut s = session(10);
    assert_eq!(s.copy_result(), Err(CopyError::Empty));
    assert_eq!(s.ports().notices, vec![Notice::NothingToCopy]);

    s.set_requested(2.0);
    let result = s
        .drive(&mut ManualClock::new())
        .expect("draw")
        .expect("revealed");
    assert_eq!(s.copy_result(), Ok(()));
    assert_eq!(s.ports().copied, vec![result.join("\n")]);
    assert_eq!(s.ports().notices.last(), Some(&Notice::Copied));

    s.ports_mut().clipboard_broken = true;
    assert!(matches!(s.copy_result(), Err(CopyError::Failed(_))));
    assert_eq!(s.ports().notices.last(), Some(&Notice::CopyFailed));
}

#[test]
fn events_trace_the_session() {
    let mut s = session(12);
    s.drive(&mut ManualClock::new()).expect("draw");
    s.reset();
    let events: Vec<_> = s.drain_events().collect();
    assert!(matches!(events.first(), Some(Event::DrawStarted { drawing: 1, .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::DrawRevealed { winners, .. } if winners.len() == 1)));
    assert_eq!(events.last(), Some(&Event::SessionReset));
    assert_eq!(s.drain_events().count(), 0);
}

#[test]
fn preset_load_replaces_roster_and_notifies() {
    let mut s = session(0);
    s.load_roster("Team", "a\nb\n");
    assert_eq!(s.candidates().names(), ["a", "b"]);
    assert_eq!(
        s.ports().notices,
        vec![Notice::PresetLoaded {
            name: "Team".to_string()
        }]
    );
}

#[test]
fn pending_events_stay_bounded_across_many_draws() {
    let mut s = DrawSession::new(DrawConfig::default(), 21, NoopPorts);
    s.set_raw_text(ROSTER);
    let mut clock = ManualClock::new();
    for _ in 0..1_000 {
        s.drive(&mut clock).expect("draw").expect("revealed");
    }
    let events: Vec<_> = s.drain_events().collect();
    assert_eq!(events.len(), MAX_PENDING_EVENTS);
    assert!(matches!(events.last(), Some(Event::DrawRevealed { .. })));
}
