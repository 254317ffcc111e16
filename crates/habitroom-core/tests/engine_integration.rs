//! Integration tests for the pomodoro, habit and notification engines.
//!
//! Scenarios run through the public `Dashboard` and `Simulator` APIs;
//! countdown invariants are checked with proptest over random command
//! sequences.

use chrono::{DateTime, Duration, Local, TimeZone};
use habitroom_core::{
    Dashboard, Event, Habit, Intent, ManualClock, Phase, PomodoroSession, SequenceSampler,
    Severity, Simulator, BREAK_DURATION_SECS, FOCUS_DURATION_SECS,
};
use proptest::prelude::*;

fn local(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 1, 5, h, m, s).unwrap()
}

fn quiet_sampler() -> SequenceSampler {
    SequenceSampler::new(vec![0.99])
}

fn reminder_habits(events: &[Event]) -> Vec<Habit> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::ReminderDue { habit, .. } => Some(*habit),
            _ => None,
        })
        .collect()
}

#[test]
fn scenario_full_focus_session() {
    let mut sim = Simulator::new(local(13, 0, 0), quiet_sampler());
    sim.apply(Intent::Start).unwrap();
    let events = sim.advance(Duration::seconds(FOCUS_DURATION_SECS as i64));

    let session = sim.dashboard().session();
    assert_eq!(session.phase(), Phase::Break);
    assert!(!session.is_running());
    assert_eq!(session.remaining_secs(), BREAK_DURATION_SECS);
    assert_eq!(session.completed_focus_count(), 1);

    let successes = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                Event::NotificationPosted {
                    severity: Severity::Success,
                    ..
                }
            )
        })
        .count();
    assert_eq!(successes, 1);
}

#[test]
fn scenario_water_reminder_after_an_hour_from_last_glass() {
    let clock = ManualClock::new(local(7, 0, 0));
    let mut dash = Dashboard::new(clock.clone(), quiet_sampler());

    for offset in [0, 100, 200] {
        clock.set(local(7, 0, 0) + Duration::seconds(offset));
        dash.log_water();
    }
    assert_eq!(dash.habits().water().count(), 3);
    assert_eq!(
        dash.habits().water().last_logged_at(),
        Some(local(7, 0, 0) + Duration::seconds(200))
    );

    clock.set(local(7, 0, 0) + Duration::seconds(3799));
    assert!(reminder_habits(&dash.run_reminders()).is_empty());

    clock.set(local(7, 0, 0) + Duration::seconds(3800));
    assert_eq!(reminder_habits(&dash.run_reminders()), [Habit::Water]);
}

#[test]
fn scenario_medicine_taken_before_nine_suppresses_reminder() {
    let clock = ManualClock::new(local(8, 30, 0));
    let mut dash = Dashboard::new(clock.clone(), quiet_sampler());
    dash.take_medicine();

    clock.set(local(9, 0, 0));
    assert!(reminder_habits(&dash.run_reminders()).is_empty());
}

#[test]
fn medicine_reminder_fires_once_across_a_simulated_morning() {
    let mut sim = Simulator::new(local(8, 0, 30), quiet_sampler());
    let events = sim.advance(Duration::hours(2));
    assert_eq!(reminder_habits(&events), [Habit::Medicine]);
}

#[test]
fn walking_nudges_only_inside_daytime_window() {
    // Every sample would trigger a nudge; only the window limits it.
    let mut sim = Simulator::new(local(8, 0, 0), SequenceSampler::new(vec![0.0]));
    let events = sim.advance(Duration::hours(12));
    let walks = reminder_habits(&events)
        .into_iter()
        .filter(|h| *h == Habit::Walking)
        .count();
    // 10:00 through 18:59, one check per minute.
    assert_eq!(walks, 9 * 60);
}

#[test]
fn walking_done_stops_nudges() {
    let mut sim = Simulator::new(local(11, 0, 0), SequenceSampler::new(vec![0.0]));
    sim.apply(Intent::CompleteWalk).unwrap();
    let events = sim.advance(Duration::hours(1));
    assert!(reminder_habits(&events).is_empty());
}

#[test]
fn notification_present_until_exactly_five_seconds() {
    let mut sim = Simulator::new(local(8, 0, 0), quiet_sampler());
    sim.apply(Intent::LogWater).unwrap();
    assert_eq!(sim.dashboard().notifications().len(), 1);

    sim.advance(Duration::milliseconds(4_999));
    assert_eq!(sim.dashboard().notifications().len(), 1);

    let events = sim.advance(Duration::milliseconds(1));
    assert!(sim.dashboard().notifications().is_empty());
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::NotificationExpired { .. }))
            .count(),
        1
    );
}

#[test]
fn reset_during_break_keeps_count_and_restores_focus() {
    let mut sim = Simulator::new(local(13, 0, 0), quiet_sampler());
    sim.apply(Intent::Start).unwrap();
    sim.advance(Duration::seconds(1500));
    sim.apply(Intent::Start).unwrap();
    sim.advance(Duration::seconds(100));
    sim.apply(Intent::Reset).unwrap();
    sim.advance(Duration::seconds(10));

    let session = sim.dashboard().session();
    assert_eq!(session.phase(), Phase::Focus);
    assert_eq!(session.remaining_secs(), FOCUS_DURATION_SECS);
    assert!(!session.is_running());
    assert_eq!(session.completed_focus_count(), 1);
}

#[derive(Debug, Clone)]
enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    Ticks(u32),
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Pause),
        Just(Command::Toggle),
        Just(Command::Reset),
        (1u32..2000).prop_map(Command::Ticks),
    ]
}

proptest! {
    #[test]
    fn countdown_invariants_hold(commands in proptest::collection::vec(command(), 1..40)) {
        let at = local(12, 0, 0);
        let mut session = PomodoroSession::new();
        let mut focus_completions = 0u32;

        for cmd in commands {
            match cmd {
                Command::Start => { session.start(at); }
                Command::Pause => { session.pause(at); }
                Command::Toggle => { session.toggle(at); }
                Command::Reset => {
                    let before = session.completed_focus_count();
                    session.reset(at);
                    prop_assert_eq!(session.completed_focus_count(), before);
                    prop_assert_eq!(session.phase(), Phase::Focus);
                    prop_assert_eq!(session.remaining_secs(), FOCUS_DURATION_SECS);
                    prop_assert!(!session.is_running());
                }
                Command::Ticks(n) => {
                    for _ in 0..n {
                        let was_running = session.is_running();
                        let before = session.remaining_secs();
                        let phase = session.phase();
                        match session.tick(at) {
                            Some(Event::PhaseCompleted { completed, .. }) => {
                                prop_assert!(was_running);
                                prop_assert_eq!(before, 1);
                                prop_assert_eq!(completed, phase);
                                if completed == Phase::Focus {
                                    focus_completions += 1;
                                }
                            }
                            Some(other) => prop_assert!(false, "unexpected event {:?}", other),
                            None => {
                                let expected = if was_running { before - 1 } else { before };
                                prop_assert_eq!(session.remaining_secs(), expected);
                            }
                        }
                        let max = session.phase().duration_secs();
                        prop_assert!(session.remaining_secs() > 0);
                        prop_assert!(session.remaining_secs() <= max);
                        prop_assert!((0.0..=1.0).contains(&session.progress()));
                    }
                }
            }
            prop_assert_eq!(session.completed_focus_count(), focus_completions);
        }
    }
}
