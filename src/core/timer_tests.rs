// Author: Dustin Pilgrim
// License: MIT

use crate::core::store::{keys, MemoryStore, SettingsStore};
use crate::core::timer::{Phase, SittingTimer};

const T0: f64 = 1_700_000_000.0;

fn fresh_timer(now: f64) -> SittingTimer {
    SittingTimer::load(Box::new(MemoryStore::new()), now)
}

fn check_phase_invariant(timer: &SittingTimer) {
    // Running => session_start set; Paused/Idle => session_start cleared.
    match timer.phase() {
        Phase::Running => assert!(timer.session_start().is_some()),
        Phase::Paused | Phase::Idle => assert!(timer.session_start().is_none()),
    }
}

#[test]
fn first_launch_starts_a_fresh_running_session() {
    let timer = fresh_timer(T0);
    assert_eq!(timer.phase(), Phase::Running);
    assert_eq!(timer.displayed_elapsed(), 0);
    check_phase_invariant(&timer);
}

#[test]
fn elapsed_counts_up_while_running() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 70.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 70);
    assert_eq!(timer.phase(), Phase::Running);
}

#[test]
fn elapsed_never_negative_even_with_future_session_start() {
    let mut store = MemoryStore::new();
    store.set_str(keys::STATE, "running");
    store.set_f64(keys::SESSION_START, T0 + 10_000.0);

    let mut timer = SittingTimer::load(Box::new(store), T0);
    assert_eq!(timer.displayed_elapsed(), 0);

    timer.tick(T0 + 1.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 0);
}

#[test]
fn pause_then_start_preserves_elapsed() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 70.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 70);

    timer.pause();
    assert_eq!(timer.phase(), Phase::Paused);
    assert_eq!(timer.displayed_elapsed(), 70);
    check_phase_invariant(&timer);

    // Paused elapsed holds across ticks.
    timer.tick(T0 + 500.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 70);

    timer.start(T0 + 500.0);
    assert_eq!(timer.phase(), Phase::Running);
    check_phase_invariant(&timer);

    timer.tick(T0 + 501.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 71);
}

#[test]
fn start_while_running_is_a_no_op() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 30.0, Some(0.0));
    timer.start(T0 + 30.0);
    timer.tick(T0 + 31.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 31);
}

#[test]
fn pause_while_paused_is_a_no_op() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 40.0, Some(0.0));
    timer.pause();
    timer.pause();
    assert_eq!(timer.displayed_elapsed(), 40);
    assert_eq!(timer.phase(), Phase::Paused);
}

#[test]
fn reset_while_running_zeroes_elapsed_but_keeps_running() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 300.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 300);

    timer.reset(T0 + 300.0);
    assert_eq!(timer.phase(), Phase::Running);
    assert_eq!(timer.displayed_elapsed(), 0);

    timer.tick(T0 + 305.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 5);
}

#[test]
fn reset_while_paused_zeroes_the_frozen_value() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 120.0, Some(0.0));
    timer.pause();
    timer.reset(T0 + 120.0);

    assert_eq!(timer.phase(), Phase::Paused);
    assert_eq!(timer.displayed_elapsed(), 0);

    timer.start(T0 + 200.0);
    timer.tick(T0 + 210.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 10);
}

#[test]
fn idle_transition_freezes_elapsed() {
    let mut timer = fresh_timer(T0);
    timer.update_idle_reset(300);

    timer.tick(T0 + 600.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 600);

    timer.tick(T0 + 601.0, Some(301.0));
    assert_eq!(timer.phase(), Phase::Idle);
    // Frozen, not reset to zero.
    assert_eq!(timer.displayed_elapsed(), 600);
    assert_eq!(timer.idle_seconds(), 301);
    check_phase_invariant(&timer);
}

#[test]
fn resume_from_idle_begins_a_new_session() {
    let mut timer = fresh_timer(T0);
    timer.update_idle_reset(300);

    timer.tick(T0 + 600.0, Some(301.0));
    assert_eq!(timer.phase(), Phase::Idle);

    timer.tick(T0 + 900.0, Some(0.0));
    assert_eq!(timer.phase(), Phase::Running);
    assert_eq!(timer.displayed_elapsed(), 0);
    check_phase_invariant(&timer);

    timer.tick(T0 + 910.0, Some(0.0));
    assert_eq!(timer.displayed_elapsed(), 10);
}

#[test]
fn idle_never_interrupts_an_explicit_pause() {
    let mut timer = fresh_timer(T0);
    timer.update_idle_reset(300);

    timer.tick(T0 + 100.0, Some(0.0));
    timer.pause();

    timer.tick(T0 + 1000.0, Some(500.0));
    assert_eq!(timer.phase(), Phase::Paused);
    assert_eq!(timer.displayed_elapsed(), 100);
    // Idle is still measured while paused, it just has no transition effect.
    assert_eq!(timer.idle_seconds(), 500);
}

#[test]
fn unknown_idle_reading_keeps_previous_value() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 1.0, Some(42.0));
    assert_eq!(timer.idle_seconds(), 42);

    timer.tick(T0 + 2.0, None);
    assert_eq!(timer.idle_seconds(), 42);
    assert_eq!(timer.phase(), Phase::Running);
}

#[test]
fn simulate_idle_forces_the_transition_deterministically() {
    let mut timer = fresh_timer(T0);
    timer.update_idle_reset(300);
    timer.set_simulate_idle(true);

    timer.tick(T0 + 10.0, Some(0.0));
    assert_eq!(timer.phase(), Phase::Idle);
    assert_eq!(timer.idle_seconds(), 301);

    // Turning it off lets real (low) idle resume a session.
    timer.set_simulate_idle(false);
    timer.tick(T0 + 20.0, Some(0.0));
    assert_eq!(timer.phase(), Phase::Running);
}

#[test]
fn thresholds_are_clamped_to_minimums() {
    let mut timer = fresh_timer(T0);
    let t = timer.update_thresholds(10, 20);
    assert_eq!(t.yellow, 60);
    assert_eq!(t.red, 120);

    let t = timer.update_thresholds(600, 500);
    assert_eq!(t.yellow, 600);
    assert_eq!(t.red, 660);
}

#[test]
fn idle_reset_is_clamped_to_a_minute() {
    let mut timer = fresh_timer(T0);
    assert_eq!(timer.update_idle_reset(5), 60);
    assert_eq!(timer.update_idle_reset(900), 900);
}

#[test]
fn fast_forward_while_running_jumps_immediately() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 10.0, Some(0.0));

    timer.fast_forward(T0 + 10.0, 900);
    assert_eq!(timer.displayed_elapsed(), 910);
    assert_eq!(timer.phase(), Phase::Running);
}

#[test]
fn fast_forward_while_paused_floors_at_zero() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 100.0, Some(0.0));
    timer.pause();

    timer.fast_forward(T0 + 100.0, -500);
    assert_eq!(timer.displayed_elapsed(), 0);

    timer.fast_forward(T0 + 100.0, 60);
    assert_eq!(timer.displayed_elapsed(), 60);
}

#[test]
fn fast_forward_while_idle_is_a_no_op() {
    let mut timer = fresh_timer(T0);
    timer.update_idle_reset(300);
    timer.tick(T0 + 50.0, Some(301.0));
    assert_eq!(timer.phase(), Phase::Idle);

    timer.fast_forward(T0 + 50.0, 900);
    assert_eq!(timer.displayed_elapsed(), 50);
}

// ---------------- restart reconstruction ----------------

#[test]
fn restart_reconstructs_a_running_session() {
    let mut store = MemoryStore::new();
    store.set_str(keys::STATE, "running");
    store.set_f64(keys::SESSION_START, T0);

    let timer = SittingTimer::load(Box::new(store), T0 + 50.0);
    assert_eq!(timer.phase(), Phase::Running);
    assert_eq!(timer.displayed_elapsed(), 50);
}

#[test]
fn restart_running_without_session_start_recovers_fresh() {
    let mut store = MemoryStore::new();
    store.set_str(keys::STATE, "running");

    let timer = SittingTimer::load(Box::new(store), T0);
    assert_eq!(timer.phase(), Phase::Running);
    assert_eq!(timer.displayed_elapsed(), 0);
    assert_eq!(timer.session_start(), Some(T0));
    // The synthesized start is persisted immediately.
    assert_eq!(timer.store().get_f64(keys::SESSION_START), Some(T0));
}

#[test]
fn restart_reconstructs_a_paused_session() {
    let mut store = MemoryStore::new();
    store.set_str(keys::STATE, "paused");
    store.set_i64(keys::PAUSED_ELAPSED, 1234);

    let timer = SittingTimer::load(Box::new(store), T0);
    assert_eq!(timer.phase(), Phase::Paused);
    assert_eq!(timer.displayed_elapsed(), 1234);
}

#[test]
fn restart_in_idle_shows_zero() {
    let mut store = MemoryStore::new();
    store.set_str(keys::STATE, "idle");

    let timer = SittingTimer::load(Box::new(store), T0);
    assert_eq!(timer.phase(), Phase::Idle);
    assert_eq!(timer.displayed_elapsed(), 0);
}

#[test]
fn corrupt_state_string_falls_back_to_running() {
    let mut store = MemoryStore::new();
    store.set_str(keys::STATE, "definitely-not-a-phase");

    let timer = SittingTimer::load(Box::new(store), T0);
    assert_eq!(timer.phase(), Phase::Running);
    check_phase_invariant(&timer);
}

#[test]
fn persisted_thresholds_are_clamped_on_load() {
    let mut store = MemoryStore::new();
    store.set_i64(keys::YELLOW_THRESHOLD, 1);
    store.set_i64(keys::RED_THRESHOLD, 2);
    store.set_i64(keys::IDLE_RESET_SECONDS, 3);

    let timer = SittingTimer::load(Box::new(store), T0);
    assert_eq!(timer.thresholds().yellow, 60);
    assert_eq!(timer.thresholds().red, 120);
    assert_eq!(timer.idle_reset_seconds(), 60);
}

#[test]
fn mutations_are_persisted_before_being_observable() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 70.0, Some(0.0));
    timer.pause();

    assert_eq!(timer.store().get_str(keys::STATE).as_deref(), Some("paused"));
    assert_eq!(timer.store().get_i64(keys::PAUSED_ELAPSED), Some(70));
    assert_eq!(timer.store().get_f64(keys::SESSION_START), None);

    timer.start(T0 + 100.0);
    assert_eq!(timer.store().get_str(keys::STATE).as_deref(), Some("running"));
    // Back-dated start preserves continuity in the persisted value too.
    assert_eq!(timer.store().get_f64(keys::SESSION_START), Some(T0 + 30.0));
}

#[test]
fn full_restart_cycle_survives_pause() {
    // Run 70s, pause, "crash", reload: still paused at 70.
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 70.0, Some(0.0));
    timer.pause();

    let mut persisted = MemoryStore::new();
    persisted.set_str(keys::STATE, timer.store().get_str(keys::STATE).unwrap().as_str());
    persisted.set_i64(
        keys::PAUSED_ELAPSED,
        timer.store().get_i64(keys::PAUSED_ELAPSED).unwrap(),
    );

    let reloaded = SittingTimer::load(Box::new(persisted), T0 + 9999.0);
    assert_eq!(reloaded.phase(), Phase::Paused);
    assert_eq!(reloaded.displayed_elapsed(), 70);
}

#[test]
fn tooltip_renders_compact_elapsed_and_idle_minutes() {
    let mut timer = fresh_timer(T0);
    timer.tick(T0 + 4500.0, Some(120.0));
    assert_eq!(timer.tooltip(), "Sitting: 1h15m \u{2022} Idle: 2m");
}
