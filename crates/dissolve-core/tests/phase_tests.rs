// Host-side tests for the trip phase scheduler.

use dissolve_core::*;

fn started() -> TripPhaseScheduler {
    let mut s = TripPhaseScheduler::new();
    s.start(0.0);
    s
}

#[test]
fn start_enters_onset_blending_in_from_comedown() {
    let mut s = started();
    let st = s.update(0.0);
    assert_eq!(st.kind, PhaseKind::Onset);
    assert_eq!(st.name, "onset");
    assert!(st.progress.abs() < 1e-6);
    // sin(0) = 0, so no oscillation term
    assert!((st.intensity - 0.4).abs() < 1e-6, "got {}", st.intensity);
    assert!(st.hue.abs() < 1e-6);
    assert!((st.time_remaining_sec - 180.0).abs() < 1e-9);
}

#[test]
fn progress_is_monotonic_within_a_phase() {
    let mut s = started();
    let mut prev = -1.0f32;
    for t in 0..180 {
        let st = s.update(t as f64);
        assert_eq!(s.current_index(), 0, "advanced early at t={t}");
        assert!(st.progress >= prev, "progress went backwards at t={t}");
        prev = st.progress;
    }
    assert!((s.current_phase(90.0).progress - 0.5).abs() < 1e-6);
}

#[test]
fn intensity_blends_between_neighbors() {
    let s = started();
    assert!((s.blended_intensity(0.0) - 0.4).abs() < 1e-6, "ease-in starts at previous phase");
    assert!((s.blended_intensity(0.05) - 0.35).abs() < 1e-6);
    assert!((s.blended_intensity(0.5) - 0.3).abs() < 1e-6, "holds base in the middle");
    assert!((s.blended_intensity(1.0) - 1.0).abs() < 1e-6, "ease-out ends at next phase");
}

#[test]
fn intensity_and_hue_stay_in_range() {
    let mut s = started();
    for i in 0..2000 {
        let st = s.update(i as f64 * 0.7);
        assert!((0.0..=1.0).contains(&st.intensity), "intensity {} out of range", st.intensity);
        assert!((0.0..1.0).contains(&st.hue), "hue {} out of range", st.hue);
        assert!((0.0..=1.0).contains(&st.progress));
    }
}

#[test]
fn advances_when_duration_elapses() {
    let mut s = started();
    s.update(179.9);
    assert_eq!(s.current_index(), 0);
    let st = s.update(180.0);
    assert_eq!(s.current_index(), 1);
    assert_eq!(st.kind, PhaseKind::Peak);
    assert!((s.phase_start_sec() - 180.0).abs() < 1e-9);
    assert!(st.progress.abs() < 1e-6);
}

#[test]
fn long_stall_advances_one_phase_per_update() {
    let mut s = started();
    s.update(10_000.0);
    assert_eq!(s.current_index(), 1);
    assert!((s.phase_start_sec() - 10_000.0).abs() < 1e-9);
    s.update(10_000.0);
    assert_eq!(s.current_index(), 1, "new phase starts fresh");
}

#[test]
fn wraps_from_comedown_to_onset() {
    let mut s = started();
    s.skip_to_phase(3, 0.0);
    s.update(180.0);
    assert_eq!(s.current_index(), 0);
}

#[test]
fn pause_freezes_elapsed_time() {
    let mut s = started();
    s.update(50.0);
    assert!(s.pause(50.0));
    s.update(500.0);
    assert_eq!(s.current_index(), 0, "must not advance while paused");
    assert!((s.current_phase(500.0).progress - 50.0 / 180.0).abs() < 1e-6);

    assert!(!s.pause(500.0));
    assert!((s.elapsed_sec(510.0) - 60.0).abs() < 1e-9);
    s.update(629.0);
    assert_eq!(s.current_index(), 0);
    s.update(630.0);
    assert_eq!(s.current_index(), 1);
}

#[test]
fn pausing_twice_restores_state() {
    let mut s = started();
    s.pause(10.0);
    s.pause(10.0);
    assert!(!s.is_paused());
    assert!((s.phase_start_sec()).abs() < 1e-9, "pause never rewrites phase start");
    assert!((s.elapsed_sec(20.0) - 20.0).abs() < 1e-9);
}

#[test]
fn skip_to_phase_resets_start() {
    let mut s = started();
    s.skip_to_phase(2, 42.0);
    assert_eq!(s.current_index(), 2);
    assert!((s.phase_start_sec() - 42.0).abs() < 1e-9);
    assert!(s.current_phase(42.0).progress.abs() < 1e-6);
}

#[test]
fn skip_out_of_range_is_ignored() {
    let mut s = started();
    s.update(30.0);
    s.skip_to_phase(4, 35.0);
    assert_eq!(s.current_index(), 0);
    assert!(s.phase_start_sec().abs() < 1e-9);
}

#[test]
fn phase_info_rounds_remaining_up() {
    let s = started();
    let info = s.phase_info(45.5);
    assert_eq!(info.current, 1);
    assert_eq!(info.total, 4);
    assert_eq!(info.name, "onset");
    assert!((info.progress - 45.5 / 180.0).abs() < 1e-6);
    assert_eq!(info.time_remaining_sec, 135);
}

#[test]
fn inactive_scheduler_never_advances() {
    let mut s = TripPhaseScheduler::new();
    s.update(1_000.0);
    assert!(!s.is_active());
    assert_eq!(s.current_index(), 0);

    let mut s = started();
    s.stop(10.0);
    s.update(1_000.0);
    assert_eq!(s.current_index(), 0);
}

#[test]
fn stop_while_paused_keeps_the_frozen_position() {
    let mut s = started();
    s.pause(50.0);
    let frozen = s.current_phase(500.0);
    assert!((frozen.progress - 50.0 / 180.0).abs() < 1e-6);
    assert!((frozen.time_remaining_sec - 130.0).abs() < 1e-9);

    s.stop(500.0);
    assert!(!s.is_paused());
    let st = s.update(500.0);
    assert_eq!(s.current_index(), 0);
    assert!((st.progress - frozen.progress).abs() < 1e-6, "got {}", st.progress);
    assert!((st.time_remaining_sec - 130.0).abs() < 1e-9);
}

#[test]
fn stop_clears_a_pause_set_before_start() {
    let mut s = TripPhaseScheduler::new();
    s.pause(1.0);
    assert!(s.is_paused());
    s.stop(2.0);
    assert!(!s.is_paused());
}

#[test]
fn empty_table_falls_back_to_builtin() {
    let s = TripPhaseScheduler::with_phases(Vec::new());
    assert_eq!(s.phases(), &TRIP_PHASES[..]);
}

#[test]
fn zero_duration_phase_reports_full_progress_and_advances() {
    let phases = vec![
        Phase {
            kind: PhaseKind::Onset,
            duration_sec: 0.0,
            base_intensity: 0.2,
            description: "instant",
        },
        Phase {
            kind: PhaseKind::Peak,
            duration_sec: 10.0,
            base_intensity: 0.8,
            description: "short",
        },
    ];
    let mut s = TripPhaseScheduler::with_phases(phases);
    s.start(0.0);
    assert!((s.current_phase(0.0).progress - 1.0).abs() < 1e-6);
    s.update(0.0);
    assert_eq!(s.current_index(), 1);
}
