use super::*;

#[test]
fn single_clock_reports_progress_phase() {
    let clock = PhaseClock::single(4000.0);
    assert_eq!(clock.current_phase(), PROGRESS_PHASE);
    assert_eq!(clock.duration(), 4000.0);
    assert!(!clock.is_complete());
}

#[test]
fn progress_follows_time_and_clamps() {
    let mut clock = PhaseClock::single(4000.0);
    clock.advance(0.0);
    assert_eq!(clock.progress(), 0.0);
    clock.advance(2000.0);
    assert_eq!(clock.progress(), 0.5);
    clock.advance(4000.0);
    assert_eq!(clock.progress(), 1.0);
    assert!(clock.is_complete());
    clock.advance(9000.0);
    assert_eq!(clock.progress(), 1.0);
}

#[test]
fn completion_latch_never_clears() {
    let mut clock = PhaseClock::single(1000.0);
    clock.advance(1500.0);
    assert!(clock.is_complete());
    // Time regression is not defended against, but the latch holds.
    clock.advance(100.0);
    assert!(clock.is_complete());
}

#[test]
fn degenerate_duration_completes_on_first_update() {
    let mut clock = PhaseClock::single(0.0);
    assert!(!clock.is_complete());
    assert_eq!(clock.progress(), 1.0);
    clock.advance(0.0);
    assert!(clock.is_complete());

    let mut negative = PhaseClock::single(-50.0);
    negative.advance(0.0);
    assert!(negative.is_complete());
    assert_eq!(negative.progress(), 1.0);
}

#[test]
fn phase_table_must_be_contiguous_from_zero_to_duration() {
    assert!(PhaseClock::with_phases(100.0, &[]).is_err());
    assert!(
        PhaseClock::with_phases(100.0, &[PhaseSpec::new("a", 10.0, 100.0)]).is_err(),
        "first phase must start at 0"
    );
    assert!(
        PhaseClock::with_phases(
            100.0,
            &[PhaseSpec::new("a", 0.0, 40.0), PhaseSpec::new("b", 50.0, 100.0)],
        )
        .is_err(),
        "gap between phases"
    );
    assert!(
        PhaseClock::with_phases(100.0, &[PhaseSpec::new("a", 0.0, 90.0)]).is_err(),
        "last phase must end at duration"
    );
    assert!(
        PhaseClock::with_phases(
            100.0,
            &[PhaseSpec::new("a", 0.0, 40.0), PhaseSpec::new("b", 40.0, 100.0)],
        )
        .is_ok()
    );
}

#[test]
fn arrival_phase_schedule_resolves_by_time() {
    let phases = [
        PhaseSpec::new("prebirth", 0.0, 2000.0),
        PhaseSpec::new("birth", 2000.0, 5000.0),
        PhaseSpec::new("appear", 5000.0, 7000.0),
    ];
    let mut clock = PhaseClock::with_phases(7000.0, &phases).unwrap();

    clock.advance(0.0);
    assert_eq!(clock.current_phase(), "prebirth");
    clock.advance(1999.0);
    assert_eq!(clock.current_phase(), "prebirth");
    clock.advance(2000.0);
    assert_eq!(clock.current_phase(), "birth");
    clock.advance(6000.0);
    assert_eq!(clock.current_phase(), "appear");
    assert_eq!(clock.phase_progress(), 0.5);
    assert!(!clock.is_complete());
    clock.advance(7000.0);
    assert!(clock.is_complete());
    // Past the end the last phase stays current.
    clock.advance(8000.0);
    assert_eq!(clock.current_phase(), "appear");
    assert_eq!(clock.phase_progress(), 1.0);
}

#[test]
fn phase_progress_tracks_the_current_window() {
    let phases = [
        PhaseSpec::new("a", 0.0, 1000.0),
        PhaseSpec::new("b", 1000.0, 3000.0),
    ];
    let mut clock = PhaseClock::with_phases(3000.0, &phases).unwrap();
    clock.advance(500.0);
    assert_eq!(clock.phase_progress(), 0.5);
    clock.advance(2000.0);
    assert_eq!(clock.phase_progress(), 0.5);
}
