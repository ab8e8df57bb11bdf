//! Whole-session runs through the public API

use ringtimer::presets::{BOXING, MMA, TABATA};
use ringtimer::timer::{
    Clock, CueEvent, CueKind, IntervalTimerEngine, ManualClock, Phase, RoundTimerEngine,
    StopwatchConfig, StopwatchEngine, TimerConfig, TimerEngine,
};

/// Run an engine to completion with ticks every `step_ms`, returning all cues
fn run_to_completion<E>(engine: &mut E, clock: &ManualClock, step_ms: u64) -> Vec<CueEvent>
where
    E: TimerEngine<State = ringtimer::timer::EngineState>,
{
    let mut cues = engine.start(clock.now_ms()).cues;
    while engine.snapshot().phase != Phase::Complete {
        clock.advance(step_ms);
        cues.extend(engine.tick(clock.now_ms()).cues);
    }
    cues
}

#[test]
fn boxing_session_is_tick_rate_independent() {
    let mut reference = None;
    for step in [50, 1_000, 7_000, 60_000] {
        let clock = ManualClock::new(1_000);
        let mut engine = RoundTimerEngine::new(BOXING.to_config()).unwrap();
        let cues = run_to_completion(&mut engine, &clock, step);
        assert_eq!(engine.snapshot().total_elapsed_ms, BOXING.total_duration_ms());
        match &reference {
            None => reference = Some(cues),
            Some(expected) => assert_eq!(&cues, expected, "step={}", step),
        }
    }
}

#[test]
fn backgrounded_host_keeps_cue_times() {
    let clock = ManualClock::new(0);
    let mut engine = IntervalTimerEngine::new(TABATA.to_config()).unwrap();
    let mut cues = engine.start(clock.now_ms()).cues;

    // Foreground ticks for 15s, then the tab is throttled for 40s
    for _ in 0..15 {
        clock.advance(1_000);
        cues.extend(engine.tick(clock.now_ms()).cues);
    }
    clock.advance(40_000);
    let update = engine.tick(clock.now_ms());
    cues.extend(update.cues);

    // 55s into a 20/10 cycle: Work(2) ended at 50s, Rest(2) runs 50-60
    assert_eq!(update.snapshot.phase, Phase::Rest);
    assert_eq!(update.snapshot.current_round, 2);
    assert_eq!(update.snapshot.elapsed_in_phase_ms, 5_000);

    let transitions: Vec<u64> = cues
        .iter()
        .filter(|c| c.kind == CueKind::IntervalTransitionBeep)
        .map(|c| c.fired_at_ms)
        .collect();
    assert_eq!(transitions, vec![20_000, 30_000, 50_000]);
}

#[test]
fn pause_resume_shifts_whole_session() {
    let clock = ManualClock::new(0);
    let mut engine = RoundTimerEngine::new(MMA.to_config()).unwrap();
    engine.start(clock.now_ms());
    clock.advance(100_000);
    engine.tick(clock.now_ms());
    engine.pause(clock.now_ms());
    clock.advance(3_600_000);
    engine.resume(clock.now_ms());

    let snapshot = engine.tick(clock.now_ms()).snapshot;
    assert_eq!(snapshot.elapsed_in_phase_ms, 100_000);

    clock.advance(MMA.total_duration_ms() - 100_000);
    let done = engine.tick(clock.now_ms());
    assert_eq!(done.snapshot.phase, Phase::Complete);
    assert_eq!(done.snapshot.total_elapsed_ms, MMA.total_duration_ms());
}

#[test]
fn skip_through_session() {
    let clock = ManualClock::new(0);
    let config = TimerConfig::new(180, 60, 3);
    let mut engine = RoundTimerEngine::new(config).unwrap();
    engine.start(clock.now_ms());
    let mut phases = Vec::new();
    for _ in 0..5 {
        clock.advance(1_000);
        let update = engine.skip(clock.now_ms());
        assert!(update.is_accepted());
        phases.push(update.snapshot.phase);
        // Skips never produce warning beeps
        assert!(update.cues.iter().all(|c| c.kind != CueKind::WarningBeep));
    }
    assert_eq!(
        phases,
        vec![
            Phase::Rest,
            Phase::Work,
            Phase::Rest,
            Phase::Work,
            Phase::Complete
        ]
    );
    assert_eq!(engine.snapshot().total_elapsed_ms, 5_000);
}

#[test]
fn stopwatch_laps_through_pauses() {
    let clock = ManualClock::new(500);
    let mut sw = StopwatchEngine::new(StopwatchConfig::default());
    sw.start(clock.now_ms());
    clock.advance(5_000);
    sw.lap(clock.now_ms());
    sw.pause(clock.now_ms());
    clock.advance(120_000);
    sw.resume(clock.now_ms());
    clock.advance(7_300);
    sw.lap(clock.now_ms());
    clock.advance(17_700);
    let state = sw.lap(clock.now_ms()).snapshot;

    let stamps: Vec<(usize, u64)> = state
        .laps
        .iter()
        .map(|l| (l.index, l.elapsed_at_lap_ms))
        .collect();
    assert_eq!(stamps, vec![(0, 5_000), (1, 12_300), (2, 30_000)]);
}
