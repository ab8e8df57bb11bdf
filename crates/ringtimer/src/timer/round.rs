//! Round timer
//!
//! Fixed number of work rounds separated by rest phases, ending with a
//! final bell. An optional rest phase may follow the last round.

use crate::error::Result;

use super::phased::{CueStyle, PhaseMachine};
use super::types::{EngineState, TimerConfig, Update};
use super::TimerEngine;

/// Round-based training timer (boxing, MMA, grappling rounds)
#[derive(Debug, Clone)]
pub struct RoundTimerEngine {
    machine: PhaseMachine,
}

impl RoundTimerEngine {
    /// Create an idle engine. Fails on an invalid configuration.
    pub fn new(config: TimerConfig) -> Result<Self> {
        Ok(Self {
            machine: PhaseMachine::new(config, CueStyle::Round)?,
        })
    }

    pub fn config(&self) -> &TimerConfig {
        self.machine.config()
    }

    pub fn rest_after_last_round(&self) -> bool {
        self.machine.rest_after_last()
    }
}

impl TimerEngine for RoundTimerEngine {
    type State = EngineState;

    fn start(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.start(now_ms)
    }

    fn pause(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.pause(now_ms)
    }

    fn resume(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.resume(now_ms)
    }

    fn skip(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.skip(now_ms)
    }

    fn reset(&mut self) -> Update<EngineState> {
        self.machine.reset()
    }

    fn tick(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.tick(now_ms)
    }

    fn snapshot(&self) -> EngineState {
        self.machine.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimerError;
    use crate::timer::types::{Command, CueEvent, CueKind, Phase, PhaseTransition};

    fn engine(work: u32, rest: u32, rounds: u32) -> RoundTimerEngine {
        RoundTimerEngine::new(TimerConfig::new(work, rest, rounds)).unwrap()
    }

    /// Tick every `step_ms` from `from_ms` to `to_ms` inclusive, collecting everything
    fn drive(
        engine: &mut RoundTimerEngine,
        from_ms: u64,
        to_ms: u64,
        step_ms: u64,
    ) -> (Vec<CueEvent>, Vec<PhaseTransition>) {
        let mut cues = Vec::new();
        let mut transitions = Vec::new();
        let mut now = from_ms;
        while now <= to_ms {
            let update = engine.tick(now);
            cues.extend(update.cues);
            transitions.extend(update.transitions);
            now += step_ms;
        }
        (cues, transitions)
    }

    // --- Construction ---

    #[test]
    fn rejects_invalid_config() {
        let err = RoundTimerEngine::new(TimerConfig::new(180, 60, 0)).unwrap_err();
        assert!(matches!(err, TimerError::InvalidConfig(_)));
        assert!(RoundTimerEngine::new(TimerConfig::new(0, 60, 3)).is_err());
    }

    #[test]
    fn new_engine_is_idle() {
        let engine = engine(180, 60, 3);
        let state = engine.snapshot();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.total_rounds, 3);
        assert_eq!(state.remaining_in_phase_ms(), 180_000);
        assert!(!state.is_running);
    }

    // --- Start ---

    #[test]
    fn start_enters_first_work_round() {
        let mut engine = engine(180, 60, 3);
        let update = engine.start(5_000);
        assert!(update.is_accepted());
        assert_eq!(update.snapshot.phase, Phase::Work);
        assert_eq!(update.snapshot.current_round, 1);
        assert!(update.snapshot.is_running);
        assert_eq!(
            update.cues,
            vec![CueEvent {
                kind: CueKind::PhaseStartBeep,
                fired_at_ms: 0
            }]
        );
        assert_eq!(update.transitions.len(), 1);
        assert_eq!(update.transitions[0].from, Phase::Idle);
        assert_eq!(update.transitions[0].to, Phase::Work);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        let update = engine.start(1_000);
        assert_eq!(update.rejected.unwrap().command, Command::Start);
        assert_eq!(update.snapshot.phase, Phase::Work);
    }

    // --- Ticking ---

    #[test]
    fn elapsed_follows_host_clock() {
        let mut engine = engine(180, 60, 3);
        engine.start(10_000);
        let state = engine.tick(55_000).snapshot;
        assert_eq!(state.elapsed_in_phase_ms, 45_000);
        assert_eq!(state.total_elapsed_ms, 45_000);
        assert_eq!(state.remaining_in_phase_ms(), 135_000);
    }

    #[test]
    fn carry_over_on_natural_transition() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        let update = engine.tick(185_000);
        assert_eq!(update.snapshot.phase, Phase::Rest);
        assert_eq!(update.snapshot.current_round, 1);
        assert_eq!(update.snapshot.elapsed_in_phase_ms, 5_000);
        assert_eq!(update.transitions.len(), 1);
        assert_eq!(update.transitions[0].at_ms, 180_000);
    }

    #[test]
    fn backwards_clock_is_zero_progress() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        engine.tick(30_000);
        let update = engine.tick(20_000);
        assert_eq!(update.snapshot.elapsed_in_phase_ms, 30_000);
        assert!(update.cues.is_empty());
    }

    #[test]
    fn round_completion_order() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        let (_, transitions) = drive(&mut engine, 1_000, 1_000_000, 1_000);
        let path: Vec<(Phase, u32)> = transitions.iter().map(|t| (t.to, t.round)).collect();
        assert_eq!(
            path,
            vec![
                (Phase::Rest, 1),
                (Phase::Work, 2),
                (Phase::Rest, 2),
                (Phase::Work, 3),
                (Phase::Complete, 3),
            ]
        );
        let state = engine.snapshot();
        assert_eq!(state.phase, Phase::Complete);
        assert_eq!(state.total_elapsed_ms, 660_000);
        assert!(!state.is_running);
    }

    #[test]
    fn complete_is_terminal() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        engine.tick(660_000);
        let before = engine.snapshot();
        let update = engine.tick(2_000_000);
        assert_eq!(update.snapshot, before);
        assert!(update.cues.is_empty());
        assert!(update.transitions.is_empty());

        assert!(!engine.start(2_000_000).is_accepted());
        assert!(!engine.pause(2_000_000).is_accepted());
        assert!(!engine.resume(2_000_000).is_accepted());
        assert!(!engine.skip(2_000_000).is_accepted());
        assert_eq!(engine.reset().snapshot.phase, Phase::Idle);
    }

    #[test]
    fn rest_after_last_round() {
        let config = TimerConfig::new(60, 30, 2).with_rest_after_last_round(true);
        let mut engine = RoundTimerEngine::new(config).unwrap();
        assert!(engine.rest_after_last_round());
        engine.start(0);
        let (cues, transitions) = drive(&mut engine, 1_000, 200_000, 1_000);
        let path: Vec<Phase> = transitions.iter().map(|t| t.to).collect();
        assert_eq!(
            path,
            vec![Phase::Rest, Phase::Work, Phase::Rest, Phase::Complete]
        );
        assert_eq!(engine.snapshot().total_elapsed_ms, 180_000);
        // Final bell at the end of the trailing rest
        let last = cues.last().unwrap();
        assert_eq!(last.kind, CueKind::PhaseEndBeep);
        assert_eq!(last.fired_at_ms, 180_000);
    }

    #[test]
    fn long_gap_crosses_whole_session() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        let update = engine.tick(10_000_000);
        assert_eq!(update.snapshot.phase, Phase::Complete);
        assert_eq!(update.snapshot.total_elapsed_ms, 660_000);
        assert_eq!(update.transitions.len(), 5);
        // Cues are delivered in timeline order
        let times: Vec<u64> = update.cues.iter().map(|c| c.fired_at_ms).collect();
        let mut sorted = times.clone();
        sorted.sort_unstable();
        assert_eq!(times, sorted);
        let warnings = update
            .cues
            .iter()
            .filter(|c| c.kind == CueKind::WarningBeep)
            .count();
        assert_eq!(warnings, 5);
    }

    #[test]
    fn clock_sample_outlives_completion() {
        let mut engine = engine(180, 60, 3);
        assert_eq!(engine.start(0).sampled_ms, Some(0));
        let update = engine.tick(10_000_000);
        assert_eq!(update.snapshot.total_elapsed_ms, 660_000);
        assert_eq!(update.sampled_ms, Some(10_000_000));
        // Nothing is read from the clock once complete
        assert_eq!(engine.tick(10_500_000).sampled_ms, None);
    }

    // --- Cues ---

    #[test]
    fn warning_fires_exactly_once_at_any_granularity() {
        for step in [1_000, 5_000, 60_000] {
            let mut engine = engine(180, 60, 3);
            engine.start(0);
            let (cues, _) = drive(&mut engine, step, 180_000, step);
            let warnings: Vec<&CueEvent> = cues
                .iter()
                .filter(|c| c.kind == CueKind::WarningBeep && c.fired_at_ms < 180_000)
                .collect();
            assert_eq!(warnings.len(), 1, "step={}", step);
            assert_eq!(warnings[0].fired_at_ms, 170_000, "step={}", step);
        }
    }

    #[test]
    fn work_to_rest_is_double_beep() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        let update = engine.tick(180_000);
        let kinds: Vec<CueKind> = update.cues.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CueKind::WarningBeep,
                CueKind::IntervalTransitionBeep,
                CueKind::PhaseStartBeep
            ]
        );
    }

    #[test]
    fn rest_to_work_is_long_beep() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        engine.tick(235_000);
        let update = engine.tick(240_000);
        let kinds: Vec<CueKind> = update.cues.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CueKind::PhaseEndBeep, CueKind::PhaseStartBeep]);
        assert_eq!(update.snapshot.current_round, 2);
    }

    #[test]
    fn final_round_ends_with_long_bell() {
        let mut engine = engine(180, 60, 1);
        engine.start(0);
        let update = engine.tick(180_000);
        let last = update.cues.last().unwrap();
        assert_eq!(last.kind, CueKind::PhaseEndBeep);
        assert_eq!(update.snapshot.phase, Phase::Complete);
    }

    #[test]
    fn no_warning_for_short_phases() {
        let mut engine = engine(10, 5, 1);
        engine.start(0);
        let update = engine.tick(10_000);
        assert!(update.cues.iter().all(|c| c.kind != CueKind::WarningBeep));
    }

    #[test]
    fn custom_warning_lead() {
        let config = TimerConfig::new(60, 30, 1).with_warning_lead(30);
        let mut engine = RoundTimerEngine::new(config).unwrap();
        engine.start(0);
        let update = engine.tick(30_000);
        assert_eq!(update.cues[0].kind, CueKind::WarningBeep);
        assert_eq!(update.cues[0].fired_at_ms, 30_000);
    }

    // --- Pause / resume ---

    #[test]
    fn pause_freezes_progress() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        let paused = engine.pause(50_000);
        assert!(paused.is_accepted());
        assert!(!paused.snapshot.is_running);

        let update = engine.tick(500_000);
        assert_eq!(update.snapshot.elapsed_in_phase_ms, 50_000);
        assert!(update.cues.is_empty());

        let resumed = engine.resume(500_000);
        assert!(resumed.is_accepted());
        assert_eq!(resumed.snapshot.elapsed_in_phase_ms, 50_000);
        assert_eq!(
            engine.tick(510_000).snapshot.elapsed_in_phase_ms,
            60_000
        );
    }

    #[test]
    fn pending_cues_wait_while_paused() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        engine.pause(165_000);
        assert!(engine.tick(175_000).cues.is_empty());
        engine.resume(300_000);
        let update = engine.tick(305_000);
        assert_eq!(update.cues.len(), 1);
        assert_eq!(update.cues[0].kind, CueKind::WarningBeep);
        assert_eq!(update.cues[0].fired_at_ms, 170_000);
    }

    #[test]
    fn invalid_pause_and_resume() {
        let mut engine = engine(180, 60, 3);
        assert!(!engine.pause(0).is_accepted());
        assert!(!engine.resume(0).is_accepted());
        engine.start(0);
        assert!(!engine.resume(1_000).is_accepted());
        engine.pause(2_000);
        assert!(!engine.pause(3_000).is_accepted());
    }

    #[test]
    fn pause_after_session_ran_out_is_rejected() {
        let mut engine = engine(10, 5, 1);
        engine.start(0);
        let update = engine.pause(60_000);
        assert!(!update.is_accepted());
        assert_eq!(update.snapshot.phase, Phase::Complete);
        assert_eq!(update.transitions.last().unwrap().to, Phase::Complete);
    }

    // --- Skip ---

    #[test]
    fn skip_fires_only_end_cue() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        engine.tick(30_000);
        let update = engine.skip(40_000);
        assert!(update.is_accepted());
        let kinds: Vec<CueKind> = update.cues.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![CueKind::IntervalTransitionBeep, CueKind::PhaseStartBeep]
        );
        assert!(update.cues.iter().all(|c| c.fired_at_ms == 40_000));
        assert_eq!(update.snapshot.phase, Phase::Rest);
        // No carry-over on skip
        assert_eq!(update.snapshot.elapsed_in_phase_ms, 0);
        assert_eq!(update.snapshot.total_elapsed_ms, 40_000);

        // The skipped work warning never fires retroactively
        let later = engine.tick(100_000);
        assert!(later
            .cues
            .iter()
            .all(|c| c.kind != CueKind::WarningBeep || c.fired_at_ms >= 40_000));
    }

    #[test]
    fn skip_last_phase_completes() {
        let mut engine = engine(180, 60, 1);
        engine.start(0);
        let update = engine.skip(10_000);
        assert_eq!(update.snapshot.phase, Phase::Complete);
        assert_eq!(update.cues.len(), 1);
        assert_eq!(update.cues[0].kind, CueKind::PhaseEndBeep);
        assert_eq!(update.snapshot.total_elapsed_ms, 10_000);
    }

    #[test]
    fn skip_while_paused_stays_paused() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        engine.pause(20_000);
        let update = engine.skip(90_000);
        assert_eq!(update.snapshot.phase, Phase::Rest);
        assert!(!update.snapshot.is_running);
        assert_eq!(update.snapshot.total_elapsed_ms, 20_000);
    }

    #[test]
    fn skip_rejected_when_idle_or_complete() {
        let mut engine = engine(180, 60, 1);
        let update = engine.skip(0);
        assert_eq!(update.rejected.unwrap().command, Command::Skip);
        engine.start(0);
        engine.tick(180_000);
        assert!(!engine.skip(181_000).is_accepted());
    }

    // --- Reset ---

    #[test]
    fn reset_is_idempotent() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        engine.tick(300_000);
        let first = engine.reset();
        let second = engine.reset();
        assert!(first.is_accepted());
        assert_eq!(first, second);
        assert_eq!(first.snapshot.phase, Phase::Idle);
        assert_eq!(first.snapshot.total_elapsed_ms, 0);
    }

    #[test]
    fn restart_after_reset() {
        let mut engine = engine(180, 60, 3);
        engine.start(0);
        engine.tick(400_000);
        engine.reset();
        let update = engine.start(1_000_000);
        assert!(update.is_accepted());
        assert_eq!(engine.tick(1_010_000).snapshot.elapsed_in_phase_ms, 10_000);
        assert_eq!(engine.snapshot().current_round, 1);
    }
}
