//! Work/rest phase machine shared by the round and interval engines
//!
//! The machine keeps a single total-elapsed timeline from `TimeBase` and
//! records where the current phase began on it. Phase-relative time is
//! always derived from that timeline, so carry-over on natural transitions
//! falls out of the arithmetic and no tick interval is ever assumed.

use tracing::{debug, trace};

use crate::error::Result;

use super::cue::{CueDefinition, CueScheduler};
use super::timebase::TimeBase;
use super::types::{
    Command, CueEvent, CueKind, EngineState, Phase, PhaseTransition, TimerConfig, Update,
};

const NOT_STARTED: &str = "timer has not been started";
const ALREADY_STARTED: &str = "timer is already started";
const ALREADY_COMPLETE: &str = "timer is already complete";
const ALREADY_PAUSED: &str = "timer is already paused";
const NOT_PAUSED: &str = "timer is not paused";

/// Which cue emphasis the machine uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CueStyle {
    /// Triple beep on every phase start, double beep on work -> rest,
    /// long bell on every other phase end
    Round,
    /// Triple beep on session start only, double beep on every work <-> rest
    /// transition, long bell at completion
    Interval,
}

#[derive(Debug, Clone)]
pub(crate) struct PhaseMachine {
    config: TimerConfig,
    style: CueStyle,
    rest_after_last: bool,
    time: TimeBase,
    phase: Phase,
    round: u32,
    /// Total-elapsed position at which the current phase began
    phase_start_ms: u64,
    total_elapsed_ms: u64,
    scheduler: CueScheduler,
}

/// Cues and transitions collected while processing one command or tick
#[derive(Default)]
struct Batch {
    cues: Vec<CueEvent>,
    transitions: Vec<PhaseTransition>,
    sampled_ms: Option<u64>,
}

impl PhaseMachine {
    pub(crate) fn new(config: TimerConfig, style: CueStyle) -> Result<Self> {
        config.validate()?;
        let rest_after_last = match style {
            CueStyle::Round => config.rest_after_last_round,
            CueStyle::Interval => true,
        };
        Ok(Self {
            config,
            style,
            rest_after_last,
            time: TimeBase::new(),
            phase: Phase::Idle,
            round: 1,
            phase_start_ms: 0,
            total_elapsed_ms: 0,
            scheduler: CueScheduler::default(),
        })
    }

    pub(crate) fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub(crate) fn rest_after_last(&self) -> bool {
        self.rest_after_last
    }

    pub(crate) fn snapshot(&self) -> EngineState {
        let phase_duration_ms = self.phase_duration_ms(self.phase);
        let elapsed_in_phase_ms = if self.phase.is_active() {
            self.total_elapsed_ms
                .saturating_sub(self.phase_start_ms)
                .min(phase_duration_ms)
        } else {
            0
        };
        EngineState {
            phase: self.phase,
            current_round: self.round,
            total_rounds: self.config.total_rounds,
            elapsed_in_phase_ms,
            phase_duration_ms,
            total_elapsed_ms: self.total_elapsed_ms,
            is_running: self.phase.is_active() && self.time.is_running(),
        }
    }

    pub(crate) fn start(&mut self, now_ms: u64) -> Update<EngineState> {
        if self.phase != Phase::Idle {
            let reason = if self.phase == Phase::Complete {
                ALREADY_COMPLETE
            } else {
                ALREADY_STARTED
            };
            return self.reject(Command::Start, reason);
        }
        let mut batch = Batch {
            sampled_ms: Some(0),
            ..Batch::default()
        };
        self.time.start(now_ms);
        self.total_elapsed_ms = 0;
        self.enter(Phase::Work, 1, 0, &mut batch);
        self.advance_to(0, &mut batch);
        self.finish(batch)
    }

    pub(crate) fn tick(&mut self, now_ms: u64) -> Update<EngineState> {
        if !self.phase.is_active() || !self.time.is_running() {
            return Update::new(self.snapshot());
        }
        let total = self.time.sample(now_ms);
        let mut batch = Batch {
            sampled_ms: Some(total),
            ..Batch::default()
        };
        self.advance_to(total, &mut batch);
        self.finish(batch)
    }

    pub(crate) fn pause(&mut self, now_ms: u64) -> Update<EngineState> {
        if let Some(reason) = self.inactive_reason() {
            return self.reject(Command::Pause, reason);
        }
        if self.time.is_paused() {
            return self.reject(Command::Pause, ALREADY_PAUSED);
        }
        let total = self.time.sample(now_ms);
        let mut batch = Batch {
            sampled_ms: Some(total),
            ..Batch::default()
        };
        self.advance_to(total, &mut batch);
        if !self.phase.is_active() {
            return self.finish_rejected(batch, Command::Pause, ALREADY_COMPLETE);
        }
        self.time.pause(now_ms);
        self.finish(batch)
    }

    pub(crate) fn resume(&mut self, now_ms: u64) -> Update<EngineState> {
        if let Some(reason) = self.inactive_reason() {
            return self.reject(Command::Resume, reason);
        }
        if !self.time.is_paused() {
            return self.reject(Command::Resume, NOT_PAUSED);
        }
        self.time.resume(now_ms);
        Update::new(self.snapshot())
    }

    /// End the current phase now: only its end cue fires, its unfired
    /// interior cues are dropped, and the next phase starts with no carry-over.
    pub(crate) fn skip(&mut self, now_ms: u64) -> Update<EngineState> {
        if let Some(reason) = self.inactive_reason() {
            return self.reject(Command::Skip, reason);
        }
        let total = self.time.sample(now_ms);
        let mut batch = Batch {
            sampled_ms: Some(total),
            ..Batch::default()
        };
        self.advance_to(total, &mut batch);
        if !self.phase.is_active() {
            return self.finish_rejected(batch, Command::Skip, ALREADY_COMPLETE);
        }

        for def in self.scheduler.skip_to_end() {
            self.emit(def.kind, total, &mut batch);
        }
        let (next, round) = self.successor(self.phase, self.round);
        self.enter(next, round, total, &mut batch);
        self.advance_to(total, &mut batch);
        self.finish(batch)
    }

    pub(crate) fn reset(&mut self) -> Update<EngineState> {
        if self.phase != Phase::Idle {
            debug!(from = %self.phase, round = self.round, "timer reset");
        }
        self.time.reset();
        self.scheduler.clear();
        self.phase = Phase::Idle;
        self.round = 1;
        self.phase_start_ms = 0;
        self.total_elapsed_ms = 0;
        Update::new(self.snapshot())
    }

    /// Walk the timeline up to `total`, firing crossed cues and taking every
    /// natural transition on the way. Overflow past a phase end stays on the
    /// timeline and is credited to the next phase.
    fn advance_to(&mut self, total: u64, batch: &mut Batch) {
        if !self.phase.is_active() {
            return;
        }
        self.total_elapsed_ms = self.total_elapsed_ms.max(total);
        while self.phase.is_active() {
            let duration = self.phase_duration_ms(self.phase);
            let in_phase = self.total_elapsed_ms.saturating_sub(self.phase_start_ms);
            for def in self.scheduler.advance(in_phase) {
                self.emit(def.kind, self.phase_start_ms + def.offset_ms, batch);
            }
            if in_phase < duration {
                break;
            }
            let (next, round) = self.successor(self.phase, self.round);
            self.enter(next, round, self.phase_start_ms + duration, batch);
        }
    }

    fn enter(&mut self, next: Phase, round: u32, at_ms: u64, batch: &mut Batch) {
        debug!(from = %self.phase, to = %next, round, at_ms, "phase transition");
        batch.transitions.push(PhaseTransition {
            from: self.phase,
            to: next,
            round,
            at_ms,
        });
        self.phase = next;
        self.round = round;
        self.phase_start_ms = at_ms;

        if next.is_active() {
            let duration = self.phase_duration_ms(next);
            let plan = self.cue_plan(next, round);
            self.scheduler.rearm(duration, plan);
        } else {
            self.scheduler.clear();
            self.total_elapsed_ms = at_ms;
            self.time.reset();
        }
    }

    fn emit(&self, kind: CueKind, fired_at_ms: u64, batch: &mut Batch) {
        trace!(cue = %kind, fired_at_ms, round = self.round, "cue");
        batch.cues.push(CueEvent { kind, fired_at_ms });
    }

    fn successor(&self, phase: Phase, round: u32) -> (Phase, u32) {
        let last_round = round >= self.config.total_rounds;
        match phase {
            Phase::Work if !last_round || self.rest_after_last => (Phase::Rest, round),
            Phase::Work => (Phase::Complete, round),
            Phase::Rest if !last_round => (Phase::Work, round + 1),
            Phase::Rest => (Phase::Complete, round),
            other => (other, round),
        }
    }

    fn cue_plan(&self, phase: Phase, round: u32) -> Vec<CueDefinition> {
        let duration = self.phase_duration_ms(phase);
        let (next, _) = self.successor(phase, round);
        let mut plan = Vec::with_capacity(3);

        let start_cue = match self.style {
            CueStyle::Round => true,
            CueStyle::Interval => phase == Phase::Work && round == 1,
        };
        if start_cue {
            plan.push(CueDefinition::at_start(CueKind::PhaseStartBeep));
        }

        let lead = self.config.warning_lead_ms();
        if lead > 0 && duration > lead {
            plan.push(CueDefinition::before_end(duration, lead, CueKind::WarningBeep));
        }

        let end_kind = match (self.style, phase, next) {
            (_, _, Phase::Complete) => CueKind::PhaseEndBeep,
            (CueStyle::Round, Phase::Work, _) => CueKind::IntervalTransitionBeep,
            (CueStyle::Round, _, _) => CueKind::PhaseEndBeep,
            (CueStyle::Interval, _, _) => CueKind::IntervalTransitionBeep,
        };
        plan.push(CueDefinition::at_end(duration, end_kind));
        plan
    }

    fn phase_duration_ms(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Idle | Phase::Work => self.config.work_duration_ms(),
            Phase::Rest => self.config.rest_duration_ms(),
            Phase::Complete => 0,
        }
    }

    fn inactive_reason(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Idle => Some(NOT_STARTED),
            Phase::Complete => Some(ALREADY_COMPLETE),
            Phase::Work | Phase::Rest => None,
        }
    }

    fn reject(&self, command: Command, reason: &'static str) -> Update<EngineState> {
        debug!(%command, phase = %self.phase, reason, "command rejected");
        Update::rejected(self.snapshot(), command, reason)
    }

    fn finish(&self, batch: Batch) -> Update<EngineState> {
        Update {
            snapshot: self.snapshot(),
            cues: batch.cues,
            transitions: batch.transitions,
            rejected: None,
            sampled_ms: batch.sampled_ms,
        }
    }

    fn finish_rejected(
        &self,
        batch: Batch,
        command: Command,
        reason: &'static str,
    ) -> Update<EngineState> {
        let mut update = self.reject(command, reason);
        update.cues = batch.cues;
        update.transitions = batch.transitions;
        update.sampled_ms = batch.sampled_ms;
        update
    }
}
