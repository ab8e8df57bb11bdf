//! Edge-triggered cue scheduling
//!
//! A `CueScheduler` holds the cue offsets of one phase instance and reports
//! the cues whose offset falls in `(watermark, elapsed]` on each advance, so
//! a cue fires exactly once no matter how coarse or late the ticks are.

use super::types::CueKind;

/// A cue at a fixed offset from the start of its phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueDefinition {
    pub offset_ms: u64,
    pub kind: CueKind,
}

impl CueDefinition {
    /// Cue at the very start of the phase
    pub fn at_start(kind: CueKind) -> Self {
        Self { offset_ms: 0, kind }
    }

    /// Cue `lead_ms` before the end of a phase lasting `duration_ms`
    pub fn before_end(duration_ms: u64, lead_ms: u64, kind: CueKind) -> Self {
        Self {
            offset_ms: duration_ms.saturating_sub(lead_ms),
            kind,
        }
    }

    /// Cue exactly at the end of the phase
    pub fn at_end(duration_ms: u64, kind: CueKind) -> Self {
        Self {
            offset_ms: duration_ms,
            kind,
        }
    }
}

/// Tracks which cues of the current phase instance have fired
#[derive(Debug, Clone, Default)]
pub struct CueScheduler {
    cues: Vec<CueDefinition>,
    duration_ms: u64,
    /// `None` until the phase instance is first evaluated; the first advance
    /// includes offset 0 so start cues fire on entry.
    watermark: Option<u64>,
}

impl CueScheduler {
    /// Build a scheduler for a phase of `duration_ms`.
    /// Cues beyond the phase end can never be crossed and are dropped.
    pub fn new(duration_ms: u64, mut cues: Vec<CueDefinition>) -> Self {
        cues.retain(|c| c.offset_ms <= duration_ms);
        cues.sort_by_key(|c| c.offset_ms);
        Self {
            cues,
            duration_ms,
            watermark: None,
        }
    }

    /// Cues newly crossed when the phase has run for `elapsed_ms`.
    ///
    /// An elapsed value behind the watermark reports nothing and leaves the
    /// watermark untouched.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<CueDefinition> {
        let crossed: Vec<CueDefinition> = match self.watermark {
            None => self
                .cues
                .iter()
                .filter(|c| c.offset_ms <= elapsed_ms)
                .copied()
                .collect(),
            Some(w) => self
                .cues
                .iter()
                .filter(|c| c.offset_ms > w && c.offset_ms <= elapsed_ms)
                .copied()
                .collect(),
        };
        self.watermark = Some(self.watermark.map_or(elapsed_ms, |w| w.max(elapsed_ms)));
        crossed
    }

    /// Jump the watermark to the phase end, returning only the unfired
    /// end-of-phase cues. Interior cues that were skipped over never fire.
    pub fn skip_to_end(&mut self) -> Vec<CueDefinition> {
        let end = self.duration_ms;
        let fired_end = self.watermark.is_some_and(|w| w >= end);
        self.watermark = Some(end);
        if fired_end {
            return Vec::new();
        }
        self.cues
            .iter()
            .filter(|c| c.offset_ms == end)
            .copied()
            .collect()
    }

    /// Start a fresh phase instance with new cues
    pub fn rearm(&mut self, duration_ms: u64, cues: Vec<CueDefinition>) {
        *self = Self::new(duration_ms, cues);
    }

    /// Forget every cue (no phase active)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn watermark(&self) -> Option<u64> {
        self.watermark
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn cues(&self) -> &[CueDefinition] {
        &self.cues
    }
}
