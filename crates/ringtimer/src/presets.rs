//! Built-in discipline presets
//!
//! Input data for the round and interval engines.

use std::fmt;

use crate::timer::TimerConfig;

/// Which engine a preset is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Rounds,
    Interval,
}

/// A named round/rest layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub work_secs: u32,
    pub rest_secs: u32,
    pub rounds: u32,
    pub kind: PresetKind,
}

pub const BOXING: Preset = Preset {
    label: "Boxing",
    work_secs: 180,
    rest_secs: 60,
    rounds: 12,
    kind: PresetKind::Rounds,
};

pub const MMA: Preset = Preset {
    label: "MMA",
    work_secs: 300,
    rest_secs: 60,
    rounds: 3,
    kind: PresetKind::Rounds,
};

pub const MUAY_THAI: Preset = Preset {
    label: "Muay Thai",
    work_secs: 180,
    rest_secs: 120,
    rounds: 5,
    kind: PresetKind::Rounds,
};

pub const BJJ: Preset = Preset {
    label: "BJJ",
    work_secs: 360,
    rest_secs: 60,
    rounds: 5,
    kind: PresetKind::Rounds,
};

pub const TABATA: Preset = Preset {
    label: "Tabata",
    work_secs: 20,
    rest_secs: 10,
    rounds: 8,
    kind: PresetKind::Interval,
};

/// Built-in catalog in display order
pub const PRESETS: [Preset; 5] = [BOXING, MMA, MUAY_THAI, BJJ, TABATA];

impl Preset {
    /// Engine configuration carrying the preset's label
    pub fn to_config(&self) -> TimerConfig {
        TimerConfig::new(self.work_secs, self.rest_secs, self.rounds).with_label(self.label)
    }

    /// Length of a full session of this preset
    pub fn total_duration_ms(&self) -> u64 {
        let rest_after_last = self.kind == PresetKind::Interval;
        self.to_config().total_duration_ms(rest_after_last)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} · {}s work · {}s rest · {} rounds",
            self.label, self.work_secs, self.rest_secs, self.rounds
        )
    }
}

/// Case-insensitive lookup by label; spaces, dashes and underscores are ignored
pub fn find(label: &str) -> Option<Preset> {
    let wanted = normalize(label);
    PRESETS.iter().copied().find(|p| normalize(p.label) == wanted)
}

fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
