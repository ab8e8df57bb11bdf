//! Tone synthesis
//!
//! `ToneSequence` is a mono `rodio::Source` built from sine segments and
//! silences. Each tone gets a short linear attack/release ramp so cues
//! start and stop without clicks.

use std::f32::consts::PI;
use std::num::NonZero;
use std::time::Duration;

use rodio::Source;

use crate::config::audio::{
    DOUBLE_DURATION_MS, DOUBLE_FREQ_HZ, DOUBLE_GAP_MS, LONG_DURATION_MS, LONG_FREQ_HZ, RAMP_MS,
    SAMPLE_RATE, TRIPLE_DURATION_MS, TRIPLE_FREQ_HZ, TRIPLE_GAP_MS, WARNING_DURATION_MS,
    WARNING_FREQ_HZ,
};
use crate::timer::CueKind;

/// One tone or one silence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSegment {
    /// 0.0 means silence
    pub frequency_hz: f32,
    pub duration_ms: u32,
}

impl ToneSegment {
    pub fn tone(frequency_hz: f32, duration_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }

    pub fn silence(duration_ms: u32) -> Self {
        Self {
            frequency_hz: 0.0,
            duration_ms,
        }
    }

    fn is_silence(&self) -> bool {
        self.frequency_hz <= 0.0
    }
}

/// Tone pattern for a cue kind
pub fn cue_pattern(kind: CueKind) -> Vec<ToneSegment> {
    match kind {
        CueKind::WarningBeep => vec![ToneSegment::tone(WARNING_FREQ_HZ, WARNING_DURATION_MS)],
        CueKind::PhaseEndBeep => vec![ToneSegment::tone(LONG_FREQ_HZ, LONG_DURATION_MS)],
        CueKind::PhaseStartBeep => repeated(TRIPLE_FREQ_HZ, TRIPLE_DURATION_MS, TRIPLE_GAP_MS, 3),
        CueKind::IntervalTransitionBeep => {
            repeated(DOUBLE_FREQ_HZ, DOUBLE_DURATION_MS, DOUBLE_GAP_MS, 2)
        }
    }
}

fn repeated(frequency_hz: f32, duration_ms: u32, gap_ms: u32, count: usize) -> Vec<ToneSegment> {
    let mut segments = Vec::with_capacity(count * 2 - 1);
    for i in 0..count {
        if i > 0 {
            segments.push(ToneSegment::silence(gap_ms));
        }
        segments.push(ToneSegment::tone(frequency_hz, duration_ms));
    }
    segments
}

/// Mono sample stream for a list of segments
pub struct ToneSequence {
    segments: Vec<ToneSegment>,
    volume: f32,
    sample_rate: NonZero<u32>,
    segment_index: usize,
    /// Position within the current segment, in samples
    position: u32,
    segment_len: u32,
    ramp_len: u32,
}

impl ToneSequence {
    /// Build a sequence at the default sample rate. Volume is clamped to 0.0..=1.0.
    pub fn new(segments: Vec<ToneSegment>, volume: f32) -> Self {
        let sample_rate = NonZero::new(SAMPLE_RATE).unwrap_or(NonZero::<u32>::MIN);
        let mut seq = Self {
            segments,
            volume: volume.clamp(0.0, 1.0),
            sample_rate,
            segment_index: 0,
            position: 0,
            segment_len: 0,
            ramp_len: 0,
        };
        seq.load_segment();
        seq
    }

    /// Single tone
    pub fn tone(frequency_hz: f32, duration_ms: u32, volume: f32) -> Self {
        Self::new(vec![ToneSegment::tone(frequency_hz, duration_ms)], volume)
    }

    fn samples_for(&self, duration_ms: u32) -> u32 {
        let samples = u64::from(self.sample_rate.get()) * u64::from(duration_ms) / 1_000;
        u32::try_from(samples).unwrap_or(u32::MAX)
    }

    fn load_segment(&mut self) {
        self.position = 0;
        match self.segments.get(self.segment_index) {
            Some(seg) => {
                self.segment_len = self.samples_for(seg.duration_ms);
                self.ramp_len = self.samples_for(RAMP_MS).min(self.segment_len / 2);
            }
            None => {
                self.segment_len = 0;
                self.ramp_len = 0;
            }
        }
    }

    fn envelope(&self) -> f32 {
        if self.ramp_len == 0 {
            return 1.0;
        }
        let from_start = self.position;
        let to_end = self.segment_len - self.position;
        let ramp = self.ramp_len as f32;
        if from_start < self.ramp_len {
            from_start as f32 / ramp
        } else if to_end <= self.ramp_len {
            to_end as f32 / ramp
        } else {
            1.0
        }
    }
}

impl Iterator for ToneSequence {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let seg = *self.segments.get(self.segment_index)?;
            if self.position < self.segment_len {
                let sample = if seg.is_silence() {
                    0.0
                } else {
                    let t = self.position as f32 / self.sample_rate.get() as f32;
                    (2.0 * PI * seg.frequency_hz * t).sin() * self.volume * self.envelope()
                };
                self.position += 1;
                return Some(sample);
            }
            self.segment_index += 1;
            self.load_segment();
        }
    }
}

impl Source for ToneSequence {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> NonZero<u16> {
        NonZero::<u16>::MIN
    }

    fn sample_rate(&self) -> NonZero<u32> {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let ms: u64 = self.segments.iter().map(|s| u64::from(s.duration_ms)).sum();
        Some(Duration::from_millis(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Patterns ---

    #[test]
    fn warning_is_single_short_tone() {
        let pattern = cue_pattern(CueKind::WarningBeep);
        assert_eq!(pattern, vec![ToneSegment::tone(880.0, 150)]);
    }

    #[test]
    fn triple_beep_has_three_tones_and_two_gaps() {
        let pattern = cue_pattern(CueKind::PhaseStartBeep);
        assert_eq!(pattern.len(), 5);
        assert_eq!(pattern.iter().filter(|s| !s.is_silence()).count(), 3);
        assert!(pattern[1].is_silence());
        assert!(pattern[3].is_silence());
    }

    #[test]
    fn double_beep_has_two_tones() {
        let pattern = cue_pattern(CueKind::IntervalTransitionBeep);
        assert_eq!(pattern.len(), 3);
        assert_eq!(pattern.iter().filter(|s| !s.is_silence()).count(), 2);
    }

    #[test]
    fn long_beep_is_one_second() {
        let pattern = cue_pattern(CueKind::PhaseEndBeep);
        assert_eq!(pattern, vec![ToneSegment::tone(440.0, 1_000)]);
    }

    // --- Synthesis ---

    #[test]
    fn sample_count_matches_duration() {
        let samples: Vec<f32> = ToneSequence::tone(440.0, 100, 1.0).collect();
        assert_eq!(samples.len(), 4_410);
    }

    #[test]
    fn very_long_tone_saturates_sample_count() {
        let seq = ToneSequence::tone(440.0, u32::MAX, 1.0);
        assert_eq!(seq.samples_for(u32::MAX), u32::MAX);
        assert_eq!(seq.samples_for(100), 4_410);
    }

    #[test]
    fn sequence_length_includes_silences() {
        let seq = ToneSequence::new(cue_pattern(CueKind::PhaseStartBeep), 1.0);
        assert_eq!(seq.total_duration(), Some(Duration::from_millis(520)));
        let expected = (SAMPLE_RATE as u64 * 520 / 1_000) as usize;
        assert_eq!(seq.count(), expected);
    }

    #[test]
    fn samples_stay_within_volume() {
        let volume = 0.5;
        let peak = ToneSequence::tone(1_000.0, 50, volume)
            .map(f32::abs)
            .fold(0.0f32, f32::max);
        assert!(peak <= volume + f32::EPSILON);
        assert!(peak > 0.4);
    }

    #[test]
    fn ramps_start_and_end_at_zero() {
        let samples: Vec<f32> = ToneSequence::tone(1_000.0, 50, 1.0).collect();
        assert_eq!(samples[0], 0.0);
        assert!(samples.last().unwrap().abs() < 0.01);
    }

    #[test]
    fn silence_is_zero() {
        let samples: Vec<f32> = ToneSequence::new(vec![ToneSegment::silence(10)], 1.0).collect();
        assert_eq!(samples.len(), 441);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn volume_is_clamped() {
        let peak = ToneSequence::tone(1_000.0, 50, 5.0)
            .map(f32::abs)
            .fold(0.0f32, f32::max);
        assert!(peak <= 1.0);
    }

    #[test]
    fn mono_at_default_rate() {
        let seq = ToneSequence::tone(440.0, 10, 1.0);
        assert_eq!(seq.channels().get(), 1);
        assert_eq!(seq.sample_rate().get(), SAMPLE_RATE);
        assert_eq!(seq.current_span_len(), None);
    }

    #[test]
    fn empty_sequence_ends_immediately() {
        let mut seq = ToneSequence::new(Vec::new(), 1.0);
        assert_eq!(seq.next(), None);
    }
}
