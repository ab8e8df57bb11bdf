//! Display formatting for hosts

/// Countdown display `M:SS`.
///
/// Seconds round up, so a fresh 3 minute phase reads `3:00` and the display
/// only reaches `0:00` once the phase is over.
pub fn format_countdown(remaining_ms: u64) -> String {
    let secs = remaining_ms.div_ceil(1_000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Stopwatch display `M:SS.CC` with truncated centiseconds
pub fn format_stopwatch(elapsed_ms: u64) -> String {
    let centis = elapsed_ms / 10;
    let secs = centis / 100;
    format!("{}:{:02}.{:02}", secs / 60, secs % 60, centis % 100)
}

/// Session length for preset listings, e.g. `47 min` or `4 min`
pub fn format_session_length(total_ms: u64) -> String {
    let mins = total_ms.div_ceil(60_000);
    if mins >= 60 {
        format!("{}h {:02}min", mins / 60, mins % 60)
    } else {
        format!("{} min", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- format_countdown ---

    #[test]
    fn countdown_whole_minutes() {
        assert_eq!(format_countdown(180_000), "3:00");
        assert_eq!(format_countdown(60_000), "1:00");
    }

    #[test]
    fn countdown_rounds_up() {
        assert_eq!(format_countdown(179_001), "3:00");
        assert_eq!(format_countdown(179_000), "2:59");
        assert_eq!(format_countdown(8_200), "0:09");
        assert_eq!(format_countdown(1), "0:01");
    }

    #[test]
    fn countdown_zero() {
        assert_eq!(format_countdown(0), "0:00");
    }

    #[test]
    fn countdown_minutes_unbounded() {
        assert_eq!(format_countdown(75 * 60_000), "75:00");
    }

    // --- format_stopwatch ---

    #[test]
    fn stopwatch_centiseconds() {
        assert_eq!(format_stopwatch(754_560), "12:34.56");
        assert_eq!(format_stopwatch(0), "0:00.00");
        assert_eq!(format_stopwatch(9), "0:00.00");
        assert_eq!(format_stopwatch(12_345), "0:12.34");
    }

    #[test]
    fn stopwatch_past_an_hour() {
        assert_eq!(format_stopwatch(3_661_990), "61:01.99");
    }

    // --- format_session_length ---

    #[test]
    fn session_lengths() {
        assert_eq!(format_session_length(240_000), "4 min");
        assert_eq!(format_session_length(47 * 60_000), "47 min");
        assert_eq!(format_session_length(90 * 60_000), "1h 30min");
    }
}
