//! Terminal rendering

use ratatui::prelude::*;
use ratatui::widgets::*;

use ringtimer::format::{format_countdown, format_stopwatch};
use ringtimer::timer::{EngineState, LapRecord, Phase, StopwatchState};
use ringtimer_app::config::ui::VISIBLE_LAPS;
use ringtimer_app::session::{EngineView, SessionSnapshot, TimerMode};

pub fn draw_ui(f: &mut Frame, snap: &SessionSnapshot) {
    let area = f.area();

    let outer = Block::default()
        .title(format!(" Ringtimer v{} ", env!("CARGO_PKG_VERSION")))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(2), // mode + status
        Constraint::Length(5), // clock
        Constraint::Length(3), // progress
        Constraint::Min(3),    // details / laps
        Constraint::Length(2), // help bar
    ])
    .split(inner);

    draw_header(f, snap, chunks[0]);
    match &snap.view {
        EngineView::Timer(state) => {
            draw_countdown(f, state, chunks[1]);
            draw_progress(f, state, chunks[2]);
            draw_session(f, state, chunks[3]);
        }
        EngineView::Stopwatch(state) => {
            draw_clock(f, &format_stopwatch(state.elapsed_ms), Color::White, chunks[1]);
            draw_laps(f, state, chunks[3]);
        }
    }
    draw_help(f, snap, chunks[4]);
}

fn draw_header(f: &mut Frame, snap: &SessionSnapshot, area: Rect) {
    let label = snap.label.as_deref().unwrap_or("Custom");
    let title = match snap.mode {
        TimerMode::Round => format!("Rounds · {}", label),
        TimerMode::Interval => format!("Interval · {}", label),
        TimerMode::Stopwatch => "Stopwatch".to_string(),
    };
    let status_color = if snap.view.is_complete() {
        Color::Green
    } else if snap.view.is_running() {
        Color::White
    } else {
        Color::Yellow
    };
    let mut spans = vec![
        Span::styled("  Mode: ", Style::default().fg(Color::DarkGray)),
        Span::styled(title, Style::default().fg(Color::White).bold()),
        Span::raw("  "),
        Span::styled(snap.status_text.as_ref(), Style::default().fg(status_color)),
    ];
    if let Some(rejection) = &snap.last_rejection {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            rejection.reason,
            Style::default().fg(Color::DarkGray).italic(),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Idle => Color::DarkGray,
        Phase::Work => Color::Red,
        Phase::Rest => Color::Cyan,
        Phase::Complete => Color::Green,
    }
}

fn draw_countdown(f: &mut Frame, state: &EngineState, area: Rect) {
    let text = match state.phase {
        Phase::Complete => "DONE".to_string(),
        _ => format_countdown(state.remaining_in_phase_ms()),
    };
    draw_clock(f, &text, phase_color(state.phase), area);
}

fn draw_clock(f: &mut Frame, text: &str, color: Color, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(color).bold(),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn draw_progress(f: &mut Frame, state: &EngineState, area: Rect) {
    let title = match state.phase {
        Phase::Work | Phase::Rest => format!(
            " {} · Round {}/{} ",
            state.phase, state.current_round, state.total_rounds
        ),
        other => format!(" {} ", other),
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(phase_color(state.phase)))
        .ratio(state.phase_progress());
    f.render_widget(gauge, area);
}

fn draw_session(f: &mut Frame, state: &EngineState, area: Rect) {
    let lines = vec![Line::from(vec![
        Span::styled("  Elapsed: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_stopwatch(state.total_elapsed_ms),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled("Phase length: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_countdown(state.phase_duration_ms),
            Style::default().fg(Color::White),
        ),
    ])];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_laps(f: &mut Frame, state: &StopwatchState, area: Rect) {
    let fastest = state.laps.iter().min_by_key(|l| l.split_ms).map(|l| l.index);
    let slowest = state.laps.iter().max_by_key(|l| l.split_ms).map(|l| l.index);
    let marked = state.laps.len() >= 2;

    let items: Vec<ListItem> = state
        .laps
        .iter()
        .rev()
        .take(VISIBLE_LAPS)
        .map(|lap| {
            let color = if marked && Some(lap.index) == fastest {
                Color::Green
            } else if marked && Some(lap.index) == slowest {
                Color::Red
            } else {
                Color::White
            };
            lap_item(lap, color)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Laps ({}) ", state.laps.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(list, area);
}

fn lap_item(lap: &LapRecord, color: Color) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("  Lap {:>2}  ", lap.index + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format_stopwatch(lap.elapsed_at_lap_ms),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            format!("+{}", format_stopwatch(lap.split_ms)),
            Style::default().fg(color),
        ),
    ]))
}

fn draw_help(f: &mut Frame, snap: &SessionSnapshot, area: Rect) {
    let vol_display = if snap.is_muted {
        "MUTE".to_string()
    } else {
        format!("{}%", (snap.volume * 100.0).round() as u32)
    };
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut spans = vec![key("  space "), Span::raw("start/pause  ")];
    if snap.mode == TimerMode::Stopwatch {
        spans.extend([key("l "), Span::raw("lap  ")]);
    } else {
        spans.extend([key("s "), Span::raw("skip  ")]);
    }
    spans.extend([key("r "), Span::raw("reset  ")]);
    spans.extend([
        key("1/2/3 "),
        Span::raw("mode  "),
        key("m "),
        Span::raw("mute  "),
        key("+/- "),
        Span::raw("volume  "),
        key("q "),
        Span::raw("quit  |  "),
        Span::styled(
            format!("Vol: {}", vol_display),
            Style::default().fg(Color::Cyan).bold(),
        ),
    ]);
    if !snap.audio_unlocked {
        spans.push(Span::styled(
            "  (press any key to enable sound)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
