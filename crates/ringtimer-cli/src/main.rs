//! Ringtimer CLI: terminal workout timer

mod logging;
mod ui;

use std::io;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::{bounded, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tracing::{info, warn};

use ringtimer::audio::{AudioCuePlayer, CueSink, SilentCuePlayer};
use ringtimer::format::format_session_length;
use ringtimer::presets::{BOXING, PRESETS, TABATA};
use ringtimer::timer::{MonotonicClock, StopwatchConfig, TimerConfig};
use ringtimer_app::config::ui::{FRAME_INTERVAL_MS, VOLUME_STEP};
use ringtimer_app::data::Settings;
use ringtimer_app::error::{AppError, Result};
use ringtimer_app::session::{
    SessionCommand, SessionController, SessionSetup, SessionSnapshot, TimerMode,
};

#[derive(Parser, Debug)]
#[command(
    name = "ringtimer",
    about = "Round, interval and stopwatch timer for martial arts training",
    version
)]
struct Cli {
    /// Timer mode: round, interval or stopwatch
    #[arg(short, long)]
    mode: Option<TimerMode>,

    /// Preset label (boxing, mma, "muay thai", bjj, tabata or a custom preset)
    #[arg(short, long)]
    preset: Option<String>,

    /// Work phase length in seconds
    #[arg(long, value_name = "SECS")]
    work: Option<u32>,

    /// Rest phase length in seconds
    #[arg(long, value_name = "SECS")]
    rest: Option<u32>,

    /// Number of rounds
    #[arg(long)]
    rounds: Option<u32>,

    /// Add a rest phase after the final round (round mode)
    #[arg(long)]
    rest_after_last: bool,

    /// Cue volume, 0.0 to 1.0
    #[arg(long)]
    volume: Option<f32>,

    /// Start muted
    #[arg(long)]
    mute: bool,

    /// Print the preset catalog and exit
    #[arg(long)]
    list_presets: bool,

    /// Append logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// What the session starts with, resolved from arguments and settings
#[derive(Debug)]
struct Plan {
    setup: SessionSetup,
    round: TimerConfig,
    interval: TimerConfig,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path, cli.verbose)?;
    }

    let mut settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Warning: {}; using default settings", e);
        Settings::default()
    });

    if cli.list_presets {
        print_presets(&settings);
        return Ok(());
    }

    let plan = resolve_plan(&cli, &settings)?;
    if let Some(volume) = cli.volume {
        settings.set_volume(volume);
    }
    if cli.mute {
        settings.muted = true;
    }
    settings.last_mode = plan.setup.mode();
    if let Some(preset) = &cli.preset {
        settings.last_preset = Some(preset.clone());
    }
    info!(mode = %plan.setup.mode(), label = ?plan.setup.label(), "session planned");

    // Open the audio output before the TUI so failures are visible
    let sink: Box<dyn CueSink> = match AudioCuePlayer::acquire() {
        Ok(player) => Box::new(player),
        Err(e) => {
            warn!(error = %e, "audio unavailable, running silent");
            eprintln!("{}; running without sound", e);
            Box::new(SilentCuePlayer)
        }
    };

    let (cmd_tx, cmd_rx) = bounded(64);
    let shared_state = Arc::new(Mutex::new(SessionSnapshot::default()));
    let mut controller = SessionController::new(
        cmd_rx,
        shared_state.clone(),
        Box::new(MonotonicClock::new()),
        sink,
        plan.setup,
        (plan.round, plan.interval),
    )?
    .with_audio(settings.volume, settings.muted);

    let controller_thread = std::thread::Builder::new()
        .name("session".into())
        .spawn(move || controller.run())?;

    // Suppress stderr during TUI: ALSA/PulseAudio and other libs write
    // diagnostic messages to stderr which corrupt the ratatui display.
    let saved_stderr = unsafe { libc::dup(2) };
    {
        let devnull = std::fs::File::open("/dev/null")?;
        unsafe { libc::dup2(devnull.as_raw_fd(), 2) };
    }

    let tui_result = run_tui(&cmd_tx, &shared_state);

    // Join while stderr is still redirected (the audio output logs on drop)
    let _ = cmd_tx.send(SessionCommand::Shutdown);
    let _ = controller_thread.join();

    if saved_stderr >= 0 {
        unsafe {
            libc::dup2(saved_stderr, 2);
            libc::close(saved_stderr);
        }
    }
    tui_result?;

    let snap = shared_state.lock().unwrap_or_else(|e| e.into_inner()).clone();
    settings.set_volume(snap.volume);
    settings.muted = snap.is_muted;
    settings.last_mode = snap.mode;
    if let Err(e) = settings.save() {
        warn!(error = %e, "failed to save settings");
        eprintln!("Warning: {}", e);
    }
    Ok(())
}

fn run_tui(
    cmd_tx: &Sender<SessionCommand>,
    shared_state: &Arc<Mutex<SessionSnapshot>>,
) -> Result<()> {
    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let frame = Duration::from_millis(FRAME_INTERVAL_MS);
    let mut audio_unlocked = false;
    let mut result = Ok(());

    loop {
        let snap = shared_state.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &snap)) {
            result = Err(e.into());
            break;
        }

        match event::poll(frame) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                result = Err(e.into());
                break;
            }
        }
        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(e) => {
                result = Err(e.into());
                break;
            }
        };

        // Audio stays locked until the first keypress
        if !audio_unlocked {
            let _ = cmd_tx.send(SessionCommand::UnlockAudio);
            audio_unlocked = true;
        }

        let command = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char(' ') => SessionCommand::Toggle,
            KeyCode::Char('s') => SessionCommand::Skip,
            KeyCode::Char('r') => SessionCommand::Reset,
            KeyCode::Char('l') => SessionCommand::Lap,
            KeyCode::Char('1') => SessionCommand::SwitchMode(TimerMode::Round),
            KeyCode::Char('2') => SessionCommand::SwitchMode(TimerMode::Interval),
            KeyCode::Char('3') => SessionCommand::SwitchMode(TimerMode::Stopwatch),
            KeyCode::Char('m') if snap.is_muted => SessionCommand::Unmute,
            KeyCode::Char('m') => SessionCommand::Mute,
            KeyCode::Char('+') | KeyCode::Char('=') => {
                SessionCommand::SetVolume(snap.volume + VOLUME_STEP)
            }
            KeyCode::Char('-') => SessionCommand::SetVolume(snap.volume - VOLUME_STEP),
            _ => continue,
        };
        if cmd_tx.send(command).is_err() {
            break;
        }
    }

    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

/// Combine arguments with stored settings into the starting setup.
///
/// A preset picks the mode unless `--mode` is given; `--work`, `--rest`
/// and `--rounds` override the chosen mode's configuration.
fn resolve_plan(cli: &Cli, settings: &Settings) -> Result<Plan> {
    let mut round = settings.apply_preferences(BOXING.to_config());
    let mut interval = settings.apply_preferences(TABATA.to_config());

    let preset = match (&cli.preset, cli.mode) {
        (Some(label), _) => Some(settings.resolve_preset(label)?),
        // A remembered preset is best effort; it may have been deleted
        (None, None) => settings
            .last_preset
            .as_deref()
            .and_then(|label| settings.resolve_preset(label).ok()),
        (None, Some(_)) => None,
    };
    let mut mode = settings.last_mode;
    if let Some(resolved) = preset {
        mode = resolved.mode;
        match resolved.mode {
            TimerMode::Interval => interval = resolved.config,
            _ => round = resolved.config,
        }
    }
    let mode = cli.mode.unwrap_or(mode);

    let custom = cli.work.is_some() || cli.rest.is_some() || cli.rounds.is_some();
    let target = match mode {
        TimerMode::Round => Some(&mut round),
        TimerMode::Interval => Some(&mut interval),
        TimerMode::Stopwatch => None,
    };
    if let Some(config) = target {
        if let Some(work) = cli.work {
            config.work_duration_secs = work;
        }
        if let Some(rest) = cli.rest {
            config.rest_duration_secs = rest;
        }
        if let Some(rounds) = cli.rounds {
            config.total_rounds = rounds;
        }
        if custom && cli.preset.is_none() {
            config.label = None;
        }
        if cli.rest_after_last {
            config.rest_after_last_round = true;
        }
        config.validate().map_err(AppError::from)?;
    } else if custom {
        return Err(AppError::Config(
            "--work, --rest and --rounds do not apply to the stopwatch".to_string(),
        ));
    }

    let setup = match mode {
        TimerMode::Round => SessionSetup::Round(round.clone()),
        TimerMode::Interval => SessionSetup::Interval(interval.clone()),
        TimerMode::Stopwatch => SessionSetup::Stopwatch(StopwatchConfig::default()),
    };
    Ok(Plan {
        setup,
        round,
        interval,
    })
}

fn print_presets(settings: &Settings) {
    println!("Built-in presets:");
    for preset in PRESETS {
        println!(
            "  {:<44} {}",
            preset.to_string(),
            format_session_length(preset.total_duration_ms())
        );
    }
    if !settings.custom_presets.is_empty() {
        println!("Custom presets:");
        for custom in &settings.custom_presets {
            let config = custom.to_config();
            let rest_after_last = custom.mode == TimerMode::Interval;
            println!(
                "  {} · {}s work · {}s rest · {} rounds ({})  {}",
                custom.label,
                custom.work_secs,
                custom.rest_secs,
                custom.rounds,
                custom.mode,
                format_session_length(config.total_duration_ms(rest_after_last))
            );
        }
    }
}
