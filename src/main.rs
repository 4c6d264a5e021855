mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{info, warn};

use cyber_stage::compute::{
    cycle_weapon, move_player_left, move_player_right, new_session, next_stage, player_jump,
    player_shoot, return_to_title, start_game, tick, toggle_pause,
};
use cyber_stage::config::{self, Overrides, SessionConfig};
use cyber_stage::entities::{FrameEvent, FrameInput, GameSession, Phase};
use cyber_stage::error::ConfigError;
use cyber_stage::snapshot::snapshot;

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: the
/// OS key-repeat rate is ≥ 15 Hz, so the window is refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(140);

#[derive(Debug, Parser)]
#[command(name = "cyber_stage", about = "Side-scrolling stage shooter for the terminal")]
struct Args {
    /// Seed for roster generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding gameplay tuning.
    #[arg(long)]
    tuning: Option<PathBuf>,
    #[arg(long)]
    fps: Option<u32>,
    /// Play-field width in world units.
    #[arg(long)]
    width: Option<f32>,
    /// Play-field height in world units.
    #[arg(long)]
    height: Option<f32>,
}

#[derive(Debug, Error)]
enum HostError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // The terminal is in raw mode on the alternate screen; logs go to a file.
    let path = config::log_path();
    match File::create(&path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .compact()
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW`.
fn is_held(key_seen: &HashMap<KeyCode, Instant>, key: &KeyCode, now: Instant) -> bool {
    key_seen
        .get(key)
        .map(|&last| now.duration_since(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_seen: &HashMap<KeyCode, Instant>, keys: &[KeyCode], now: Instant) -> bool {
    keys.iter().any(|k| is_held(key_seen, k, now))
}

/// Remember the last stage/run outcome so its overlay can name the boss and
/// any weapon that dropped.
fn update_notice(notice: &mut Option<FrameEvent>, state: &GameSession) {
    for event in &state.events {
        match event {
            FrameEvent::StageCleared { .. }
            | FrameEvent::GameComplete { .. }
            | FrameEvent::GameOver { .. } => *notice = Some(event.clone()),
            FrameEvent::StageStarted { .. } => *notice = None,
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: `key_seen` records when each key was last pressed/repeated.
/// Movement keys count as held while fresh and steer the player before each
/// `tick`; action keys apply to the session as soon as they arrive.
fn game_loop<W: Write>(
    out: &mut W,
    cfg: &SessionConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_interval = cfg.frame_interval();

    let mut state = new_session(cfg.field(), cfg.tuning.clone());
    let mut notice: Option<FrameEvent> = None;
    let mut key_seen: HashMap<KeyCode, Instant> = HashMap::new();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_seen.insert(code, frame_start);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {}
                    }
                    match (state.run.phase, code) {
                        (Phase::Title, KeyCode::Enter) => state = start_game(&state, &mut rng),
                        (Phase::Running, KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w')) => {
                            state = player_jump(&state)
                        }
                        (Phase::Running, KeyCode::Char('z') | KeyCode::Char('x')) => {
                            state = player_shoot(&state)
                        }
                        (Phase::Running, KeyCode::Char('c')) => state = cycle_weapon(&state),
                        (Phase::Running | Phase::Paused, KeyCode::Char('p')) => {
                            state = toggle_pause(&state)
                        }
                        (Phase::StageClear, KeyCode::Enter) => state = next_stage(&state, &mut rng),
                        (Phase::GameOver, KeyCode::Char('r')) => state = start_game(&state, &mut rng),
                        (Phase::GameOver, KeyCode::Char('t')) | (Phase::GameComplete, KeyCode::Enter) => {
                            state = return_to_title(&state)
                        }
                        _ => {}
                    }
                    update_notice(&mut notice, &state);
                }
                KeyEventKind::Repeat => {
                    key_seen.insert(code, frame_start);
                }
                KeyEventKind::Release => {
                    key_seen.remove(&code);
                }
            }
        }

        // ── Held movement + one frame of simulation ───────────────────────────
        if state.run.phase == Phase::Running {
            // Right after left so it wins when both are held.
            if any_held(
                &key_seen,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame_start,
            ) {
                state = move_player_left(&state);
            }
            if any_held(
                &key_seen,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame_start,
            ) {
                state = move_player_right(&state);
            }
            state = tick(&state, &FrameInput::default());
            update_notice(&mut notice, &state);
        }

        display::render(out, &snapshot(&state), notice.as_ref())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_interval {
            thread::sleep(frame_interval - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), HostError> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing();

    let cfg = SessionConfig::resolve(Overrides {
        seed: args.seed,
        tuning: args.tuning,
        fps: args.fps,
        width: args.width,
        height: args.height,
    })?;
    info!(
        width = cfg.field_width,
        height = cfg.field_height,
        fps = cfg.fps,
        seed = ?cfg.seed,
        "starting"
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!(%err, "input thread stopped");
                break;
            }
        }
    });

    let result = game_loop(&mut out, &cfg, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exiting");
    result.map_err(HostError::from)
}
