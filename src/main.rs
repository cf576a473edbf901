//! Brickfall - terminal entry point

use std::fs::File;
use std::io::{BufWriter, Stdout, Write, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};

use brickfall::consts::FPS;
use brickfall::platform::{FramePacer, InputMapper};
use brickfall::renderer::{Canvas, RecordingCanvas, TerminalCanvas, draw_frame};
use brickfall::sim::{GameSession, TickInput};
use brickfall::{GameConfig, Settings};

#[derive(Debug, Parser)]
#[command(name = "brickfall", version, about = "Block-breaking arcade game for the terminal")]
struct Cli {
    /// JSON settings file (defaults are used when it does not exist)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Difficulty preset (easy, normal, hard, expert)
    #[arg(long)]
    difficulty: Option<String>,

    /// Ball speed level (slow, medium, fast, very_fast)
    #[arg(long)]
    speed: Option<String>,

    /// RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Run N frames headless with the autopilot and print the result
    #[arg(long, value_name = "FRAMES")]
    demo: Option<u64>,

    /// Print the difficulty and speed presets as JSON
    #[arg(long)]
    list: bool,

    /// Write the effective settings back to the settings file
    #[arg(long, requires = "settings")]
    save_settings: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load_or_default(path)
            .with_context(|| format!("reading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        settings.difficulty = difficulty;
    }
    if let Some(speed) = cli.speed {
        settings.speed_level = speed;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    init_logging(&settings)?;

    let config = GameConfig::standard();
    if cli.list {
        println!("{}", serde_json::to_string_pretty(&config.to_json())?);
        return Ok(());
    }
    settings.validate(&config)?;

    if cli.save_settings {
        if let Some(path) = &cli.settings {
            settings.save(path)?;
        }
    }

    let seed = settings.seed.unwrap_or_else(time_seed);
    log::info!("Brickfall starting with seed: {}", seed);

    let mut session = GameSession::new(config, &settings.difficulty, &settings.speed_level, seed);
    session.particles_enabled = settings.particles;

    if let Some(frames) = cli.demo {
        return run_demo(session, frames);
    }

    if settings.start_in_menu {
        session.open_menu();
    }
    run_terminal(session, &settings)
}

/// env_logger from `RUST_LOG`, redirected to a file when configured
fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = &settings.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Attract mode without a terminal: the autopilot plays for `frames` frames
fn run_demo(mut session: GameSession, frames: u64) -> anyhow::Result<()> {
    let mut canvas = RecordingCanvas::new();
    let input = TickInput {
        idle_mode: true,
        ..TickInput::default()
    };

    for _ in 0..frames {
        session.update(&input);
        draw_frame(&mut canvas, &session, None);
        canvas.present()?;
    }

    log::info!("Demo finished after {} frames", canvas.frames);
    println!("{}", serde_json::to_string_pretty(&session.hud())?);
    Ok(())
}

fn run_terminal(session: GameSession, settings: &Settings) -> anyhow::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Key release events where the terminal supports them
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads on their own thread so the frame loop never waits on I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, session, settings, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn game_loop(
    out: &mut BufWriter<Stdout>,
    mut session: GameSession,
    settings: &Settings,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let mut canvas = TerminalCanvas::from_terminal(out.by_ref())?;
    let mut input = InputMapper::new();
    let mut pacer = FramePacer::new(FPS);

    loop {
        pacer.begin();

        while let Ok(ev) = rx.try_recv() {
            input.handle_event(&ev, session.phase);
        }
        if input.quit_requested() {
            break;
        }
        if let Some((cols, rows)) = input.take_resize() {
            canvas.resize(cols, rows);
        }

        session.update(&input.take_input());

        let fps = settings.show_fps.then(|| pacer.fps());
        draw_frame(&mut canvas, &session, fps);
        canvas.present()?;

        pacer.wait();
    }

    log::info!(
        "Quit at level {} with score {}",
        session.level,
        session.paddle.score
    );
    Ok(())
}
