//! Pixel Jumper headless driver
//!
//! Runs a level with the autopilot at a fixed presentation rate and reports
//! what happened. Useful for checking level files and tuning changes.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pixel_jumper::autopilot::Autopilot;
use pixel_jumper::level::builtin_level;
use pixel_jumper::sim::{GameEvent, GamePhase};
use pixel_jumper::{ConfigError, Game, LevelDescriptor, Tuning};

#[derive(Parser)]
#[command(name = "pixel-jumper")]
#[command(about = "Run a Pixel Jumper level headless with the autopilot", long_about = None)]
struct Cli {
    /// Built-in level id
    #[arg(short, long, default_value = "1")]
    level: u32,
    /// Load the level from a JSON file instead
    #[arg(long)]
    level_file: Option<PathBuf>,
    /// Tuning JSON (defaults for anything left out)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Wall-clock seconds to simulate
    #[arg(short, long, default_value = "60")]
    seconds: f32,
    /// Autopilot seed
    #[arg(long, default_value = "1")]
    seed: u64,
    /// Presentation frame length in ms
    #[arg(long, default_value = "16.667")]
    frame_ms: f32,
    /// Print the final snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Default)]
struct RunSummary {
    frames: u64,
    jumps: u32,
    landings: u32,
    boosts: u32,
    coins: u32,
    broken_platforms: u32,
    lives_lost: u32,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Jumped => self.jumps += 1,
            GameEvent::Landed => self.landings += 1,
            GameEvent::Boosted { .. } => self.boosts += 1,
            GameEvent::CoinCollected { .. } => self.coins += 1,
            GameEvent::PlatformBroken { .. } => self.broken_platforms += 1,
            GameEvent::Damaged { .. } | GameEvent::Died => self.lives_lost += 1,
            GameEvent::Respawned | GameEvent::LevelComplete | GameEvent::TimeExpired => {}
        }
    }
}

fn run(cli: &Cli) -> Result<(), ConfigError> {
    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let level = match &cli.level_file {
        Some(path) => LevelDescriptor::load(path)?,
        None => builtin_level(cli.level)?,
    };

    log::info!("Pixel Jumper (native) starting, seed {}", cli.seed);
    let mut game = Game::new(level, tuning)?;
    let mut pilot = Autopilot::new(cli.seed);
    let mut summary = RunSummary::default();

    let frame_ms = cli.frame_ms.max(0.1);
    let total_frames = (cli.seconds.max(0.0) * 1000.0 / frame_ms).ceil() as u64;

    for _ in 0..total_frames {
        game.set_input(pilot.next_input(game.state()));
        let report = game.frame(frame_ms);
        summary.frames += 1;

        for event in &report.events {
            log::debug!("tick {}: {:?}", game.state().time_ticks, event);
            summary.record(event);
        }
        if game.phase() != GamePhase::Playing {
            break;
        }
    }

    let state = game.state();
    let stats = game.frame_stats();
    log::info!(
        "{:?} after {} frames / {} ticks (avg frame {:.2} ms)",
        state.phase,
        summary.frames,
        stats.ticks,
        stats.avg_frame_ms()
    );
    println!(
        "level {}: {:?}, coins {}/{} ({} pts), {}% complete, lives {}, lost {}",
        state.level_id,
        state.phase,
        state.progress.collected_coins,
        state.progress.total_coins,
        state.progress.score,
        state.progress.completion_percent(),
        state.avatar.lives,
        summary.lives_lost
    );
    println!(
        "jumps {}, landings {}, boosts {}, platforms broken {}, coin events {}",
        summary.jumps, summary.landings, summary.boosts, summary.broken_platforms, summary.coins
    );

    if cli.snapshot {
        println!("{}", serde_json::to_string_pretty(&game.snapshot())?);
    }

    Ok(())
}
