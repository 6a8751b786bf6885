//! Glue Jump headless runner
//!
//! Loads a level, drives the simulation with scripted or seeded-random
//! input for a fixed number of frames and logs what happens.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use glue_jump::sim::{GameEvent, LevelPhase, LevelState, TickInput, tick};
use glue_jump::{LevelDef, LevelError, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// No input at all
    Idle,
    /// Hold right and jump every second
    Walk,
    /// Seeded random input
    Random,
}

#[derive(Parser)]
#[command(version, about = "Headless runner for the Glue Jump platformer core")]
struct Args {
    /// Level JSON file. The built-in demo level is used when omitted.
    level: Option<PathBuf>,

    /// Physics tuning JSON file
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Frame delta in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Seed for the random input script
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Input script
    #[arg(long, value_enum, default_value_t = Script::Random)]
    script: Script,
}

/// Produces one frame of input at a time
struct InputScript {
    script: Script,
    rng: Pcg32,
    /// -1 left, 0 none, 1 right
    direction: i8,
    climb: i8,
}

impl InputScript {
    fn new(script: Script, seed: u64) -> Self {
        Self {
            script,
            rng: Pcg32::seed_from_u64(seed),
            direction: 1,
            climb: 0,
        }
    }

    fn next(&mut self, frame: u32) -> TickInput {
        match self.script {
            Script::Idle => TickInput::default(),
            Script::Walk => TickInput {
                move_right: true,
                jump_pressed: frame % 60 == 0,
                ..Default::default()
            },
            Script::Random => {
                // Held inputs change occasionally so movement looks deliberate
                if self.rng.random_bool(0.05) {
                    self.direction = self.rng.random_range(-1..=1);
                }
                if self.rng.random_bool(0.05) {
                    self.climb = self.rng.random_range(-1..=1);
                }
                TickInput {
                    move_left: self.direction < 0,
                    move_right: self.direction > 0,
                    up: self.climb < 0,
                    down: self.climb > 0,
                    jump_pressed: self.rng.random_bool(0.04),
                }
            }
        }
    }
}

/// Totals reported at the end of a run
#[derive(Debug, Default)]
struct Summary {
    /// Frames simulated across every attempt
    frames: u32,
    jumps: u32,
    attachments: u32,
    deaths: u32,
    plates: u32,
    completed: bool,
}

fn load(args: &Args) -> Result<LevelState, LevelError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let level = match &args.level {
        Some(path) => LevelDef::load(path)?,
        None => LevelDef::demo()?,
    };
    level.build(tuning)
}

fn run(args: &Args, state: &mut LevelState) -> Summary {
    let mut script = InputScript::new(args.script, args.seed);
    let mut summary = Summary::default();

    for frame in 0..args.frames {
        let input = script.next(frame);
        tick(state, &input, args.dt);
        summary.frames = frame + 1;

        for event in &state.events {
            log::debug!("[frame {}] {:?}", summary.frames, event);
            match event {
                GameEvent::Jumped { .. } | GameEvent::EscapedGlue => summary.jumps += 1,
                GameEvent::Attached { .. } => summary.attachments += 1,
                GameEvent::PlatePressed { .. } => summary.plates += 1,
                GameEvent::Died(_) => summary.deaths += 1,
                _ => {}
            }
        }

        match state.phase {
            LevelPhase::Playing => {}
            LevelPhase::Dead => state.reset(),
            LevelPhase::Complete => {
                summary.completed = true;
                break;
            }
        }
    }
    summary
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut state = match load(&args) {
        Ok(state) => state,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Running '{}' for {} frames ({:?} script, seed {})",
        state.name,
        args.frames,
        args.script,
        args.seed
    );

    let summary = run(&args, &mut state);
    log::info!(
        "Finished after {} frames: {} jumps, {} glue attachments, {} plate presses, {} deaths{}",
        summary.frames,
        summary.jumps,
        summary.attachments,
        summary.plates,
        summary.deaths,
        if summary.completed { ", goal reached" } else { "" }
    );
    ExitCode::SUCCESS
}
