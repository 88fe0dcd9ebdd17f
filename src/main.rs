//! Astroblast main entry point.
//!
//! A 2D asteroids game written in Rust using:
//! - **raylib** for windowing, input and drawing
//! - an actor/component runtime (see the library crate) for the simulation
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing)
//! 2. Open the window, or set up the headless platform with `--headless`
//! 3. Spawn the ship and the asteroid field
//! 4. Pump input, update and output until the window closes or Escape is pressed
//! 5. Delete every actor and release the textures
//!
//! # Running
//!
//! ```sh
//! cargo run --release
//! cargo run -- --headless --frames 300 --seed 7
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use astroblast::game::Game;
use astroblast::platform::Platform;
use astroblast::platform::headless::HeadlessPlatform;
use astroblast::resources::gameconfig::GameConfig;

/// Astroblast: shoot the rocks before they drift into you.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Seed for the asteroid field (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window on a simulated clock.
    #[arg(long)]
    headless: bool,

    /// Number of frames to run in headless mode.
    #[arg(long, default_value_t = 600)]
    frames: u64,
}

fn run<P: Platform>(platform: P, config: GameConfig) -> Game<P> {
    let mut game = Game::new(platform, config);
    if let Err(e) = game.initialize() {
        error!("Failed to initialize game: {}", e);
        std::process::exit(1);
    }
    game.run_loop();
    game
}

#[cfg(feature = "raylib")]
fn run_windowed(config: GameConfig) {
    use astroblast::platform::raylib::RaylibPlatform;

    let platform = match RaylibPlatform::new(&config) {
        Ok(platform) => platform,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    run(platform, config).shutdown();
}

#[cfg(not(feature = "raylib"))]
fn run_windowed(_config: GameConfig) {
    error!("Built without the `raylib` feature; run with --headless");
    std::process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        warn!("Using default configuration: {}", e);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    info!("Starting with seed {}", config.seed);

    if cli.headless {
        let platform = HeadlessPlatform::new().with_frame_budget(cli.frames);
        let game = run(platform, config);
        info!(
            "Headless run finished: {} frames, {} live actors, {} asteroids remaining",
            game.time().frame_count,
            game.world().live_actors().len(),
            game.asteroids_remaining()
        );
        game.shutdown();
    } else {
        run_windowed(config);
    }
}
