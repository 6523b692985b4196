//! # rigel_app
//!
//! Runs the demo level headlessly.
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments (flags, then `RIGEL_*` environment variables).
//! 2. Install the `tracing` subscriber.
//! 3. Validate the configuration and load the level.
//! 4. Enter the fixed-timestep frame loop.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use rigel_app::{GameConfig, GameLoop, GridSize, logging};

#[derive(Parser)]
#[command(name = "rigel_app", about = "Headless 2D ECS game loop")]
struct Args {
    /// Target frames per second
    #[arg(long, env = "RIGEL_TICK_RATE", default_value_t = 60.0)]
    tick_rate: f64,

    /// Stop after this many frames (0 runs forever)
    #[arg(long, env = "RIGEL_MAX_FRAMES", default_value_t = 0)]
    max_frames: u64,

    /// Log filter directive, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_filter: String,

    /// Tile-map size as <cols>x<rows>
    #[arg(long, default_value = "25x20")]
    grid: GridSize,
}

impl Args {
    fn into_config(self) -> GameConfig {
        GameConfig::default()
            .with_tick_rate(self.tick_rate)
            .with_max_frames(self.max_frames)
            .with_grid(self.grid)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_filter)?;

    let config = args.into_config();
    if let Err(err) = config.validate() {
        error!(%err, "invalid configuration");
        return Err(err.into());
    }

    info!(?config, "rigel starting");
    let mut game = GameLoop::new(config);
    if let Err(err) = game.load_level() {
        error!(%err, "failed to load level");
        return Err(err.into());
    }

    game.run()?;
    info!(frames = game.frame(), "rigel shut down");
    Ok(())
}
