//! # rigel_app
//!
//! Headless driver for the rigel engine: configuration, logging setup and
//! the fixed-timestep [`GameLoop`](game::GameLoop).

pub mod config;
pub mod game;
pub mod logging;

pub use config::{ConfigError, GameConfig, GridSize};
pub use game::{FpsCounter, GameLoop};
