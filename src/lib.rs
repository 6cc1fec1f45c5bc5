//! A minimal Flappy-Bird-style arcade game.
//!
//! A bird sprite moved with WASD, pipes spawned once a second by a background
//! thread and scrolled to the left, and a RUN/FLAP/DEAD state cycled with the
//! left mouse button. Frames are rasterised in software and handed to a
//! platform presenter (Metal on macOS, `softbuffer` elsewhere).
//!
//! # Example
//! ```no_run
//! use flappy::{app::App, config::GameConfig};
//!
//! fn main() -> Result<(), flappy::error::GameError> {
//!     App::run(GameConfig::from_env())
//! }
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod input;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod ui;
