//! Canvas Pong - a two-paddle ball game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (paddle motion, ball integration, collisions, scoring)
//! - `input`: Held-key tracking between frames
//! - `session`: Game loop sequencing, serve timer, pause and teardown
//! - `renderer`: Render surfaces and the WebGPU quad pipeline
//! - `platform`: Timer abstraction for the serve delay
//! - `config`: Viewport and tuning

pub mod config;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use input::{InputTracker, Key};
pub use session::Session;

/// Game tuning defaults
///
/// Velocities are in pixels per frame, so simulation speed follows the
/// display refresh rate.
pub mod consts {
    /// Paddle dimensions
    pub const PADDLE_WIDTH: f32 = 16.0;
    pub const PADDLE_HEIGHT: f32 = 96.0;
    /// Vertical paddle movement per frame while a key is held
    pub const PADDLE_SPEED: f32 = 8.0;

    /// Ball edge length (the ball is a square sprite)
    pub const BALL_SIZE: f32 = 12.0;
    /// Ball movement per axis per frame
    pub const BALL_SPEED: f32 = 3.0;

    /// Freeze between a point and the next serve (wall-clock)
    pub const SERVE_DELAY_MS: u64 = 1500;
}
