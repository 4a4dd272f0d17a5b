//! Simulation module
//!
//! All gameplay logic lives here:
//! - One composite state, mutated only by `tick`
//! - Velocities in pixels per frame
//! - No rendering, timer or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{BounceAxis, Contact, Rect, bounce_off_paddle, bounce_off_walls, paddle_contact};
pub use state::{Ball, Direction, GamePhase, GameState, Layout, Paddle, Score, Side};
pub use tick::{PaddleIntent, PointScored, TickInput, TickOutcome, move_paddle, tick};
