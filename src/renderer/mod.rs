//! Rendering module
//!
//! The renderer only observes `GameState`. It paints onto anything that
//! implements `RenderSurface`; the WebGPU path collects blits into a
//! `QuadBatch` and hands the vertices to `RenderState`.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::QuadBatch;

use crate::sim::{GameState, Rect, Score};

/// Opaque reference to a loaded sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub(crate) u32);

/// A 2D drawing target sized to the viewport
pub trait RenderSurface {
    /// Erase the previous frame
    fn clear(&mut self);
    /// Draw `sprite` stretched over `rect` (viewport pixels)
    fn blit(&mut self, sprite: SpriteHandle, rect: Rect);
}

/// Score widget; told about the tally whenever it changes
pub trait Scoreboard {
    fn show(&mut self, score: Score);
}

/// Scoreboard that writes to the log (native demo)
#[derive(Debug, Default)]
pub struct LogScoreboard;

impl Scoreboard for LogScoreboard {
    fn show(&mut self, score: Score) {
        log::info!("Score: {} - {}", score.player, score.opponent);
    }
}

/// Paints paddles and ball each frame
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    paddle_sprite: SpriteHandle,
    ball_sprite: SpriteHandle,
}

impl Renderer {
    pub fn new(paddle_sprite: SpriteHandle, ball_sprite: SpriteHandle) -> Self {
        Self {
            paddle_sprite,
            ball_sprite,
        }
    }

    /// Clear and redraw the scene from `state`
    pub fn draw<S: RenderSurface + ?Sized>(&self, state: &GameState, surface: &mut S) {
        surface.clear();
        surface.blit(self.paddle_sprite, state.player.rect());
        surface.blit(self.paddle_sprite, state.opponent.rect());
        surface.blit(self.ball_sprite, state.ball.rect());
    }
}
