//! Quad batching for sprite blits
//!
//! Each blit becomes two triangles in viewport pixels, tinted by the sprite
//! it names. The GPU pipeline converts to clip space at upload time.

use glam::Vec2;

use super::vertex::Vertex;
use super::{RenderSurface, SpriteHandle};
use crate::sim::Rect;

/// Generate the six vertices of a filled rectangle
pub fn quad(rect: Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (l, r, t, b) = (rect.left(), rect.right(), rect.top(), rect.bottom());
    [
        Vertex::new(l, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
    ]
}

/// Render surface that accumulates triangles for one frame
#[derive(Debug, Clone)]
pub struct QuadBatch {
    viewport: Vec2,
    /// Tint per registered sprite, indexed by handle
    sprites: Vec<[f32; 4]>,
    vertices: Vec<Vertex>,
}

impl QuadBatch {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport: Vec2::new(viewport_width, viewport_height),
            sprites: Vec::new(),
            vertices: Vec::with_capacity(3 * 6),
        }
    }

    /// Register a sprite once; the returned handle is used for every blit
    pub fn load_sprite(&mut self, tint: [f32; 4]) -> SpriteHandle {
        self.sprites.push(tint);
        SpriteHandle(self.sprites.len() as u32 - 1)
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Vertices for the current frame, in viewport pixels
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl RenderSurface for QuadBatch {
    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn blit(&mut self, sprite: SpriteHandle, rect: Rect) {
        match self.sprites.get(sprite.0 as usize) {
            Some(&tint) => self.vertices.extend_from_slice(&quad(rect, tint)),
            None => log::warn!("Blit with unknown sprite {:?}", sprite),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::vertex::colors;

    #[test]
    fn test_quad_covers_rect() {
        let rect = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(16.0, 96.0));
        let verts = quad(rect, colors::PADDLE);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 26.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 116.0);
        assert!(verts.iter().all(|v| v.color == colors::PADDLE));
    }

    #[test]
    fn test_batch_clear_and_blit() {
        let mut batch = QuadBatch::new(800.0, 600.0);
        let paddle = batch.load_sprite(colors::PADDLE);
        let ball = batch.load_sprite(colors::BALL);
        assert_ne!(paddle, ball);

        let rect = Rect::new(Vec2::ZERO, Vec2::splat(12.0));
        batch.blit(paddle, rect);
        batch.blit(ball, rect);
        assert_eq!(batch.vertices().len(), 12);
        assert_eq!(batch.vertices()[6].color, colors::BALL);

        batch.clear();
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn test_unknown_sprite_is_skipped() {
        let mut batch = QuadBatch::new(800.0, 600.0);
        batch.blit(SpriteHandle(7), Rect::new(Vec2::ZERO, Vec2::ONE));
        assert!(batch.vertices().is_empty());
    }
}
