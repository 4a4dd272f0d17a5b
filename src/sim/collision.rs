//! Collision detection and response for the ball
//!
//! Paddle hits use a nearest-edge rule: of the three candidate contact
//! distances (facing edge, paddle bottom, paddle top) the smallest decides
//! whether the ball bounces horizontally or vertically. This stands in for
//! swept collision because the ball is small next to a paddle and moves only
//! a few pixels per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Direction, Side};

/// Axis-aligned rectangle in viewport pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Which way the ball should turn after touching a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    /// Hit the facing edge: send the ball back toward the field center
    Horizontal,
    /// Hit the paddle's top or bottom: reverse vertical travel
    Vertical,
}

/// Candidate contact distances for an overlapping ball and paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Ball leading edge to the paddle's field-facing edge
    pub leading: f32,
    /// Ball top to paddle bottom
    pub top: f32,
    /// Ball bottom to paddle top
    pub bottom: f32,
}

impl Contact {
    /// Smallest distance wins; ties go to leading, then top, then bottom
    pub fn axis(&self) -> BounceAxis {
        if self.leading <= self.top && self.leading <= self.bottom {
            BounceAxis::Horizontal
        } else {
            // top and bottom contacts respond the same way
            BounceAxis::Vertical
        }
    }
}

/// Check a ball against the paddle defending `side`
///
/// The horizontal test only looks at the paddle's field-facing edge, so a
/// ball that has slipped behind the paddle still counts as overlapping until
/// it scores.
pub fn paddle_contact(ball: Rect, paddle: Rect, side: Side) -> Option<Contact> {
    let vertical = ball.bottom() > paddle.top() && ball.top() < paddle.bottom();
    let horizontal = match side {
        Side::Left => ball.left() < paddle.right(),
        Side::Right => ball.right() > paddle.left(),
    };
    if !(vertical && horizontal) {
        return None;
    }

    let leading = match side {
        Side::Left => (paddle.right() - ball.left()).abs(),
        Side::Right => (paddle.left() - ball.right()).abs(),
    };

    Some(Contact {
        leading,
        top: (paddle.bottom() - ball.top()).abs(),
        bottom: (paddle.top() - ball.bottom()).abs(),
    })
}

/// Apply a paddle bounce to `direction`, if the ball touches the paddle
pub fn bounce_off_paddle(direction: Direction, ball: Rect, paddle: Rect, side: Side) -> Direction {
    let Some(contact) = paddle_contact(ball, paddle, side) else {
        return direction;
    };

    match contact.axis() {
        BounceAxis::Horizontal => {
            let toward_center = match side {
                Side::Left => 1,
                Side::Right => -1,
            };
            log::debug!("Ball hit {:?} paddle face", side);
            direction.with_x(toward_center)
        }
        BounceAxis::Vertical => {
            log::debug!("Ball hit {:?} paddle end", side);
            direction.flip_vertical()
        }
    }
}

/// Whether the ball touches the top or bottom of the viewport
#[inline]
pub fn touches_wall(ball: Rect, viewport_height: f32) -> bool {
    ball.top() <= 0.0 || ball.bottom() >= viewport_height
}

/// Flip vertical travel when the ball touches the top or bottom wall
///
/// Runs regardless of any paddle bounce in the same frame.
pub fn bounce_off_walls(direction: Direction, ball: Rect, viewport_height: f32) -> Direction {
    if touches_wall(ball, viewport_height) {
        direction.flip_vertical()
    } else {
        direction
    }
}
