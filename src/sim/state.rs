//! Game state and core simulation types
//!
//! Everything a frame reads or writes lives in one `GameState`, so the
//! renderer never sees a half-applied tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::GameConfig;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball in flight
    Playing,
    /// Point scored; ball frozen at center until the serve timer fires
    Resetting,
}

/// Which edge of the field a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The keyboard-controlled paddle
    Left,
    /// The opponent paddle
    Right,
}

/// Sign-only travel direction of the ball, one component per axis
///
/// Components are always -1, 0 or 1; speed comes from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Direction {
    x: i8,
    y: i8,
}

impl Direction {
    /// Frozen ball
    pub const STILL: Self = Self { x: 0, y: 0 };
    /// Every serve goes toward the left paddle first, moving down
    pub const SERVE: Self = Self { x: -1, y: 1 };

    /// Build a direction; components are reduced to their sign
    pub fn new(x: i8, y: i8) -> Self {
        Self {
            x: x.signum(),
            y: y.signum(),
        }
    }

    #[inline]
    pub fn x(self) -> i8 {
        self.x
    }

    #[inline]
    pub fn y(self) -> i8 {
        self.y
    }

    pub fn is_still(self) -> bool {
        self == Self::STILL
    }

    /// Point the horizontal component at `x` (sign only)
    pub fn with_x(self, x: i8) -> Self {
        Self::new(x, self.y)
    }

    /// Reverse vertical travel (0 stays 0)
    pub fn flip_vertical(self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
        }
    }

    /// Displacement for one frame at the given speed
    pub fn step(self, speed: f32) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32) * speed
    }
}

/// A paddle; only `pos.y` changes during play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner in viewport pixels
    pub pos: Vec2,
    pub size: Vec2,
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// The ball sprite (square)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner in viewport pixels
    pub pos: Vec2,
    pub size: f32,
}

impl Ball {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }
}

/// Points per side for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    /// Points won by the left paddle
    pub player: u32,
    /// Points won by the right paddle
    pub opponent: u32,
}

impl Score {
    /// Credit one point to `side`
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.player = self.player.saturating_add(1),
            Side::Right => self.opponent = self.opponent.saturating_add(1),
        }
    }
}

/// Starting positions, derived once from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub player: Paddle,
    pub opponent: Paddle,
    pub ball: Ball,
}

impl Layout {
    pub fn from_config(config: &GameConfig) -> Self {
        let paddle_size = Vec2::new(config.paddle_width, config.paddle_height);
        let paddle_y = config.viewport_height / 2.0 - config.paddle_height / 2.0;
        let half_ball = config.ball_size / 2.0;

        Self {
            player: Paddle {
                pos: Vec2::new(0.0, paddle_y),
                size: paddle_size,
            },
            opponent: Paddle {
                pos: Vec2::new(config.viewport_width - config.paddle_width, paddle_y),
                size: paddle_size,
            },
            ball: Ball {
                pos: Vec2::new(
                    config.viewport_width / 2.0 - half_ball,
                    config.viewport_height / 2.0 - half_ball,
                ),
                size: config.ball_size,
            },
        }
    }
}

/// Complete simulation snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Paddle,
    pub opponent: Paddle,
    pub ball: Ball,
    pub direction: Direction,
    pub score: Score,
    pub phase: GamePhase,
    /// When false, ticks leave the state untouched
    pub running: bool,
    /// Ticks advanced so far (paused frames excluded)
    pub ticks: u64,
    /// Positions restored after every point
    layout: Layout,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        let layout = Layout::from_config(config);
        Self {
            player: layout.player,
            opponent: layout.opponent,
            ball: layout.ball,
            direction: Direction::SERVE,
            score: Score::default(),
            phase: GamePhase::Playing,
            running: true,
            ticks: 0,
            layout,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Put paddles and ball back at their starting positions and freeze the ball
    ///
    /// Scores are kept.
    pub fn reset_round(&mut self) {
        self.player = self.layout.player;
        self.opponent = self.layout.opponent;
        self.ball = self.layout.ball;
        self.direction = Direction::STILL;
        self.phase = GamePhase::Resetting;
    }

    /// Release the frozen ball toward the left paddle
    pub fn serve(&mut self) {
        self.direction = Direction::SERVE;
        self.phase = GamePhase::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_layout_800x600() {
        let state = GameState::new(&GameConfig::for_viewport(800.0, 600.0));
        assert_eq!(state.player.pos, Vec2::new(0.0, 252.0));
        assert_eq!(state.opponent.pos, Vec2::new(784.0, 252.0));
        assert_eq!(state.ball.pos, Vec2::new(394.0, 294.0));
        assert_eq!(state.direction, Direction::SERVE);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.running);
    }

    #[test]
    fn test_reset_round_keeps_score() {
        let mut state = GameState::new(&GameConfig::default());
        state.score.award(Side::Right);
        state.ball.pos = Vec2::new(3.0, 40.0);
        state.player.pos.y = 0.0;

        state.reset_round();

        assert_eq!(state.ball, state.layout().ball);
        assert_eq!(state.player, state.layout().player);
        assert_eq!(state.direction, Direction::STILL);
        assert_eq!(state.phase, GamePhase::Resetting);
        assert_eq!(state.score, Score { player: 0, opponent: 1 });

        state.serve();
        assert_eq!(state.direction, Direction::SERVE);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_direction_flip_of_still_is_still() {
        assert_eq!(Direction::STILL.flip_vertical(), Direction::STILL);
        assert_eq!(Direction::new(1, -1).flip_vertical(), Direction::new(1, 1));
    }

    proptest! {
        #[test]
        fn direction_components_are_signs(x in any::<i8>(), y in any::<i8>()) {
            let dir = Direction::new(x, y);
            prop_assert!((-1..=1).contains(&dir.x()));
            prop_assert!((-1..=1).contains(&dir.y()));
            let flipped = dir.flip_vertical().with_x(x);
            prop_assert!((-1..=1).contains(&flipped.x()));
            prop_assert!((-1..=1).contains(&flipped.y()));
        }

        #[test]
        fn step_magnitude_comes_from_speed(x in -1i8..=1, y in -1i8..=1, speed in 0.5f32..20.0) {
            let step = Direction::new(x, y).step(speed);
            prop_assert_eq!(step.x.abs(), if x == 0 { 0.0 } else { speed });
            prop_assert_eq!(step.y.abs(), if y == 0 { 0.0 } else { speed });
        }
    }
}
