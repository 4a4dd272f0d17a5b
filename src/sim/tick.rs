//! Per-frame simulation tick
//!
//! One call advances the whole `GameState` by a single display frame.
//! Ordering inside a tick: paddles, ball, paddle bounces, wall bounce, scoring.

use super::collision::{bounce_off_paddle, bounce_off_walls};
use super::state::{GameState, Side};
use crate::config::GameConfig;

/// Held movement keys for one paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleIntent {
    pub up: bool,
    pub down: bool,
}

/// Input sampled at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left paddle, from the keyboard
    pub player: PaddleIntent,
    /// Right paddle; idle unless something external drives it
    pub opponent: PaddleIntent,
}

/// Which sides scored during a tick
///
/// With a validated config at most one flag is set; both are tracked so an
/// impossible double clear still credits each side once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointScored {
    /// Ball cleared the right edge
    pub player: bool,
    /// Ball cleared the left edge
    pub opponent: bool,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Running flag was off; nothing changed
    Paused,
    /// State advanced, no point
    Advanced,
    /// A point was scored and the round reset
    Scored(PointScored),
}

/// Move a paddle by its intent, up first then down, clamping after each step
pub fn move_paddle(y: f32, intent: PaddleIntent, config: &GameConfig) -> f32 {
    let mut y = y;
    if intent.up {
        y = config.clamp_paddle_y(y - config.paddle_speed);
    }
    if intent.down {
        y = config.clamp_paddle_y(y + config.paddle_speed);
    }
    y
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, config: &GameConfig, input: &TickInput) -> TickOutcome {
    if !state.running {
        return TickOutcome::Paused;
    }

    state.ticks += 1;

    // Paddles keep responding while the ball is frozen between rounds
    state.player.pos.y = move_paddle(state.player.pos.y, input.player, config);
    state.opponent.pos.y = move_paddle(state.opponent.pos.y, input.opponent, config);

    state.ball.pos += state.direction.step(config.ball_speed);

    // Every check runs every tick; flips compose in this order
    let ball = state.ball.rect();
    let mut direction = state.direction;
    direction = bounce_off_paddle(direction, ball, state.player.rect(), Side::Left);
    direction = bounce_off_paddle(direction, ball, state.opponent.rect(), Side::Right);
    direction = bounce_off_walls(direction, ball, config.viewport_height);
    state.direction = direction;

    let scored = PointScored {
        opponent: ball.right() <= config.paddle_width,
        player: ball.left() >= config.viewport_width - config.paddle_width,
    };
    if !(scored.player || scored.opponent) {
        return TickOutcome::Advanced;
    }

    if scored.player && scored.opponent {
        log::warn!("Ball cleared both edges in one tick; crediting both sides");
    }
    if scored.opponent {
        state.score.award(Side::Right);
    }
    if scored.player {
        state.score.award(Side::Left);
    }
    log::info!(
        "Point scored at tick {}: {} - {}",
        state.ticks,
        state.score.player,
        state.score.opponent
    );

    state.reset_round();
    TickOutcome::Scored(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Direction, GamePhase, Score};
    use glam::Vec2;
    use proptest::prelude::*;

    fn config() -> GameConfig {
        GameConfig::for_viewport(800.0, 600.0)
    }

    fn up() -> TickInput {
        TickInput {
            player: PaddleIntent {
                up: true,
                down: false,
            },
            ..Default::default()
        }
    }

    fn down() -> TickInput {
        TickInput {
            player: PaddleIntent {
                up: false,
                down: true,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_free_flight_moves_by_ball_speed() {
        let config = config();
        let mut state = GameState::new(&config);
        state.ball.pos = Vec2::new(300.0, 200.0);
        state.direction = Direction::new(1, 1);

        let outcome = tick(&mut state, &config, &TickInput::default());

        assert_eq!(outcome, TickOutcome::Advanced);
        assert_eq!(state.ball.pos, Vec2::new(303.0, 203.0));
        assert_eq!(state.direction, Direction::new(1, 1));
    }

    #[test]
    fn test_paddle_and_wall_bounce_in_same_tick() {
        let config = config();
        let mut state = GameState::new(&config);
        state.player.pos.y = 0.0;
        state.ball.pos = Vec2::new(16.0, 3.0);
        state.direction = Direction::new(-1, -1);

        let outcome = tick(&mut state, &config, &TickInput::default());

        // Leading edge is nearest, so x reverses; top wall then flips y
        assert_eq!(outcome, TickOutcome::Advanced);
        assert_eq!(state.ball.pos, Vec2::new(13.0, 0.0));
        assert_eq!(state.direction, Direction::new(1, 1));
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let config = config();
        let mut state = GameState::new(&config);

        tick(&mut state, &config, &up());
        assert_eq!(state.player.pos.y, 244.0);

        state.player.pos.y = 3.0;
        tick(&mut state, &config, &up());
        assert_eq!(state.player.pos.y, 0.0);

        state.player.pos.y = 500.0;
        tick(&mut state, &config, &down());
        assert_eq!(state.player.pos.y, 504.0);
    }

    #[test]
    fn test_up_and_down_cancel_in_open_range() {
        let config = config();
        let mut state = GameState::new(&config);
        let both = TickInput {
            player: PaddleIntent {
                up: true,
                down: true,
            },
            ..Default::default()
        };
        tick(&mut state, &config, &both);
        assert_eq!(state.player.pos.y, 252.0);

        // At the top, up is clamped away and down still applies
        state.player.pos.y = 0.0;
        tick(&mut state, &config, &both);
        assert_eq!(state.player.pos.y, 8.0);
    }

    #[test]
    fn test_opponent_stays_put_without_intent() {
        let config = config();
        let mut state = GameState::new(&config);
        for _ in 0..50 {
            tick(&mut state, &config, &down());
        }
        assert_eq!(state.opponent.pos, Vec2::new(784.0, 252.0));
    }

    #[test]
    fn test_wall_bounce_at_top() {
        let config = config();
        let mut state = GameState::new(&config);
        state.ball.pos = Vec2::new(400.0, 3.0);
        state.direction = Direction::new(1, -1);

        tick(&mut state, &config, &TickInput::default());

        assert_eq!(state.ball.pos.y, 0.0);
        assert_eq!(state.direction, Direction::new(1, 1));
    }

    #[test]
    fn test_paddle_face_bounce() {
        let config = config();
        let mut state = GameState::new(&config);
        state.ball.pos = Vec2::new(16.0, 283.0);
        state.direction = Direction::SERVE;

        tick(&mut state, &config, &TickInput::default());

        assert_eq!(state.ball.pos, Vec2::new(13.0, 286.0));
        assert_eq!(state.direction, Direction::new(1, 1));
        assert_eq!(state.score, Score::default());
    }

    #[test]
    fn test_left_clear_scores_for_opponent_and_resets() {
        let config = config();
        let mut state = GameState::new(&config);
        state.ball.pos = Vec2::new(7.0, 100.0);
        state.direction = Direction::new(-1, 1);
        state.player.pos.y = 400.0;

        let outcome = tick(&mut state, &config, &TickInput::default());

        assert_eq!(
            outcome,
            TickOutcome::Scored(PointScored {
                player: false,
                opponent: true
            })
        );
        assert_eq!(state.score, Score { player: 0, opponent: 1 });
        assert_eq!(state.ball.pos, Vec2::new(394.0, 294.0));
        assert_eq!(state.player.pos, Vec2::new(0.0, 252.0));
        assert_eq!(state.opponent.pos, Vec2::new(784.0, 252.0));
        assert_eq!(state.direction, Direction::STILL);
        assert_eq!(state.phase, GamePhase::Resetting);
    }

    #[test]
    fn test_right_clear_scores_for_player() {
        let config = config();
        let mut state = GameState::new(&config);
        state.ball.pos = Vec2::new(781.0, 30.0);
        state.direction = Direction::new(1, 1);

        let outcome = tick(&mut state, &config, &TickInput::default());

        assert!(matches!(
            outcome,
            TickOutcome::Scored(PointScored { player: true, opponent: false })
        ));
        assert_eq!(state.score, Score { player: 1, opponent: 0 });
    }

    #[test]
    fn test_frozen_ball_stays_frozen() {
        let config = config();
        let mut state = GameState::new(&config);
        state.reset_round();
        for _ in 0..100 {
            assert_eq!(tick(&mut state, &config, &up()), TickOutcome::Advanced);
        }
        assert_eq!(state.ball.pos, Vec2::new(394.0, 294.0));
        assert_eq!(state.direction, Direction::STILL);
        assert_eq!(state.phase, GamePhase::Resetting);
        // The player paddle still answers the keyboard
        assert_eq!(state.player.pos.y, 0.0);
    }

    #[test]
    fn test_paused_tick_changes_nothing() {
        let config = config();
        let mut state = GameState::new(&config);
        state.running = false;
        let before = state.clone();

        assert_eq!(tick(&mut state, &config, &up()), TickOutcome::Paused);
        assert_eq!(state, before);

        state.running = true;
        tick(&mut state, &config, &TickInput::default());
        assert_eq!(state.ball.pos, Vec2::new(391.0, 297.0));
        assert_eq!(state.ticks, 1);
    }

    proptest! {
        #[test]
        fn paddle_stays_on_screen(
            start in -50.0f32..700.0,
            moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..200),
        ) {
            let config = config();
            let mut y = config.clamp_paddle_y(start);
            for (up, down) in moves {
                y = move_paddle(y, PaddleIntent { up, down }, &config);
                prop_assert!(y >= 0.0 && y <= config.paddle_max_y());
            }
        }

        #[test]
        fn clamp_is_idempotent(y in 0.0f32..504.0) {
            let config = config();
            let once = config.clamp_paddle_y(y);
            prop_assert_eq!(once, y);
            prop_assert_eq!(config.clamp_paddle_y(once), once);
        }
    }
}
