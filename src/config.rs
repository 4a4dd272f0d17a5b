//! Session configuration
//!
//! The viewport is captured once when a session starts; the simulation never
//! rescales afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Longest accepted serve delay
pub const MAX_SERVE_DELAY_MS: u64 = 60_000;

/// Viewport and tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Pixels per frame
    pub paddle_speed: f32,

    // === Ball ===
    pub ball_size: f32,
    /// Pixels per frame on each axis
    pub ball_speed: f32,

    /// Delay between a point and the next serve
    pub serve_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,

            ball_size: BALL_SIZE,
            ball_speed: BALL_SPEED,

            serve_delay_ms: SERVE_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Default tuning for the given viewport
    pub fn for_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every dimension is usable and the field can hold both
    /// paddles and the ball side by side
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("ball_speed", self.ball_speed),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let min_width = 2.0 * self.paddle_width + self.ball_size;
        let min_height = self.paddle_height.max(self.ball_size);
        if self.viewport_width < min_width || self.viewport_height < min_height {
            return Err(ConfigError::ViewportTooSmall {
                width: self.viewport_width,
                height: self.viewport_height,
                min_width,
                min_height,
            });
        }

        if self.serve_delay_ms > MAX_SERVE_DELAY_MS {
            return Err(ConfigError::ServeDelayTooLong {
                value: self.serve_delay_ms,
                max: MAX_SERVE_DELAY_MS,
            });
        }

        Ok(())
    }

    pub fn serve_delay(&self) -> Duration {
        Duration::from_millis(self.serve_delay_ms)
    }

    /// Highest paddle y that keeps the paddle on screen
    #[inline]
    pub fn paddle_max_y(&self) -> f32 {
        self.viewport_height - self.paddle_height
    }

    /// Clamp a paddle y into `[0, viewport_height - paddle_height]`
    ///
    /// A paddle taller than the viewport pins to `paddle_max_y`.
    #[inline]
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        y.max(0.0).min(self.paddle_max_y())
    }
}

/// Invalid configuration
#[derive(Debug)]
pub enum ConfigError {
    /// A dimension or speed is zero, negative, or not finite
    NotPositive { field: &'static str, value: f32 },
    /// The viewport cannot fit two paddles and the ball
    ViewportTooSmall {
        width: f32,
        height: f32,
        min_width: f32,
        min_height: f32,
    },
    /// Serve delay beyond `MAX_SERVE_DELAY_MS`
    ServeDelayTooLong { value: u64, max: u64 },
    /// Overrides were not valid JSON for this struct
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            Self::ViewportTooSmall {
                width,
                height,
                min_width,
                min_height,
            } => write!(
                f,
                "viewport {}x{} is smaller than the minimum {}x{}",
                width, height, min_width, min_height
            ),
            Self::ServeDelayTooLong { value, max } => {
                write!(f, "serve_delay_ms {} exceeds the maximum {}", value, max)
            }
            Self::Parse(e) => write!(f, "invalid config JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_clamp_paddle_y() {
        let config = GameConfig::for_viewport(800.0, 600.0);
        assert_eq!(config.clamp_paddle_y(-10.0), 0.0);
        assert_eq!(config.clamp_paddle_y(1000.0), 504.0);
        assert_eq!(config.clamp_paddle_y(250.0), 250.0);
    }

    #[test]
    fn test_from_json_partial_overrides() {
        let config = GameConfig::from_json(r#"{"ball_speed": 5.0, "viewport_width": 1024}"#)
            .expect("valid overrides");
        assert_eq!(config.ball_speed, 5.0);
        assert_eq!(config.viewport_width, 1024.0);
        assert_eq!(config.paddle_height, PADDLE_HEIGHT);
        assert_eq!(config.serve_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive() {
        let config = GameConfig {
            ball_speed: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "ball_speed",
                ..
            })
        ));

        let config = GameConfig {
            paddle_height: f32::NAN,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_tiny_viewport() {
        let config = GameConfig::for_viewport(40.0, 600.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ViewportTooSmall { .. })
        ));

        let config = GameConfig::for_viewport(800.0, 50.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_with_paddle_taller_than_viewport() {
        // Unvalidated: max y is negative
        let config = GameConfig::for_viewport(800.0, 50.0);
        assert_eq!(config.paddle_max_y(), -46.0);
        assert_eq!(config.clamp_paddle_y(10.0), -46.0);
        assert_eq!(config.clamp_paddle_y(-100.0), -46.0);
    }

    #[test]
    fn test_rejects_huge_serve_delay() {
        let config = GameConfig {
            serve_delay_ms: MAX_SERVE_DELAY_MS,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());

        let err = GameConfig::from_json(r#"{"serve_delay_ms": 3000000000}"#)
            .expect_err("delay past the limit");
        assert!(matches!(
            err,
            ConfigError::ServeDelayTooLong {
                value: 3_000_000_000,
                max: MAX_SERVE_DELAY_MS
            }
        ));
    }
}
