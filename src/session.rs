//! Game session: one mounted game from start to teardown
//!
//! Owns the simulation state, the input tracker and the serve timer. The
//! platform calls `frame` once per display frame, forwards key events, and
//! reports expired serve timers. Only one serve timer is ever pending; a
//! newer point replaces it, and stale firings are dropped.

use crate::config::{ConfigError, GameConfig};
use crate::input::InputTracker;
use crate::platform::{ServeTimer, TimerId};
use crate::renderer::{RenderSurface, Renderer, Scoreboard};
use crate::sim::{GamePhase, GameState, TickOutcome, tick};

pub struct Session<T: ServeTimer> {
    config: GameConfig,
    state: GameState,
    input: InputTracker,
    timer: T,
    /// Serve restore waiting to fire
    pending_serve: Option<TimerId>,
    torn_down: bool,
}

impl<T: ServeTimer> Session<T> {
    /// Start a session; the viewport in `config` is fixed from here on
    pub fn new(config: GameConfig, timer: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(&config);
        log::info!(
            "Session started ({}x{} viewport)",
            config.viewport_width,
            config.viewport_height
        );
        Ok(Self {
            config,
            state,
            input: InputTracker::new(),
            timer,
            pending_serve: None,
            torn_down: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Serve timer currently waiting, if any
    pub fn pending_serve(&self) -> Option<TimerId> {
        self.pending_serve
    }

    pub fn is_running(&self) -> bool {
        self.state.running && !self.torn_down
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn key_down(&mut self, key: &str) {
        if !self.torn_down {
            self.input.press(key);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if !self.torn_down {
            self.input.release(key);
        }
    }

    /// Drop all held keys (window lost focus)
    pub fn release_all_keys(&mut self) {
        self.input.clear();
    }

    /// Update then render one frame
    pub fn frame<S, B>(&mut self, renderer: &Renderer, surface: &mut S, scoreboard: &mut B) -> TickOutcome
    where
        S: RenderSurface + ?Sized,
        B: Scoreboard + ?Sized,
    {
        if self.torn_down {
            return TickOutcome::Paused;
        }

        let outcome = self.step();
        if let TickOutcome::Scored(_) = outcome {
            scoreboard.show(self.state.score);
        }
        renderer.draw(&self.state, surface);
        outcome
    }

    /// Advance the simulation by one tick without rendering
    pub fn step(&mut self) -> TickOutcome {
        if self.torn_down {
            return TickOutcome::Paused;
        }

        let input = self.input.snapshot();
        let outcome = tick(&mut self.state, &self.config, &input);
        if let TickOutcome::Scored(_) = outcome {
            self.schedule_serve();
        }
        outcome
    }

    /// Replace any pending serve timer with a fresh one
    fn schedule_serve(&mut self) {
        if let Some(stale) = self.pending_serve.take() {
            log::debug!("Replacing pending serve timer {:?}", stale);
            self.timer.cancel(stale);
        }
        let id = self.timer.start(self.config.serve_delay());
        log::debug!("Serve timer {:?} started", id);
        self.pending_serve = Some(id);
    }

    /// Called by the platform when a serve timer expires
    pub fn serve_timer_fired(&mut self, id: TimerId) {
        if self.torn_down {
            return;
        }
        if self.pending_serve != Some(id) {
            log::warn!("Ignoring stale serve timer {:?}", id);
            return;
        }

        self.pending_serve = None;
        if self.state.phase == GamePhase::Resetting {
            self.state.serve();
            log::info!("Serve");
        }
    }

    /// Stop advancing the simulation; rendering may continue
    pub fn pause(&mut self) {
        if self.state.running && !self.torn_down {
            self.state.running = false;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if !self.state.running && !self.torn_down {
            self.state.running = true;
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.state.running {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// End the session: cancel the pending serve and ignore everything after
    ///
    /// The platform is responsible for cancelling its frame callback and
    /// detaching listeners alongside this call.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(id) = self.pending_serve.take() {
            self.timer.cancel(id);
        }
        self.input.clear();
        self.state.running = false;
        self.torn_down = true;
        log::info!(
            "Session ended at {} - {}",
            self.state.score.player,
            self.state.score.opponent
        );
    }
}
