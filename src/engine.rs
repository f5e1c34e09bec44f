//! Game loop driver
//!
//! Owns the simulation state and the scene painter, translates simulation
//! events into the host's callback seams (score, phase, sound), and tells
//! the host whether to keep scheduling frames. Scheduling itself - the
//! per-frame redraw signal - belongs to the host.

use std::cell::RefCell;
use std::rc::Rc;

use crate::consts::MAX_FRAME_DT_MS;
use crate::keys::KeyState;
use crate::renderer::{DrawSurface, Renderer};
use crate::sim::{Difficulty, GameEvent, GamePhase, GameState, tick, transition};

/// Host notification seam. Implementations update score displays, overlay
/// panels, persistence - anything outside the simulation.
pub trait EngineHooks {
    /// Called with the new total whenever the score changes
    fn on_score(&mut self, score: u32);
    /// Called on every state machine transition
    fn on_phase(&mut self, phase: GamePhase);
}

/// Sound collaborator seam. All calls are fire-and-forget.
pub trait SoundPlayer {
    /// Unlock the audio context after a user gesture; must be idempotent
    fn resume(&mut self);
    fn play_shoot(&mut self);
    fn play_explosion(&mut self);
}

/// No-op hooks for tests and headless runs
pub struct NullHooks;

impl EngineHooks for NullHooks {
    fn on_score(&mut self, _score: u32) {}
    fn on_phase(&mut self, _phase: GamePhase) {}
}

/// Silent sound collaborator
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn resume(&mut self) {}
    fn play_shoot(&mut self) {}
    fn play_explosion(&mut self) {}
}

pub struct Engine {
    pub state: GameState,
    renderer: Renderer,
    keys: Rc<RefCell<KeyState>>,
    hooks: Box<dyn EngineHooks>,
    sound: Box<dyn SoundPlayer>,
    events: Vec<GameEvent>,
    last_time: Option<f64>,
}

impl Engine {
    pub fn new(
        width: f32,
        height: f32,
        seed: u64,
        keys: Rc<RefCell<KeyState>>,
        hooks: Box<dyn EngineHooks>,
        sound: Box<dyn SoundPlayer>,
    ) -> Self {
        Self {
            state: GameState::new(width, height, seed),
            renderer: Renderer::new(seed ^ 0x5eed),
            keys,
            hooks,
            sound,
            events: Vec::new(),
            last_time: None,
        }
    }

    /// Reset the session and enter the countdown. The host must begin
    /// scheduling frames after this returns.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.state.reset(difficulty);
        self.sound.resume();
        // Rewind the machine first so a restart mid-countdown still
        // notifies the host of the fresh session
        self.state.phase = GamePhase::Start;
        transition(&mut self.state.phase, GamePhase::Countdown, &mut self.events);
        self.dispatch();
        self.last_time = None;
        log::info!("session started ({})", difficulty.as_str());
    }

    /// Drop transient entities and return to the idle menu state
    pub fn reset_to_menu(&mut self) {
        self.state.clear_transients();
        transition(&mut self.state.phase, GamePhase::Start, &mut self.events);
        self.dispatch();
        self.last_time = None;
    }

    /// Update the field dimensions, keeping the player anchored and in bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// Run one update/draw cycle. Returns true while the state is live, i.e.
    /// the host should schedule another frame; on a terminal state the final
    /// paint has already happened inside this call.
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn DrawSurface) -> bool {
        let dt_ms = match self.last_time {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DT_MS),
            None => 16.7,
        };
        self.last_time = Some(now_ms);

        {
            let keys = self.keys.borrow();
            tick(&mut self.state, &keys, dt_ms, &mut self.events);
        }
        self.dispatch();
        self.renderer.draw(&self.state, surface);

        self.state.phase.is_live()
    }

    /// Route queued simulation events to the host seams
    fn dispatch(&mut self) {
        for event in self.events.drain(..) {
            match event {
                GameEvent::PhaseChanged(phase) => self.hooks.on_phase(phase),
                GameEvent::ScoreChanged(score) => self.hooks.on_score(score),
                GameEvent::PlayerFired => self.sound.play_shoot(),
                GameEvent::EnemyDestroyed | GameEvent::PlayerHit => self.sound.play_explosion(),
            }
        }
    }
}
