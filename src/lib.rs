//! Neon Invaders - a grid invaders arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, tick, collisions, difficulty)
//! - `renderer`: 2D immediate-mode scene painting over a `DrawSurface`
//! - `engine`: Game loop driver and host callback seams
//! - `keys`: Injectable keyboard-state map
//! - `highscore`: Single best-score record (LocalStorage on web)
//! - `audio`: Web Audio synthesized sound effects (wasm only)

pub mod engine;
pub mod highscore;
pub mod keys;
pub mod renderer;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use engine::Engine;
pub use keys::KeyState;

/// Game configuration constants
pub mod consts {
    /// Player ship dimensions (pixels)
    pub const PLAYER_WIDTH: f32 = 44.0;
    pub const PLAYER_HEIGHT: f32 = 26.0;
    /// Horizontal movement per tick while a key is held
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Distance from the bottom edge to the player's top edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 48.0;
    /// Ticks between player shots
    pub const PLAYER_COOLDOWN_TICKS: f32 = 15.0;

    /// Bullet dimensions and speeds (per tick)
    pub const BULLET_WIDTH: f32 = 3.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    pub const PLAYER_BULLET_SPEED: f32 = 7.0;
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;

    /// Enemy formation layout
    pub const ENEMY_ROWS: usize = 4;
    pub const ENEMY_COLS: usize = 8;
    pub const ENEMY_WIDTH: f32 = 36.0;
    pub const ENEMY_HEIGHT: f32 = 26.0;
    pub const ENEMY_H_SPACING: f32 = 52.0;
    pub const ENEMY_V_SPACING: f32 = 44.0;
    pub const ENEMY_TOP_MARGIN: f32 = 64.0;

    /// Enemy formation motion
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    /// Cumulative speed bump on each wall bounce
    pub const ENEMY_SPEED_INCREMENT: f32 = 0.2;
    /// Vertical drop on each wall bounce
    pub const ENEMY_DESCENT: f32 = 20.0;
    /// Base per-enemy per-tick fire probability, before score/difficulty scaling
    pub const ENEMY_FIRE_BASE: f32 = 0.001;

    pub const SCORE_PER_KILL: u32 = 100;

    /// Explosion burst sizes
    pub const BURST_ENEMY: usize = 25;
    pub const BURST_PLAYER: usize = 40;

    /// Particle tuning
    pub const PARTICLE_LIFE: f32 = 45.0;
    pub const PARTICLE_DRAG: f32 = 0.95;
    pub const PARTICLE_SHRINK: f32 = 0.96;
    pub const PARTICLE_MIN_RADIUS: f32 = 0.2;

    /// Countdown before gameplay starts
    pub const COUNTDOWN_START: u32 = 3;
    pub const COUNTDOWN_STEP_MS: f64 = 1000.0;

    /// Frame delta clamp so a backgrounded tab doesn't fast-forward the game
    pub const MAX_FRAME_DT_MS: f64 = 100.0;

    /// Scanline overlay pitch (pixels)
    pub const SCANLINE_SPACING: f32 = 4.0;
}

/// An opaque RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Fixed display palette
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0, 0, 0);
    pub const PLAYER: Color = Color::rgb(61, 255, 110);
    pub const COCKPIT: Color = Color::rgb(200, 255, 255);
    pub const FLAME: Color = Color::rgb(255, 160, 40);
    pub const PLAYER_BOLT: Color = Color::rgb(170, 238, 255);
    pub const ENEMY_BOLT: Color = Color::rgb(255, 85, 85);
    pub const SCANLINE: Color = Color::rgb(0, 255, 255);
    pub const COUNTDOWN_TEXT: Color = Color::rgb(0, 255, 200);

    /// One color per formation row, cycled when there are more rows
    pub const ENEMY_ROWS: [Color; 4] = [
        Color::rgb(255, 51, 102),
        Color::rgb(255, 153, 51),
        Color::rgb(51, 255, 153),
        Color::rgb(51, 153, 255),
    ];

    /// Explosion accent colors mixed into particle bursts
    pub const FIRE: [Color; 4] = [
        Color::rgb(255, 221, 0),
        Color::rgb(255, 136, 0),
        Color::rgb(255, 68, 0),
        Color::rgb(255, 255, 255),
    ];
}
