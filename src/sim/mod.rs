//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Per-tick fixed steps, elapsed time only feeds the countdown
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::aabb_overlap;
pub use difficulty::{Difficulty, DifficultyMods};
pub use particles::emit_burst;
pub use state::{Body, Bullet, Enemy, GameEvent, GamePhase, GameState, Particle, Player};
pub use tick::{tick, transition};
