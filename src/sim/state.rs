//! Game state and core entity types
//!
//! Every spatial entity embeds a common `Body` (position, size, velocity,
//! color, active flag); variants add only what they need on top.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::{Color, palette};

use super::difficulty::Difficulty;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Idle, menu shown by the host
    Start,
    /// Pre-game countdown running
    Countdown,
    /// Active gameplay
    Playing,
    /// Run ended by enemy contact or enemy fire
    GameOver,
    /// Formation cleared
    Victory,
}

impl GamePhase {
    /// Phases during which the loop keeps scheduling frames
    pub fn is_live(self) -> bool {
        matches!(self, GamePhase::Countdown | GamePhase::Playing)
    }
}

/// Shared physical state embedded by every entity variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// False marks the entity as resolved / pending removal
    pub active: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            color,
            active: true,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// The player ship. Exactly one exists per session.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// Ticks remaining before the ship may fire again
    pub cooldown: f32,
}

impl Player {
    pub fn new(field_width: f32, field_height: f32) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        let pos = Vec2::new(
            (field_width - size.x) * 0.5,
            field_height - PLAYER_BOTTOM_MARGIN,
        );
        Self {
            body: Body::new(pos, size, palette::PLAYER),
            cooldown: 0.0,
        }
    }

    /// Keep the ship anchored near the bottom edge and inside the field
    pub fn anchor(&mut self, field_width: f32, field_height: f32) {
        self.body.pos.y = field_height - PLAYER_BOTTOM_MARGIN;
        self.body.pos.x = self.body.pos.x.clamp(0.0, field_width - self.body.size.x);
    }

    /// Muzzle point at the top center of the hull
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.body.pos.x + self.body.size.x * 0.5, self.body.pos.y)
    }
}

/// One cell of the enemy formation. Deactivated on hit, never removed
/// until a full session reset.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub row: usize,
    pub col: usize,
}

/// A projectile fired by either side
#[derive(Debug, Clone)]
pub struct Bullet {
    pub body: Body,
    /// Owner flag: picks the collision set and the color/speed profile
    pub from_player: bool,
}

impl Bullet {
    /// Spawn a player bullet centered on `muzzle`, moving up
    pub fn player_shot(muzzle: Vec2) -> Self {
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        let mut body = Body::new(muzzle - Vec2::new(size.x * 0.5, size.y), size, palette::PLAYER_BOLT);
        body.vel = Vec2::new(0.0, -PLAYER_BULLET_SPEED);
        Self {
            body,
            from_player: true,
        }
    }

    /// Spawn an enemy bullet at `muzzle`, moving down at the difficulty-scaled speed
    pub fn enemy_shot(muzzle: Vec2, speed_mult: f32) -> Self {
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        let mut body = Body::new(muzzle - Vec2::new(size.x * 0.5, 0.0), size, palette::ENEMY_BOLT);
        body.vel = Vec2::new(0.0, ENEMY_BULLET_SPEED * speed_mult);
        Self {
            body,
            from_player: false,
        }
    }
}

/// A short-lived explosion fragment
#[derive(Debug, Clone)]
pub struct Particle {
    pub body: Body,
    pub radius: f32,
    /// Ticks remaining
    pub life: f32,
    /// Life at spawn, for the fade fraction
    pub max_life: f32,
}

impl Particle {
    /// Remaining life fraction in [0, 1], drives render opacity
    pub fn fade(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Notifications emitted by the simulation for the driver to dispatch.
/// The sim itself never touches sound or the host callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    ScoreChanged(u32),
    PlayerFired,
    EnemyDestroyed,
    PlayerHit,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Playing field size in surface pixels, origin top-left, y down
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub score: u32,
    /// Countdown numeral currently shown (3..=0)
    pub countdown: u32,
    /// Elapsed ms accumulated toward the next countdown step
    pub countdown_elapsed_ms: f64,
    /// Formation horizontal speed, bumped on every wall bounce
    pub enemy_speed: f32,
    /// Formation direction: +1 right, -1 left
    pub enemy_dir: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    /// Seeded RNG for enemy fire rolls and particle bursts
    pub rng: Pcg32,
    pub seed: u64,
}

impl GameState {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            width,
            height,
            phase: GamePhase::Start,
            difficulty: Difficulty::default(),
            score: 0,
            countdown: COUNTDOWN_START,
            countdown_elapsed_ms: 0.0,
            enemy_speed: ENEMY_BASE_SPEED,
            enemy_dir: 1.0,
            player: Player::new(width, height),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Re-seed the session for a fresh run. The phase transition itself is
    /// the driver's job so the host gets notified.
    pub fn reset(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.score = 0;
        self.countdown = COUNTDOWN_START;
        self.countdown_elapsed_ms = 0.0;
        self.enemy_speed = ENEMY_BASE_SPEED;
        self.enemy_dir = 1.0;
        self.player = Player::new(self.width, self.height);
        self.bullets.clear();
        self.particles.clear();
        self.spawn_formation();
    }

    /// Lay out the rows x cols enemy grid, centered horizontally
    pub fn spawn_formation(&mut self) {
        self.enemies.clear();
        let span = (ENEMY_COLS - 1) as f32 * ENEMY_H_SPACING + ENEMY_WIDTH;
        let origin_x = (self.width - span) * 0.5;
        for row in 0..ENEMY_ROWS {
            for col in 0..ENEMY_COLS {
                let pos = Vec2::new(
                    origin_x + col as f32 * ENEMY_H_SPACING,
                    ENEMY_TOP_MARGIN + row as f32 * ENEMY_V_SPACING,
                );
                let size = Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT);
                let color = palette::ENEMY_ROWS[row % palette::ENEMY_ROWS.len()];
                self.enemies.push(Enemy {
                    body: Body::new(pos, size, color),
                    row,
                    col,
                });
            }
        }
    }

    /// Drop bullets and particles without touching the formation or score
    pub fn clear_transients(&mut self) {
        self.bullets.clear();
        self.particles.clear();
    }

    /// Update the field size and re-anchor the player
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.player.anchor(width, height);
    }

    pub fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.body.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formation_layout() {
        let mut state = GameState::new(800.0, 600.0, 1);
        state.spawn_formation();
        assert_eq!(state.enemies.len(), ENEMY_ROWS * ENEMY_COLS);
        for enemy in &state.enemies {
            assert!(enemy.body.pos.x >= 0.0);
            assert!(enemy.body.pos.x + enemy.body.size.x <= 800.0);
            assert!(enemy.body.active);
        }
        // Row colors cycle through the palette
        assert_eq!(state.enemies[0].body.color, palette::ENEMY_ROWS[0]);
        let last_row = &state.enemies[(ENEMY_ROWS - 1) * ENEMY_COLS];
        assert_eq!(last_row.row, ENEMY_ROWS - 1);
    }

    #[test]
    fn test_reset_clears_transients_and_score() {
        let mut state = GameState::new(800.0, 600.0, 1);
        state.reset(Difficulty::Easy);
        state.score = 500;
        state.enemy_speed = 3.0;
        state.bullets.push(Bullet::player_shot(Vec2::new(100.0, 100.0)));
        state.particles.push(Particle {
            body: Body::new(Vec2::ZERO, Vec2::ZERO, palette::FIRE[0]),
            radius: 3.0,
            life: 10.0,
            max_life: PARTICLE_LIFE,
        });

        state.reset(Difficulty::Hard);
        assert_eq!(state.score, 0);
        assert_eq!(state.enemy_speed, ENEMY_BASE_SPEED);
        assert_eq!(state.enemy_dir, 1.0);
        assert!(state.bullets.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.enemies.len(), ENEMY_ROWS * ENEMY_COLS);
        assert_eq!(state.countdown, COUNTDOWN_START);
    }

    #[test]
    fn test_resize_anchors_player() {
        let mut state = GameState::new(800.0, 600.0, 1);
        state.player.body.pos.x = 780.0;
        state.resize(400.0, 300.0);
        assert_eq!(state.player.body.pos.y, 300.0 - PLAYER_BOTTOM_MARGIN);
        assert!(state.player.body.pos.x <= 400.0 - state.player.body.size.x);
    }

    #[test]
    fn test_bullet_profiles() {
        let player_shot = Bullet::player_shot(Vec2::new(100.0, 500.0));
        assert!(player_shot.from_player);
        assert!(player_shot.body.vel.y < 0.0);

        let enemy_shot = Bullet::enemy_shot(Vec2::new(100.0, 100.0), 0.5);
        assert!(!enemy_shot.from_player);
        assert_eq!(enemy_shot.body.vel.y, ENEMY_BULLET_SPEED * 0.5);
    }
}
