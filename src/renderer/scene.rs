//! Scene painter
//!
//! Pure read of the current entity set; the only mutable state is the
//! renderer's own RNG driving the thrust-flame flicker. Draw order: clear,
//! player, enemies, bullets, particles (additive), countdown overlay,
//! scanlines.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::SCANLINE_SPACING;
use crate::palette;
use crate::sim::{Bullet, Enemy, GamePhase, GameState, Player};

use super::surface::DrawSurface;

/// Flame is skipped with probability 0.2 per frame to flicker
const FLAME_CHANCE: f32 = 0.8;
/// Scanline bar opacity
const SCANLINE_ALPHA: f32 = 0.04;
/// Countdown numeral size
const COUNTDOWN_PX: f32 = 96.0;

pub struct Renderer {
    rng: Pcg32,
}

impl Renderer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn draw(&mut self, state: &GameState, surface: &mut dyn DrawSurface) {
        surface.clear(palette::BACKGROUND);

        if matches!(state.phase, GamePhase::Playing | GamePhase::Countdown) {
            self.draw_player(&state.player, surface);
        }

        for enemy in state.enemies.iter().filter(|e| e.body.active) {
            draw_enemy(enemy, surface);
        }

        for bullet in state.bullets.iter().filter(|b| b.body.active) {
            draw_bullet(bullet, surface);
        }

        surface.set_additive(true);
        for particle in state.particles.iter().filter(|p| p.body.active) {
            surface.fill_circle(
                particle.body.pos,
                particle.radius,
                particle.body.color,
                particle.fade(),
            );
        }
        surface.set_additive(false);

        if state.phase == GamePhase::Countdown && state.countdown > 0 {
            surface.fill_text(
                &state.countdown.to_string(),
                Vec2::new(state.width * 0.5, state.height * 0.5),
                COUNTDOWN_PX,
                palette::COUNTDOWN_TEXT,
            );
        }

        draw_scanlines(state.width, state.height, surface);
    }

    /// Pointed hull with a cockpit dot and a flickering thrust flame
    fn draw_player(&mut self, player: &Player, surface: &mut dyn DrawSurface) {
        let p = player.body.pos;
        let s = player.body.size;

        let hull = [
            Vec2::new(p.x + s.x * 0.5, p.y),
            Vec2::new(p.x + s.x, p.y + s.y * 0.78),
            Vec2::new(p.x + s.x * 0.72, p.y + s.y),
            Vec2::new(p.x + s.x * 0.28, p.y + s.y),
            Vec2::new(p.x, p.y + s.y * 0.78),
        ];
        surface.fill_polygon(&hull, player.body.color);

        surface.fill_circle(
            Vec2::new(p.x + s.x * 0.5, p.y + s.y * 0.45),
            3.0,
            palette::COCKPIT,
            1.0,
        );

        if self.rng.random::<f32>() < FLAME_CHANCE {
            let length = 8.0 + self.rng.random_range(0.0f32..6.0);
            let flame = [
                Vec2::new(p.x + s.x * 0.38, p.y + s.y),
                Vec2::new(p.x + s.x * 0.62, p.y + s.y),
                Vec2::new(p.x + s.x * 0.5, p.y + s.y + length),
            ];
            surface.fill_polygon(&flame, palette::FLAME);
        }
    }
}

/// Hexagonal crab silhouette with two eye dots
fn draw_enemy(enemy: &Enemy, surface: &mut dyn DrawSurface) {
    let p = enemy.body.pos;
    let s = enemy.body.size;

    let hull = [
        Vec2::new(p.x + s.x * 0.25, p.y),
        Vec2::new(p.x + s.x * 0.75, p.y),
        Vec2::new(p.x + s.x, p.y + s.y * 0.5),
        Vec2::new(p.x + s.x * 0.75, p.y + s.y),
        Vec2::new(p.x + s.x * 0.25, p.y + s.y),
        Vec2::new(p.x, p.y + s.y * 0.5),
    ];
    surface.fill_polygon(&hull, enemy.body.color);

    for eye_x in [0.35, 0.65] {
        surface.fill_circle(
            Vec2::new(p.x + s.x * eye_x, p.y + s.y * 0.42),
            2.5,
            palette::BACKGROUND,
            1.0,
        );
    }
}

/// Short glowing vertical line in the owner's color
fn draw_bullet(bullet: &Bullet, surface: &mut dyn DrawSurface) {
    let p = bullet.body.pos;
    let s = bullet.body.size;
    let cx = p.x + s.x * 0.5;
    surface.stroke_line(
        Vec2::new(cx, p.y),
        Vec2::new(cx, p.y + s.y),
        bullet.body.color,
        s.x,
        8.0,
    );
}

/// Thin translucent cyan bars every few pixels, painted last
fn draw_scanlines(width: f32, height: f32, surface: &mut dyn DrawSurface) {
    let mut y = 0.0;
    while y < height {
        surface.fill_rect(
            Vec2::new(0.0, y),
            Vec2::new(width, 1.0),
            palette::SCANLINE,
            SCANLINE_ALPHA,
        );
        y += SCANLINE_SPACING;
    }
}
