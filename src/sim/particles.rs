//! Particle emitter and per-tick particle physics

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::{Color, palette};

use super::state::{Body, Particle};

/// Spawn an explosion burst at `origin` and append it to the live collection.
///
/// Each particle picks a uniform direction, a speed in [1, 5), a radius in
/// [2, 7), and uses `base_color` with probability 0.7, otherwise one of the
/// fire palette colors. Lifetime is fixed at [`PARTICLE_LIFE`] ticks.
pub fn emit_burst(
    particles: &mut Vec<Particle>,
    origin: Vec2,
    base_color: Color,
    count: usize,
    rng: &mut Pcg32,
) {
    for _ in 0..count {
        let angle = rng.random_range(0.0f32..std::f32::consts::TAU);
        let speed = rng.random_range(1.0f32..5.0);
        let color = if rng.random::<f32>() < 0.7 {
            base_color
        } else {
            palette::FIRE[rng.random_range(0..palette::FIRE.len())]
        };
        let radius = rng.random_range(2.0f32..7.0);

        let mut body = Body::new(origin, Vec2::splat(radius * 2.0), color);
        body.vel = Vec2::from_angle(angle) * speed;
        particles.push(Particle {
            body,
            radius,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
        });
    }
}

/// Integrate one tick of particle motion: Euler step, velocity drag, radius
/// shrink, life decrement. Particles die at zero life or below the
/// visibility threshold.
pub fn advance(particles: &mut [Particle]) {
    for p in particles.iter_mut().filter(|p| p.body.active) {
        p.body.pos += p.body.vel;
        p.body.vel *= PARTICLE_DRAG;
        p.radius *= PARTICLE_SHRINK;
        p.life -= 1.0;
        if p.life <= 0.0 || p.radius < PARTICLE_MIN_RADIUS {
            p.body.active = false;
        }
    }
}
