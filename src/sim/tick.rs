//! Simulation step
//!
//! Advances the game by one frame: input handling, formation motion,
//! projectiles, collisions, particles, and phase transitions. Physics is
//! per-tick fixed steps; the elapsed delta only feeds the countdown so a
//! suspended tab resuming does not instantly drop the formation.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::keys::KeyState;

use super::collision::aabb_overlap;
use super::particles::{self, emit_burst};
use super::state::{Bullet, GameEvent, GamePhase, GameState};

/// Move the state machine, emitting a `PhaseChanged` event only on an
/// actual change. Repeated transitions to the same phase are no-ops.
pub fn transition(phase: &mut GamePhase, next: GamePhase, events: &mut Vec<GameEvent>) {
    if *phase != next {
        *phase = next;
        events.push(GameEvent::PhaseChanged(next));
    }
}

/// Advance the simulation by one frame.
///
/// `dt_ms` is wall-clock time since the previous call. Start and terminal
/// phases are no-ops; Countdown consumes the delta; Playing runs one fixed
/// physics step.
pub fn tick(state: &mut GameState, keys: &KeyState, dt_ms: f64, events: &mut Vec<GameEvent>) {
    match state.phase {
        GamePhase::Start | GamePhase::GameOver | GamePhase::Victory => {}
        GamePhase::Countdown => countdown_tick(state, dt_ms, events),
        GamePhase::Playing => playing_tick(state, keys, events),
    }
}

fn countdown_tick(state: &mut GameState, dt_ms: f64, events: &mut Vec<GameEvent>) {
    state.countdown_elapsed_ms += dt_ms;
    while state.countdown_elapsed_ms >= COUNTDOWN_STEP_MS && state.countdown > 0 {
        state.countdown_elapsed_ms -= COUNTDOWN_STEP_MS;
        state.countdown -= 1;
        if state.countdown == 0 {
            transition(&mut state.phase, GamePhase::Playing, events);
        }
    }
}

fn playing_tick(state: &mut GameState, keys: &KeyState, events: &mut Vec<GameEvent>) {
    let mods = state.difficulty.mods();
    let width = state.width;
    let height = state.height;

    // Player movement, clamped to the field
    {
        let body = &mut state.player.body;
        if keys.left() {
            body.pos.x -= PLAYER_SPEED;
        }
        if keys.right() {
            body.pos.x += PLAYER_SPEED;
        }
        body.pos.x = body.pos.x.clamp(0.0, width - body.size.x);
    }

    // Shot cooldown and firing
    if state.player.cooldown > 0.0 {
        state.player.cooldown -= 1.0;
    }
    if state.player.cooldown <= 0.0 && keys.fire() {
        let muzzle = state.player.nose();
        state.bullets.push(Bullet::player_shot(muzzle));
        state.player.cooldown = PLAYER_COOLDOWN_TICKS;
        events.push(GameEvent::PlayerFired);
    }

    // Advance bullets; cull anything leaving the field vertically
    for bullet in state.bullets.iter_mut().filter(|b| b.body.active) {
        bullet.body.pos += bullet.body.vel;
        if bullet.body.pos.y < 0.0 || bullet.body.pos.y > height {
            bullet.body.active = false;
        }
    }

    // A cleared formation is an instant win, checked before any enemy logic
    if !state.enemies.iter().any(|e| e.body.active) {
        transition(&mut state.phase, GamePhase::Victory, events);
        return;
    }

    // Formation march: horizontal step, wall detection, loss-by-contact,
    // and the per-enemy fire roll (independent per enemy, not normalized)
    let step = state.enemy_speed * state.enemy_dir;
    let player_line = state.player.body.pos.y;
    let fire_chance =
        ENEMY_FIRE_BASE * (1.0 + state.score as f32 / 500.0) * mods.frequency;
    let mut wall_hit = false;
    let mut reached_player = false;
    {
        let GameState {
            enemies,
            bullets,
            rng,
            ..
        } = state;
        for enemy in enemies.iter_mut().filter(|e| e.body.active) {
            let body = &mut enemy.body;
            body.pos.x += step;
            if (body.pos.x <= 0.0 && step < 0.0)
                || (body.pos.x + body.size.x >= width && step > 0.0)
            {
                wall_hit = true;
            }
            if body.bottom() >= player_line {
                reached_player = true;
            }
            if rng.random::<f32>() < fire_chance {
                let muzzle = Vec2::new(body.pos.x + body.size.x * 0.5, body.bottom());
                bullets.push(Bullet::enemy_shot(muzzle, mods.speed));
            }
        }
    }

    // Formation descent: flip direction, drop, and speed up permanently
    if wall_hit {
        state.enemy_dir = -state.enemy_dir;
        for enemy in state.enemies.iter_mut().filter(|e| e.body.active) {
            enemy.body.pos.y += ENEMY_DESCENT;
        }
        state.enemy_speed += ENEMY_SPEED_INCREMENT;
    }

    // Contact with the player's front line ends the run regardless of fire
    if reached_player {
        transition(&mut state.phase, GamePhase::GameOver, events);
    }

    // Bullet collisions
    {
        let GameState {
            bullets,
            enemies,
            particles,
            player,
            rng,
            score,
            phase,
            ..
        } = state;
        for bullet in bullets.iter_mut().filter(|b| b.body.active) {
            if bullet.from_player {
                for enemy in enemies.iter_mut().filter(|e| e.body.active) {
                    if aabb_overlap(&bullet.body, &enemy.body) {
                        bullet.body.active = false;
                        enemy.body.active = false;
                        emit_burst(particles, enemy.body.center(), enemy.body.color, BURST_ENEMY, rng);
                        *score += SCORE_PER_KILL;
                        events.push(GameEvent::EnemyDestroyed);
                        events.push(GameEvent::ScoreChanged(*score));
                        break;
                    }
                }
            } else if aabb_overlap(&bullet.body, &player.body) {
                bullet.body.active = false;
                emit_burst(particles, player.body.center(), player.body.color, BURST_PLAYER, rng);
                events.push(GameEvent::PlayerHit);
                transition(phase, GamePhase::GameOver, events);
            }
        }
    }

    // Particle physics, then compaction so the next tick never sees
    // stale inactive members
    particles::advance(&mut state.particles);
    state.bullets.retain(|b| b.body.active);
    state.particles.retain(|p| p.body.active);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;
    use crate::sim::state::{Body, GameState};
    use crate::sim::Difficulty;
    use proptest::prelude::*;

    const W: f32 = 640.0;
    const H: f32 = 480.0;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(W, H, seed);
        state.reset(Difficulty::Hard);
        state.phase = GamePhase::Playing;
        state
    }

    fn keys_of(pressed: &[&str]) -> KeyState {
        let mut keys = KeyState::default();
        for key in pressed {
            keys.set(key, true);
        }
        keys
    }

    fn still_bullet(x: f32, y: f32, from_player: bool) -> Bullet {
        let color = if from_player {
            palette::PLAYER_BOLT
        } else {
            palette::ENEMY_BOLT
        };
        Bullet {
            body: Body::new(glam::Vec2::new(x, y), glam::Vec2::new(BULLET_WIDTH, BULLET_HEIGHT), color),
            from_player,
        }
    }

    #[test]
    fn test_start_and_terminal_phases_are_noops() {
        for phase in [GamePhase::Start, GamePhase::GameOver, GamePhase::Victory] {
            let mut state = playing_state(1);
            state.phase = phase;
            let snapshot_x = state.player.body.pos.x;
            let mut events = Vec::new();
            tick(&mut state, &keys_of(&["ArrowLeft", " "]), 16.0, &mut events);
            assert_eq!(state.phase, phase);
            assert_eq!(state.player.body.pos.x, snapshot_x);
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_countdown_reaches_playing_after_three_seconds() {
        let mut state = GameState::new(W, H, 1);
        state.reset(Difficulty::Hard);
        state.phase = GamePhase::Countdown;
        assert_eq!(state.countdown, 3);

        let keys = KeyState::default();
        let mut events = Vec::new();
        tick(&mut state, &keys, 1000.0, &mut events);
        assert_eq!(state.countdown, 2);
        assert_eq!(state.phase, GamePhase::Countdown);
        tick(&mut state, &keys, 1000.0, &mut events);
        assert_eq!(state.countdown, 1);
        tick(&mut state, &keys, 1000.0, &mut events);
        assert_eq!(state.countdown, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(events.contains(&GameEvent::PhaseChanged(GamePhase::Playing)));
    }

    #[test]
    fn test_countdown_accumulates_partial_deltas() {
        let mut state = GameState::new(W, H, 1);
        state.reset(Difficulty::Hard);
        state.phase = GamePhase::Countdown;

        let keys = KeyState::default();
        let mut events = Vec::new();
        for _ in 0..179 {
            tick(&mut state, &keys, 16.7, &mut events);
        }
        // 179 * 16.7ms = ~2989ms: still counting
        assert_eq!(state.phase, GamePhase::Countdown);
        tick(&mut state, &keys, 16.7, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_player_clamped_left_and_right() {
        let mut state = playing_state(1);
        let mut events = Vec::new();

        // One step left from just inside the edge clamps to zero
        state.player.body.pos.x = 3.0;
        tick(&mut state, &keys_of(&["ArrowLeft"]), 16.0, &mut events);
        assert_eq!(state.player.body.pos.x, 0.0);

        // Same on the right edge
        let max_x = W - state.player.body.size.x;
        state.player.body.pos.x = max_x - 3.0;
        tick(&mut state, &keys_of(&["d"]), 16.0, &mut events);
        assert_eq!(state.player.body.pos.x, max_x);

        // Opposing keys cancel into a net clamp-safe move
        tick(&mut state, &keys_of(&["a", "d"]), 16.0, &mut events);
        assert_eq!(state.player.body.pos.x, max_x);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = playing_state(1);
        let fire = keys_of(&[" "]);
        let mut events = Vec::new();

        tick(&mut state, &fire, 16.0, &mut events);
        assert_eq!(state.player.cooldown, PLAYER_COOLDOWN_TICKS);
        let shots = events.iter().filter(|e| **e == GameEvent::PlayerFired).count();
        assert_eq!(shots, 1);

        // Held key fires again only after the cooldown drains
        for _ in 0..(PLAYER_COOLDOWN_TICKS as usize) {
            tick(&mut state, &fire, 16.0, &mut events);
        }
        let shots = events.iter().filter(|e| **e == GameEvent::PlayerFired).count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_enemy_collection_length_invariant() {
        let mut state = playing_state(3);
        let keys = keys_of(&[" ", "ArrowRight"]);
        let mut events = Vec::new();
        for _ in 0..200 {
            tick(&mut state, &keys, 16.0, &mut events);
            assert_eq!(state.enemies.len(), ENEMY_ROWS * ENEMY_COLS);
        }
    }

    #[test]
    fn test_victory_short_circuits_enemy_logic() {
        let mut state = playing_state(1);
        for enemy in &mut state.enemies {
            enemy.body.active = false;
        }
        let bullets_before = state.bullets.len();
        let mut events = Vec::new();
        tick(&mut state, &KeyState::default(), 16.0, &mut events);

        assert_eq!(state.phase, GamePhase::Victory);
        assert!(events.contains(&GameEvent::PhaseChanged(GamePhase::Victory)));
        // No enemy fire was rolled that tick
        assert_eq!(state.bullets.len(), bullets_before);
    }

    #[test]
    fn test_player_bullet_kill() {
        let mut state = playing_state(1);
        let target = state.enemies[0].body;
        state.bullets.push(still_bullet(
            target.pos.x + target.size.x * 0.5,
            target.pos.y + target.size.y * 0.5,
            true,
        ));
        let mut events = Vec::new();
        tick(&mut state, &KeyState::default(), 16.0, &mut events);

        assert!(!state.enemies[0].body.active);
        assert_eq!(state.score, SCORE_PER_KILL);
        assert!(events.contains(&GameEvent::ScoreChanged(SCORE_PER_KILL)));
        assert!(events.contains(&GameEvent::EnemyDestroyed));
        assert_eq!(state.particles.len(), BURST_ENEMY);
        // The spent bullet was compacted away
        assert!(state.bullets.iter().all(|b| b.body.active));
    }

    #[test]
    fn test_enemy_bullet_ends_game_idempotently() {
        let mut state = playing_state(1);
        let player_center = state.player.body.center();
        state
            .bullets
            .push(still_bullet(player_center.x, player_center.y, false));
        let mut events = Vec::new();
        tick(&mut state, &KeyState::default(), 16.0, &mut events);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.particles.len(), BURST_PLAYER);
        assert!(events.contains(&GameEvent::PlayerHit));
        let transitions = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PhaseChanged(_)))
            .count();
        assert_eq!(transitions, 1);

        // Further updates are no-ops and emit nothing new
        events.clear();
        tick(&mut state, &KeyState::default(), 16.0, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.is_empty());
    }

    #[test]
    fn test_wall_bounce_flips_drops_and_speeds_up() {
        let mut state = playing_state(1);
        state.enemy_dir = -1.0;
        // Put the leftmost column on the wall
        let min_x = state
            .enemies
            .iter()
            .map(|e| e.body.pos.x)
            .fold(f32::INFINITY, f32::min);
        for enemy in &mut state.enemies {
            enemy.body.pos.x -= min_x;
        }
        let rows_before: Vec<f32> = state.enemies.iter().map(|e| e.body.pos.y).collect();
        let speed_before = state.enemy_speed;

        let mut events = Vec::new();
        tick(&mut state, &KeyState::default(), 16.0, &mut events);

        assert_eq!(state.enemy_dir, 1.0);
        assert_eq!(state.enemy_speed, speed_before + ENEMY_SPEED_INCREMENT);
        for (enemy, y_before) in state.enemies.iter().zip(rows_before) {
            assert_eq!(enemy.body.pos.y, y_before + ENEMY_DESCENT);
        }
    }

    #[test]
    fn test_contact_with_player_line_ends_game() {
        let mut state = playing_state(1);
        let player_line = state.player.body.pos.y;
        state.enemies[0].body.pos.y = player_line - state.enemies[0].body.size.y + 1.0;
        let mut events = Vec::new();
        tick(&mut state, &KeyState::default(), 16.0, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_fire_rate_scales_with_score() {
        // A huge score pushes the per-enemy fire probability past 1.0, so
        // every active enemy fires every tick.
        let mut state = playing_state(1);
        state.score = 1_000_000;
        let active = state.active_enemy_count();
        let mut events = Vec::new();
        tick(&mut state, &KeyState::default(), 16.0, &mut events);
        let enemy_bullets = state.bullets.iter().filter(|b| !b.from_player).count();
        assert_eq!(enemy_bullets, active);
    }

    #[test]
    fn test_offscreen_bullets_compacted() {
        let mut state = playing_state(1);
        // Move enemies clear of the bullet's column
        for enemy in &mut state.enemies {
            enemy.body.pos.x += 2000.0;
        }
        state.bullets.push(Bullet::player_shot(glam::Vec2::new(100.0, 6.0)));
        let mut events = Vec::new();
        tick(&mut state, &KeyState::default(), 16.0, &mut events);
        // The shot exits the top of the field and is compacted away
        assert!(!state.bullets.iter().any(|b| b.from_player));
    }

    #[test]
    fn test_determinism() {
        let mut a = playing_state(9001);
        let mut b = playing_state(9001);
        let keys = keys_of(&[" ", "ArrowLeft"]);
        let mut events_a = Vec::new();
        let mut events_b = Vec::new();
        for _ in 0..120 {
            tick(&mut a, &keys, 16.0, &mut events_a);
            tick(&mut b, &keys, 16.0, &mut events_b);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.bullets.len(), b.bullets.len());
        assert_eq!(a.particles.len(), b.particles.len());
        assert_eq!(a.player.body.pos, b.player.body.pos);
        assert_eq!(events_a, events_b);
    }

    proptest! {
        #[test]
        fn prop_player_never_leaves_field(moves in proptest::collection::vec(0u8..4, 1..300)) {
            let mut state = playing_state(17);
            let mut events = Vec::new();
            for m in moves {
                let keys = match m {
                    0 => keys_of(&["ArrowLeft"]),
                    1 => keys_of(&["ArrowRight"]),
                    2 => keys_of(&["a", "d"]),
                    _ => KeyState::default(),
                };
                tick(&mut state, &keys, 16.0, &mut events);
                if state.phase != GamePhase::Playing {
                    break;
                }
                let x = state.player.body.pos.x;
                prop_assert!(x >= 0.0);
                prop_assert!(x <= W - state.player.body.size.x);
            }
        }
    }
}
