//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::engine::SoundPlayer;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            muted: false,
        }
    }

    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Laser zap - fast downward chirp
    fn shoot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(900.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(240.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Explosion - low boom with a high crack on top
    fn explosion(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(110.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(35.0, t + 0.35)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1400.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }
    }
}

impl SoundPlayer for AudioManager {
    /// Unlock the context after a user gesture. Failure is logged and
    /// never interrupts gameplay.
    fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            match ctx.resume() {
                Ok(_) => {}
                Err(err) => log::warn!("audio resume failed: {err:?}"),
            }
        }
    }

    fn play_shoot(&mut self) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        self.shoot(ctx, vol);
    }

    fn play_explosion(&mut self) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        self.explosion(ctx, vol);
    }
}
