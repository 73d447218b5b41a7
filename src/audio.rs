//! Audio system using Web Audio API
//!
//! Procedurally generated whistle, kick and crowd cues. No sample files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::sim::{GameEvent, ShotOutcome};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Referee whistle before a kick
    Whistle,
    /// Boot strikes the ball
    Kick,
    /// Ball off the gloves
    Save,
    /// Ball in the net
    Goal,
    /// Wide or over
    Miss,
    /// New round
    RoundStart,
    /// Final whistle
    GameOver,
}

impl SoundEffect {
    /// Sound cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotScheduled { .. } => Some(SoundEffect::Whistle),
            GameEvent::Kick { .. } => Some(SoundEffect::Kick),
            GameEvent::Deflected { .. } => Some(SoundEffect::Save),
            GameEvent::Outcome {
                outcome: ShotOutcome::Goal,
                ..
            } => Some(SoundEffect::Goal),
            GameEvent::Outcome {
                outcome: ShotOutcome::Miss,
                ..
            } => Some(SoundEffect::Miss),
            // The save itself already played on contact
            GameEvent::Outcome {
                outcome: ShotOutcome::Save,
                ..
            } => None,
            GameEvent::RoundAdvanced { .. } => Some(SoundEffect::RoundStart),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::Paused | GameEvent::Resumed => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Volume and mute preferences
    settings: Settings,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings: settings.clone(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Play the cues for one tick's events
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Whistle => self.play_whistle(ctx, vol),
            SoundEffect::Kick => self.play_kick(ctx, vol),
            SoundEffect::Save => self.play_save(ctx, vol),
            SoundEffect::Goal => self.play_goal(ctx, vol),
            SoundEffect::Miss => self.play_miss(ctx, vol),
            SoundEffect::RoundStart => self.play_round_start(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Oscillator routed through its own gain node
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

    /// Short sequence of tones, `spacing` seconds apart
    fn play_notes(
        &self,
        ctx: &AudioContext,
        notes: &[f32],
        spacing: f64,
        length: f64,
        osc_type: OscillatorType,
        vol: f32,
    ) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * spacing;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + length)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + length + 0.05).ok();
            }
        }
    }

    /// Whistle - two shrill trills
    fn play_whistle(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 2800.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.08, t).ok();
        gain.gain().set_value_at_time(0.01, t + 0.12).ok();
        gain.gain().set_value_at_time(vol * 0.08, t + 0.16).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(2800.0, t).ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(3100.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    /// Kick - low thump
    fn play_kick(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 160.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.7, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(160.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Save - glove slap then a rising cheer
    fn play_save(&self, ctx: &AudioContext, vol: f32) {
        if let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) {
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }
        self.play_notes(
            ctx,
            &[500.0, 650.0, 800.0],
            0.08,
            0.2,
            OscillatorType::Sine,
            vol * 0.25,
        );
    }

    /// Goal - net swish and a falling groan
    fn play_goal(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.01, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.15, t + 0.05)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.6)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(120.0, t + 0.6)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.7).ok();
    }

    /// Miss - quick relieved blip
    fn play_miss(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(ctx, &[600.0, 450.0], 0.1, 0.12, OscillatorType::Sine, vol * 0.2);
    }

    fn play_round_start(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(
            ctx,
            &[400.0, 500.0, 600.0, 800.0],
            0.1,
            0.4,
            OscillatorType::Triangle,
            vol * 0.3,
        );
    }

    /// Game over - three long whistles
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(
            ctx,
            &[2600.0, 2600.0, 2600.0],
            0.35,
            0.25,
            OscillatorType::Square,
            vol * 0.08,
        );
    }
}
