//! Audio feedback using the Web Audio API
//!
//! Procedurally generated jingles - no external files needed. An ascending
//! C5/E5/G5 triad plays on a correct letter, a 400 Hz sawtooth buzz on a
//! wrong one, and the triad capped with C6 when the word completes.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Needed letter clicked
    Correct,
    /// Wrong letter clicked
    Wrong,
    /// Word fully spelled
    WordComplete,
}

/// Audio manager for feedback jingles
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; gameplay continues without audio
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.8 }
    }

    /// Set effective volume (0.0 - 1.0); 0 silences playback entirely
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Correct => self.play_correct(ctx),
            SoundEffect::Wrong => self.play_wrong(ctx),
            SoundEffect::WordComplete => self.play_complete(ctx),
        }
    }

    /// Create an oscillator routed through a gain node
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

    /// Schedule one tone with the shared attack/decay envelope
    fn play_tone(&self, ctx: &AudioContext, freq: f32, at: f64, dur: f64, osc_type: OscillatorType) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + at;

        gain.gain().set_value_at_time(self.volume * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + dur)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + dur).ok();
    }

    /// Correct letter - rising C5, E5, G5
    fn play_correct(&self, ctx: &AudioContext) {
        self.play_tone(ctx, 523.0, 0.0, 0.1, OscillatorType::Sine);
        self.play_tone(ctx, 659.0, 0.1, 0.1, OscillatorType::Sine);
        self.play_tone(ctx, 784.0, 0.2, 0.2, OscillatorType::Sine);
    }

    /// Wrong letter - low sawtooth buzz
    fn play_wrong(&self, ctx: &AudioContext) {
        self.play_tone(ctx, 400.0, 0.0, 0.3, OscillatorType::Sawtooth);
    }

    /// Word complete - the triad resolved up to C6
    fn play_complete(&self, ctx: &AudioContext) {
        self.play_tone(ctx, 523.0, 0.0, 0.1, OscillatorType::Sine);
        self.play_tone(ctx, 659.0, 0.1, 0.1, OscillatorType::Sine);
        self.play_tone(ctx, 784.0, 0.2, 0.1, OscillatorType::Sine);
        self.play_tone(ctx, 1047.0, 0.3, 0.3, OscillatorType::Sine);
    }
}
