//! Audio system
//!
//! Procedurally generated sound effects on the Web Audio API, no sample
//! files needed. Native builds have no audio device and only log the cues.

use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::SoundCue;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Neutron absorbed by the control rod
    GoodHit,
    /// Neutron struck a fuel rod
    BadHit,
    /// Reactor meltdown
    Explode,
}

impl SoundEffect {
    /// Name of the classic sample this effect stands in for
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::GoodHit => "goodhit.wav",
            SoundEffect::BadHit => "badhit.wav",
            SoundEffect::Explode => "explode1.wav",
        }
    }
}

impl From<SoundCue> for SoundEffect {
    fn from(cue: SoundCue) -> Self {
        match cue {
            SoundCue::GoodHit => SoundEffect::GoodHit,
            SoundCue::BadHit => SoundEffect::BadHit,
            SoundCue::Explode => SoundEffect::Explode,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    /// Oscillators still sounding per effect; replaying an effect stops them
    #[cfg(target_arch = "wasm32")]
    voices: HashMap<SoundEffect, Vec<OscillatorNode>>,
    /// How often each effect was started
    plays: HashMap<SoundEffect, u32>,
    /// Volume and mute preferences
    settings: Settings,
    /// Page is in the background and `mute_on_blur` is set
    page_hidden: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            #[cfg(target_arch = "wasm32")]
            voices: HashMap::new(),
            plays: HashMap::new(),
            settings: settings.clone(),
            page_hidden: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }
    }

    /// Track page visibility; a hidden page is silent when `mute_on_blur` is set
    pub fn set_page_hidden(&mut self, hidden: bool) {
        let hidden = hidden && self.settings.mute_on_blur;
        if hidden != self.page_hidden {
            log::info!("Audio {} (page {})", if hidden { "muted" } else { "unmuted" }, if hidden { "hidden" } else { "visible" });
        }
        self.page_hidden = hidden;
    }

    fn effective_volume(&self) -> f32 {
        if self.page_hidden {
            0.0
        } else {
            self.settings.effective_volume()
        }
    }

    /// Number of times `effect` has been started
    pub fn play_count(&self, effect: SoundEffect) -> u32 {
        self.plays.get(&effect).copied().unwrap_or(0)
    }

    /// Play every cue raised during a frame, in order
    pub fn play_cues(&mut self, cues: impl IntoIterator<Item = SoundCue>) {
        for cue in cues {
            self.play(cue.into());
        }
    }

    /// Play a sound effect from the start, cutting off any earlier instance
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        *self.plays.entry(effect).or_insert(0) += 1;
        log::debug!("Playing {}", effect.name());

        #[cfg(target_arch = "wasm32")]
        self.play_web(effect, vol);
    }

    #[cfg(target_arch = "wasm32")]
    fn play_web(&mut self, effect: SoundEffect, vol: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        if let Some(old) = self.voices.remove(&effect) {
            for osc in old {
                osc.stop().ok();
            }
        }

        let voices = match effect {
            SoundEffect::GoodHit => Self::good_hit(ctx, vol),
            SoundEffect::BadHit => Self::bad_hit(ctx, vol),
            SoundEffect::Explode => Self::explosion(ctx, vol),
        };
        self.voices.insert(effect, voices);
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
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

    /// Good hit - bright rising blip
    #[cfg(target_arch = "wasm32")]
    fn good_hit(ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
        let Some((osc, gain)) = Self::create_osc(ctx, 660.0, OscillatorType::Triangle) else {
            return Vec::new();
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(660.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1320.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
        vec![osc]
    }

    /// Bad hit - harsh buzz dropping in pitch
    #[cfg(target_arch = "wasm32")]
    fn bad_hit(ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
        let t = ctx.current_time();
        let mut voices = Vec::new();

        if let Some((osc, gain)) = Self::create_osc(ctx, 220.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(80.0, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
            voices.push(osc);
        }

        // Low thud under the buzz
        if let Some((osc, gain)) = Self::create_osc(ctx, 70.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
            voices.push(osc);
        }

        voices
    }

    /// Explosion - long rumbling boom
    #[cfg(target_arch = "wasm32")]
    fn explosion(ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
        let t = ctx.current_time();
        let mut voices = Vec::new();

        if let Some((osc, gain)) = Self::create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.5)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(25.0, t + 1.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.6).ok();
            voices.push(osc);
        }

        // High frequency crack
        if let Some((osc, gain)) = Self::create_osc(ctx, 1500.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
            voices.push(osc);
        }

        voices
    }
}
