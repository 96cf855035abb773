//! Audio system using Web Audio API
//!
//! Effects are synthesized with oscillators. Catch sounds and music come from
//! the asset set when they load; anything missing is simply silent.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::app::AppEvent;
use crate::assets::SoundSet;
use crate::settings::Settings;
use crate::sim::GameEvent;
use crate::ui::Screen;

/// Seconds for the music to fade out when the celebration starts
const MUSIC_FADE_SECONDS: f32 = 2.0;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Good item caught
    Catch,
    /// Bad item caught
    BadCatch,
    /// Penalty item dropped
    Miss,
    GameOver,
    /// Score target reached
    Victory,
    /// Celebration animation started
    Fanfare,
    /// Menu button
    Click,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sounds: SoundSet<HtmlAudioElement>,
    settings: Settings,
    /// Remaining fade time, if the music is fading out
    fade: Option<f32>,
}

impl AudioManager {
    pub fn new(sounds: SoundSet<HtmlAudioElement>, settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - effects disabled");
        }
        if let Some(music) = &sounds.music {
            music.set_loop(true);
        }
        Self {
            ctx,
            sounds,
            settings: settings.clone(),
            fade: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// React to what happened this frame
    pub fn handle(&mut self, event: &AppEvent) {
        match *event {
            AppEvent::Game(GameEvent::Caught { kind, points, .. }) => {
                if !self.play_clip(kind) {
                    self.play(if points < 0 {
                        SoundEffect::BadCatch
                    } else {
                        SoundEffect::Catch
                    });
                }
            }
            AppEvent::Game(GameEvent::Missed { .. }) => self.play(SoundEffect::Miss),
            AppEvent::Game(GameEvent::GameOver) => {
                self.stop_music();
                self.play(SoundEffect::GameOver);
            }
            AppEvent::Game(GameEvent::Victory) => self.play(SoundEffect::Victory),
            AppEvent::Game(GameEvent::VictoryAnimationStarted) => {
                self.fade = Some(MUSIC_FADE_SECONDS);
                self.play(SoundEffect::Fanfare);
            }
            AppEvent::Game(GameEvent::Restarted) => self.start_music(),
            AppEvent::ButtonClicked(_) => {
                self.resume();
                self.play(SoundEffect::Click);
            }
            AppEvent::ScreenChanged(Screen::Menu) => self.stop_music(),
            _ => {}
        }
    }

    /// Per-frame music fade
    pub fn update(&mut self, dt: f32) {
        let Some(remaining) = self.fade else { return };
        let Some(music) = &self.sounds.music else {
            self.fade = None;
            return;
        };

        let remaining = remaining - dt;
        if remaining <= 0.0 {
            let _ = music.pause();
            self.fade = None;
        } else {
            let t = remaining / MUSIC_FADE_SECONDS;
            music.set_volume((self.settings.effective_music_volume() * t) as f64);
            self.fade = Some(remaining);
        }
    }

    fn start_music(&mut self) {
        self.fade = None;
        let Some(music) = &self.sounds.music else { return };
        music.set_volume(self.settings.effective_music_volume() as f64);
        music.set_current_time(0.0);
        if music.play().is_err() {
            log::warn!("Music playback refused");
        }
    }

    fn stop_music(&mut self) {
        self.fade = None;
        if let Some(music) = &self.sounds.music {
            let _ = music.pause();
        }
    }

    /// Play the catalog sound for a kind. Returns false if it has none.
    fn play_clip(&self, kind: usize) -> bool {
        let Some(Some(clip)) = self.sounds.catches.get(kind) else {
            return false;
        };
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return true;
        }
        clip.set_volume(vol as f64);
        clip.set_current_time(0.0);
        let _ = clip.play();
        true
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Catch => self.play_catch(ctx, vol),
            SoundEffect::BadCatch => self.play_bad_catch(ctx, vol),
            SoundEffect::Miss => self.play_miss(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::Victory => self.play_victory(ctx, vol),
            SoundEffect::Fanfare => self.play_fanfare(ctx, vol),
            SoundEffect::Click => self.play_click(ctx, vol),
        }
    }

    // === Sound generators ===

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

    /// A sequence of short notes
    fn play_notes(
        &self,
        ctx: &AudioContext,
        vol: f32,
        freqs: &[f32],
        osc_type: OscillatorType,
        spacing: f64,
        length: f64,
    ) {
        for (i, freq) in freqs.iter().enumerate() {
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

    /// Catch - bright pop up
    fn play_catch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(900.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Bad catch - low buzz
    fn play_bad_catch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(120.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.25)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Miss - soft thud
    fn play_miss(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(
            ctx,
            vol * 0.3,
            &[400.0, 350.0, 300.0, 200.0],
            OscillatorType::Sine,
            0.2,
            0.3,
        );
    }

    /// Victory - rising arpeggio
    fn play_victory(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(
            ctx,
            vol * 0.3,
            &[400.0, 500.0, 600.0, 800.0],
            OscillatorType::Triangle,
            0.1,
            0.4,
        );
    }

    /// Fanfare - longer celebratory run
    fn play_fanfare(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(
            ctx,
            vol * 0.25,
            &[500.0, 600.0, 700.0, 800.0, 1000.0, 800.0, 1000.0],
            OscillatorType::Triangle,
            0.12,
            0.25,
        );
    }

    /// Click - short tick
    fn play_click(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 700.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.04)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }
}
