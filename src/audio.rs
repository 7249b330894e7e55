//! Audio cues
//!
//! The simulation never plays sound. Sessions translate `GameEvent`s into
//! `SoundEffect` cues and hand them to a `CueSink`. On wasm32 the sink is a
//! Web Audio synthesizer - procedurally generated, no external files.

use crate::sim::{DeathCause, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump accepted
    Jump,
    /// Coin collected
    Coin,
    /// Power-up picked up into the held slot
    Pickup,
    /// Held power-up activated
    PowerUp,
    /// Hit by a car or train, or carried off the lane
    Crash,
    /// Drowned
    Splash,
    /// Shield absorbed a hit
    ShieldBlock,
    /// Gamble winnings banked
    Cashout,
    /// Crossing lights start flashing
    RailWarning,
    /// Train enters the crossing
    TrainHorn,
    /// Challenge goal reached
    Fanfare,
    /// Challenge timer ran out
    GameOver,
    /// Menu and shop buttons
    Click,
}

/// Anything that can receive audio cues
pub trait CueSink {
    fn cue(&mut self, effect: SoundEffect);
}

/// Collects cues; used by headless runs and tests
impl CueSink for Vec<SoundEffect> {
    fn cue(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}

/// Logs cues at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl CueSink for LogSink {
    fn cue(&mut self, effect: SoundEffect) {
        log::debug!("cue {:?}", effect);
    }
}

/// The cue a simulation event should produce, if any
pub fn cue_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::JumpStarted { .. } => Some(SoundEffect::Jump),
        GameEvent::CoinCollected { .. } => Some(SoundEffect::Coin),
        GameEvent::PowerUpCollected { .. } => Some(SoundEffect::Pickup),
        GameEvent::PowerUpActivated { .. } => Some(SoundEffect::PowerUp),
        GameEvent::ShieldAbsorbed { .. } => Some(SoundEffect::ShieldBlock),
        GameEvent::Died {
            cause: DeathCause::Water,
        } => Some(SoundEffect::Splash),
        GameEvent::Died { .. } => Some(SoundEffect::Crash),
        GameEvent::CashedOut { .. } => Some(SoundEffect::Cashout),
        GameEvent::CrossingWarning { .. } => Some(SoundEffect::RailWarning),
        GameEvent::TrainPassing { .. } => Some(SoundEffect::TrainHorn),
        GameEvent::ChallengeComplete => Some(SoundEffect::Fanfare),
        GameEvent::ChallengeFailed => Some(SoundEffect::GameOver),
        GameEvent::Landed { .. }
        | GameEvent::NewBest { .. }
        | GameEvent::EffectExpired { .. }
        | GameEvent::WeatherChanged { .. } => None,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{CueSink, SoundEffect};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CueSink for AudioManager {
        fn cue(&mut self, effect: SoundEffect) {
            self.play(effect);
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
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn toggle_muted(&mut self) -> bool {
            self.muted = !self.muted;
            self.muted
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => self.play_jump(ctx, vol),
                SoundEffect::Coin => self.play_coin(ctx, vol),
                SoundEffect::Pickup => self.play_arpeggio(ctx, vol, &[600.0, 800.0, 1000.0], 0.08),
                SoundEffect::PowerUp => self.play_power_up(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::Splash => self.play_splash(ctx, vol),
                SoundEffect::ShieldBlock => self.play_shield(ctx, vol),
                SoundEffect::Cashout => {
                    // C major arpeggio
                    self.play_arpeggio(ctx, vol, &[523.25, 659.25, 783.99, 1046.5], 0.08)
                }
                SoundEffect::RailWarning => self.play_rail_warning(ctx, vol),
                SoundEffect::TrainHorn => self.play_horn(ctx, vol),
                SoundEffect::Fanfare => {
                    self.play_arpeggio(ctx, vol, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08)
                }
                SoundEffect::GameOver => {
                    self.play_arpeggio(ctx, vol, &[400.0, 350.0, 300.0, 200.0], 0.2)
                }
                SoundEffect::Click => self.play_click(ctx, vol),
            }
        }

        // === Sound generators ===

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

        /// Jump - short rising square chirp
        fn play_jump(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.05, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency().linear_ramp_to_value_at_time(300.0, t + 0.1).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Coin - two quick pings
        fn play_coin(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [1200.0, 1800.0].iter().enumerate() {
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + i as f64 * 0.1;
                    gain.gain().set_value_at_time(vol * 0.05, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.1).ok();
                }
            }
        }

        /// Power-up - upward sweep
        fn play_power_up(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Crash - falling sawtooth
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(10.0, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Splash - low gurgle sliding down
        fn play_splash(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 1000.0, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.frequency().set_value_at_time(1000.0, t).ok();
                osc.frequency().set_value_at_time(400.0, t + 0.03).ok();
                osc.frequency().set_value_at_time(800.0, t + 0.06).ok();
                osc.frequency().set_value_at_time(300.0, t + 0.1).ok();
                osc.frequency()
                    .linear_ramp_to_value_at_time(100.0, t + 0.5)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }

        /// Shield - bright metallic ping
        fn play_shield(&self, ctx: &AudioContext, vol: f32) {
            for freq in [880.0, 1320.0] {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) {
                    let t = ctx.current_time();
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                        .ok();
                    osc.start().ok();
                    osc.stop_with_when(t + 0.45).ok();
                }
            }
        }

        /// Crossing bell - alternating dings
        fn play_rail_warning(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [950.0, 750.0, 950.0, 750.0].iter().enumerate() {
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + i as f64 * 0.25;
                    gain.gain().set_value_at_time(vol * 0.06, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        /// Train horn - two detuned sawtooths
        fn play_horn(&self, ctx: &AudioContext, vol: f32) {
            for freq in [220.0, 277.0] {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sawtooth) {
                    let t = ctx.current_time();
                    gain.gain().set_value_at_time(0.01, t).ok();
                    gain.gain()
                        .linear_ramp_to_value_at_time(vol * 0.12, t + 0.05)
                        .ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.9)
                        .ok();
                    osc.start().ok();
                    osc.stop_with_when(t + 1.0).ok();
                }
            }
        }

        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32], spacing: f64) {
            for (i, freq) in notes.iter().enumerate() {
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + i as f64 * spacing;
                    gain.gain().set_value_at_time(vol * 0.05, t).ok();
                    gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.2).ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        fn play_click(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.05, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.05).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Direction, PowerUpKind};

    #[test]
    fn test_death_cues_are_distinct() {
        let drown = cue_for(&GameEvent::Died {
            cause: DeathCause::Water,
        });
        let crash = cue_for(&GameEvent::Died {
            cause: DeathCause::Car,
        });
        let bounds = cue_for(&GameEvent::Died {
            cause: DeathCause::Bounds,
        });
        assert_eq!(drown, Some(SoundEffect::Splash));
        assert_eq!(crash, Some(SoundEffect::Crash));
        assert_eq!(bounds, Some(SoundEffect::Crash));
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(cue_for(&GameEvent::Landed { row: 3 }), None);
        assert_eq!(
            cue_for(&GameEvent::EffectExpired {
                kind: PowerUpKind::Magnet
            }),
            None
        );
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<SoundEffect> = Vec::new();
        for event in [
            GameEvent::JumpStarted {
                direction: Direction::Up,
            },
            GameEvent::CrossingWarning { lane: 4 },
            GameEvent::TrainPassing { lane: 4 },
        ] {
            if let Some(cue) = cue_for(&event) {
                sink.cue(cue);
            }
        }
        assert_eq!(
            sink,
            vec![
                SoundEffect::Jump,
                SoundEffect::RailWarning,
                SoundEffect::TrainHorn
            ]
        );
    }
}
