//! Browser host bindings
//!
//! The page owns the canvas, draws from `snapshot_json()` and forwards keys and
//! animation frames here. Coins, skins, scores and settings are persisted to
//! LocalStorage whenever they change.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, SoundEffect};
use crate::error::EconomyError;
use crate::highscores::HighScores;
use crate::profile::{Profile, catalog};
use crate::session::{RunRequest, Session, Wallet};
use crate::settings::Settings;
use crate::sim::{ChallengeGoal, Direction, TickInput, Weather};
use crate::tuning::Tuning;

fn js_error(err: EconomyError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logger already initialised"));
    }
    log::info!("Lane Hopper starting...");
}

#[wasm_bindgen]
pub struct WasmGame {
    session: Session<Profile, HighScores>,
    settings: Settings,
    audio: AudioManager,
    input: TickInput,
    last_time: f64,
    was_running: bool,
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        let profile = Profile::load();
        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let weather = settings.weather.or(profile.weather);
        let mut session = Session::new(profile, HighScores::load(), Tuning::default());
        session.set_weather(weather);

        WasmGame {
            session,
            settings,
            audio,
            input: TickInput::default(),
            last_time: 0.0,
            was_running: false,
        }
    }

    pub fn start_classic(&mut self) -> Result<(), JsValue> {
        self.start(RunRequest::Classic)
    }

    pub fn start_survival(&mut self) -> Result<(), JsValue> {
        self.start(RunRequest::Survival)
    }

    /// Negative or fractional stakes are truncated toward zero
    pub fn start_gamble(&mut self, stake: f64) -> Result<(), JsValue> {
        self.start(RunRequest::Gamble {
            stake: stake.max(0.0) as u64,
        })
    }

    /// `kind` is "score" or "coins"; `seconds <= 0` uses the default limit
    pub fn start_challenge(&mut self, kind: &str, target: u32, seconds: f32) -> Result<(), JsValue> {
        let goal = match kind {
            "coins" => ChallengeGoal::Coins(target as u64),
            _ => ChallengeGoal::Score(target),
        };
        let time_limit = (seconds > 0.0).then_some(seconds);
        self.start(RunRequest::Challenge { goal, time_limit })
    }

    /// Logical key mapping; returns true if the key was used
    pub fn key_down(&mut self, key: &str) -> bool {
        let direction = match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        };
        if let Some(direction) = direction {
            return self
                .session
                .handle_directional_input(direction, &mut self.audio);
        }
        match key {
            " " | "e" | "E" => self.session.handle_activate_held_power_up(&mut self.audio),
            "m" | "M" => {
                self.settings.muted = self.audio.toggle_muted();
                self.settings.save();
                true
            }
            "i" | "I" => {
                self.input.autopilot = !self.input.autopilot;
                log::info!("Autopilot: {}", self.input.autopilot);
                true
            }
            _ => false,
        }
    }

    /// Animation frame callback; returns true when the page should redraw
    pub fn frame(&mut self, time: f64) -> bool {
        let elapsed = if self.last_time > 0.0 {
            (time - self.last_time) as f32
        } else {
            crate::consts::NOMINAL_FRAME_MS
        };
        self.last_time = time;

        let redraw = self.session.tick(&self.input, elapsed, &mut self.audio);

        let running = self.session.is_running();
        if self.was_running && !running {
            self.persist();
        }
        self.was_running = running;
        redraw
    }

    /// Coin amounts cross to JS as numbers
    pub fn cash_out(&mut self) -> Result<f64, JsValue> {
        let winnings = self.session.cash_out(&mut self.audio).map_err(js_error)?;
        self.persist();
        Ok(winnings as f64)
    }

    pub fn convert_score(&mut self) -> Result<f64, JsValue> {
        let coins = self.session.convert_score().map_err(js_error)?;
        self.session.wallet().save();
        Ok(coins as f64)
    }

    pub fn coins(&self) -> f64 {
        self.session.wallet().balance() as f64
    }

    pub fn buy(&mut self, id: &str) -> Result<(), JsValue> {
        self.session.wallet_mut().buy(id).map_err(js_error)?;
        self.session.wallet().save();
        self.audio.play(SoundEffect::Click);
        Ok(())
    }

    pub fn equip(&mut self, id: &str) -> Result<(), JsValue> {
        self.session.wallet_mut().equip(id).map_err(js_error)?;
        self.session.wallet().save();
        self.audio.play(SoundEffect::Click);
        Ok(())
    }

    /// Shop listing with ownership flags
    pub fn catalog_json(&self) -> String {
        let profile = self.session.wallet();
        let rows: Vec<serde_json::Value> = catalog()
            .into_iter()
            .map(|skin| {
                serde_json::json!({
                    "id": skin.id,
                    "name": skin.name,
                    "price": skin.price,
                    "tier": skin.tier.as_str(),
                    "owned": profile.owns(skin.id),
                    "equipped": profile.equipped == skin.id,
                })
            })
            .collect();
        serde_json::Value::Array(rows).to_string()
    }

    /// Current run for rendering, `null` before the first run
    pub fn snapshot_json(&self) -> String {
        let Some(mut snapshot) = self.session.snapshot() else {
            return "null".to_string();
        };
        self.settings.filter_fx(&mut snapshot.fx);
        serde_json::to_string(&snapshot).unwrap_or_else(|err| {
            log::warn!("Snapshot not serialisable: {}", err);
            "null".to_string()
        })
    }

    pub fn high_score(&self, mode: &str) -> u32 {
        use crate::session::ScoreStore;
        use crate::sim::GameMode;
        let mode = match mode {
            "survival" => GameMode::Survival,
            "gamble" => GameMode::Gamble,
            "challenge" => GameMode::Challenge,
            _ => GameMode::Classic,
        };
        self.session.scores().high_score(mode)
    }

    /// Pin the weather by name, or let it cycle with "auto"
    pub fn set_weather(&mut self, name: &str) {
        let weather = Weather::from_str(name);
        self.session.set_weather(weather);
        self.settings.weather = weather;
        self.settings.save();
        self.session.wallet_mut().weather = weather;
        self.session.wallet().save();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
        self.settings.muted = muted;
        self.settings.save();
    }

    pub fn set_volume(&mut self, master: f32, sfx: f32) {
        self.audio.set_master_volume(master);
        self.audio.set_sfx_volume(sfx);
        self.settings.master_volume = master.clamp(0.0, 1.0);
        self.settings.sfx_volume = sfx.clamp(0.0, 1.0);
        self.settings.save();
    }

    pub fn set_reduced_motion(&mut self, on: bool) {
        self.settings.reduced_motion = on;
        self.settings.save();
    }
}

impl WasmGame {
    fn start(&mut self, request: RunRequest) -> Result<(), JsValue> {
        self.audio.resume();
        let seed = js_sys::Date::now() as u64;
        self.session.start_run(request, seed).map_err(js_error)?;
        self.input = TickInput::default();
        self.last_time = 0.0;
        self.was_running = true;
        // A gamble stake has just been debited
        self.session.wallet().save();
        Ok(())
    }

    fn persist(&self) {
        self.session.wallet().save();
        self.session.scores().save();
    }
}
