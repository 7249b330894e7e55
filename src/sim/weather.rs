//! Cosmetic weather and transient visual effects
//!
//! Nothing here affects gameplay; renderers read it from the snapshot.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
    Fog,
}

impl Weather {
    /// Next weather in the automatic rotation
    pub fn next(self) -> Self {
        match self {
            Weather::Clear => Weather::Rain,
            Weather::Rain => Weather::Fog,
            Weather::Fog => Weather::Snow,
            Weather::Snow => Weather::Clear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Rain => "Rain",
            Weather::Snow => "Snow",
            Weather::Fog => "Fog",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clear" => Some(Weather::Clear),
            "rain" => Some(Weather::Rain),
            "snow" => Some(Weather::Snow),
            "fog" => Some(Weather::Fog),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub current: Weather,
    /// Chosen by the player; disables rotation
    pub pinned: bool,
    /// Seconds spent in the current weather
    pub elapsed: f32,
}

impl WeatherState {
    pub fn pin(&mut self, weather: Option<Weather>) {
        match weather {
            Some(w) => {
                self.current = w;
                self.pinned = true;
            }
            None => self.pinned = false,
        }
        self.elapsed = 0.0;
    }

    /// Advance the rotation; returns the new weather when it changes
    pub fn advance(&mut self, dt: f32, period: f32) -> Option<Weather> {
        self.elapsed += dt;
        if self.pinned || period <= 0.0 || self.elapsed < period {
            return None;
        }
        self.elapsed -= period;
        self.current = self.current.next();
        Some(self.current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FxKind {
    CoinSparkle,
    ScreenShake,
    Splash,
    Splat,
    ShieldBurst,
}

/// A short-lived visual cue anchored to a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientFx {
    pub id: u32,
    pub kind: FxKind,
    pub row: u32,
    pub column: f32,
    /// Seconds remaining, `None` for markers that stay until the run ends
    pub ttl: Option<f32>,
}

impl GameState {
    pub(crate) fn spawn_fx(&mut self, kind: FxKind, row: u32, column: f32, ttl: Option<f32>) {
        let id = self.ids.next_id();
        self.fx.push(TransientFx {
            id,
            kind,
            row,
            column,
            ttl,
        });
    }

    /// Cosmetic timers: weather rotation and effect expiry
    pub(crate) fn advance_cosmetics(&mut self, dt: f32) {
        if let Some(weather) = self.weather.advance(dt, self.tuning.weather_period) {
            self.emit(GameEvent::WeatherChanged { weather });
        }

        for ttl in self.fx.iter_mut().filter_map(|fx| fx.ttl.as_mut()) {
            *ttl -= dt;
        }
        self.fx.retain(|fx| fx.ttl.is_none_or(|ttl| ttl > 0.0));
    }
}
