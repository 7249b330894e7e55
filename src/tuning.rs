//! Data-driven game balance
//!
//! Every "feel" constant of the simulation lives here so balance changes never
//! touch engine code. Hitbox factors are empirically tuned values; treat edits
//! as balance decisions.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// A clamped linear curve `min(base + per_unit * x, cap)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub base: f32,
    pub per_unit: f32,
    pub cap: f32,
}

impl Curve {
    pub const fn new(base: f32, per_unit: f32, cap: f32) -> Self {
        Self { base, per_unit, cap }
    }

    /// Evaluate at `x` (negative inputs are treated as zero)
    pub fn at(&self, x: f32) -> f32 {
        (self.base + self.per_unit * x.max(0.0)).min(self.cap)
    }
}

/// Inclusive seconds range for randomized timers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondsRange {
    pub min: f32,
    pub max: f32,
}

impl SecondsRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Gameplay balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lane generation ===
    /// Probability of a WATER lane
    pub water_chance: Curve,
    /// Probability of a ROAD lane (stacked after water)
    pub road_chance: Curve,
    /// Probability of a RAIL lane (stacked after road)
    pub rail_chance: Curve,
    /// Lane speed in cells per nominal frame
    pub lane_speed: Curve,
    /// Difficulty beyond which lane speed stops growing
    pub lane_speed_difficulty_cap: f32,
    /// Chance a grass lane carries a collectible
    pub item_chance: f32,
    /// Chance a collectible is a power-up instead of a coin
    pub powerup_item_share: f32,
    /// Log speed relative to the lane's nominal speed
    pub log_speed_factor: f32,
    /// Chance of a cosmetic lilypad on water
    pub lilypad_chance: f32,

    // === Hitboxes ===
    /// Log span starts this far before the log position
    pub log_lead_tolerance: f32,
    /// Log span ends this far before `position + width`
    pub log_tail_tolerance: f32,
    /// Fraction of car width that is lethal from its centre
    pub car_hitbox: f32,
    /// Fraction of train width that is lethal from its centre
    pub train_hitbox: f32,
    /// Player centre offset from its column
    pub player_centre_offset: f32,

    // === Jump ===
    /// Jump commit delay (seconds)
    pub jump_duration: f32,
    /// Jump duration multiplier while time-slow is active
    pub slow_jump_multiplier: f32,

    // === Power-ups ===
    pub time_slow_duration: f32,
    pub magnet_duration: f32,
    pub water_walk_duration: f32,
    pub double_coins_duration: f32,
    /// Time-scale multiplier while time-slow is active
    pub time_slow_factor: f32,
    /// Rows above/below the player the magnet reaches
    pub magnet_row_radius: u32,
    /// Fraction of the gap a coin closes per nominal frame
    pub magnet_pull_rate: f32,
    /// Column distance at which a pulled coin is collected
    pub magnet_collect_distance: f32,

    // === Level crossings ===
    /// First idle wait after a rail lane is generated
    pub crossing_first_idle: SecondsRange,
    /// Idle wait after a train has passed
    pub crossing_idle: SecondsRange,
    pub crossing_warning: f32,
    pub crossing_passing: f32,
    pub train_width: f32,

    // === Lane window ===
    /// Extend the window when its leading edge is this close to the camera floor
    pub window_lookahead: u32,
    /// Lanes appended per extension
    pub window_batch: u32,
    /// Maximum lanes kept in the window
    pub window_cap: usize,
    /// Rows the classic camera trails behind the player
    pub camera_trail: u32,

    // === Modes ===
    /// Survival auto-scroll speed in rows per second, by rows reached
    pub survival_scroll: Curve,
    /// How far behind the scroll floor the player may fall before VOID
    pub void_margin: f32,
    /// Gamble multiplier increment per new row
    pub gamble_step: f32,
    /// Smallest accepted gamble stake
    pub min_stake: u64,
    /// Default challenge time budget (seconds)
    pub challenge_time: f32,

    // === Cosmetics ===
    /// Seconds between automatic weather changes
    pub weather_period: f32,
    pub coin_fx_duration: f32,
    pub shake_duration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            water_chance: Curve::new(0.20, 0.005, 0.35),
            road_chance: Curve::new(0.30, 0.005, 0.55),
            rail_chance: Curve::new(0.02, 0.001, 0.08),
            lane_speed: Curve::new(0.03, 0.0008, 0.11),
            lane_speed_difficulty_cap: 100.0,
            item_chance: 0.10,
            powerup_item_share: 0.25,
            log_speed_factor: 0.8,
            lilypad_chance: 0.5,

            log_lead_tolerance: 0.6,
            log_tail_tolerance: 0.4,
            car_hitbox: 0.45,
            train_hitbox: 0.48,
            player_centre_offset: 0.5,

            jump_duration: 0.12,
            slow_jump_multiplier: 2.0,

            time_slow_duration: 5.0,
            magnet_duration: 8.0,
            water_walk_duration: 6.0,
            double_coins_duration: 10.0,
            time_slow_factor: 0.5,
            magnet_row_radius: 2,
            magnet_pull_rate: 0.15,
            magnet_collect_distance: 0.3,

            crossing_first_idle: SecondsRange::new(3.0, 8.0),
            crossing_idle: SecondsRange::new(6.0, 12.0),
            crossing_warning: 2.0,
            crossing_passing: 1.5,
            train_width: 8.0,

            window_lookahead: 18,
            window_batch: 5,
            window_cap: 30,
            camera_trail: 3,

            survival_scroll: Curve::new(0.35, 0.004, 1.2),
            void_margin: 0.5,
            gamble_step: 0.1,
            min_stake: 10,
            challenge_time: 60.0,

            weather_period: 45.0,
            coin_fx_duration: 0.8,
            shake_duration: 0.5,
        }
    }
}

impl Tuning {
    /// Overlay a JSON document on the defaults (missing fields keep defaults)
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let tuning = serde_json::from_str(json)?;
        Ok(tuning)
    }

    /// Nominal lane speed for a lane at the given difficulty
    pub fn lane_speed_at(&self, difficulty: f32) -> f32 {
        self.lane_speed
            .at(difficulty.min(self.lane_speed_difficulty_cap))
    }

    /// Jump commit delay, lengthened while time-slow is active
    pub fn jump_time(&self, time_slowed: bool) -> f32 {
        if time_slowed {
            self.jump_duration * self.slow_jump_multiplier
        } else {
            self.jump_duration
        }
    }
}
