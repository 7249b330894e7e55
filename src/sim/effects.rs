//! Power-up effect resolver
//!
//! Two independent slots: a held power-up (collected, not yet used) and a single
//! active effect. Collecting overwrites the held slot; activating moves it into
//! the active slot, replacing whatever was running.

use serde::{Deserialize, Serialize};

use super::state::{DeathCause, GameEvent, GameState, ItemKind, PowerUpKind};
use super::weather::FxKind;
use crate::tuning::Tuning;

/// A running effect. `time_left` is `None` for use-consumed effects (shield).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub time_left: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub held: Option<PowerUpKind>,
    pub active: Option<ActiveEffect>,
}

impl Effects {
    /// Store a collected power-up, overwriting any previous holding
    pub fn hold(&mut self, kind: PowerUpKind) {
        self.held = Some(kind);
    }

    /// Move the held power-up into the active slot
    pub fn activate(&mut self, tuning: &Tuning) -> Option<PowerUpKind> {
        let kind = self.held.take()?;
        self.active = Some(ActiveEffect {
            kind,
            time_left: duration(kind, tuning),
        });
        Some(kind)
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.is_some_and(|a| a.kind == kind)
    }

    /// Multiplier applied to the world's time-scale this tick
    pub fn time_factor(&self, tuning: &Tuning) -> f32 {
        if self.is_active(PowerUpKind::TimeSlow) {
            tuning.time_slow_factor
        } else {
            1.0
        }
    }

    /// Count the active effect down; returns its kind if it just expired
    pub fn advance(&mut self, dt: f32) -> Option<PowerUpKind> {
        let active = self.active.as_mut()?;
        let time_left = active.time_left.as_mut()?;
        *time_left -= dt;
        if *time_left <= 0.0 {
            let kind = active.kind;
            self.active = None;
            return Some(kind);
        }
        None
    }

    /// Consume an active shield against a lethal event. VOID is never absorbed.
    pub fn try_absorb(&mut self, cause: DeathCause) -> bool {
        if cause == DeathCause::Void || !self.is_active(PowerUpKind::Shield) {
            return false;
        }
        self.active = None;
        true
    }

    /// Value of one coin at collection time
    pub fn coin_value(&self) -> u64 {
        if self.is_active(PowerUpKind::DoubleCoins) {
            2
        } else {
            1
        }
    }
}

/// Effect duration in seconds, `None` for the shield
pub fn duration(kind: PowerUpKind, tuning: &Tuning) -> Option<f32> {
    match kind {
        PowerUpKind::Shield => None,
        PowerUpKind::TimeSlow => Some(tuning.time_slow_duration),
        PowerUpKind::Magnet => Some(tuning.magnet_duration),
        PowerUpKind::WaterWalk => Some(tuning.water_walk_duration),
        PowerUpKind::DoubleCoins => Some(tuning.double_coins_duration),
    }
}

impl GameState {
    /// Activation input. Ignored without a held power-up or after the run ended.
    pub fn handle_activate_held_power_up(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        match self.effects.activate(&self.tuning) {
            Some(kind) => {
                log::debug!("Activated {:?}", kind);
                self.emit(GameEvent::PowerUpActivated { kind });
                true
            }
            None => false,
        }
    }

    /// Credit one coin (doubled under double-coins)
    pub(crate) fn collect_coin(&mut self, row: u32, column: f32) {
        let value = self.effects.coin_value();
        self.coins_collected += value;
        self.emit(GameEvent::CoinCollected { value });
        self.spawn_fx(
            FxKind::CoinSparkle,
            row,
            column,
            Some(self.tuning.coin_fx_duration),
        );
    }

    /// Pick up whatever item lies on the player's cell
    pub(crate) fn collect_items_at_player(&mut self) {
        let row = self.player.row;
        let column = crate::grid_column(self.player.column);
        let Some(lane) = self.lane_mut(row) else {
            return;
        };
        let Some(index) = lane
            .items
            .iter()
            .position(|item| crate::grid_column(item.position) == column)
        else {
            return;
        };
        let item = lane.items.remove(index);

        match item.kind {
            ItemKind::Coin => self.collect_coin(row, column as f32),
            ItemKind::PowerUp(kind) => {
                self.effects.hold(kind);
                self.emit(GameEvent::PowerUpCollected { kind });
            }
        }
    }

    /// Pull nearby coins toward the player and auto-collect close ones
    pub(crate) fn magnet_pass(&mut self, time_scale: f32) {
        if !self.effects.is_active(PowerUpKind::Magnet) {
            return;
        }

        let radius = self.tuning.magnet_row_radius;
        let rate = (self.tuning.magnet_pull_rate * time_scale).min(1.0);
        let reach = self.tuning.magnet_collect_distance;
        let target = self.player.column;
        let low = self.player.row.saturating_sub(radius);
        let high = self.player.row + radius;

        let mut collected = Vec::new();
        for lane in self.lanes.iter_mut() {
            if lane.id < low || lane.id > high {
                continue;
            }
            let row = lane.id;
            lane.items.retain_mut(|item| {
                if item.kind != ItemKind::Coin {
                    return true;
                }
                item.position += (target - item.position) * rate;
                if (item.position - target).abs() < reach {
                    collected.push((row, item.position));
                    return false;
                }
                true
            });
        }

        for (row, column) in collected {
            self.collect_coin(row, column);
        }
    }
}
