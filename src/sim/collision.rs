//! Collision and hazard resolution
//!
//! Runs once per tick for the lane the player stands on, and only while no jump
//! is in flight. Order is fixed: water, road, rail, then lane bounds. Every
//! lethal result goes through `GameState::lethal`, which gives an active shield
//! the chance to absorb it.

use super::state::{DeathCause, GameEvent, GameState, LaneKind, ObstacleKind, PowerUpKind};
use super::weather::FxKind;
use crate::consts::COLUMNS;
use crate::tuning::Tuning;

/// What touching an obstacle means for the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Blocks entry, harmless once beside it
    Blocking,
    /// Safe to stand on; carries the player
    Carrier,
    /// Lethal when centres are closer than `width * hitbox`
    Lethal { cause: DeathCause, hitbox: f32 },
}

pub fn contact(kind: ObstacleKind, tuning: &Tuning) -> Contact {
    match kind {
        ObstacleKind::Tree => Contact::Blocking,
        ObstacleKind::Log => Contact::Carrier,
        ObstacleKind::Car(_) => Contact::Lethal {
            cause: DeathCause::Car,
            hitbox: tuning.car_hitbox,
        },
        ObstacleKind::Train => Contact::Lethal {
            cause: DeathCause::Train,
            hitbox: tuning.train_hitbox,
        },
    }
}

/// Forgiving log span: `[position - lead, position + width - tail]`
pub fn on_log(column: f32, position: f32, width: f32, tuning: &Tuning) -> bool {
    column >= position - tuning.log_lead_tolerance
        && column <= position + width - tuning.log_tail_tolerance
}

/// Tighter-than-visual centre distance check
pub fn centres_overlap(column: f32, centre: f32, width: f32, hitbox: f32, tuning: &Tuning) -> bool {
    let player_centre = column + tuning.player_centre_offset;
    (centre - player_centre).abs() < width * hitbox
}

pub fn out_of_bounds(column: f32) -> bool {
    column < -0.5 || column > COLUMNS as f32 - 0.5
}

impl GameState {
    /// Resolve the player's lane for this tick
    pub(crate) fn resolve_hazards(&mut self, time_scale: f32) {
        if self.is_over() || self.player.is_jumping() {
            return;
        }
        let Some(lane) = self.lane(self.player.row) else {
            return;
        };

        let column = self.player.column;
        let mut carry = None;
        let mut lethal = None;

        match lane.kind {
            LaneKind::Grass => {}
            LaneKind::Water => {
                carry = lane
                    .obstacles
                    .iter()
                    .filter(|o| contact(o.kind, &self.tuning) == Contact::Carrier)
                    .find(|o| on_log(column, o.position, o.width, &self.tuning))
                    .map(|log| log.velocity() * time_scale);
                if carry.is_none() && !self.effects.is_active(PowerUpKind::WaterWalk) {
                    lethal = Some(DeathCause::Water);
                }
            }
            LaneKind::Road | LaneKind::Rail => {
                lethal = lane.obstacles.iter().find_map(|o| match contact(o.kind, &self.tuning) {
                    Contact::Lethal { cause, hitbox }
                        if centres_overlap(column, o.centre(), o.width, hitbox, &self.tuning) =>
                    {
                        Some(cause)
                    }
                    _ => None,
                });
            }
        }

        if let Some(dx) = carry {
            self.player.column += dx;
        }
        if let Some(cause) = lethal {
            self.lethal(cause);
            if self.is_over() {
                return;
            }
        }

        if out_of_bounds(self.player.column) {
            self.lethal(DeathCause::Bounds);
        }
    }

    /// A lethal event: absorbed by an active shield, otherwise game over
    pub(crate) fn lethal(&mut self, cause: DeathCause) {
        if self.is_over() {
            return;
        }

        if self.effects.try_absorb(cause) {
            log::info!("Shield absorbed {:?}", cause);
            self.emit(GameEvent::ShieldAbsorbed { cause });
            self.spawn_fx(
                FxKind::ShieldBurst,
                self.player.row,
                self.player.column,
                Some(self.tuning.shake_duration),
            );
            match cause {
                DeathCause::Water => {
                    // Grabbed the ledge: back one row, onto the grid
                    let floor = self.camera_floor.ceil() as u32;
                    if self.player.row > floor {
                        self.player.row -= 1;
                    }
                    self.player.column = self.player.column.round().clamp(0.0, (COLUMNS - 1) as f32);
                }
                DeathCause::Bounds => {
                    self.player.column = self.player.column.clamp(0.0, (COLUMNS - 1) as f32);
                }
                DeathCause::Car | DeathCause::Train | DeathCause::Void => {}
            }
            return;
        }

        let fx = if cause == DeathCause::Water {
            FxKind::Splash
        } else {
            FxKind::Splat
        };
        self.spawn_fx(fx, self.player.row, self.player.column, None);
        self.spawn_fx(
            FxKind::ScreenShake,
            self.player.row,
            self.player.column,
            Some(self.tuning.shake_duration),
        );
        self.emit(GameEvent::Died { cause });
        self.end_run(super::state::RunOutcome::Died(cause));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::modes::ModeState;
    use crate::sim::state::{Heading, Lane, Obstacle, RunOutcome, Vehicle};

    fn state_on(kind: LaneKind, obstacles: Vec<Obstacle>) -> GameState {
        let mut state = GameState::new(11, ModeState::Classic, Tuning::default());
        for lane in state.lanes.iter_mut() {
            *lane = Lane::grass(lane.id);
        }
        let lane = state.lane_mut(5).unwrap();
        lane.kind = kind;
        lane.obstacles = obstacles;
        lane.speed = Some(0.1);
        lane.heading = Some(Heading::Right);
        state.player.row = 5;
        state.player.column = 6.0;
        state
    }

    fn obstacle(kind: ObstacleKind, position: f32, width: f32) -> Obstacle {
        Obstacle {
            id: 1,
            position,
            kind,
            width,
            heading: Heading::Right,
            speed: 0.1,
        }
    }

    #[test]
    fn test_log_span_is_forgiving() {
        let t = Tuning::default();
        assert!(on_log(4.5, 5.0, 2.0, &t));
        assert!(on_log(6.6, 5.0, 2.0, &t));
        assert!(!on_log(4.3, 5.0, 2.0, &t));
        assert!(!on_log(6.7, 5.0, 2.0, &t));
    }

    #[test]
    fn test_drowning() {
        let mut state = state_on(LaneKind::Water, vec![obstacle(ObstacleKind::Log, 0.0, 2.0)]);
        state.resolve_hazards(1.0);
        assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Water)));
    }

    #[test]
    fn test_riding_a_log_carries_player() {
        let mut state = state_on(LaneKind::Water, vec![obstacle(ObstacleKind::Log, 5.0, 3.0)]);
        state.resolve_hazards(2.0);
        assert!(!state.is_over());
        assert!((state.player.column - 6.2).abs() < 1e-5);
    }

    #[test]
    fn test_water_walk_prevents_drowning() {
        let mut state = state_on(LaneKind::Water, vec![]);
        state.effects.hold(PowerUpKind::WaterWalk);
        state.handle_activate_held_power_up();
        state.resolve_hazards(1.0);
        assert!(!state.is_over());
        assert_eq!(state.player.column, 6.0);
    }

    #[test]
    fn test_car_hitbox() {
        // Car centre 7.0, player centre 6.5: 0.5 < 0.9 -> hit
        let mut state = state_on(
            LaneKind::Road,
            vec![obstacle(ObstacleKind::Car(Vehicle::Sedan), 6.0, 2.0)],
        );
        state.resolve_hazards(1.0);
        assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Car)));

        // Car centre 8.5, player centre 6.5: 2.0 >= 0.9 -> miss
        let mut state = state_on(
            LaneKind::Road,
            vec![obstacle(ObstacleKind::Car(Vehicle::Sedan), 7.5, 2.0)],
        );
        state.resolve_hazards(1.0);
        assert!(!state.is_over());
    }

    #[test]
    fn test_train_hit() {
        let mut state = state_on(LaneKind::Rail, vec![obstacle(ObstacleKind::Train, 3.0, 8.0)]);
        state.resolve_hazards(1.0);
        assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Train)));
    }

    #[test]
    fn test_carried_off_the_edge() {
        let mut state = state_on(LaneKind::Water, vec![obstacle(ObstacleKind::Log, 11.0, 3.0)]);
        state.player.column = 12.45;
        state.resolve_hazards(1.0);
        assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Bounds)));
    }

    #[test]
    fn test_no_resolution_mid_jump() {
        let mut state = state_on(
            LaneKind::Road,
            vec![obstacle(ObstacleKind::Car(Vehicle::Sedan), 6.0, 2.0)],
        );
        state.player.jump = Some(crate::sim::state::PendingJump {
            direction: crate::sim::state::Direction::Up,
            target_column: 6.0,
            target_row: 6,
            remaining: 0.1,
        });
        state.resolve_hazards(1.0);
        assert!(!state.is_over());
    }

    #[test]
    fn test_shield_grabs_ledge_on_drowning() {
        let mut state = state_on(LaneKind::Water, vec![]);
        state.player.column = 6.3;
        state.effects.hold(PowerUpKind::Shield);
        state.handle_activate_held_power_up();
        state.resolve_hazards(1.0);
        assert!(!state.is_over());
        assert_eq!(state.player.row, 4);
        assert_eq!(state.player.column, 6.0);
        assert!(state.effects.active.is_none());
    }

    #[test]
    fn test_shield_never_absorbs_void() {
        let mut state = state_on(LaneKind::Grass, vec![]);
        state.effects.hold(PowerUpKind::Shield);
        state.handle_activate_held_power_up();
        state.lethal(DeathCause::Void);
        assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Void)));
    }
}
