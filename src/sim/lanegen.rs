//! Procedural lane generation
//!
//! One lane at a time, from its index and a difficulty signal. Hazard odds and
//! lane speed grow with difficulty but are clamped, so hazard density has a
//! hard ceiling no matter how long a run lasts.

use rand::Rng;

use super::crossing::{first_idle_timer, train_speed};
use super::state::{
    CrossingPhase, CrossingState, Decoration, DecorationKind, Heading, IdCounter, Item, ItemKind,
    Lane, LaneKind, Obstacle, ObstacleKind, PowerUpKind, Vehicle,
};
use crate::consts::{COLUMNS, SAFE_LANES};
use crate::tuning::Tuning;

/// Lane-kind probabilities at a given difficulty (remainder is grass)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneOdds {
    pub water: f32,
    pub road: f32,
    pub rail: f32,
}

impl LaneOdds {
    pub fn at(difficulty: f32, tuning: &Tuning) -> Self {
        Self {
            water: tuning.water_chance.at(difficulty),
            road: tuning.road_chance.at(difficulty),
            rail: tuning.rail_chance.at(difficulty),
        }
    }

    pub fn grass(&self) -> f32 {
        (1.0 - self.water - self.road - self.rail).max(0.0)
    }

    /// Map a uniform roll in [0, 1) to a lane kind, water first
    pub fn pick(&self, roll: f32) -> LaneKind {
        if roll < self.water {
            LaneKind::Water
        } else if roll < self.water + self.road {
            LaneKind::Road
        } else if roll < self.water + self.road + self.rail {
            LaneKind::Rail
        } else {
            LaneKind::Grass
        }
    }
}

/// Power-up pickup weights (relative)
const POWERUP_WEIGHTS: [(PowerUpKind, u32); 5] = [
    (PowerUpKind::Shield, 25),
    (PowerUpKind::TimeSlow, 20),
    (PowerUpKind::Magnet, 25),
    (PowerUpKind::WaterWalk, 15),
    (PowerUpKind::DoubleCoins, 15),
];

fn pick_powerup<R: Rng + ?Sized>(rng: &mut R) -> PowerUpKind {
    let total: u32 = POWERUP_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (kind, weight) in POWERUP_WEIGHTS {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    PowerUpKind::Shield
}

fn pick_vehicle<R: Rng + ?Sized>(rng: &mut R) -> Vehicle {
    match rng.random_range(0..4) {
        0 => Vehicle::Sports,
        1 => Vehicle::Truck,
        _ => Vehicle::Sedan,
    }
}

/// Generate lane `index` at the given difficulty
pub fn generate_lane<R: Rng + ?Sized>(
    index: u32,
    difficulty: f32,
    tuning: &Tuning,
    rng: &mut R,
    ids: &mut IdCounter,
) -> Lane {
    // Safe zone at start
    if index < SAFE_LANES {
        return Lane::grass(index);
    }

    let kind = LaneOdds::at(difficulty, tuning).pick(rng.random::<f32>());
    let heading = if rng.random_bool(0.5) {
        Heading::Right
    } else {
        Heading::Left
    };
    let speed = tuning.lane_speed_at(difficulty);

    let mut lane = Lane::grass(index);
    lane.kind = kind;

    match kind {
        LaneKind::Grass => fill_grass(&mut lane, tuning, rng, ids),
        LaneKind::Road => {
            fill_road(&mut lane, speed, heading, rng, ids);
            lane.speed = Some(speed);
            lane.heading = Some(heading);
        }
        LaneKind::Water => {
            fill_water(&mut lane, speed, heading, tuning, rng, ids);
            lane.speed = Some(speed);
            lane.heading = Some(heading);
        }
        LaneKind::Rail => {
            lane.speed = Some(train_speed(tuning));
            lane.heading = Some(heading);
            lane.crossing = Some(CrossingState {
                phase: CrossingPhase::Idle,
                timer: first_idle_timer(tuning, rng),
            });
            let light = match heading {
                Heading::Right => 0.0,
                Heading::Left => (COLUMNS - 1) as f32,
            };
            lane.decorations.push(Decoration {
                id: ids.next_id(),
                position: light,
                kind: DecorationKind::WarningLight,
            });
        }
    }

    lane
}

fn fill_grass<R: Rng + ?Sized>(lane: &mut Lane, tuning: &Tuning, rng: &mut R, ids: &mut IdCounter) {
    let mut occupied = [false; COLUMNS];

    // Trees
    let tree_count = rng.random_range(0..=3);
    for _ in 0..tree_count {
        let x = rng.random_range(0..COLUMNS);
        if !occupied[x] {
            occupied[x] = true;
            lane.obstacles.push(Obstacle {
                id: ids.next_id(),
                position: x as f32,
                kind: ObstacleKind::Tree,
                width: 1.0,
                heading: Heading::Right,
                speed: 0.0,
            });
        }
    }

    // Collectible
    if rng.random::<f32>() < tuning.item_chance {
        let x = rng.random_range(0..COLUMNS);
        if !occupied[x] {
            occupied[x] = true;
            let kind = if rng.random::<f32>() < tuning.powerup_item_share {
                ItemKind::PowerUp(pick_powerup(rng))
            } else {
                ItemKind::Coin
            };
            lane.items.push(Item {
                id: ids.next_id(),
                position: x as f32,
                kind,
            });
        }
    }

    // Decorations
    let deco_count = rng.random_range(0..=3);
    for _ in 0..deco_count {
        let x = rng.random_range(0..COLUMNS);
        if !occupied[x] {
            let kind = match rng.random_range(0..5) {
                0 | 1 => DecorationKind::Flower {
                    variant: rng.random_range(0..4),
                },
                2 | 3 => DecorationKind::Rock,
                _ => DecorationKind::GrassTufts,
            };
            lane.decorations.push(Decoration {
                id: ids.next_id(),
                position: x as f32,
                kind,
            });
        }
    }

    lane.obstacles
        .sort_by(|a, b| a.position.total_cmp(&b.position));
}

fn fill_road<R: Rng + ?Sized>(
    lane: &mut Lane,
    speed: f32,
    heading: Heading,
    rng: &mut R,
    ids: &mut IdCounter,
) {
    let car_count = rng.random_range(1..=2);
    // Even spacing plus at most one cell of jitter keeps cars apart
    let spacing = COLUMNS as f32 / car_count as f32;
    for i in 0..car_count {
        let vehicle = pick_vehicle(rng);
        let jitter = rng.random_range(0..=1) as f32;
        let variance = rng.random_range(8..=12) as f32 * 0.1;
        lane.obstacles.push(Obstacle {
            id: ids.next_id(),
            position: (i as f32 * spacing + jitter) % COLUMNS as f32,
            kind: ObstacleKind::Car(vehicle),
            width: vehicle.width(),
            heading,
            speed: speed * variance * vehicle.speed_multiplier(),
        });
    }
}

fn fill_water<R: Rng + ?Sized>(
    lane: &mut Lane,
    speed: f32,
    heading: Heading,
    tuning: &Tuning,
    rng: &mut R,
    ids: &mut IdCounter,
) {
    let log_count = rng.random_range(2..=3);
    let spacing = COLUMNS as f32 / log_count as f32;
    for i in 0..log_count {
        let jitter = rng.random_range(0..=1) as f32;
        lane.obstacles.push(Obstacle {
            id: ids.next_id(),
            position: (i as f32 * spacing + jitter) % COLUMNS as f32,
            kind: ObstacleKind::Log,
            width: rng.random_range(2..=3) as f32,
            heading,
            speed: speed * tuning.log_speed_factor,
        });
    }

    if rng.random::<f32>() < tuning.lilypad_chance {
        lane.decorations.push(Decoration {
            id: ids.next_id(),
            position: rng.random_range(0..COLUMNS) as f32,
            kind: DecorationKind::Lilypad,
        });
    }
}
