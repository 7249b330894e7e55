//! Game state and core simulation types
//!
//! Everything a run mutates lives in one owned `GameState`. Renderers and other
//! collaborators only read it through `Snapshot` after a tick completes.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use super::modes::ModeState;
use super::weather::{TransientFx, Weather, WeatherState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting input, tick loop running
    Playing,
    /// Run ended, see `GameState::outcome`
    GameOver,
}

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Car,
    Water,
    Bounds,
    /// Fell behind the survival auto-scroll. Never absorbed by a shield.
    Void,
    Train,
}

/// Terminal result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Died(DeathCause),
    CashedOut { winnings: u64 },
    ChallengeComplete,
    ChallengeFailed,
}

/// Logical movement direction (input devices are mapped to this by the host)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (column delta, row delta)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Which way a lane's traffic flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Right,
    Left,
}

impl Heading {
    pub fn sign(self) -> f32 {
        match self {
            Heading::Right => 1.0,
            Heading::Left => -1.0,
        }
    }
}

/// Lane types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneKind {
    Grass,
    Road,
    Water,
    Rail,
}

/// Road vehicle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vehicle {
    Sedan,
    Sports,
    Truck,
}

impl Vehicle {
    /// Speed relative to the lane's nominal speed
    pub fn speed_multiplier(self) -> f32 {
        match self {
            Vehicle::Sedan => 1.0,
            Vehicle::Sports => 1.35,
            Vehicle::Truck => 0.7,
        }
    }

    /// Body length in cells
    pub fn width(self) -> f32 {
        match self {
            Vehicle::Sedan => 2.0,
            Vehicle::Sports => 1.6,
            Vehicle::Truck => 3.0,
        }
    }
}

/// Collidable things on a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Static, blocks entry to its cell
    Tree,
    /// Lethal on overlap
    Car(Vehicle),
    /// Carrier: standing on it is safe and moves the player
    Log,
    /// Lethal on overlap, only exists while a crossing is passing
    Train,
}

/// A collidable hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge, lane-local columns (fractional while moving)
    pub position: f32,
    pub kind: ObstacleKind,
    pub width: f32,
    pub heading: Heading,
    /// Cells per nominal frame (0 for static obstacles)
    pub speed: f32,
}

impl Obstacle {
    /// Signed velocity in cells per nominal frame
    pub fn velocity(&self) -> f32 {
        self.heading.sign() * self.speed
    }

    pub fn centre(&self) -> f32 {
        self.position + self.width / 2.0
    }
}

/// Timed effects granted by power-up pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    TimeSlow,
    Magnet,
    WaterWalk,
    DoubleCoins,
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Coin,
    PowerUp(PowerUpKind),
}

/// A non-blocking collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub position: f32,
    pub kind: ItemKind,
}

/// Cosmetic lane dressing (no collision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    Flower { variant: u8 },
    Rock,
    GrassTufts,
    Lilypad,
    WarningLight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub id: u32,
    pub position: f32,
    pub kind: DecorationKind,
}

/// Level-crossing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingPhase {
    Idle,
    Warning,
    Passing,
}

/// Rail lane crossing state with its countdown (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossingState {
    pub phase: CrossingPhase,
    pub timer: f32,
}

/// One row of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Row index, doubles as distance travelled
    pub id: u32,
    pub kind: LaneKind,
    pub obstacles: Vec<Obstacle>,
    pub decorations: Vec<Decoration>,
    pub items: Vec<Item>,
    /// Nominal speed in cells per nominal frame (road/water/rail)
    pub speed: Option<f32>,
    pub heading: Option<Heading>,
    /// Rail lanes only
    pub crossing: Option<CrossingState>,
}

impl Lane {
    /// An empty grass lane
    pub fn grass(id: u32) -> Self {
        Self {
            id,
            kind: LaneKind::Grass,
            obstacles: Vec::new(),
            decorations: Vec::new(),
            items: Vec::new(),
            speed: None,
            heading: None,
            crossing: None,
        }
    }

    /// True if a tree stands on the given grid column
    pub fn tree_at(&self, column: i32) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.kind == ObstacleKind::Tree && crate::grid_column(o.position) == column)
    }
}

/// Jump accepted but not yet committed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingJump {
    pub direction: Direction,
    pub target_column: f32,
    pub target_row: u32,
    /// Seconds until the jump lands
    pub remaining: f32,
}

/// The player token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Column, fractional while riding a log
    pub column: f32,
    /// Lane id the player stands on
    pub row: u32,
    /// Last movement direction (for sprite facing)
    pub facing: Direction,
    /// In-flight jump; while set no further input is accepted
    pub jump: Option<PendingJump>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            column: crate::centre_column(),
            row: 0,
            facing: Direction::Up,
            jump: None,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Something observable happened during input handling or a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    JumpStarted { direction: Direction },
    Landed { row: u32 },
    NewBest { row: u32 },
    CoinCollected { value: u64 },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpActivated { kind: PowerUpKind },
    EffectExpired { kind: PowerUpKind },
    ShieldAbsorbed { cause: DeathCause },
    Died { cause: DeathCause },
    CashedOut { winnings: u64 },
    ChallengeComplete,
    ChallengeFailed,
    CrossingWarning { lane: u32 },
    TrainPassing { lane: u32 },
    WeatherChanged { weather: Weather },
}

/// Monotonic entity id source
#[derive(Debug, Clone, Default)]
pub struct IdCounter {
    next: u32,
}

impl IdCounter {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete simulation context for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Mode-specific policy and counters
    pub mode: ModeState,
    pub phase: GamePhase,
    pub outcome: Option<RunOutcome>,
    /// Sliding lane window, ids strictly increasing by one
    pub lanes: VecDeque<Lane>,
    pub player: Player,
    pub effects: Effects,
    /// Lowest row visible; the player may not retreat behind it
    pub camera_floor: f32,
    /// Furthest row reached (the score)
    pub best_row: u32,
    /// Coins collected during this run
    pub coins_collected: u64,
    /// Simulated seconds since the run started (real time, unscaled)
    pub run_time: f32,
    pub time_ticks: u64,
    pub weather: WeatherState,
    /// Visual-only effects with their own expiry
    pub fx: Vec<TransientFx>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub ids: IdCounter,
}

impl GameState {
    /// Create a run with the given seed and mode, with the initial lane window
    pub fn new(seed: u64, mode: ModeState, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            mode,
            phase: GamePhase::Playing,
            outcome: None,
            lanes: VecDeque::new(),
            player: Player::new(),
            effects: Effects::default(),
            camera_floor: 0.0,
            best_row: 0,
            coins_collected: 0,
            run_time: 0.0,
            time_ticks: 0,
            weather: WeatherState::default(),
            fx: Vec::new(),
            events: Vec::new(),
            ids: IdCounter::default(),
        };

        state.generate_initial_window(INITIAL_LANES);
        state
    }

    /// Replace the lane window with lanes `0..count` at starting difficulty
    pub fn generate_initial_window(&mut self, count: usize) {
        self.lanes.clear();
        for index in 0..count as u32 {
            let lane = super::lanegen::generate_lane(
                index,
                0.0,
                &self.tuning,
                &mut self.rng,
                &mut self.ids,
            );
            self.lanes.push_back(lane);
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.best_row
    }

    /// Lane with the given id, if it is inside the window
    pub fn lane(&self, row: u32) -> Option<&Lane> {
        let front = self.lanes.front()?.id;
        let index = row.checked_sub(front)? as usize;
        self.lanes.get(index)
    }

    pub fn lane_mut(&mut self, row: u32) -> Option<&mut Lane> {
        let front = self.lanes.front()?.id;
        let index = row.checked_sub(front)? as usize;
        self.lanes.get_mut(index)
    }

    /// Id of the furthest generated lane
    pub fn leading_lane(&self) -> u32 {
        self.lanes.back().map(|l| l.id).unwrap_or(0)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pin the weather (cosmetic selection) or let it cycle with `None`
    pub fn set_weather(&mut self, weather: Option<Weather>) {
        self.weather.pin(weather);
    }

    /// Enter the terminal phase; pending jumps are dropped
    pub(crate) fn end_run(&mut self, outcome: RunOutcome) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.outcome = Some(outcome);
        self.player.jump = None;
        log::info!(
            "Run ended ({:?}): score {}, coins {}, {:.1}s",
            outcome,
            self.best_row,
            self.coins_collected,
            self.run_time
        );
    }
}
