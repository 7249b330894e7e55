//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time enters only through `tick`'s elapsed milliseconds
//! - Deferred work (jump commits, effect expiry, fx cleanup) is a countdown
//!   resolved inside the tick, never a callback
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod crossing;
pub mod effects;
pub mod jump;
pub mod kinematics;
pub mod lanegen;
pub mod modes;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod weather;

pub use effects::{ActiveEffect, Effects};
pub use lanegen::{LaneOdds, generate_lane};
pub use modes::{ChallengeGoal, GameMode, ModeState, gamble_payout};
pub use snapshot::Snapshot;
pub use state::{
    CrossingPhase, CrossingState, DeathCause, Decoration, DecorationKind, Direction, GameEvent,
    GamePhase, GameState, Heading, Item, ItemKind, Lane, LaneKind, Obstacle, ObstacleKind,
    Player, PowerUpKind, RunOutcome, Vehicle,
};
pub use tick::{TickInput, tick};
pub use weather::{FxKind, TransientFx, Weather};
