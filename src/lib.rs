//! Lane Hopper - An endless lane-crossing runner
//!
//! Core modules:
//! - `sim`: Simulation engine (lane generation, kinematics, collisions, power-ups)
//! - `session`: Binds a run to the wallet, high-score store and audio cues
//! - `profile`: Persisted coins and skins
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound cue mapping (Web Audio synthesis on wasm32)

pub mod audio;
pub mod error;
pub mod highscores;
pub mod profile;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{EconomyError, ProfileError};
pub use highscores::HighScores;
pub use profile::Profile;
pub use session::{Session, ScoreStore, Wallet};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Lane width in grid columns
    pub const COLUMNS: usize = 13;
    /// Lanes generated when a run starts
    pub const INITIAL_LANES: usize = 20;
    /// Lanes at the start of the world that are always empty grass
    pub const SAFE_LANES: u32 = 4;

    /// Nominal frame interval the time-scale is normalized against (ms)
    pub const NOMINAL_FRAME_MS: f32 = 16.67;
    /// Largest elapsed time a single tick will simulate (ms)
    pub const MAX_FRAME_MS: f32 = 60.0;

    /// Starting wallet for a fresh profile
    pub const STARTING_COINS: u64 = 100;
}

/// Player column of the lane centre, used as the spawn column
#[inline]
pub fn centre_column() -> f32 {
    (consts::COLUMNS / 2) as f32
}

/// Round a lane-local position to the grid column it occupies
#[inline]
pub fn grid_column(position: f32) -> i32 {
    position.round() as i32
}
