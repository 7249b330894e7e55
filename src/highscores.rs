//! High score leaderboard system
//!
//! One board per game mode, each with the all-time best row and the top 10
//! finished runs. Persisted to LocalStorage.

use serde::{Deserialize, Serialize};

use crate::session::ScoreStore;
use crate::sim::GameMode;

/// Maximum number of high scores to keep per mode
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Furthest row reached
    pub score: u32,
    /// Coins collected during the run
    pub coins: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Leaderboard for one mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Best score, updated live during a run
    pub best: u32,
    pub entries: Vec<HighScoreEntry>,
}

impl Board {
    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a finished run. Returns the rank achieved (1-indexed) or None.
    pub fn add_score(&mut self, score: u32, coins: u64, timestamp: f64) -> Option<usize> {
        self.best = self.best.max(score);
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            coins,
            timestamp,
        };

        // Sorted descending by score
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }
}

/// All leaderboards
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    #[serde(default)]
    pub classic: Board,
    #[serde(default)]
    pub survival: Board,
    #[serde(default)]
    pub gamble: Board,
    #[serde(default)]
    pub challenge: Board,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_hopper_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, mode: GameMode) -> &Board {
        match mode {
            GameMode::Classic => &self.classic,
            GameMode::Survival => &self.survival,
            GameMode::Gamble => &self.gamble,
            GameMode::Challenge => &self.challenge,
        }
    }

    pub fn board_mut(&mut self, mode: GameMode) -> &mut Board {
        match mode {
            GameMode::Classic => &mut self.classic,
            GameMode::Survival => &mut self.survival,
            GameMode::Gamble => &mut self.gamble,
            GameMode::Challenge => &mut self.challenge,
        }
    }

    pub fn is_empty(&self) -> bool {
        [&self.classic, &self.survival, &self.gamble, &self.challenge]
            .iter()
            .all(|b| b.entries.is_empty())
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded high scores (classic best {})", scores.classic.best);
                        return scores;
                    }
                    Err(err) => log::warn!("Discarding unreadable high scores: {}", err),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl ScoreStore for HighScores {
    fn high_score(&self, mode: GameMode) -> u32 {
        self.board(mode).best
    }

    fn set_high_score(&mut self, mode: GameMode, score: u32) {
        let board = self.board_mut(mode);
        board.best = board.best.max(score);
    }

    fn record_run(&mut self, mode: GameMode, score: u32, coins: u64) {
        if let Some(rank) = self.board_mut(mode).add_score(score, coins, now_ms()) {
            log::info!("{} run ranked #{} with {}", mode.as_str(), rank, score);
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
