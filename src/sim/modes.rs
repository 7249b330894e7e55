//! Game-mode controller
//!
//! All modes share the engine; they differ in camera policy, scoring and how a
//! run terminates.

use serde::{Deserialize, Serialize};

use super::state::{DeathCause, GameEvent, GameState, RunOutcome};

/// Mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    Survival,
    Gamble,
    Challenge,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Survival => "Survival",
            GameMode::Gamble => "Gamble",
            GameMode::Challenge => "Challenge",
        }
    }
}

/// What a challenge run must reach before its timer runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeGoal {
    /// Furthest row
    Score(u32),
    /// Coins collected during the run
    Coins(u64),
}

/// Per-mode run state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModeState {
    Classic,
    Survival {
        /// Auto-scrolling floor (rows, fractional)
        scroll_floor: f32,
    },
    Gamble {
        stake: u64,
        /// Multiplier increments earned so far
        steps: u32,
    },
    Challenge {
        goal: ChallengeGoal,
        time_left: f32,
    },
}

impl ModeState {
    pub fn mode(&self) -> GameMode {
        match self {
            ModeState::Classic => GameMode::Classic,
            ModeState::Survival { .. } => GameMode::Survival,
            ModeState::Gamble { .. } => GameMode::Gamble,
            ModeState::Challenge { .. } => GameMode::Challenge,
        }
    }

    pub fn survival() -> Self {
        ModeState::Survival { scroll_floor: 0.0 }
    }

    pub fn gamble(stake: u64) -> Self {
        ModeState::Gamble { stake, steps: 0 }
    }

    pub fn challenge(goal: ChallengeGoal, time_budget: f32) -> Self {
        ModeState::Challenge {
            goal,
            time_left: time_budget,
        }
    }
}

/// Multiplier step in thousandths, so payouts are exact integer math
fn step_millis(step: f32) -> u64 {
    (step * 1000.0).round().max(0.0) as u64
}

/// `floor(stake * multiplier)` where multiplier = 1 + steps * step
pub fn gamble_payout(stake: u64, steps: u32, step: f32) -> u64 {
    let multiplier_millis = 1000 + steps as u64 * step_millis(step);
    stake * multiplier_millis / 1000
}

impl GameState {
    /// Mode-specific timers: survival auto-scroll and challenge countdown
    pub(crate) fn advance_mode_timers(&mut self, dt: f32) {
        match self.mode {
            ModeState::Classic | ModeState::Gamble { .. } => {}
            ModeState::Survival {
                ref mut scroll_floor,
            } => {
                let speed = self.tuning.survival_scroll.at(self.best_row as f32);
                *scroll_floor += speed * dt;
                let floor = *scroll_floor;
                self.camera_floor = self.camera_floor.max(floor);
                self.extend_window();

                if self.player.row as f32 + self.tuning.void_margin < floor {
                    self.lethal(DeathCause::Void);
                }
            }
            ModeState::Challenge {
                ref mut time_left, ..
            } => {
                *time_left -= dt;
                if *time_left <= 0.0 {
                    *time_left = 0.0;
                    self.emit(GameEvent::ChallengeFailed);
                    self.end_run(RunOutcome::ChallengeFailed);
                }
            }
        }
    }

    /// Camera follows the player; survival's scroll floor is pulled along too
    pub(crate) fn follow_camera(&mut self) {
        let target = self.player.row.saturating_sub(self.tuning.camera_trail) as f32;
        if target > self.camera_floor {
            self.camera_floor = target;
        }
        if let ModeState::Survival {
            ref mut scroll_floor,
        } = self.mode
        {
            *scroll_floor = scroll_floor.max(target);
        }
    }

    /// Record a landing row; new bests advance score and the gamble multiplier
    pub(crate) fn record_progress(&mut self, row: u32) {
        if row <= self.best_row {
            return;
        }
        self.best_row = row;
        self.emit(GameEvent::NewBest { row });
        if let ModeState::Gamble { ref mut steps, .. } = self.mode {
            *steps += 1;
        }
    }

    /// End a challenge run once its goal is reached
    pub(crate) fn check_challenge(&mut self) {
        if self.is_over() {
            return;
        }
        let ModeState::Challenge { goal, .. } = self.mode else {
            return;
        };
        let reached = match goal {
            ChallengeGoal::Score(target) => self.best_row >= target,
            ChallengeGoal::Coins(target) => self.coins_collected >= target,
        };
        if reached {
            self.emit(GameEvent::ChallengeComplete);
            self.end_run(RunOutcome::ChallengeComplete);
        }
    }

    /// Current gamble multiplier, if this is a gamble run
    pub fn gamble_multiplier(&self) -> Option<f32> {
        match self.mode {
            ModeState::Gamble { steps, .. } => {
                Some(1.0 + steps as f32 * step_millis(self.tuning.gamble_step) as f32 / 1000.0)
            }
            _ => None,
        }
    }

    /// What cashing out right now would pay
    pub fn gamble_payout(&self) -> Option<u64> {
        match self.mode {
            ModeState::Gamble { stake, steps } => {
                Some(gamble_payout(stake, steps, self.tuning.gamble_step))
            }
            _ => None,
        }
    }

    /// Bank the stake times the multiplier and end the run. Gamble runs only.
    pub fn cash_out(&mut self) -> Option<u64> {
        if self.is_over() {
            return None;
        }
        let winnings = self.gamble_payout()?;
        self.emit(GameEvent::CashedOut { winnings });
        self.end_run(RunOutcome::CashedOut { winnings });
        Some(winnings)
    }

    /// Remaining challenge time, if this is a challenge run
    pub fn challenge_time_left(&self) -> Option<f32> {
        match self.mode {
            ModeState::Challenge { time_left, .. } => Some(time_left),
            _ => None,
        }
    }

    /// Score that may be converted into coins after a finished classic run
    pub fn convertible_score(&self) -> Option<u32> {
        match (&self.mode, self.outcome) {
            (ModeState::Classic, Some(RunOutcome::Died(_))) if self.best_row > 0 => {
                Some(self.best_row)
            }
            _ => None,
        }
    }
}
