//! Run session
//!
//! Owns at most one `GameState` and connects it to the outside world: a coin
//! wallet, a high-score store and an audio cue sink. After every entry point
//! the events the engine produced are drained and settled, so collaborators
//! only ever see the state between ticks.

use crate::audio::{CueSink, cue_for};
use crate::error::EconomyError;
use crate::sim::{
    ChallengeGoal, GameEvent, GameMode, GameState, ModeState, Snapshot, TickInput, Weather, tick,
};
use crate::tuning::Tuning;

/// Currency balance store
pub trait Wallet {
    fn balance(&self) -> u64;
    fn credit(&mut self, amount: u64);
    fn debit(&mut self, amount: u64) -> Result<(), EconomyError>;
}

/// Persisted per-mode high scores
pub trait ScoreStore {
    fn high_score(&self, mode: GameMode) -> u32;
    fn set_high_score(&mut self, mode: GameMode, score: u32);

    /// Called once when a run ends
    fn record_run(&mut self, _mode: GameMode, _score: u32, _coins: u64) {}
}

/// What kind of run to start
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunRequest {
    Classic,
    Survival,
    Gamble {
        stake: u64,
    },
    Challenge {
        goal: ChallengeGoal,
        /// Seconds; the tuning default when `None`
        time_limit: Option<f32>,
    },
}

pub struct Session<W: Wallet, S: ScoreStore> {
    wallet: W,
    scores: S,
    tuning: Tuning,
    state: Option<GameState>,
    /// Cosmetic weather pick applied to every run
    weather: Option<Weather>,
    /// High score of the current mode when the run started (raised as beaten)
    best_known: u32,
    converted: bool,
    run_id: u64,
}

impl<W: Wallet, S: ScoreStore> Session<W, S> {
    pub fn new(wallet: W, scores: S, tuning: Tuning) -> Self {
        Self {
            wallet,
            scores,
            tuning,
            state: None,
            weather: None,
            best_known: 0,
            converted: false,
            run_id: 0,
        }
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Current run, live or finished
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Incremented on every run start
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn is_running(&self) -> bool {
        self.state.as_ref().is_some_and(|s| !s.is_over())
    }

    /// Start a fresh run. A gamble stake is validated and debited up front.
    pub fn start_run(&mut self, request: RunRequest, seed: u64) -> Result<(), EconomyError> {
        let mode = match request {
            RunRequest::Classic => ModeState::Classic,
            RunRequest::Survival => ModeState::survival(),
            RunRequest::Gamble { stake } => {
                if stake < self.tuning.min_stake {
                    log::warn!("Rejected gamble stake {}", stake);
                    return Err(EconomyError::StakeTooSmall {
                        stake,
                        min: self.tuning.min_stake,
                    });
                }
                if let Err(err) = self.wallet.debit(stake) {
                    log::warn!("Rejected gamble stake {}: {}", stake, err);
                    return Err(err);
                }
                ModeState::gamble(stake)
            }
            RunRequest::Challenge { goal, time_limit } => {
                ModeState::challenge(goal, time_limit.unwrap_or(self.tuning.challenge_time))
            }
        };

        if self.is_running() {
            log::info!("Abandoning run {} for a new one", self.run_id);
        }

        let mut state = GameState::new(seed, mode, self.tuning.clone());
        state.set_weather(self.weather);
        self.best_known = self.scores.high_score(state.mode.mode());
        self.state = Some(state);
        self.converted = false;
        self.run_id += 1;

        log::info!(
            "Run {} started: {:?} (seed {}, best {})",
            self.run_id,
            request,
            seed,
            self.best_known
        );
        Ok(())
    }

    pub fn handle_directional_input(
        &mut self,
        direction: crate::sim::Direction,
        cues: &mut impl CueSink,
    ) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let accepted = state.handle_directional_input(direction);
        self.settle(cues);
        accepted
    }

    pub fn handle_activate_held_power_up(&mut self, cues: &mut impl CueSink) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let activated = state.handle_activate_held_power_up();
        self.settle(cues);
        activated
    }

    /// Advance the current run. Returns true when a redraw is due.
    pub fn tick(&mut self, input: &TickInput, elapsed_ms: f32, cues: &mut impl CueSink) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let redraw = tick(state, input, elapsed_ms);
        self.settle(cues);
        redraw
    }

    /// Bank the gamble winnings and end the run
    pub fn cash_out(&mut self, cues: &mut impl CueSink) -> Result<u64, EconomyError> {
        let winnings = self
            .state
            .as_mut()
            .and_then(|state| state.cash_out())
            .ok_or(EconomyError::NotGambling)?;
        self.settle(cues);
        Ok(winnings)
    }

    /// Credit a finished classic run's score as coins, once
    pub fn convert_score(&mut self) -> Result<u64, EconomyError> {
        let score = self
            .state
            .as_ref()
            .and_then(|state| state.convertible_score())
            .ok_or(EconomyError::ConversionUnavailable)?;
        if self.converted {
            return Err(EconomyError::AlreadyConverted);
        }
        self.converted = true;
        self.wallet.credit(score as u64);
        log::info!("Converted score {} into coins", score);
        Ok(score as u64)
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state.as_ref().map(|state| state.snapshot())
    }

    /// Pin the weather for this and later runs, `None` to let it cycle
    pub fn set_weather(&mut self, weather: Option<Weather>) {
        self.weather = weather;
        if let Some(state) = self.state.as_mut() {
            state.set_weather(weather);
        }
    }

    /// Drain engine events into wallet credits, score writes and cues
    fn settle(&mut self, cues: &mut impl CueSink) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let mode = state.mode.mode();
        let events = state.drain_events();

        for event in &events {
            if let Some(cue) = cue_for(event) {
                cues.cue(cue);
            }
            match *event {
                GameEvent::CoinCollected { value } => self.wallet.credit(value),
                GameEvent::CashedOut { winnings } => self.wallet.credit(winnings),
                GameEvent::NewBest { row } if row > self.best_known => {
                    self.best_known = row;
                    self.scores.set_high_score(mode, row);
                }
                _ => {}
            }
        }

        let ended = events.iter().any(|e| {
            matches!(
                e,
                GameEvent::Died { .. }
                    | GameEvent::CashedOut { .. }
                    | GameEvent::ChallengeComplete
                    | GameEvent::ChallengeFailed
            )
        });
        if ended {
            self.scores
                .record_run(mode, state.score(), state.coins_collected);
        }
    }
}
