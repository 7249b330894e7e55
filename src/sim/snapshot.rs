//! Read-only view of a run for renderers and hosts

use serde::{Deserialize, Serialize};

use super::effects::ActiveEffect;
use super::modes::{ChallengeGoal, GameMode, ModeState};
use super::state::{GamePhase, GameState, Lane, Player, PowerUpKind, RunOutcome};
use super::weather::{TransientFx, Weather};

/// Rows drawn behind the camera floor
const ROWS_BEHIND: u32 = 1;
/// Rows drawn ahead of the camera floor
const ROWS_AHEAD: u32 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: GameMode,
    pub phase: GamePhase,
    pub outcome: Option<RunOutcome>,
    pub player: Player,
    /// Visible lanes, lowest row first
    pub lanes: Vec<Lane>,
    pub camera_floor: f32,
    pub score: u32,
    pub coins: u64,
    pub held: Option<PowerUpKind>,
    pub active: Option<ActiveEffect>,
    /// Gamble only
    pub multiplier: Option<f32>,
    pub stake: Option<u64>,
    /// Challenge only
    pub time_left: Option<f32>,
    pub goal: Option<ChallengeGoal>,
    pub weather: Weather,
    pub fx: Vec<TransientFx>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let low = (self.camera_floor as u32).saturating_sub(ROWS_BEHIND);
        let high = self.camera_floor as u32 + ROWS_AHEAD;
        let lanes = self
            .lanes
            .iter()
            .filter(|lane| lane.id >= low && lane.id <= high)
            .cloned()
            .collect();

        let (stake, goal) = match self.mode {
            ModeState::Gamble { stake, .. } => (Some(stake), None),
            ModeState::Challenge { goal, .. } => (None, Some(goal)),
            ModeState::Classic | ModeState::Survival { .. } => (None, None),
        };

        Snapshot {
            mode: self.mode.mode(),
            phase: self.phase,
            outcome: self.outcome,
            player: self.player.clone(),
            lanes,
            camera_floor: self.camera_floor,
            score: self.score(),
            coins: self.coins_collected,
            held: self.effects.held,
            active: self.effects.active,
            multiplier: self.gamble_multiplier(),
            stake,
            time_left: self.challenge_time_left(),
            goal,
            weather: self.weather.current,
            fx: self.fx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_window() {
        let mut state = GameState::new(3, ModeState::Classic, Tuning::default());
        let snap = state.snapshot();
        assert_eq!(snap.lanes.first().map(|l| l.id), Some(0));
        assert_eq!(snap.lanes.last().map(|l| l.id), Some(16));

        state.camera_floor = 4.0;
        let snap = state.snapshot();
        assert_eq!(snap.lanes.first().map(|l| l.id), Some(3));
        assert_eq!(snap.mode, GameMode::Classic);
        assert_eq!(snap.multiplier, None);
    }

    #[test]
    fn test_snapshot_mode_fields() {
        let state = GameState::new(3, ModeState::gamble(50), Tuning::default());
        let snap = state.snapshot();
        assert_eq!(snap.stake, Some(50));
        assert_eq!(snap.multiplier, Some(1.0));

        let state = GameState::new(
            3,
            ModeState::challenge(ChallengeGoal::Coins(5), 60.0),
            Tuning::default(),
        );
        let snap = state.snapshot();
        assert_eq!(snap.goal, Some(ChallengeGoal::Coins(5)));
        assert_eq!(snap.time_left, Some(60.0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(3, ModeState::survival(), Tuning::default());
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"Survival\""));
    }

    #[test]
    fn test_game_over_snapshot_reads_back() {
        use crate::sim::state::DeathCause;
        use crate::sim::weather::FxKind;

        let mut state = GameState::new(3, ModeState::Classic, Tuning::default());
        state.lethal(DeathCause::Car);
        let json = serde_json::to_string(&state.snapshot()).unwrap();

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.outcome, Some(RunOutcome::Died(DeathCause::Car)));
        let marker = back.fx.iter().find(|fx| fx.kind == FxKind::Splat).unwrap();
        assert_eq!(marker.ttl, None);
        let shake = back.fx.iter().find(|fx| fx.kind == FxKind::ScreenShake).unwrap();
        assert_eq!(shake.ttl, Some(state.tuning.shake_duration));
    }
}
