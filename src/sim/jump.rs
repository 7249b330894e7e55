//! Jump state machine
//!
//! IDLE -> JUMPING on an accepted directional input, JUMPING -> IDLE when the
//! jump countdown reaches zero and the move commits. While a jump is in flight
//! further input is ignored and hazard resolution is suspended.

use super::lanegen::generate_lane;
use super::state::{Direction, GameEvent, GameState, LaneKind, PendingJump, PowerUpKind};
use crate::consts::COLUMNS;

impl GameState {
    /// Directional input. Returns true if a jump was started.
    ///
    /// Rejected (silently) while jumping, after game over, when the target cell
    /// is off the lane, behind the camera floor, or holds a tree.
    pub fn handle_directional_input(&mut self, direction: Direction) -> bool {
        if self.is_over() || self.player.is_jumping() {
            return false;
        }

        let (dx, dy) = direction.delta();
        let Some(target_row) = self.player.row.checked_add_signed(dy) else {
            return false;
        };
        let raw_column = self.player.column + dx as f32;
        let column = crate::grid_column(raw_column);

        // Bounds
        if column < 0 || column >= COLUMNS as i32 {
            return false;
        }
        // No retreating off-screen
        if (target_row as f32) < self.camera_floor.floor() {
            return false;
        }
        let Some(lane) = self.lane(target_row) else {
            return false;
        };
        // Trees always block; items never do
        if lane.kind == LaneKind::Grass && lane.tree_at(column) {
            return false;
        }

        // Land on the grid unless the target is water (logs carry fractional columns)
        let target_column = if lane.kind == LaneKind::Water {
            raw_column
        } else {
            column as f32
        };

        let time_slowed = self.effects.is_active(PowerUpKind::TimeSlow);
        self.player.facing = direction;
        self.player.jump = Some(PendingJump {
            direction,
            target_column,
            target_row,
            remaining: self.tuning.jump_time(time_slowed),
        });
        self.emit(GameEvent::JumpStarted { direction });
        true
    }

    /// Count the in-flight jump down by real elapsed seconds; commit on expiry
    pub(crate) fn advance_jump(&mut self, dt: f32) {
        let Some(jump) = self.player.jump.as_mut() else {
            return;
        };
        jump.remaining -= dt;
        if jump.remaining > 0.0 {
            return;
        }
        let jump = *jump;
        self.player.jump = None;
        self.commit_jump(jump);
    }

    /// Apply a landed jump: position, score, camera, window, pickup
    fn commit_jump(&mut self, jump: PendingJump) {
        // A run that ended mid-flight never lands
        if self.is_over() {
            return;
        }

        self.player.column = jump.target_column;
        self.player.row = jump.target_row;
        self.emit(GameEvent::Landed {
            row: jump.target_row,
        });

        self.record_progress(jump.target_row);
        self.follow_camera();
        self.extend_window();
        self.collect_items_at_player();
        self.check_challenge();
    }

    /// Append lanes while the leading edge is near the camera, retire old ones
    pub(crate) fn extend_window(&mut self) {
        let horizon = self.camera_floor as u32 + self.tuning.window_lookahead;
        if self.leading_lane() >= horizon {
            return;
        }

        let first = self.leading_lane() + 1;
        for index in first..first + self.tuning.window_batch {
            let lane = generate_lane(
                index,
                index as f32,
                &self.tuning,
                &mut self.rng,
                &mut self.ids,
            );
            self.lanes.push_back(lane);
        }

        while self.lanes.len() > self.tuning.window_cap {
            self.lanes.pop_front();
        }

        log::debug!(
            "Lane window now {}..={}",
            self.lanes.front().map(|l| l.id).unwrap_or(0),
            self.leading_lane()
        );
    }
}
