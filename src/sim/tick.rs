//! Simulation clock
//!
//! One call per rendered frame. The frame's elapsed time is clamped and turned
//! into a dimensionless time-scale against the nominal 60 Hz frame, so obstacle
//! speeds are frame-rate independent.

use super::collision::{centres_overlap, on_log};
use super::crossing::advance_crossing;
use super::kinematics::advance_obstacles;
use super::state::{CrossingPhase, Direction, GameEvent, GameState, LaneKind, ObstacleKind};
use crate::consts::{COLUMNS, MAX_FRAME_MS, NOMINAL_FRAME_MS};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional move requested this frame
    pub direction: Option<Direction>,
    /// Activate the held power-up
    pub activate: bool,
    /// Cash out (gamble runs only)
    pub cash_out: bool,
    /// Demo mode - the engine picks moves itself
    pub autopilot: bool,
}

/// Advance the run by one frame. Returns true when a redraw is due.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) -> bool {
    if state.is_over() {
        return false;
    }

    let mut input = input.clone();
    if input.autopilot && input.direction.is_none() {
        input.direction = autopilot_direction(state);
    }

    if input.cash_out {
        state.cash_out();
    }
    if input.activate {
        state.handle_activate_held_power_up();
    }
    if let Some(direction) = input.direction {
        state.handle_directional_input(direction);
    }
    if state.is_over() {
        return true;
    }

    // A tab coming back from the background must not catch up in one step.
    // A non-finite delta from the host simulates nothing.
    let ms = if elapsed_ms.is_finite() {
        elapsed_ms.clamp(0.0, MAX_FRAME_MS)
    } else {
        0.0
    };
    let time_scale = ms / NOMINAL_FRAME_MS;
    let real_dt = ms / 1000.0;
    state.run_time += real_dt;

    // (a) challenge countdown, survival scroll
    state.advance_mode_timers(real_dt);
    // (b) weather and visual fx
    state.advance_cosmetics(real_dt);

    // (c) effect countdown in world time, then the factor for the rest of the
    // tick, so an effect that just expired no longer rescales motion
    let countdown_dt = real_dt * state.effects.time_factor(&state.tuning);
    if let Some(kind) = state.effects.advance(countdown_dt) {
        log::debug!("{:?} expired", kind);
        state.emit(GameEvent::EffectExpired { kind });
    }
    let factor = state.effects.time_factor(&state.tuning);
    let world_scale = time_scale * factor;
    let world_dt = real_dt * factor;

    // (d) magnet
    state.magnet_pass(world_scale);

    // (e) crossings, then motion
    for lane in state.lanes.iter_mut() {
        if lane.kind == LaneKind::Rail {
            advance_crossing(
                lane,
                world_dt,
                &state.tuning,
                &mut state.rng,
                &mut state.ids,
                &mut state.events,
            );
        }
        advance_obstacles(lane, world_scale);
    }

    // Jump commits land before collision so a finished hop is checked this frame
    state.advance_jump(real_dt);

    // (f) hazards, suppressed mid-jump
    state.resolve_hazards(world_scale);
    state.check_challenge();

    // (g)
    state.time_ticks += 1;
    true
}

/// Whether standing at `(row, column)` is safe right now, roughly
fn looks_safe(state: &GameState, row: u32, column: f32) -> bool {
    let Some(lane) = state.lane(row) else {
        return false;
    };
    let tuning = &state.tuning;
    match lane.kind {
        LaneKind::Grass => !lane.tree_at(crate::grid_column(column)),
        LaneKind::Water => lane
            .obstacles
            .iter()
            .any(|o| o.kind == ObstacleKind::Log && on_log(column, o.position, o.width, tuning)),
        LaneKind::Road => !lane.obstacles.iter().any(|o| {
            // Pad the hitbox so the car cannot arrive during the hop
            centres_overlap(column, o.centre(), o.width, tuning.car_hitbox * 2.5, tuning)
        }),
        LaneKind::Rail => lane
            .crossing
            .is_none_or(|c| c.phase == CrossingPhase::Idle && c.timer > 1.0),
    }
}

/// Demo-mode move choice: hop forward when it looks safe, otherwise sidestep
/// toward the centre, otherwise wait
fn autopilot_direction(state: &GameState) -> Option<Direction> {
    if state.player.is_jumping() {
        return None;
    }
    let row = state.player.row;
    let column = state.player.column;

    if looks_safe(state, row + 1, column.round()) {
        return Some(Direction::Up);
    }

    let centre = crate::centre_column();
    let sides = if column < centre {
        [Direction::Right, Direction::Left]
    } else {
        [Direction::Left, Direction::Right]
    };
    for direction in sides {
        let (dx, _) = direction.delta();
        let target = (column + dx as f32).round();
        if (0.0..COLUMNS as f32).contains(&target) && looks_safe(state, row, target) {
            // Only sidestep if it opens the way forward
            if looks_safe(state, row + 1, target) {
                return Some(direction);
            }
        }
    }

    // Standing still is fatal on a drifting log near the edge or under survival scroll
    if !looks_safe(state, row, column) && looks_safe(state, row + 1, column.round()) {
        return Some(Direction::Up);
    }
    None
}
