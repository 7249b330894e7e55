//! Level-crossing state machine
//!
//! Each rail lane cycles IDLE -> WARNING -> PASSING -> IDLE on its own timers,
//! independent of where the player is. A single wide train exists only while
//! the crossing is PASSING.

use rand::Rng;

use super::state::{CrossingPhase, GameEvent, Heading, IdCounter, Lane, Obstacle, ObstacleKind};
use crate::consts::{COLUMNS, NOMINAL_FRAME_MS};
use crate::tuning::{SecondsRange, Tuning};

fn draw_seconds<R: Rng + ?Sized>(range: SecondsRange, rng: &mut R) -> f32 {
    if range.max <= range.min {
        return range.min;
    }
    rng.random_range(range.min..range.max)
}

/// Idle wait for a freshly generated crossing
pub fn first_idle_timer<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    draw_seconds(tuning.crossing_first_idle, rng)
}

/// Train speed (cells per nominal frame) so it fully crosses during PASSING
pub fn train_speed(tuning: &Tuning) -> f32 {
    let distance = COLUMNS as f32 + 2.0 * tuning.train_width;
    let frames = (tuning.crossing_passing * 1000.0 / NOMINAL_FRAME_MS).max(1.0);
    distance / frames
}

fn spawn_train(lane: &mut Lane, tuning: &Tuning, ids: &mut IdCounter) {
    let heading = lane.heading.unwrap_or(Heading::Right);
    // Enter just outside the edge the lane flows from
    let position = match heading {
        Heading::Right => -tuning.train_width,
        Heading::Left => COLUMNS as f32,
    };
    lane.obstacles.clear();
    lane.obstacles.push(Obstacle {
        id: ids.next_id(),
        position,
        kind: ObstacleKind::Train,
        width: tuning.train_width,
        heading,
        speed: lane.speed.unwrap_or_else(|| train_speed(tuning)),
    });
}

/// Phases in one crossing cycle
const PHASES: usize = 3;

/// Advance a rail lane's crossing by `dt` seconds
///
/// Timer overshoot carries into the next phase so transitions land exactly on
/// expiry regardless of frame boundaries. At most one full cycle is walked per
/// call, so degenerate zero-length phases cannot stall the tick. Non-rail lanes
/// are left untouched.
pub fn advance_crossing<R: Rng + ?Sized>(
    lane: &mut Lane,
    dt: f32,
    tuning: &Tuning,
    rng: &mut R,
    ids: &mut IdCounter,
    events: &mut Vec<GameEvent>,
) {
    let Some(mut crossing) = lane.crossing else {
        return;
    };

    crossing.timer -= dt;
    for _ in 0..PHASES {
        if crossing.timer > 0.0 {
            break;
        }
        match crossing.phase {
            CrossingPhase::Idle => {
                crossing.phase = CrossingPhase::Warning;
                crossing.timer += tuning.crossing_warning;
                events.push(GameEvent::CrossingWarning { lane: lane.id });
                log::debug!("Lane {} crossing: warning", lane.id);
            }
            CrossingPhase::Warning => {
                crossing.phase = CrossingPhase::Passing;
                crossing.timer += tuning.crossing_passing;
                spawn_train(lane, tuning, ids);
                events.push(GameEvent::TrainPassing { lane: lane.id });
                log::debug!("Lane {} crossing: train passing", lane.id);
            }
            CrossingPhase::Passing => {
                crossing.phase = CrossingPhase::Idle;
                crossing.timer += draw_seconds(tuning.crossing_idle, rng);
                lane.obstacles.clear();
            }
        }
    }

    lane.crossing = Some(crossing);
}
