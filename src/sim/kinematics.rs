//! Hazard motion
//!
//! Obstacles move along their lane at `speed * time_scale` cells per tick.
//! Road and water lanes are cyclic: anything leaving one edge re-enters at the
//! opposite one. Trains are not wrapped, the crossing removes them.

use super::state::{Lane, Obstacle, ObstacleKind};
use crate::consts::COLUMNS;

/// How an obstacle kind moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Static,
    /// Moves and re-enters at the opposite edge
    Cyclic,
    /// Moves once across the lane
    Transit,
}

pub fn motion(kind: ObstacleKind) -> Motion {
    match kind {
        ObstacleKind::Tree => Motion::Static,
        ObstacleKind::Car(_) | ObstacleKind::Log => Motion::Cyclic,
        ObstacleKind::Train => Motion::Transit,
    }
}

/// Re-enter an obstacle at the opposite edge once it has fully left the lane
fn wrap(obstacle: &mut Obstacle) {
    let limit = COLUMNS as f32 + 2.0;
    let velocity = obstacle.velocity();
    if velocity > 0.0 && obstacle.position > limit {
        obstacle.position = -obstacle.width - 1.0;
    } else if velocity < 0.0 && obstacle.position < -obstacle.width - 1.0 {
        obstacle.position = limit;
    }
}

/// Advance every obstacle on a lane by one tick
pub fn advance_obstacles(lane: &mut Lane, time_scale: f32) {
    for obstacle in &mut lane.obstacles {
        match motion(obstacle.kind) {
            Motion::Static => {}
            Motion::Cyclic => {
                obstacle.position += obstacle.velocity() * time_scale;
                wrap(obstacle);
            }
            Motion::Transit => {
                obstacle.position += obstacle.velocity() * time_scale;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Heading, LaneKind, Vehicle};

    fn lane_with(kind: ObstacleKind, position: f32, heading: Heading, speed: f32) -> Lane {
        let mut lane = Lane::grass(5);
        lane.kind = LaneKind::Road;
        lane.obstacles.push(Obstacle {
            id: 1,
            position,
            kind,
            width: 2.0,
            heading,
            speed,
        });
        lane
    }

    #[test]
    fn test_moves_by_speed_and_scale() {
        let mut lane = lane_with(ObstacleKind::Car(Vehicle::Sedan), 3.0, Heading::Right, 0.5);
        advance_obstacles(&mut lane, 2.0);
        assert!((lane.obstacles[0].position - 4.0).abs() < 1e-6);

        let mut lane = lane_with(ObstacleKind::Log, 3.0, Heading::Left, 0.5);
        advance_obstacles(&mut lane, 1.0);
        assert!((lane.obstacles[0].position - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_wraps_right_edge() {
        let limit = COLUMNS as f32 + 2.0;
        let mut lane = lane_with(ObstacleKind::Car(Vehicle::Sedan), limit, Heading::Right, 0.1);
        advance_obstacles(&mut lane, 1.0);
        assert_eq!(lane.obstacles[0].position, -3.0);
    }

    #[test]
    fn test_wraps_left_edge() {
        let mut lane = lane_with(ObstacleKind::Log, -3.0, Heading::Left, 0.1);
        advance_obstacles(&mut lane, 1.0);
        assert_eq!(lane.obstacles[0].position, COLUMNS as f32 + 2.0);
    }

    #[test]
    fn test_trees_never_move() {
        let mut lane = lane_with(ObstacleKind::Tree, 4.0, Heading::Right, 1.0);
        advance_obstacles(&mut lane, 10.0);
        assert_eq!(lane.obstacles[0].position, 4.0);
    }

    #[test]
    fn test_trains_are_not_wrapped() {
        let mut lane = lane_with(ObstacleKind::Train, 20.0, Heading::Right, 1.0);
        advance_obstacles(&mut lane, 1.0);
        assert_eq!(lane.obstacles[0].position, 21.0);
    }
}
