//! Commuter state and the per-commuter motion maths

use ordered_float::OrderedFloat;
use std::f32::consts::FRAC_PI_2;

use super::types::{Color, CommuterId, LaneId, Position, RoadId};

/// A commuter driving from one city to another
#[derive(Debug, Clone)]
pub struct SimCommuter {
    pub id: CommuterId,
    pub road: RoadId,
    pub lane: LaneId,
    /// Progress along the road, 0 at the origin
    pub distance: OrderedFloat<f32>,
    /// World units per real second at 1x
    pub preferred_speed: f32,
    pub position: Position,
    /// Degrees, copied from the road
    pub heading: f32,
    pub color: Color,
}

impl SimCommuter {
    /// A commuter at the head of `lane`, shifted sideways by `lane_offset`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CommuterId,
        road: RoadId,
        lane: LaneId,
        road_origin: Position,
        heading: f32,
        lane_offset: f32,
        preferred_speed: f32,
        color: Color,
    ) -> Self {
        Self {
            id,
            road,
            lane,
            distance: OrderedFloat(0.0),
            preferred_speed,
            position: lane_start_position(road_origin, heading, lane_offset),
            heading,
            color,
        }
    }

    /// Distance this commuter would like to cover in one tick
    pub fn proposed_advance(&self, delta_secs: f32, multiplier: f32) -> f32 {
        self.preferred_speed * delta_secs * multiplier
    }

    /// Move `advance` units along the road and update the screen position
    pub fn advance_by(&mut self, advance: f32) {
        self.distance += advance;

        let (dx, dy) = heading_delta(advance, self.heading);
        self.position.x += dx;
        self.position.y += dy;
    }
}

/// Where a commuter in a lane enters the road. The lane offset is rotated to
/// be perpendicular to the direction of travel.
pub fn lane_start_position(road_origin: Position, heading: f32, lane_offset: f32) -> Position {
    let angle = heading.to_radians();
    Position::new(
        road_origin.x - angle.sin() * lane_offset,
        road_origin.y + angle.cos() * lane_offset,
    )
}

/// Split an advance along a road into screen-space `(dx, dy)` with the law of
/// sines. The right triangle has the advance as hypotenuse `b` opposite the
/// right angle `beta`, `dy` opposite `alpha` (the heading) and `dx` opposite
/// `gamma = 90° - alpha`.
pub fn heading_delta(advance: f32, heading: f32) -> (f32, f32) {
    let alpha = heading.to_radians();
    let beta = FRAC_PI_2;
    let gamma = FRAC_PI_2 - alpha;

    let b_part = advance / beta.sin();
    (gamma.sin() * b_part, alpha.sin() * b_part)
}

/// Advance a follower may take when `gap` units behind its leader.
/// Never closes the gap below `min_gap` and never goes backwards.
pub fn following_advance(proposed: f32, gap: f32, min_gap: f32) -> f32 {
    if gap - proposed < min_gap {
        (gap - min_gap).max(0.0)
    } else {
        proposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn law_of_sines_matches_heading_vector() {
        for heading in [0.0_f32, 30.0, 90.0, 135.0, 200.0, -45.0] {
            let (dx, dy) = heading_delta(10.0, heading);
            let angle = heading.to_radians();
            assert!(close(dx, 10.0 * angle.cos()), "dx at {heading}");
            assert!(close(dy, 10.0 * angle.sin()), "dy at {heading}");
        }
    }

    #[test]
    fn lane_offset_is_perpendicular_to_travel() {
        let origin = Position::new(100.0, 100.0);
        let east = lane_start_position(origin, 0.0, 12.0);
        assert!(close(east.x, 100.0) && close(east.y, 112.0));

        let south = lane_start_position(origin, 90.0, 12.0);
        assert!(close(south.x, 88.0) && close(south.y, 100.0));
    }

    #[test]
    fn follower_clamps_to_gap_minus_minimum() {
        assert_eq!(following_advance(40.0, 30.0, 24.0), 6.0);
        assert_eq!(following_advance(5.0, 30.0, 24.0), 5.0);
    }

    #[test]
    fn follower_stalls_instead_of_reversing() {
        assert_eq!(following_advance(10.0, 20.0, 24.0), 0.0);
    }
}
