//! Tuning knobs for a simulation run

use super::types::{
    ARRIVAL_MARGIN, LANE_PADDING, LANE_WIDTH, MAX_PREFERRED_SPEED, MIN_PREFERRED_SPEED,
    MIN_TRAVEL_DISTANCE,
};

/// Morning and evening rush hours, 08:30 and 17:30
pub const RUSH_HOURS: [f64; 2] = [8.5, 17.5];

/// Floor for the congestion distance when the clock sits exactly on a rush hour
pub const DIFF_EPSILON: f64 = 0.0001;

/// Every constant the simulation core reads, in one place
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub min_travel_distance: f32,
    pub arrival_margin: f32,
    pub lane_width: f32,
    pub lane_padding: f32,
    /// Half-open range `[min, max)` for a commuter's preferred speed
    pub preferred_speed: (f32, f32),
    pub rush_hours: Vec<f64>,
    pub diff_epsilon: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            min_travel_distance: MIN_TRAVEL_DISTANCE,
            arrival_margin: ARRIVAL_MARGIN,
            lane_width: LANE_WIDTH,
            lane_padding: LANE_PADDING,
            preferred_speed: (MIN_PREFERRED_SPEED, MAX_PREFERRED_SPEED),
            rush_hours: RUSH_HOURS.to_vec(),
            diff_epsilon: DIFF_EPSILON,
        }
    }
}

impl SimConfig {
    /// Lateral offset of a commuter driving in the given lane
    pub fn lane_offset(&self, lane_index: usize) -> f32 {
        lane_index as f32 * self.lane_width + self.lane_padding
    }
}
