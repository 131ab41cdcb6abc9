//! Time-of-day commuter demand
//!
//! Demand spikes around rush hour: the distance to the nearest rush hour is
//! cubed, so a city empties out quickly near 08:30 and 17:30 and barely moves
//! in the middle of the day.

use super::config::SimConfig;

/// Congestion distance: cube of the hours between `time_of_day` and the
/// nearest rush hour, floored at `epsilon`
pub fn congestion_diff(time_of_day: f64, rush_hours: &[f64], epsilon: f64) -> f64 {
    let diff = rush_hours
        .iter()
        .map(|rush_hour| (time_of_day - rush_hour).abs().powi(3))
        .fold(f64::MAX, f64::min);

    if diff <= 0.0 {
        epsilon
    } else {
        diff
    }
}

/// Number of commuters in a city of `population` who want to leave this tick
pub fn departure_estimate(time_of_day: f64, population: u32, config: &SimConfig) -> u64 {
    let diff = congestion_diff(time_of_day, &config.rush_hours, config.diff_epsilon);
    (f64::from(population) / (0.5 * diff)) as u64
}
