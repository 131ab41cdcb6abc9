//! Run statistics

use log::info;

/// Cumulative counters for a simulation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationStats {
    pub total_commuters_spawned: u64,
    pub total_commuters_arrived: u64,
    pub ticks: u64,
    /// Real seconds fed into the simulation
    pub elapsed_time: f32,
}

impl SimulationStats {
    pub fn record_tick(&mut self, delta_secs: f32, spawned: usize, arrived: usize) {
        self.ticks += 1;
        self.elapsed_time += delta_secs;
        self.total_commuters_spawned += spawned as u64;
        self.total_commuters_arrived += arrived as u64;
    }

    /// Commuters spawned but not yet arrived
    pub fn in_transit(&self) -> u64 {
        self.total_commuters_spawned - self.total_commuters_arrived
    }

    pub fn arrival_rate(&self) -> f32 {
        if self.total_commuters_spawned > 0 {
            (self.total_commuters_arrived as f32 / self.total_commuters_spawned as f32) * 100.0
        } else {
            0.0
        }
    }

    /// Log the end-of-run summary
    pub fn log_summary(&self, cities: usize, roads: usize) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Ticks: {}", self.ticks);
        info!("Elapsed time: {:.2}s", self.elapsed_time);
        info!("Total commuters spawned: {}", self.total_commuters_spawned);
        info!("Total commuters arrived: {}", self.total_commuters_arrived);
        info!("In transit: {}", self.in_transit());
        info!("Total cities: {}", cities);
        info!("Total roads: {}", roads);
        info!("Arrival rate: {:.1}%", self.arrival_rate());
    }
}
