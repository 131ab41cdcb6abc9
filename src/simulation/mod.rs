//! Standalone commuter simulation module
//!
//! This module contains the whole simulation core: the clock, the demand
//! model, the road network and the commuter spawning, car-following and
//! retirement logic. It has no rendering dependencies and can be driven from
//! the console or from tests.

mod city;
mod clock;
mod commuter;
mod commuter_manager;
mod config;
mod demand;
mod road_network;
mod stats;
mod types;
mod world;

pub use city::SimCity;
pub use clock::{parse_hhmm, GameSpeed, SimClock, SpeedControl, SECONDS_PER_DAY};
pub use commuter::{following_advance, heading_delta, lane_start_position, SimCommuter};
pub use config::{SimConfig, DIFF_EPSILON, RUSH_HOURS};
pub use demand::{congestion_diff, departure_estimate};
pub use road_network::{SimLane, SimRoad, SimRoadNetwork};
pub use stats::SimulationStats;
pub use types::{
    CityId, Color, CommuterId, LaneId, Position, RoadId, SimId, ARRIVAL_MARGIN, COMMUTER_LENGTH,
    COMMUTER_WIDTH, LANE_PADDING, LANE_WIDTH, MAX_PREFERRED_SPEED, MIN_PREFERRED_SPEED,
    MIN_TRAVEL_DISTANCE,
};
pub use world::{ArrivalEvent, CommuterView, SimWorld, TickReport};
