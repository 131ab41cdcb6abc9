//! Commuter spawning, movement and retirement
//!
//! This module contains the lane-level logic for spawning, moving and
//! retiring commuters. It separates commuter management from the world's
//! per-tick coordination.

use std::collections::HashMap;

use super::commuter::{following_advance, SimCommuter};
use super::config::SimConfig;
use super::road_network::{SimLane, SimRoadNetwork};
use super::types::{Color, CommuterId, LaneId, RoadId};

/// Whether a new commuter fits at the origin end of `lane`
///
/// A lane takes a new commuter when it is empty or its tail has already moved
/// further than `min_travel_distance` from the origin.
pub fn lane_accepts_spawn(
    lane: &SimLane,
    commuters: &HashMap<CommuterId, SimCommuter>,
    min_travel_distance: f32,
) -> bool {
    match lane.tail() {
        None => true,
        Some(tail_id) => commuters[&tail_id].distance.into_inner() > min_travel_distance,
    }
}

/// Create a commuter at the start of `lane` and append it to the lane's tail
///
/// # Arguments
/// * `commuter_id` - The pre-generated commuter ID
/// * `road_id` - The road the commuter drives along
/// * `lane_id` - One of the road's lanes
/// * `road_network` - The network owning road and lane
/// * `config` - Source of the lane geometry
/// * `preferred_speed` - Speed the commuter drives at when unobstructed
/// * `color` - Cosmetic color
///
/// Does not check the lane's spacing; callers use [`lane_accepts_spawn`] first.
pub fn spawn_commuter(
    commuter_id: CommuterId,
    road_id: RoadId,
    lane_id: LaneId,
    road_network: &mut SimRoadNetwork,
    config: &SimConfig,
    preferred_speed: f32,
    color: Color,
) -> SimCommuter {
    let road = road_network.road(road_id);
    let lane = road_network.lane(lane_id);
    debug_assert_eq!(lane.road, road_id, "lane {:?} is not on road {:?}", lane_id, road_id);

    let commuter = SimCommuter::new(
        commuter_id,
        road_id,
        lane_id,
        road.origin,
        road.heading,
        config.lane_offset(lane.index),
        preferred_speed,
        color,
    );

    road_network.lane_mut(lane_id).commuters.push_back(commuter_id);
    commuter
}

/// Advance every commuter on every lane by one tick
///
/// Lanes are walked head to tail so each follower sees its leader's position
/// after the leader has already moved this tick.
pub fn update_commuters(
    delta_secs: f32,
    multiplier: f32,
    road_network: &SimRoadNetwork,
    commuters: &mut HashMap<CommuterId, SimCommuter>,
    min_travel_distance: f32,
) {
    for lane in road_network.lanes() {
        let mut leader_distance: Option<f32> = None;

        for commuter_id in &lane.commuters {
            let commuter = commuters
                .get_mut(commuter_id)
                .unwrap_or_else(|| panic!("lane {:?} holds unknown {:?}", lane.id, commuter_id));

            let mut advance = commuter.proposed_advance(delta_secs, multiplier);
            if let Some(leader_distance) = leader_distance {
                let gap = leader_distance - commuter.distance.into_inner();
                advance = following_advance(advance, gap, min_travel_distance);
            }

            commuter.advance_by(advance);
            leader_distance = Some(commuter.distance.into_inner());
        }
    }
}

/// Commuters that have reached the end of their road, in id order
pub fn find_arrivals(
    road_network: &SimRoadNetwork,
    commuters: &HashMap<CommuterId, SimCommuter>,
    arrival_margin: f32,
) -> Vec<CommuterId> {
    let mut arrived: Vec<CommuterId> = commuters
        .values()
        .filter(|commuter| {
            let road = road_network.road(commuter.road);
            commuter.distance.into_inner() > road.length - arrival_margin
        })
        .map(|commuter| commuter.id)
        .collect();
    arrived.sort();
    arrived
}

/// Remove a commuter from its lane and from the simulation
///
/// Returns the removed commuter so the caller can credit its destination.
pub fn retire_commuter(
    commuter_id: CommuterId,
    commuters: &mut HashMap<CommuterId, SimCommuter>,
    road_network: &mut SimRoadNetwork,
) -> Option<SimCommuter> {
    let commuter = commuters.remove(&commuter_id)?;

    let removed = road_network.lane_mut(commuter.lane).remove(commuter_id);
    debug_assert!(removed, "{:?} missing from lane {:?}", commuter_id, commuter.lane);

    Some(commuter)
}
