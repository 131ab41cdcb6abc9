//! Road network graph connecting cities
//!
//! Roads are one-way edges of a petgraph directed graph whose nodes are
//! cities. Roads and lanes live in arena tables indexed by their ids; lanes
//! hold commuter ids rather than the commuters themselves.

use anyhow::{bail, Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};

use super::types::{CityId, CommuterId, LaneId, Position, RoadId, SimId};

/// One lane of a road
#[derive(Debug, Clone)]
pub struct SimLane {
    pub id: LaneId,
    pub road: RoadId,
    /// 0-based, lane 0 is closest to the road's centre line
    pub index: usize,
    /// Head (closest to the destination) first, most recent spawn last
    pub commuters: VecDeque<CommuterId>,
}

impl SimLane {
    pub fn tail(&self) -> Option<CommuterId> {
        self.commuters.back().copied()
    }

    /// Remove a specific commuter, keeping the others in order
    pub fn remove(&mut self, commuter_id: CommuterId) -> bool {
        match self.commuters.iter().position(|id| *id == commuter_id) {
            Some(index) => {
                self.commuters.remove(index);
                true
            }
            None => false,
        }
    }
}

/// A one-way road from one city to another
#[derive(Debug, Clone)]
pub struct SimRoad {
    pub id: RoadId,
    pub from: CityId,
    pub to: CityId,
    /// Where commuters enter the road
    pub origin: Position,
    /// Direction of travel in degrees, measured from +x towards +y
    pub heading: f32,
    pub length: f32,
    pub lanes: Vec<LaneId>,
}

#[derive(Debug, Default)]
pub struct SimRoadNetwork {
    /// Cities are nodes, roads are edges
    graph: DiGraph<CityId, RoadId>,

    city_to_node: HashMap<CityId, NodeIndex>,

    city_positions: HashMap<CityId, Position>,

    roads: Vec<SimRoad>,

    lanes: Vec<SimLane>,
}

impl SimRoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a city to the network graph
    pub fn add_city(&mut self, city_id: CityId, position: Position) {
        if self.city_to_node.contains_key(&city_id) {
            return;
        }

        let node_index = self.graph.add_node(city_id);
        self.city_to_node.insert(city_id, node_index);
        self.city_positions.insert(city_id, position);
    }

    /// Adds a one-way road with `lane_count` lanes between two cities.
    /// Heading and length follow from the city positions.
    pub fn add_road(&mut self, from: CityId, to: CityId, lane_count: usize) -> Result<RoadId> {
        if lane_count == 0 {
            bail!("Road from {:?} to {:?} needs at least one lane", from, to);
        }
        if from == to {
            bail!("Road cannot start and end at {:?}", from);
        }

        let from_node = *self
            .city_to_node
            .get(&from)
            .with_context(|| format!("Origin city {:?} not found", from))?;
        let to_node = *self
            .city_to_node
            .get(&to)
            .with_context(|| format!("Destination city {:?} not found", to))?;

        let origin = self.city_positions[&from];
        let destination = self.city_positions[&to];
        let length = origin.distance(&destination);
        if length <= 0.0 {
            bail!("Cities {:?} and {:?} share a position", from, to);
        }

        let road_id = RoadId(SimId(self.roads.len()));
        let lanes = (0..lane_count)
            .map(|index| {
                let lane_id = LaneId(SimId(self.lanes.len()));
                self.lanes.push(SimLane {
                    id: lane_id,
                    road: road_id,
                    index,
                    commuters: VecDeque::new(),
                });
                lane_id
            })
            .collect();

        self.roads.push(SimRoad {
            id: road_id,
            from,
            to,
            origin,
            heading: origin.heading_to(&destination),
            length,
            lanes,
        });
        self.graph.add_edge(from_node, to_node, road_id);

        Ok(road_id)
    }

    /// Road lookup for ids handed out by this network
    pub fn road(&self, road_id: RoadId) -> &SimRoad {
        &self.roads[road_id.0 .0]
    }

    pub fn lane(&self, lane_id: LaneId) -> &SimLane {
        &self.lanes[lane_id.0 .0]
    }

    pub fn lane_mut(&mut self, lane_id: LaneId) -> &mut SimLane {
        &mut self.lanes[lane_id.0 .0]
    }

    pub fn roads(&self) -> &[SimRoad] {
        &self.roads
    }

    pub fn lanes(&self) -> &[SimLane] {
        &self.lanes
    }

    /// Roads leaving a city, in creation order
    pub fn outbound_roads(&self, city_id: CityId) -> Vec<RoadId> {
        self.roads_in_direction(city_id, Direction::Outgoing)
    }

    /// Roads arriving at a city, in creation order
    pub fn inbound_roads(&self, city_id: CityId) -> Vec<RoadId> {
        self.roads_in_direction(city_id, Direction::Incoming)
    }

    fn roads_in_direction(&self, city_id: CityId, direction: Direction) -> Vec<RoadId> {
        let Some(node_index) = self.city_to_node.get(&city_id) else {
            return Vec::new();
        };

        let mut roads: Vec<RoadId> = self
            .graph
            .edges_directed(*node_index, direction)
            .map(|edge| *edge.weight())
            .collect();
        roads.sort();
        roads
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn city_count(&self) -> usize {
        self.city_to_node.len()
    }

    pub fn city_positions(&self) -> &HashMap<CityId, Position> {
        &self.city_positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> (SimRoadNetwork, CityId, CityId, CityId) {
        let mut network = SimRoadNetwork::new();
        let ids = [CityId(SimId(0)), CityId(SimId(1)), CityId(SimId(2))];
        network.add_city(ids[0], Position::new(0.0, 0.0));
        network.add_city(ids[1], Position::new(30.0, 40.0));
        network.add_city(ids[2], Position::new(0.0, -10.0));
        (network, ids[0], ids[1], ids[2])
    }

    #[test]
    fn road_geometry_follows_city_positions() {
        let (mut network, a, b, _) = network();
        let road_id = network.add_road(a, b, 2).unwrap();
        let road = network.road(road_id);

        assert_eq!(road.length, 50.0);
        assert!((road.heading - 53.130_1).abs() < 1e-3);
        assert_eq!(road.lanes.len(), 2);
        assert_eq!(network.lane(road.lanes[1]).index, 1);
        assert_eq!(network.lane(road.lanes[1]).road, road_id);
    }

    #[test]
    fn outbound_and_inbound_roads_are_ordered() {
        let (mut network, a, b, c) = network();
        let ab = network.add_road(a, b, 1).unwrap();
        let ac = network.add_road(a, c, 1).unwrap();
        let ba = network.add_road(b, a, 1).unwrap();

        assert_eq!(network.outbound_roads(a), vec![ab, ac]);
        assert_eq!(network.inbound_roads(a), vec![ba]);
        assert!(network.outbound_roads(c).is_empty());
    }

    #[test]
    fn lane_removal_keeps_order() {
        let (mut network, a, b, _) = network();
        let road_id = network.add_road(a, b, 1).unwrap();
        let lane_id = network.road(road_id).lanes[0];

        let lane = network.lane_mut(lane_id);
        for i in 0..4 {
            lane.commuters.push_back(CommuterId(SimId(i)));
        }
        assert!(lane.remove(CommuterId(SimId(2))));
        assert!(!lane.remove(CommuterId(SimId(2))));

        let left: Vec<usize> = lane.commuters.iter().map(|id| id.0 .0).collect();
        assert_eq!(left, vec![0, 1, 3]);
        assert_eq!(lane.tail(), Some(CommuterId(SimId(3))));
    }
}
