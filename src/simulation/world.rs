//! Main simulation world that ties everything together
//!
//! `SimWorld` is the simulation context: it owns the clock, the city table,
//! the road network and every live commuter, and runs one tick at a time.

use anyhow::{ensure, Context, Result};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::HashMap;

use super::city::SimCity;
use super::clock::{GameSpeed, SimClock};
use super::commuter::SimCommuter;
use super::commuter_manager;
use super::config::SimConfig;
use super::demand::departure_estimate;
use super::road_network::SimRoadNetwork;
use super::stats::SimulationStats;
use super::types::{
    CityId, Color, CommuterId, LaneId, Position, RoadId, SimId, COMMUTER_LENGTH, COMMUTER_WIDTH,
};

/// Slack allowed on the following distance for f32 rounding
const GAP_TOLERANCE: f32 = 1e-3;

/// A commuter that reached the end of its road this tick
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalEvent {
    pub commuter: CommuterId,
    pub road: RoadId,
    pub destination: CityId,
    /// Travelled distance at the moment of retirement
    pub distance: f32,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub spawned: Vec<CommuterId>,
    pub arrivals: Vec<ArrivalEvent>,
}

/// Everything a renderer needs to draw one commuter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommuterView {
    pub id: CommuterId,
    pub position: Position,
    pub heading: f32,
    pub color: Color,
    /// Footprint as (length along the road, width across it)
    pub size: (f32, f32),
}

/// The main simulation world
pub struct SimWorld {
    /// Roads and lanes between cities
    pub road_network: SimRoadNetwork,

    /// All cities, indexed by `CityId`
    pub cities: Vec<SimCity>,

    /// All commuters currently on a road
    pub commuters: HashMap<CommuterId, SimCommuter>,

    pub clock: SimClock,

    pub config: SimConfig,

    pub stats: SimulationStats,

    /// Next commuter ID to assign
    next_commuter_id: usize,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(config: SimConfig, rng: Option<StdRng>) -> Self {
        Self {
            road_network: SimRoadNetwork::new(),
            cities: Vec::new(),
            commuters: HashMap::new(),
            clock: SimClock::default(),
            config,
            stats: SimulationStats::default(),
            next_commuter_id: 0,
            rng,
        }
    }

    pub fn new() -> Self {
        Self::new_internal(SimConfig::default(), None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(SimConfig::default(), Some(StdRng::seed_from_u64(seed)))
    }

    pub fn with_config(config: SimConfig, seed: Option<u64>) -> Self {
        Self::new_internal(config, seed.map(StdRng::seed_from_u64))
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<f32>) -> f32 {
        if range.is_empty() {
            return range.start;
        }
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    fn random_color(&mut self) -> Color {
        let mut channel = || -> u8 {
            match &mut self.rng {
                Some(rng) => rng.random_range(0..255),
                None => rand::rng().random_range(0..255),
            }
        };
        Color::opaque(channel(), channel(), channel())
    }

    fn next_commuter_id(&mut self) -> CommuterId {
        let id = CommuterId(SimId(self.next_commuter_id));
        self.next_commuter_id += 1;
        id
    }

    /// Add a city to the world
    pub fn add_city(&mut self, name: &str, position: Position, population: u32) -> CityId {
        let id = CityId(SimId(self.cities.len()));
        self.cities.push(SimCity::new(id, name, position, population));
        self.road_network.add_city(id, position);
        id
    }

    /// Add a one-way road with `lane_count` lanes
    pub fn add_road(&mut self, from: CityId, to: CityId, lane_count: usize) -> Result<RoadId> {
        self.road_network
            .add_road(from, to, lane_count)
            .with_context(|| format!("Failed to add road {:?} -> {:?}", from, to))
    }

    /// Add a road in each direction between two cities
    pub fn add_two_way_road(
        &mut self,
        a: CityId,
        b: CityId,
        lane_count: usize,
    ) -> Result<(RoadId, RoadId)> {
        let forward = self.add_road(a, b, lane_count)?;
        let backward = self.add_road(b, a, lane_count)?;
        Ok((forward, backward))
    }

    pub fn city(&self, city_id: CityId) -> Option<&SimCity> {
        self.cities.get(city_id.0 .0)
    }

    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.clock.set_speed(speed);
    }

    /// Population of every city, in id order
    pub fn city_populations(&self) -> Vec<(CityId, u32)> {
        self.cities.iter().map(|c| (c.id, c.population)).collect()
    }

    /// Residents at home plus commuters on the road
    pub fn total_population(&self) -> u64 {
        self.cities.iter().map(|c| u64::from(c.population)).sum::<u64>()
            + self.commuters.len() as u64
    }

    /// Commuters each city wants to send out at the current time of day
    pub fn departure_estimates(&self) -> Vec<(CityId, u64)> {
        let time_of_day = self.clock.time_of_day_hours();
        self.cities
            .iter()
            .map(|c| (c.id, departure_estimate(time_of_day, c.population, &self.config)))
            .collect()
    }

    /// Spawn one commuter into a lane if the origin city has residents left
    /// and the lane has room at its origin end
    ///
    /// Returns `None` when `lane_id` is not one of `road_id`'s lanes.
    pub fn try_spawn_commuter(&mut self, road_id: RoadId, lane_id: LaneId) -> Option<CommuterId> {
        let road = self.road_network.roads().get(road_id.0 .0)?;
        if !road.lanes.contains(&lane_id) {
            warn!("Lane {:?} is not on road {:?}", lane_id, road_id);
            return None;
        }
        let origin = road.from;
        if self.city(origin)?.population == 0 {
            return None;
        }
        if !commuter_manager::lane_accepts_spawn(
            self.road_network.lane(lane_id),
            &self.commuters,
            self.config.min_travel_distance,
        ) {
            return None;
        }

        let (min_speed, max_speed) = self.config.preferred_speed;
        let preferred_speed = self.random_range(min_speed..max_speed);
        let color = self.random_color();
        let commuter_id = self.next_commuter_id();

        let commuter = commuter_manager::spawn_commuter(
            commuter_id,
            road_id,
            lane_id,
            &mut self.road_network,
            &self.config,
            preferred_speed,
            color,
        );
        self.cities[origin.0 .0].depart();
        self.commuters.insert(commuter_id, commuter);

        debug!(
            "Spawned {:?} on {:?} lane {:?} at {:.1}/s",
            commuter_id, road_id, lane_id, preferred_speed
        );
        Some(commuter_id)
    }

    /// Send out this tick's commuters from every city
    ///
    /// Each city's estimate is split evenly over its outbound roads; the
    /// remainder stays home. Every lane takes at most one commuter per tick.
    fn spawn_departures(&mut self) -> Vec<CommuterId> {
        let mut spawned = Vec::new();

        for (city_id, estimate) in self.departure_estimates() {
            if estimate == 0 {
                continue;
            }
            let roads = self.road_network.outbound_roads(city_id);
            if roads.is_empty() {
                continue;
            }
            let per_road = estimate / roads.len() as u64;

            'roads: for road_id in roads {
                let mut quota = per_road;
                let lanes = self.road_network.road(road_id).lanes.clone();

                for lane_id in lanes {
                    if quota == 0 {
                        break;
                    }
                    if self.cities[city_id.0 .0].population == 0 {
                        break 'roads;
                    }
                    if let Some(commuter_id) = self.try_spawn_commuter(road_id, lane_id) {
                        spawned.push(commuter_id);
                        quota -= 1;
                    }
                }
            }
        }

        spawned
    }

    /// Retire every commuter that reached the end of its road
    fn retire_arrivals(&mut self) -> Vec<ArrivalEvent> {
        let arrived = commuter_manager::find_arrivals(
            &self.road_network,
            &self.commuters,
            self.config.arrival_margin,
        );

        let mut events = Vec::with_capacity(arrived.len());
        for commuter_id in arrived {
            let Some(commuter) = commuter_manager::retire_commuter(
                commuter_id,
                &mut self.commuters,
                &mut self.road_network,
            ) else {
                continue;
            };

            let destination = self.road_network.road(commuter.road).to;
            self.cities[destination.0 .0].arrive();

            debug!(
                "{:?} arrived at {:?} after {:.1}",
                commuter_id,
                destination,
                commuter.distance.into_inner()
            );
            events.push(ArrivalEvent {
                commuter: commuter_id,
                road: commuter.road,
                destination,
                distance: commuter.distance.into_inner(),
            });
        }

        events
    }

    /// Main simulation tick
    ///
    /// Clock, then departures, then movement, then arrivals. A paused clock
    /// freezes the whole simulation, and so does a `delta_secs` that is not a
    /// positive finite number.
    pub fn tick(&mut self, delta_secs: f32) -> TickReport {
        let delta_secs = if delta_secs.is_finite() {
            delta_secs.max(0.0)
        } else {
            warn!("Ignoring non-finite tick delta {}", delta_secs);
            0.0
        };
        let multiplier = self.clock.multiplier();
        self.clock.advance(delta_secs);

        let mut report = TickReport::default();
        if multiplier > 0.0 && delta_secs > 0.0 {
            report.spawned = self.spawn_departures();

            commuter_manager::update_commuters(
                delta_secs,
                multiplier,
                &self.road_network,
                &mut self.commuters,
                self.config.min_travel_distance,
            );

            report.arrivals = self.retire_arrivals();
        }

        self.stats
            .record_tick(delta_secs, report.spawned.len(), report.arrivals.len());
        report
    }

    /// Render data for every live commuter, in id order
    pub fn snapshot(&self) -> Vec<CommuterView> {
        let mut views: Vec<CommuterView> = self
            .commuters
            .values()
            .map(|c| CommuterView {
                id: c.id,
                position: c.position,
                heading: c.heading,
                color: c.color,
                size: (COMMUTER_LENGTH, COMMUTER_WIDTH),
            })
            .collect();
        views.sort_by_key(|view| view.id);
        views
    }

    /// Verify lane bookkeeping and spacing
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = 0;

        for lane in self.road_network.lanes() {
            let mut leader: Option<&SimCommuter> = None;

            for commuter_id in &lane.commuters {
                let commuter = self
                    .commuters
                    .get(commuter_id)
                    .with_context(|| format!("Lane {:?} holds unknown {:?}", lane.id, commuter_id))?;
                ensure!(
                    commuter.lane == lane.id && commuter.road == lane.road,
                    "{:?} is queued on lane {:?} but belongs to {:?}",
                    commuter_id,
                    lane.id,
                    commuter.lane
                );

                if let Some(leader) = leader {
                    let gap = leader.distance.into_inner() - commuter.distance.into_inner();
                    ensure!(
                        gap >= self.config.min_travel_distance - GAP_TOLERANCE,
                        "{:?} is {:.3} behind {:?} on lane {:?}",
                        commuter_id,
                        gap,
                        leader.id,
                        lane.id
                    );
                }
                leader = Some(commuter);
                seen += 1;
            }
        }

        ensure!(
            seen == self.commuters.len(),
            "{} commuters alive but {} queued in lanes",
            self.commuters.len(),
            seen
        );
        Ok(())
    }

    /// Create a default test world: three cities joined by two-way roads
    pub fn create_test_world() -> Self {
        Self::build_test_world(SimWorld::new())
    }

    /// Create a default test world with a seeded RNG for reproducible simulations
    pub fn create_test_world_with_seed(seed: u64) -> Self {
        Self::build_test_world(SimWorld::new_with_seed(seed))
    }

    /// Lay out the three-city demo network on top of an existing world
    ///
    /// Lets callers pick the config and seed before the cities are added.
    pub fn build_test_world(mut world: SimWorld) -> Self {
        let ashford = world.add_city("Ashford", Position::new(0.0, 0.0), 400);
        let brookfield = world.add_city("Brookfield", Position::new(400.0, 0.0), 300);
        let cedar_falls = world.add_city("Cedar Falls", Position::new(200.0, 300.0), 250);

        let roads = [
            (ashford, brookfield, 3),
            (brookfield, cedar_falls, 2),
            (cedar_falls, ashford, 2),
        ];
        for (a, b, lanes) in roads {
            if let Err(e) = world.add_two_way_road(a, b, lanes) {
                log::error!("Failed to build test world road: {:#}", e);
            }
        }

        world
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Commuter Simulation Summary ===");
        println!(
            "Clock: {} (day {}, {})",
            self.clock.format_hhmm(),
            self.clock.day(),
            self.clock.speed()
        );
        println!(
            "Cities: {}, Roads: {}",
            self.road_network.city_count(),
            self.road_network.road_count()
        );
        println!("Commuters on the road: {}", self.commuters.len());
        println!();

        println!("--- Cities ---");
        for ((city_id, estimate), city) in self.departure_estimates().into_iter().zip(&self.cities) {
            println!(
                "  {} {:?}: population={}, wants to leave={}, roads out={} in={}",
                city.name,
                city_id.0 .0,
                city.population,
                estimate,
                self.road_network.outbound_roads(city_id).len(),
                self.road_network.inbound_roads(city_id).len()
            );
        }

        println!("--- Roads ---");
        for road in self.road_network.roads() {
            let occupancy: Vec<usize> = road
                .lanes
                .iter()
                .map(|lane_id| self.road_network.lane(*lane_id).commuters.len())
                .collect();
            println!(
                "  Road {:?}: {} -> {}, length={:.0}, heading={:.0}, lanes={:?}",
                road.id.0 .0,
                self.cities[road.from.0 .0].name,
                self.cities[road.to.0 .0].name,
                road.length,
                road.heading,
                occupancy
            );
        }
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        println!("\n=== World Map ===");
        println!("Legend: letter=City, c=Commuter, .=Road");
        println!();
        for line in self.render_map() {
            println!("{}", line);
        }
        println!();
    }

    /// Map rows, scaled to fit a fixed-size character grid
    pub fn render_map(&self) -> Vec<String> {
        const MAP_WIDTH: f32 = 72.0;
        const MAP_HEIGHT: f32 = 36.0;

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for pos in self.road_network.city_positions().values() {
            min_x = min_x.min(pos.x);
            max_x = max_x.max(pos.x);
            min_y = min_y.min(pos.y);
            max_y = max_y.max(pos.y);
        }
        if min_x > max_x {
            return Vec::new();
        }

        // Characters are about twice as tall as they are wide
        let x_scale = MAP_WIDTH / (max_x - min_x).max(1.0);
        let y_scale = (x_scale / 2.0).min(MAP_HEIGHT / (max_y - min_y).max(1.0));
        let width = MAP_WIDTH as usize + 3;
        let height = ((max_y - min_y) * y_scale) as usize + 3;
        let mut grid = vec![vec![' '; width]; height];

        let to_grid = |pos: &Position| -> (usize, usize) {
            let col = (((pos.x - min_x) * x_scale) as usize + 1).min(width - 1);
            let row = (((pos.y - min_y) * y_scale) as usize + 1).min(height - 1);
            (row, col)
        };

        // Roads, sampled along their length
        for road in self.road_network.roads() {
            let steps = ((road.length * x_scale.max(y_scale)) as usize + 1).min(4 * (width + height));
            let angle = road.heading.to_radians();
            for step in 0..=steps {
                let along = road.length * step as f32 / steps as f32;
                let point = Position::new(
                    road.origin.x + along * angle.cos(),
                    road.origin.y + along * angle.sin(),
                );
                let (row, col) = to_grid(&point);
                grid[row][col] = '.';
            }
        }

        for commuter in self.commuters.values() {
            let (row, col) = to_grid(&commuter.position);
            grid[row][col] = 'c';
        }

        for city in &self.cities {
            let (row, col) = to_grid(&city.position);
            grid[row][col] = city.name.chars().next().unwrap_or('?').to_ascii_uppercase();
        }

        grid.iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect()
    }
}
