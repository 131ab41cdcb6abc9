//! Core types for the commuter simulation
//!
//! These are plain data types shared by every part of the simulation.

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for city IDs (index into the city table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityId(pub SimId);

/// A wrapper type for road IDs (index into the road table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadId(pub SimId);

/// A wrapper type for lane IDs (index into the lane table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneId(pub SimId);

/// A wrapper type for commuter IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommuterId(pub SimId);

/// A 2D screen-space position. `y` grows downwards, like the host canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading from this position to another, in degrees
    pub fn heading_to(&self, other: &Position) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

/// Cosmetic RGBA color handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Minimum distance a lane's tail must have travelled before another commuter
/// may spawn behind it; also the minimum gap between neighbours in a lane
pub const MIN_TRAVEL_DISTANCE: f32 = 24.0;

/// A commuter is retired once it is this close to the end of its road
pub const ARRIVAL_MARGIN: f32 = 15.0;

/// Lateral width of one lane
pub const LANE_WIDTH: f32 = 10.0;

/// Offset of a commuter within its lane, (lane width - commuter height) / 2
pub const LANE_PADDING: f32 = 2.0;

/// Commuter footprint in world units
pub const COMMUTER_LENGTH: f32 = 12.0;
pub const COMMUTER_WIDTH: f32 = 6.0;

/// Preferred speed band, in world units per real second at 1x
pub const MIN_PREFERRED_SPEED: f32 = 80.0;
pub const MAX_PREFERRED_SPEED: f32 = 140.0;
