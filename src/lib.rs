//! Commuter Simulation Library
//!
//! Simulates commuters driving between cities over multi-lane roads, with
//! rush-hour demand and a car-following model. Runs headless; a renderer can
//! read `SimWorld::snapshot` every tick.

pub mod simulation;
