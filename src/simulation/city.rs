//! Cities: where commuters live between trips

use super::types::{CityId, Position};

/// A city in the simulation
#[derive(Debug, Clone)]
pub struct SimCity {
    pub id: CityId,
    pub name: String,
    pub position: Position,
    /// Residents currently at home
    pub population: u32,
}

impl SimCity {
    pub fn new(id: CityId, name: impl Into<String>, position: Position, population: u32) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            population,
        }
    }

    /// A resident leaves on a trip. Returns false if nobody is home.
    pub fn depart(&mut self) -> bool {
        match self.population.checked_sub(1) {
            Some(population) => {
                self.population = population;
                true
            }
            None => false,
        }
    }

    /// A commuter arrives and becomes a resident
    pub fn arrive(&mut self) {
        self.population = self.population.saturating_add(1);
    }
}
