//! The depot (castle) where carried clay is delivered

use serde::{Deserialize, Serialize};

use crate::core::types::{Footprint, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub position: Vec2,
    pub footprint: Footprint,
    /// Units delivered so far; never decreases during a run
    inventory: u64,
}

impl Depot {
    pub fn new(position: Vec2, footprint: Footprint) -> Self {
        Self {
            position,
            footprint,
            inventory: 0,
        }
    }

    /// Accept one carried unit; returns the new inventory
    pub fn deliver(&mut self) -> u64 {
        self.inventory = self.inventory.saturating_add(1);
        self.inventory
    }

    pub fn inventory(&self) -> u64 {
        self.inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_increments_by_one() {
        let mut depot = Depot::new(Vec2::new(512.0, 384.0), Footprint::square(120.0));
        assert_eq!(depot.inventory(), 0);
        assert_eq!(depot.deliver(), 1);
        assert_eq!(depot.deliver(), 2);
        assert_eq!(depot.inventory(), 2);
    }
}
