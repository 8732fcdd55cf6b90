//! Resource nodes (clay packs) and their registry

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{HarvestingConfig, SpacingConfig};
use crate::core::types::{Footprint, ResourceId, Vec2};
use crate::spatial::placement::{Clearance, Placement, SpatialPlacer};

/// A depletable clay pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: ResourceId,
    pub position: Vec2,
    pub footprint: Footprint,
    pub hit_points: u32,
    pub max_hit_points: u32,
}

impl ResourceNode {
    /// hit_points / max_hit_points, in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        if self.max_hit_points == 0 {
            return 0.0;
        }
        self.hit_points as f32 / self.max_hit_points as f32
    }

    pub fn is_depleted(&self) -> bool {
        self.hit_points == 0
    }
}

/// Owns every live resource node
///
/// Nodes keep creation order, which is also the tie-break order for
/// `find_nearest`. Removed nodes are gone for good.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    nodes: Vec<ResourceNode>,
    next_id: u32,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `count` nodes away from the depot and from each other
    ///
    /// Returns one `Placement` per node so callers can see exhausted placements.
    pub fn create<R: Rng>(
        &mut self,
        count: usize,
        footprint: Footprint,
        harvesting: &HarvestingConfig,
        spacing: &SpacingConfig,
        placer: &SpatialPlacer,
        depot: Vec2,
        rng: &mut R,
    ) -> Vec<Placement> {
        let depot_positions = [depot];
        let mut placements = Vec::with_capacity(count);

        for _ in 0..count {
            let existing: Vec<Vec2> = self.nodes.iter().map(|n| n.position).collect();
            let placement = placer.place(
                rng,
                footprint.half_extent(),
                &[
                    Clearance::new(&depot_positions, spacing.depot_to_resource),
                    Clearance::new(&existing, spacing.resource_to_resource),
                ],
            );
            self.insert(placement.position, footprint, harvesting.max_hit_points);
            placements.push(placement);
        }

        placements
    }

    /// Register a node at an explicit position
    pub fn insert(&mut self, position: Vec2, footprint: Footprint, max_hit_points: u32) -> ResourceId {
        let id = ResourceId::new(self.next_id);
        self.next_id += 1;
        self.nodes.push(ResourceNode {
            id,
            position,
            footprint,
            hit_points: max_hit_points,
            max_hit_points,
        });
        id
    }

    /// Live node closest to `from`; the earliest created wins ties
    pub fn find_nearest(&self, from: Vec2) -> Option<ResourceId> {
        let mut best: Option<(ResourceId, f32)> = None;
        for node in &self.nodes {
            let d = from.distance(&node.position);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((node.id, d)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Apply damage; returns true when the node is now depleted
    ///
    /// Damage to a node that no longer exists does nothing and reports false.
    pub fn damage(&mut self, id: ResourceId, amount: u32) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.hit_points = node.hit_points.saturating_sub(amount);
                node.is_depleted()
            }
            None => false,
        }
    }

    /// Remove a node; returns whether anything was removed
    pub fn remove(&mut self, id: ResourceId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.nodes.len() != before
    }

    pub fn is_live(&self, id: ResourceId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ResourceId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: ResourceId) -> Option<&mut ResourceNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn position(&self, id: ResourceId) -> Option<Vec2> {
        self.get(id).map(|n| n.position)
    }

    pub fn health_fraction(&self, id: ResourceId) -> Option<f32> {
        self.get(id).map(ResourceNode::health_fraction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
