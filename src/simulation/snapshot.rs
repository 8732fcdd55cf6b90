//! Serializable view of a colony at one instant

use serde::{Deserialize, Serialize};

use crate::behavior::state::StateKind;
use crate::core::types::{AgentId, Footprint, Millis, ResourceId, Target, Tick, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub state: StateKind,
    pub target: Option<Target>,
    pub persistent_target: Option<ResourceId>,
    pub facing_right: bool,
    pub animation_phase: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: ResourceId,
    pub position: Vec2,
    pub hit_points: u32,
    pub max_hit_points: u32,
    pub health_fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotSnapshot {
    pub position: Vec2,
    pub footprint: Footprint,
    pub inventory: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub tick: Tick,
    pub elapsed_ms: Millis,
    pub depot: DepotSnapshot,
    pub nodes: Vec<NodeSnapshot>,
    pub agents: Vec<AgentSnapshot>,
    pub harvest_complete: bool,
}

impl ColonySnapshot {
    pub fn to_json(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of agents in each state
    pub fn state_counts(&self) -> Vec<(StateKind, usize)> {
        StateKind::ALL
            .iter()
            .map(|kind| (*kind, self.agents.iter().filter(|a| a.state == *kind).count()))
            .collect()
    }
}
