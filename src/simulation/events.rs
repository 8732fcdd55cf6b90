//! Events produced by a simulation tick

use serde::{Deserialize, Serialize};

use crate::behavior::state::StateKind;
use crate::core::types::{AgentId, Millis, ResourceId, Vec2};

/// Events generated during a simulation tick
///
/// Returned by `run_simulation_tick` in the order they happened, for
/// presentation layers (spark effects, logs) and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    /// An agent entered a new behavior state
    StateChanged {
        agent: AgentId,
        from: StateKind,
        to: StateKind,
        at: Millis,
    },
    /// A strike landed on a clay pack
    HitLanded {
        agent: AgentId,
        node: ResourceId,
        /// Midpoint between agent and node, where the impact is drawn
        position: Vec2,
        /// Health fraction after the hit
        remaining_fraction: f32,
        depleted: bool,
    },
    /// A clay pack reached zero hit points and was removed
    NodeDepleted { node: ResourceId, by: AgentId },
    /// A carried unit reached the depot
    Delivered { agent: AgentId, inventory: u64 },
}

