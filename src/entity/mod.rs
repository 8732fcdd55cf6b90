//! Colony entities: worker agents, clay packs and the depot

pub mod agents;
pub mod depot;
pub mod resources;

pub use agents::{AgentContext, AgentRegistry};
pub use depot::Depot;
pub use resources::{ResourceNode, ResourceRegistry};
