//! Behavior state machine driving every agent

pub mod machine;
pub mod state;

pub use machine::{BehaviorStateMachine, BehaviorWorld};
pub use state::{AgentState, StateKind};
