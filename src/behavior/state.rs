//! Agent behavior states
//!
//! `AgentState` carries the data that only matters while the agent is in that
//! state (attack anchor and phase, knockback origin and direction, stun
//! anchor). `StateKind` is the data-free tag exposed to observers.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// The eight behavior states, without per-state data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateKind {
    Seeking,
    MovingToTarget,
    Attacking,
    Knockback,
    Stunned,
    Cooldown,
    Carrying,
    ReturningToDepot,
}

impl StateKind {
    pub const ALL: [StateKind; 8] = [
        StateKind::Seeking,
        StateKind::MovingToTarget,
        StateKind::Attacking,
        StateKind::Knockback,
        StateKind::Stunned,
        StateKind::Cooldown,
        StateKind::Carrying,
        StateKind::ReturningToDepot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StateKind::Seeking => "SEEKING",
            StateKind::MovingToTarget => "MOVING_TO_TARGET",
            StateKind::Attacking => "ATTACKING",
            StateKind::Knockback => "KNOCKBACK",
            StateKind::Stunned => "STUNNED",
            StateKind::Cooldown => "COOLDOWN",
            StateKind::Carrying => "CARRYING",
            StateKind::ReturningToDepot => "RETURNING_TO_DEPOT",
        }
    }

    /// States in which the agent's target must be live (or absent)
    pub fn requires_live_target(&self) -> bool {
        matches!(self, StateKind::MovingToTarget | StateKind::Attacking)
    }

    /// States that play the walk cycle while the agent moves
    pub fn is_walking(&self) -> bool {
        matches!(
            self,
            StateKind::Seeking | StateKind::MovingToTarget | StateKind::ReturningToDepot
        )
    }
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Current behavior state of one agent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AgentState {
    /// Idle, looking for the nearest live clay pack
    #[default]
    Seeking,
    MovingToTarget,
    Attacking {
        /// Where the agent stood when the attack began
        anchor: Vec2,
        /// Attack-phase counter; the strike follows sin(2 * phase)
        phase: f32,
        /// Last strike cycle that landed a hit
        last_hit_cycle: u32,
    },
    Knockback {
        origin: Vec2,
        /// Unit vector pointing away from the struck node
        direction: Vec2,
        distance: f32,
    },
    Stunned {
        /// Knocked-back resting position
        anchor: Vec2,
    },
    Cooldown,
    /// Holding one unit of clay; leaves for the depot on the same tick
    Carrying,
    ReturningToDepot,
}

impl AgentState {
    pub fn kind(&self) -> StateKind {
        match self {
            AgentState::Seeking => StateKind::Seeking,
            AgentState::MovingToTarget => StateKind::MovingToTarget,
            AgentState::Attacking { .. } => StateKind::Attacking,
            AgentState::Knockback { .. } => StateKind::Knockback,
            AgentState::Stunned { .. } => StateKind::Stunned,
            AgentState::Cooldown => StateKind::Cooldown,
            AgentState::Carrying => StateKind::Carrying,
            AgentState::ReturningToDepot => StateKind::ReturningToDepot,
        }
    }

    /// Fresh attack state anchored at `anchor`
    pub fn attacking(anchor: Vec2) -> Self {
        AgentState::Attacking {
            anchor,
            phase: 0.0,
            last_hit_cycle: 0,
        }
    }

    /// Whether the agent has one unit of clay in hand
    pub fn is_carrying(&self) -> bool {
        matches!(self, AgentState::Carrying | AgentState::ReturningToDepot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_seeking() {
        assert_eq!(AgentState::default().kind(), StateKind::Seeking);
    }

    #[test]
    fn test_kind_ignores_variant_data() {
        let a = AgentState::attacking(Vec2::new(1.0, 2.0));
        assert_eq!(a.kind(), StateKind::Attacking);
        let k = AgentState::Knockback {
            origin: Vec2::ZERO,
            direction: Vec2::new(-1.0, 0.0),
            distance: 35.0,
        };
        assert_eq!(k.kind(), StateKind::Knockback);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(StateKind::ReturningToDepot.to_string(), "RETURNING_TO_DEPOT");
        assert_eq!(StateKind::ALL.len(), 8);
    }

    #[test]
    fn test_walking_states() {
        let walking: Vec<StateKind> = StateKind::ALL.into_iter().filter(|k| k.is_walking()).collect();
        assert_eq!(
            walking,
            vec![StateKind::Seeking, StateKind::MovingToTarget, StateKind::ReturningToDepot]
        );
    }

    #[test]
    fn test_carrying_states() {
        assert!(AgentState::Carrying.is_carrying());
        assert!(AgentState::ReturningToDepot.is_carrying());
        assert!(!AgentState::Cooldown.is_carrying());
    }
}
