//! The colony: every entity plus the clock, RNG and subsystems that act on them

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::behavior::machine::BehaviorStateMachine;
use crate::behavior::state::StateKind;
use crate::core::clock::SimClock;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{AgentId, Millis, ResourceId, Vec2};
use crate::entity::agents::AgentRegistry;
use crate::entity::depot::Depot;
use crate::entity::resources::ResourceRegistry;
use crate::simulation::snapshot::{AgentSnapshot, ColonySnapshot, DepotSnapshot, NodeSnapshot};
use crate::spatial::collision::{CollisionModerator, StaticObstacle};
use crate::spatial::placement::{Placement, SpatialPlacer};

/// Where things ended up when the colony was laid out
#[derive(Debug, Clone, Default)]
pub struct PlacementReport {
    pub resources: Vec<Placement>,
    pub agents: Vec<Placement>,
}

impl PlacementReport {
    /// Placements that ran out of attempts and may overlap a neighbor
    pub fn exhausted(&self) -> usize {
        self.resources
            .iter()
            .chain(self.agents.iter())
            .filter(|p| p.exhausted)
            .count()
    }
}

pub struct Colony {
    pub config: SimulationConfig,
    pub rng: ChaCha8Rng,
    pub clock: SimClock,
    pub depot: Depot,
    pub resources: ResourceRegistry,
    pub agents: AgentRegistry,
    pub collision: CollisionModerator,
    pub machine: BehaviorStateMachine,
    pub placement: PlacementReport,
}

impl Colony {
    /// Validate the config and lay out the depot, clay packs and agents
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut colony = Self::empty(config)?;
        let config = &colony.config;
        let placer = SpatialPlacer::from_spacing(config.bounds, &config.spacing);
        let depot = colony.depot.position;

        colony.placement.resources = colony.resources.create(
            config.resource_count,
            config.resource_size,
            &config.harvesting,
            &config.spacing,
            &placer,
            depot,
            &mut colony.rng,
        );
        colony.placement.agents = colony.agents.create(
            config.agent_count,
            config.agent_speed,
            config.agent_size,
            &placer,
            depot,
            config.spacing.agent_spawn_exclusion,
            &mut colony.rng,
        );

        tracing::info!(
            "Colony laid out: {} agents, {} clay packs, depot at ({:.0}, {:.0}), seed {}",
            colony.agents.count(),
            colony.resources.len(),
            depot.x,
            depot.y,
            colony.config.seed
        );
        let exhausted = colony.placement.exhausted();
        if exhausted > 0 {
            tracing::warn!("{} placements could not satisfy spacing", exhausted);
        }

        Ok(colony)
    }

    /// A colony with only the depot; agents and nodes are added by hand
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let center = Vec2::new(config.bounds.width / 2.0, config.bounds.height / 2.0);

        Ok(Self {
            rng,
            clock: SimClock::new(),
            depot: Depot::new(center, config.depot_size),
            resources: ResourceRegistry::new(),
            agents: AgentRegistry::new(),
            collision: CollisionModerator::new(config.collision.clone(), config.agent_size),
            machine: BehaviorStateMachine::from_config(&config),
            placement: PlacementReport::default(),
            config,
        })
    }

    /// Add a clay pack at full health
    pub fn add_node(&mut self, position: Vec2) -> ResourceId {
        self.resources.insert(
            position,
            self.config.resource_size,
            self.config.harvesting.max_hit_points,
        )
    }

    /// Add a Seeking agent with a fixed speed
    pub fn add_agent(&mut self, position: Vec2, speed: f32) -> AgentId {
        self.agents.spawn(position, speed, 0.0)
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn agent_state(&self, agent: AgentId) -> Option<StateKind> {
        self.agents.state(agent).map(|s| s.kind())
    }

    pub fn depot_inventory(&self) -> u64 {
        self.depot.inventory()
    }

    pub fn remaining_nodes(&self) -> usize {
        self.resources.len()
    }

    pub fn node_health_fraction(&self, node: ResourceId) -> Option<f32> {
        self.resources.health_fraction(node)
    }

    /// No clay left anywhere: every pack is gone and nobody is carrying
    pub fn is_harvest_complete(&self) -> bool {
        self.resources.is_empty() && !self.agents.states.iter().any(|s| s.is_carrying())
    }

    /// Depot and clay packs as collision boxes
    pub fn static_obstacles(&self) -> Vec<StaticObstacle> {
        std::iter::once(StaticObstacle::new(self.depot.position, self.depot.footprint))
            .chain(
                self.resources
                    .iter()
                    .map(|n| StaticObstacle::new(n.position, n.footprint)),
            )
            .collect()
    }

    pub fn snapshot(&self) -> ColonySnapshot {
        let agents = (0..self.agents.count())
            .map(|i| {
                let ctx = &self.agents.contexts[i];
                AgentSnapshot {
                    id: self.agents.ids[i],
                    position: self.agents.positions[i],
                    velocity: self.agents.velocities[i],
                    speed: self.agents.speeds[i],
                    state: self.agents.states[i].kind(),
                    target: ctx.target,
                    persistent_target: ctx.persistent_target,
                    facing_right: ctx.facing_right,
                    animation_phase: ctx.animation_phase,
                }
            })
            .collect();

        let nodes = self
            .resources
            .iter()
            .map(|n| NodeSnapshot {
                id: n.id,
                position: n.position,
                hit_points: n.hit_points,
                max_hit_points: n.max_hit_points,
                health_fraction: n.health_fraction(),
            })
            .collect();

        ColonySnapshot {
            tick: self.clock.current_tick(),
            elapsed_ms: self.clock.now(),
            depot: DepotSnapshot {
                position: self.depot.position,
                footprint: self.depot.footprint,
                inventory: self.depot.inventory(),
            },
            nodes,
            agents,
            harvest_complete: self.is_harvest_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ColonyError;

    #[test]
    fn test_new_colony_layout() {
        let colony = Colony::new(SimulationConfig::default()).unwrap();
        assert_eq!(colony.agents.count(), 10);
        assert_eq!(colony.remaining_nodes(), 8);
        assert_eq!(colony.depot.position, Vec2::new(512.0, 384.0));
        assert_eq!(colony.depot_inventory(), 0);
        assert_eq!(colony.placement.resources.len(), 8);
        assert!(colony
            .agents
            .all()
            .iter()
            .all(|a| colony.agent_state(*a) == Some(StateKind::Seeking)));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = Colony::new(SimulationConfig::default()).unwrap();
        let b = Colony::new(SimulationConfig::default()).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulationConfig::default();
        config.harvesting.max_hit_points = 0;
        assert!(matches!(Colony::new(config), Err(ColonyError::InvalidConfig(_))));
    }

    #[test]
    fn test_harvest_complete_only_when_empty() {
        let mut colony = Colony::empty(SimulationConfig::default()).unwrap();
        assert!(colony.is_harvest_complete());
        colony.add_node(Vec2::new(100.0, 100.0));
        assert!(!colony.is_harvest_complete());
    }

    #[test]
    fn test_snapshot_serializes() {
        let colony = Colony::new(SimulationConfig::default()).unwrap();
        let json = colony.snapshot().to_json().unwrap();
        assert!(json.contains("\"state\": \"Seeking\""));
        assert!(json.contains("\"inventory\": 0"));
    }

    #[test]
    fn test_static_obstacles_include_depot_first() {
        let colony = Colony::new(SimulationConfig::default()).unwrap();
        let obstacles = colony.static_obstacles();
        assert_eq!(obstacles.len(), 9);
        assert_eq!(obstacles[0].center, colony.depot.position);
    }
}
