//! Per-agent behavior state machine
//!
//! Each tick runs in two passes over the agents: `check_transitions` moves an
//! agent to its next state when the current state's exit condition holds, then
//! `apply_behavior` performs the per-tick work of whatever state the agent is
//! in. All state dispatch happens in the two `match` blocks below.
//!
//! Cycle of a harvesting agent:
//!
//! SEEKING -> MOVING_TO_TARGET -> ATTACKING -> KNOCKBACK -> STUNNED -> COOLDOWN
//!   -> MOVING_TO_TARGET -> ... -> ATTACKING -> (lethal hit) CARRYING
//!   -> RETURNING_TO_DEPOT -> SEEKING

use std::f32::consts::TAU;

use crate::behavior::state::AgentState;
use crate::core::config::{BehaviorConfig, HarvestingConfig, SimulationConfig};
use crate::core::types::{AgentId, Millis, ResourceId, Target, Vec2};
use crate::entity::agents::AgentRegistry;
use crate::entity::depot::Depot;
use crate::entity::resources::ResourceRegistry;
use crate::simulation::events::SimulationEvent;

/// Knockback direction used when the agent stands exactly on the node
pub const DEFAULT_KNOCKBACK_DIRECTION: Vec2 = Vec2 { x: -1.0, y: 0.0 };

/// Stun wobble period divisor (ms per radian)
const STUN_WOBBLE_MS: f32 = 100.0;

/// Mutable view of the colony the state machine works on during one tick
pub struct BehaviorWorld<'a> {
    pub agents: &'a mut AgentRegistry,
    pub resources: &'a mut ResourceRegistry,
    pub depot: &'a mut Depot,
    pub now: Millis,
    /// Length of the current tick; steering never overshoots within it
    pub dt_secs: f32,
    pub events: &'a mut Vec<SimulationEvent>,
}

impl BehaviorWorld<'_> {
    fn elapsed_in_state(&self, i: usize) -> Millis {
        self.now.saturating_sub(self.agents.contexts[i].entered_at)
    }

    fn target_position(&self, target: Target) -> Option<Vec2> {
        match target {
            Target::Node(id) => self.resources.position(id),
            Target::Depot => Some(self.depot.position),
        }
    }

    fn enter(&mut self, agent: AgentId, next: AgentState) {
        let i = agent.index();
        let from = self.agents.states[i].kind();
        let to = next.kind();
        self.agents.states[i] = next;
        self.agents.contexts[i].entered_at = self.now;

        tracing::debug!("Agent {} {} -> {} at {}ms", i, from, to, self.now);
        self.events.push(SimulationEvent::StateChanged {
            agent,
            from,
            to,
            at: self.now,
        });
    }

    /// Drop both targets and go back to looking for work
    fn abandon(&mut self, agent: AgentId) {
        let ctx = &mut self.agents.contexts[agent.index()];
        ctx.target = None;
        ctx.persistent_target = None;
        self.enter(agent, AgentState::Seeking);
    }
}

#[derive(Debug, Clone)]
pub struct BehaviorStateMachine {
    behavior: BehaviorConfig,
    harvesting: HarvestingConfig,
}

impl BehaviorStateMachine {
    pub fn new(behavior: BehaviorConfig, harvesting: HarvestingConfig) -> Self {
        Self { behavior, harvesting }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.behavior.clone(), config.harvesting.clone())
    }

    /// Evaluate the exit condition of the agent's current state
    pub fn check_transitions(&self, world: &mut BehaviorWorld, agent: AgentId) {
        let i = agent.index();
        if i >= world.agents.count() {
            return;
        }

        let position = world.agents.positions[i];
        let state = world.agents.states[i];
        match state {
            AgentState::Seeking => {
                if let Some(node) = world.resources.find_nearest(position) {
                    let ctx = &mut world.agents.contexts[i];
                    ctx.target = Some(Target::Node(node));
                    ctx.persistent_target = Some(node);
                    world.enter(agent, AgentState::MovingToTarget);
                }
            }

            AgentState::MovingToTarget => {
                let target = world.agents.contexts[i].target;
                match target {
                    None => world.abandon(agent),
                    Some(Target::Node(node)) => match world.resources.position(node) {
                        None => world.abandon(agent),
                        Some(node_pos) => {
                            if position.distance(&node_pos) <= self.harvesting.attack_range {
                                world.agents.velocities[i] = Vec2::ZERO;
                                world.agents.contexts[i].facing_right = node_pos.x >= position.x;
                                world.enter(agent, AgentState::attacking(position));
                            }
                        }
                    },
                    Some(Target::Depot) => {
                        if position.distance(&world.depot.position) <= self.harvesting.drop_off_range {
                            self.deliver(world, agent);
                        }
                    }
                }
            }

            AgentState::Attacking { anchor, phase, last_hit_cycle } => {
                let node = world.agents.contexts[i].target.and_then(|t| t.node());
                let node_pos = node.and_then(|id| world.resources.position(id));
                let (Some(node), Some(node_pos)) = (node, node_pos) else {
                    world.abandon(agent);
                    return;
                };

                let wave = 2.0 * phase;
                let cycle = (wave / TAU).floor().max(0.0) as u32;
                if cycle > last_hit_cycle && wave.sin() > self.behavior.strike_peak {
                    self.resolve_hit(world, agent, node, node_pos, anchor);
                }
            }

            AgentState::Knockback { origin, direction, distance } => {
                if world.elapsed_in_state(i) >= self.behavior.knockback_ms {
                    let rest = origin + direction * distance;
                    world.agents.positions[i] = rest;
                    world.enter(agent, AgentState::Stunned { anchor: rest });
                }
            }

            AgentState::Stunned { anchor } => {
                if world.elapsed_in_state(i) >= self.behavior.stun_ms {
                    world.agents.positions[i] = anchor;
                    world.enter(agent, AgentState::Cooldown);
                }
            }

            AgentState::Cooldown => {
                if world.elapsed_in_state(i) >= self.behavior.cooldown_ms {
                    let resume = world.agents.contexts[i]
                        .persistent_target
                        .filter(|node| world.resources.is_live(*node));
                    match resume {
                        Some(node) => {
                            world.agents.contexts[i].target = Some(Target::Node(node));
                            world.enter(agent, AgentState::MovingToTarget);
                        }
                        None => world.abandon(agent),
                    }
                }
            }

            AgentState::Carrying => {
                world.agents.contexts[i].target = Some(Target::Depot);
                world.enter(agent, AgentState::ReturningToDepot);
            }

            AgentState::ReturningToDepot => {
                if position.distance(&world.depot.position) <= self.harvesting.drop_off_range {
                    self.deliver(world, agent);
                }
            }
        }
    }

    /// Per-tick work of the agent's current state
    pub fn apply_behavior(&self, world: &mut BehaviorWorld, agent: AgentId) {
        let i = agent.index();
        if i >= world.agents.count() {
            return;
        }

        let state = world.agents.states[i];
        match state {
            AgentState::Seeking | AgentState::Cooldown | AgentState::Carrying => {
                world.agents.velocities[i] = Vec2::ZERO;
            }

            AgentState::MovingToTarget | AgentState::ReturningToDepot => self.steer(world, i),

            AgentState::Attacking { anchor, phase, last_hit_cycle } => {
                let phase = phase + self.behavior.attack_phase_step;
                let toward = world.agents.contexts[i]
                    .target
                    .and_then(|t| world.target_position(t))
                    .and_then(|p| (p - anchor).try_normalize())
                    .unwrap_or(Vec2::ZERO);
                let lunge = (2.0 * phase).sin().max(0.0) * self.behavior.strike_distance;

                world.agents.positions[i] = anchor + toward * lunge;
                world.agents.velocities[i] = Vec2::ZERO;
                world.agents.states[i] = AgentState::Attacking { anchor, phase, last_hit_cycle };
            }

            AgentState::Knockback { origin, direction, distance } => {
                let t = world.elapsed_in_state(i) as f32 / self.behavior.knockback_ms.max(1) as f32;
                world.agents.positions[i] = origin + direction * (distance * ease_out_cubic(t));
                world.agents.velocities[i] = Vec2::ZERO;
            }

            AgentState::Stunned { anchor } => {
                let t = world.elapsed_in_state(i) as f32 / STUN_WOBBLE_MS;
                let jitter = self.behavior.stun_jitter;
                world.agents.positions[i] = anchor + Vec2::new(t.sin() * jitter, t.cos() * jitter / 2.0);
                world.agents.velocities[i] = Vec2::ZERO;
            }
        }
    }

    fn steer(&self, world: &mut BehaviorWorld, i: usize) {
        let position = world.agents.positions[i];
        let target_pos = world.agents.contexts[i]
            .target
            .and_then(|t| world.target_position(t));

        let Some(target_pos) = target_pos else {
            world.agents.velocities[i] = Vec2::ZERO;
            return;
        };

        let delta = target_pos - position;
        let distance = delta.length();
        if distance <= self.behavior.arrival_threshold {
            world.agents.velocities[i] = Vec2::ZERO;
            return;
        }

        let mut speed = world.agents.speeds[i];
        if world.dt_secs > 0.0 {
            speed = speed.min(distance / world.dt_secs);
        }

        match delta.try_normalize() {
            Some(unit) => {
                world.agents.velocities[i] = unit * speed;
                if delta.x != 0.0 {
                    world.agents.contexts[i].facing_right = delta.x > 0.0;
                }
            }
            None => world.agents.velocities[i] = Vec2::ZERO,
        }
    }

    fn resolve_hit(&self, world: &mut BehaviorWorld, agent: AgentId, node: ResourceId, node_pos: Vec2, anchor: Vec2) {
        let i = agent.index();
        world.agents.contexts[i].last_hit_at = Some(world.now);

        let depleted = world.resources.damage(node, self.harvesting.damage_per_hit);
        let remaining_fraction = world.resources.health_fraction(node).unwrap_or(0.0);
        let impact = world.agents.positions[i].midpoint(&node_pos);

        tracing::debug!(
            "Agent {} hit clay pack {} ({:.0}% left)",
            i,
            node.0,
            remaining_fraction * 100.0
        );
        world.events.push(SimulationEvent::HitLanded {
            agent,
            node,
            position: impact,
            remaining_fraction,
            depleted,
        });

        if depleted {
            world.resources.remove(node);
            world.agents.clear_target_everywhere(node);
            world.agents.contexts[i].persistent_target = None;

            tracing::info!(
                "Clay pack {} depleted by agent {}; {} remaining",
                node.0,
                i,
                world.resources.len()
            );
            world.events.push(SimulationEvent::NodeDepleted { node, by: agent });

            world.enter(agent, AgentState::Carrying);
            // Carrying hands over to the depot run within the same tick
            self.check_transitions(world, agent);
        } else {
            let direction = (anchor - node_pos)
                .try_normalize()
                .unwrap_or(DEFAULT_KNOCKBACK_DIRECTION);
            world.agents.positions[i] = anchor;
            world.enter(
                agent,
                AgentState::Knockback {
                    origin: anchor,
                    direction,
                    distance: self.behavior.knockback_distance,
                },
            );
        }
    }

    fn deliver(&self, world: &mut BehaviorWorld, agent: AgentId) {
        let inventory = world.depot.deliver();
        tracing::info!("Agent {} delivered clay; depot holds {}", agent.index(), inventory);
        world.events.push(SimulationEvent::Delivered { agent, inventory });
        world.abandon(agent);
    }
}

/// 1 - (1 - t)^3 with t clamped to [0, 1]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
    1.0 - (1.0 - t).powi(3)
}
