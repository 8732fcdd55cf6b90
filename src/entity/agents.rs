//! Worker agents with SoA layout

use std::f32::consts::TAU;

use rand::Rng;

use crate::behavior::state::AgentState;
use crate::core::config::SpeedRange;
use crate::core::types::{AgentId, Millis, ResourceId, Target, Vec2};
use crate::spatial::placement::{Clearance, Placement, SpatialPlacer};

/// Mutable per-agent bookkeeping shared by every state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentContext {
    /// Walk animation phase in [0, 2pi)
    pub animation_phase: f32,
    /// Position at the end of the previous tick
    pub previous_position: Vec2,
    pub target: Option<Target>,
    /// Node to return to after knockback, stun and cooldown
    pub persistent_target: Option<ResourceId>,
    /// Clock time at which the current state was entered
    pub entered_at: Millis,
    pub last_hit_at: Option<Millis>,
    pub facing_right: bool,
}

/// Structure of Arrays for agents
///
/// `AgentId(i)` is index `i` in every array. Agents are created once and
/// never removed, so indices stay stable for the whole run.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    pub ids: Vec<AgentId>,
    pub positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
    pub speeds: Vec<f32>,
    pub states: Vec<AgentState>,
    pub contexts: Vec<AgentContext>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` agents outside the depot exclusion radius
    pub fn create<R: Rng>(
        &mut self,
        count: usize,
        speed: SpeedRange,
        agent_size: f32,
        placer: &SpatialPlacer,
        depot: Vec2,
        spawn_exclusion: f32,
        rng: &mut R,
    ) -> Vec<Placement> {
        let depot_positions = [depot];
        let mut placements = Vec::with_capacity(count);

        for _ in 0..count {
            let placement = placer.place(
                rng,
                agent_size / 2.0,
                &[Clearance::new(&depot_positions, spawn_exclusion)],
            );
            let agent_speed = if speed.max > speed.min {
                rng.gen_range(speed.min..=speed.max)
            } else {
                speed.min
            };
            let phase = rng.gen_range(0.0..TAU);
            self.spawn(placement.position, agent_speed, phase);
            placements.push(placement);
        }

        placements
    }

    /// Add one agent in the Seeking state
    pub fn spawn(&mut self, position: Vec2, speed: f32, animation_phase: f32) -> AgentId {
        let id = AgentId::new(self.ids.len());
        self.ids.push(id);
        self.positions.push(position);
        self.velocities.push(Vec2::ZERO);
        self.speeds.push(speed);
        self.states.push(AgentState::Seeking);
        self.contexts.push(AgentContext {
            animation_phase,
            previous_position: position,
            facing_right: true,
            ..AgentContext::default()
        });
        id
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn all(&self) -> &[AgentId] {
        &self.ids
    }

    pub fn speed(&self, id: AgentId) -> Option<f32> {
        self.speeds.get(id.index()).copied()
    }

    pub fn state(&self, id: AgentId) -> Option<&AgentState> {
        self.states.get(id.index())
    }

    /// Clear `target` on every agent currently heading for `node`
    ///
    /// Persistent targets are left alone; they are re-checked when cooldown ends.
    pub fn clear_target_everywhere(&mut self, node: ResourceId) -> usize {
        let mut cleared = 0;
        for ctx in &mut self.contexts {
            if ctx.target == Some(Target::Node(node)) {
                ctx.target = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Advance walk animation for walking agents that moved this tick
    ///
    /// Knockback and stun wobble also move an agent but keep its phase.
    pub fn advance_animation(&mut self, walk_threshold: f32, walk_phase_step: f32) {
        let agents = self.positions.iter().zip(self.states.iter()).zip(self.contexts.iter_mut());
        for ((pos, state), ctx) in agents {
            if state.kind().is_walking() && pos.distance(&ctx.previous_position) > walk_threshold {
                ctx.animation_phase = (ctx.animation_phase + walk_phase_step).rem_euclid(TAU);
            }
            ctx.previous_position = *pos;
        }
    }
}
