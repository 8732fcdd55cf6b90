//! Tick system - orchestrates colony updates
//!
//! Each tick advances the clock by the caller's delta and then runs the
//! pipeline below over all agents, in index order.

use std::time::Duration;

use crate::behavior::machine::BehaviorWorld;
use crate::core::config::WorldBounds;
use crate::core::types::{AgentId, Vec2};
use crate::simulation::events::SimulationEvent;
use crate::simulation::world::Colony;

/// Run a single simulation tick
///
/// 1. Advance the clock by `dt`
/// 2. Evaluate state transitions for every agent
/// 3. Run per-state behavior for every agent (steering, strikes, knockback)
/// 4. Integrate velocities over `dt` and clamp to the world bounds
/// 5. Resolve agent-agent and agent-obstacle overlaps
/// 6. Advance walk animation bookkeeping
///
/// Returns the events that occurred during this tick.
pub fn run_simulation_tick(colony: &mut Colony, dt: Duration) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    colony.clock.advance(dt);
    let now = colony.clock.now();

    {
        let Colony {
            agents,
            resources,
            depot,
            machine,
            ..
        } = colony;
        let mut world = BehaviorWorld {
            agents,
            resources,
            depot,
            now,
            dt_secs: dt.as_secs_f32(),
            events: &mut events,
        };

        let count = world.agents.count();
        for idx in 0..count {
            machine.check_transitions(&mut world, AgentId::new(idx));
        }
        for idx in 0..count {
            machine.apply_behavior(&mut world, AgentId::new(idx));
        }
    }

    integrate(colony, dt.as_secs_f32());
    resolve_collisions(colony);

    let behavior = &colony.config.behavior;
    colony
        .agents
        .advance_animation(behavior.walk_threshold, behavior.walk_phase_step);

    events
}

/// Run `ticks` ticks of length `dt`, collecting every event
pub fn run_ticks(colony: &mut Colony, ticks: u64, dt: Duration) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(run_simulation_tick(colony, dt));
    }
    events
}

fn integrate(colony: &mut Colony, dt_secs: f32) {
    let radius = colony.collision.agent_radius();
    let bounds = colony.config.bounds;

    for (pos, vel) in colony
        .agents
        .positions
        .iter_mut()
        .zip(colony.agents.velocities.iter())
    {
        if vel.is_finite() {
            *pos += *vel * dt_secs;
        }
        *pos = clamp_to_bounds(*pos, bounds, radius);
    }
}

fn resolve_collisions(colony: &mut Colony) {
    let obstacles = colony.static_obstacles();
    let Colony {
        agents,
        collision,
        rng,
        config,
        ..
    } = colony;

    let pairs = collision.resolve_agent_overlaps(&mut agents.positions, &mut agents.velocities, rng);
    let pushed = collision.resolve_static_overlaps(&mut agents.positions, &mut agents.velocities, &obstacles);
    if pairs + pushed > 0 {
        tracing::trace!("Resolved {} agent overlaps, {} obstacle overlaps", pairs, pushed);
    }

    let radius = collision.agent_radius();
    for pos in agents.positions.iter_mut() {
        *pos = clamp_to_bounds(*pos, config.bounds, radius);
    }
}

/// Keep an agent's whole footprint inside the world rectangle
fn clamp_to_bounds(pos: Vec2, bounds: WorldBounds, radius: f32) -> Vec2 {
    let clamp_axis = |v: f32, extent: f32| {
        let (lo, hi) = (radius, extent - radius);
        if hi > lo {
            v.clamp(lo, hi)
        } else {
            extent / 2.0
        }
    };
    Vec2::new(clamp_axis(pos.x, bounds.width), clamp_axis(pos.y, bounds.height))
}
