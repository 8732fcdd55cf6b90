//! Collision moderation between agents and against static obstacles
//!
//! Overlapping agents are pushed apart along the line between their centers,
//! half the overlap each, and both get a small random velocity nudge so a pair
//! cannot lock into place. Agents overlapping the depot or a clay pack are
//! pushed out of the obstacle footprint.
//!
//! The two `on_*` hooks are what a physics collaborator calls when it reports
//! an overlap; `resolve_agent_overlaps` / `resolve_static_overlaps` are the
//! headless detection passes that call the same hooks. The state machine only
//! looks at distances and never relies on a push succeeding.

use rand::Rng;

use crate::core::config::CollisionConfig;
use crate::core::types::{AgentId, Footprint, Vec2};
use crate::spatial::sparse_hash::SparseHashGrid;

/// Separation axis used when two centers coincide exactly
const DEFAULT_AXIS: Vec2 = Vec2 { x: 1.0, y: 0.0 };

/// An immovable axis-aligned box (depot or clay pack)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticObstacle {
    pub center: Vec2,
    pub footprint: Footprint,
}

impl StaticObstacle {
    pub fn new(center: Vec2, footprint: Footprint) -> Self {
        Self { center, footprint }
    }

    fn min(&self) -> Vec2 {
        Vec2::new(
            self.center.x - self.footprint.width / 2.0,
            self.center.y - self.footprint.height / 2.0,
        )
    }

    fn max(&self) -> Vec2 {
        Vec2::new(
            self.center.x + self.footprint.width / 2.0,
            self.center.y + self.footprint.height / 2.0,
        )
    }

    /// Closest point of the box to `p`
    fn closest_point(&self, p: Vec2) -> Vec2 {
        let (lo, hi) = (self.min(), self.max());
        Vec2::new(p.x.clamp(lo.x, hi.x), p.y.clamp(lo.y, hi.y))
    }
}

pub struct CollisionModerator {
    config: CollisionConfig,
    agent_radius: f32,
    grid: SparseHashGrid,
}

impl CollisionModerator {
    /// `agent_size` is the diameter of an agent's circular footprint
    pub fn new(config: CollisionConfig, agent_size: f32) -> Self {
        Self {
            config,
            agent_radius: agent_size / 2.0,
            grid: SparseHashGrid::new(agent_size),
        }
    }

    pub fn agent_radius(&self) -> f32 {
        self.agent_radius
    }

    /// Hook: two agents were reported overlapping
    ///
    /// Returns false (and changes nothing) if they no longer overlap.
    pub fn on_agent_overlap<R: Rng>(
        &self,
        a: AgentId,
        b: AgentId,
        positions: &mut [Vec2],
        velocities: &mut [Vec2],
        rng: &mut R,
    ) -> bool {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib || ia >= positions.len() || ib >= positions.len() {
            return false;
        }

        let delta = positions[ib] - positions[ia];
        let distance = delta.length();
        let min_distance = self.agent_radius * 2.0;
        if distance >= min_distance {
            return false;
        }

        let axis = delta.try_normalize().unwrap_or(DEFAULT_AXIS);
        let push = axis * ((min_distance - distance) / 2.0);
        positions[ia] -= push;
        positions[ib] += push;

        if let Some(v) = velocities.get_mut(ia) {
            *v += self.jitter(rng);
        }
        if let Some(v) = velocities.get_mut(ib) {
            *v += self.jitter(rng);
        }
        true
    }

    /// Hook: an agent was reported overlapping a static obstacle
    ///
    /// Moves the agent to the obstacle boundary and stops it.
    pub fn on_static_overlap(&self, position: &mut Vec2, velocity: &mut Vec2, obstacle: &StaticObstacle) -> bool {
        let closest = obstacle.closest_point(*position);
        let offset = *position - closest;
        let distance = offset.length();

        if distance >= self.agent_radius {
            return false;
        }

        if let Some(normal) = offset.try_normalize() {
            *position = closest + normal * self.agent_radius;
        } else {
            // Center inside the box: leave through the nearest face
            let (lo, hi) = (obstacle.min(), obstacle.max());
            let exits = [
                (position.x - lo.x, Vec2::new(lo.x - self.agent_radius, position.y)),
                (hi.x - position.x, Vec2::new(hi.x + self.agent_radius, position.y)),
                (position.y - lo.y, Vec2::new(position.x, lo.y - self.agent_radius)),
                (hi.y - position.y, Vec2::new(position.x, hi.y + self.agent_radius)),
            ];
            let mut best = exits[0];
            for exit in &exits[1..] {
                if exit.0 < best.0 {
                    best = *exit;
                }
            }
            *position = best.1;
        }
        *velocity = Vec2::ZERO;
        true
    }

    /// Detection pass over every agent pair; returns the number of pairs pushed apart
    pub fn resolve_agent_overlaps<R: Rng>(
        &mut self,
        positions: &mut [Vec2],
        velocities: &mut [Vec2],
        rng: &mut R,
    ) -> usize {
        self.grid.rebuild(positions);
        let pairs = self.grid.candidate_pairs(positions);

        let mut resolved = 0;
        for (a, b) in pairs {
            if self.on_agent_overlap(a, b, positions, velocities, rng) {
                resolved += 1;
            }
        }
        resolved
    }

    /// Detection pass of every agent against every obstacle
    pub fn resolve_static_overlaps(
        &self,
        positions: &mut [Vec2],
        velocities: &mut [Vec2],
        obstacles: &[StaticObstacle],
    ) -> usize {
        if !self.config.block_static_obstacles {
            return 0;
        }

        let mut resolved = 0;
        for (position, velocity) in positions.iter_mut().zip(velocities.iter_mut()) {
            for obstacle in obstacles {
                if self.on_static_overlap(position, velocity, obstacle) {
                    resolved += 1;
                }
            }
        }
        resolved
    }

    fn jitter<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let j = self.config.velocity_jitter;
        if !j.is_finite() || j <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(rng.gen_range(-j..=j), rng.gen_range(-j..=j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn moderator() -> CollisionModerator {
        CollisionModerator::new(CollisionConfig::default(), 30.0)
    }

    #[test]
    fn test_overlapping_pair_pushed_apart_evenly() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut positions = vec![Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0)];
        let mut velocities = vec![Vec2::ZERO; 2];

        let resolved = moderator().resolve_agent_overlaps(&mut positions, &mut velocities, &mut rng);

        assert_eq!(resolved, 1);
        // Overlap was 10, each moves 5
        assert!((positions[0].x - 95.0).abs() < 1e-4);
        assert!((positions[1].x - 125.0).abs() < 1e-4);
        assert!((positions[0].distance(&positions[1]) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_collision_jitter_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut positions = vec![Vec2::new(100.0, 100.0), Vec2::new(110.0, 100.0)];
        let mut velocities = vec![Vec2::ZERO; 2];

        moderator().resolve_agent_overlaps(&mut positions, &mut velocities, &mut rng);

        for v in &velocities {
            assert!(v.x.abs() <= 5.0 && v.y.abs() <= 5.0);
        }
    }

    #[test]
    fn test_nan_jitter_adds_no_velocity() {
        let config = CollisionConfig { velocity_jitter: f32::NAN, ..CollisionConfig::default() };
        let mut moderator = CollisionModerator::new(config, 30.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut positions = vec![Vec2::new(100.0, 100.0), Vec2::new(110.0, 100.0)];
        let mut velocities = vec![Vec2::ZERO; 2];

        assert_eq!(moderator.resolve_agent_overlaps(&mut positions, &mut velocities, &mut rng), 1);
        assert_eq!(velocities, vec![Vec2::ZERO; 2]);
    }

    #[test]
    fn test_coincident_agents_separate_without_nan() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut positions = vec![Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0)];
        let mut velocities = vec![Vec2::ZERO; 2];

        moderator().resolve_agent_overlaps(&mut positions, &mut velocities, &mut rng);

        assert!(positions.iter().all(|p| p.is_finite()));
        assert!((positions[0].distance(&positions[1]) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_distant_agents_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut positions = vec![Vec2::new(0.0, 0.0), Vec2::new(31.0, 0.0)];
        let mut velocities = vec![Vec2::ZERO; 2];

        let resolved = moderator().resolve_agent_overlaps(&mut positions, &mut velocities, &mut rng);

        assert_eq!(resolved, 0);
        assert_eq!(velocities, vec![Vec2::ZERO; 2]);
    }

    #[test]
    fn test_static_overlap_pushes_out_of_box() {
        let obstacle = StaticObstacle::new(Vec2::new(100.0, 100.0), Footprint::square(40.0));
        let mut pos = Vec2::new(130.0, 100.0); // 10 from the right face, radius 15
        let mut vel = Vec2::new(-50.0, 0.0);

        assert!(moderator().on_static_overlap(&mut pos, &mut vel, &obstacle));
        assert!((pos.x - 135.0).abs() < 1e-4);
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn test_static_overlap_center_inside_box() {
        let obstacle = StaticObstacle::new(Vec2::new(100.0, 100.0), Footprint::square(40.0));
        let mut pos = Vec2::new(115.0, 100.0); // nearest face is x = 120
        let mut vel = Vec2::ZERO;

        assert!(moderator().on_static_overlap(&mut pos, &mut vel, &obstacle));
        assert!((pos.x - 135.0).abs() < 1e-4);
        assert!((pos.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_static_blocking_can_be_disabled() {
        let config = CollisionConfig { block_static_obstacles: false, ..CollisionConfig::default() };
        let moderator = CollisionModerator::new(config, 30.0);
        let obstacles = [StaticObstacle::new(Vec2::new(0.0, 0.0), Footprint::square(40.0))];
        let mut positions = vec![Vec2::new(0.0, 0.0)];
        let mut velocities = vec![Vec2::ZERO];

        assert_eq!(moderator.resolve_static_overlaps(&mut positions, &mut velocities, &obstacles), 0);
        assert_eq!(positions[0], Vec2::new(0.0, 0.0));
    }
}
