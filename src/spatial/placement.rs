//! Rejection-sampling placement of depot, clay packs and agent spawns
//!
//! The placer draws uniform candidates inside the world (inset by half the
//! footprint plus a margin) and keeps the first one that clears every
//! constraint. When the attempt budget runs out it returns the last candidate
//! anyway and flags the result as exhausted: placement always terminates, and
//! an overlap in that case is a soft condition rather than an error.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{SpacingConfig, WorldBounds};
use crate::core::types::Vec2;

/// Existing positions a candidate must stay at least `min_distance` away from
#[derive(Debug, Clone, Copy)]
pub struct Clearance<'a> {
    pub positions: &'a [Vec2],
    pub min_distance: f32,
}

impl<'a> Clearance<'a> {
    pub fn new(positions: &'a [Vec2], min_distance: f32) -> Self {
        Self { positions, min_distance }
    }

    fn admits(&self, candidate: Vec2) -> bool {
        self.positions
            .iter()
            .all(|p| candidate.distance(p) >= self.min_distance)
    }
}

/// Result of one placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec2,
    /// Candidates drawn, including the accepted one
    pub attempts: u32,
    /// No candidate satisfied the constraints; `position` is the last draw
    pub exhausted: bool,
}

#[derive(Debug, Clone)]
pub struct SpatialPlacer {
    bounds: WorldBounds,
    margin: f32,
    max_attempts: u32,
}

impl SpatialPlacer {
    pub fn new(bounds: WorldBounds, margin: f32, max_attempts: u32) -> Self {
        Self {
            bounds,
            margin,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_spacing(bounds: WorldBounds, spacing: &SpacingConfig) -> Self {
        Self::new(bounds, spacing.placement_margin, spacing.placement_attempts)
    }

    /// Center of the world rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.bounds.width / 2.0, self.bounds.height / 2.0)
    }

    /// Find a position for a footprint with the given half extent
    pub fn place<R: Rng>(&self, rng: &mut R, half_extent: f32, clearances: &[Clearance]) -> Placement {
        let inset = half_extent + self.margin;
        let mut candidate = self.center();

        for attempt in 1..=self.max_attempts {
            candidate = Vec2::new(
                sample_axis(rng, inset, self.bounds.width - inset),
                sample_axis(rng, inset, self.bounds.height - inset),
            );
            if clearances.iter().all(|c| c.admits(candidate)) {
                return Placement {
                    position: candidate,
                    attempts: attempt,
                    exhausted: false,
                };
            }
        }

        tracing::warn!(
            "Placement exhausted {} attempts; accepting overlapping position ({:.1}, {:.1})",
            self.max_attempts,
            candidate.x,
            candidate.y
        );
        Placement {
            position: candidate,
            attempts: self.max_attempts,
            exhausted: true,
        }
    }
}

/// Uniform draw in [lo, hi]; a degenerate range collapses to its midpoint
fn sample_axis<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        (lo + hi) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn placer() -> SpatialPlacer {
        SpatialPlacer::new(WorldBounds { width: 800.0, height: 600.0 }, 20.0, 100)
    }

    #[test]
    fn test_place_respects_inset() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let placer = placer();
        for _ in 0..200 {
            let p = placer.place(&mut rng, 25.0, &[]);
            assert!(!p.exhausted);
            assert_eq!(p.attempts, 1);
            assert!(p.position.x >= 45.0 && p.position.x <= 755.0);
            assert!(p.position.y >= 45.0 && p.position.y <= 555.0);
        }
    }

    #[test]
    fn test_place_keeps_clearance() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let placer = placer();
        let depot = [placer.center()];
        let mut placed: Vec<Vec2> = Vec::new();

        for _ in 0..6 {
            let p = placer.place(
                &mut rng,
                22.5,
                &[Clearance::new(&depot, 150.0), Clearance::new(&placed, 100.0)],
            );
            assert!(!p.exhausted);
            assert!(p.position.distance(&depot[0]) >= 150.0);
            for other in &placed {
                assert!(p.position.distance(other) >= 100.0);
            }
            placed.push(p.position);
        }
    }

    #[test]
    fn test_impossible_constraint_falls_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let placer = SpatialPlacer::new(WorldBounds { width: 200.0, height: 200.0 }, 10.0, 100);
        let center = [placer.center()];

        // Nothing in a 200x200 world is 1000 units from its center
        let p = placer.place(&mut rng, 10.0, &[Clearance::new(&center, 1000.0)]);
        assert!(p.exhausted);
        assert_eq!(p.attempts, 100);
        assert!(p.position.x >= 20.0 && p.position.x <= 180.0);
    }

    #[test]
    fn test_same_seed_same_positions() {
        let placer = placer();
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        assert_eq!(placer.place(&mut a, 10.0, &[]), placer.place(&mut b, 10.0, &[]));
    }

    #[test]
    fn test_footprint_wider_than_world_uses_center() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let placer = SpatialPlacer::new(WorldBounds { width: 50.0, height: 50.0 }, 20.0, 5);
        let p = placer.place(&mut rng, 40.0, &[]);
        assert_eq!(p.position, Vec2::new(25.0, 25.0));
    }
}
