//! Sparse hash grid for agent neighbor queries

use ahash::AHashMap;

use crate::core::types::{AgentId, Vec2};

/// Sparse hash grid for O(1) neighbor queries
///
/// With `cell_size` at least the interaction distance, every pair closer than
/// that distance shares a cell or sits in adjacent cells.
pub struct SparseHashGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<AgentId>>,
}

impl SparseHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, agent: AgentId, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(agent);
    }

    /// Query all agents in neighboring cells (3x3 neighborhood)
    pub fn query_neighbors(&self, pos: Vec2) -> impl Iterator<Item = AgentId> + '_ {
        let (cx, cy) = self.cell_coord(pos);

        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                self.cells.get(&(cx + dx, cy + dy))
                    .into_iter()
                    .flatten()
                    .copied()
            })
        })
    }

    /// Unordered candidate pairs `(a, b)` with `a < b`, sorted by index
    ///
    /// Candidates are only "close enough to check"; callers still test distance.
    pub fn candidate_pairs(&self, positions: &[Vec2]) -> Vec<(AgentId, AgentId)> {
        let mut pairs = Vec::new();
        for (idx, pos) in positions.iter().enumerate() {
            let a = AgentId::new(idx);
            for b in self.query_neighbors(*pos) {
                if b > a {
                    pairs.push((a, b));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }

    /// Rebuild grid from positions
    pub fn rebuild(&mut self, positions: &[Vec2]) {
        self.clear();
        for (idx, pos) in positions.iter().enumerate() {
            self.insert(AgentId::new(idx), *pos);
        }
    }
}
