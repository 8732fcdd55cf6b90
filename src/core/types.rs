//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Stable identifier for an agent: its index into the agent arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a resource node (clay pack)
///
/// Ids are handed out once per run and never reused, so a stale id
/// simply stops resolving after the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

impl ResourceId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Simulation time in milliseconds since the colony was created
pub type Millis = u64;

/// Simulation tick counter
pub type Tick = u64;

/// What an agent is currently heading for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// A resource node, which may have been removed since it was chosen
    Node(ResourceId),
    /// The depot (castle), which lives for the whole run
    Depot,
}

impl Target {
    pub fn node(&self) -> Option<ResourceId> {
        match self {
            Target::Node(id) => Some(*id),
            Target::Depot => None,
        }
    }
}

/// Square footprint of a placed entity (world units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn square(size: f32) -> Self {
        Self { width: size, height: size }
    }

    /// Half of the larger side
    pub fn half_extent(&self) -> f32 {
        self.width.max(self.height) / 2.0
    }
}

/// 2D position / direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector, or `None` when the vector is too short to have a direction
    pub fn try_normalize(&self) -> Option<Self> {
        let len = self.length();
        if len > 0.0001 && len.is_finite() {
            Some(Self { x: self.x / len, y: self.y / len })
        } else {
            None
        }
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_index() {
        let id = AgentId::new(7);
        assert_eq!(id.index(), 7);
        assert_eq!(id, AgentId(7));
    }

    #[test]
    fn test_target_node() {
        assert_eq!(Target::Node(ResourceId(3)).node(), Some(ResourceId(3)));
        assert_eq!(Target::Depot.node(), None);
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
        assert!((b.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_try_normalize_zero_vector() {
        assert!(Vec2::ZERO.try_normalize().is_none());
        assert!(Vec2::new(f32::NAN, 1.0).try_normalize().is_none());

        let unit = Vec2::new(10.0, 0.0).try_normalize().unwrap();
        assert_eq!(unit, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_footprint_half_extent() {
        assert_eq!(Footprint::square(45.0).half_extent(), 22.5);
        assert_eq!(Footprint::new(20.0, 60.0).half_extent(), 30.0);
    }

    #[test]
    fn test_midpoint() {
        let m = Vec2::new(0.0, 0.0).midpoint(&Vec2::new(10.0, -4.0));
        assert_eq!(m, Vec2::new(5.0, -2.0));
    }
}
