//! Entity definitions shared by the grid, the lifecycle and the collision passes
//!
//! Cells are plain data owned by the world's cell list. Creatures share a
//! `CreatureBody` carrying everything the collision passes read and mutate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::constants::{cell, creature, score_to_radius};
use crate::util::color::Color;
use crate::util::vec2::Vec2;

/// Cell identifier (monotonically increasing, never reused)
pub type CellId = u64;

/// Unique creature identifier
pub type CreatureId = Uuid;

/// Stationary collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub position: Vec2,
    pub radius: f32,
    pub score: f32,
}

impl Cell {
    pub fn new(id: CellId, position: Vec2) -> Self {
        Self::with_score(id, position, cell::SCORE)
    }

    pub fn with_score(id: CellId, position: Vec2, score: f32) -> Self {
        Self {
            id,
            position,
            radius: cell::BASE_RADIUS,
            score,
        }
    }
}

/// State common to every creature variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureBody {
    /// Position in world space
    pub position: Vec2,
    /// Growth metric; determines radius and absorption outcome
    pub score: f32,
    /// Cleared once, when the creature is absorbed
    pub alive: bool,

    pub id: CreatureId,
    pub name: String,
    pub color: Color,
}

impl CreatureBody {
    pub fn new(position: Vec2, name: String, color: Color) -> Self {
        Self {
            position,
            score: creature::BASE_SCORE,
            alive: true,
            id: Uuid::new_v4(),
            name,
            color,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Collision radius derived from score
    pub fn radius(&self) -> f32 {
        score_to_radius(self.score)
    }

    pub fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            position: self.position,
            score: self.score,
            alive: self.alive,
        }
    }
}

/// Copy of a creature's (position, score) taken once per tick for enemy perception
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureSnapshot {
    pub id: CreatureId,
    pub position: Vec2,
    pub score: f32,
    pub alive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_new() {
        let cell = Cell::new(3, Vec2::new(5.0, 5.0));
        assert_eq!(cell.id, 3);
        assert_eq!(cell.score, cell::SCORE);
        assert_eq!(cell.radius, cell::BASE_RADIUS);
    }

    #[test]
    fn test_body_starts_alive_with_base_score() {
        let body = CreatureBody::new(Vec2::ZERO, "Test".to_string(), Color::WHITE);
        assert!(body.alive);
        assert_eq!(body.score, creature::BASE_SCORE);
        assert!((body.radius() - creature::BASE_RADIUS).abs() < 0.001);
    }

    #[test]
    fn test_radius_follows_score() {
        let small = CreatureBody::new(Vec2::ZERO, "a".to_string(), Color::WHITE);
        let big = small.clone().with_score(80.0);
        assert!(big.radius() > small.radius());
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut body = CreatureBody::new(Vec2::new(1.0, 2.0), "a".to_string(), Color::WHITE);
        let snap = body.snapshot();
        body.position = Vec2::new(50.0, 50.0);
        body.score = 99.0;
        assert_eq!(snap.position, Vec2::new(1.0, 2.0));
        assert_eq!(snap.score, creature::BASE_SCORE);
        assert_eq!(snap.id, body.id);
    }

    #[test]
    fn test_body_serialization() {
        let body = CreatureBody::new(Vec2::new(1.0, 2.0), "Enemy 0".to_string(), Color::RED);
        let json = serde_json::to_string(&body).unwrap();
        let back: CreatureBody = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, body.id);
        assert_eq!(back.name, "Enemy 0");
    }
}
