//! Creature variants and their shared capability surface
//!
//! `Creature` is what the world and the collision passes see: position,
//! radius, score, alive flag, a bounded movement step, bucket lookup and
//! rendering. The player steers toward the pointer; enemies decide from the
//! perception the world hands them each tick.

use std::rc::Rc;

use rand::Rng;

use crate::game::constants::score_to_speed;
use crate::game::spatial::{bucket_coordinates_for, BucketCoord, VisibilityWindow};
use crate::game::state::{CreatureBody, CreatureSnapshot};
use crate::game::systems::ai::{self, AiState};
use crate::render::{Camera, Renderer};
use crate::util::color::Color;
use crate::util::vec2::Vec2;

/// Capability surface shared by the player and enemies
pub trait Creature {
    fn body(&self) -> &CreatureBody;

    fn body_mut(&mut self) -> &mut CreatureBody;

    /// Advance one tick, staying inside `[0, bounds]`
    fn move_step(&mut self, bounds: Vec2);

    fn position(&self) -> Vec2 {
        self.body().position
    }

    fn radius(&self) -> f32 {
        self.body().radius()
    }

    fn score(&self) -> f32 {
        self.body().score
    }

    fn is_alive(&self) -> bool {
        self.body().alive
    }

    /// Grid bucket the creature currently sits in (may be off-grid at the far edges)
    fn grid_cell(&self, world_size: Vec2, grid_size: (usize, usize)) -> BucketCoord {
        bucket_coordinates_for(self.position(), world_size, grid_size)
    }

    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        let body = self.body();
        if !body.alive {
            return;
        }
        renderer.draw_circle(body.position, body.radius(), body.color, camera.offset());
        renderer.draw_text(&body.name, body.position, Color::WHITE, camera.offset());
    }
}

/// The pointer-steered creature
#[derive(Debug, Clone)]
pub struct Player {
    pub body: CreatureBody,
    /// Steering vector: pointer position relative to the viewport center
    pub target: Vec2,
}

impl Player {
    pub const NAME: &'static str = "Player";

    pub fn new(position: Vec2) -> Self {
        Self {
            body: CreatureBody::new(position, Self::NAME.to_string(), Color::PLAYER),
            target: Vec2::ZERO,
        }
    }
}

impl Creature for Player {
    fn body(&self) -> &CreatureBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut CreatureBody {
        &mut self.body
    }

    fn move_step(&mut self, bounds: Vec2) {
        if !self.body.alive {
            return;
        }
        // The viewport is centered on the player, so the steering vector is
        // also the distance left to the pointer: never overshoot it
        let step = self.target.clamp_length(score_to_speed(self.body.score));
        self.body.position = (self.body.position + step).clamp(Vec2::ZERO, bounds);
    }
}

/// What an enemy knows this tick; repopulated by the world before every move
#[derive(Debug, Clone)]
pub struct Perception {
    /// Cell positions in the buckets around the enemy
    pub window: VisibilityWindow,
    /// (position, score) of every creature, taken before any enemy moved
    pub creatures: Rc<[CreatureSnapshot]>,
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            window: VisibilityWindow::default(),
            creatures: Rc::from(Vec::new()),
        }
    }
}

/// Autonomous creature
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: CreatureBody,
    pub ai: AiState,
    pub perception: Perception,
}

impl Enemy {
    pub fn new(position: Vec2, name: String, color: Color, heading: Vec2) -> Self {
        Self {
            body: CreatureBody::new(position, name, color),
            ai: AiState::new(heading),
            perception: Perception::default(),
        }
    }

    /// Enemy with a random color and wander heading
    pub fn spawn<R: Rng + ?Sized>(position: Vec2, name: String, rng: &mut R) -> Self {
        let heading = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
        Self::new(position, name, Color::random(rng), heading)
    }

    /// Replace last tick's perception
    pub fn perceive(&mut self, window: VisibilityWindow, creatures: Rc<[CreatureSnapshot]>) {
        self.perception = Perception { window, creatures };
    }
}

impl Creature for Enemy {
    fn body(&self) -> &CreatureBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut CreatureBody {
        &mut self.body
    }

    fn move_step(&mut self, bounds: Vec2) {
        if !self.body.alive {
            return;
        }

        let direction = ai::decide(&mut self.ai, &self.body, &self.perception);
        let next = self.body.position + direction * score_to_speed(self.body.score);

        // Bounce the wander heading off the walls
        if next.x < 0.0 || next.x > bounds.x {
            self.ai.heading = self.ai.heading.reflect(Vec2::new(1.0, 0.0));
        }
        if next.y < 0.0 || next.y > bounds.y {
            self.ai.heading = self.ai.heading.reflect(Vec2::new(0.0, 1.0));
        }

        self.body.position = next.clamp(Vec2::ZERO, bounds);
    }
}
