/// Creature (player and enemy) constants
pub mod creature {
    /// Radius of a creature holding `BASE_SCORE`
    pub const BASE_RADIUS: f32 = 10.0;
    /// Starting score, and the "too close to call" margin for creature absorption
    pub const BASE_SCORE: f32 = 5.0;
    /// Distance covered per tick by a creature holding `BASE_SCORE`
    pub const BASE_SPEED: f32 = 4.0;
    /// Slowest a creature ever gets, regardless of score
    pub const MIN_SPEED: f32 = 0.75;
}

/// Collectible cell constants
pub mod cell {
    /// Radius of every cell
    pub const BASE_RADIUS: f32 = 4.0;
    /// Score granted to whatever absorbs a cell
    pub const SCORE: f32 = 1.0;
}

/// World defaults (all overridable through `WorldConfig`)
pub mod world {
    /// Minimum time between two accepted cell spawns (seconds)
    pub const CELL_SPAWN_INTERVAL: f64 = 0.2;
    /// Cell population cap; reaching it evicts the oldest cell
    pub const MAX_CELLS: usize = 100;
    /// Spawn attempts per tick (each still gated by `CELL_SPAWN_INTERVAL`)
    pub const SPAWN_ATTEMPTS_PER_TICK: usize = 2;
    /// Grid buckets along each axis
    pub const GRID_SIZE: usize = 10;
    /// Target enemy count, refilled one per tick
    pub const MAX_ENEMIES: usize = 5;
    /// Enemy visibility window radius in buckets
    pub const VISION_RADIUS: usize = 10;
    /// Viewport used to translate pointer positions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
}

/// Enemy decision constants
pub mod ai {
    /// Distance within which an enemy reacts to another creature
    pub const AGGRESSION_RADIUS: f32 = 250.0;
}

/// Calculate radius from score: area grows linearly with score
#[inline]
pub fn score_to_radius(score: f32) -> f32 {
    creature::BASE_RADIUS * (score.max(0.0) / creature::BASE_SCORE).sqrt()
}

/// Calculate per-tick speed from score
/// Returns `BASE_SPEED` at `BASE_SCORE`, slower for larger creatures (sqrt curve)
#[inline]
pub fn score_to_speed(score: f32) -> f32 {
    let ratio = creature::BASE_SCORE / score.max(creature::BASE_SCORE);
    (creature::BASE_SPEED * ratio.sqrt()).max(creature::MIN_SPEED)
}
