//! Cell lifecycle: rate-limited spawning and population cap
//!
//! Spawning is gated by time, the cap by count. Absorption can clear many
//! cells in one tick; they come back at most one per interval.

use rand::Rng;

use crate::game::spatial::{Grid, GridError};
use crate::game::state::{Cell, CellId};
use crate::util::vec2::Vec2;

/// Tracks the last accepted spawn and enforces the minimum interval between spawns
#[derive(Debug, Clone)]
pub struct SpawnClock {
    /// Minimum seconds between two accepted spawns
    interval: f64,
    /// Time of the last accepted spawn (`None` until the first one)
    last_spawn: Option<f64>,
}

impl SpawnClock {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_spawn: None,
        }
    }

    /// Whether a spawn at `now` would be accepted
    #[inline]
    pub fn is_ready(&self, now: f64) -> bool {
        self.last_spawn.map_or(true, |last| now - last > self.interval)
    }

    /// Accept a spawn at `now` if the interval has strictly elapsed, advancing the clock
    pub fn try_acquire(&mut self, now: f64) -> bool {
        if self.is_ready(now) {
            self.last_spawn = Some(now);
            true
        } else {
            false
        }
    }
}

/// Spawn at most one cell, uniformly placed over `[0, world_size)`
///
/// Returns `None` when called again within the spawn interval. `next_id` is
/// only consumed when a cell is produced.
pub fn maybe_spawn<R: Rng + ?Sized>(
    now: f64,
    clock: &mut SpawnClock,
    world_size: Vec2,
    next_id: &mut CellId,
    rng: &mut R,
) -> Option<Cell> {
    if !clock.try_acquire(now) {
        return None;
    }

    let position = Vec2::new(
        rng.gen_range(0.0..world_size.x),
        rng.gen_range(0.0..world_size.y),
    );

    let id = *next_id;
    *next_id += 1;

    Some(Cell::new(id, position))
}

/// Register a new cell in both the grid and the (insertion-ordered) cell list
///
/// The grid is written first so a refused insertion leaves both untouched.
pub fn admit(cells: &mut Vec<Cell>, grid: &mut Grid, cell: Cell) -> Result<(), GridError> {
    grid.insert(&cell)?;
    cells.push(cell);
    Ok(())
}

/// Remove the cell at `index` from the list and its bucket
pub fn remove_at(cells: &mut Vec<Cell>, grid: &mut Grid, index: usize) -> Cell {
    let cell = cells.remove(index);
    if !grid.remove(&cell) {
        tracing::warn!("Cell {} was missing from its grid bucket", cell.id);
    }
    cell
}

/// Evict the oldest cell once the list has reached `max_cells`
///
/// Strict FIFO: index 0 is the earliest surviving insertion.
pub fn enforce_cap(cells: &mut Vec<Cell>, grid: &mut Grid, max_cells: usize) -> Option<Cell> {
    if cells.is_empty() || cells.len() < max_cells {
        return None;
    }
    Some(remove_at(cells, grid, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> Vec2 {
        Vec2::new(100.0, 100.0)
    }

    fn grid() -> Grid {
        Grid::new(world(), 10, 10)
    }

    #[test]
    fn test_first_spawn_always_accepted() {
        let mut clock = SpawnClock::new(0.2);
        assert!(clock.is_ready(0.0));
        assert!(clock.try_acquire(0.0));
        assert!(!clock.is_ready(0.1));
        assert!(clock.is_ready(0.3));
    }

    #[test]
    fn test_interval_is_strict() {
        let mut clock = SpawnClock::new(0.25);
        assert!(clock.try_acquire(1.0));
        assert!(!clock.try_acquire(1.25)); // exactly the interval: rejected
        assert!(clock.try_acquire(1.3));
    }

    #[test]
    fn test_repeated_calls_within_interval_are_noops() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut clock = SpawnClock::new(0.2);
        let mut next_id = 0;

        let first = maybe_spawn(10.0, &mut clock, world(), &mut next_id, &mut rng);
        assert!(first.is_some());

        for _ in 0..50 {
            assert!(maybe_spawn(10.1, &mut clock, world(), &mut next_id, &mut rng).is_none());
        }
        assert_eq!(next_id, 1, "rejected attempts must not consume ids");
        // The clock still counts from the accepted spawn
        assert!(clock.is_ready(10.25));
    }

    #[test]
    fn test_spawn_throttling_over_many_attempts() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut clock = SpawnClock::new(0.2);
        let mut next_id = 0;
        let mut accepted = Vec::new();

        let mut now = 0.0;
        for _ in 0..2000 {
            now += rng.gen_range(0.0..0.05);
            // Several attempts per timestamp, like the per-tick loop
            for _ in 0..3 {
                if maybe_spawn(now, &mut clock, world(), &mut next_id, &mut rng).is_some() {
                    accepted.push(now);
                }
            }
        }

        assert!(accepted.len() > 10);
        for pair in accepted.windows(2) {
            assert!(pair[1] - pair[0] > 0.2, "spawns at {} and {} too close", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_spawn_position_within_world() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut clock = SpawnClock::new(0.0);
        let mut next_id = 0;

        for i in 0..500 {
            let cell = maybe_spawn(i as f64, &mut clock, world(), &mut next_id, &mut rng).unwrap();
            assert!(cell.position.x >= 0.0 && cell.position.x < 100.0);
            assert!(cell.position.y >= 0.0 && cell.position.y < 100.0);
            assert_eq!(cell.id, i as CellId);
        }
    }

    #[test]
    fn test_admit_refuses_off_grid() {
        let mut cells = Vec::new();
        let mut grid = grid();

        assert!(admit(&mut cells, &mut grid, Cell::new(1, Vec2::new(5.0, 5.0))).is_ok());
        assert!(admit(&mut cells, &mut grid, Cell::new(2, Vec2::new(150.0, 5.0))).is_err());

        assert_eq!(cells.len(), 1);
        assert!(grid.check_consistency(&cells).is_ok());
    }

    #[test]
    fn test_enforce_cap_evicts_oldest() {
        let mut cells = Vec::new();
        let mut grid = grid();
        for i in 0..5 {
            admit(&mut cells, &mut grid, Cell::new(i, Vec2::new(10.0 * i as f32 + 1.0, 50.0))).unwrap();
        }

        // Below the cap: nothing happens
        assert!(enforce_cap(&mut cells, &mut grid, 6).is_none());
        assert_eq!(cells.len(), 5);

        // At the cap: index 0 goes
        let evicted = enforce_cap(&mut cells, &mut grid, 5).unwrap();
        assert_eq!(evicted.id, 0);
        assert_eq!(cells.first().map(|c| c.id), Some(1));
        assert!(grid.check_consistency(&cells).is_ok());
    }

    #[test]
    fn test_cap_is_fifo_not_lru() {
        let mut cells = Vec::new();
        let mut grid = grid();
        for i in 0..4 {
            admit(&mut cells, &mut grid, Cell::new(i, Vec2::new(5.0, 5.0 + i as f32))).unwrap();
        }

        // Absorb cell 0; the oldest survivor is now cell 1
        remove_at(&mut cells, &mut grid, 0);
        admit(&mut cells, &mut grid, Cell::new(10, Vec2::new(50.0, 50.0))).unwrap();

        let evicted = enforce_cap(&mut cells, &mut grid, 4).unwrap();
        assert_eq!(evicted.id, 1);
    }

    #[test]
    fn test_cap_invariant_under_many_spawns() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut clock = SpawnClock::new(0.0);
        let mut cells = Vec::new();
        let mut grid = grid();
        let mut next_id = 0;
        let max_cells = 20;

        for i in 0..500 {
            if let Some(cell) = maybe_spawn(i as f64, &mut clock, world(), &mut next_id, &mut rng) {
                admit(&mut cells, &mut grid, cell).unwrap();
                let oldest = cells[0].id;
                if let Some(evicted) = enforce_cap(&mut cells, &mut grid, max_cells) {
                    assert_eq!(evicted.id, oldest);
                }
            }
            assert!(cells.len() <= max_cells);
        }
        assert!(grid.check_consistency(&cells).is_ok());
    }

    #[test]
    fn test_enforce_cap_on_empty_list() {
        let mut cells = Vec::new();
        let mut grid = grid();
        assert!(enforce_cap(&mut cells, &mut grid, 0).is_none());
    }
}
