//! World state and the per-tick orchestration
//!
//! `WorldState` owns the grid, the cell list, the player and the enemies.
//! Everything that changes the simulation happens inside `update`.

use std::rc::Rc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, WorldConfig};
use crate::game::constants::creature;
use crate::game::creature::{Creature, Enemy, Player};
use crate::game::spatial::{Grid, GridError};
use crate::game::state::{Cell, CellId, CreatureBody, CreatureId, CreatureSnapshot};
use crate::game::systems::collision::{self, CellAbsorption, CreatureAbsorption};
use crate::game::systems::lifecycle::{self, SpawnClock};
use crate::metrics::WorldMetrics;
use crate::render::{Camera, Renderer};
use crate::util::color::Color;
use crate::util::vec2::Vec2;

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    EnemySpawned { id: CreatureId, name: String, position: Vec2 },
    CellSpawned { id: CellId, position: Vec2 },
    /// Oldest cell removed by the population cap
    CellEvicted { id: CellId },
    CellAbsorbed(CellAbsorption),
    CreatureAbsorbed(CreatureAbsorption),
    EnemyRemoved { id: CreatureId, name: String },
    /// Emitted once, on the tick the player is absorbed
    PlayerDied { score: f32 },
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub id: CreatureId,
    pub name: String,
    pub score: f32,
    pub is_player: bool,
}

/// The simulated world
pub struct WorldState {
    config: WorldConfig,
    world_size: Vec2,
    grid: Grid,
    /// Live cells in insertion order; index 0 is the next to be evicted
    cells: Vec<Cell>,
    player: Player,
    enemies: Vec<Enemy>,
    spawn_clock: SpawnClock,
    next_cell_id: CellId,
    rng: StdRng,
    started: Instant,
    game_over: bool,
    metrics: WorldMetrics,
}

impl WorldState {
    /// Create a `width × height` world with the default configuration
    ///
    /// Degenerate sizes (non-finite or not positive) become 1 rather than
    /// being rejected.
    pub fn init(width: f32, height: f32) -> Self {
        let usable = |v: f32| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        let size = Vec2::new(usable(width), usable(height));
        if size.x != width || size.y != height {
            warn!(
                "World size {}x{} is degenerate, using {}x{}",
                width, height, size.x, size.y
            );
        }
        Self::build(size, WorldConfig::default(), StdRng::from_entropy())
    }

    /// Create a world with an explicit configuration, validating both
    pub fn try_new(width: f32, height: f32, config: WorldConfig) -> Result<Self, ConfigError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidWorldSize { width, height });
        }
        config.validate()?;
        Ok(Self::build(Vec2::new(width, height), config, StdRng::from_entropy()))
    }

    /// Reseed the world's random source (positions, names, colors, headings)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn build(world_size: Vec2, config: WorldConfig, rng: StdRng) -> Self {
        let grid = Grid::new(world_size, config.grid_width, config.grid_height);
        let spawn_clock = SpawnClock::new(config.cell_spawn_interval);
        let player = Player::new(world_size * 0.5);
        let cells = Vec::with_capacity(config.max_cells);

        debug!(
            "World {}x{} with a {}x{} grid",
            world_size.x, world_size.y, config.grid_width, config.grid_height
        );

        Self {
            config,
            world_size,
            grid,
            cells,
            player,
            enemies: Vec::new(),
            spawn_clock,
            next_cell_id: 0,
            rng,
            started: Instant::now(),
            game_over: false,
            metrics: WorldMetrics::default(),
        }
    }

    /// Steer the player toward a screen-space pointer position
    pub fn set_pointer_target(&mut self, screen: Vec2) {
        self.player.target = screen - self.config.viewport() * 0.5;
    }

    /// Advance one tick, timestamped with the seconds elapsed since creation
    pub fn update(&mut self) -> Vec<WorldEvent> {
        let now = self.started.elapsed().as_secs_f64();
        self.update_at(now)
    }

    /// Advance one tick at an explicit timestamp (seconds)
    pub fn update_at(&mut self, now: f64) -> Vec<WorldEvent> {
        let tick_start = Instant::now();
        let mut events = Vec::new();

        if self.enemies.len() < self.config.max_enemies {
            events.push(self.create_enemy());
        }

        self.player.move_step(self.world_size);

        // Taken once, before any enemy moves; every enemy sees the same copy
        let snapshot: Rc<[CreatureSnapshot]> = self
            .enemies
            .iter()
            .map(|e| e.body.snapshot())
            .chain(std::iter::once(self.player.body.snapshot()))
            .collect();

        let grid_size = (self.grid.width(), self.grid.height());
        for enemy in &mut self.enemies {
            let center = enemy.grid_cell(self.world_size, grid_size);
            let window = self.grid.windowed_query(center, self.config.vision_radius);
            enemy.perceive(window, Rc::clone(&snapshot));
            enemy.move_step(self.world_size);
        }

        for enemy in &mut self.enemies {
            let absorbed = collision::absorb_cells(&mut enemy.body, &mut self.cells, &mut self.grid);
            events.extend(absorbed.into_iter().map(WorldEvent::CellAbsorbed));
        }
        let absorbed = collision::absorb_cells(&mut self.player.body, &mut self.cells, &mut self.grid);
        events.extend(absorbed.into_iter().map(WorldEvent::CellAbsorbed));

        let mut bodies: Vec<&mut CreatureBody> = self
            .enemies
            .iter_mut()
            .map(|e| &mut e.body)
            .chain(std::iter::once(&mut self.player.body))
            .collect();
        let absorbed = collision::absorb_creatures(&mut bodies, creature::BASE_SCORE);
        events.extend(absorbed.into_iter().map(WorldEvent::CreatureAbsorbed));

        for i in (0..self.enemies.len()).rev() {
            if !self.enemies[i].is_alive() {
                let enemy = self.enemies.remove(i);
                debug!("Removing dead enemy {}", enemy.body.name);
                events.push(WorldEvent::EnemyRemoved {
                    id: enemy.body.id,
                    name: enemy.body.name,
                });
            }
        }

        if !self.player.is_alive() && !self.game_over {
            self.game_over = true;
            info!("Player died with score {}", self.player.score());
            events.push(WorldEvent::PlayerDied {
                score: self.player.score(),
            });
        }

        for _ in 0..self.config.spawn_attempts_per_tick {
            if let Some(cell) = lifecycle::maybe_spawn(
                now,
                &mut self.spawn_clock,
                self.world_size,
                &mut self.next_cell_id,
                &mut self.rng,
            ) {
                self.admit_cell(cell, &mut events);
            }
        }

        self.metrics.record(&events);
        self.metrics
            .set_population(self.cells.len(), self.enemies.len(), self.player.is_alive());
        self.metrics.record_tick_time(tick_start.elapsed());

        events
    }

    /// Draw the grid, the border, every cell, every enemy, then the player
    pub fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        let offset = camera.offset();
        let (w, h) = (self.world_size.x, self.world_size.y);
        let (grid_w, grid_h) = (self.grid.width(), self.grid.height());

        for x in 1..grid_w {
            let gx = x as f32 * w / grid_w as f32;
            renderer.draw_line(Vec2::new(gx, 0.0), Vec2::new(gx, h), Color::DARK_GRAY, offset);
        }
        for y in 1..grid_h {
            let gy = y as f32 * h / grid_h as f32;
            renderer.draw_line(Vec2::new(0.0, gy), Vec2::new(w, gy), Color::DARK_GRAY, offset);
        }

        let corners = [
            Vec2::ZERO,
            Vec2::new(w, 0.0),
            Vec2::new(w, h),
            Vec2::new(0.0, h),
        ];
        for i in 0..corners.len() {
            let next = corners[(i + 1) % corners.len()];
            renderer.draw_line(corners[i], next, Color::RED, offset);
        }

        if self.config.debug {
            for (coord, count) in self.grid.occupancy() {
                renderer.draw_text(
                    &count.to_string(),
                    self.grid.bucket_center(coord),
                    Color::LIGHT_GRAY,
                    offset,
                );
            }
        }

        for cell in &self.cells {
            renderer.draw_circle(cell.position, cell.radius, Color::CELL, offset);
        }

        for enemy in &self.enemies {
            enemy.render(renderer, camera);
        }

        self.player.render(renderer, camera);
    }

    /// Place a cell directly, bypassing the spawn clock but not the cap
    pub fn insert_cell(&mut self, position: Vec2, score: f32) -> Result<CellId, GridError> {
        let id = self.next_cell_id;
        let cell = Cell::with_score(id, position, score);
        lifecycle::admit(&mut self.cells, &mut self.grid, cell)?;
        self.next_cell_id += 1;
        lifecycle::enforce_cap(&mut self.cells, &mut self.grid, self.config.max_cells);
        Ok(id)
    }

    /// Add an enemy at `position` with the next "Enemy N" name
    pub fn spawn_enemy_at(&mut self, position: Vec2) -> CreatureId {
        self.push_enemy(position).body.id
    }

    fn push_enemy(&mut self, position: Vec2) -> &Enemy {
        let name = format!("Enemy {}", self.enemies.len());
        let enemy = Enemy::spawn(position, name, &mut self.rng);
        info!("Spawned {} at ({:.0}, {:.0})", enemy.body.name, position.x, position.y);
        self.enemies.push(enemy);
        &self.enemies[self.enemies.len() - 1]
    }

    fn create_enemy(&mut self) -> WorldEvent {
        let margin = creature::BASE_RADIUS * 2.0;
        let position = Vec2::new(
            random_between(&mut self.rng, margin, self.world_size.x - margin),
            random_between(&mut self.rng, margin, self.world_size.y - margin),
        );
        let enemy = self.push_enemy(position);
        WorldEvent::EnemySpawned {
            id: enemy.body.id,
            name: enemy.body.name.clone(),
            position,
        }
    }

    fn admit_cell(&mut self, cell: Cell, events: &mut Vec<WorldEvent>) {
        let (id, position) = (cell.id, cell.position);
        if let Err(e) = lifecycle::admit(&mut self.cells, &mut self.grid, cell) {
            warn!("Dropping cell {}: {}", id, e);
            return;
        }
        debug!("Spawned cell {} at ({:.1}, {:.1})", id, position.x, position.y);
        events.push(WorldEvent::CellSpawned { id, position });

        if let Some(evicted) =
            lifecycle::enforce_cap(&mut self.cells, &mut self.grid, self.config.max_cells)
        {
            debug!("Evicted cell {}", evicted.id);
            events.push(WorldEvent::CellEvicted { id: evicted.id });
        }
    }

    /// Every creature ranked by score (descending), ties by name
    ///
    /// Live enemies plus the player, dead or alive.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| (&e.body, false))
            .chain(std::iter::once((&self.player.body, true)))
            .map(|(body, is_player)| LeaderboardEntry {
                rank: 0,
                id: body.id,
                name: body.name.clone(),
                score: body.score,
                is_player,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = (i + 1) as u32;
        }

        entries
    }

    /// Verify that the cell list and the grid agree
    pub fn check_consistency(&self) -> Result<(), GridError> {
        if self.cells.len() > self.config.max_cells {
            return Err(GridError::Inconsistent(format!(
                "{} cells exceed the cap of {}",
                self.cells.len(),
                self.config.max_cells
            )));
        }
        self.grid.check_consistency(&self.cells)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy_mut(&mut self, id: CreatureId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.body.id == id)
    }

    pub fn metrics(&self) -> &WorldMetrics {
        &self.metrics
    }
}

/// Uniform in `[low, high)`, or the midpoint when the range is empty
fn random_between<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        (low + high) * 0.5
    }
}
