//! Simulation counters
//!
//! Fed from the events of every tick. Exported in Prometheus text format or
//! as JSON for whoever drives the world.

use std::time::Duration;

use serde::Serialize;

use crate::game::world::WorldEvent;

/// Counters for one world
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldMetrics {
    pub ticks: u64,

    // Cells
    pub cells_spawned: u64,
    pub cells_evicted: u64,
    pub cells_absorbed: u64,
    pub cell_count: u64,

    // Creatures
    pub enemies_spawned: u64,
    pub enemies_removed: u64,
    pub creatures_absorbed: u64,
    pub enemy_count: u64,
    pub player_alive: bool,

    // Tick timing (microseconds)
    pub tick_time_us: u64,
    pub tick_time_max_us: u64,
}

impl WorldMetrics {
    /// Count one tick's events
    pub fn record(&mut self, events: &[WorldEvent]) {
        self.ticks += 1;

        for event in events {
            match event {
                WorldEvent::EnemySpawned { .. } => self.enemies_spawned += 1,
                WorldEvent::CellSpawned { .. } => self.cells_spawned += 1,
                WorldEvent::CellEvicted { .. } => self.cells_evicted += 1,
                WorldEvent::CellAbsorbed(_) => self.cells_absorbed += 1,
                WorldEvent::CreatureAbsorbed(_) => self.creatures_absorbed += 1,
                WorldEvent::EnemyRemoved { .. } => self.enemies_removed += 1,
                WorldEvent::PlayerDied { .. } => self.player_alive = false,
            }
        }
    }

    pub fn set_population(&mut self, cells: usize, enemies: usize, player_alive: bool) {
        self.cell_count = cells as u64;
        self.enemy_count = enemies as u64;
        self.player_alive = player_alive;
    }

    pub fn record_tick_time(&mut self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.tick_time_us = us;
        self.tick_time_max_us = self.tick_time_max_us.max(us);
    }

    /// Generate Prometheus-format metrics output
    pub fn to_prometheus(&self) -> String {
        let mut output = String::with_capacity(2048);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        metric!("cell_arena_ticks_total", "Total ticks simulated", "counter", self.ticks);

        metric!("cell_arena_cells", "Live cells", "gauge", self.cell_count);
        metric!("cell_arena_cells_spawned_total", "Cells spawned", "counter", self.cells_spawned);
        metric!("cell_arena_cells_evicted_total", "Cells evicted by the population cap", "counter",
            self.cells_evicted);
        metric!("cell_arena_cells_absorbed_total", "Cells absorbed by creatures", "counter",
            self.cells_absorbed);

        metric!("cell_arena_enemies", "Live enemies", "gauge", self.enemy_count);
        metric!("cell_arena_enemies_spawned_total", "Enemies spawned", "counter", self.enemies_spawned);
        metric!("cell_arena_enemies_removed_total", "Dead enemies removed", "counter",
            self.enemies_removed);
        metric!("cell_arena_creatures_absorbed_total", "Creatures absorbed by other creatures",
            "counter", self.creatures_absorbed);
        metric!("cell_arena_player_alive", "1 while the player is alive", "gauge",
            u8::from(self.player_alive));

        metric!("cell_arena_tick_time_microseconds", "Last tick time in microseconds", "gauge",
            self.tick_time_us);
        metric!("cell_arena_tick_time_max_microseconds", "Maximum tick time", "gauge",
            self.tick_time_max_us);

        output
    }

    /// Generate JSON metrics output
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
