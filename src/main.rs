use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cell_arena::config::{RunConfig, WorldConfig};
use cell_arena::game::creature::Creature;
use cell_arena::game::world::{WorldEvent, WorldState};
use cell_arena::render::{Camera, DrawList};
use cell_arena::util::vec2::Vec2;

/// Radius of the scripted pointer orbit, in screen pixels
const POINTER_ORBIT: f32 = 150.0;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Cell Arena v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let run = RunConfig::load_or_default();
    run.validate().context("invalid run configuration")?;
    let config = WorldConfig::load_or_default();
    info!(
        "Configuration loaded: world {}x{}, grid {}x{}, {} Hz, max_ticks={}",
        run.world_width, run.world_height, config.grid_width, config.grid_height, run.tick_rate,
        run.max_ticks
    );

    let mut world = WorldState::try_new(run.world_width, run.world_height, config)
        .context("failed to create world")?;
    if let Some(seed) = run.seed {
        info!("Using seed {}", seed);
        world = world.with_seed(seed);
    }

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(run.tick_rate));
    let viewport = config.viewport();
    let mut camera = Camera::default();
    let mut frame = DrawList::new();

    for tick in 0..run.max_ticks {
        let tick_start = Instant::now();

        // Scripted input: the pointer circles the viewport center
        let angle = tick as f32 * 0.02;
        world.set_pointer_target(viewport * 0.5 + Vec2::from_angle(angle) * POINTER_ORBIT);

        let events = world.update();
        for event in &events {
            if let WorldEvent::CreatureAbsorbed(absorption) = event {
                debug!(
                    "{} absorbed {} (+{})",
                    absorption.predator_id, absorption.prey_id, absorption.score
                );
            }
        }

        camera.follow(world.player().position(), viewport);
        frame.clear();
        world.render(&mut frame, &camera);

        if tick % u64::from(run.tick_rate) == 0 {
            info!(
                "tick {}: player score {:.1}, {} cells, {} enemies, {} draw calls",
                tick,
                world.player().score(),
                world.cells().len(),
                world.enemies().len(),
                frame.len()
            );
        }

        if world.is_game_over() {
            info!("Game over after {} ticks", tick + 1);
            break;
        }

        // Maintain tick rate
        let elapsed = tick_start.elapsed();
        if elapsed < tick_duration {
            std::thread::sleep(tick_duration - elapsed);
        }
    }

    world
        .check_consistency()
        .context("world ended in an inconsistent state")?;

    let stats = world.grid().stats();
    info!(
        "Grid: {} cells in {} buckets, at most {} per bucket",
        stats.total_cells, stats.non_empty_buckets, stats.max_per_bucket
    );

    info!("Leaderboard:");
    for entry in world.leaderboard() {
        info!("  #{} {} ({:.1})", entry.rank, entry.name, entry.score);
    }

    println!("{}", world.metrics().to_json());

    Ok(())
}
