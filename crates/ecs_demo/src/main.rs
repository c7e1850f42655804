//! # ecs_demo
//!
//! A small top-down scene driven by the ECS: a player steering along a
//! figure eight, a patrolling enemy, a coin, a short-lived projectile and a
//! tree. Everything is reported through `tracing`; set `RUST_LOG` to see
//! more or less.

mod components;
mod scene;
mod systems;
mod tick;

use anyhow::Result;
use clap::Parser;
use ecs_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use systems::{Collision, Expiry, Render, Vitals};
use tick::{TickConfig, TickLoop};

#[derive(Parser)]
#[command(name = "ecs_demo", about = "Runs the ECS demo scene")]
struct Args {
    /// Target frames per second
    #[arg(short, long, default_value_t = 60.0)]
    tick_rate: f64,

    /// Number of frames to run (0 = run until interrupted)
    #[arg(short, long, default_value_t = 300)]
    max_ticks: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ecs_demo=info".parse()?))
        .init();

    let args = Args::parse();
    let config = TickConfig {
        tick_rate: args.tick_rate,
        max_ticks: args.max_ticks,
    };
    if !(config.tick_rate.is_finite() && config.tick_rate > 0.0) {
        anyhow::bail!("tick rate must be a positive number, got {}", config.tick_rate);
    }

    let mut world = World::new();
    scene::register_components(&mut world);
    systems::register_all(&mut world);
    let spawned = scene::populate(&mut world);

    let mut tick_loop = TickLoop::new(config, world);
    tick_loop.run();

    let world = tick_loop.into_world();
    let survivors = spawned
        .entities()
        .iter()
        .filter(|&&entity| world.is_alive(entity))
        .count();
    info!(
        entities = world.living_entity_count(),
        survivors,
        frames = world.ticks(),
        renders = world.system::<Render>().map_or(0, Render::reports),
        deaths = world.system::<Vitals>().map_or(0, Vitals::deaths),
        expired = world.system::<Expiry>().map_or(0, Expiry::expired),
        hits = world.system::<Collision>().map_or(0, Collision::hits),
        score = world.system::<Collision>().map_or(0, Collision::score),
        "simulation complete"
    );
    Ok(())
}
