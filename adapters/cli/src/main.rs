#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that builds and inspects Outpost world maps.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use outpost_level::Level;
use outpost_system_terrain::{GenerationConfig, PerlinHeight, RngStream};
use outpost_world::{query, Map};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Parser)]
#[command(name = "outpost", about = "Outpost world map tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generates a procedural map and prints a terrain census.
    Generate {
        /// Map width in cells.
        #[arg(long, default_value_t = 256)]
        width: u32,
        /// Map height in cells.
        #[arg(long, default_value_t = 256)]
        height: u32,
        /// World seed driving the noise source and the resource rolls.
        #[arg(long, default_value_t = 0)]
        seed: u32,
    },
    /// Loads a binary level file and reports its obstacle layout.
    Level {
        /// Path to the level file.
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Generate {
            width,
            height,
            seed,
        } => generate(width, height, seed),
        Command::Level { path } => inspect_level(&path),
    }
}

fn generate(width: u32, height: u32, seed: u32) -> anyhow::Result<()> {
    let mut map = Map::new(width, height)
        .with_context(|| format!("creating a {width}x{height} map"))?;
    let noise = PerlinHeight::new(seed, GenerationConfig::default());
    let mut rolls = RngStream::new(ChaCha8Rng::seed_from_u64(u64::from(seed)));
    map.generate(&noise, &mut rolls);
    map.rebuild_traversability();

    let census = query::census(&map);
    println!("generated {width}x{height} map from seed {seed}");
    println!(
        "terrain: {} grass, {} water",
        census.grass, census.water
    );
    println!(
        "resources: {} wood, {} gold, {} stone, {} food",
        census.wood, census.gold, census.stone, census.food
    );
    report_blocked(&map);
    Ok(())
}

fn inspect_level(path: &Path) -> anyhow::Result<()> {
    let level =
        Level::load(path).with_context(|| format!("loading level {}", path.display()))?;
    let start = level.start();
    let end = level.end();
    let mask = level.mask();

    let mut map = Map::new(mask.width(), mask.height())
        .with_context(|| "creating the level map")?;
    map.apply_obstacle_mask(mask)
        .with_context(|| "seeding the map from the level mask")?;
    map.rebuild_traversability();

    println!("level {}", path.display());
    println!("start ({}, {}), end ({}, {})", start.x(), start.y(), end.x(), end.y());
    println!("obstacles: {} of {} cells", mask.marked_count(), mask.cells().len());
    report_blocked(&map);
    Ok(())
}

fn report_blocked(map: &Map) {
    let handle = map.traversability();
    if let Some(view) = handle.view() {
        let blocked = view.iter().filter(|&flag| flag).count();
        println!("traversability: {} of {} cells blocked", blocked, map.cells().len());
    }
}
