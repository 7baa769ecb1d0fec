//! Spriteforge command line entry point.
//!
//! Loads a JSON scene, converts its authored sprite renderers into ECS render
//! components and prints a summary of what was created.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- assets/scenes/demo.json --reloads 2
//! ```
//!
//! `--reloads N` simulates N editor reloads after the first conversion. Each
//! reload destroys the runtime material instances and converts the scene
//! again, which exercises the override cache's stale-entry repair.

use std::path::PathBuf;

use clap::Parser;
use spriteforge::pipeline;
use spriteforge::resources::conversionconfig::ConversionConfig;
use spriteforge::resources::conversionstats::ConversionStats;
use spriteforge::resources::materialstore::{MaterialOverrides, MaterialStore};
use spriteforge::resources::renderarchetypes::RenderArchetypes;
use spriteforge::scene::SceneDescription;

/// Sprite authoring conversion
#[derive(Parser)]
#[command(version, about = "Converts authored sprite scenes into ECS render components")]
struct Cli {
    /// Scene description (JSON).
    scene: PathBuf,

    /// Configuration file (default: ./spriteforge.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of editor reloads to simulate after the first conversion.
    #[arg(long, default_value_t = 0)]
    reloads: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => ConversionConfig::with_path(path),
        None => ConversionConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    let pixels_per_unit = config.pixels_per_unit;

    let scene = match SceneDescription::load(&cli.scene) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to load {}: {}", cli.scene.display(), e);
            std::process::exit(1);
        }
    };

    let mut world = pipeline::init_world(config);
    if let Err(e) = scene.spawn_into(&mut world, pixels_per_unit) {
        log::error!("Invalid scene {}: {}", cli.scene.display(), e);
        std::process::exit(1);
    }

    let mut schedule = pipeline::conversion_schedule();
    schedule.run(&mut world);

    for i in 0..cli.reloads {
        log::info!("Simulating editor reload {}/{}", i + 1, cli.reloads);
        pipeline::reload(&mut world);
        scene.spawn_objects(&mut world);
        schedule.run(&mut world);
    }

    let stats = *world.resource::<ConversionStats>();
    let cache = &world.resource::<MaterialOverrides>().cache;
    let overrides = cache.stats();
    let validated = cache.validates_entries();
    let materials = world.resource::<MaterialStore>();
    let archetypes = world.resource::<RenderArchetypes>();

    println!("converted:          {}", stats.converted);
    println!("failed:             {}", stats.failed);
    println!("materials:          {}", materials.len());
    println!("material overrides: {}", materials.instance_count());
    println!(
        "override cache:     {} created, {} reused, {} repaired (validation {})",
        overrides.created,
        overrides.hits,
        overrides.repaired,
        if validated { "on" } else { "off" }
    );
    println!("render archetypes:  {}", archetypes.len());
    for archetype in archetypes.iter() {
        let name = materials
            .get(archetype.data.material)
            .map(|m| m.name.as_str())
            .unwrap_or("<destroyed>");
        println!(
            "  {} [{}]: {} entities",
            name, archetype.data.properties_set, archetype.entity_count
        );
    }

    if stats.failed > 0 {
        std::process::exit(2);
    }
}
