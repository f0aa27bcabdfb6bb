use clap::{Parser, Subcommand};
use std::path::Path;

use hexplanet::config::generation::GenerationParams;
use hexplanet::world::generation::{generate_world, print_world_summary};

#[derive(Parser)]
#[command(name = "hexplanet")]
#[command(
    about = "Procedural geodesic planet generator with tectonic plates, climate, rivers, and terrain"
)]
#[command(version)]
struct Cli {
    /// Path to a world generation config file; built-in defaults apply
    /// when omitted
    #[arg(short, long)]
    params: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new planet and print a summary
    Generate,

    /// Regenerate a planet and dump one tile
    Inspect {
        /// Tile ID to inspect
        #[arg(short, long)]
        tile: u32,
    },
}

fn load_params(path: Option<&str>) -> GenerationParams {
    match path {
        Some(p) => match GenerationParams::from_file(Path::new(p)) {
            Ok(params) => params,
            Err(e) => {
                eprintln!("Error loading generation config: {}", e);
                std::process::exit(1);
            }
        },
        None => GenerationParams::default(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let params = load_params(cli.params.as_deref());

    match cli.command {
        Commands::Generate => {
            let world = match generate_world(&params) {
                Ok(w) => w,
                Err(e) => {
                    eprintln!("Generation failed: {}", e);
                    std::process::exit(1);
                }
            };
            print_world_summary(&world);
        }

        Commands::Inspect { tile } => {
            if params.seed == 0 {
                eprintln!("Inspect needs a fixed seed in the config to reproduce a world");
                std::process::exit(1);
            }
            let world = match generate_world(&params) {
                Ok(w) => w,
                Err(e) => {
                    eprintln!("Generation failed: {}", e);
                    std::process::exit(1);
                }
            };
            if tile >= world.tile_count() {
                eprintln!(
                    "Tile {} out of range, world has {} tiles",
                    tile,
                    world.tile_count()
                );
                std::process::exit(1);
            }

            let t = &world.tiles[tile as usize];
            println!("Tile {} of {} ({})", t.id, world.tile_count(), world.name);
            println!(
                "  Terrain:   {} / {:?} / {:?}",
                t.terrain.terrain_type.name(),
                t.terrain.shape,
                t.terrain.major_feature
            );
            println!("  River:     {}", t.terrain.has_river());
            println!(
                "  Elevation: {:.4}  Heat: {:.4}  Moisture: {:.4}",
                t.elevation, t.heat, t.moisture
            );
            let y = t.terrain.total_yield();
            println!(
                "  Yield:     food {} / production {} / gold {}  (movement {})",
                y.food,
                y.production,
                y.gold,
                t.terrain.movement_cost()
            );
            println!(
                "  Center:    ({:.4}, {:.4}, {:.4})",
                t.polygon.center.x, t.polygon.center.y, t.polygon.center.z
            );
            println!("  Neighbors: {:?}", t.neighbors);
        }
    }
}
