use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use mine_generator::erosion::{ErosionPreset, RelaxParams};
use mine_generator::export;
use mine_generator::{MineConfig, MineSeeds, MineTerrain};

#[derive(Parser, Debug)]
#[command(name = "mine_generator")]
#[command(about = "Generate procedural open-pit mine heightfields")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file; fields it omits keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Samples along each side of the grid
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Side length of the sampled domain in world units
    #[arg(long)]
    size: Option<f64>,

    /// Override the number of erosion passes
    #[arg(short = 'i', long)]
    erosion_iterations: Option<usize>,

    /// Erosion preset applied on top of the configured passes
    #[arg(short = 'e', long, value_enum, default_value_t = ErosionPreset::Configured)]
    erosion: ErosionPreset,

    /// Override the noise seed while keeping the layout of `--seed`
    #[arg(long)]
    noise_seed: Option<u64>,

    /// Output PNG preview
    #[arg(short, long, default_value = "open_pit.png")]
    output: PathBuf,

    /// Also write the heightfield as JSON
    #[arg(long)]
    export_json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MineConfig::from_json_file(path)?,
        None => MineConfig::default(),
    };
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(iterations) = args.erosion_iterations {
        config.erosion_iterations = iterations;
    }

    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let mut seeds = MineSeeds::builder(seed);
    if let Some(noise_seed) = args.noise_seed {
        seeds = seeds.noise(noise_seed);
    }
    let terrain = MineTerrain::with_seeds(config, seeds.build())?;

    let relax = args.erosion.params(&RelaxParams::from_config(terrain.config()));
    log::info!("Erosion: {} ({})", args.erosion, args.erosion.description());
    let heightfield = terrain.generate_with(&relax);

    export::write_preview_png(&heightfield, &args.output)?;
    if let Some(path) = &args.export_json {
        export::write_heightfield_json(&heightfield, terrain.config(), path)?;
    }

    println!("Seed: {}", terrain.seed());
    println!("{}", terrain.seeds());
    Ok(())
}
