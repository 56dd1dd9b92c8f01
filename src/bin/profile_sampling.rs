//! Profiling tool to identify performance bottlenecks

use std::error::Error;
use std::time::Instant;

use mine_generator::erosion::{self, RelaxParams};
use mine_generator::{export, Heightfield, MineConfig, MineTerrain};

fn main() -> Result<(), Box<dyn Error>> {
    let resolution = 512;
    let seed = 1337u64;

    println!("=== Performance Profiling ===");
    println!("Grid size: {}x{} ({} samples)", resolution, resolution, resolution * resolution);
    println!("Rayon threads: {}", rayon::current_num_threads());
    println!();

    let config = MineConfig {
        seed: Some(seed),
        resolution,
        ..Default::default()
    };

    let start = Instant::now();
    let terrain = MineTerrain::new(config)?;
    let setup_time = start.elapsed();
    println!("Layout derivation: {:?}", setup_time);

    // Single-threaded timing of each field
    let samples = 20_000;
    let start = Instant::now();
    let mut sink = 0.0;
    for i in 0..samples {
        sink += terrain.pit_depth_at(-150.0 + i as f64 * 0.015, 12.0);
    }
    let pit_time = start.elapsed();
    println!("Pit field: {:?} per sample", pit_time / samples);

    let start = Instant::now();
    for i in 0..samples {
        sink += terrain.dump_height_at(-150.0 + i as f64 * 0.015, 12.0).unwrap_or(0.0);
    }
    let dump_time = start.elapsed();
    println!("Dump field: {:?} per sample", dump_time / samples);

    let start = Instant::now();
    let raw = terrain.sample_grid();
    let sample_time = start.elapsed();
    println!("Grid sampling (parallel): {:?}", sample_time);

    let params = RelaxParams::from_config(terrain.config());
    println!("\nErosion parameters:");
    println!("  Iterations: {}", params.iterations);
    println!("  Rate: {}", params.rate);
    println!("  Steepness damping: {}", params.steepness_damping);
    println!();

    let start = Instant::now();
    let (grid, stats) = erosion::relax_grid(&raw, &params);
    let relax_time = start.elapsed();
    println!("Erosion relaxation: {:?} (max change {:.3})", relax_time, stats.max_change);

    let heightfield = Heightfield {
        width: grid.width,
        height: grid.height,
        size: terrain.config().size,
        seed,
        grid,
    };
    let start = Instant::now();
    let _img = export::render_preview(&heightfield);
    let render_time = start.elapsed();
    println!("Preview render: {:?}", render_time);

    let total = setup_time + sample_time + relax_time + render_time;
    println!("\n=== Summary ===");
    println!("Total pipeline: {:?}", total);
    println!("  Sampling: {:.1}%", 100.0 * sample_time.as_secs_f64() / total.as_secs_f64());
    println!("  Erosion:  {:.1}%", 100.0 * relax_time.as_secs_f64() / total.as_secs_f64());
    println!("  Render:   {:.1}%", 100.0 * render_time.as_secs_f64() / total.as_secs_f64());
    println!("(checksum {:.3})", sink);
    Ok(())
}
