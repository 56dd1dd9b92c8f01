//! Debug tool for comparing erosion presets visually
//! Renders the same mine once per preset and tiles the previews into one image

use std::error::Error;

use image::{ImageBuffer, Rgb, RgbImage};
use mine_generator::erosion::{self, ErosionPreset, RelaxParams};
use mine_generator::export::render_preview;
use mine_generator::{Heightfield, MineConfig, MineTerrain};

const SEED: u64 = 42;
const RESOLUTION: usize = 256;
const OUTPUT: &str = "relax_comparison.png";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("Generating erosion comparison grid...");

    let terrain = MineTerrain::new(MineConfig {
        seed: Some(SEED),
        resolution: RESOLUTION,
        ..Default::default()
    })?;
    let raw = terrain.sample_grid();
    let base = RelaxParams::from_config(terrain.config());

    let mut images: Vec<RgbImage> = Vec::new();
    for (idx, preset) in ErosionPreset::all().iter().enumerate() {
        let params = preset.params(&base);
        let (grid, stats) = erosion::relax_grid(&raw, &params);
        println!(
            "  [{}] {:<11} {:<28} {:>3} passes  max change {:>7.3}  mean change {:.4}",
            idx + 1,
            preset.to_string(),
            preset.description(),
            stats.iterations,
            stats.max_change,
            stats.mean_change
        );

        let heightfield = Heightfield {
            width: grid.width,
            height: grid.height,
            size: terrain.config().size,
            seed: terrain.seed(),
            grid,
        };
        images.push(render_preview(&heightfield));
    }

    let grid = create_grid(&images, 2, 2);
    grid.save(OUTPUT)?;
    println!("Saved {}", OUTPUT);
    Ok(())
}

/// Tile `images` row by row, in the numbered order printed above, with a
/// thin separator band above each cell.
fn create_grid(images: &[RgbImage], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].width();
    let cell_height = images[0].height();
    let band_height = 6u32;
    let total_cell_height = cell_height + band_height;

    let mut grid: RgbImage = ImageBuffer::from_pixel(
        cell_width * cols as u32,
        total_cell_height * rows as u32,
        Rgb([40, 40, 40]),
    );

    for (idx, img) in images.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        if row >= rows {
            break;
        }

        let x_offset = col as u32 * cell_width;
        let y_offset = row as u32 * total_cell_height + band_height;
        for (x, y, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x_offset + x, y_offset + y, *pixel);
        }
    }

    grid
}
