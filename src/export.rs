//! Heightfield export: shaded PNG preview and JSON dump.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::config::MineConfig;
use crate::terrain::Heightfield;
use crate::tilemap::Tilemap;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Strata colours from the surface down, with the normalized depth each starts at.
const STRATA: [(f64, [f64; 3]); 4] = [
    (0.0, [0.78, 0.75, 0.66]),  // Topsoil
    (0.12, [0.66, 0.56, 0.45]), // Upper wall
    (0.33, [0.50, 0.48, 0.50]), // Lower wall
    (0.66, [0.18, 0.15, 0.12]), // Deep rock
];

/// Colour for a normalized depth: 0 at the highest sample, 1 at the lowest.
pub fn strata_color(depth: f64) -> [f64; 3] {
    let depth = depth.clamp(0.0, 1.0);
    STRATA
        .iter()
        .rev()
        .find(|(start, _)| depth >= *start)
        .map(|(_, color)| *color)
        .unwrap_or(STRATA[0].1)
}

/// Half-Lambert hillshade for every cell, light from the north-west.
fn compute_hillshade(grid: &Tilemap<f64>, cell_size: f64) -> Vec<f64> {
    let (width, height) = (grid.width, grid.height);
    let light = {
        let (x, y, z) = (-0.6f64, -0.6f64, 0.5f64);
        let len = (x * x + y * y + z * z).sqrt();
        (x / len, y / len, z / len)
    };

    let mut shade = vec![1.0; width * height];
    for y in 0..height {
        for x in 0..width {
            // Clamp at the edges; the grid does not wrap
            let h_left = *grid.get(x.saturating_sub(1), y);
            let h_right = *grid.get((x + 1).min(width - 1), y);
            let h_up = *grid.get(x, y.saturating_sub(1));
            let h_down = *grid.get(x, (y + 1).min(height - 1));

            let dzdx = (h_right - h_left) / (2.0 * cell_size);
            let dzdy = (h_down - h_up) / (2.0 * cell_size);
            let len = (dzdx * dzdx + dzdy * dzdy + 1.0).sqrt();
            let n_dot_l = (-dzdx * light.0 - dzdy * light.1 + light.2) / len;

            let half_lambert = (n_dot_l * 0.5 + 0.5).powi(2);
            shade[y * width + x] = 0.25 + half_lambert * 0.75;
        }
    }
    shade
}

/// Render the heightfield as a strata-coloured, hillshaded image.
pub fn render_preview(heightfield: &Heightfield) -> RgbImage {
    let grid = &heightfield.grid;
    let (lo, hi) = heightfield.min_max();
    let range = (hi - lo).max(1e-6);
    let shade = compute_hillshade(grid, heightfield.step().max(1e-6));

    let mut img: RgbImage = ImageBuffer::new(grid.width as u32, grid.height as u32);
    for (x, y, &h) in grid.iter() {
        let color = strata_color((hi - h) / range);
        let s = shade[y * grid.width + x];
        let pixel = color.map(|c| (c * s * 255.0).clamp(0.0, 255.0) as u8);
        img.put_pixel(x as u32, y as u32, Rgb(pixel));
    }
    img
}

pub fn write_preview_png(heightfield: &Heightfield, path: impl AsRef<Path>) -> Result<(), ExportError> {
    render_preview(heightfield).save(path.as_ref())?;
    log::info!("Wrote preview to {}", path.as_ref().display());
    Ok(())
}

#[derive(Serialize)]
struct HeightfieldDocument<'a> {
    config: &'a MineConfig,
    #[serde(flatten)]
    heightfield: &'a Heightfield,
}

/// Write the heightfield and the configuration that produced it as JSON.
pub fn write_heightfield_json(
    heightfield: &Heightfield,
    config: &MineConfig,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let doc = HeightfieldDocument { config, heightfield };
    serde_json::to_writer(BufWriter::new(file), &doc)?;
    log::info!("Wrote heightfield JSON to {}", path.as_ref().display());
    Ok(())
}
