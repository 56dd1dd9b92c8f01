//! Field compositor and grid sampling.
//!
//! [`MineTerrain`] owns everything derived once per run (seeds, layout, the
//! pit, dump and plateau fields) and exposes the per-point sampling entry
//! points plus [`MineTerrain::generate`], which produces the relaxed
//! [`Heightfield`] handed to mesh construction.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{ConfigError, MineConfig};
use crate::dump::DumpField;
use crate::erosion::{self, RelaxParams};
use crate::layout::MineLayout;
use crate::math::{lerp, polar, smoothstep};
use crate::noise_field::{channel, NoiseField};
use crate::pit::PitField;
use crate::plateau::PlateauField;
use crate::seeds::MineSeeds;
use crate::tilemap::Tilemap;

/// Finished elevation grid, centred on the origin.
#[derive(Clone, Debug, Serialize)]
pub struct Heightfield {
    pub width: usize,
    pub height: usize,
    /// Side length of the sampled domain in world units
    pub size: f64,
    /// Master seed the grid was generated from
    pub seed: u64,
    pub grid: Tilemap<f64>,
}

impl Heightfield {
    /// Distance between neighbouring samples.
    pub fn step(&self) -> f64 {
        grid_step(self.size, self.width)
    }

    /// World coordinates of sample `(ix, iy)`.
    pub fn world_position(&self, ix: usize, iy: usize) -> (f64, f64) {
        let half = self.size * 0.5;
        let step = self.step();
        (-half + ix as f64 * step, -half + iy as f64 * step)
    }

    pub fn elevation(&self, ix: usize, iy: usize) -> f64 {
        *self.grid.get(ix, iy)
    }

    pub fn min_max(&self) -> (f64, f64) {
        self.grid.min_max()
    }
}

fn grid_step(size: f64, samples: usize) -> f64 {
    size / (samples.max(2) - 1) as f64
}

/// A fully derived open-pit mine, ready for sampling.
pub struct MineTerrain {
    config: MineConfig,
    seeds: MineSeeds,
    layout: MineLayout,
    noise: NoiseField,
    pit: PitField,
    dumps: DumpField,
    plateau: Option<PlateauField>,
}

impl MineTerrain {
    /// Validate the configuration and derive the layout from its seed
    /// (drawn from system entropy when none is configured).
    pub fn new(config: MineConfig) -> Result<Self, ConfigError> {
        let master = config.resolve_seed();
        Self::with_seeds(config, MineSeeds::from_master(master))
    }

    /// Like [`MineTerrain::new`] but with explicitly chosen sub-seeds.
    pub fn with_seeds(config: MineConfig, seeds: MineSeeds) -> Result<Self, ConfigError> {
        config.validate()?;

        let noise = NoiseField::new(seeds.noise_seed());
        let layout = MineLayout::derive(&config, &seeds, &noise);

        log::info!("Mine seed: {}", seeds.master);
        log::info!("Working face angle: {:.1}°", layout.working_face_angle.to_degrees());
        for (i, center) in layout.pit_centers.iter().enumerate() {
            log::info!(
                "Pit center {}: ({:.1}, {:.1}) size {:.2} depth {:.2}",
                i,
                center.x,
                center.y,
                center.size_scale,
                center.depth_scale
            );
        }

        let pit = PitField::new(&config, noise.clone(), &layout);
        let dumps = DumpField::new(&config, noise.clone(), layout.dump_sectors.clone());
        let plateau = config
            .plateau
            .clone()
            .map(|plateau| PlateauField::new(plateau, noise.clone(), config.vertical_scale));

        Ok(Self {
            config,
            seeds,
            layout,
            noise,
            pit,
            dumps,
            plateau,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seeds.master
    }

    pub fn seeds(&self) -> &MineSeeds {
        &self.seeds
    }

    pub fn config(&self) -> &MineConfig {
        &self.config
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn pit(&self) -> &PitField {
        &self.pit
    }

    pub fn dumps(&self) -> &DumpField {
        &self.dumps
    }

    pub fn plateau(&self) -> Option<&PlateauField> {
        self.plateau.as_ref()
    }

    /// Signed excavation elevation; negative inside a pit.
    pub fn pit_depth_at(&self, x: f64, y: f64) -> f64 {
        self.pit.depth_at(x, y)
    }

    /// Overburden height, or `None` where no dump sector contributes.
    pub fn dump_height_at(&self, x: f64, y: f64) -> Option<f64> {
        self.dumps.height_at(&self.pit, x, y)
    }

    /// Gentle undisturbed ground that dumps sit on.
    pub fn base_surface(&self, x: f64, y: f64) -> f64 {
        let cfg = &self.config;
        let scale = cfg.ambient_noise_scale;
        self.noise.fbm(x * scale, y * scale, channel::AMBIENT, 4) * cfg.ambient_noise_ampl * cfg.vertical_scale
    }

    /// Weight of the base surface near the primary rim: 0 well inside the
    /// pit, 1 once past the blend band.
    fn rim_blend(&self, x: f64, y: f64) -> f64 {
        let cfg = &self.config;
        let origin = self.pit.primary_center();
        let (r, theta) = polar(x, y, origin.x, origin.y);
        let start = self.pit.primary_rim_radius(theta) * cfg.rim_blend_start;
        let width = (cfg.size * cfg.rim_blend_distance).max(1.0);
        smoothstep((r - start) / width)
    }

    /// Pit surface eased into the base surface around the primary rim.
    fn blended_ground(&self, x: f64, y: f64) -> f64 {
        lerp(self.pit_depth_at(x, y), self.base_surface(x, y), self.rim_blend(x, y))
    }

    /// Merged elevation before erosion.
    ///
    /// Dumps and the plateau are added on top of the blended ground, which
    /// is the base surface once past the rim band. A mound fading to zero
    /// height at its edges meets the ground around it without a step.
    pub fn composite_elevation_at(&self, x: f64, y: f64) -> f64 {
        let ground = self.blended_ground(x, y);
        let plateau = self.plateau.as_ref().and_then(|p| p.height_at(&self.pit, x, y));
        let mound = match (self.dump_height_at(x, y), plateau) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        mound.map_or(ground, |h| ground + h)
    }

    /// Composited elevations on the configured grid, rows sampled in parallel.
    pub fn sample_grid(&self) -> Tilemap<f64> {
        let n = self.config.resolution;
        let half = self.config.size * 0.5;
        let step = grid_step(self.config.size, n);

        let mut grid = Tilemap::new_with(n, n, 0.0);
        grid.as_mut_slice()
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(iy, row)| {
                let y = -half + iy as f64 * step;
                for (ix, cell) in row.iter_mut().enumerate() {
                    *cell = self.composite_elevation_at(-half + ix as f64 * step, y);
                }
            });
        grid
    }

    /// Sample the grid and relax it with the configured erosion parameters.
    pub fn generate(&self) -> Heightfield {
        self.generate_with(&RelaxParams::from_config(&self.config))
    }

    pub fn generate_with(&self, relax: &RelaxParams) -> Heightfield {
        let n = self.config.resolution;
        log::info!("Sampling {}x{} grid over {:.0} units", n, n, self.config.size);
        let raw = self.sample_grid();

        log::info!("Relaxing terrain ({} iterations, rate {:.2})", relax.iterations, relax.rate);
        let (grid, _stats) = erosion::relax_grid(&raw, relax);

        let heightfield = Heightfield {
            width: n,
            height: n,
            size: self.config.size,
            seed: self.seeds.master,
            grid,
        };
        let (lo, hi) = heightfield.min_max();
        log::info!("Elevation range: {:.2} to {:.2}", lo, hi);
        heightfield
    }
}
