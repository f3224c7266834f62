//! A complete, immutable result of one density rebuild.

use image::RgbaImage;

use firingmap_event_model::EventSet;

use crate::color::{colorize, ColorRamp};
use crate::extent::DomainExtent;
use crate::grid::{DensityGrid, DensityGridBuilder, OwnerGrid};
use crate::mapper::CoordinateMapper;
use crate::nearest::NearestEventLocator;
use crate::smooth::{SeparableGaussianSmoother, SmoothedGrid};

/// Grids and image produced together by one rebuild.
///
/// Frames are published behind an `Arc` and never modified, so a reader
/// always sees grids and image from the same build.
#[derive(Debug, Clone)]
pub struct DensityFrame {
    pub extent: DomainExtent,
    pub density: DensityGrid,
    pub owners: OwnerGrid,
    pub smoothed: SmoothedGrid,
    pub image: RgbaImage,
}

impl DensityFrame {
    /// Run the full pipeline: bin, smooth a copy, color.
    pub fn build(
        events: &EventSet,
        extent: DomainExtent,
        builder: &DensityGridBuilder,
        smoother: &SeparableGaussianSmoother,
        ramp: &dyn ColorRamp,
    ) -> Self {
        let (density, owners) = builder.build(events, extent);

        let mut smoothed = SmoothedGrid::from_density(&density);
        smoother.smooth(&mut smoothed);

        let image = colorize(&density, &smoothed, ramp);

        Self {
            extent,
            density,
            owners,
            smoothed,
            image,
        }
    }

    pub fn width(&self) -> usize {
        self.density.width
    }

    pub fn height(&self) -> usize {
        self.density.height
    }

    /// Mapper from domain coordinates to this frame's grid cells.
    pub fn grid_mapper(&self) -> CoordinateMapper {
        CoordinateMapper::for_grid(self.extent, self.width(), self.height())
    }

    /// Nearest event to a grid cell of this frame.
    pub fn nearest_event(&self, grid_x: i64, grid_y: i64) -> Option<usize> {
        NearestEventLocator::new(&self.owners).nearest(grid_x, grid_y)
    }
}
