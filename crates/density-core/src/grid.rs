//! Occupancy and ownership grids.

use firingmap_common::{FiringMapError, FiringMapResult};
use firingmap_event_model::EventSet;

use crate::extent::DomainExtent;
use crate::mapper::{CoordinateMapper, DomainPoint};

/// Per-cell event counts, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub width: usize,
    pub height: usize,
    pub counts: Vec<u32>,
}

/// Per-cell index of the last event mapped there, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerGrid {
    pub width: usize,
    pub height: usize,
    pub owners: Vec<Option<usize>>,
}

impl DensityGrid {
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            counts: vec![0; width * height],
        }
    }

    pub fn count(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.counts[y * self.width + x])
    }

    /// Sum of all cell counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

impl OwnerGrid {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            owners: vec![None; width * height],
        }
    }

    pub fn owner(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.owners[y * self.width + x]
    }

    /// Number of cells that have an owner.
    pub fn occupied(&self) -> usize {
        self.owners.iter().filter(|o| o.is_some()).count()
    }
}

/// Bins events into a fixed `width × height` grid.
#[derive(Debug, Clone, Copy)]
pub struct DensityGridBuilder {
    width: usize,
    height: usize,
}

impl DensityGridBuilder {
    /// Both dimensions must be non-zero.
    pub fn new(width: usize, height: usize) -> FiringMapResult<Self> {
        if width == 0 || height == 0 {
            return Err(FiringMapError::invalid_dimensions(
                width as f64,
                height as f64,
            ));
        }
        Ok(Self { width, height })
    }

    /// Builder whose row count follows a display's aspect ratio.
    pub fn for_display(
        width: usize,
        display_width: f64,
        display_height: f64,
    ) -> FiringMapResult<Self> {
        Self::new(width, grid_height_for(display_width, display_height, width)?)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Map every event into the grid in index order.
    ///
    /// Each in-range event increments its cell and becomes the cell's owner,
    /// so later events win shared cells. Events that land outside
    /// `[0, width) × [0, height)` are dropped.
    pub fn build(&self, events: &EventSet, extent: DomainExtent) -> (DensityGrid, OwnerGrid) {
        let mut density = DensityGrid::zeroed(self.width, self.height);
        let mut owners = OwnerGrid::empty(self.width, self.height);

        let mapper = self.mapper(extent);
        let (w, h) = (self.width as i64, self.height as i64);
        let mut dropped = 0usize;

        for (index, event) in events.iter().enumerate() {
            let (x, y) = mapper
                .to_pixel(DomainPoint::new(event.time, event.amplitude))
                .to_cell();
            if (0..w).contains(&x) && (0..h).contains(&y) {
                let idx = y as usize * self.width + x as usize;
                density.counts[idx] += 1;
                owners.owners[idx] = Some(index);
            } else {
                dropped += 1;
            }
        }

        tracing::trace!(
            events = events.len(),
            dropped,
            width = self.width,
            height = self.height,
            "binned events into density grid"
        );

        (density, owners)
    }

    /// Mapper from domain coordinates to this grid's cells.
    pub fn mapper(&self, extent: DomainExtent) -> CoordinateMapper {
        CoordinateMapper::for_grid(extent, self.width, self.height)
    }
}

/// Grid rows for a fixed column count, following a display's aspect ratio.
///
/// `rows = trunc(display_height / display_width * width)`. Fails when the
/// display is degenerate or the result is zero rows.
pub fn grid_height_for(
    display_width: f64,
    display_height: f64,
    width: usize,
) -> FiringMapResult<usize> {
    if !(display_width.is_finite() && display_height.is_finite())
        || display_width <= 0.0
        || display_height <= 0.0
    {
        return Err(FiringMapError::invalid_dimensions(display_width, display_height));
    }
    let rows = (display_height / display_width * width as f64) as usize;
    if rows == 0 {
        return Err(FiringMapError::invalid_dimensions(width as f64, 0.0));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn events(times: &[f64], amps: &[f64]) -> EventSet {
        EventSet::new(times.to_vec(), vec![1; times.len()], amps.to_vec()).unwrap()
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            DensityGridBuilder::new(0, 10),
            Err(FiringMapError::InvalidDimensions { .. })
        ));
        assert!(DensityGridBuilder::new(10, 0).is_err());
    }

    #[test]
    fn test_boundary_events_are_dropped() {
        let set = events(&[0.0, 10.0], &[0.0, 1.0]);
        let extent = DomainExtent::from_events(&set);
        let (density, owners) = DensityGridBuilder::new(10, 10).unwrap().build(&set, extent);
        assert_eq!(density.total(), 0);
        assert_eq!(owners.occupied(), 0);
    }

    #[test]
    fn test_single_event_lands_in_center() {
        let set = events(&[5.0], &[0.5]);
        let extent = DomainExtent::new(10.0, 0.0, 1.0);
        let (density, owners) = DensityGridBuilder::new(10, 10).unwrap().build(&set, extent);
        assert_eq!(density.count(5, 5), Some(1));
        assert_eq!(owners.owner(5, 5), Some(0));
        assert_eq!(density.total(), 1);
    }

    #[test]
    fn test_last_event_owns_shared_cell() {
        let set = events(&[5.0, 1.5, 5.01], &[0.5, 0.25, 0.499]);
        let extent = DomainExtent::new(10.0, 0.0, 1.0);
        let (density, owners) = DensityGridBuilder::new(10, 10).unwrap().build(&set, extent);
        assert_eq!(density.count(5, 5), Some(2));
        assert_eq!(owners.owner(5, 5), Some(2));
        assert_eq!(owners.owner(1, 7), Some(1));
    }

    #[test]
    fn test_degenerate_extent_piles_into_origin() {
        let set = events(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]);
        let extent = DomainExtent::from_events(&set);
        let (density, owners) = DensityGridBuilder::new(8, 8).unwrap().build(&set, extent);
        assert_eq!(density.count(0, 0), Some(3));
        assert_eq!(owners.owner(0, 0), Some(2));
    }

    #[test]
    fn test_grid_height_follows_aspect_ratio() {
        assert_eq!(grid_height_for(1000.0, 400.0, 500).unwrap(), 200);
        // truncates rather than rounds
        assert_eq!(grid_height_for(300.0, 199.0, 3).unwrap(), 1);
        assert!(grid_height_for(1000.0, 1.0, 500).is_err());
        assert!(grid_height_for(0.0, 100.0, 500).is_err());
    }

    proptest! {
        #[test]
        fn prop_occupancy_sum_counts_in_range_events(
            pts in proptest::collection::vec((-2.0f64..12.0, -0.5f64..1.5), 0..200),
            w in 1usize..40,
            h in 1usize..40,
        ) {
            let set = EventSet::new(
                pts.iter().map(|p| p.0).collect(),
                vec![0; pts.len()],
                pts.iter().map(|p| p.1).collect(),
            ).unwrap();
            let extent = DomainExtent::new(10.0, 0.0, 1.0);
            let builder = DensityGridBuilder::new(w, h).unwrap();
            let (density, _) = builder.build(&set, extent);

            let mapper = builder.mapper(extent);
            let expected = set
                .iter()
                .filter(|e| {
                    let (x, y) = mapper.to_pixel(DomainPoint::new(e.time, e.amplitude)).to_cell();
                    x >= 0 && x < w as i64 && y >= 0 && y < h as i64
                })
                .count() as u64;
            prop_assert_eq!(density.total(), expected);
        }
    }
}
