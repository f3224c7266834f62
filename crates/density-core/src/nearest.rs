//! Nearest owned cell lookup.

use crate::grid::OwnerGrid;

/// Brute-force nearest-event search over an owner grid.
///
/// Scans every cell in row-major order and keeps the first cell at the
/// strictly smallest Euclidean distance, so ties go to the lowest `y`, then
/// the lowest `x`. Runs on demand only; O(width × height).
#[derive(Debug, Clone, Copy)]
pub struct NearestEventLocator<'a> {
    owners: &'a OwnerGrid,
}

impl<'a> NearestEventLocator<'a> {
    pub fn new(owners: &'a OwnerGrid) -> Self {
        Self { owners }
    }

    /// Index of the event owning the closest occupied cell to
    /// `(grid_x, grid_y)`, or `None` when no cell is occupied.
    ///
    /// The query point may lie outside the grid.
    pub fn nearest(&self, grid_x: i64, grid_y: i64) -> Option<usize> {
        let width = self.owners.width;
        let mut best: Option<(f64, usize)> = None;

        for (idx, owner) in self.owners.owners.iter().enumerate() {
            let Some(event) = *owner else {
                continue;
            };
            let dx = (idx % width) as f64 - grid_x as f64;
            let dy = (idx / width) as f64 - grid_y as f64;
            let dist = (dx * dx + dy * dy).sqrt();

            match best {
                Some((best_dist, _)) if dist >= best_dist => {}
                _ => best = Some((dist, event)),
            }
        }

        best.map(|(_, event)| event)
    }
}
