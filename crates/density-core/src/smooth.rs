//! Separable Gaussian smoothing of density grids.
//!
//! The kernel is not normalized and its radius is
//! `trunc(tau) * 3`. Taps that fall outside the grid are omitted, so border
//! cells collect less total weight than interior ones. Rendered output
//! depends on all three properties.
//!
//! The radius is capped at [`MAX_KERNEL_RADIUS`].

use firingmap_common::{FiringMapError, FiringMapResult};

use crate::grid::DensityGrid;

/// Largest kernel radius accepted, in cells. Corresponds to `tau < 21846`.
pub const MAX_KERNEL_RADIUS: usize = 1 << 16;

/// Floating-point working copy of a density grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedGrid {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f64>,
}

impl SmoothedGrid {
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Copy raw counts into floats.
    pub fn from_density(grid: &DensityGrid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            values: grid.counts.iter().map(|&c| c as f64).collect(),
        }
    }

    pub fn value(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.values[y * self.width + x])
    }

    /// Largest cell value, or 0 for an empty grid.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0_f64, f64::max)
    }
}

/// One-dimensional Gaussian weights over `[-radius, radius]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    tau: f64,
    radius: usize,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// `tau` must be finite and positive, and its radius must not exceed
    /// [`MAX_KERNEL_RADIUS`].
    pub fn new(tau: f64) -> FiringMapResult<Self> {
        if !tau.is_finite() || tau <= 0.0 {
            return Err(FiringMapError::invalid_kernel(tau));
        }

        let radius = tau.trunc() * 3.0;
        if radius > MAX_KERNEL_RADIUS as f64 {
            return Err(FiringMapError::invalid_kernel(tau));
        }
        let radius = radius as usize;
        let r = radius as i64;
        let weights = (-r..=r)
            .map(|d| (-0.5 * (d * d) as f64 / (tau * tau)).exp())
            .collect();

        Ok(Self {
            tau,
            radius,
            weights,
        })
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Weights indexed by `d + radius`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at signed offset `d`, zero outside the radius.
    pub fn weight(&self, d: i64) -> f64 {
        let r = self.radius as i64;
        if d < -r || d > r {
            return 0.0;
        }
        self.weights[(d + r) as usize]
    }

    /// Convolve `line` in place, using `scratch` for the output before
    /// committing it.
    fn apply(&self, line: &mut [f64], scratch: &mut Vec<f64>) {
        let n = line.len() as i64;
        let r = self.radius as i64;

        scratch.clear();
        scratch.extend((0..n).map(|i| {
            let lo = (i - r).max(0);
            let hi = (i + r).min(n - 1);
            (lo..=hi)
                .map(|j| line[j as usize] * self.weights[(j - i + r) as usize])
                .sum::<f64>()
        }));

        line.copy_from_slice(&scratch[..]);
    }
}

/// Blurs grids with a 1-D kernel along rows, then along columns.
#[derive(Debug, Clone)]
pub struct SeparableGaussianSmoother {
    kernel: GaussianKernel,
}

impl SeparableGaussianSmoother {
    pub fn new(tau: f64) -> FiringMapResult<Self> {
        Ok(Self {
            kernel: GaussianKernel::new(tau)?,
        })
    }

    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    /// Full 2-D blur in place: the vertical pass runs on the horizontal
    /// pass's output.
    pub fn smooth(&self, grid: &mut SmoothedGrid) {
        self.horizontal_pass(grid);
        self.vertical_pass(grid);
    }

    /// Convolve every row.
    pub fn horizontal_pass(&self, grid: &mut SmoothedGrid) {
        if grid.width == 0 {
            return;
        }
        let mut scratch = Vec::with_capacity(grid.width);
        for row in grid.values.chunks_exact_mut(grid.width) {
            self.kernel.apply(row, &mut scratch);
        }
    }

    /// Convolve every column.
    pub fn vertical_pass(&self, grid: &mut SmoothedGrid) {
        let (w, h) = (grid.width, grid.height);
        let mut column = vec![0.0; h];
        let mut scratch = Vec::with_capacity(h);
        for x in 0..w {
            for (y, v) in column.iter_mut().enumerate() {
                *v = grid.values[y * w + x];
            }
            self.kernel.apply(&mut column, &mut scratch);
            for (y, v) in column.iter().enumerate() {
                grid.values[y * w + x] = *v;
            }
        }
    }
}
