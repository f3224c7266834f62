//! Conversion between domain coordinates and pixels.
//!
//! Time runs left to right from zero to `max_time`. Amplitude runs bottom
//! to top, so higher amplitudes land nearer `y = 0`.

use firingmap_common::{FiringMapError, FiringMapResult};
use serde::{Deserialize, Serialize};

use crate::extent::DomainExtent;

/// A point in pixel space (window, target, or grid).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Truncate toward zero to integer cell indices.
    pub fn to_cell(self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }
}

/// A point in (time, amplitude) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainPoint {
    pub time: f64,
    pub amplitude: f64,
}

impl DomainPoint {
    pub fn new(time: f64, amplitude: f64) -> Self {
        Self { time, amplitude }
    }
}

/// Affine mapping between an extent and a `width × height` pixel rectangle.
///
/// Grid and display use separate mappers over the same extent; a display
/// pixel reaches grid space by going through domain coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    extent: DomainExtent,
    width: f64,
    height: f64,
}

impl CoordinateMapper {
    /// Create a mapper. Both dimensions must be finite and positive.
    pub fn new(extent: DomainExtent, width: f64, height: f64) -> FiringMapResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FiringMapError::invalid_dimensions(width, height));
        }
        Ok(Self {
            extent,
            width,
            height,
        })
    }

    /// Mapper for a grid whose dimensions were already checked to be
    /// non-zero.
    pub(crate) fn for_grid(extent: DomainExtent, width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            extent,
            width: width as f64,
            height: height as f64,
        }
    }

    pub fn extent(&self) -> DomainExtent {
        self.extent
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Domain → pixel. A degenerate extent maps everything to `(0, 0)`.
    pub fn to_pixel(&self, p: DomainPoint) -> Point2D {
        if self.extent.is_degenerate() {
            return Point2D::default();
        }
        let pct_x = p.time / self.extent.max_time;
        let pct_y = (p.amplitude - self.extent.min_amplitude) / self.extent.amplitude_span();
        Point2D::new(pct_x * self.width, (1.0 - pct_y) * self.height)
    }

    /// Pixel → domain; the algebraic inverse of [`to_pixel`](Self::to_pixel)
    /// for a non-degenerate extent.
    pub fn to_domain(&self, p: Point2D) -> DomainPoint {
        let pct_x = p.x / self.width;
        let pct_y = 1.0 - p.y / self.height;
        DomainPoint::new(
            pct_x * self.extent.max_time,
            pct_y * self.extent.amplitude_span() + self.extent.min_amplitude,
        )
    }

    /// Re-express a pixel of this mapper in another mapper's pixel space.
    pub fn reproject(&self, p: Point2D, target: &CoordinateMapper) -> Point2D {
        target.to_pixel(self.to_domain(p))
    }
}

/// The plot target inside a window: the window rectangle inset by margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotFrame {
    /// Inset a `window_width × window_height` window by the given margins.
    pub fn inset(window_width: f64, window_height: f64, h_margin: f64, v_margin: f64) -> Self {
        Self {
            x: h_margin,
            y: v_margin,
            width: window_width - 2.0 * h_margin,
            height: window_height - 2.0 * v_margin,
        }
    }

    /// Window pixel → target-local pixel.
    pub fn to_local(&self, window: Point2D) -> Point2D {
        Point2D::new(window.x - self.x, window.y - self.y)
    }

    /// Target-local pixel → window pixel.
    pub fn to_window(&self, local: Point2D) -> Point2D {
        Point2D::new(local.x + self.x, local.y + self.y)
    }

    /// Mapper covering this target. Fails when margins swallow the window.
    pub fn mapper(&self, extent: DomainExtent) -> FiringMapResult<CoordinateMapper> {
        CoordinateMapper::new(extent, self.width, self.height)
    }
}
