//! Density-to-color conversion.

use image::{Rgba, RgbaImage};

use crate::grid::DensityGrid;
use crate::smooth::SmoothedGrid;

/// Maps a normalized intensity in `[0, 1]` to a color.
///
/// Implementations must be pure and must not depend on where the cell is.
pub trait ColorRamp: Send + Sync {
    fn color_for(&self, pct: f64) -> Rgba<u8>;
}

impl<F> ColorRamp for F
where
    F: Fn(f64) -> Rgba<u8> + Send + Sync,
{
    fn color_for(&self, pct: f64) -> Rgba<u8> {
        self(pct)
    }
}

/// Opaque blue → cyan → green → yellow → red ramp.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatRamp;

impl ColorRamp for HeatRamp {
    fn color_for(&self, pct: f64) -> Rgba<u8> {
        let v = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 1.0) };

        let (r, g, b) = if v < 0.25 {
            let t = v / 0.25;
            (0.0, t * 0.5, 1.0)
        } else if v < 0.5 {
            let t = (v - 0.25) / 0.25;
            (0.0, 0.5 + t * 0.5, 1.0 - t)
        } else if v < 0.75 {
            let t = (v - 0.5) / 0.25;
            (t, 1.0, 0.0)
        } else {
            let t = (v - 0.75) / 0.25;
            (1.0, 1.0 - t, 0.0)
        };

        Rgba([channel(r), channel(g), channel(b), 255])
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round() as u8
}

/// Square-root compressed intensity of a smoothed cell.
///
/// Returns 0 when `max` is not positive.
pub fn intensity(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (value / max).sqrt()
}

/// Color a density grid.
///
/// Cells with a zero raw count stay fully transparent. Occupied cells take
/// their color from the smoothed value, so dense neighborhoods brighten a
/// hit without painting blur into empty cells.
pub fn colorize(raw: &DensityGrid, smoothed: &SmoothedGrid, ramp: &dyn ColorRamp) -> RgbaImage {
    let max = smoothed.max_value();
    let mut image = RgbaImage::from_pixel(raw.width as u32, raw.height as u32, Rgba([0, 0, 0, 0]));

    for (idx, (&count, &value)) in raw.counts.iter().zip(&smoothed.values).enumerate() {
        if count == 0 {
            continue;
        }
        let x = (idx % raw.width) as u32;
        let y = (idx / raw.width) as u32;
        image.put_pixel(x, y, ramp.color_for(intensity(value, max)));
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_ramp_endpoints() {
        assert_eq!(HeatRamp.color_for(0.0), Rgba([0, 0, 255, 255]));
        assert_eq!(HeatRamp.color_for(0.5), Rgba([0, 255, 0, 255]));
        assert_eq!(HeatRamp.color_for(1.0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_heat_ramp_clamps_out_of_range() {
        assert_eq!(HeatRamp.color_for(-3.0), HeatRamp.color_for(0.0));
        assert_eq!(HeatRamp.color_for(7.0), HeatRamp.color_for(1.0));
        assert_eq!(HeatRamp.color_for(f64::NAN), HeatRamp.color_for(0.0));
    }

    #[test]
    fn test_heat_ramp_distinguishes_inputs() {
        let samples: Vec<_> = (0..=10).map(|i| HeatRamp.color_for(i as f64 / 10.0)).collect();
        for pair in samples.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_intensity_is_square_root() {
        assert_eq!(intensity(25.0, 100.0), 0.5);
        assert_eq!(intensity(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_colorize_uses_raw_occupancy_and_smoothed_intensity() {
        let raw = DensityGrid {
            width: 3,
            height: 1,
            counts: vec![1, 0, 1],
        };
        let smoothed = SmoothedGrid {
            width: 3,
            height: 1,
            values: vec![4.0, 9.0, 1.0],
        };
        let ramp = |pct: f64| Rgba([(pct * 100.0).round() as u8, 0, 0, 255]);
        let image = colorize(&raw, &smoothed, &ramp);

        assert_eq!(image.dimensions(), (3, 1));
        // max smoothed is 9 (an empty cell): sqrt(4/9) and sqrt(1/9)
        assert_eq!(*image.get_pixel(0, 0), Rgba([67, 0, 0, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*image.get_pixel(2, 0), Rgba([33, 0, 0, 255]));
    }
}
