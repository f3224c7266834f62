//! Owned state of a firing-event density view.
//!
//! [`DensityView`] holds the loaded events, display geometry, and the last
//! published [`DensityFrame`]. Mutations only schedule a rebuild; the host
//! calls [`DensityView::poll`] from its event loop to run it once the
//! debounce delay has passed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use firingmap_common::{FiringMapResult, RenderDefaults};
use firingmap_event_model::{Epoch, EventSet};

use crate::color::{ColorRamp, HeatRamp};
use crate::extent::DomainExtent;
use crate::frame::DensityFrame;
use crate::grid::DensityGridBuilder;
use crate::mapper::{DomainPoint, PlotFrame, Point2D};
use crate::scheduler::{UpdateScheduler, DEFAULT_DEBOUNCE};
use crate::smooth::SeparableGaussianSmoother;

/// View parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Grid columns; rows follow the window aspect ratio.
    pub grid_width: usize,
    /// Gaussian smoothing width in grid cells.
    pub kernel_tau: f64,
    /// Idle delay before a scheduled rebuild runs.
    pub debounce: Duration,
    /// Horizontal margin around the plot target (px).
    pub h_margin: f64,
    /// Vertical margin around the plot target (px).
    pub v_margin: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            grid_width: 500,
            kernel_tau: 4.0,
            debounce: DEFAULT_DEBOUNCE,
            h_margin: 25.0,
            v_margin: 25.0,
        }
    }
}

impl From<&RenderDefaults> for ViewConfig {
    fn from(defaults: &RenderDefaults) -> Self {
        Self {
            grid_width: defaults.grid_width as usize,
            kernel_tau: defaults.kernel_tau,
            debounce: Duration::from_millis(defaults.debounce_ms),
            h_margin: defaults.h_margin,
            v_margin: defaults.v_margin,
        }
    }
}

/// Where an epoch's name sits inside its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelAnchor {
    Top,
    Bottom,
}

/// Target-local rectangle covering one epoch from max to min amplitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochBand {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub anchor: LabelAnchor,
}

/// Density view state.
pub struct DensityView {
    config: ViewConfig,
    events: Arc<EventSet>,
    sample_rate: f64,
    epochs: Vec<Epoch>,
    extent: DomainExtent,
    window_width: f64,
    window_height: f64,
    ramp: Arc<dyn ColorRamp>,
    scheduler: UpdateScheduler,
    frame: Option<Arc<DensityFrame>>,
}

impl DensityView {
    /// Create an empty view for a window of the given size.
    pub fn new(config: ViewConfig, window_width: f64, window_height: f64) -> Self {
        let scheduler = UpdateScheduler::new(config.debounce);
        let events = EventSet::default();
        Self {
            config,
            sample_rate: events.sample_rate(),
            events: Arc::new(events),
            epochs: Vec::new(),
            extent: DomainExtent::default(),
            window_width,
            window_height,
            ramp: Arc::new(HeatRamp),
            scheduler,
            frame: None,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<EventSet> {
        &self.events
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    pub fn extent(&self) -> DomainExtent {
        self.extent
    }

    pub fn window_size(&self) -> (f64, f64) {
        (self.window_width, self.window_height)
    }

    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    /// Replace the event set. The extent is recomputed immediately; grids
    /// follow on the next rebuild.
    pub fn set_events(&mut self, events: EventSet, now: Instant) {
        self.extent = DomainExtent::from_events(&events);
        self.sample_rate = events.sample_rate();
        self.events = Arc::new(events);
        tracing::debug!(
            events = self.events.len(),
            max_time = self.extent.max_time,
            min_amplitude = self.extent.min_amplitude,
            max_amplitude = self.extent.max_amplitude,
            "event set replaced"
        );
        self.scheduler.request_rebuild(now);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64, now: Instant) {
        self.sample_rate = sample_rate;
        self.scheduler.request_rebuild(now);
    }

    /// Replace the epochs. Epochs are overlay-only and never trigger a
    /// rebuild.
    pub fn set_epochs(&mut self, epochs: Vec<Epoch>) {
        self.epochs = epochs;
    }

    /// Track a new window size. The grid follows the window's aspect ratio,
    /// so this schedules a rebuild.
    pub fn resize(&mut self, window_width: f64, window_height: f64, now: Instant) {
        self.window_width = window_width;
        self.window_height = window_height;
        self.scheduler.request_rebuild(now);
    }

    pub fn set_color_ramp(&mut self, ramp: Arc<dyn ColorRamp>, now: Instant) {
        self.ramp = ramp;
        self.scheduler.request_rebuild(now);
    }

    /// Run a scheduled rebuild if it is due. Returns whether one ran.
    pub fn poll(&mut self, now: Instant) -> FiringMapResult<bool> {
        if !self.scheduler.begin_rebuild(now) {
            return Ok(false);
        }
        self.rebuild()?;
        Ok(true)
    }

    /// Rebuild grids and image for the current window and publish them.
    pub fn rebuild(&mut self) -> FiringMapResult<Arc<DensityFrame>> {
        let started = Instant::now();
        let builder = DensityGridBuilder::for_display(
            self.config.grid_width,
            self.window_width,
            self.window_height,
        )?;
        let smoother = SeparableGaussianSmoother::new(self.config.kernel_tau)?;

        let frame = Arc::new(DensityFrame::build(
            &self.events,
            self.extent,
            &builder,
            &smoother,
            self.ramp.as_ref(),
        ));

        tracing::debug!(
            events = self.events.len(),
            binned = frame.density.total(),
            width = frame.width(),
            height = frame.height(),
            max_density = frame.smoothed.max_value(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "density frame rebuilt"
        );

        self.frame = Some(Arc::clone(&frame));
        Ok(frame)
    }

    /// The most recently published frame.
    pub fn frame(&self) -> Option<Arc<DensityFrame>> {
        self.frame.clone()
    }

    /// Plot target inside the current window.
    pub fn plot_frame(&self) -> PlotFrame {
        PlotFrame::inset(
            self.window_width,
            self.window_height,
            self.config.h_margin,
            self.config.v_margin,
        )
    }

    /// Window pixel → domain coordinates.
    pub fn window_to_domain(&self, window: Point2D) -> FiringMapResult<DomainPoint> {
        let plot = self.plot_frame();
        Ok(plot.mapper(self.extent)?.to_domain(plot.to_local(window)))
    }

    /// Domain coordinates → window pixel.
    pub fn domain_to_window(&self, p: DomainPoint) -> FiringMapResult<Point2D> {
        let plot = self.plot_frame();
        Ok(plot.to_window(plot.mapper(self.extent)?.to_pixel(p)))
    }

    /// Nearest event to a grid cell of the published frame.
    pub fn nearest_event_at_grid(&self, grid_x: i64, grid_y: i64) -> Option<usize> {
        self.frame.as_ref()?.nearest_event(grid_x, grid_y)
    }

    /// Nearest event to a window pixel, resolved against the published
    /// frame. `Ok(None)` before the first rebuild or when the frame is empty.
    pub fn nearest_event_at_window(&self, window: Point2D) -> FiringMapResult<Option<usize>> {
        let Some(frame) = self.frame.as_ref() else {
            return Ok(None);
        };
        let plot = self.plot_frame();
        let display = plot.mapper(frame.extent)?;
        let (x, y) = display
            .reproject(plot.to_local(window), &frame.grid_mapper())
            .to_cell();
        Ok(frame.nearest_event(x, y))
    }

    /// Target-local rectangles for the current epochs.
    pub fn epoch_bands(&self) -> FiringMapResult<Vec<EpochBand>> {
        let mapper = self.plot_frame().mapper(self.extent)?;
        let anchor = if self.extent.max_amplitude.abs() > self.extent.min_amplitude.abs() {
            LabelAnchor::Top
        } else {
            LabelAnchor::Bottom
        };

        Ok(self
            .epochs
            .iter()
            .map(|epoch| {
                let top_left =
                    mapper.to_pixel(DomainPoint::new(epoch.t_begin, self.extent.max_amplitude));
                let bottom_right =
                    mapper.to_pixel(DomainPoint::new(epoch.t_end, self.extent.min_amplitude));
                EpochBand {
                    name: epoch.name.clone(),
                    x: top_left.x,
                    y: top_left.y,
                    width: bottom_right.x - top_left.x,
                    height: bottom_right.y - top_left.y,
                    anchor,
                }
            })
            .collect())
    }

    /// Render the current events at an arbitrary resolution (for export).
    ///
    /// Runs the whole pipeline at `width × height`; the published frame is
    /// left untouched.
    pub fn render_image(&self, width: u32, height: u32) -> FiringMapResult<RgbaImage> {
        let builder = DensityGridBuilder::new(width as usize, height as usize)?;
        let smoother = SeparableGaussianSmoother::new(self.config.kernel_tau)?;
        let frame = DensityFrame::build(
            &self.events,
            self.extent,
            &builder,
            &smoother,
            self.ramp.as_ref(),
        );
        tracing::debug!(width, height, binned = frame.density.total(), "rendered export image");
        Ok(frame.image)
    }
}

impl std::fmt::Debug for DensityView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DensityView")
            .field("config", &self.config)
            .field("events", &self.events.len())
            .field("sample_rate", &self.sample_rate)
            .field("epochs", &self.epochs.len())
            .field("extent", &self.extent)
            .field("window", &(self.window_width, self.window_height))
            .field("scheduler", &self.scheduler)
            .field("has_frame", &self.frame.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firingmap_common::FiringMapError;

    fn config(grid_width: usize) -> ViewConfig {
        ViewConfig {
            grid_width,
            kernel_tau: 1.0,
            debounce: Duration::from_millis(500),
            h_margin: 25.0,
            v_margin: 25.0,
        }
    }

    /// Event 0 sits mid-plot; events 1 and 2 pin the extent to (10, 0, 1)
    /// and fall on the excluded grid edges.
    fn center_event() -> EventSet {
        EventSet::new(vec![5.0, 10.0, 0.0], vec![1, 2, 3], vec![0.5, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_mutations_are_debounced() {
        let t0 = Instant::now();
        let mut view = DensityView::new(config(10), 100.0, 100.0);

        view.set_events(center_event(), t0);
        view.set_sample_rate(20_000.0, t0 + Duration::from_millis(10));
        assert!(view.frame().is_none());

        assert!(!view.poll(t0 + Duration::from_millis(100)).unwrap());
        assert!(view.poll(t0 + Duration::from_millis(500)).unwrap());
        assert!(!view.poll(t0 + Duration::from_millis(2000)).unwrap());

        let frame = view.frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (10, 10));
        assert_eq!(view.sample_rate(), 20_000.0);
    }

    #[test]
    fn test_published_frame_is_replaced_not_mutated() {
        let t0 = Instant::now();
        let mut view = DensityView::new(config(10), 100.0, 100.0);
        view.set_events(center_event(), t0);
        let first = view.rebuild().unwrap();

        view.set_events(EventSet::default(), t0);
        let second = view.rebuild().unwrap();

        assert_eq!(first.density.total(), 1);
        assert_eq!(second.density.total(), 0);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_grid_follows_window_aspect() {
        let t0 = Instant::now();
        let mut view = DensityView::new(config(500), 1000.0, 400.0);
        view.set_events(center_event(), t0);
        let frame = view.rebuild().unwrap();
        assert_eq!((frame.width(), frame.height()), (500, 200));

        view.resize(1000.0, 1000.0, t0);
        assert!(view.scheduler().is_pending());
        assert!(view.poll(t0 + Duration::from_secs(1)).unwrap());
        assert_eq!(view.frame().unwrap().height(), 500);
    }

    #[test]
    fn test_rebuild_rejects_degenerate_window() {
        let mut view = DensityView::new(config(500), 1000.0, 0.0);
        assert!(matches!(
            view.rebuild(),
            Err(FiringMapError::InvalidDimensions { .. })
        ));
        assert!(view.frame().is_none());
    }

    #[test]
    fn test_nearest_event_from_window_pixel() {
        let t0 = Instant::now();
        // Plot target is 100x100 at (25, 25) inside a 150x150 window.
        let mut view = DensityView::new(config(10), 150.0, 150.0);
        assert_eq!(view.nearest_event_at_window(Point2D::new(75.0, 75.0)).unwrap(), None);

        view.set_events(center_event(), t0);
        view.rebuild().unwrap();

        assert_eq!(view.nearest_event_at_grid(5, 5), Some(0));
        assert_eq!(view.nearest_event_at_window(Point2D::new(75.0, 75.0)).unwrap(), Some(0));
        assert_eq!(view.nearest_event_at_window(Point2D::new(0.0, 0.0)).unwrap(), Some(0));
    }

    #[test]
    fn test_window_domain_round_trip() {
        let t0 = Instant::now();
        let mut view = DensityView::new(config(10), 150.0, 150.0);
        view.set_events(center_event(), t0);

        let p = view.domain_to_window(DomainPoint::new(5.0, 0.5)).unwrap();
        assert_eq!(p, Point2D::new(75.0, 75.0));
        let back = view.window_to_domain(p).unwrap();
        assert!((back.time - 5.0).abs() < 1e-12);
        assert!((back.amplitude - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_epoch_bands_span_amplitude_range() {
        let t0 = Instant::now();
        let mut view = DensityView::new(config(10), 150.0, 150.0);
        view.set_events(center_event(), t0);
        view.set_epochs(vec![Epoch::new("stim", 2.0, 4.0)]);

        let bands = view.epoch_bands().unwrap();
        assert_eq!(bands.len(), 1);
        let band = &bands[0];
        assert_eq!(band.name, "stim");
        assert_eq!((band.x, band.y), (20.0, 0.0));
        assert_eq!((band.width, band.height), (20.0, 100.0));
        assert_eq!(band.anchor, LabelAnchor::Top);
    }

    #[test]
    fn test_render_image_at_export_resolution() {
        let t0 = Instant::now();
        let mut view = DensityView::new(config(10), 150.0, 150.0);
        view.set_events(center_event(), t0);

        let image = view.render_image(180, 90).unwrap();
        assert_eq!(image.dimensions(), (180, 90));
        assert!(view.frame().is_none());
        assert!(view.render_image(0, 90).is_err());
    }

    #[test]
    fn test_custom_ramp_is_used() {
        let t0 = Instant::now();
        let mut view = DensityView::new(config(10), 100.0, 100.0);
        view.set_events(center_event(), t0);
        view.set_color_ramp(Arc::new(|_: f64| image::Rgba([1, 2, 3, 4])), t0);

        let frame = view.rebuild().unwrap();
        assert_eq!(*frame.image.get_pixel(5, 5), image::Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn test_config_from_render_defaults() {
        let config = ViewConfig::from(&RenderDefaults::default());
        assert_eq!(config, ViewConfig::default());
    }
}
