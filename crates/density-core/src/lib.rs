//! FiringMap Density Core
//!
//! Turns a set of firing events into a smoothed density heat-map and answers
//! nearest-event queries against the same grid:
//! - **Mapping:** Affine conversion between (time, amplitude) and pixels
//! - **Gridding:** Occupancy counts plus a per-cell owning event index
//! - **Smoothing:** Separable, unnormalized Gaussian blur
//! - **Coloring:** Square-root compressed intensity through a color ramp
//! - **Lookup:** Nearest owned cell to a grid point
//! - **Scheduling:** Debounced rebuilds behind a single published frame
//!
//! This crate is pure computation with no I/O and no platform dependencies.
//! The host supplies the clock and the color ramp.

pub mod color;
pub mod extent;
pub mod frame;
pub mod grid;
pub mod mapper;
pub mod nearest;
pub mod scheduler;
pub mod smooth;
pub mod view;

pub use color::{ColorRamp, HeatRamp};
pub use extent::DomainExtent;
pub use frame::DensityFrame;
pub use grid::{DensityGrid, DensityGridBuilder, OwnerGrid};
pub use mapper::{CoordinateMapper, DomainPoint, PlotFrame, Point2D};
pub use nearest::NearestEventLocator;
pub use scheduler::UpdateScheduler;
pub use smooth::{GaussianKernel, SeparableGaussianSmoother, SmoothedGrid, MAX_KERNEL_RADIUS};
pub use view::{DensityView, EpochBand, LabelAnchor, ViewConfig};
