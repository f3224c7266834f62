//! FiringMap Event Model
//!
//! Defines the data contracts consumed by the density pipeline:
//! - **Events:** Timestamped firing events (time, label, amplitude) stored as
//!   parallel sequences whose shared index is the event's identity
//! - **Epochs:** Named time intervals used for overlay annotation only
//!
//! Event sets are immutable once loaded and are replaced wholesale.

pub mod epoch;
pub mod event;

pub use epoch::*;
pub use event::*;
