//! Multi-camera still capture into a dataset tree.
//!
//! Devices are paired with named viewpoints through `camera_config.json`.
//! The [AcquisitionController] walks the capture rounds of a
//! [Layout](warehouse::Layout) and stores one frame per angle per round.

mod common;

pub mod acquisition;
pub mod angle;
pub mod config;
pub mod operator;
pub mod source;

pub use acquisition::*;
pub use angle::*;
pub use config::*;
pub use operator::*;
pub use source::*;
