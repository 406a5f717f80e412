//! The on-disk layout of anomaly-detection datasets.
//!
//! A [Warehouse] owns a base directory and builds the tree
//! `{base}/dataset/{object}/{train|test}/{good|anomaly}` beneath it.

mod common;

pub mod builder;
pub mod layout;
pub mod report;

pub use builder::*;
pub use layout::*;
pub use report::*;
