//! Synthetic multiplication of "good" anomaly-detection samples.
//!
//! The [Augmenter](augmenter::Augmenter) runs every eligible source image
//! through a fixed chain of randomized photometric and geometric transforms
//! and writes the variants as `{stem}_aug_{i}` next to their sources.

mod common;

pub mod augmenter;
pub mod config;
pub mod log_file;
pub mod processor;
pub mod record;
pub mod resize;
pub mod source;

pub use augmenter::*;
pub use config::*;
pub use log_file::*;
pub use record::*;
pub use resize::*;
pub use source::*;
