//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Result};
pub use derivative::Derivative;
pub use image::RgbImage;
pub use indexmap::IndexMap;
pub use log::{error, info, warn};
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::BTreeMap,
    fmt, fs,
    io::{self, BufRead as _, Write as _},
    path::{Path, PathBuf},
};
pub use strum::{AsRefStr, Display};
