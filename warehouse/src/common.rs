//! Common imports from external crates.

pub use anyhow::{ensure, Context as _, Result};
pub use itertools::Itertools as _;
pub use log::{error, info};
pub use std::{
    env, fmt, fs, io,
    path::{Path, PathBuf},
};
pub use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator as _};
