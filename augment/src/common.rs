//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use chrono::Local;
pub use image::{imageops, ImageFormat, Rgb, RgbImage};
pub use itertools::Itertools as _;
pub use log::{debug, error, info, warn};
pub use noisy_float::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Cow,
    cmp::Ordering,
    ffi::OsStr,
    fmt,
    fmt::Debug,
    fs,
    io::{self, LineWriter, Write as _},
    num::{NonZeroU32, NonZeroUsize},
    path::{Path, PathBuf},
    sync::Mutex,
};
pub use strum::{AsRefStr, Display, EnumString};
