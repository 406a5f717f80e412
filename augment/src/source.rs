//! Source file selection and the outcome bookkeeping of a batch.

use crate::common::*;

/// File names containing this marker are variants and never used as input.
pub const AUGMENTED_MARKER: &str = "_aug_";

/// Accepted source extensions, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Why a file was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedExtension,
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedExtension => write!(f, "unsupported file type"),
            Self::Unreadable(reason) => write!(f, "unreadable image: {}", reason),
        }
    }
}

/// The classification of one directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Eligible(PathBuf),
    AlreadyAugmented(PathBuf),
    Skipped(PathBuf, SkipReason),
}

pub fn is_augmented(file_name: &str) -> bool {
    file_name.contains(AUGMENTED_MARKER)
}

pub fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

pub fn classify(path: PathBuf) -> Candidate {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if is_augmented(&file_name) {
        Candidate::AlreadyAugmented(path)
    } else if !has_allowed_extension(&path) {
        Candidate::Skipped(path, SkipReason::UnsupportedExtension)
    } else {
        Candidate::Eligible(path)
    }
}

/// Lists the regular files of `dir` sorted by name and classifies them.
///
/// If `selected` is given, only files with those names are considered.
/// Entries that cannot be read are logged and left out.
pub fn list_candidates(dir: &Path, selected: Option<&[String]>) -> Result<Vec<Candidate>> {
    let paths: Vec<PathBuf> = match selected {
        Some(names) => names.iter().map(|name| dir.join(name)).collect(),
        None => read_sorted_dir(dir)?
            .into_iter()
            .filter(|path| path.is_file())
            .collect(),
    };

    Ok(paths.into_iter().map(classify).collect())
}

/// Lists the immediate subdirectories of `dir` sorted by name.
pub fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_sorted_dir(dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect())
}

fn read_sorted_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory '{}'", dir.display()))?;

    let paths = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(err) => {
                error!("skip unreadable entry in '{}': {}", dir.display(), err);
                None
            }
        })
        .sorted()
        .collect();
    Ok(paths)
}

/// A file left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// The outcome of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Augmented { outputs: Vec<PathBuf> },
    Skipped(SkipReason),
}

/// The totals of an augmentation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AugmentSummary {
    pub sources: usize,
    pub variants: usize,
    pub outputs: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

impl AugmentSummary {
    pub fn add(&mut self, path: PathBuf, outcome: ImageOutcome) {
        match outcome {
            ImageOutcome::Augmented { outputs } => {
                self.sources += 1;
                self.variants += outputs.len();
                self.outputs.extend(outputs);
            }
            ImageOutcome::Skipped(reason) => self.skip(path, reason),
        }
    }

    pub fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        self.skipped.push(SkippedFile { path, reason });
    }

    pub fn merge(&mut self, other: AugmentSummary) {
        self.sources += other.sources;
        self.variants += other.variants;
        self.outputs.extend(other.outputs);
        self.skipped.extend(other.skipped);
    }
}
