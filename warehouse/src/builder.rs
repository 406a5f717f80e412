use crate::{common::*, layout::Layout, report::*};

/// The directory name used by [Warehouse::in_current_dir].
pub const DEFAULT_BASE_DIR: &str = "data_warehouse";

/// Builds dataset trees below a base directory.
///
/// Building never deletes or overwrites. Existing directories are kept and
/// reported as such.
#[derive(Debug)]
pub struct Warehouse {
    base_dir: PathBuf,
    layout: Option<Layout>,
    report: Option<BuildReport>,
}

impl Warehouse {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_owned(),
            layout: None,
            report: None,
        }
    }

    /// A warehouse at `./data_warehouse`.
    pub fn in_current_dir() -> Result<Self> {
        let cwd = env::current_dir().context("failed to get the working directory")?;
        Ok(Self::new(cwd.join(DEFAULT_BASE_DIR)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The layout of the last build.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// The report of the last build.
    pub fn report(&self) -> Option<&BuildReport> {
        self.report.as_ref()
    }

    /// Creates the tree for `object` and its anomaly categories.
    ///
    /// Only an invalid object name is an error. A directory that cannot be
    /// created is logged and recorded in the report, and the remaining
    /// directories are still attempted.
    pub fn build<S>(&mut self, object: &str, anomalies: &[S]) -> Result<&Layout>
    where
        S: AsRef<str>,
    {
        let layout = Layout::new(&self.base_dir, object, anomalies)?;
        let mut report = BuildReport::new(layout.object(), &self.base_dir);

        for dir in layout.directories() {
            if dir.is_dir() {
                report.existing.push(dir);
                continue;
            }

            match fs::create_dir_all(&dir) {
                Ok(()) => report.created.push(dir),
                Err(err) => {
                    error!("failed to create '{}': {}", dir.display(), err);
                    report.failed.push(FailedDir {
                        path: dir,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!("{}", report);
        self.report = Some(report);
        Ok(self.layout.insert(layout))
    }
}
