use crate::common::*;

/// A directory that could not be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDir {
    pub path: PathBuf,
    pub error: String,
}

/// The directories touched by one [build](crate::Warehouse::build) call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub object: String,
    pub base_dir: PathBuf,
    pub created: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
    pub failed: Vec<FailedDir>,
}

impl BuildReport {
    pub fn new(object: &str, base_dir: &Path) -> Self {
        Self {
            object: object.to_owned(),
            base_dir: base_dir.to_owned(),
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn nothing_created(&self) -> bool {
        self.created.is_empty() && self.failed.is_empty()
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        match path.strip_prefix(&self.base_dir) {
            Ok(rel) if rel.as_os_str().is_empty() => path,
            Ok(rel) => rel,
            Err(_) => path,
        }
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nothing_created() {
            return write!(
                f,
                "Directory {} already exists. Nothing has been created.",
                self.object
            );
        }

        writeln!(f, "{} ({})", self.object, self.base_dir.display())?;
        for path in &self.created {
            writeln!(f, "  + {}", self.relative(path).display())?;
        }
        for path in &self.existing {
            writeln!(f, "  = {}", self.relative(path).display())?;
        }
        for FailedDir { path, error } in &self.failed {
            writeln!(f, "  ! {}: {}", self.relative(path).display(), error)?;
        }
        write!(
            f,
            "{} created, {} existing, {} failed",
            self.created.len(),
            self.existing.len(),
            self.failed.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nothing_created() {
        let mut report = BuildReport::new("obj", Path::new("base"));
        report.existing.push(PathBuf::from("base/dataset"));
        assert_eq!(
            report.to_string(),
            "Directory obj already exists. Nothing has been created."
        );
    }

    #[test]
    fn display_tree() {
        let mut report = BuildReport::new("obj", Path::new("base"));
        report.created.push(PathBuf::from("base/dataset/obj/test/scratch"));
        report.existing.push(PathBuf::from("base"));
        report.failed.push(FailedDir {
            path: PathBuf::from("base/dataset/obj/test/dent"),
            error: "denied".into(),
        });

        let text = report.to_string();
        assert!(text.contains("  + dataset/obj/test/scratch\n"));
        assert!(text.contains("  = base\n"));
        assert!(text.contains("  ! dataset/obj/test/dent: denied\n"));
        assert!(text.ends_with("1 created, 1 existing, 1 failed"));
    }
}
