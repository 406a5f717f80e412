//! Paths inside a built dataset tree.

use crate::common::*;

/// The category holding defect-free samples.
pub const GOOD_CATEGORY: &str = "good";

/// The directory directly below the base that holds all objects.
pub const DATASET_DIR: &str = "dataset";

/// Replaces every whitespace character with `_`.
pub fn clean_folder_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect()
}

/// A top-level partition of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

/// The resolved directory tree of one object.
///
/// Object and anomaly names are stored in their cleaned form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    base_dir: PathBuf,
    object: String,
    anomalies: Vec<String>,
}

impl Layout {
    pub fn new<S>(base_dir: impl AsRef<Path>, object: &str, anomalies: &[S]) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let object = clean_folder_name(object.trim());
        ensure!(!object.is_empty(), "object name must not be empty");

        let anomalies: Vec<_> = anomalies
            .iter()
            .map(|name| clean_folder_name(name.as_ref().trim()))
            .filter(|name| !name.is_empty() && name != GOOD_CATEGORY)
            .unique()
            .collect();

        Ok(Self {
            base_dir: base_dir.as_ref().to_owned(),
            object,
            anomalies,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn anomalies(&self) -> &[String] {
        &self.anomalies
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.base_dir.join(DATASET_DIR)
    }

    pub fn object_dir(&self) -> PathBuf {
        self.dataset_dir().join(&self.object)
    }

    pub fn split_dir(&self, split: Split) -> PathBuf {
        self.object_dir().join(split.as_ref())
    }

    pub fn category_dir(&self, split: Split, category: &str) -> PathBuf {
        self.split_dir(split).join(clean_folder_name(category))
    }

    /// The categories of a split in creation order. Anomalies only exist in
    /// the test split.
    pub fn categories(&self, split: Split) -> Vec<&str> {
        let good = std::iter::once(GOOD_CATEGORY);
        match split {
            Split::Train => good.collect(),
            Split::Test => good
                .chain(self.anomalies.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Every directory of the tree, parents before children.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.base_dir.clone(), self.dataset_dir(), self.object_dir()];
        for split in Split::iter() {
            dirs.push(self.split_dir(split));
            dirs.extend(
                self.categories(split)
                    .into_iter()
                    .map(|category| self.category_dir(split, category)),
            );
        }
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_folder_name_replaces_whitespace() {
        assert_eq!(clean_folder_name("My Object"), "My_Object");
        assert_eq!(clean_folder_name("a\tb c"), "a_b_c");
        assert_eq!(clean_folder_name("plain"), "plain");
    }

    #[test]
    fn layout_paths() {
        let layout = Layout::new("/data", "My Object", &["Anom A", "scratch"]).unwrap();
        assert_eq!(layout.object(), "My_Object");
        assert_eq!(layout.anomalies(), ["Anom_A", "scratch"]);
        assert_eq!(
            layout.category_dir(Split::Test, "Anom A"),
            Path::new("/data/dataset/My_Object/test/Anom_A")
        );
        assert_eq!(
            layout.category_dir(Split::Train, GOOD_CATEGORY),
            Path::new("/data/dataset/My_Object/train/good")
        );
    }

    #[test]
    fn layout_directories_in_order() {
        let layout = Layout::new("base", "obj", &["a", "b"]).unwrap();
        let dirs = layout.directories();
        assert_eq!(dirs.len(), 9);
        assert_eq!(dirs[0], Path::new("base"));
        assert_eq!(dirs[4], Path::new("base/dataset/obj/train/good"));
        assert_eq!(dirs[8], Path::new("base/dataset/obj/test/b"));
    }

    #[test]
    fn layout_drops_duplicate_anomalies() {
        let layout = Layout::new("base", "obj", &["a b", "a_b", "good", " "]).unwrap();
        assert_eq!(layout.anomalies(), ["a_b"]);
    }

    #[test]
    fn layout_rejects_empty_object() {
        let anomalies: [&str; 0] = [];
        assert!(Layout::new("base", "  ", &anomalies).is_err());
    }
}
