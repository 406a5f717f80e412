//! Batch pre-resizing by center crop.

use crate::{common::*, source::*};

/// Crops the centred square of an image and resizes it to `size × size`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CenterCropResize {
    pub size: NonZeroU32,
}

impl CenterCropResize {
    pub fn new(size: u32) -> Result<Self> {
        let size = NonZeroU32::new(size).ok_or_else(|| format_err!("size must be positive"))?;
        Ok(Self { size })
    }

    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        let side = width.min(height);
        let left = (width - side) / 2;
        let top = (height - side) / 2;

        let square = imageops::crop_imm(image, left, top, side, side).to_image();
        let size = self.size.get();
        imageops::resize(&square, size, size, imageops::FilterType::Lanczos3)
    }

    /// Resizes every eligible image of `input_dir` into `output_dir`, keeping
    /// file names. Unreadable or unsupported files are skipped.
    ///
    /// The output directory must differ from the input directory.
    pub fn resize_dir(&self, input_dir: &Path, output_dir: &Path) -> Result<AugmentSummary> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create '{}'", output_dir.display()))?;
        let same_dir = fs::canonicalize(input_dir)
            .with_context(|| format!("failed to resolve '{}'", input_dir.display()))?
            == fs::canonicalize(output_dir)
                .with_context(|| format!("failed to resolve '{}'", output_dir.display()))?;
        ensure!(
            !same_dir,
            "refuse to resize '{}' in place, choose another output directory",
            input_dir.display()
        );
        let mut summary = AugmentSummary::default();

        for candidate in list_candidates(input_dir, None)? {
            let path = match candidate {
                Candidate::Eligible(path) => path,
                Candidate::AlreadyAugmented(_) => continue,
                Candidate::Skipped(path, reason) => {
                    warn!("skip '{}': {}", path.display(), reason);
                    summary.skip(path, reason);
                    continue;
                }
            };

            let image = match image::open(&path) {
                Ok(image) => image.to_rgb8(),
                Err(err) => {
                    error!("skip '{}': {}", path.display(), err);
                    summary.skip(path, SkipReason::Unreadable(err.to_string()));
                    continue;
                }
            };

            let output = output_dir.join(path.file_name().unwrap_or_default());
            self.apply(&image)
                .save(&output)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
            info!("resized '{}' to '{}'", path.display(), output.display());
            summary.add(
                path,
                ImageOutcome::Augmented {
                    outputs: vec![output],
                },
            );
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_crop_resize_landscape() {
        let image = RgbImage::from_fn(60, 20, |x, _| {
            if (20..40).contains(&x) {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let output = CenterCropResize::new(10).unwrap().apply(&image);
        assert_eq!(output.dimensions(), (10, 10));
        assert!(output.pixels().all(|pixel| pixel.0[0] > 200 && pixel.0[2] < 50));
    }

    #[test]
    fn center_crop_resize_rejects_zero() {
        assert!(CenterCropResize::new(0).is_err());
    }

    #[test]
    fn resize_dir_writes_squares() -> Result<()> {
        let input = tempfile::tempdir()?;
        let output = tempfile::tempdir()?;
        RgbImage::new(30, 50).save(input.path().join("tall.png"))?;
        fs::write(input.path().join("broken.png"), b"not a png")?;

        let summary = CenterCropResize::new(16)?.resize_dir(input.path(), output.path())?;
        assert_eq!(summary.sources, 1);
        assert_eq!(summary.skipped.len(), 1);

        let resized = image::open(output.path().join("tall.png"))?.to_rgb8();
        assert_eq!(resized.dimensions(), (16, 16));
        Ok(())
    }

    #[test]
    fn resize_dir_rejects_same_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("wide.png");
        RgbImage::new(50, 30).save(&source)?;

        let same = dir.path().join(".");
        assert!(CenterCropResize::new(16)?.resize_dir(dir.path(), &same).is_err());
        assert_eq!(image::open(&source)?.to_rgb8().dimensions(), (50, 30));
        Ok(())
    }
}
