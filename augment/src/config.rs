//! Augmenter construction options.

use crate::{augmenter::Augmenter, common::*, log_file::AugmentLog, processor::TransformChain};

/// The image encoding of written variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

/// Options to build an [Augmenter].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmenterInit {
    /// The number of variants produced per source image.
    pub num_augmented_images: NonZeroUsize,
    /// Biases the magnitude and skew of every randomized transform.
    pub temperature: R64,
    /// Seeds the random generator. A seed is drawn from entropy if unset.
    pub seed: Option<u64>,
    /// Appends sampled parameters to `log_file` if set.
    pub logging_enabled: bool,
    pub log_file: PathBuf,
    pub output_format: OutputFormat,
    /// Appends pixel dropout to the end of the chain.
    pub pixel_dropout: bool,
}

impl Default for AugmenterInit {
    fn default() -> Self {
        Self {
            num_augmented_images: NonZeroUsize::new(3).unwrap(),
            temperature: r64(1.0),
            seed: None,
            logging_enabled: true,
            log_file: PathBuf::from("./data_augmentation.log"),
            output_format: OutputFormat::Png,
            pixel_dropout: false,
        }
    }
}

impl AugmenterInit {
    /// Loads options from a JSON5 file.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let init = json5::from_str(&text)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        Ok(init)
    }

    pub fn build(self) -> Result<Augmenter> {
        let Self {
            num_augmented_images,
            temperature,
            seed,
            logging_enabled,
            log_file,
            output_format,
            pixel_dropout,
        } = self;

        let temperature = temperature.raw();
        ensure!(temperature.is_finite(), "temperature must be finite");

        let chain = TransformChain::from_temperature(temperature, pixel_dropout)?;
        let seed = seed.unwrap_or_else(|| StdRng::from_entropy().gen());
        let log = if logging_enabled {
            AugmentLog::open(&log_file)?
        } else {
            AugmentLog::disabled()
        };

        Ok(Augmenter::new(
            num_augmented_images.get(),
            temperature,
            seed,
            output_format,
            chain,
            log,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn augmenter_init_defaults() {
        let init = AugmenterInit::default();
        assert_eq!(init.num_augmented_images.get(), 3);
        assert_eq!(init.temperature, r64(1.0));
        assert!(init.logging_enabled);
        assert_eq!(init.output_format, OutputFormat::Png);
    }

    #[test]
    fn augmenter_init_from_json5() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("augment.json5");
        fs::write(
            &path,
            r#"{
                // partial configs fall back to defaults
                num_augmented_images: 5,
                temperature: 0.5,
                seed: 17,
                output_format: "jpeg",
            }"#,
        )?;

        let init = AugmenterInit::open(&path)?;
        assert_eq!(init.num_augmented_images.get(), 5);
        assert_eq!(init.temperature, r64(0.5));
        assert_eq!(init.seed, Some(17));
        assert_eq!(init.output_format, OutputFormat::Jpeg);
        assert!(!init.pixel_dropout);
        Ok(())
    }

    #[test]
    fn output_format_names() {
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert!("bmp".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn augmenter_init_rejects_zero_count() {
        let text = r#"{ num_augmented_images: 0 }"#;
        assert!(json5::from_str::<AugmenterInit>(text).is_err());
    }

    #[test]
    fn augmenter_init_rejects_zero_temperature() {
        let init = AugmenterInit {
            temperature: r64(0.0),
            logging_enabled: false,
            ..Default::default()
        };
        assert!(init.build().is_err());
    }
}
