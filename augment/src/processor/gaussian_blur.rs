//! Random gaussian blur.

use super::*;
use imageproc::filter::gaussian_blur_f32;

/// Sigmas below this leave the image untouched.
pub const MIN_BLUR_SIGMA: f64 = 1e-3;

/// Blurs with a sigma drawn from `U(0, max_sigma)`, independent of
/// temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianBlur {
    max_sigma: f64,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self { max_sigma: 1.0 }
    }
}

impl GaussianBlur {
    pub fn apply(image: &mut RgbImage, sigma: f64) {
        if sigma < MIN_BLUR_SIGMA {
            return;
        }
        *image = gaussian_blur_f32(image, sigma as f32);
    }
}

impl Transform for GaussianBlur {
    fn kind(&self) -> TransformKind {
        TransformKind::GaussianBlur
    }

    fn forward(&self, image: &mut RgbImage, rng: &mut StdRng) -> Result<AugmentationRecord> {
        let sigma = uniform(rng, 0.0, self.max_sigma);
        Self::apply(image, sigma);
        Ok(AugmentationRecord::GaussianBlur { sigma })
    }
}
