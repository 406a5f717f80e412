//! Random horizontal and vertical scale distortion.

use super::*;
use imageproc::geometric_transformations::{warp, Interpolation, Projection};

/// Approximates lens-curvature variation with an independent affine scale
/// per axis, anchored at the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LensDistortion {
    scale_range: (f64, f64),
}

impl LensDistortion {
    pub fn from_temperature(temperature: f64) -> Self {
        let widen = temperature.abs() * 0.02;
        Self {
            scale_range: (0.99 - widen, 1.01 + widen),
        }
    }

    pub fn scale_range(&self) -> (f64, f64) {
        self.scale_range
    }

    pub fn apply(image: &mut RgbImage, scale_x: f64, scale_y: f64) {
        let projection = Projection::scale(scale_x as f32, scale_y as f32);
        *image = warp(image, &projection, Interpolation::Bilinear, BLACK);
    }
}

impl Transform for LensDistortion {
    fn kind(&self) -> TransformKind {
        TransformKind::LensDistortion
    }

    fn forward(&self, image: &mut RgbImage, rng: &mut StdRng) -> Result<AugmentationRecord> {
        let (low, high) = self.scale_range;
        let scale_x = uniform(rng, low, high);
        let scale_y = uniform(rng, low, high);
        Self::apply(image, scale_x, scale_y);
        Ok(AugmentationRecord::LensDistortion { scale_x, scale_y })
    }
}
