//! Random rotation about the image centre.

use super::*;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Rotates by `U(-|t| + 1, |t| - 1) + (|t| mod 3)` degrees, counter-clockwise
/// for positive angles.
///
/// The canvas keeps its size and uncovered corners are filled with black.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    degree_range: (f64, f64),
    offset: f64,
}

impl Rotation {
    pub fn from_temperature(temperature: f64) -> Self {
        let magnitude = temperature.abs();

        Self {
            degree_range: (1.0 - magnitude, magnitude - 1.0),
            offset: magnitude % 3.0,
        }
    }

    /// The closed interval of angles in degrees this transform can draw.
    pub fn degree_bounds(&self) -> (f64, f64) {
        let (low, high) = self.degree_range;
        (low.min(high) + self.offset, low.max(high) + self.offset)
    }

    /// Rotates by a fixed angle in degrees with bilinear resampling.
    pub fn apply(image: &mut RgbImage, degrees: f64) {
        // imageproc rotates clockwise for positive angles
        let theta = -(degrees.to_radians() as f32);
        *image = rotate_about_center(image, theta, Interpolation::Bilinear, BLACK);
    }
}

impl Transform for Rotation {
    fn kind(&self) -> TransformKind {
        TransformKind::Rotation
    }

    fn forward(&self, image: &mut RgbImage, rng: &mut StdRng) -> Result<AugmentationRecord> {
        let (low, high) = self.degree_range;
        let degrees = uniform(rng, low, high) + self.offset;
        Self::apply(image, degrees);
        Ok(AugmentationRecord::Rotation { degrees })
    }
}
