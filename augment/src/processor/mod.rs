//! The randomized transform steps of the augmentation chain.

use crate::{common::*, record::*};

pub mod chain;
pub mod exposure;
pub mod gaussian_blur;
pub mod lens_distortion;
pub mod mirror;
pub mod pixel_dropout;
pub mod rotation;
pub mod white_balance;

pub use chain::*;
pub use exposure::*;
pub use gaussian_blur::*;
pub use lens_distortion::*;
pub use mirror::*;
pub use pixel_dropout::*;
pub use rotation::*;
pub use white_balance::*;

/// A single randomized step applied in place to an image.
pub trait Transform: Debug + Send + Sync {
    fn kind(&self) -> TransformKind;

    /// Draws fresh parameters from `rng`, transforms `image` in place and
    /// returns the drawn parameters.
    fn forward(&self, image: &mut RgbImage, rng: &mut StdRng) -> Result<AugmentationRecord>;
}

/// Samples `low + (high - low) * u` with `u` drawn from `[0, 1)`.
///
/// Reversed bounds are accepted and sample the same interval.
pub fn uniform<R>(rng: &mut R, low: f64, high: f64) -> f64
where
    R: Rng + ?Sized,
{
    low + (high - low) * rng.gen::<f64>()
}

/// Scales a subpixel, rounding and saturating to the 8-bit range.
/// Negative products saturate to zero.
pub(crate) fn scale_saturate(value: u8, factor: f64) -> u8 {
    (value as f64 * factor).round().clamp(0.0, 255.0) as u8
}

/// Like [scale_saturate], but takes the absolute value before saturating.
pub(crate) fn scale_saturate_abs(value: u8, factor: f64) -> u8 {
    (value as f64 * factor).abs().round().clamp(0.0, 255.0) as u8
}

pub(crate) const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_accepts_reversed_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        (0..1000).for_each(|_| {
            let value = uniform(&mut rng, 1.5, 0.5);
            assert!((0.5..=1.5).contains(&value));
        });
    }

    #[test]
    fn scale_saturate_never_wraps() {
        assert_eq!(scale_saturate(250, 1.2), 255);
        assert_eq!(scale_saturate(10, 0.0), 0);
        assert_eq!(scale_saturate(100, 0.5), 50);
        assert_eq!(scale_saturate(100, -0.9), 0);
        assert_eq!(scale_saturate_abs(100, -0.9), 90);
    }
}
