//! Random exposure that never lands near the identity.

use super::*;

/// The maximum number of draws before the exposure band is treated as a
/// configuration error.
pub const MAX_EXPOSURE_ATTEMPTS: usize = 1000;

/// Multiplies every subpixel by a factor drawn outside the no-op band.
///
/// Factors are drawn from `U(1 - |0.1 t|, 1) + 0.1 t` and redrawn while they
/// fall in `[1 - |0.01 t|, 1 + |0.04 t|]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Exposure {
    sample_range: (f64, f64),
    bias: f64,
    band: (f64, f64),
}

impl Exposure {
    pub fn from_temperature(temperature: f64) -> Self {
        Self {
            sample_range: (1.0 - (temperature * 0.1).abs(), 1.0),
            bias: temperature * 0.1,
            band: (
                1.0 - (temperature * 0.01).abs(),
                1.0 + (temperature * 0.04).abs(),
            ),
        }
    }

    /// The closed interval of factors that are rejected.
    pub fn no_op_band(&self) -> (f64, f64) {
        self.band
    }

    pub fn in_band(&self, factor: f64) -> bool {
        let (lower, upper) = self.band;
        lower <= factor && factor <= upper
    }

    /// Fails if every factor the sampler can produce lies in the no-op band.
    pub fn check_feasible(&self) -> Result<()> {
        let (low, high) = self.sample_range;
        let min = low.min(high) + self.bias;
        let max = low.max(high) + self.bias;
        let (lower, upper) = self.band;

        ensure!(
            min < lower || max > upper,
            "exposure sampling range [{:.4}, {:.4}] lies inside the no-op band [{:.4}, {:.4}]",
            min,
            max,
            lower,
            upper
        );
        Ok(())
    }

    /// Applies a fixed factor, saturating to the 8-bit range. Negative
    /// factors give black.
    pub fn apply(image: &mut RgbImage, factor: f64) {
        image
            .iter_mut()
            .for_each(|value| *value = scale_saturate(*value, factor));
    }

    fn sample(&self, rng: &mut StdRng) -> Result<f64> {
        let (low, high) = self.sample_range;

        for _ in 0..MAX_EXPOSURE_ATTEMPTS {
            let factor = uniform(rng, low, high) + self.bias;
            if !self.in_band(factor) {
                return Ok(factor);
            }
        }

        let (lower, upper) = self.band;
        bail!(
            "no exposure factor outside [{:.4}, {:.4}] after {} draws",
            lower,
            upper,
            MAX_EXPOSURE_ATTEMPTS
        )
    }
}

impl Transform for Exposure {
    fn kind(&self) -> TransformKind {
        TransformKind::Exposure
    }

    fn forward(&self, image: &mut RgbImage, rng: &mut StdRng) -> Result<AugmentationRecord> {
        let factor = self.sample(rng)?;
        Self::apply(image, factor);
        Ok(AugmentationRecord::Exposure { factor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn exposure_factor_outside_band() {
        let exposure = Exposure::from_temperature(1.0);
        let (lower, upper) = exposure.no_op_band();
        assert_abs_diff_eq!(lower, 0.99);
        assert_abs_diff_eq!(upper, 1.04);

        let mut rng = StdRng::seed_from_u64(42);
        let mut image = RgbImage::new(4, 4);

        for _ in 0..1000 {
            match exposure.forward(&mut image, &mut rng).unwrap() {
                AugmentationRecord::Exposure { factor } => {
                    assert!(!(0.99..=1.04).contains(&factor), "factor {}", factor);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn exposure_negative_temperature_underexposes() {
        let exposure = Exposure::from_temperature(-2.0);
        exposure.check_feasible().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut image = RgbImage::new(4, 4);

        for _ in 0..100 {
            match exposure.forward(&mut image, &mut rng).unwrap() {
                AugmentationRecord::Exposure { factor } => assert!(factor < 0.98),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn exposure_zero_temperature_is_rejected() {
        let exposure = Exposure::from_temperature(0.0);
        assert!(exposure.check_feasible().is_err());

        let mut rng = StdRng::seed_from_u64(0);
        let mut image = RgbImage::new(2, 2);
        assert!(exposure.forward(&mut image, &mut rng).is_err());
    }

    #[test]
    fn exposure_clamps_overexposed_pixels() {
        let mut image = RgbImage::from_pixel(3, 3, Rgb([200, 100, 0]));
        Exposure::apply(&mut image, 1.5);
        assert!(image.pixels().all(|pixel| pixel.0 == [255, 150, 0]));
    }

    #[test]
    fn exposure_negative_factor_clamps_to_black() {
        let exposure = Exposure::from_temperature(-15.0);
        exposure.check_feasible().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut image = RgbImage::from_pixel(3, 3, Rgb([100, 100, 100]));

        match exposure.forward(&mut image, &mut rng).unwrap() {
            AugmentationRecord::Exposure { factor } => assert!(factor < 0.0),
            _ => unreachable!(),
        }
        assert!(image.pixels().all(|pixel| pixel.0 == [0, 0, 0]));
    }
}
