//! Random per-channel white balance, biased toward a warm cast by temperature.

use super::*;

/// Scales the red, green and blue channels by independent random factors.
///
/// The red lower bound moves up and the green and blue lower bounds move down
/// as temperature grows.
#[derive(Debug, Clone, PartialEq)]
pub struct WhiteBalance {
    red_range: (f64, f64),
    green_range: (f64, f64),
    blue_range: (f64, f64),
}

impl WhiteBalance {
    pub fn from_temperature(temperature: f64) -> Self {
        let shift = temperature * 0.02;

        Self {
            red_range: (0.98 + shift, 1.02),
            green_range: (0.98 - shift, 1.02),
            blue_range: (0.98 - shift, 1.02),
        }
    }

    pub fn red_range(&self) -> (f64, f64) {
        self.red_range
    }

    pub fn green_range(&self) -> (f64, f64) {
        self.green_range
    }

    pub fn blue_range(&self) -> (f64, f64) {
        self.blue_range
    }

    /// Applies fixed channel factors.
    pub fn apply(image: &mut RgbImage, red: f64, green: f64, blue: f64) {
        image.pixels_mut().for_each(|pixel| {
            let Rgb([r, g, b]) = *pixel;
            *pixel = Rgb([
                scale_saturate_abs(r, red),
                scale_saturate_abs(g, green),
                scale_saturate_abs(b, blue),
            ]);
        });
    }
}

impl Transform for WhiteBalance {
    fn kind(&self) -> TransformKind {
        TransformKind::WhiteBalance
    }

    fn forward(&self, image: &mut RgbImage, rng: &mut StdRng) -> Result<AugmentationRecord> {
        let red = uniform(rng, self.red_range.0, self.red_range.1);
        let green = uniform(rng, self.green_range.0, self.green_range.1);
        let blue = uniform(rng, self.blue_range.0, self.blue_range.1);

        Self::apply(image, red, green, blue);

        Ok(AugmentationRecord::WhiteBalance { red, green, blue })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn white_balance_ranges_follow_temperature() {
        let wb = WhiteBalance::from_temperature(1.0);
        assert_abs_diff_eq!(wb.red_range().0, 1.0);
        assert_abs_diff_eq!(wb.green_range().0, 0.96);
        assert_abs_diff_eq!(wb.blue_range().0, 0.96);
        assert_abs_diff_eq!(wb.blue_range().1, 1.02);
    }

    #[test]
    fn white_balance_saturates_bright_pixels() {
        // red factor is at least 1.02 at this temperature
        let wb = WhiteBalance::from_temperature(10.0);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            let mut image = RgbImage::from_pixel(8, 8, Rgb([254, 128, 3]));
            let record = wb.forward(&mut image, &mut rng).unwrap();
            let red = match record {
                AugmentationRecord::WhiteBalance { red, .. } => red,
                _ => unreachable!(),
            };
            assert!(red >= 1.02);
            assert!(image.pixels().all(|pixel| pixel.0[0] == 255));
        }
    }

    #[test]
    fn white_balance_scales_channels_independently() {
        let mut image = RgbImage::from_pixel(2, 2, Rgb([100, 100, 100]));
        WhiteBalance::apply(&mut image, 1.1, 1.0, 0.5);
        assert!(image.pixels().all(|pixel| pixel.0 == [110, 100, 50]));
    }
}
