//! Random pixel dropout.

use super::*;

/// The largest share of pixels ever dropped.
pub const MAX_DROPOUT_FRACTION: f64 = 0.05;

/// Sets a random subset of pixels to black. The dropped share is
/// `min(0.001 |t|, 0.05)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelDropout {
    fraction: f64,
}

impl PixelDropout {
    pub fn from_temperature(temperature: f64) -> Self {
        Self {
            fraction: (temperature.abs() * 0.001).min(MAX_DROPOUT_FRACTION),
        }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl Transform for PixelDropout {
    fn kind(&self) -> TransformKind {
        TransformKind::PixelDropout
    }

    fn forward(&self, image: &mut RgbImage, rng: &mut StdRng) -> Result<AugmentationRecord> {
        let (width, height) = image.dimensions();
        let num_pixels = width as usize * height as usize;
        let count = (num_pixels as f64 * self.fraction).round() as usize;

        rand::seq::index::sample(rng, num_pixels, count)
            .into_iter()
            .for_each(|index| {
                let x = (index % width as usize) as u32;
                let y = (index / width as usize) as u32;
                image.put_pixel(x, y, BLACK);
            });

        Ok(AugmentationRecord::PixelDropout { count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_dropout_blackens_expected_count() {
        let dropout = PixelDropout::from_temperature(10.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut image = RgbImage::from_pixel(100, 50, Rgb([200, 200, 200]));

        let record = dropout.forward(&mut image, &mut rng).unwrap();
        assert_eq!(record, AugmentationRecord::PixelDropout { count: 50 });
        let black = image.pixels().filter(|&&pixel| pixel == BLACK).count();
        assert_eq!(black, 50);
    }

    #[test]
    fn pixel_dropout_fraction_is_capped() {
        assert_eq!(
            PixelDropout::from_temperature(1000.0).fraction(),
            MAX_DROPOUT_FRACTION
        );
    }
}
