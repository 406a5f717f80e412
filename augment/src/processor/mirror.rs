//! Random horizontal flip.

use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Mirror {
    probability: f64,
}

impl Default for Mirror {
    fn default() -> Self {
        Self { probability: 0.5 }
    }
}

impl Mirror {
    pub fn flip(image: &mut RgbImage) {
        imageops::flip_horizontal_in_place(image);
    }
}

impl Transform for Mirror {
    fn kind(&self) -> TransformKind {
        TransformKind::Mirror
    }

    fn forward(&self, image: &mut RgbImage, rng: &mut StdRng) -> Result<AugmentationRecord> {
        let flipped = rng.gen::<f64>() < self.probability;
        if flipped {
            Self::flip(image);
        }
        Ok(AugmentationRecord::Mirror { flipped })
    }
}
