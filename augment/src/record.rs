//! Sampled parameters of a single transform application.

use crate::common::*;

/// The transform steps of the augmentation chain, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransformKind {
    WhiteBalance,
    Exposure,
    Rotation,
    Mirror,
    LensDistortion,
    GaussianBlur,
    PixelDropout,
}

/// The parameters actually drawn by one transform on one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AugmentationRecord {
    WhiteBalance { red: f64, green: f64, blue: f64 },
    Exposure { factor: f64 },
    Rotation { degrees: f64 },
    Mirror { flipped: bool },
    LensDistortion { scale_x: f64, scale_y: f64 },
    GaussianBlur { sigma: f64 },
    PixelDropout { count: usize },
}

impl AugmentationRecord {
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::WhiteBalance { .. } => TransformKind::WhiteBalance,
            Self::Exposure { .. } => TransformKind::Exposure,
            Self::Rotation { .. } => TransformKind::Rotation,
            Self::Mirror { .. } => TransformKind::Mirror,
            Self::LensDistortion { .. } => TransformKind::LensDistortion,
            Self::GaussianBlur { .. } => TransformKind::GaussianBlur,
            Self::PixelDropout { .. } => TransformKind::PixelDropout,
        }
    }
}

impl fmt::Display for AugmentationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::WhiteBalance { red, green, blue } => {
                write!(f, "RGB vals: R: {:.3}, G: {:.3}, B: {:.3}", red, green, blue)
            }
            Self::Exposure { factor } => write!(f, "Exposure: {:.5}", factor),
            Self::Rotation { degrees } => write!(f, "Rotation: {:.5}", degrees),
            Self::Mirror { flipped } => write!(f, "Mirrored: {}", flipped),
            Self::LensDistortion { scale_x, scale_y } => {
                write!(f, "Perspect: x={:.5}, y={:.5}", scale_x, scale_y)
            }
            Self::GaussianBlur { sigma } => write!(f, "Blur rad: {:.5}", sigma),
            Self::PixelDropout { count } => write!(f, "Dropped pixels: {}", count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kind_matches_variant() {
        let record = AugmentationRecord::LensDistortion {
            scale_x: 1.0,
            scale_y: 0.98,
        };
        assert_eq!(record.kind(), TransformKind::LensDistortion);
        assert_eq!(record.kind().as_ref(), "lens_distortion");
    }

    #[test]
    fn record_display() {
        let record = AugmentationRecord::WhiteBalance {
            red: 1.0,
            green: 0.98765,
            blue: 1.01,
        };
        assert_eq!(record.to_string(), "RGB vals: R: 1.000, G: 0.988, B: 1.010");
        assert_eq!(
            AugmentationRecord::Mirror { flipped: true }.to_string(),
            "Mirrored: true"
        );
    }
}
