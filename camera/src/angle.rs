use crate::common::*;

/// The viewpoint catalogue. An identifier in the camera order is an index
/// into this list.
pub const ANGLES: &[&str] = &[
    "cam_0_left",
    "cam_1_right",
    "cam_2_front",
    "cam_3_front_left",
    "cam_4_front_right",
    "cam_5_back",
    "cam_6_back_left",
    "cam_7_back_right",
    "cam_8_top",
    "cam_9_top_left",
    "cam_10_top_right",
];

/// What a device index is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Angle(&'static str),
    Skip,
}

impl Slot {
    pub fn angle(&self) -> Option<&'static str> {
        match *self {
            Self::Angle(angle) => Some(angle),
            Self::Skip => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Angle(angle) => write!(f, "{}", angle),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Device index to slot, ordered by device index.
pub type AngleAssignment = BTreeMap<usize, Slot>;

/// Looks up the angle for an identifier such as `"3"`.
pub fn angle_for_identifier(identifier: &str) -> Result<&'static str> {
    let index: usize = identifier
        .trim()
        .parse()
        .with_context(|| format!("camera identifier '{}' is not an angle index", identifier))?;
    ANGLES.get(index).copied().ok_or_else(|| {
        format_err!(
            "camera identifier {} is out of range, expect 0..{}",
            index,
            ANGLES.len()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_map_to_catalogue() {
        assert_eq!(angle_for_identifier("0").unwrap(), "cam_0_left");
        assert_eq!(angle_for_identifier("10").unwrap(), "cam_10_top_right");
        assert!(angle_for_identifier("11").is_err());
        assert!(angle_for_identifier("front").is_err());
    }
}
