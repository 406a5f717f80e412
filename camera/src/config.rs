//! The `camera_config.json` document.

use crate::{angle::*, common::*};

/// The key that collects device indices excluded from capture.
pub const SKIP_KEY: &str = "skip";

/// The default file name of the camera configuration.
pub const DEFAULT_CAMERA_CONFIG: &str = "camera_config.json";

const ORDER_KEY: &str = "Camera Order";
const SETTINGS_KEY: &str = "CameraSettings";

/// The video I/O backend used to open devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureBackend {
    Any,
    DirectShow,
}

impl CaptureBackend {
    /// DirectShow on Windows, auto-selection elsewhere.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "windows") {
            Self::DirectShow
        } else {
            Self::Any
        }
    }
}

impl Default for CaptureBackend {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Device properties applied when a camera is opened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(rename = "Camera Exposure", default)]
    pub exposure: i32,
    #[serde(
        rename = "Camera Color Temperature",
        default = "default_color_temperature"
    )]
    pub color_temperature: i32,
    #[serde(rename = "Camera Zoom", default)]
    pub zoom: i32,
    #[serde(rename = "Frame Width", default = "default_frame_size")]
    pub frame_width: u32,
    #[serde(rename = "Frame Height", default = "default_frame_size")]
    pub frame_height: u32,
}

fn default_color_temperature() -> i32 {
    3000
}

fn default_frame_size() -> u32 {
    640
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            exposure: 0,
            color_temperature: default_color_temperature(),
            zoom: 0,
            frame_width: default_frame_size(),
            frame_height: default_frame_size(),
        }
    }
}

/// A value of the camera order map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderEntry {
    Device(usize),
    Devices(Vec<usize>),
}

impl OrderEntry {
    pub fn devices(&self) -> &[usize] {
        match self {
            Self::Device(index) => std::slice::from_ref(index),
            Self::Devices(indices) => indices,
        }
    }
}

/// Which physical device looks from which angle, plus the shared device
/// settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Identifier to device index. The identifier is an index into
    /// [ANGLES]. The `"skip"` entry lists devices left out of capture.
    #[serde(rename = "Camera Order", default)]
    pub camera_order: IndexMap<String, OrderEntry>,
    #[serde(rename = "CameraSettings", default)]
    pub settings: CameraSettings,
}

impl CameraConfig {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        Ok(config)
    }

    /// Loads `path`, or the default configuration with a warning if the file
    /// does not exist.
    pub fn open_or_default<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            warn!(
                "{} not found, using default camera settings",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Writes the camera order and settings into `path`, keeping any other
    /// top-level keys of an existing file.
    pub fn save<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut doc = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            match serde_json::from_str::<serde_json::Value>(&text)
                .with_context(|| format!("failed to parse '{}'", path.display()))?
            {
                serde_json::Value::Object(map) => map,
                _ => bail!("'{}' is not a JSON object", path.display()),
            }
        } else {
            serde_json::Map::new()
        };

        doc.insert(
            ORDER_KEY.into(),
            serde_json::to_value(&self.camera_order)?,
        );
        doc.insert(SETTINGS_KEY.into(), serde_json::to_value(&self.settings)?);

        let text = serde_json::to_string_pretty(&doc)?;
        fs::write(path, text).with_context(|| format!("failed to write '{}'", path.display()))?;
        info!("camera configuration saved to {}", path.display());
        Ok(())
    }

    /// Assigns `identifier` to a device. An identifier of `"skip"` appends the
    /// device to the skip list.
    pub fn assign(&mut self, identifier: &str, device: usize) -> Result<()> {
        if identifier.eq_ignore_ascii_case(SKIP_KEY) {
            let entry = self
                .camera_order
                .entry(SKIP_KEY.to_string())
                .or_insert_with(|| OrderEntry::Devices(vec![]));
            let mut devices = entry.devices().to_vec();
            if !devices.contains(&device) {
                devices.push(device);
            }
            *entry = OrderEntry::Devices(devices);
        } else {
            angle_for_identifier(identifier)?;
            self.camera_order
                .insert(identifier.trim().to_string(), OrderEntry::Device(device));
        }
        Ok(())
    }

    /// Maps device indices to angles or skips.
    ///
    /// Fails on identifiers outside the catalogue, on a list under an angle
    /// identifier and on a device claimed twice.
    pub fn angle_assignment(&self) -> Result<AngleAssignment> {
        let mut assignment = AngleAssignment::new();

        for (identifier, entry) in &self.camera_order {
            let (slot, devices) = if identifier.eq_ignore_ascii_case(SKIP_KEY) {
                (Slot::Skip, entry.devices())
            } else {
                let angle = angle_for_identifier(identifier)?;
                let device = match entry {
                    OrderEntry::Device(device) => device,
                    OrderEntry::Devices(_) => {
                        bail!("camera identifier '{}' maps to a list of devices", identifier)
                    }
                };
                (Slot::Angle(angle), std::slice::from_ref(device))
            };

            for &device in devices {
                if let Some(prev) = assignment.insert(device, slot) {
                    bail!(
                        "device {} is assigned twice, as {} and as {}",
                        device,
                        prev,
                        slot
                    );
                }
            }
        }

        Ok(assignment)
    }

    /// The devices used for capture and their angles, in device order.
    pub fn active_angles(&self) -> Result<Vec<(usize, &'static str)>> {
        Ok(self
            .angle_assignment()?
            .into_iter()
            .filter_map(|(device, slot)| Some((device, slot.angle()?)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "Camera Order": {"2": 0, "0": 1, "skip": [2, 3]},
        "CameraSettings": {"Camera Exposure": -6, "Camera Color Temperature": 4000}
    }"#;

    #[test]
    fn parse_camera_config() -> Result<()> {
        let config: CameraConfig = serde_json::from_str(DOC)?;
        assert_eq!(config.settings.exposure, -6);
        assert_eq!(config.settings.color_temperature, 4000);
        assert_eq!(config.settings.zoom, 0);
        assert_eq!(config.settings.frame_width, 640);

        let assignment = config.angle_assignment()?;
        assert_eq!(assignment[&0], Slot::Angle("cam_2_front"));
        assert_eq!(assignment[&1], Slot::Angle("cam_0_left"));
        assert_eq!(assignment[&2], Slot::Skip);
        assert_eq!(assignment[&3], Slot::Skip);

        assert_eq!(
            config.active_angles()?,
            [(0, "cam_2_front"), (1, "cam_0_left")]
        );
        Ok(())
    }

    #[test]
    fn single_skip_device_is_accepted() -> Result<()> {
        let config: CameraConfig = serde_json::from_str(r#"{"Camera Order": {"skip": 4}}"#)?;
        assert_eq!(config.angle_assignment()?[&4], Slot::Skip);
        assert_eq!(config.settings, CameraSettings::default());
        Ok(())
    }

    #[test]
    fn duplicate_device_is_rejected() -> Result<()> {
        let config: CameraConfig =
            serde_json::from_str(r#"{"Camera Order": {"0": 1, "1": 1}}"#)?;
        assert!(config.angle_assignment().is_err());
        Ok(())
    }

    #[test]
    fn assign_builds_order() -> Result<()> {
        let mut config = CameraConfig::default();
        config.assign("4", 0)?;
        config.assign("skip", 1)?;
        config.assign("SKIP", 2)?;
        assert!(config.assign("42", 3).is_err());

        assert_eq!(config.camera_order["4"], OrderEntry::Device(0));
        assert_eq!(config.camera_order["skip"], OrderEntry::Devices(vec![1, 2]));
        Ok(())
    }

    #[test]
    fn save_merges_into_existing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(DEFAULT_CAMERA_CONFIG);
        fs::write(&path, r#"{"Operator": "alice", "Camera Order": {"1": 9}}"#)?;

        let mut config = CameraConfig::default();
        config.assign("0", 0)?;
        config.settings.zoom = 2;
        config.save(&path)?;

        let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(doc["Operator"], "alice");
        assert_eq!(doc["Camera Order"]["0"], 0);
        assert!(doc["Camera Order"].get("1").is_none());
        assert_eq!(doc["CameraSettings"]["Camera Zoom"], 2);

        assert_eq!(CameraConfig::open(&path)?, config);
        Ok(())
    }

    #[test]
    fn open_or_default_without_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = CameraConfig::open_or_default(dir.path().join("missing.json"))?;
        assert_eq!(config, CameraConfig::default());
        Ok(())
    }
}
