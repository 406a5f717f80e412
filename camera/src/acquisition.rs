//! Capture rounds over a dataset layout.

use crate::{common::*, operator::Operator, source::CaptureSource};
use warehouse::{Layout, Split, GOOD_CATEGORY};

/// Frames read and discarded before each saved frame.
pub const FLUSH_FRAMES: usize = 2;

/// How many rounds to capture per category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CapturePlan {
    /// Rounds for `train/good`.
    pub train_images: usize,
    /// Rounds for `test/good` and for every anomaly.
    pub test_images: usize,
}

impl Default for CapturePlan {
    fn default() -> Self {
        Self {
            train_images: 10,
            test_images: 5,
        }
    }
}

/// A capture device bound to its angle.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct CameraSlot {
    pub device: usize,
    pub angle: String,
    #[derivative(Debug = "ignore")]
    pub source: Box<dyn CaptureSource>,
}

/// A frame that could not be captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedFrame {
    pub device: usize,
    pub angle: String,
    pub path: PathBuf,
    pub error: String,
}

/// The files written by a capture session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquisitionReport {
    pub saved: Vec<PathBuf>,
    pub missed: Vec<MissedFrame>,
}

/// Drives the operator through every capture round of one object.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct AcquisitionController<O>
where
    O: Operator,
{
    layout: Layout,
    cameras: Vec<CameraSlot>,
    #[derivative(Debug = "ignore")]
    operator: O,
    plan: CapturePlan,
    report: AcquisitionReport,
}

impl<O> AcquisitionController<O>
where
    O: Operator,
{
    pub fn new(layout: Layout, cameras: Vec<CameraSlot>, operator: O, plan: CapturePlan) -> Self {
        Self {
            layout,
            cameras,
            operator,
            plan,
            report: AcquisitionReport::default(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Captures good training images, good test images and then every
    /// anomaly. A zero count skips the corresponding rounds.
    ///
    /// A failed read skips that angle for the round. Write failures abort.
    /// Every source is released before returning, on success or failure.
    pub fn run(mut self) -> Result<AcquisitionReport> {
        let result = self.capture_rounds();
        self.release_all();
        result.map(|()| self.report)
    }

    fn capture_rounds(&mut self) -> Result<()> {
        let object = self.layout.object().to_owned();
        let CapturePlan {
            train_images,
            test_images,
        } = self.plan;

        if train_images > 0 {
            self.operator.confirm(&format!(
                "Press Enter to capture TRAINING images for {} in train:",
                object
            ))?;
            let dir = self.layout.category_dir(Split::Train, GOOD_CATEGORY);
            self.capture_images(&dir, train_images)?;
            info!("captured images for good object in train folder");
        } else {
            info!("skip training capture, train image count is 0");
        }

        if test_images > 0 {
            self.operator.confirm(&format!(
                "Press Enter to capture images for good object {} in test:",
                object
            ))?;
            let dir = self.layout.category_dir(Split::Test, GOOD_CATEGORY);
            self.capture_images(&dir, test_images)?;
            info!("captured images for good object in test folder");

            for anomaly in self.layout.anomalies().to_vec() {
                self.operator.confirm(&format!(
                    "Press Enter to capture images for anomaly: {}",
                    anomaly
                ))?;
                let dir = self.layout.category_dir(Split::Test, &anomaly);
                self.capture_images(&dir, test_images)?;
                info!("captured images for anomaly: {}", anomaly);
            }
        } else {
            info!("skip test capture, test image count is 0");
        }

        Ok(())
    }

    fn capture_images(&mut self, dir: &Path, count: usize) -> Result<()> {
        for counter in 0..count {
            self.operator
                .confirm("Press Enter to continue capturing after adjusting the object...")?;
            for index in 0..self.cameras.len() {
                self.capture_single_image(dir, index, counter)?;
            }
        }
        Ok(())
    }

    fn capture_single_image(&mut self, dir: &Path, index: usize, counter: usize) -> Result<()> {
        let CameraSlot {
            device,
            ref angle,
            ref mut source,
        } = self.cameras[index];

        let angle_dir = dir.join(angle);
        fs::create_dir_all(&angle_dir)
            .with_context(|| format!("failed to create '{}'", angle_dir.display()))?;
        let path = angle_dir.join(format!("{:03}.png", counter));

        let frame = (0..FLUSH_FRAMES)
            .try_for_each(|_| source.read_frame().map(drop))
            .and_then(|()| source.read_frame());
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                error!(
                    "could not read frame from camera {} at angle {}: {:#}",
                    device, angle, err
                );
                self.report.missed.push(MissedFrame {
                    device,
                    angle: angle.clone(),
                    path,
                    error: format!("{:#}", err),
                });
                return Ok(());
            }
        };

        frame
            .save(&path)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        info!("saved image {}", path.display());
        self.report.saved.push(path);
        Ok(())
    }

    fn release_all(&mut self) {
        for slot in &mut self.cameras {
            if let Err(err) = slot.source.release() {
                warn!("failed to release camera {}: {:#}", slot.device, err);
            }
        }
    }
}
