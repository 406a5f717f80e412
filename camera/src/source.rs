//! Frame sources.

use crate::common::*;

/// A device that yields still frames.
pub trait CaptureSource: Send {
    /// Reads the next frame. An `Err` means this read failed, not that the
    /// source is unusable.
    fn read_frame(&mut self) -> Result<RgbImage>;

    /// Releases the device. Reads after release fail.
    fn release(&mut self) -> Result<()>;
}

impl<S> CaptureSource for Box<S>
where
    S: CaptureSource + ?Sized,
{
    fn read_frame(&mut self) -> Result<RgbImage> {
        (**self).read_frame()
    }

    fn release(&mut self) -> Result<()> {
        (**self).release()
    }
}

#[cfg(feature = "opencv")]
pub use opencv_camera::*;

#[cfg(feature = "opencv")]
mod opencv_camera {
    use super::*;
    use crate::config::{CameraSettings, CaptureBackend};
    use opencv::{
        core::Mat,
        imgproc,
        prelude::*,
        videoio::{self, VideoCapture},
    };

    impl CaptureBackend {
        pub fn api_preference(&self) -> i32 {
            match self {
                Self::Any => videoio::CAP_ANY,
                Self::DirectShow => videoio::CAP_DSHOW,
            }
        }
    }

    /// A camera opened through OpenCV's video I/O.
    #[derive(Derivative)]
    #[derivative(Debug)]
    pub struct OpenCvCamera {
        device: usize,
        #[derivative(Debug = "ignore")]
        capture: VideoCapture,
    }

    impl OpenCvCamera {
        pub fn open(
            device: usize,
            backend: CaptureBackend,
            settings: &CameraSettings,
        ) -> Result<Self> {
            let mut capture = VideoCapture::new(device as i32, backend.api_preference())
                .with_context(|| format!("failed to open camera {}", device))?;
            ensure!(
                capture.is_opened()?,
                "camera {} is not available with the {} backend",
                device,
                backend
            );

            let CameraSettings {
                exposure,
                color_temperature,
                zoom,
                frame_width,
                frame_height,
            } = *settings;
            let props = [
                (videoio::CAP_PROP_FRAME_WIDTH, frame_width as f64),
                (videoio::CAP_PROP_FRAME_HEIGHT, frame_height as f64),
                (videoio::CAP_PROP_EXPOSURE, exposure as f64),
                (videoio::CAP_PROP_WHITE_BALANCE_BLUE_U, color_temperature as f64),
                (videoio::CAP_PROP_ZOOM, zoom as f64),
            ];
            for (prop, value) in props {
                if !capture.set(prop, value)? {
                    warn!("camera {} ignored property {} = {}", device, prop, value);
                }
            }

            info!("opened camera {}", device);
            Ok(Self { device, capture })
        }

        pub fn device(&self) -> usize {
            self.device
        }
    }

    impl CaptureSource for OpenCvCamera {
        fn read_frame(&mut self) -> Result<RgbImage> {
            let mut bgr = Mat::default();
            let ok = self.capture.read(&mut bgr)?;
            ensure!(
                ok && !bgr.empty(),
                "camera {} returned no frame",
                self.device
            );

            let mut rgb = Mat::default();
            imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
            let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
            let bytes = rgb.data_bytes()?.to_vec();

            RgbImage::from_raw(width, height, bytes)
                .ok_or_else(|| format_err!("camera {} returned a malformed frame", self.device))
        }

        fn release(&mut self) -> Result<()> {
            self.capture.release()?;
            Ok(())
        }
    }
}
