mod config;

use crate::config::Config;
use anyhow::{Context, Result};
use augment::{remove_augmented, AugmentSummary, AugmenterInit, CenterCropResize, OutputFormat};
use camera::{CameraConfig, CaptureBackend};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use noisy_float::prelude::*;
use prettytable::{cell, row, Table};
use std::{
    env,
    num::{NonZeroU32, NonZeroUsize},
    path::{Path, PathBuf},
};
use warehouse::{Layout, DATASET_DIR};

#[derive(Debug, Clone, Parser)]
/// Compose multi-camera anomaly detection datasets
struct Opts {
    #[clap(long, global = true)]
    /// JSON5 configuration file
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Create the dataset directory tree of an object
    Build {
        #[clap(flatten)]
        target: TargetArgs,
    },
    /// Capture train and test images from all configured cameras
    Capture {
        #[clap(flatten)]
        target: TargetArgs,
        #[clap(long)]
        /// rounds for train/good
        train_images: Option<usize>,
        #[clap(long)]
        /// rounds for test/good and every anomaly
        test_images: Option<usize>,
        #[clap(long)]
        /// camera configuration file
        camera_config: Option<PathBuf>,
        #[clap(long)]
        /// use DirectShow instead of automatic backend selection
        direct_show: bool,
    },
    /// Assign cameras to angles and store device settings
    ConfigureCameras {
        #[clap(long)]
        /// camera configuration file
        camera_config: Option<PathBuf>,
        #[clap(long = "assign", value_name = "ID=DEVICE")]
        /// angle identifier or "skip", paired with a device index
        assignments: Vec<String>,
        #[clap(long)]
        exposure: Option<i32>,
        #[clap(long)]
        color_temperature: Option<i32>,
        #[clap(long)]
        zoom: Option<i32>,
    },
    /// Augment every angle directory of an object's train/good set
    Augment {
        #[clap(long)]
        object: Option<String>,
        #[clap(long)]
        /// dataset directory, defaults to the warehouse's dataset directory
        dataset_dir: Option<PathBuf>,
        #[clap(long)]
        /// one worker per source image
        parallel: bool,
        #[clap(flatten)]
        augment: AugmentArgs,
    },
    /// Augment the images of one directory into another
    AugmentDir {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[clap(flatten)]
        augment: AugmentArgs,
    },
    /// Center crop and resize the images of one directory into another
    Resize {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[clap(long, default_value = "640")]
        size: NonZeroU32,
    },
    /// Delete augmented variants from an object's train/good set
    RemoveAugmented {
        #[clap(long)]
        object: Option<String>,
        #[clap(long)]
        dataset_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct TargetArgs {
    #[clap(long)]
    /// object name
    object: Option<String>,
    #[clap(long = "anomaly")]
    /// anomaly category, can be repeated
    anomalies: Vec<String>,
    #[clap(long)]
    /// warehouse base directory, defaults to ./data_warehouse
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct AugmentArgs {
    #[clap(long)]
    num_augmented_images: Option<NonZeroUsize>,
    #[clap(long)]
    temperature: Option<f64>,
    #[clap(long)]
    seed: Option<u64>,
    #[clap(long)]
    log_file: Option<PathBuf>,
    #[clap(long)]
    /// do not write the augmentation log file
    no_log: bool,
    #[clap(long)]
    /// png or jpeg
    output_format: Option<OutputFormat>,
    #[clap(long)]
    pixel_dropout: bool,
    #[clap(long = "select")]
    /// only augment these file names
    selected: Vec<String>,
}

impl AugmentArgs {
    fn apply(&self, mut init: AugmenterInit) -> Result<AugmenterInit> {
        if let Some(count) = self.num_augmented_images {
            init.num_augmented_images = count;
        }
        if let Some(temperature) = self.temperature {
            init.temperature = R64::try_new(temperature)
                .with_context(|| format!("invalid temperature {}", temperature))?;
        }
        if let Some(seed) = self.seed {
            init.seed = Some(seed);
        }
        if let Some(log_file) = &self.log_file {
            init.log_file = log_file.clone();
        }
        if self.no_log {
            init.logging_enabled = false;
        }
        if let Some(format) = self.output_format {
            init.output_format = format;
        }
        if self.pixel_dropout {
            init.pixel_dropout = true;
        }
        Ok(init)
    }

    fn selected(&self) -> Option<&[String]> {
        (!self.selected.is_empty()).then(|| self.selected.as_slice())
    }
}

fn main() -> Result<()> {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let Opts { config, command } = Opts::parse();
    let config = match config {
        Some(path) => Config::open(&path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?,
        None => Config::default(),
    };

    match command {
        Command::Build { target } => {
            build(&config, &target)?;
        }
        Command::Capture {
            target,
            train_images,
            test_images,
            camera_config,
            direct_show,
        } => {
            let layout = build(&config, &target)?;
            let mut plan = config.camera.plan.clone();
            if let Some(count) = train_images {
                plan.train_images = count;
            }
            if let Some(count) = test_images {
                plan.test_images = count;
            }
            let camera_config = camera_config.unwrap_or_else(|| config.camera.config_file.clone());
            let backend = if direct_show {
                CaptureBackend::DirectShow
            } else {
                config.camera.backend
            };
            capture(layout, &camera_config, backend, plan)?;
        }
        Command::ConfigureCameras {
            camera_config,
            assignments,
            exposure,
            color_temperature,
            zoom,
        } => {
            let path = camera_config.unwrap_or_else(|| config.camera.config_file.clone());
            let mut camera_config = CameraConfig::open_or_default(&path)?;
            for assignment in &assignments {
                let (identifier, device) = assignment
                    .split_once('=')
                    .with_context(|| format!("expect ID=DEVICE, but get '{}'", assignment))?;
                let device: usize = device
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid device index in '{}'", assignment))?;
                camera_config.assign(identifier, device)?;
            }
            if let Some(exposure) = exposure {
                camera_config.settings.exposure = exposure;
            }
            if let Some(color_temperature) = color_temperature {
                camera_config.settings.color_temperature = color_temperature;
            }
            if let Some(zoom) = zoom {
                camera_config.settings.zoom = zoom;
            }

            print_assignment(&camera_config)?;
            camera_config.save(&path)?;
        }
        Command::Augment {
            object,
            dataset_dir,
            parallel,
            augment,
        } => {
            let object = object_name(object, &config)?;
            let dataset_dir = dataset_dir_of(dataset_dir, &config)?;
            let mut augmenter = augment.apply(config.augment.clone())?.build()?;
            let summary = if parallel {
                augmenter.augment_object_parallel(&dataset_dir, &object, augment.selected())?
            } else {
                augmenter.augment_object(&dataset_dir, &object, augment.selected())?
            };
            if let Some((width, height)) = augmenter.resolution() {
                info!("source resolution {}x{}", width, height);
            }
            print_summary(&summary);
        }
        Command::AugmentDir {
            input_dir,
            output_dir,
            augment,
        } => {
            let mut augmenter = augment.apply(config.augment.clone())?.build()?;
            let summary = augmenter.augment_dir(&input_dir, &output_dir, augment.selected())?;
            print_summary(&summary);
        }
        Command::Resize {
            input_dir,
            output_dir,
            size,
        } => {
            let resize = CenterCropResize::new(size.get())?;
            let summary = resize.resize_dir(&input_dir, &output_dir)?;
            print_summary(&summary);
        }
        Command::RemoveAugmented {
            object,
            dataset_dir,
        } => {
            let object = object_name(object, &config)?;
            let dataset_dir = dataset_dir_of(dataset_dir, &config)?;
            let removed = remove_augmented(&dataset_dir, &object)?;
            info!("removed {} augmented files", removed.len());
        }
    }

    Ok(())
}

fn object_name(object: Option<String>, config: &Config) -> Result<String> {
    object
        .or_else(|| config.warehouse.object.clone())
        .map(|name| warehouse::clean_folder_name(name.trim()))
        .context("an object name is required, pass --object or set warehouse.object")
}

fn dataset_dir_of(dataset_dir: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match dataset_dir {
        Some(dir) => Ok(dir),
        None => Ok(config
            .warehouse
            .warehouse(None)?
            .base_dir()
            .join(DATASET_DIR)),
    }
}

fn build(config: &Config, target: &TargetArgs) -> Result<Layout> {
    let object = object_name(target.object.clone(), config)?;
    let anomalies: &[String] = if target.anomalies.is_empty() {
        &config.warehouse.anomalies
    } else {
        &target.anomalies
    };

    let mut warehouse = config.warehouse.warehouse(target.base_dir.as_deref())?;
    let layout = warehouse.build(&object, anomalies)?.clone();
    if let Some(report) = warehouse.report() {
        println!("{}", report);
        if !report.is_complete() {
            warn!("{} directories could not be created", report.failed.len());
        }
    }

    Ok(layout)
}

fn print_assignment(config: &CameraConfig) -> Result<()> {
    let mut table = Table::new();
    table.add_row(row!["device", "angle"]);
    for (device, slot) in config.angle_assignment()? {
        table.add_row(row![device, slot]);
    }
    table.printstd();
    Ok(())
}

fn print_summary(summary: &AugmentSummary) {
    let mut table = Table::new();
    table.add_row(row!["sources", "outputs", "skipped"]);
    table.add_row(row![summary.sources, summary.variants, summary.skipped.len()]);
    table.printstd();

    if !summary.skipped.is_empty() {
        let mut table = Table::new();
        table.add_row(row!["skipped file", "reason"]);
        summary.skipped.iter().for_each(|skip| {
            table.add_row(row![skip.path.display(), skip.reason]);
        });
        table.printstd();
    }
}

#[cfg(feature = "opencv")]
fn capture(
    layout: Layout,
    camera_config: &Path,
    backend: CaptureBackend,
    plan: camera::CapturePlan,
) -> Result<()> {
    use anyhow::ensure;
    use camera::{AcquisitionController, CameraSlot, OpenCvCamera, StdinOperator};

    let camera_config = CameraConfig::open_or_default(camera_config)?;
    let angles = camera_config.active_angles()?;
    ensure!(
        !angles.is_empty(),
        "no camera is assigned to an angle, run configure-cameras first"
    );

    let cameras: Vec<_> = angles
        .into_iter()
        .map(|(device, angle)| -> Result<_> {
            let source = OpenCvCamera::open(device, backend, &camera_config.settings)?;
            Ok(CameraSlot {
                device,
                angle: angle.to_string(),
                source: Box::new(source),
            })
        })
        .collect::<Result<_>>()?;

    let report = AcquisitionController::new(layout, cameras, StdinOperator::new(), plan).run()?;

    let mut table = Table::new();
    table.add_row(row!["saved", "missed"]);
    table.add_row(row![report.saved.len(), report.missed.len()]);
    table.printstd();
    Ok(())
}

#[cfg(not(feature = "opencv"))]
fn capture(
    _layout: Layout,
    _camera_config: &Path,
    _backend: CaptureBackend,
    _plan: camera::CapturePlan,
) -> Result<()> {
    use anyhow::bail;
    bail!("'opencv' feature must be enabled to run this command");
}
