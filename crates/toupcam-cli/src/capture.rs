// SPDX-License-Identifier: Apache-2.0

//! Fixed-count, fixed-interval capture loop writing sequential JPEG files.

use crate::error::CliError;
use clap::Args as ClapArgs;
use serde::Serialize;
use std::{thread, time::Duration};
use toupcam::camera::Camera;

/// Seconds to wait after opening before the first pull, so the sensor has
/// delivered at least one exposure.
const WARMUP_SECS: u64 = 2;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Vendor-opaque camera id (defaults to the first enumerated camera)
    #[arg(long)]
    id: Option<String>,

    /// Number of frames to capture
    #[arg(short = 'n', long, default_value_t = 10)]
    count: u32,

    /// Seconds to wait between captures
    #[arg(short = 't', long, default_value_t = 2.0)]
    interval: f64,

    /// Output filename prefix (frames are written as PREFIX-NN.jpg)
    #[arg(short, long, default_value = "test_image")]
    output: String,
}

#[derive(Debug, Serialize)]
struct CaptureOutput {
    width: u32,
    height: u32,
    frames: Vec<String>,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing capture command: {:?}", args);

    if args.count == 0 {
        return Err(CliError::InvalidArgs("count must be at least 1".into()));
    }
    if !args.interval.is_finite() || args.interval < 0.0 {
        return Err(CliError::InvalidArgs(
            "interval must be a non-negative number of seconds".into(),
        ));
    }

    let camera = match &args.id {
        Some(id) => Camera::open(id)?,
        None => Camera::open_first()?
            .ok_or_else(|| CliError::CameraNotFound("no camera attached".into()))?,
    };

    let (width, height) = camera.size();
    log::info!("capturing {} frames at {}x{}", args.count, width, height);

    // wait for the camera to start up
    thread::sleep(Duration::from_secs(WARMUP_SECS));

    let mut frames = Vec::with_capacity(args.count as usize);
    for i in 0..args.count {
        let frame = camera.pull_image()?;
        let path = format!("{}-{:02}.jpg", args.output, i);

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.into_data())
            .ok_or_else(|| CliError::Capture("frame buffer size mismatch".into()))?;
        img.save(&path)
            .map_err(|e| CliError::Capture(format!("writing {}: {}", path, e)))?;

        if !json {
            println!("wrote {}", path);
        }
        frames.push(path);

        if i + 1 < args.count {
            thread::sleep(Duration::from_secs_f64(args.interval));
        }
    }

    if json {
        let output = CaptureOutput {
            width,
            height,
            frames,
        };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))?;
        println!("{}", json_str);
    }

    Ok(())
}
