// SPDX-License-Identifier: Apache-2.0

//! Camera listing with decoded capability flags.

use crate::error::CliError;
use clap::Args as ClapArgs;
use serde::Serialize;
use toupcam::enumerator::CameraEnumerator;
use toupcam::properties::CameraProperties;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Print only the vendor-opaque camera ids, one per line
    #[arg(long)]
    ids: bool,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    count: usize,
    cameras: Vec<CameraOutput>,
}

#[derive(Debug, Serialize)]
struct CameraOutput {
    cid: u32,
    displayname: String,
    id: String,
    name: String,
    flags: String,
    capabilities: Vec<String>,
    maxspeed: u32,
    preview: u32,
    still: u32,
    maxfanspeed: u32,
    ioctrl: u32,
    xpixsz: f32,
    ypixsz: f32,
    resolutions: Vec<ResolutionOutput>,
}

#[derive(Debug, Serialize)]
struct ResolutionOutput {
    width: u32,
    height: u32,
}

impl From<&CameraProperties> for CameraOutput {
    fn from(cam: &CameraProperties) -> Self {
        CameraOutput {
            cid: cam.cid(),
            displayname: cam.displayname().to_string(),
            id: cam.id().to_string(),
            name: cam.name().to_string(),
            flags: format!("{:#x}", cam.flags()),
            capabilities: cam
                .capabilities()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            maxspeed: cam.maxspeed(),
            preview: cam.preview(),
            still: cam.still(),
            maxfanspeed: cam.maxfanspeed(),
            ioctrl: cam.ioctrl(),
            xpixsz: cam.xpixsz(),
            ypixsz: cam.ypixsz(),
            resolutions: cam
                .resolutions()
                .iter()
                .map(|r| ResolutionOutput {
                    width: r.width,
                    height: r.height,
                })
                .collect(),
        }
    }
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing list command: {:?}", args);

    let cameras = CameraEnumerator::enumerate()?;

    if json {
        let output = ListOutput {
            count: cameras.len(),
            cameras: cameras.iter().map(CameraOutput::from).collect(),
        };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))?;
        println!("{}", json_str);
        return Ok(());
    }

    if args.ids {
        for cam in &cameras {
            println!("{}", cam.id());
        }
        return Ok(());
    }

    // No cameras is not an error; an empty listing with exit code 0.
    log::info!("Found {} cameras", cameras.len());
    for cam in &cameras {
        println!("Cam#{}: {}", cam.cid(), cam);
    }

    Ok(())
}
