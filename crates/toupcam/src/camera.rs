// SPDX-License-Identifier: Apache-2.0

//! Pull-mode frame capture.
//!
//! Minimal capture surface on top of the vendor SDK: open a camera by its
//! vendor-opaque id, start pull mode, and poll decoded RGB24 frames. Full
//! camera control (exposure, gain, triggers, still snap) is intentionally
//! not wrapped here.

use std::ffi::{c_int, c_uint, c_void};

use crate::enumerator::CameraEnumerator;
use crate::{check_hr, text_to_buf, Error};
use toupcam_sys as ffi;

/// One decoded RGB24 frame, tightly packed height x width x 3, 8 bits per
/// channel. The SDK's DWORD row padding has already been stripped.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel data, row-major RGB, `height * width * 3` bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Bytes per RGB24 row as the SDK writes them: rows are padded to DWORD
/// boundaries (the bitmap TDIBWIDTHBYTES rule).
fn row_stride(width: u32) -> usize {
    (width as usize * 24 + 31) / 32 * 4
}

/// An open camera in pull mode.
///
/// Frames are polled with [`Camera::pull_image`]; the event callback the
/// SDK requires is installed as a no-op. Dropping the camera stops capture
/// and closes the handle.
#[derive(Debug)]
pub struct Camera {
    handle: ffi::HToupcam,
    width: u32,
    height: u32,
}

/// Pull mode wants a callback even when the caller polls; events are
/// deliberately ignored.
unsafe extern "C" fn on_event(_event: c_uint, _ctx: *mut c_void) {}

impl Camera {
    /// Open a camera by the vendor-opaque id string from
    /// [`CameraProperties::id`](crate::properties::CameraProperties::id),
    /// query its current size, and start pull mode.
    pub fn open(id: &str) -> Result<Camera, Error> {
        let cam_id = text_to_buf(id)?;
        let handle = tc!(Toupcam_Open(cam_id.as_ptr()));
        if handle.is_null() {
            return Err(Error::NullPointer);
        }

        // From here on the handle must be closed on every failure path.
        let result = (|| {
            let mut width: c_int = 0;
            let mut height: c_int = 0;
            check_hr(tc!(Toupcam_get_Size(handle, &mut width, &mut height)))?;
            let width = u32::try_from(width)?;
            let height = u32::try_from(height)?;

            check_hr(tc!(Toupcam_StartPullModeWithCallback(
                handle,
                Some(on_event),
                std::ptr::null_mut()
            )))?;

            log::debug!("opened camera {} at {}x{}", id, width, height);
            Ok(Camera {
                handle,
                width,
                height,
            })
        })();

        if result.is_err() {
            tc!(Toupcam_Close(handle));
        }
        result
    }

    /// Enumerate and open the first attached camera, or `None` when no
    /// camera is attached.
    pub fn open_first() -> Result<Option<Camera>, Error> {
        let cameras = CameraEnumerator::enumerate()?;
        match cameras.first() {
            Some(props) => Ok(Some(Camera::open(props.id())?)),
            None => Ok(None),
        }
    }

    /// Current capture size (width, height) in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pull the next available frame as tightly packed RGB24.
    ///
    /// Fails with [`Error::Sdk`] when no frame is ready yet; the caller
    /// decides how long to wait between polls.
    pub fn pull_image(&self) -> Result<Frame, Error> {
        let stride = row_stride(self.width);
        let mut raw = vec![0u8; stride * self.height as usize];
        let mut info = ffi::ToupcamFrameInfoV2::default();

        check_hr(tc!(Toupcam_PullImageV2(
            self.handle,
            raw.as_mut_ptr() as *mut c_void,
            24,
            &mut info
        )))?;

        log::trace!("pulled frame seq {} ({}x{})", info.seq, info.width, info.height);

        let row = self.width as usize * 3;
        if stride == row {
            return Ok(Frame {
                width: self.width,
                height: self.height,
                data: raw,
            });
        }

        // strip the DWORD row padding
        let mut data = Vec::with_capacity(row * self.height as usize);
        for y in 0..self.height as usize {
            data.extend_from_slice(&raw[y * stride..y * stride + row]);
        }
        Ok(Frame {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Ok(lib) = ffi::init() {
            unsafe {
                let _ = (lib.Toupcam_Stop)(self.handle);
                (lib.Toupcam_Close)(self.handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::{thread, time::Duration};

    #[test]
    fn test_row_stride_is_dword_aligned() {
        assert_eq!(row_stride(640), 1920); // 640*3 already aligned
        assert_eq!(row_stride(2), 8); // 6 bytes padded to 8
        assert_eq!(row_stride(3), 12); // 9 bytes padded to 12
        assert_eq!(row_stride(1), 4);
    }

    #[ignore = "test requires a connected ToupTek camera (run with --include-ignored to enable)"]
    #[test]
    #[serial]
    fn test_open_first() -> Result<(), Error> {
        let cam = Camera::open_first()?.expect("no camera attached");
        let (width, height) = cam.size();
        println!("camera size {}x{}", width, height);
        assert_ne!(width, 0);
        assert_ne!(height, 0);
        Ok(())
    }

    #[ignore = "test requires a connected ToupTek camera (run with --include-ignored to enable)"]
    #[test]
    #[serial]
    fn test_capture() -> Result<(), Error> {
        let cam = Camera::open_first()?.expect("no camera attached");

        // give the sensor time to deliver the first exposure
        thread::sleep(Duration::from_secs(2));

        let frame = cam.pull_image()?;
        assert_eq!(frame.width(), cam.width());
        assert_eq!(frame.height(), cam.height());
        assert_eq!(
            frame.data().len(),
            frame.width() as usize * frame.height() as usize * 3
        );
        Ok(())
    }
}
