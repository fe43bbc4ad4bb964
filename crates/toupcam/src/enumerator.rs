// SPDX-License-Identifier: Apache-2.0

//! Camera enumeration.
//!
//! The vendor enumeration routine (`Toupcam_EnumV2`) follows a documented
//! two-pass contract: call it first with a best-effort-sized scratch array
//! to learn the attached-camera count, then again with an exactly-sized
//! array to populate full instance and model data. Both scratch arrays are
//! transient; everything the caller receives is copied out into owned
//! [`CameraProperties`] records before the buffers are dropped.

use std::ffi::c_int;

use crate::properties::CameraProperties;
use crate::Error;
use toupcam_sys as ffi;

/// Toupcam camera enumerator.
///
/// The entry point for discovering attached cameras. Enumeration is
/// synchronous and stateless: each call reflects the device attachment
/// state at call time and returns a fresh, fully-owned result.
///
/// # Example
///
/// ```no_run
/// use toupcam::enumerator::CameraEnumerator;
///
/// let cameras = CameraEnumerator::enumerate()?;
/// println!("Found {} cameras", cameras.len());
/// for cam in &cameras {
///     println!("Cam#{}: {}", cam.cid(), cam);
/// }
/// # Ok::<(), toupcam::Error>(())
/// ```
pub struct CameraEnumerator;

impl CameraEnumerator {
    /// Enumerate the cameras currently connected, in native enumeration
    /// order, with dense 0-based `cid` handles assigned in that order.
    ///
    /// # Errors
    ///
    /// - [`Error::LibraryNotLoaded`] when the vendor library is missing
    /// - [`Error::Enumeration`] when the probe pass reports a negative
    ///   count (the fetch pass is never attempted)
    /// - [`Error::EnumerationRetried`] when the fetch pass also fails;
    ///   there is no further retry and no partial result
    /// - [`Error::NullModel`] when an instance record was not populated
    pub fn enumerate() -> Result<Vec<CameraProperties>, Error> {
        let lib = ffi::init()?;
        Self::enumerate_with(|arr| unsafe { (lib.Toupcam_EnumV2)(arr.as_mut_ptr()) })
    }

    /// Two-pass enumeration over an injected native call, so the protocol
    /// can be exercised against a simulated SDK in tests.
    fn enumerate_with<F>(mut enum_fn: F) -> Result<Vec<CameraProperties>, Error>
    where
        F: FnMut(&mut [ffi::ToupcamInstV2]) -> c_int,
    {
        // Probe pass: fixed best-effort capacity, learns the true count.
        let mut probe = [ffi::ToupcamInstV2::zeroed(); ffi::TOUPCAM_MAX];
        let count = enum_fn(&mut probe);
        if count < 0 {
            return Err(Error::Enumeration(count));
        }

        // The native routine assumes the caller's buffer can hold up to
        // TOUPCAM_MAX entries; never hand it a zero-length allocation.
        let count = count as usize;
        if count == 0 {
            log::debug!("no cameras attached");
            return Ok(Vec::new());
        }

        // Fetch pass: exactly-sized buffer, per the documented contract.
        let mut instances = vec![ffi::ToupcamInstV2::zeroed(); count];
        let fetched = enum_fn(&mut instances);
        if fetched < 0 {
            return Err(Error::EnumerationRetried(fetched));
        }

        // The device set can change between the passes. Trust the fetch
        // count, but never read past the buffer that was allocated.
        let valid = (fetched as usize).min(instances.len());
        if valid != count {
            log::warn!(
                "camera set changed between enumeration passes: probe {}, fetch {}",
                count,
                fetched
            );
        }

        let mut cameras = Vec::with_capacity(valid);
        for (i, inst) in instances[..valid].iter().enumerate() {
            let props = CameraProperties::from_ffi(i as u32, inst)?;
            log::debug!("enumerated Cam#{}: {}", props.cid(), props.displayname());
            cameras.push(props);
        }

        Ok(cameras)
    }
}
