// SPDX-License-Identifier: Apache-2.0

//! Owned camera descriptor types.
//!
//! [`CameraProperties`] is a flattened, fully-owned copy of one enumerated
//! camera instance plus its model descriptor. The native enumeration array
//! is a transient scratch buffer, so every field (including the model data
//! reached through the instance's embedded pointer) is copied out before
//! the record is handed to the caller. Nothing in here retains a native
//! pointer.

use std::fmt;

use crate::flags::Flag;
use crate::{text_from_buf, text_from_ptr, Error};
use toupcam_sys as ffi;

/// Camera resolution (width x height in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Fully-owned description of one enumerated camera.
///
/// Obtained via [`CameraEnumerator::enumerate`](crate::enumerator::CameraEnumerator::enumerate).
/// The `cid` is a dense, 0-based handle assigned in enumeration order; it
/// is unrelated to the vendor-opaque `id` string used to open the device
/// (and unrelated to the camera indices other frameworks hand out).
#[derive(Debug, Clone)]
pub struct CameraProperties {
    /// Locally assigned sequential handle (enumeration order)
    cid: u32,
    /// Display name from the instance record
    displayname: String,
    /// Vendor-opaque unique id, passed to `Camera::open`
    id: String,
    /// Model name
    name: String,
    /// Raw 64-bit capability bitmask
    flags: u64,
    /// Decoded capability flags, registry order
    capabilities: Vec<Flag>,
    /// Number of speed levels, closed interval [0, maxspeed]
    maxspeed: u32,
    /// Number of preview resolutions
    preview: u32,
    /// Number of still resolutions
    still: u32,
    /// Maximum fan speed
    maxfanspeed: u32,
    /// Number of input/output controls
    ioctrl: u32,
    /// Physical pixel size, horizontal, micrometers
    xpixsz: f32,
    /// Physical pixel size, vertical, micrometers
    ypixsz: f32,
    /// Still resolutions; the valid `still`-entry prefix of the fixed
    /// native array, projected into an owned vector
    resolutions: Vec<Resolution>,
}

impl CameraProperties {
    /// Copy one native instance record (and the model it points to) into an
    /// owned record.
    ///
    /// Fails with [`Error::NullModel`] when the instance carries a null
    /// model pointer, which means the native call never filled the record.
    pub(crate) fn from_ffi(cid: u32, inst: &ffi::ToupcamInstV2) -> Result<Self, Error> {
        if inst.model.is_null() {
            return Err(Error::NullModel);
        }
        // Valid for the duration of the enumeration call; copied, not kept.
        let model = unsafe { &*inst.model };

        // A corrupt still count must not read past the 16-slot array.
        let still_valid = (model.still as usize).min(ffi::TOUPCAM_MAX);
        let resolutions = model.res[..still_valid]
            .iter()
            .map(|r| Resolution::new(r.width, r.height))
            .collect();

        Ok(CameraProperties {
            cid,
            displayname: text_from_buf(&inst.displayname),
            id: text_from_buf(&inst.id),
            name: unsafe { text_from_ptr(model.name) },
            flags: model.flag,
            capabilities: Flag::decode(model.flag),
            maxspeed: model.maxspeed,
            preview: model.preview,
            still: model.still,
            maxfanspeed: model.maxfanspeed,
            ioctrl: model.ioctrol,
            xpixsz: model.xpixsz,
            ypixsz: model.ypixsz,
            resolutions,
        })
    }

    /// Locally assigned sequential handle, 0-based, dense in enumeration order
    pub fn cid(&self) -> u32 {
        self.cid
    }

    /// Display name reported by the instance record
    pub fn displayname(&self) -> &str {
        &self.displayname
    }

    /// Vendor-opaque unique id of the connected camera
    ///
    /// This is the string to pass to [`Camera::open`](crate::camera::Camera::open);
    /// it is not an integer index.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw 64-bit capability bitmask
    pub fn flags(&self) -> u64 {
        self.flags
    }

    /// Decoded capability flags, in registry order
    pub fn capabilities(&self) -> &[Flag] {
        &self.capabilities
    }

    /// Number of speed levels (closed interval [0, maxspeed])
    pub fn maxspeed(&self) -> u32 {
        self.maxspeed
    }

    /// Number of preview resolutions
    pub fn preview(&self) -> u32 {
        self.preview
    }

    /// Number of still resolutions
    pub fn still(&self) -> u32 {
        self.still
    }

    /// Maximum fan speed
    pub fn maxfanspeed(&self) -> u32 {
        self.maxfanspeed
    }

    /// Number of input/output controls
    pub fn ioctrl(&self) -> u32 {
        self.ioctrl
    }

    /// Physical pixel size, horizontal, in micrometers
    pub fn xpixsz(&self) -> f32 {
        self.xpixsz
    }

    /// Physical pixel size, vertical, in micrometers
    pub fn ypixsz(&self) -> f32 {
        self.ypixsz
    }

    /// Still resolutions (the valid prefix of the model's fixed array)
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }
}

impl fmt::Display for CameraProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capabilities: Vec<&str> = self.capabilities.iter().map(|c| c.name()).collect();
        let resolutions: Vec<String> = self.resolutions.iter().map(|r| r.to_string()).collect();
        write!(
            f,
            "CameraProperties(cid={}, displayname={}, id={}, name={}, flags={:#x}, \
             capabilities=[{}], maxspeed={}, preview={}, still={}, maxfanspeed={}, \
             ioctrl={}, xpixsz={}, ypixsz={}, resolutions=[{}])",
            self.cid,
            self.displayname,
            self.id,
            self.name,
            self.flags,
            capabilities.join(", "),
            self.maxspeed,
            self.preview,
            self.still,
            self.maxfanspeed,
            self.ioctrl,
            self.xpixsz,
            self.ypixsz,
            resolutions.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_text(buf: &mut [ffi::TChar], s: &str) {
        for (dst, src) in buf.iter_mut().zip(s.bytes()) {
            *dst = src as ffi::TChar;
        }
    }

    fn test_model(still: u32) -> ffi::ToupcamModelV2 {
        let mut res = [ffi::ToupcamResolution::default(); ffi::TOUPCAM_MAX];
        // fill every slot so the unused tail is garbage, not zeros
        for (i, slot) in res.iter_mut().enumerate() {
            slot.width = 100 + i as u32;
            slot.height = 200 + i as u32;
        }
        ffi::ToupcamModelV2 {
            name: std::ptr::null(),
            flag: 0,
            maxspeed: 3,
            preview: 2,
            still,
            maxfanspeed: 0,
            ioctrol: 0,
            xpixsz: 3.2,
            ypixsz: 3.2,
            res,
        }
    }

    fn test_instance(model: &ffi::ToupcamModelV2) -> ffi::ToupcamInstV2 {
        let mut inst = ffi::ToupcamInstV2::zeroed();
        write_text(&mut inst.displayname, "Test Camera");
        write_text(&mut inst.id, "tp-4711");
        inst.model = model;
        inst
    }

    #[test]
    fn test_null_model_is_rejected() {
        let inst = ffi::ToupcamInstV2::zeroed();
        assert!(matches!(
            CameraProperties::from_ffi(0, &inst),
            Err(Error::NullModel)
        ));
    }

    #[test]
    fn test_still_prefix_round_trip() {
        // five distinct pairs in, the same five pairs out, original order,
        // untouched by the garbage in the remaining fixed slots
        let model = test_model(5);
        let inst = test_instance(&model);

        let props = CameraProperties::from_ffi(0, &inst).unwrap();
        assert_eq!(props.still(), 5);
        assert_eq!(props.resolutions().len(), 5);
        for (i, r) in props.resolutions().iter().enumerate() {
            assert_eq!(*r, Resolution::new(100 + i as u32, 200 + i as u32));
        }
    }

    #[test]
    fn test_still_zero_yields_no_resolutions() {
        let model = test_model(0);
        let inst = test_instance(&model);

        let props = CameraProperties::from_ffi(0, &inst).unwrap();
        assert!(props.resolutions().is_empty());
    }

    #[test]
    fn test_still_beyond_capacity_is_clamped() {
        let model = test_model(99);
        let inst = test_instance(&model);

        let props = CameraProperties::from_ffi(0, &inst).unwrap();
        assert_eq!(props.resolutions().len(), ffi::TOUPCAM_MAX);
        assert_eq!(props.still(), 99);
    }

    #[test]
    fn test_strings_and_capabilities_copied_out() {
        let name = std::ffi::CString::new("UCMOS03100KPA").unwrap();
        let mut model = test_model(1);
        model.flag = Flag::Cmos.mask() | Flag::CgHdr.mask();
        #[cfg(not(windows))]
        {
            model.name = name.as_ptr();
        }
        let inst = test_instance(&model);

        let props = CameraProperties::from_ffi(7, &inst).unwrap();
        assert_eq!(props.cid(), 7);
        assert_eq!(props.displayname(), "Test Camera");
        assert_eq!(props.id(), "tp-4711");
        #[cfg(not(windows))]
        assert_eq!(props.name(), "UCMOS03100KPA");
        assert_eq!(props.capabilities(), &[Flag::Cmos, Flag::CgHdr]);
        drop(name);
    }

    #[test]
    fn test_display_has_cid_and_resolutions() {
        let model = test_model(2);
        let inst = test_instance(&model);

        let props = CameraProperties::from_ffi(3, &inst).unwrap();
        let text = format!("{}", props);
        assert!(text.starts_with("CameraProperties(cid=3"));
        assert!(text.contains("resolutions=[100x200, 101x201]"));
    }
}
