// SPDX-License-Identifier: Apache-2.0

//! Toupcam SDK for Rust
//!
//! Safe Rust bindings for the ToupTek camera SDK, covering camera
//! enumeration, capability-flag decoding, and a minimal pull-mode capture
//! loop. The vendor library is loaded at runtime, so nothing here requires
//! the SDK at build time.
//!
//! # Quick Start
//!
//! ## Enumerating Cameras
//!
//! ```no_run
//! use toupcam::enumerator::CameraEnumerator;
//!
//! let cameras = CameraEnumerator::enumerate()?;
//! for cam in &cameras {
//!     println!("Cam#{}: {}", cam.cid(), cam);
//! }
//! # Ok::<(), toupcam::Error>(())
//! ```
//!
//! ## Capturing a Frame
//!
//! ```no_run
//! use toupcam::camera::Camera;
//!
//! let cam = Camera::open_first()?.expect("no camera attached");
//! let frame = cam.pull_image()?;
//! println!("captured {}x{} ({} bytes)", frame.width(), frame.height(), frame.data().len());
//! # Ok::<(), toupcam::Error>(())
//! ```

use std::{error, ffi::c_int, fmt, num::TryFromIntError};
use toupcam_sys as ffi;

/// Error type for Toupcam library operations
#[derive(Debug)]
pub enum Error {
    /// The vendor library (libtoupcam.so) could not be loaded at runtime
    LibraryNotLoaded(ffi::libloading::Error),

    /// The native enumeration call reported an error on the probe pass
    Enumeration(i32),

    /// The native enumeration call failed again on the exact-size fetch pass
    EnumerationRetried(i32),

    /// An enumerated instance carried a null model pointer, which violates
    /// the SDK's enumeration contract
    NullModel,

    /// Null pointer returned from the vendor library where a valid handle
    /// or string was expected
    NullPointer,

    /// A vendor call returned a failure HRESULT
    Sdk(i32),

    /// CString creation error (null byte found in string)
    CString(std::ffi::NulError),

    /// Integer conversion error (try_from failed)
    TryFromInt(TryFromIntError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::LibraryNotLoaded(err) => {
                write!(f, "Toupcam library could not be loaded: {}", err)
            }
            Error::Enumeration(count) => {
                write!(f, "camera enumeration failed: native count {}", count)
            }
            Error::EnumerationRetried(count) => write!(
                f,
                "camera enumeration failed on both the probe and fetch pass: native count {}",
                count
            ),
            Error::NullModel => write!(
                f,
                "enumerated camera instance has a null model pointer (SDK contract violation)"
            ),
            Error::NullPointer => write!(f, "Null pointer returned from Toupcam library"),
            Error::Sdk(hr) => write!(f, "Toupcam SDK call failed: hresult {:#010x}", *hr as u32),
            Error::CString(err) => write!(f, "CString creation error: {}", err),
            Error::TryFromInt(err) => write!(f, "Integer conversion error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::LibraryNotLoaded(err) => Some(err),
            Error::CString(err) => Some(err),
            Error::TryFromInt(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ffi::libloading::Error> for Error {
    fn from(err: ffi::libloading::Error) -> Self {
        Error::LibraryNotLoaded(err)
    }
}

impl From<std::ffi::NulError> for Error {
    fn from(err: std::ffi::NulError) -> Self {
        Error::CString(err)
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::TryFromInt(err)
    }
}

/// Helper macro for modules to get library reference and call functions
/// All functions must return Result<T, Error> to use this macro
#[macro_export]
macro_rules! tc {
    ($fn_name:ident($($args:expr),*)) => {
        {
            #[allow(clippy::macro_metavars_in_unsafe)]
            let result = {
                let lib = toupcam_sys::init()?;
                unsafe { (lib.$fn_name)($($args),*) }
            };
            result
        }
    };
}

/// Map a vendor HRESULT to a Result. Negative values carry the failure bit.
pub(crate) fn check_hr(hr: c_int) -> Result<(), Error> {
    if hr < 0 {
        Err(Error::Sdk(hr))
    } else {
        Ok(())
    }
}

/// Decode a NUL-terminated SDK string. A null pointer decodes to the empty
/// string so a missing model name does not abort enumeration.
pub(crate) unsafe fn text_from_ptr(ptr: *const ffi::TChar) -> String {
    if ptr.is_null() {
        return String::new();
    }

    #[cfg(not(windows))]
    {
        unsafe { std::ffi::CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned()
    }

    #[cfg(windows)]
    {
        let mut len = 0;
        while unsafe { *ptr.add(len) } != 0 {
            len += 1;
        }
        let units = unsafe { std::slice::from_raw_parts(ptr, len) };
        String::from_utf16_lossy(units)
    }
}

/// Decode a fixed-width SDK text buffer up to the first NUL (or the full
/// buffer when the SDK used every unit).
pub(crate) fn text_from_buf(buf: &[ffi::TChar]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());

    #[cfg(not(windows))]
    {
        let bytes: Vec<u8> = buf[..len].iter().map(|&c| c as u8).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[cfg(windows)]
    {
        String::from_utf16_lossy(&buf[..len])
    }
}

/// Encode a Rust string as a NUL-terminated SDK string.
pub(crate) fn text_to_buf(s: &str) -> Result<Vec<ffi::TChar>, Error> {
    #[cfg(not(windows))]
    {
        let cstr = std::ffi::CString::new(s)?;
        Ok(cstr
            .into_bytes_with_nul()
            .iter()
            .map(|&b| b as ffi::TChar)
            .collect())
    }

    #[cfg(windows)]
    {
        Ok(s.encode_utf16().chain(std::iter::once(0)).collect())
    }
}

/// The flags module provides the capability-flag registry and decoder.
pub mod flags;

/// The properties module provides the owned camera descriptor types.
pub mod properties;

/// The enumerator module provides the two-pass camera enumeration.
pub mod enumerator;

/// The camera module provides the pull-mode capture functionality.
pub mod camera;

/// Get the vendor SDK version string
///
/// Returns an error if the library is not loaded.
pub fn version() -> Result<String, Error> {
    let ptr = tc!(Toupcam_Version());
    if ptr.is_null() {
        return Err(Error::NullPointer);
    }
    Ok(unsafe { text_from_ptr(ptr) })
}
