// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::process::ExitCode;

/// CLI-specific error type with exit code mapping
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// Camera device not found or inaccessible
    CameraNotFound(String),
    /// Camera enumeration failed in the vendor library
    Enumeration(String),
    /// Frame capture or file write failed
    Capture(String),
    /// General error from the Toupcam library
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::CameraNotFound(msg) => write!(f, "Camera not found: {}", msg),
            CliError::Enumeration(msg) => write!(f, "Enumeration failed: {}", msg),
            CliError::Capture(msg) => write!(f, "Capture failed: {}", msg),
            CliError::General(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InvalidArgs(_) => ExitCode::from(2),
            CliError::CameraNotFound(_) => ExitCode::from(3),
            CliError::Enumeration(_) => ExitCode::from(4),
            CliError::Capture(_) => ExitCode::from(5),
            CliError::General(_) => ExitCode::from(1),
        }
    }
}

/// Map toupcam::Error to CliError with appropriate exit codes
impl From<toupcam::Error> for CliError {
    fn from(err: toupcam::Error) -> Self {
        use toupcam::Error;

        match err {
            // Negative native counts from either enumeration pass
            Error::Enumeration(_) | Error::EnumerationRetried(_) | Error::NullModel => {
                CliError::Enumeration(format!("{}", err))
            }

            // Open returned no handle
            Error::NullPointer => {
                CliError::CameraNotFound(format!("vendor library returned no handle: {}", err))
            }

            // Library loading errors
            Error::LibraryNotLoaded(lib_err) => {
                CliError::General(format!("Failed to load library: {}", lib_err))
            }

            // SDK control-call failures
            Error::Sdk(_) => CliError::Capture(format!("{}", err)),

            // String/conversion errors
            Error::CString(cstr_err) => CliError::General(format!("C string error: {}", cstr_err)),
            Error::TryFromInt(int_err) => {
                CliError::General(format!("Integer conversion error: {}", int_err))
            }
        }
    }
}

/// Helper function to convert result to exit code
pub fn result_to_exit_code<T>(result: Result<T, CliError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::InvalidArgs("test".into()).exit_code(),
            ExitCode::from(2)
        );
        assert_eq!(
            CliError::CameraNotFound("test".into()).exit_code(),
            ExitCode::from(3)
        );
        assert_eq!(
            CliError::Enumeration("test".into()).exit_code(),
            ExitCode::from(4)
        );
        assert_eq!(
            CliError::Capture("test".into()).exit_code(),
            ExitCode::from(5)
        );
        assert_eq!(
            CliError::General("test".into()).exit_code(),
            ExitCode::from(1)
        );
    }

    #[test]
    fn test_error_display() {
        let err = CliError::CameraNotFound("tp-4711".to_string());
        assert_eq!(format!("{}", err), "Camera not found: tp-4711");
    }

    #[test]
    fn test_enumeration_errors_map_to_enumeration() {
        let err: CliError = toupcam::Error::Enumeration(-1).into();
        assert!(matches!(err, CliError::Enumeration(_)));

        let err: CliError = toupcam::Error::EnumerationRetried(-1).into();
        assert!(matches!(err, CliError::Enumeration(_)));
    }
}
