// ============================================
// error.rs - Error types for OfficeDeploy
// ============================================
//
// One enum covers the whole deployment flow. The configuration builder
// itself only ever raises InvalidEdition; everything else comes from the
// collaborators around it (download, filesystem, setup.exe launch).
// ============================================

use thiserror::Error;

/// Main error type for OfficeDeploy
#[derive(Error, Debug)]
pub enum OdtError {
    /// Edition string outside the supported set {2019, 2021, 365}
    #[error("'{0}' is not a supported Office edition (expected 2019, 2021 or 365)")]
    InvalidEdition(String),

    /// Office 2016 is recognized but no longer supported. Callers must
    /// intercept this before the configuration builder is ever invoked.
    #[error("Office 2016 is no longer supported; choose 2019, 2021 or 365")]
    UnsupportedLegacyEdition,

    /// Download errors (connection, HTTP status, interrupted transfer)
    #[error("network error: {0}")]
    NetworkFailure(String),

    /// Filesystem errors (directory creation, file writes, profile I/O)
    #[error("filesystem error: {0}")]
    FilesystemFailure(String),

    /// setup.exe could not be started at all
    #[error("failed to launch the Office installer: {0}")]
    ProcessLaunchFailure(String),

    /// setup.exe started but reported failure
    #[error("the Office installer exited with code {0}")]
    ProcessNonZeroExit(i32),
}

/// Result type alias for deployment operations
pub type Result<T> = std::result::Result<T, OdtError>;

// Convenient error constructors
impl OdtError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkFailure(msg.into())
    }

    /// Create a filesystem error
    pub fn filesystem(msg: impl Into<String>) -> Self {
        Self::FilesystemFailure(msg.into())
    }
}

impl From<std::io::Error> for OdtError {
    fn from(err: std::io::Error) -> Self {
        Self::FilesystemFailure(err.to_string())
    }
}

impl From<reqwest::Error> for OdtError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OdtError::InvalidEdition("2024".to_string());
        assert_eq!(
            err.to_string(),
            "'2024' is not a supported Office edition (expected 2019, 2021 or 365)"
        );

        let err = OdtError::ProcessNonZeroExit(17);
        assert_eq!(err.to_string(), "the Office installer exited with code 17");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OdtError = io_err.into();
        assert!(matches!(err, OdtError::FilesystemFailure(_)));
    }
}
