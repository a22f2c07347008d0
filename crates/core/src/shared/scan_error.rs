use thiserror::Error;

/// Every failure a scanning session can surface.
///
/// Errors never escape the session: they are rendered with `Display` into
/// `SessionState::message` and the session moves to `Phase::Error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Failed to access camera. Camera access is not supported on this platform.")]
    UnsupportedPlatform,
    #[error("Failed to access camera. Camera access requires HTTPS connection (except on localhost).")]
    InsecureOrigin,
    #[error("Failed to access camera. Camera permission was denied. Please allow camera access and try again.")]
    PermissionDenied,
    #[error("Failed to access camera. No camera found on this device.")]
    DeviceNotFound,
    #[error("Failed to access camera. Camera is already in use by another application.")]
    DeviceUnavailable,
    #[error("Error during barcode detection")]
    DetectionFailure,
    #[error("Failed to access camera. Error: {0}")]
    Unknown(String),
}

/// Discriminant of [`ScanError`] without the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    UnsupportedPlatform,
    InsecureOrigin,
    PermissionDenied,
    DeviceNotFound,
    DeviceUnavailable,
    DetectionFailure,
    Unknown,
}

impl ScanErrorKind {
    /// False for failures that no amount of retrying in this environment fixes.
    pub fn is_retryable(self) -> bool {
        !matches!(
            self,
            ScanErrorKind::UnsupportedPlatform | ScanErrorKind::InsecureOrigin
        )
    }
}

impl ScanError {
    pub fn kind(&self) -> ScanErrorKind {
        match self {
            ScanError::UnsupportedPlatform => ScanErrorKind::UnsupportedPlatform,
            ScanError::InsecureOrigin => ScanErrorKind::InsecureOrigin,
            ScanError::PermissionDenied => ScanErrorKind::PermissionDenied,
            ScanError::DeviceNotFound => ScanErrorKind::DeviceNotFound,
            ScanError::DeviceUnavailable => ScanErrorKind::DeviceUnavailable,
            ScanError::DetectionFailure => ScanErrorKind::DetectionFailure,
            ScanError::Unknown(_) => ScanErrorKind::Unknown,
        }
    }
}
