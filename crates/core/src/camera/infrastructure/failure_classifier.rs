use crate::shared::scan_error::ScanError;

const PERMISSION_MARKERS: &[&str] = &[
    "permission",
    "denied",
    "not authorized",
    "notallowed",
    "operation not permitted",
    "eacces",
];
const INSECURE_MARKERS: &[&str] = &["https", "secure context"];
const NOT_FOUND_MARKERS: &[&str] = &[
    "no such device",
    "not found",
    "no camera",
    "no device",
    "does not exist",
    "enoent",
    "enodev",
];
const BUSY_MARKERS: &[&str] = &[
    "busy",
    "in use",
    "notreadable",
    "could not start video source",
    "already open",
];
const UNSUPPORTED_MARKERS: &[&str] = &["not supported", "unsupported", "notsupported"];

/// Maps a backend's failure description onto the session error taxonomy.
///
/// Backends report most failures as free-form strings, so classification
/// is keyword based. Checked in order: permission, insecure origin,
/// missing device, busy device, unsupported API. Anything else is
/// `Unknown` and keeps the raw description.
pub fn classify_failure(description: &str) -> ScanError {
    let lower = description.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    if has(PERMISSION_MARKERS) {
        ScanError::PermissionDenied
    } else if has(INSECURE_MARKERS) {
        ScanError::InsecureOrigin
    } else if has(NOT_FOUND_MARKERS) {
        ScanError::DeviceNotFound
    } else if has(BUSY_MARKERS) {
        ScanError::DeviceUnavailable
    } else if has(UNSUPPORTED_MARKERS) {
        ScanError::UnsupportedPlatform
    } else {
        ScanError::Unknown(description.to_string())
    }
}

/// Classifies an error from `nokhwa`, using its variant where it is
/// unambiguous and its message otherwise.
pub fn from_nokhwa(err: &nokhwa::NokhwaError) -> ScanError {
    match err {
        nokhwa::NokhwaError::UnsupportedOperationError(_)
        | nokhwa::NokhwaError::NotImplementedError(_) => ScanError::UnsupportedPlatform,
        other => classify_failure(&other.to_string()),
    }
}
