use crate::detection::domain::barcode_decoder::BarcodeDecoder;
use crate::shared::environment::EnvironmentReport;
use crate::shared::scan_error::ScanError;

use super::camera_request::CameraRequest;
use super::camera_stream::CameraStream;

/// Host capabilities a scanning session depends on.
///
/// `request_camera` may block for as long as the user takes to answer a
/// permission prompt; sessions only ever call it off their event loop.
pub trait Platform: Send + Sync {
    /// Diagnostic description of the host. Computed once per session.
    fn environment(&self) -> EnvironmentReport;

    /// Whether the platform exposes a camera API at all.
    fn has_camera_api(&self) -> bool;

    /// A platform-provided barcode decoder, if the host ships one.
    fn native_decoder(&self) -> Option<Box<dyn BarcodeDecoder>>;

    /// Asks for permission and opens a camera stream matching `request` as
    /// closely as the platform allows.
    fn request_camera(&self, request: &CameraRequest) -> Result<Box<dyn CameraStream>, ScanError>;
}
