use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::scan_error::ScanError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera stream is not bound to a surface")]
    Unbound,
    #[error("camera stream has ended")]
    Ended,
    #[error("failed to read frame: {0}")]
    Read(String),
}

/// A granted camera stream and the tracks behind it.
///
/// The stream is produced by a permission request and becomes a live,
/// decodable surface once bound. Frame dimensions are whatever the device
/// delivers; callers must read them every cycle.
pub trait CameraStream: Send {
    /// Human-readable device name, for logs and diagnostics.
    fn label(&self) -> String;

    /// Attaches the stream to its decodable surface and starts frame delivery.
    fn bind_surface(&mut self) -> Result<(), ScanError>;

    /// Dimensions of the frame that the next `copy_frame_into` will copy.
    fn frame_dimensions(&mut self) -> Result<(u32, u32), CaptureError>;

    /// Copies the current frame into `buffer`, which the caller has already
    /// reshaped to `frame_dimensions()`.
    fn copy_frame_into(&mut self, buffer: &mut Frame) -> Result<(), CaptureError>;

    /// Stops every track. Must be synchronous and idempotent.
    fn stop_tracks(&mut self);
}
