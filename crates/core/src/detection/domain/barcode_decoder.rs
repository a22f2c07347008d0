use thiserror::Error;

use crate::shared::frame::Frame;

/// One decoded candidate from a single frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectedBarcode {
    pub raw_value: String,
}

impl DetectedBarcode {
    pub fn new(raw_value: impl Into<String>) -> Self {
        Self {
            raw_value: raw_value.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frame has no pixels")]
    EmptyFrame,
    #[error("unsupported frame layout: {0} channels")]
    UnsupportedLayout(u8),
    #[error("decoder backend failed: {0}")]
    Backend(String),
}

/// Domain interface for barcode decoding.
///
/// Returns every candidate found in `frame`, in an order that is stable
/// for a given call. An empty vector means "nothing found" and is not an
/// error. Implementations may be stateful, hence `&mut self`.
pub trait BarcodeDecoder: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedBarcode>, DecodeError>;
}
