use rxing::Exceptions;

use crate::detection::domain::barcode_decoder::{BarcodeDecoder, DecodeError, DetectedBarcode};
use crate::shared::frame::Frame;

use super::luma::to_luma;

/// Bundled multi-format decoder backed by `rxing`.
///
/// Reads linear codes (EAN/UPC, Code 128, Code 39, ITF, Codabar) as well as
/// QR, Data Matrix, Aztec and PDF417. Candidates come back in the order
/// `rxing` reports them.
pub struct RxingDecoder;

impl RxingDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RxingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeDecoder for RxingDecoder {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedBarcode>, DecodeError> {
        let gray = to_luma(frame)?;
        let (width, height) = gray.dimensions();

        match rxing::helpers::detect_multiple_in_luma(gray.into_raw(), width, height) {
            Ok(results) => Ok(results
                .iter()
                .map(|r| DetectedBarcode::new(r.getText()))
                .collect()),
            // rxing reports "nothing readable" as an error
            Err(Exceptions::NotFoundException(_))
            | Err(Exceptions::FormatException(_))
            | Err(Exceptions::ChecksumException(_)) => Ok(Vec::new()),
            Err(e) => Err(DecodeError::Backend(e.to_string())),
        }
    }
}
