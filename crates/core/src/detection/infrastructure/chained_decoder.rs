use crate::detection::domain::barcode_decoder::{BarcodeDecoder, DecodeError, DetectedBarcode};
use crate::shared::frame::Frame;

use super::rqrr_decoder::RqrrDecoder;
use super::rxing_decoder::RxingDecoder;

/// Runs decoders in order; the first one to report candidates wins.
///
/// Candidates are returned exactly as that decoder ordered them. A decoder
/// error ends the frame.
pub struct ChainedDecoder {
    decoders: Vec<Box<dyn BarcodeDecoder>>,
}

impl ChainedDecoder {
    pub fn new(decoders: Vec<Box<dyn BarcodeDecoder>>) -> Self {
        Self { decoders }
    }

    /// The bundled software stack: multi-format `rxing`, then `rqrr` for QR.
    pub fn bundled() -> Self {
        Self::new(vec![Box::new(RxingDecoder::new()), Box::new(RqrrDecoder::new())])
    }
}

impl BarcodeDecoder for ChainedDecoder {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedBarcode>, DecodeError> {
        for decoder in &mut self.decoders {
            let found = decoder.detect(frame)?;
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }
}
