use crate::detection::domain::barcode_decoder::{BarcodeDecoder, DecodeError, DetectedBarcode};
use crate::shared::frame::Frame;

use super::luma::to_luma;

/// Bundled pure-Rust QR decoder backed by `rqrr`.
///
/// Converts each frame to luma, locates every symbol grid and decodes them
/// in the order `rqrr` reports them. A grid that is located but fails to
/// decode is skipped rather than failing the whole frame.
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RqrrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeDecoder for RqrrDecoder {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedBarcode>, DecodeError> {
        let gray = to_luma(frame)?;
        let (width, height) = gray.dimensions();

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                gray.get_pixel(x as u32, y as u32)[0]
            });

        let mut found = Vec::new();
        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) => found.push(DetectedBarcode::new(content)),
                Err(e) => log::debug!("Skipping undecodable grid in frame {}: {e}", frame.index()),
            }
        }
        Ok(found)
    }
}
