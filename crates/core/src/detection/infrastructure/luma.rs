use image::{GrayImage, RgbImage};

use crate::detection::domain::barcode_decoder::DecodeError;
use crate::shared::frame::Frame;

/// Converts a luma or RGB frame to an 8-bit greyscale image.
pub(crate) fn to_luma(frame: &Frame) -> Result<GrayImage, DecodeError> {
    let (w, h) = (frame.width(), frame.height());
    if w == 0 || h == 0 {
        return Err(DecodeError::EmptyFrame);
    }
    match frame.channels() {
        1 => GrayImage::from_raw(w, h, frame.data().to_vec())
            .ok_or_else(|| DecodeError::Backend("luma buffer size mismatch".into())),
        3 => {
            let rgb = RgbImage::from_raw(w, h, frame.data().to_vec())
                .ok_or_else(|| DecodeError::Backend("rgb buffer size mismatch".into()))?;
            Ok(image::imageops::grayscale(&rgb))
        }
        other => Err(DecodeError::UnsupportedLayout(other)),
    }
}
