use std::fmt;

use crate::camera::domain::platform::Platform;
use crate::detection::domain::barcode_decoder::BarcodeDecoder;

use super::chained_decoder::ChainedDecoder;

/// Caller preference for which decoder backs a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecoderPreference {
    /// Platform-native when available, bundled otherwise.
    #[default]
    Auto,
    /// Always the bundled software decoder.
    Bundled,
}

/// Which implementation was actually chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecoderBackend {
    Native,
    Bundled,
}

impl fmt::Display for DecoderBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderBackend::Native => write!(f, "native"),
            DecoderBackend::Bundled => write!(f, "bundled"),
        }
    }
}

/// A decoder resolved once for a session, tagged with its backend.
pub struct ResolvedDecoder {
    pub backend: DecoderBackend,
    pub decoder: Box<dyn BarcodeDecoder>,
}

/// Picks the best available decoder, preferring the platform's own.
///
/// Probes the platform once. If it provides a native decoder (and the
/// caller allows it), returns that; otherwise falls back to the bundled
/// `rxing` + `rqrr` chain. Logs which backend is selected.
pub fn resolve_decoder(platform: &dyn Platform, preference: DecoderPreference) -> ResolvedDecoder {
    if preference == DecoderPreference::Auto {
        if let Some(decoder) = platform.native_decoder() {
            log::info!("Using native barcode decoder");
            return ResolvedDecoder {
                backend: DecoderBackend::Native,
                decoder,
            };
        }
    }

    log::info!("Using bundled barcode decoder (preference={preference:?})");
    ResolvedDecoder {
        backend: DecoderBackend::Bundled,
        decoder: Box::new(ChainedDecoder::bundled()),
    }
}
