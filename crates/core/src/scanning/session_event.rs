use crate::camera::domain::camera_stream::CameraStream;
use crate::detection::infrastructure::decode_worker::DecodeOutcome;
use crate::detection::infrastructure::decoder_factory::ResolvedDecoder;
use crate::shared::scan_error::ScanError;

/// A granted camera plus the decoder resolved for the same session.
pub struct Acquisition {
    pub stream: Box<dyn CameraStream>,
    pub decoder: ResolvedDecoder,
}

/// Completion of an asynchronous step, delivered back to the session loop.
///
/// Each variant is tagged with the generation, tick, or cycle it belongs
/// to; the session drops anything that no longer matches its current one.
pub enum SessionEvent {
    Acquired {
        generation: u64,
        outcome: Result<Acquisition, ScanError>,
    },
    SurfaceReady {
        generation: u64,
    },
    TickFired {
        tick: u64,
    },
    DecodeSettled(DecodeOutcome),
}
