use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::Sender;

use crate::detection::domain::barcode_decoder::{BarcodeDecoder, DecodeError, DetectedBarcode};
use crate::shared::frame::Frame;

use super::decoder_factory::DecoderBackend;

/// Result of one asynchronous decode call.
///
/// The capture buffer travels to the worker and back with the result, so
/// the caller cannot capture into it while a decode is outstanding.
pub struct DecodeOutcome {
    pub cycle: u64,
    pub frame: Frame,
    pub result: Result<Vec<DetectedBarcode>, DecodeError>,
}

/// Callback invoked on the worker thread when a decode settles.
pub type SettledFn = Box<dyn Fn(DecodeOutcome) + Send>;

struct DecodeRequest {
    cycle: u64,
    frame: Frame,
}

/// Runs a [`BarcodeDecoder`] on a dedicated thread, turning its blocking
/// `detect` into a submit-then-settle asynchronous call.
///
/// Dropping the worker closes its queue; the thread exits after whatever
/// decode is in flight settles. Nothing waits for that, so a hung decoder
/// never blocks the caller.
pub struct DecodeWorker {
    requests: Sender<DecodeRequest>,
    backend: DecoderBackend,
}

impl DecodeWorker {
    pub fn spawn(
        decoder: Box<dyn BarcodeDecoder>,
        backend: DecoderBackend,
        on_settled: SettledFn,
    ) -> Self {
        let (tx, rx) = crossbeam_channel::bounded::<DecodeRequest>(1);

        thread::spawn(move || {
            let mut decoder = decoder;
            for request in rx {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    decoder.detect(&request.frame)
                }))
                .unwrap_or_else(|_| Err(DecodeError::Backend("decoder panicked".into())));

                on_settled(DecodeOutcome {
                    cycle: request.cycle,
                    frame: request.frame,
                    result,
                });
            }
            log::debug!("Decode worker ({backend}) exiting");
        });

        Self {
            requests: tx,
            backend,
        }
    }

    pub fn backend(&self) -> DecoderBackend {
        self.backend
    }

    /// Hands `frame` to the worker. Gives the frame back if the worker is gone.
    pub fn submit(&self, cycle: u64, frame: Frame) -> Result<(), Frame> {
        self.requests
            .send(DecodeRequest { cycle, frame })
            .map_err(|e| e.into_inner().frame)
    }
}
