use std::sync::Arc;
use std::thread;

use crate::camera::domain::camera_request::CameraRequest;
use crate::camera::domain::platform::Platform;
use crate::detection::infrastructure::decoder_factory::{resolve_decoder, DecoderPreference};

use super::session_event::{Acquisition, SessionEvent};

/// Resolves the decoder and requests the camera off the session loop.
///
/// Both steps may block (the permission prompt waits on the user), so they
/// run on their own thread and report back through `on_settled` exactly once.
pub fn spawn_acquisition(
    platform: Arc<dyn Platform>,
    request: CameraRequest,
    preference: DecoderPreference,
    generation: u64,
    on_settled: Box<dyn FnOnce(SessionEvent) + Send>,
) {
    thread::spawn(move || {
        let decoder = resolve_decoder(platform.as_ref(), preference);

        log::info!(
            "Requesting camera (facing={:?}, ideal={}x{}@{}, device={:?})",
            request.facing,
            request.ideal_width,
            request.ideal_height,
            request.ideal_fps,
            request.device_index
        );
        let outcome = platform
            .request_camera(&request)
            .map(|stream| Acquisition { stream, decoder });

        match &outcome {
            Ok(acq) => log::info!("Camera access granted: {}", acq.stream.label()),
            Err(e) => log::warn!("Camera access failed: {e}"),
        }

        on_settled(SessionEvent::Acquired {
            generation,
            outcome,
        });
    });
}
