use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::camera::domain::camera_handle::CameraHandle;
use crate::camera::domain::camera_request::CameraRequest;
use crate::camera::domain::platform::Platform;
use crate::camera::domain::surface::SurfaceProvider;
use crate::detection::infrastructure::decode_worker::{DecodeOutcome, DecodeWorker};
use crate::detection::infrastructure::decoder_factory::DecoderPreference;
use crate::session::domain::session_state::{Phase, SessionState};
use crate::session::domain::session_store::{SessionStateReader, SessionStore};
use crate::shared::constants::{DEFAULT_FRAME_INTERVAL, FRAME_CHANNELS};
use crate::shared::environment::EnvironmentReport;
use crate::shared::frame::Frame;
use crate::shared::scan_error::ScanError;

use super::acquisition::spawn_acquisition;
use super::frame_tick::{FrameScheduler, FrameTick};
use super::session_event::{Acquisition, SessionEvent};

/// Configuration for a scanning session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub request: CameraRequest,
    pub frame_interval: Duration,
    pub decoder: DecoderPreference,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request: CameraRequest::default(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            decoder: DecoderPreference::Auto,
        }
    }
}

/// A granted camera waiting for its surface.
struct PendingBinding {
    generation: u64,
    handle: CameraHandle,
}

/// Acquisition sequence and scan loop for one camera session.
///
/// All state lives here and is only touched from the thread that owns the
/// session. Blocking work (permission prompt, decoder resolution, each
/// decode call) runs elsewhere and comes back as a [`SessionEvent`] through
/// the `events` sender, so between events every read and write is atomic
/// with respect to the rest of the session.
///
/// Transitions:
///
/// | from       | trigger                    | to         |
/// |------------|----------------------------|------------|
/// | Idle/Found/Error | `start`              | Requesting |
/// | Requesting | camera granted             | Scanning   |
/// | Requesting | acquisition failed         | Error      |
/// | Scanning   | decode settled, empty      | Scanning   |
/// | Scanning   | decode settled, candidates | Found      |
/// | Scanning   | decode failed              | Error      |
/// | Scanning   | `stop`                     | Idle       |
/// | Found/Error | `clear`                   | Idle       |
pub struct ScanSession {
    platform: Arc<dyn Platform>,
    surface: Box<dyn SurfaceProvider>,
    config: SessionConfig,
    environment: EnvironmentReport,
    store: SessionStore,
    events: Sender<SessionEvent>,
    scheduler: FrameScheduler,
    generation: u64,
    pending: Option<PendingBinding>,
    camera: Option<CameraHandle>,
    worker: Option<DecodeWorker>,
    /// Capture buffer. `None` while it is out with the decode worker.
    buffer: Option<Frame>,
    tick: Option<FrameTick>,
    cycle: u64,
    in_flight: Option<u64>,
    frames_captured: usize,
    closed: bool,
}

impl ScanSession {
    pub fn new(
        platform: Arc<dyn Platform>,
        surface: Box<dyn SurfaceProvider>,
        config: SessionConfig,
        events: Sender<SessionEvent>,
    ) -> Self {
        let environment = platform.environment();
        let initial = match environment.preflight_error() {
            Some(err) => {
                log::warn!("Environment preflight failed: {err}");
                SessionState::error(&err)
            }
            None => SessionState::idle(),
        };
        log::debug!("Environment:\n{environment}");

        Self {
            scheduler: FrameScheduler::new(config.frame_interval),
            platform,
            surface,
            config,
            environment,
            store: SessionStore::new(initial),
            events,
            generation: 0,
            pending: None,
            camera: None,
            worker: None,
            buffer: None,
            tick: None,
            cycle: 0,
            in_flight: None,
            frames_captured: 0,
            closed: false,
        }
    }

    pub fn reader(&self) -> SessionStateReader {
        self.store.reader()
    }

    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn environment(&self) -> &EnvironmentReport {
        &self.environment
    }

    /// The outstanding tick, if the loop is waiting for one.
    pub fn pending_tick(&self) -> Option<(u64, Receiver<Instant>)> {
        self.tick
            .as_ref()
            .map(|t| (t.id(), t.receiver().clone()))
    }

    /// True while a granted camera is waiting for its surface.
    pub fn awaiting_surface(&self) -> bool {
        self.pending.is_some()
    }

    // ── Controls ─────────────────────────────────────────────────────

    pub fn start(&mut self) {
        if self.closed {
            log::warn!("Start ignored: session is shut down");
            return;
        }
        let phase = self.store.snapshot().phase();
        if matches!(phase, Phase::Requesting | Phase::Scanning) {
            log::debug!("Start ignored while {phase}");
            return;
        }

        if !self.platform.has_camera_api() {
            self.fail(ScanError::UnsupportedPlatform);
            return;
        }
        if let Some(err) = self.environment.preflight_error() {
            self.fail(err);
            return;
        }

        self.generation += 1;
        self.store.publish(SessionState::requesting());

        let events = self.events.clone();
        spawn_acquisition(
            self.platform.clone(),
            self.config.request.clone(),
            self.config.decoder,
            self.generation,
            Box::new(move |event| {
                let _ = events.send(event);
            }),
        );
    }

    /// Stops an active scan. A no-op in every other phase.
    pub fn stop(&mut self) {
        let phase = self.store.snapshot().phase();
        if phase != Phase::Scanning {
            log::debug!("Stop ignored while {phase}");
            return;
        }
        log::info!("Scan stopped");
        self.release();
        self.store.publish(SessionState::idle());
    }

    /// Resets a finished session (found or failed) back to idle.
    pub fn clear(&mut self) {
        let phase = self.store.snapshot().phase();
        if matches!(phase, Phase::Found | Phase::Error) {
            self.store.publish(SessionState::idle());
        }
    }

    /// Tears the session down. Any camera granted afterwards is released
    /// on arrival instead of being stored.
    pub fn shutdown(&mut self) {
        self.closed = true;
        self.release();
        if self.store.snapshot().is_busy() {
            self.store.publish(SessionState::idle());
        }
    }

    // ── Events ───────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Acquired {
                generation,
                outcome,
            } => self.on_acquired(generation, outcome),
            SessionEvent::SurfaceReady { generation } => self.on_surface_ready(generation),
            SessionEvent::TickFired { tick } => self.on_tick(tick),
            SessionEvent::DecodeSettled(outcome) => self.on_decode_settled(outcome),
        }
    }

    fn on_acquired(&mut self, generation: u64, outcome: Result<Acquisition, ScanError>) {
        let current = generation == self.generation
            && !self.closed
            && self.store.snapshot().phase() == Phase::Requesting;

        let acquisition = match outcome {
            Ok(acq) if current => acq,
            Ok(acq) => {
                log::warn!("Releasing camera from stale acquisition {generation}");
                CameraHandle::new(acq.stream).release();
                return;
            }
            Err(_) if !current => return,
            Err(err) => {
                self.fail(err);
                return;
            }
        };

        let handle = CameraHandle::new(acquisition.stream);
        if self.camera.is_some() || self.pending.is_some() {
            log::warn!("A camera is already live; releasing the new one");
            handle.release();
            return;
        }

        let events = self.events.clone();
        self.worker = Some(DecodeWorker::spawn(
            acquisition.decoder.decoder,
            acquisition.decoder.backend,
            Box::new(move |outcome| {
                let _ = events.send(SessionEvent::DecodeSettled(outcome));
            }),
        ));
        self.pending = Some(PendingBinding { generation, handle });
        self.store.publish(SessionState::scanning());

        let events = self.events.clone();
        self.surface.when_ready(Box::new(move || {
            let _ = events.send(SessionEvent::SurfaceReady { generation });
        }));
    }

    fn on_surface_ready(&mut self, generation: u64) {
        let Some(pending) = self.pending.take() else {
            log::debug!("Surface ready with nothing to bind");
            return;
        };
        if pending.generation != generation {
            self.pending = Some(pending);
            return;
        }

        let mut handle = pending.handle;
        if let Err(err) = handle.stream_mut().bind_surface() {
            handle.release();
            self.fail(err);
            return;
        }
        log::info!("Camera bound to surface: {}", handle.label());

        self.camera = Some(handle);
        self.buffer = Some(Frame::empty(FRAME_CHANNELS));
        self.capture_and_decode();
    }

    fn on_tick(&mut self, tick: u64) {
        if self.tick.as_ref().map(FrameTick::id) != Some(tick) {
            return;
        }
        self.tick = None;
        self.capture_and_decode();
    }

    fn on_decode_settled(&mut self, outcome: DecodeOutcome) {
        if self.in_flight != Some(outcome.cycle) {
            log::warn!("Discarding stale decode result for cycle {}", outcome.cycle);
            return;
        }
        self.in_flight = None;
        self.buffer = Some(outcome.frame);

        match outcome.result {
            Ok(candidates) => match candidates.into_iter().next() {
                None => {
                    self.store.publish(SessionState::scanning());
                    self.schedule_next();
                }
                Some(first) => {
                    log::info!("Barcode found: {}", first.raw_value);
                    self.release();
                    self.store.publish(SessionState::found(first.raw_value));
                }
            },
            Err(e) => {
                log::error!("Barcode detection error: {e}");
                self.fail(ScanError::DetectionFailure);
            }
        }
    }

    // ── Scan loop ────────────────────────────────────────────────────

    /// Captures the current frame and submits it for decoding.
    ///
    /// Reachable only when no decode is outstanding: the buffer is either
    /// fresh from binding or just came back with the previous outcome.
    fn capture_and_decode(&mut self) {
        if self.in_flight.is_some() {
            log::warn!("Capture skipped: decode still in flight");
            return;
        }
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        let Some(mut buffer) = self.buffer.take() else {
            return;
        };
        let stream = camera.stream_mut();

        let (width, height) = match stream.frame_dimensions() {
            Ok(dims) => dims,
            Err(e) => {
                self.buffer = Some(buffer);
                self.capture_failed(e);
                return;
            }
        };
        if width == 0 || height == 0 {
            log::debug!("Surface has no frame yet; retrying next tick");
            self.buffer = Some(buffer);
            self.schedule_next();
            return;
        }

        buffer.reshape(width, height, self.frames_captured);
        if let Err(e) = stream.copy_frame_into(&mut buffer) {
            self.buffer = Some(buffer);
            self.capture_failed(e);
            return;
        }
        self.frames_captured += 1;

        let Some(worker) = self.worker.as_ref() else {
            self.buffer = Some(buffer);
            self.fail(ScanError::DetectionFailure);
            return;
        };

        self.cycle += 1;
        log::debug!(
            "Decoding frame {} ({width}x{height}, {} decoder)",
            buffer.index(),
            worker.backend()
        );
        match worker.submit(self.cycle, buffer) {
            Ok(()) => self.in_flight = Some(self.cycle),
            Err(buffer) => {
                self.buffer = Some(buffer);
                log::error!("Decode worker is gone");
                self.fail(ScanError::DetectionFailure);
            }
        }
    }

    fn schedule_next(&mut self) {
        debug_assert!(self.tick.is_none(), "at most one outstanding tick");
        self.tick = Some(self.scheduler.schedule());
    }

    fn capture_failed(&mut self, err: impl std::fmt::Display) {
        log::warn!("Frame capture failed: {err}");
        self.fail(ScanError::DeviceUnavailable);
    }

    /// Releases everything, then makes the error observable.
    fn fail(&mut self, err: ScanError) {
        self.release();
        self.store.publish(SessionState::error(&err));
    }

    /// Cancels the pending tick, then stops the camera tracks.
    fn release(&mut self) {
        if let Some(tick) = self.tick.take() {
            tick.cancel();
        }
        if let Some(camera) = self.camera.take() {
            camera.release();
        }
        if let Some(pending) = self.pending.take() {
            pending.handle.release();
        }
        self.worker = None;
        self.in_flight = None;
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::domain::surface::{DeferredSurface, ImmediateSurface};
    use crate::detection::domain::barcode_decoder::DecodeError;
    use crate::shared::scan_error::ScanErrorKind;
    use crate::testing::{ScriptedDecoder, StubPlatform};

    const WAIT: Duration = Duration::from_secs(5);

    struct Harness {
        session: ScanSession,
        events: Receiver<SessionEvent>,
        states: Receiver<SessionState>,
    }

    impl Harness {
        fn new(platform: StubPlatform) -> Self {
            Self::with_surface(platform, Box::new(ImmediateSurface))
        }

        fn with_surface(platform: StubPlatform, surface: Box<dyn SurfaceProvider>) -> Self {
            let (tx, rx) = crossbeam_channel::unbounded();
            let config = SessionConfig {
                frame_interval: Duration::from_millis(1),
                ..SessionConfig::default()
            };
            let session = ScanSession::new(Arc::new(platform), surface, config, tx);
            let states = session.reader().subscribe();
            Self {
                session,
                events: rx,
                states,
            }
        }

        /// Delivers the next asynchronous event, firing ticks as they come due.
        fn step(&mut self) {
            let tick = self.session.pending_tick();
            let tick_rx = tick
                .as_ref()
                .map(|(_, rx)| rx.clone())
                .unwrap_or_else(crossbeam_channel::never);
            crossbeam_channel::select! {
                recv(self.events) -> ev => self.session.handle_event(ev.unwrap()),
                recv(tick_rx) -> _ => {
                    let (id, _) = tick.unwrap();
                    self.session.handle_event(SessionEvent::TickFired { tick: id });
                }
                default(WAIT) => panic!("no session event within {WAIT:?}"),
            }
        }

        fn step_until(&mut self, phase: Phase) {
            for _ in 0..200 {
                if self.session.state().phase() == phase {
                    return;
                }
                self.step();
            }
            panic!("never reached {phase}");
        }

        fn phases(&self) -> Vec<Phase> {
            self.states.try_iter().map(|s| s.phase()).collect()
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let h = Harness::new(StubPlatform::granting(640, 480));
        assert_eq!(h.session.state(), SessionState::idle());
    }

    #[test]
    fn test_insecure_origin_starts_in_error() {
        let platform = StubPlatform::granting(640, 480).with_origin("http", "scan.example.com");
        let h = Harness::new(platform);
        assert_eq!(h.session.state().error_kind(), Some(ScanErrorKind::InsecureOrigin));
    }

    #[test]
    fn test_unsupported_platform_fails_without_prompt() {
        let platform = StubPlatform::granting(640, 480).without_camera_api();
        let probe = platform.probe();
        let mut h = Harness::new(platform);

        h.session.start();

        let state = h.session.state();
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.error_kind(), Some(ScanErrorKind::UnsupportedPlatform));
        assert!(probe.requests().is_empty());
    }

    #[test]
    fn test_scans_until_first_non_empty_frame() {
        let decoder = ScriptedDecoder::new(vec![
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec!["123456789012".into()]),
        ]);
        let platform = StubPlatform::granting(1280, 720).with_decoder(decoder.clone());
        let stream_probe = platform.stream_probe();
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Found);

        assert_eq!(
            h.phases(),
            vec![
                Phase::Requesting,
                Phase::Scanning,
                Phase::Scanning,
                Phase::Scanning,
                Phase::Scanning,
                Phase::Found,
            ]
        );
        assert_eq!(h.session.state().result(), Some("123456789012"));
        assert_eq!(stream_probe.stop_count(), 1);
        assert!(h.session.pending_tick().is_none());
        assert_eq!(decoder.probe().calls(), 4);
    }

    #[test]
    fn test_first_candidate_wins() {
        let decoder = ScriptedDecoder::new(vec![Ok(vec!["A".into(), "B".into()])]);
        let platform = StubPlatform::granting(640, 480).with_decoder(decoder);
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Found);

        assert_eq!(h.session.state().result(), Some("A"));
    }

    #[test]
    fn test_permission_denied_then_retry_prompts_again() {
        let platform = StubPlatform::failing(ScanError::PermissionDenied);
        let probe = platform.probe();
        let stream_probe = platform.stream_probe();
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Error);
        let state = h.session.state();
        assert_eq!(state.error_kind(), Some(ScanErrorKind::PermissionDenied));
        assert!(state.message().unwrap().contains("denied"));
        assert_eq!(stream_probe.opened(), 0);

        h.session.start();
        assert_eq!(h.session.state().phase(), Phase::Requesting);
        h.step_until(Phase::Error);
        assert_eq!(probe.requests().len(), 2);
    }

    #[test]
    fn test_start_while_requesting_is_ignored() {
        let platform = StubPlatform::granting(640, 480).with_decoder(ScriptedDecoder::empty());
        let probe = platform.probe();
        let mut h = Harness::new(platform);

        h.session.start();
        h.session.start();
        h.step_until(Phase::Scanning);
        h.session.start();

        assert_eq!(probe.requests().len(), 1);
        assert_eq!(h.phases(), vec![Phase::Requesting, Phase::Scanning]);
    }

    #[test]
    fn test_stop_mid_scan_discards_in_flight_decode() {
        let decoder = ScriptedDecoder::gated(vec![Ok(vec!["late".into()])]);
        let gate = decoder.gate();
        let platform = StubPlatform::granting(640, 480).with_decoder(decoder.clone());
        let stream_probe = platform.stream_probe();
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Scanning);
        h.step(); // surface bound, first frame submitted
        assert!(decoder.probe().wait_for_calls(1, WAIT));

        h.session.stop();
        let state = h.session.state();
        assert_eq!(state, SessionState::idle());
        assert_eq!(stream_probe.stop_count(), 1);
        assert!(h.session.pending_tick().is_none());

        gate.open();
        let late = h.events.recv_timeout(WAIT).unwrap();
        h.session.handle_event(late);

        assert_eq!(h.session.state(), SessionState::idle());
        assert_eq!(decoder.probe().calls(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let decoder = ScriptedDecoder::empty();
        let platform = StubPlatform::granting(640, 480).with_decoder(decoder.clone());
        let stream_probe = platform.stream_probe();
        let mut h = Harness::new(platform);

        h.session.start();
        for _ in 0..10 {
            if h.session.pending_tick().is_some() {
                break;
            }
            h.step();
        }
        let (id, timer) = h.session.pending_tick().expect("tick after empty decode");
        assert_eq!(decoder.probe().calls(), 1);

        h.session.stop();
        assert!(h.session.pending_tick().is_none());
        assert_eq!(stream_probe.stop_count(), 1);

        timer.recv_timeout(WAIT).unwrap();
        h.session.handle_event(SessionEvent::TickFired { tick: id });

        assert_eq!(h.session.state(), SessionState::idle());
        assert_eq!(decoder.probe().calls(), 1);
        assert!(h.events.try_recv().is_err());
    }

    #[test]
    fn test_stop_outside_scanning_is_a_no_op() {
        let mut h = Harness::new(StubPlatform::granting(640, 480));
        h.session.stop();
        assert_eq!(h.session.state(), SessionState::idle());
        assert!(h.phases().is_empty());
    }

    #[test]
    fn test_decoder_failure_releases_camera_before_error() {
        let decoder = ScriptedDecoder::new(vec![Err(DecodeError::Backend("gpu lost".into()))]);
        let platform = StubPlatform::granting(640, 480).with_decoder(decoder);
        let stream_probe = platform.stream_probe();
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Error);

        let state = h.session.state();
        assert_eq!(state.error_kind(), Some(ScanErrorKind::DetectionFailure));
        assert_eq!(state.message(), Some("Error during barcode detection"));
        assert_eq!(stream_probe.stop_count(), 1);
        assert!(h.session.pending_tick().is_none());
    }

    #[test]
    fn test_no_two_decodes_overlap() {
        let decoder = ScriptedDecoder::new(vec![
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec!["done".into()]),
        ]);
        let platform = StubPlatform::granting(320, 240).with_decoder(decoder.clone());
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Found);

        assert_eq!(decoder.probe().max_concurrent(), 1);
    }

    #[test]
    fn test_buffer_follows_resolution_changes() {
        let decoder = ScriptedDecoder::new(vec![Ok(vec![]), Ok(vec!["x".into()])]);
        let platform = StubPlatform::granting(1280, 720)
            .with_resolutions(vec![(1280, 720), (640, 360)])
            .with_decoder(decoder.clone());
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Found);

        assert_eq!(decoder.probe().frame_sizes(), vec![(1280, 720), (640, 360)]);
    }

    #[test]
    fn test_binding_waits_for_surface() {
        let (surface, signal) = DeferredSurface::new();
        let decoder = ScriptedDecoder::new(vec![Ok(vec!["ok".into()])]);
        let platform = StubPlatform::granting(640, 480).with_decoder(decoder.clone());
        let stream_probe = platform.stream_probe();
        let mut h = Harness::with_surface(platform, Box::new(surface));

        h.session.start();
        h.step_until(Phase::Scanning);
        assert!(h.session.awaiting_surface());
        assert_eq!(stream_probe.bound(), 0);

        signal.mark_ready();
        signal.mark_ready();
        h.step_until(Phase::Found);

        assert_eq!(stream_probe.bound(), 1);
        assert_eq!(h.session.state().result(), Some("ok"));
    }

    #[test]
    fn test_stop_before_surface_releases_pending_camera() {
        let (surface, signal) = DeferredSurface::new();
        let platform = StubPlatform::granting(640, 480);
        let stream_probe = platform.stream_probe();
        let mut h = Harness::with_surface(platform, Box::new(surface));

        h.session.start();
        h.step_until(Phase::Scanning);
        h.session.stop();
        assert_eq!(stream_probe.stop_count(), 1);

        signal.mark_ready();
        let ev = h.events.recv_timeout(WAIT).unwrap();
        h.session.handle_event(ev);
        assert_eq!(stream_probe.bound(), 0);
        assert_eq!(h.session.state(), SessionState::idle());
    }

    #[test]
    fn test_bind_failure_surfaces_mapped_error() {
        let platform = StubPlatform::granting(640, 480).with_bind_error(ScanError::DeviceUnavailable);
        let stream_probe = platform.stream_probe();
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Error);

        assert_eq!(h.session.state().error_kind(), Some(ScanErrorKind::DeviceUnavailable));
        assert_eq!(stream_probe.stop_count(), 1);
    }

    #[test]
    fn test_capture_failure_reports_device_unavailable() {
        let platform = StubPlatform::granting(640, 480).with_capture_failure_after(0);
        let stream_probe = platform.stream_probe();
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Error);

        assert_eq!(h.session.state().error_kind(), Some(ScanErrorKind::DeviceUnavailable));
        assert_eq!(stream_probe.stop_count(), 1);
    }

    #[test]
    fn test_shutdown_releases_late_camera() {
        let platform = StubPlatform::granting(640, 480);
        let stream_probe = platform.stream_probe();
        let mut h = Harness::new(platform);

        h.session.start();
        h.session.shutdown();
        assert_eq!(h.session.state(), SessionState::idle());

        let ev = h.events.recv_timeout(WAIT).unwrap();
        h.session.handle_event(ev);

        assert_eq!(stream_probe.stop_count(), 1);
        assert_eq!(h.session.state(), SessionState::idle());
    }

    #[test]
    fn test_clear_resets_found_to_idle() {
        let decoder = ScriptedDecoder::new(vec![Ok(vec!["first".into()])]);
        let platform = StubPlatform::granting(640, 480).with_decoder(decoder);
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Found);
        h.session.clear();

        assert_eq!(h.session.state(), SessionState::idle());
    }

    #[test]
    fn test_restart_after_found_clears_result() {
        let decoder = ScriptedDecoder::new(vec![Ok(vec!["first".into()])]);
        let platform = StubPlatform::granting(640, 480).with_decoder(decoder);
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Found);
        h.session.start();

        let state = h.session.state();
        assert_eq!(state, SessionState::requesting());
        assert_eq!(state.result(), None);
    }

    #[test]
    fn test_clear_does_not_touch_active_scan() {
        let platform = StubPlatform::granting(640, 480).with_decoder(ScriptedDecoder::empty());
        let mut h = Harness::new(platform);

        h.session.start();
        h.step_until(Phase::Scanning);
        h.session.clear();
        assert_eq!(h.session.state().phase(), Phase::Scanning);
    }
}
