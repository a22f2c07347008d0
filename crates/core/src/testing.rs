//! Stub platform, camera stream and decoder shared by the session tests.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::camera::domain::camera_request::CameraRequest;
use crate::camera::domain::camera_stream::{CameraStream, CaptureError};
use crate::camera::domain::platform::Platform;
use crate::detection::domain::barcode_decoder::{BarcodeDecoder, DecodeError, DetectedBarcode};
use crate::shared::environment::{EnvironmentReport, Origin};
use crate::shared::frame::Frame;
use crate::shared::scan_error::ScanError;

// --- Camera stream ---

#[derive(Default)]
struct StreamCounters {
    opened: usize,
    bound: usize,
    stops: usize,
}

#[derive(Clone, Default)]
pub struct StreamProbe {
    counters: Arc<Mutex<StreamCounters>>,
}

impl StreamProbe {
    pub fn opened(&self) -> usize {
        self.counters.lock().unwrap().opened
    }

    pub fn bound(&self) -> usize {
        self.counters.lock().unwrap().bound
    }

    pub fn stop_count(&self) -> usize {
        self.counters.lock().unwrap().stops
    }
}

#[derive(Clone)]
struct StreamScript {
    resolutions: Vec<(u32, u32)>,
    bind_error: Option<ScanError>,
    fail_after: Option<usize>,
}

pub struct StubStream {
    script: StreamScript,
    captures: usize,
    probe: StreamProbe,
}

impl StubStream {
    pub fn new(width: u32, height: u32) -> (Self, StreamProbe) {
        let probe = StreamProbe::default();
        let script = StreamScript {
            resolutions: vec![(width, height)],
            bind_error: None,
            fail_after: None,
        };
        (Self::scripted(script, probe.clone()), probe)
    }

    fn scripted(script: StreamScript, probe: StreamProbe) -> Self {
        probe.counters.lock().unwrap().opened += 1;
        Self {
            script,
            captures: 0,
            probe,
        }
    }
}

impl CameraStream for StubStream {
    fn label(&self) -> String {
        "Stub Back Camera".into()
    }

    fn bind_surface(&mut self) -> Result<(), ScanError> {
        if let Some(err) = self.script.bind_error.clone() {
            return Err(err);
        }
        self.probe.counters.lock().unwrap().bound += 1;
        Ok(())
    }

    fn frame_dimensions(&mut self) -> Result<(u32, u32), CaptureError> {
        if let Some(limit) = self.script.fail_after {
            if self.captures >= limit {
                return Err(CaptureError::Read("device disconnected".into()));
            }
        }
        let last = self.script.resolutions.len() - 1;
        Ok(self.script.resolutions[self.captures.min(last)])
    }

    fn copy_frame_into(&mut self, buffer: &mut Frame) -> Result<(), CaptureError> {
        let (w, h) = self.frame_dimensions()?;
        assert_eq!((buffer.width(), buffer.height()), (w, h));
        buffer.data_mut().fill(200);
        self.captures += 1;
        Ok(())
    }

    fn stop_tracks(&mut self) {
        self.probe.counters.lock().unwrap().stops += 1;
    }
}

// --- Platform ---

type DecoderFactory = Arc<dyn Fn() -> Box<dyn BarcodeDecoder> + Send + Sync>;

#[derive(Default)]
struct PlatformCounters {
    requests: Vec<CameraRequest>,
    native_probes: usize,
}

#[derive(Clone, Default)]
pub struct PlatformProbe {
    counters: Arc<Mutex<PlatformCounters>>,
}

impl PlatformProbe {
    pub fn requests(&self) -> Vec<CameraRequest> {
        self.counters.lock().unwrap().requests.clone()
    }

    pub fn native_probes(&self) -> usize {
        self.counters.lock().unwrap().native_probes
    }
}

pub struct StubPlatform {
    origin: Origin,
    camera_api: bool,
    failure: Option<ScanError>,
    script: StreamScript,
    native: Option<DecoderFactory>,
    probe: PlatformProbe,
    stream_probe: StreamProbe,
}

impl StubPlatform {
    pub fn granting(width: u32, height: u32) -> Self {
        Self {
            origin: Origin::local_app(),
            camera_api: true,
            failure: None,
            script: StreamScript {
                resolutions: vec![(width, height)],
                bind_error: None,
                fail_after: None,
            },
            native: None,
            probe: PlatformProbe::default(),
            stream_probe: StreamProbe::default(),
        }
    }

    pub fn failing(error: ScanError) -> Self {
        Self {
            failure: Some(error),
            ..Self::granting(640, 480)
        }
    }

    pub fn without_camera_api(mut self) -> Self {
        self.camera_api = false;
        self
    }

    pub fn with_origin(mut self, scheme: &str, host: &str) -> Self {
        self.origin = Origin::new(scheme, host);
        self
    }

    pub fn with_resolutions(mut self, resolutions: Vec<(u32, u32)>) -> Self {
        self.script.resolutions = resolutions;
        self
    }

    pub fn with_bind_error(mut self, error: ScanError) -> Self {
        self.script.bind_error = Some(error);
        self
    }

    pub fn with_capture_failure_after(mut self, captures: usize) -> Self {
        self.script.fail_after = Some(captures);
        self
    }

    pub fn with_native_decoder(
        mut self,
        factory: impl Fn() -> Box<dyn BarcodeDecoder> + Send + Sync + 'static,
    ) -> Self {
        self.native = Some(Arc::new(factory));
        self
    }

    pub fn with_decoder(self, decoder: ScriptedDecoder) -> Self {
        self.with_native_decoder(move || Box::new(decoder.clone()))
    }

    pub fn probe(&self) -> PlatformProbe {
        self.probe.clone()
    }

    pub fn stream_probe(&self) -> StreamProbe {
        self.stream_probe.clone()
    }
}

impl Platform for StubPlatform {
    fn environment(&self) -> EnvironmentReport {
        EnvironmentReport {
            origin: self.origin.clone(),
            camera_api: self.camera_api,
            user_agent: "stub-platform/0".into(),
        }
    }

    fn has_camera_api(&self) -> bool {
        self.camera_api
    }

    fn native_decoder(&self) -> Option<Box<dyn BarcodeDecoder>> {
        self.probe.counters.lock().unwrap().native_probes += 1;
        self.native.as_ref().map(|factory| factory())
    }

    fn request_camera(&self, request: &CameraRequest) -> Result<Box<dyn CameraStream>, ScanError> {
        self.probe
            .counters
            .lock()
            .unwrap()
            .requests
            .push(request.clone());
        if let Some(err) = self.failure.clone() {
            return Err(err);
        }
        Ok(Box::new(StubStream::scripted(
            self.script.clone(),
            self.stream_probe.clone(),
        )))
    }
}

// --- Decoder ---

type Script = Vec<Result<Vec<String>, DecodeError>>;

#[derive(Default)]
struct DecoderCounters {
    calls: usize,
    active: usize,
    max_active: usize,
    frame_sizes: Vec<(u32, u32)>,
}

#[derive(Clone, Default)]
pub struct DecoderProbe {
    counters: Arc<Mutex<DecoderCounters>>,
}

impl DecoderProbe {
    pub fn calls(&self) -> usize {
        self.counters.lock().unwrap().calls
    }

    pub fn max_concurrent(&self) -> usize {
        self.counters.lock().unwrap().max_active
    }

    pub fn frame_sizes(&self) -> Vec<(u32, u32)> {
        self.counters.lock().unwrap().frame_sizes.clone()
    }

    pub fn wait_for_calls(&self, calls: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.calls() >= calls {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        false
    }
}

#[derive(Clone, Default)]
pub struct Gate {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl Gate {
    pub fn open(&self) {
        let (lock, cvar) = &*self.state;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    fn wait(&self) {
        let (lock, cvar) = &*self.state;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
    }
}

/// Decoder that replays a fixed script, then reports nothing forever.
/// Clones share the script, probe and gate.
#[derive(Clone)]
pub struct ScriptedDecoder {
    script: Arc<Mutex<Script>>,
    probe: DecoderProbe,
    gate: Option<Gate>,
}

impl ScriptedDecoder {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            probe: DecoderProbe::default(),
            gate: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Like `new`, but every call blocks until the gate is opened.
    pub fn gated(script: Script) -> Self {
        Self {
            gate: Some(Gate::default()),
            ..Self::new(script)
        }
    }

    pub fn gate(&self) -> Gate {
        self.gate.clone().unwrap_or_default()
    }

    pub fn probe(&self) -> DecoderProbe {
        self.probe.clone()
    }
}

impl BarcodeDecoder for ScriptedDecoder {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedBarcode>, DecodeError> {
        {
            let mut c = self.probe.counters.lock().unwrap();
            c.calls += 1;
            c.active += 1;
            c.max_active = c.max_active.max(c.active);
            c.frame_sizes.push((frame.width(), frame.height()));
        }

        if let Some(gate) = &self.gate {
            gate.wait();
        }

        let next = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Ok(Vec::new())
            } else {
                script.remove(0)
            }
        };

        self.probe.counters.lock().unwrap().active -= 1;
        next.map(|values| values.into_iter().map(DetectedBarcode::new).collect())
    }
}
