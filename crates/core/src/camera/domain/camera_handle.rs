use super::camera_stream::CameraStream;

/// Exclusive ownership of a live camera stream.
///
/// Releasing stops every track. Dropping an unreleased handle releases it
/// too, so no code path can leak a running camera.
pub struct CameraHandle {
    stream: Box<dyn CameraStream>,
    released: bool,
}

impl CameraHandle {
    pub fn new(stream: Box<dyn CameraStream>) -> Self {
        Self {
            stream,
            released: false,
        }
    }

    pub fn label(&self) -> String {
        self.stream.label()
    }

    pub fn stream_mut(&mut self) -> &mut dyn CameraStream {
        self.stream.as_mut()
    }

    pub fn release(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if !self.released {
            log::info!("Releasing camera: {}", self.stream.label());
            self.stream.stop_tracks();
            self.released = true;
        }
    }
}

impl Drop for CameraHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
