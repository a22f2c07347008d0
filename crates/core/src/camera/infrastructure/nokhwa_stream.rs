use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;

use crate::camera::domain::camera_request::CameraRequest;
use crate::camera::domain::camera_stream::{CameraStream, CaptureError};
use crate::shared::constants::FRAME_CHANNELS;
use crate::shared::frame::Frame;
use crate::shared::scan_error::ScanError;

use super::failure_classifier::from_nokhwa;

enum Command {
    Bind,
    Capture,
    Stop,
}

enum Reply {
    Bound(Result<(), ScanError>),
    Captured(Result<RawFrame, CaptureError>),
}

struct RawFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Camera stream backed by `nokhwa`.
///
/// `nokhwa::Camera` is not `Send`, so the device lives on a capture thread
/// for its whole life and this handle talks to it over channels. Every
/// call is a synchronous request/reply; at most one is outstanding.
pub struct NokhwaStream {
    label: String,
    commands: Sender<Command>,
    replies: Receiver<Reply>,
    thread: Option<JoinHandle<()>>,
    latest: Option<RawFrame>,
}

impl NokhwaStream {
    /// Opens the device on a fresh capture thread.
    ///
    /// The resolution in `request` is passed as the closest-match hint;
    /// whatever the device settles on is what frames will report.
    pub fn open(index: CameraIndex, label: String, request: &CameraRequest) -> Result<Self, ScanError> {
        let (command_tx, command_rx) = crossbeam_channel::bounded::<Command>(1);
        let (reply_tx, reply_rx) = crossbeam_channel::bounded::<Reply>(1);
        let (opened_tx, opened_rx) = crossbeam_channel::bounded::<Result<(), ScanError>>(1);

        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(request.ideal_width, request.ideal_height),
                FrameFormat::MJPEG,
                request.ideal_fps,
            ),
        ));

        let thread = thread::spawn(move || {
            let camera = match Camera::new(index, format) {
                Ok(camera) => camera,
                Err(e) => {
                    let _ = opened_tx.send(Err(from_nokhwa(&e)));
                    return;
                }
            };
            let _ = opened_tx.send(Ok(()));
            serve(camera, command_rx, reply_tx);
        });

        match opened_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                label,
                commands: command_tx,
                replies: reply_rx,
                thread: Some(thread),
                latest: None,
            }),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(ScanError::Unknown("capture thread exited while opening camera".into()))
            }
        }
    }

    fn request(&mut self, command: Command) -> Result<Reply, CaptureError> {
        self.commands.send(command).map_err(|_| CaptureError::Ended)?;
        self.replies.recv().map_err(|_| CaptureError::Ended)
    }
}

impl CameraStream for NokhwaStream {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn bind_surface(&mut self) -> Result<(), ScanError> {
        match self.request(Command::Bind) {
            Ok(Reply::Bound(result)) => result,
            Ok(Reply::Captured(_)) => Err(ScanError::Unknown("unexpected capture reply".into())),
            Err(e) => Err(ScanError::Unknown(e.to_string())),
        }
    }

    fn frame_dimensions(&mut self) -> Result<(u32, u32), CaptureError> {
        match self.request(Command::Capture)? {
            Reply::Captured(Ok(raw)) => {
                let dims = (raw.width, raw.height);
                self.latest = Some(raw);
                Ok(dims)
            }
            Reply::Captured(Err(e)) => Err(e),
            Reply::Bound(_) => Err(CaptureError::Read("unexpected bind reply".into())),
        }
    }

    fn copy_frame_into(&mut self, buffer: &mut Frame) -> Result<(), CaptureError> {
        let raw = self.latest.take().ok_or(CaptureError::Unbound)?;
        if (raw.width, raw.height) != (buffer.width(), buffer.height())
            || buffer.channels() != FRAME_CHANNELS
        {
            return Err(CaptureError::Read(format!(
                "buffer is {}x{}x{}, frame is {}x{}x{FRAME_CHANNELS}",
                buffer.width(),
                buffer.height(),
                buffer.channels(),
                raw.width,
                raw.height
            )));
        }
        buffer.data_mut().copy_from_slice(&raw.data);
        Ok(())
    }

    fn stop_tracks(&mut self) {
        let _ = self.commands.send(Command::Stop);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Capture thread for {} panicked", self.label);
            }
        }
        self.latest = None;
    }
}

impl Drop for NokhwaStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

/// Capture thread body: owns the camera until told to stop or orphaned.
fn serve(mut camera: Camera, commands: Receiver<Command>, replies: Sender<Reply>) {
    let mut streaming = false;
    for command in commands {
        let reply = match command {
            Command::Bind => {
                let result = camera.open_stream().map_err(|e| from_nokhwa(&e));
                streaming = result.is_ok();
                if streaming {
                    log::debug!("Camera format: {:?}", camera.camera_format());
                }
                Reply::Bound(result)
            }
            Command::Capture if !streaming => Reply::Captured(Err(CaptureError::Unbound)),
            Command::Capture => Reply::Captured(capture(&mut camera)),
            Command::Stop => break,
        };
        if replies.send(reply).is_err() {
            break;
        }
    }

    if streaming {
        if let Err(e) = camera.stop_stream() {
            log::warn!("Failed to stop camera stream: {e}");
        }
    }
}

fn capture(camera: &mut Camera) -> Result<RawFrame, CaptureError> {
    let buffer = camera
        .frame()
        .map_err(|e| CaptureError::Read(e.to_string()))?;
    let resolution = buffer.resolution();
    let (width, height) = (resolution.width(), resolution.height());

    let mut data = vec![0u8; (width as usize) * (height as usize) * FRAME_CHANNELS as usize];
    buffer
        .decode_image_to_buffer::<RgbFormat>(&mut data)
        .map_err(|e| CaptureError::Read(e.to_string()))?;

    Ok(RawFrame {
        width,
        height,
        data,
    })
}
