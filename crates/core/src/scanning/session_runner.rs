use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{select, Receiver, Sender};

use crate::camera::domain::platform::Platform;
use crate::camera::domain::surface::SurfaceProvider;
use crate::session::domain::session_state::SessionState;
use crate::session::domain::session_store::SessionStateReader;
use crate::shared::environment::EnvironmentReport;

use super::scan_session::{ScanSession, SessionConfig};
use super::session_event::SessionEvent;

enum SessionCommand {
    Start,
    Stop,
    Clear,
    Shutdown,
}

/// Caller-side controls for a session running on its own event loop.
///
/// Controls are fire-and-forget: each is queued to the loop and applied in
/// order. Observe the outcome through [`ScannerHandle::state`] or
/// [`ScannerHandle::subscribe`]. Dropping the handle shuts the session down
/// and releases the camera.
pub struct ScannerHandle {
    commands: Sender<SessionCommand>,
    reader: SessionStateReader,
    environment: EnvironmentReport,
    thread: Option<JoinHandle<()>>,
}

/// Creates a session and runs its event loop on a dedicated thread.
pub fn spawn(
    platform: Arc<dyn Platform>,
    surface: Box<dyn SurfaceProvider>,
    config: SessionConfig,
) -> ScannerHandle {
    let (command_tx, command_rx) = crossbeam_channel::unbounded::<SessionCommand>();
    let (event_tx, event_rx) = crossbeam_channel::unbounded::<SessionEvent>();

    let session = ScanSession::new(platform, surface, config, event_tx);
    let reader = session.reader();
    let environment = session.environment().clone();

    let thread = thread::spawn(move || run_loop(session, command_rx, event_rx));

    ScannerHandle {
        commands: command_tx,
        reader,
        environment,
        thread: Some(thread),
    }
}

impl ScannerHandle {
    pub fn start(&self) {
        let _ = self.commands.send(SessionCommand::Start);
    }

    pub fn stop(&self) {
        let _ = self.commands.send(SessionCommand::Stop);
    }

    pub fn clear(&self) {
        let _ = self.commands.send(SessionCommand::Clear);
    }

    pub fn state(&self) -> SessionState {
        self.reader.snapshot()
    }

    pub fn subscribe(&self) -> Receiver<SessionState> {
        self.reader.subscribe()
    }

    pub fn reader(&self) -> SessionStateReader {
        self.reader.clone()
    }

    pub fn environment(&self) -> &EnvironmentReport {
        &self.environment
    }

    /// Stops the loop, releases the camera and waits for the loop to exit.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Session thread panicked");
            }
        }
    }
}

impl Drop for ScannerHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// The session's single logical thread: controls, async completions and
/// frame ticks are all applied here, one at a time.
fn run_loop(
    mut session: ScanSession,
    commands: Receiver<SessionCommand>,
    events: Receiver<SessionEvent>,
) {
    loop {
        let tick = session.pending_tick();
        let tick_rx = tick
            .as_ref()
            .map(|(_, rx)| rx.clone())
            .unwrap_or_else(crossbeam_channel::never);

        select! {
            recv(commands) -> cmd => match cmd {
                Ok(SessionCommand::Start) => session.start(),
                Ok(SessionCommand::Stop) => session.stop(),
                Ok(SessionCommand::Clear) => session.clear(),
                Ok(SessionCommand::Shutdown) | Err(_) => {
                    session.shutdown();
                    break;
                }
            },
            recv(events) -> event => {
                if let Ok(event) = event {
                    session.handle_event(event);
                }
            }
            recv(tick_rx) -> _ => {
                if let Some((id, _)) = tick {
                    session.handle_event(SessionEvent::TickFired { tick: id });
                }
            }
        }
    }
    log::debug!("Session loop exited");
}
