use std::sync::{Arc, Mutex};

/// One-shot notification that the decodable surface now exists.
pub type SurfaceReadyFn = Box<dyn FnOnce() + Send>;

/// Tells a session when the presentation layer's surface can accept a stream.
///
/// A granted stream may arrive before anything exists to bind it to. The
/// session registers one callback per acquisition; the provider runs it as
/// soon as the surface is there, possibly immediately.
pub trait SurfaceProvider: Send {
    fn when_ready(&mut self, ready: SurfaceReadyFn);
}

/// Surface that always exists. Used when nothing is rendered (CLI, tests).
pub struct ImmediateSurface;

impl SurfaceProvider for ImmediateSurface {
    fn when_ready(&mut self, ready: SurfaceReadyFn) {
        ready();
    }
}

#[derive(Default)]
struct SlotState {
    ready: bool,
    waiting: Option<SurfaceReadyFn>,
}

/// Surface whose readiness is driven by the presentation layer through a
/// [`SurfaceSignal`].
///
/// Registering while a callback is already waiting replaces it; only the
/// latest acquisition is ever bound.
pub struct DeferredSurface {
    slot: Arc<Mutex<SlotState>>,
}

/// Presentation-side handle paired with a [`DeferredSurface`].
#[derive(Clone)]
pub struct SurfaceSignal {
    slot: Arc<Mutex<SlotState>>,
}

impl DeferredSurface {
    pub fn new() -> (Self, SurfaceSignal) {
        let slot = Arc::new(Mutex::new(SlotState::default()));
        (Self { slot: slot.clone() }, SurfaceSignal { slot })
    }
}

impl SurfaceProvider for DeferredSurface {
    fn when_ready(&mut self, ready: SurfaceReadyFn) {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        if slot.ready {
            drop(slot);
            ready();
        } else {
            slot.waiting = Some(ready);
        }
    }
}

impl SurfaceSignal {
    /// The surface has been rendered. Runs the waiting callback, if any.
    pub fn mark_ready(&self) {
        let waiting = {
            let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
            slot.ready = true;
            slot.waiting.take()
        };
        if let Some(ready) = waiting {
            ready();
        }
    }
}
