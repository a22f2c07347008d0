use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{Receiver, Sender};

use super::session_state::SessionState;

struct Shared {
    state: Mutex<SessionState>,
    subscribers: Mutex<Vec<Sender<SessionState>>>,
}

/// Single authoritative holder of a session's [`SessionState`].
///
/// Only the scanning session owns a `SessionStore`; everyone else gets a
/// [`SessionStateReader`], which can snapshot and subscribe but not mutate.
pub struct SessionStore {
    shared: Arc<Shared>,
}

impl SessionStore {
    pub fn new(initial: SessionState) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(initial),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn reader(&self) -> SessionStateReader {
        SessionStateReader {
            shared: self.shared.clone(),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        lock(&self.shared.state).clone()
    }

    /// Replaces the state and pushes the new snapshot to every subscriber
    /// before returning. Subscribers whose receiver was dropped are pruned.
    pub(crate) fn publish(&self, next: SessionState) {
        *lock(&self.shared.state) = next.clone();
        lock(&self.shared.subscribers).retain(|tx| tx.send(next.clone()).is_ok());
    }
}

/// Read-only projection of a [`SessionStore`].
#[derive(Clone)]
pub struct SessionStateReader {
    shared: Arc<Shared>,
}

impl SessionStateReader {
    pub fn snapshot(&self) -> SessionState {
        lock(&self.shared.state).clone()
    }

    /// Returns a receiver that gets a snapshot at every transition from now on.
    pub fn subscribe(&self) -> Receiver<SessionState> {
        let (tx, rx) = crossbeam_channel::unbounded();
        lock(&self.shared.subscribers).push(tx);
        rx
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
