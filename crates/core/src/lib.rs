//! Camera acquisition and live barcode scanning.
//!
//! A [`scanning::session_runner::ScannerHandle`] is the entry point for
//! callers: it exposes start/stop controls and a read-only view of the
//! session state while the session event loop runs on its own thread.

pub mod camera {
    pub mod domain {
        pub mod camera_handle;
        pub mod camera_request;
        pub mod camera_stream;
        pub mod platform;
        pub mod surface;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod barcode_decoder;
    }
    pub mod infrastructure;
}

pub mod scanning {
    pub mod acquisition;
    pub mod frame_tick;
    pub mod scan_session;
    pub mod session_event;
    pub mod session_runner;
}

pub mod session {
    pub mod domain {
        pub mod session_state;
        pub mod session_store;
    }
}

pub mod shared {
    pub mod constants;
    pub mod environment;
    pub mod frame;
    pub mod scan_error;
}

#[cfg(test)]
pub(crate) mod testing;
