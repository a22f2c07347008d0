use std::fmt;

use crate::shared::constants::{LOCAL_HOSTS, SECURE_SCHEMES};
use crate::shared::scan_error::ScanError;

/// Where the scanner is being served from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    pub scheme: String,
    pub host: String,
}

impl Origin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Origin of a natively installed application.
    pub fn local_app() -> Self {
        Self::new("app", "localhost")
    }

    pub fn is_secure(&self) -> bool {
        SECURE_SCHEMES.contains(&self.scheme.to_lowercase().as_str())
    }

    pub fn is_local(&self) -> bool {
        LOCAL_HOSTS.contains(&self.host.to_lowercase().as_str())
    }
}

/// Read-only diagnostic snapshot of the runtime environment.
///
/// Computed once when a session is created. Only two facts feed back into
/// control flow: a missing camera API and an insecure, non-local origin
/// both put the session into its initial error state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub origin: Origin,
    pub camera_api: bool,
    pub user_agent: String,
}

impl EnvironmentReport {
    pub fn is_secure(&self) -> bool {
        self.origin.is_secure()
    }

    pub fn is_local(&self) -> bool {
        self.origin.is_local()
    }

    /// The failure a start request would hit before reaching hardware.
    pub fn preflight_error(&self) -> Option<ScanError> {
        if !self.camera_api {
            Some(ScanError::UnsupportedPlatform)
        } else if !self.is_secure() && !self.is_local() {
            Some(ScanError::InsecureOrigin)
        } else {
            None
        }
    }
}

impl fmt::Display for EnvironmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Protocol: {}:, Host: {}",
            self.origin.scheme, self.origin.host
        )?;
        writeln!(
            f,
            "Secure: {}, Localhost: {}",
            self.is_secure(),
            self.is_local()
        )?;
        writeln!(f, "Camera API: {}", self.camera_api)?;
        write!(f, "User Agent: {}", self.user_agent)
    }
}
