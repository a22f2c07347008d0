use std::time::Duration;

/// Advisory capture resolution requested from the camera.
pub const IDEAL_WIDTH: u32 = 1280;
pub const IDEAL_HEIGHT: u32 = 720;

/// Advisory capture rate requested alongside the resolution hint.
pub const IDEAL_FPS: u32 = 30;

/// Delay between a settled empty decode and the next capture (~one 60 Hz refresh).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// RGB frames throughout.
pub const FRAME_CHANNELS: u8 = 3;

/// Device-name fragments that identify an environment-facing camera.
pub const ENVIRONMENT_FACING_KEYWORDS: &[&str] = &["back", "rear", "environment", "world"];

/// Device-name fragments that identify a user-facing camera.
pub const USER_FACING_KEYWORDS: &[&str] = &["front", "user", "facetime", "selfie"];

/// Hosts treated as local, and therefore secure, regardless of scheme.
pub const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1"];

pub const SECURE_SCHEMES: &[&str] = &["https", "app"];
