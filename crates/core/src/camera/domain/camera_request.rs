use crate::shared::constants::{
    ENVIRONMENT_FACING_KEYWORDS, IDEAL_FPS, IDEAL_HEIGHT, IDEAL_WIDTH, USER_FACING_KEYWORDS,
};

/// Which way the preferred camera points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacingMode {
    /// Away from the user (rear camera on phones and tablets).
    Environment,
    /// Towards the user.
    User,
}

impl FacingMode {
    /// Whether a device name suggests it faces this way.
    pub fn matches_label(self, label: &str) -> bool {
        let keywords = match self {
            FacingMode::Environment => ENVIRONMENT_FACING_KEYWORDS,
            FacingMode::User => USER_FACING_KEYWORDS,
        };
        let label = label.to_lowercase();
        keywords.iter().any(|k| label.contains(k))
    }
}

/// Parameters for a camera request.
///
/// Facing mode and resolution are hints: the platform may hand back any
/// compatible device at any resolution. Only `device_index` is binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraRequest {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub ideal_fps: u32,
    pub device_index: Option<u32>,
}

impl Default for CameraRequest {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
            ideal_fps: IDEAL_FPS,
            device_index: None,
        }
    }
}
