use nokhwa::utils::{ApiBackend, CameraIndex, CameraInfo};

use crate::camera::domain::camera_request::CameraRequest;
use crate::camera::domain::camera_stream::CameraStream;
use crate::camera::domain::platform::Platform;
use crate::detection::domain::barcode_decoder::BarcodeDecoder;
use crate::shared::environment::{EnvironmentReport, Origin};
use crate::shared::scan_error::ScanError;

use super::failure_classifier::from_nokhwa;
use super::nokhwa_stream::NokhwaStream;

/// A camera as enumerated by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub index: u32,
    pub name: String,
    pub description: String,
}

/// Native desktop platform: cameras through `nokhwa`'s OS backend.
///
/// The host has no barcode service of its own, so sessions on this
/// platform always resolve to the bundled decoder.
pub struct NokhwaPlatform;

impl NokhwaPlatform {
    pub fn new() -> Self {
        Self
    }

    /// Lists the cameras visible to the native backend.
    pub fn list_devices(&self) -> Result<Vec<DeviceInfo>, ScanError> {
        Ok(query_cameras()?
            .iter()
            .enumerate()
            .map(|(position, info)| DeviceInfo {
                index: numeric_index(info.index(), position),
                name: info.human_name(),
                description: info.description().to_string(),
            })
            .collect())
    }
}

impl Default for NokhwaPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for NokhwaPlatform {
    fn environment(&self) -> EnvironmentReport {
        EnvironmentReport {
            origin: Origin::local_app(),
            camera_api: self.has_camera_api(),
            user_agent: user_agent(),
        }
    }

    fn has_camera_api(&self) -> bool {
        nokhwa::native_api_backend().is_some()
    }

    fn native_decoder(&self) -> Option<Box<dyn BarcodeDecoder>> {
        None
    }

    fn request_camera(&self, request: &CameraRequest) -> Result<Box<dyn CameraStream>, ScanError> {
        request_permission()?;

        let cameras = query_cameras()?;
        let (index, label) = select_camera(&cameras, request)?;
        log::info!("Opening camera {label} ({index})");

        let stream = NokhwaStream::open(index, label, request)?;
        Ok(Box::new(stream))
    }
}

/// Blocks until the OS permission prompt (if any) is answered.
fn request_permission() -> Result<(), ScanError> {
    let (tx, rx) = crossbeam_channel::bounded::<bool>(1);
    nokhwa::nokhwa_initialize(move |granted| {
        let _ = tx.send(granted);
    });
    let granted = rx.recv().unwrap_or(false);
    if granted && nokhwa::nokhwa_check() {
        Ok(())
    } else {
        Err(ScanError::PermissionDenied)
    }
}

fn query_cameras() -> Result<Vec<CameraInfo>, ScanError> {
    let backend = nokhwa::native_api_backend().unwrap_or(ApiBackend::Auto);
    nokhwa::query(backend).map_err(|e| from_nokhwa(&e))
}

/// Picks a device: an explicit index if requested, otherwise the first
/// whose name matches the preferred facing, otherwise the first listed.
fn select_camera(
    cameras: &[CameraInfo],
    request: &CameraRequest,
) -> Result<(CameraIndex, String), ScanError> {
    let labels: Vec<String> = cameras.iter().map(CameraInfo::human_name).collect();
    let position = pick_position(&labels, request).ok_or(ScanError::DeviceNotFound)?;
    let chosen = &cameras[position];
    Ok((chosen.index().clone(), labels[position].clone()))
}

fn pick_position(labels: &[String], request: &CameraRequest) -> Option<usize> {
    if labels.is_empty() {
        return None;
    }
    match request.device_index {
        Some(wanted) => {
            let wanted = wanted as usize;
            (wanted < labels.len()).then_some(wanted)
        }
        None => Some(
            labels
                .iter()
                .position(|label| request.facing.matches_label(label))
                .unwrap_or(0),
        ),
    }
}

fn numeric_index(index: &CameraIndex, position: usize) -> u32 {
    match index {
        CameraIndex::Index(i) => *i,
        CameraIndex::String(_) => position as u32,
    }
}

fn user_agent() -> String {
    format!(
        "barscan/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
