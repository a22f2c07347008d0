mod settings;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::RecvTimeoutError;

use barscan_core::camera::domain::platform::Platform;
use barscan_core::camera::domain::surface::ImmediateSurface;
use barscan_core::camera::infrastructure::nokhwa_platform::NokhwaPlatform;
use barscan_core::scanning::session_runner;
use barscan_core::session::domain::session_state::{Phase, SessionState};
use barscan_core::shared::scan_error::ScanErrorKind;

use settings::{DecoderChoice, Settings};

const EXIT_ERROR: i32 = 1;
const EXIT_TIMEOUT: i32 = 2;

/// Scan a barcode from a live camera.
#[derive(Parser)]
#[command(name = "barscan")]
struct Cli {
    /// Camera index to open (default: first environment-facing device).
    #[arg(long)]
    device: Option<u32>,

    /// Ideal capture width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Ideal capture height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Delay between scan cycles in milliseconds.
    #[arg(long)]
    frame_interval_ms: Option<u64>,

    /// Decoder backend: auto or bundled.
    #[arg(long, value_enum)]
    decoder: Option<DecoderChoice>,

    /// Give up after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Settings file (default: user config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resolved settings to the settings file and exit.
    #[arg(long)]
    save_config: bool,

    /// List cameras and exit.
    #[arg(long)]
    list_devices: bool,

    /// Print the environment report and exit.
    #[arg(long)]
    diagnose: bool,
}

enum ScanOutcome {
    Found(String),
    Failed { message: String, retryable: bool },
    TimedOut,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(None) => {}
        Ok(Some(ScanOutcome::Found(value))) => println!("{value}"),
        Ok(Some(ScanOutcome::Failed { message, retryable })) => {
            eprintln!("{message}");
            if !retryable {
                eprintln!("Scanning is not possible in this environment; retrying will not help.");
            }
            process::exit(EXIT_ERROR);
        }
        Ok(Some(ScanOutcome::TimedOut)) => {
            eprintln!("No barcode found before timeout");
            process::exit(EXIT_TIMEOUT);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(EXIT_ERROR);
        }
    }
}

fn run() -> Result<Option<ScanOutcome>, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    settings.validate()?;

    if cli.save_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Settings::config_path().ok_or("No config directory on this system")?,
        };
        settings.save_to(&path)?;
        println!("Saved settings to {}", path.display());
        return Ok(None);
    }

    let platform = NokhwaPlatform::new();

    if cli.list_devices {
        list_devices(&platform)?;
        return Ok(None);
    }
    if cli.diagnose {
        diagnose(&platform);
        return Ok(None);
    }

    let timeout = cli.timeout.map(Duration::from_secs);
    Ok(Some(scan(platform, &settings, timeout)))
}

fn resolve_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if cli.device.is_some() {
        settings.device = cli.device;
    }
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }
    if let Some(ms) = cli.frame_interval_ms {
        settings.frame_interval_ms = ms;
    }
    if let Some(decoder) = cli.decoder {
        settings.decoder = decoder;
    }
    Ok(settings)
}

fn list_devices(platform: &NokhwaPlatform) -> Result<(), Box<dyn std::error::Error>> {
    let devices = platform.list_devices()?;
    if devices.is_empty() {
        println!("No cameras found");
    }
    for device in devices {
        println!("{}: {} ({})", device.index, device.name, device.description);
    }
    Ok(())
}

fn diagnose(platform: &NokhwaPlatform) {
    let report = platform.environment();
    print!("{report}");
    match report.preflight_error() {
        Some(err) => println!("Preflight: {err}"),
        None => println!("Preflight: ok"),
    }
}

fn scan(platform: NokhwaPlatform, settings: &Settings, timeout: Option<Duration>) -> ScanOutcome {
    let handle = session_runner::spawn(
        Arc::new(platform),
        Box::new(ImmediateSurface),
        settings.session_config(),
    );
    let states = handle.subscribe();
    let deadline = timeout.map(|t| Instant::now() + t);

    handle.start();
    loop {
        let next = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                states.recv_timeout(remaining)
            }
            None => states.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match next {
            Ok(state) => {
                log::debug!("Session {}", state.phase());
                if let Some(outcome) = settled(&state) {
                    handle.shutdown();
                    return outcome;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                handle.stop();
                handle.shutdown();
                return ScanOutcome::TimedOut;
            }
            Err(RecvTimeoutError::Disconnected) => {
                let last = handle.state();
                handle.shutdown();
                return settled(&last).unwrap_or_else(|| ScanOutcome::Failed {
                    message: "Scan session ended".into(),
                    retryable: true,
                });
            }
        }
    }
}

fn settled(state: &SessionState) -> Option<ScanOutcome> {
    match state.phase() {
        Phase::Found => state.result().map(|v| ScanOutcome::Found(v.to_string())),
        Phase::Error => Some(ScanOutcome::Failed {
            message: state.message().unwrap_or("Scan failed").to_string(),
            retryable: state
                .error_kind()
                .map_or(true, ScanErrorKind::is_retryable),
        }),
        Phase::Idle | Phase::Requesting | Phase::Scanning => None,
    }
}
