//! Windowed replay of recorded spiking-network activity.
//!
//! The viewer opens one window sized to the configured surface and
//! replays `spikeTrains.csv` against it: each recently fired neuron is
//! drawn as a small circle at its recorded position, excitatory neurons
//! in one color and inhibitory neurons in another, for as long as its
//! visibility window lasts. Closing the window or pressing Escape ends
//! the run cleanly.
//!
//! # Startup sequence
//!
//! 1. Parse CLI arguments and load the YAML configuration.
//! 2. Open the window (macroquad owns the event loop).
//! 3. Load the neuron tables, build the catalog, load the spike train.
//! 4. Run playback to exhaustion or until a quit request.

mod control;
mod error;
mod render;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use clap::Parser;
use macroquad::miniquad::conf::Conf;
use macroquad::input::prevent_quit;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use spikescope_core::config::{ReplayConfig, SurfaceConfig};
use spikescope_core::control::WallClockPacer;
use spikescope_core::runner::log_playback_end;
use spikescope_core::{run_playback, NeuronCatalog, PlaybackEngine};
use spikescope_data::{load_inhibitory_flags, load_locations, load_spike_train};

use crate::control::WindowControl;
use crate::error::ViewerError;
use crate::render::MacroquadSink;

/// Config file looked up in the working directory when `--config` is
/// not given. Missing is fine; defaults match the recording layout.
const DEFAULT_CONFIG_PATH: &str = "spikescope-config.yaml";

/// Replay recorded spiking-network activity in a window.
#[derive(Debug, Parser)]
#[command(name = "spikescope-viewer", version, about)]
struct CliArgs {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the recorded CSV tables (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Simulated time at which playback starts (overrides config).
    #[arg(short, long)]
    start_time: Option<f64>,
}

/// Everything that must be resolved before the window opens: the window
/// dimensions come from the config, and macroquad needs them in
/// `window_conf` before `main` runs.
#[derive(Debug, Clone)]
struct Bootstrap {
    config: ReplayConfig,
    data_dir: PathBuf,
}

static BOOTSTRAP: OnceLock<Result<Bootstrap, String>> = OnceLock::new();

/// Parse arguments and load configuration, once. `window_conf` and
/// `main` both consult the same result.
fn bootstrap() -> &'static Result<Bootstrap, String> {
    BOOTSTRAP.get_or_init(|| {
        let args = CliArgs::parse();

        let mut config = match &args.config {
            Some(path) => ReplayConfig::from_file(path)
                .map_err(|err| format!("{}: {err}", path.display()))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    ReplayConfig::from_file(path)
                        .map_err(|err| format!("{DEFAULT_CONFIG_PATH}: {err}"))?
                } else {
                    ReplayConfig::default()
                }
            }
        };

        if let Some(start_time) = args.start_time {
            config.playback.start_time_seconds = start_time;
        }
        let data_dir = args
            .data_dir
            .unwrap_or_else(|| PathBuf::from(&config.data.directory));

        Ok(Bootstrap { config, data_dir })
    })
}

/// Window configuration, queried by macroquad before `main`.
fn window_conf() -> Conf {
    let (width, height) = match bootstrap() {
        Ok(boot) => (boot.config.surface.width, boot.config.surface.height),
        // The bootstrap error surfaces in main; open a default-sized
        // window so the process can report it and exit.
        Err(_) => {
            let surface = SurfaceConfig::default();
            (surface.width, surface.height)
        }
    };
    Conf {
        window_title: "Spikescope".to_owned(),
        window_width: width as i32,
        window_height: height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(err) = run().await {
        error!(error = %err, "playback failed");
        std::process::exit(1);
    }
}

/// Load everything and run playback to completion.
async fn run() -> Result<(), ViewerError> {
    let boot = match bootstrap() {
        Ok(boot) => boot.clone(),
        Err(message) => {
            return Err(ViewerError::Bootstrap {
                message: message.clone(),
            })
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&boot.config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("spikescope-viewer starting");
    info!(
        start_time = boot.config.playback.start_time_seconds,
        step_seconds = boot.config.playback.step_seconds,
        flash_seconds = boot.config.playback.flash_seconds,
        width = boot.config.surface.width,
        height = boot.config.surface.height,
        data_dir = %boot.data_dir.display(),
        "configuration loaded"
    );

    // Route the window's close request through the per-tick poll
    // instead of killing the process mid-frame.
    prevent_quit();

    let locations = load_locations(&boot.data_dir.join("locations.csv"))?;
    let flags = load_inhibitory_flags(&boot.data_dir.join("neuronInfos.csv"))?;
    let catalog = NeuronCatalog::new(
        &locations,
        &flags,
        boot.config.surface.width,
        boot.config.surface.height,
    )?;
    info!(neurons = catalog.len(), "neuron catalog built");

    let events = load_spike_train(
        &boot.data_dir.join("spikeTrains.csv"),
        boot.config.playback.start_time_seconds,
    )?;
    info!(events = events.len(), "spike train loaded");

    let mut engine = PlaybackEngine::new(&boot.config.playback)?;
    let mut sink = MacroquadSink::new(&boot.config.colors);
    let mut control = WindowControl;
    let mut pacer = WallClockPacer::new(boot.config.playback.step_seconds);

    let result = run_playback(
        &mut engine,
        &events,
        &catalog,
        &mut sink,
        &mut control,
        &mut pacer,
    )
    .await?;
    log_playback_end(&result);

    Ok(())
}
