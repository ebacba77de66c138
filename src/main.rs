//! ptpbridge — command-line front end.
//!
//! ```text
//! ┌──────────────┐     ┌────────────────────────────┐     ┌───────────┐
//! │ args / stdin │────▶│ Bridge (parser · routes)   │────▶│ SimCamera │
//! │ one request  │     │ bounded JSON response      │     │ (port)    │
//! │ per line     │◀────│                            │◀────│           │
//! └──────────────┘     └────────────────────────────┘     └───────────┘
//! ```
//!
//! Each response is printed on its own line. Requests the bridge refuses
//! outright (unknown operation, malformed parameters) are reported on
//! stderr and processing continues.

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};
use tracing_subscriber::EnvFilter;

use ptpbridge::adapters::sim::{SimCamera, SimModel};
use ptpbridge::{Bridge, BridgeConfig, ParseMode};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CameraModel {
    /// Canon EOS body with the vendor extension.
    Eos,
    /// Plain PTP camera.
    Generic,
}

impl From<CameraModel> for SimModel {
    fn from(model: CameraModel) -> Self {
        match model {
            CameraModel::Eos => SimModel::CanonEos,
            CameraModel::Generic => SimModel::Generic,
        }
    }
}

#[derive(Parser)]
#[command(name = "ptpbridge")]
#[command(about = "Drive a PTP camera session with single-line text requests.", long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reject malformed parameter lists instead of stopping at them.
    #[arg(long)]
    strict: bool,

    /// Simulated camera to talk to.
    #[arg(long, value_enum, default_value_t = CameraModel::Eos)]
    camera: CameraModel,

    /// Requests to run in order. Reads one per line from stdin when empty.
    requests: Vec<String>,
}

fn load_config(cli: &Cli) -> Result<BridgeConfig> {
    let mut config: BridgeConfig = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => BridgeConfig::default(),
    };
    if cli.strict {
        config.parse_mode = ParseMode::Strict;
    }
    Ok(config)
}

fn run_one(
    bridge: &mut Bridge<SimCamera>,
    request: &str,
    out: &mut [u8],
    stdout: &mut impl Write,
) -> Result<()> {
    match bridge.dispatch(request, Some(&mut *out)) {
        Ok(n) => {
            stdout.write_all(&out[..n])?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
        Err(e) => error!("{:?}: {}", request.trim(), e),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut out = vec![0u8; config.output_capacity];
    let parse_mode = config.parse_mode;
    let mut bridge =
        Bridge::try_new(SimCamera::new(cli.camera.into()), config).context("invalid configuration")?;
    info!(
        "ptpbridge v{} ({:?} camera, {:?} parsing)",
        env!("CARGO_PKG_VERSION"),
        bridge.port().model(),
        parse_mode
    );
    let mut stdout = io::stdout().lock();

    if cli.requests.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            run_one(&mut bridge, &line, &mut out, &mut stdout)?;
        }
    } else {
        for request in &cli.requests {
            run_one(&mut bridge, request, &mut out, &mut stdout)?;
        }
    }
    Ok(())
}
