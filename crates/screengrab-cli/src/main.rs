//! screengrab: fast monitor screenshot utility
//!
//! Captures all monitors, one monitor or an explicit region and writes a PNG
//! to a file or to standard output. Works from cron and other detached
//! sessions by falling back to the primary local X display.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use screengrab_core::capture::Capturer;
use screengrab_core::config;
use screengrab_core::error::{CaptureError, ErrorCategory};
use screengrab_core::model::{CaptureRequest, CompressionLevel, Rect};
use screengrab_core::util::encode::encode_to;
use screengrab_core::util::files::default_filename;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "screengrab=info,screengrab_core=warn";

#[derive(Parser, Debug)]
#[command(name = "screengrab", version)]
#[command(about = "Fast screenshot utility")]
#[command(long_about = "Fast screenshot utility.

Captures all monitors, a single monitor or a region, and keeps working from
cron jobs and locked sessions by falling back to display :0.

Compression levels:
  -r            Raw, no compression effort (fastest, largest)
  -c            Fast compression (default)
  -cc           Balanced compression
  -ccc          Best compression (slowest, smallest)")]
#[command(after_help = "Examples:
  screengrab                          Capture all monitors, fast compression
  screengrab shot.png                 Capture to a specific file
  screengrab -ccc                     Best compression
  screengrab --stdout | feh -         Pipe to an image viewer
  screengrab -m 1                     Capture only monitor 1
  screengrab --region 100,100,500,400 Capture a region (x,y,width,height)
  screengrab -d :0                    Force the X display (for cron)
  screengrab --list                   List available monitors")]
struct Cli {
    /// Output file (overrides --output)
    #[arg(value_name = "OUTPUT")]
    file: Option<PathBuf>,

    /// Monitor index to capture (-1 = all monitors)
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    monitor: i32,

    /// Region to capture: x,y,width,height
    #[arg(long, value_name = "X,Y,W,H", allow_hyphen_values = true)]
    region: Option<String>,

    /// Output filename (default: screenshot_TIMESTAMP.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// X11 display to capture (default: $DISPLAY or :0)
    #[arg(short, long)]
    display: Option<String>,

    /// List available monitors
    #[arg(short, long)]
    list: bool,

    /// Print the monitor list as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Compression level: -c fast, -cc balanced, -ccc best
    #[arg(short = 'c', long = "compress", action = ArgAction::Count)]
    compress: u8,

    /// No compression effort (fastest, largest files)
    #[arg(short, long)]
    raw: bool,

    /// Open the screenshot in the default viewer after capture
    #[arg(short, long)]
    view: bool,

    /// Write PNG to stdout (for piping)
    #[arg(long)]
    stdout: bool,

    /// List compiled-in capture strategies and whether they are usable
    #[arg(long)]
    strategies: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn compression(&self) -> CompressionLevel {
        CompressionLevel::from_flags(self.raw, self.compress)
    }

    /// Positional OUTPUT wins over `-o`; with neither a timestamped name is
    /// generated
    fn output_path(&self) -> PathBuf {
        self.file
            .clone()
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| PathBuf::from(default_filename(&config::filename_prefix())))
    }

    fn request(&self) -> Result<CaptureRequest, CaptureError> {
        let region = self.region.as_deref().map(str::parse::<Rect>).transpose()?;

        let mut builder = CaptureRequest::builder()
            .monitor(self.monitor)
            .maybe_region(region);
        if let Some(display) = &self.display {
            builder = builder.display(display.as_str());
        }
        builder.build()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.quiet) {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(capture_error) = e.downcast_ref::<CaptureError>() {
                eprintln!("Hint: {}", capture_error.remediation_hint());
            }
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn init_logging(quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::try_new("error")?
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(DEFAULT_LOG_FILTER)?,
        }
    };

    // stderr keeps --stdout output clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// 2 for invalid user input, 1 for everything else
fn exit_code_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<CaptureError>().map(CaptureError::category) {
        Some(ErrorCategory::InvalidInput) => 2,
        _ => 1,
    }
}

fn run(cli: &Cli) -> Result<()> {
    let capturer = Capturer::with_default_strategies();

    if cli.strategies {
        print_strategies(&capturer);
        return Ok(());
    }

    if cli.list {
        return list_monitors(&capturer, cli.display.as_deref(), cli.json);
    }

    let request = cli.request()?;
    let level = cli.compression();
    tracing::debug!(?request, %level, "Parsed capture request");

    if cli.stdout {
        let raster = capturer.capture(&request)?;
        let stdout = std::io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        encode_to(&raster, level, &mut writer)?;
        writer.flush().map_err(CaptureError::from)?;
        return Ok(());
    }

    let path = cli.output_path();
    capturer.capture_to_file(&request, level, &path)?;
    println!("Screenshot saved: {}", path.display());

    if cli.view {
        open_viewer(&path).context("Failed to open viewer")?;
    }

    Ok(())
}

fn print_strategies(capturer: &Capturer) {
    let statuses = capturer.strategies();
    if statuses.is_empty() {
        println!("No capture strategies compiled in for this platform");
        return;
    }

    println!("Capture strategies (priority order):");
    for status in statuses {
        let state = if status.available { "available" } else { "unavailable" };
        println!("  {:<8} {}", status.name, state);
    }
}

fn list_monitors(capturer: &Capturer, display: Option<&str>, json: bool) -> Result<()> {
    let display = display.filter(|d| !d.trim().is_empty());
    let monitors = capturer.list_monitors_on(display)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&monitors)?);
        return Ok(());
    }

    println!("Available monitors ({}):", monitors.len());
    for monitor in &monitors {
        println!("  {}: {} ({})", monitor.index, monitor.display_name, monitor.bounds);
    }
    Ok(())
}

/// Opens `path` with the platform's default application without waiting for
/// it to exit
fn open_viewer(path: &Path) -> Result<()> {
    #[cfg(target_os = "linux")]
    let mut command = {
        let mut command = std::process::Command::new("xdg-open");
        command.arg(path);
        command
    };

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = std::process::Command::new("open");
        command.arg(path);
        command
    };

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = std::process::Command::new("cmd");
        command.args(["/c", "start", ""]).arg(path);
        command
    };

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    anyhow::bail!("Opening a viewer is not supported on this platform ({})", path.display());

    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    {
        let child = command.spawn()?;
        tracing::debug!(pid = child.id(), path = %path.display(), "Launched viewer");
        Ok(())
    }
}
