use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use yaypad::mapping::{compile, ParsedConfig};
use yaypad::settings::AppSettings;

#[derive(Parser)]
#[command(name = "yaypad")]
#[command(about = "Remaps gamepad buttons, triggers and thumbsticks to keyboard and mouse actions")]
struct Cli {
    /// Binding file (overrides bindings_path from the settings file)
    #[arg(short, long)]
    bindings: Option<PathBuf>,

    /// Settings file (default: <config dir>/yaypad/settings.toml)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Device slot to watch
    #[arg(long)]
    slot: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Compile the binding file, print the bindings and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;
    let cli = Cli::parse();

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(AppSettings::default_path);
    let loaded = AppSettings::load_if_present(&settings_path)
        .await
        .wrap_err("Failed to load settings")?;
    let from_file = loaded.is_some();
    let mut settings = loaded.unwrap_or_default();
    if let Some(path) = cli.bindings {
        settings.bindings_path = path;
    }
    if let Some(slot) = cli.slot {
        settings.slot = slot;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    setup_logging_env(&settings.log_level);
    if from_file {
        info!("Using settings {:?}", settings_path);
    } else {
        info!("No settings file at {:?}, using defaults", settings_path);
    }

    let config = load_bindings(&settings.bindings_path).await?;

    if cli.check {
        print_bindings(&config);
        return Ok(());
    }

    run(config, &settings).await
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    Ok(())
}

fn setup_logging_env(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

async fn load_bindings(path: &Path) -> Result<ParsedConfig> {
    info!("Loading bindings from {:?}", path);
    let contents = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read binding file {:?}", path))?;
    let config =
        compile(&contents).wrap_err_with(|| format!("Invalid binding file {:?}", path))?;
    Ok(config)
}

fn print_bindings(config: &ParsedConfig) {
    let mut lines: Vec<String> = config
        .bindings
        .iter()
        .map(|(input, action)| format!("{} -> {}", input, action))
        .collect();
    lines.sort();
    for line in lines {
        println!("{}", line);
    }
    let calibration = &config.calibration;
    println!(
        "dead zone {}, threshold {}, mouse sensitivity {}, stick scaling {}",
        calibration.thumbstick_dead_zone,
        calibration.trigger_threshold,
        calibration.mouse_sensitivity,
        calibration.thumbstick_scaling
    );
}

#[cfg(feature = "gilrs-backend")]
async fn run(config: ParsedConfig, settings: &AppSettings) -> Result<()> {
    use std::sync::Arc;
    use tracing::error;
    use yaypad::controller::{GilrsSource, PollerHandle, TracingSink};

    let source = GilrsSource::new().wrap_err("Failed to open gamepad backend")?;
    let mut handle = PollerHandle::spawn(
        Arc::new(config),
        settings.poll_settings(),
        Box::new(source),
        Box::new(TracingSink::new()),
    );

    let token = handle.cancellation_token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl+C received, stopping"),
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
        token.cancel();
    });

    info!("Polling slot {}. Press Ctrl+C to exit.", settings.slot);
    let stats = handle.wait().await.wrap_err("Poll loop failed")?;
    info!(
        "Stopped: {} ticks, {} actions fired, {} connects, {} disconnects",
        stats.ticks, stats.dispatched, stats.connects, stats.disconnects
    );
    Ok(())
}

#[cfg(not(feature = "gilrs-backend"))]
async fn run(_config: ParsedConfig, _settings: &AppSettings) -> Result<()> {
    Err(color_eyre::eyre::eyre!(
        "built without a device backend; enable the gilrs-backend feature or use --check"
    ))
}
