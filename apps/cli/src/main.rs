use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use padlink_core::{PadError, PadSession, PanelDirection, SerialConfig, SerialTransport};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "FSR Dance Pad Configurator", long_about = None)]
struct Args {
    /// Serial port of the pad controller (e.g. /dev/ttyACM0, COM3)
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// Baud rate
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Read timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// TOML file with serial settings; flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the firmware version
    Version,
    /// Blink the controller LED
    Blink,
    /// Recalibrate sensor baselines
    Calibrate,
    /// Save the device configuration to non-volatile storage
    Persist,
    /// Show the device configuration
    Config {
        /// Also write it to a TOML file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show sensor values and thresholds
    Values {
        /// Keep polling until interrupted
        #[arg(short, long)]
        watch: bool,
        /// Delay between polls
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },
    /// Set trigger and release thresholds of the sensor on a pin
    #[command(allow_negative_numbers = true)]
    SetThreshold { pin: u32, trigger: i32, release: i32 },
    /// Set the color of a panel
    #[command(allow_negative_numbers = true)]
    SetColor {
        panel: PanelDirection,
        red: i32,
        green: i32,
        blue: i32,
    },
    /// Turn all arrow lights on or off
    Arrows { state: Switch },
    /// Set the global light brightness
    Brightness { value: u8 },
    /// Let the firmware drive the lights from sensor input
    AutoLights { state: Switch },
    /// Write a serial settings file with defaults
    InitConfig { path: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(if args.verbose {
                    tracing::Level::DEBUG.into()
                } else {
                    tracing::Level::INFO.into()
                })
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = run(args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn serial_config(args: &Args) -> Result<SerialConfig> {
    let mut config = match &args.config {
        Some(path) => SerialConfig::load_from_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => SerialConfig::default(),
    };
    if let Some(port) = &args.port {
        config.port = Some(port.clone());
    }
    if let Some(baud) = args.baud {
        config.baud_rate = baud;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let serial = serial_config(&args)?;

    if let Commands::InitConfig { path } = &args.command {
        serial.save_to_file(path)?;
        info!(path = %path.display(), "Wrote serial settings");
        return Ok(());
    }

    if serial.port.is_none() {
        bail!("no serial port given; use --port or a --config file");
    }
    let transport = SerialTransport::open(&serial)?;
    let mut session = PadSession::new(transport);

    match args.command {
        Commands::Version => println!("{}", session.get_version()?),
        Commands::Blink => session.blink()?,
        Commands::Calibrate => session.calibrate()?,
        Commands::Persist => {
            session.persist()?;
            info!("Persist requested");
        }
        Commands::Config { output } => {
            let config = session.get_configuration()?;
            println!("{config}");
            if let Some(path) = output {
                config.save_to_file(&path)?;
                info!(path = %path.display(), "Configuration saved");
            }
        }
        Commands::Values { watch, interval_ms } => loop {
            println!("{}", session.get_sensor_snapshot()?);
            if !watch {
                break;
            }
            println!();
            thread::sleep(Duration::from_millis(interval_ms));
        },
        Commands::SetThreshold {
            pin,
            trigger,
            release,
        } => match session.set_threshold(pin, trigger, release) {
            Err(PadError::SetRejected { key }) if key.ends_with("release") => {
                warn!("Trigger threshold was applied but release was not");
                bail!("device rejected {key}; re-read thresholds with `padlink values`");
            }
            other => other?,
        },
        Commands::SetColor {
            panel,
            red,
            green,
            blue,
        } => session.set_color(panel, red, green, blue)?,
        Commands::Arrows { state } => session.set_arrow_lights(state.enabled())?,
        Commands::Brightness { value } => session.set_brightness(value)?,
        Commands::AutoLights { state } => session.set_auto_lights(state.enabled())?,
        Commands::InitConfig { .. } => unreachable!("handled before opening the port"),
    }

    Ok(())
}
