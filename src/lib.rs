// Module declarations for the driver's components
pub mod config;    // YAML configuration
pub mod error;     // Typed errors for construction, transport and catalog
pub mod options;   // Command line options parsing
pub mod pi30;      // PI30 protocol: framing, catalog and the device engine
pub mod prelude;   // Common imports and types
pub mod transport; // Serial, USB HID and in-memory channels

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;
use std::io::Write;

/// Process exit codes returned by `app`
pub mod exit {
    pub const OK: i32 = 0;
    pub const NO_RESPONSE: i32 = 1;
    pub const INVALID_RESPONSE: i32 = 2;
}

/// Sets up env_logger with a timestamped format, honouring RUST_LOG first
/// and falling back to `level`.
pub fn init_logging(level: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// Loads the config named in `options` (or the defaults), with the command
/// line device taking precedence.
pub fn load_config(options: &Options) -> Result<Config> {
    let mut config = match &options.config_file {
        Some(file) => Config::new(file)?,
        None => Config::default(),
    };

    if let Some(device) = &options.device {
        config.device = Some(device.clone());
    }

    Ok(config)
}

/// Main application entry point
///
/// Runs a single command (or lists the catalog) and returns the process
/// exit code.
pub fn app(options: Options) -> Result<i32> {
    let config = load_config(&options)?;
    init_logging(config.loglevel());

    info!("mpp-solar {} starting", CARGO_PKG_VERSION);

    // listing the catalog needs no device
    if options.list {
        print_commands(&Registry::pi30(), options.json)?;
        return Ok(exit::OK);
    }

    let device = Device::from_config(&config)?;
    debug!("{}", device);

    let Some(command) = device.execute(&options.command) else {
        error!("no result for {}", options.command);
        return Ok(exit::NO_RESPONSE);
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&command)?);
    } else {
        print!("{}", command);
    }

    if command.is_valid() {
        Ok(exit::OK)
    } else {
        Ok(exit::INVALID_RESPONSE)
    }
}

fn print_commands(registry: &Registry, json: bool) -> Result<()> {
    let commands = registry.descriptors();

    if json {
        println!("{}", serde_json::to_string_pretty(&commands)?);
        return Ok(());
    }

    for command in commands {
        println!(
            "{:<10} {:<7} {}",
            command.command,
            format!("{:?}", command.command_type),
            command.description
        );
    }
    Ok(())
}
