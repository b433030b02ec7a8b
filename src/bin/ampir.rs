use ampir::{config::Config, dispatch::parse_value};
use clap::{ArgAction, Parser};
use log::{error, Level, LevelFilter, Metadata, Record};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "ampir",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Infrared amplifier remote"
)]
struct App {
    /// Increase message verbosity
    #[arg(long, short, action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    verbose: u8,

    /// Silence all warnings
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file [default: /etc/ampir.toml if present]
    #[arg(long, short, name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print what would be sent, without touching the hardware or the volume file
    #[arg(long = "dry-run", short = 'n')]
    dry_run: bool,

    /// Capture raw samples from the IR line
    #[arg(long, conflicts_with_all = ["COMMAND", "VALUE", "dry_run"])]
    sniff: bool,

    /// Command: vol, power or shair_vol
    #[arg(name = "COMMAND", required_unless_present = "sniff")]
    command: Option<String>,

    /// Volume, power state (0 or 1) or shairport-sync volume (-30 to 0)
    #[arg(
        name = "VALUE",
        required_unless_present = "sniff",
        allow_negative_numbers = true,
        value_parser = parse_value
    )]
    value: Option<f32>,
}

fn main() {
    let args = App::parse();

    log::set_logger(&CLI_LOGGER).expect("logger should only be set once");

    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    log::set_max_level(level);

    let config = match Config::find(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let res = if args.sniff {
        commands::sniff::sniff(&config)
    } else {
        commands::send::send(&args, &config)
    };

    // all lines have been released by now
    if let Err(e) = res {
        error!("{e}");
        std::process::exit(1);
    }
}

static CLI_LOGGER: CliLogger = CliLogger;

struct CliLogger;

impl log::Log for CliLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{}: {}",
                match record.level() {
                    Level::Trace => "trace",
                    Level::Debug => "debug",
                    Level::Info => "info",
                    Level::Warn => "warn",
                    Level::Error => "error",
                },
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
