//! cue2toc - convert CUE sheets to cdrdao TOC files.
//!
//! Reads `~/.cue2tocrc` (or `$CUE2TOC_CONFIG`), parses the CUE sheet given
//! on the command line or standard input, runs the configured converters
//! over the referenced files and writes the TOC to a file or standard
//! output.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cue2toc_core::{
    default_config_path, load_config, read_cue, resolve_config_path, write_toc, ConversionEngine,
    CueSheet, Options, ShellRunner,
};

/// Command-line arguments for cue2toc
#[derive(Parser, Debug)]
#[command(name = "cue2toc")]
#[command(about = "Convert a CUE sheet to a cdrdao TOC file")]
#[command(version, disable_version_flag = true)]
struct Args {
    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Print debugging info
    #[arg(short, long)]
    debug: bool,

    /// Do not write CD-TEXT information
    #[arg(short = 'n', long = "no-cdtext")]
    no_cdtext: bool,

    /// Write output to TOCFILE ("-" for standard output)
    #[arg(short, long, value_name = "TOCFILE")]
    output: Option<String>,

    /// Be quiet
    #[arg(short, long)]
    quiet: bool,

    /// CUE sheet to read ("-" or absent for standard input)
    #[arg(value_name = "CUEFILE")]
    cuefile: Option<String>,
}

/// Treats "-" like an absent path: standard input or output.
fn named_path(arg: Option<&str>) -> Option<&str> {
    arg.filter(|p| *p != "-")
}

fn init_logging(args: &Args) {
    let default_filter = if args.debug {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config_name = default_config_path();
    let config_path =
        resolve_config_path(&config_name).context("Failed to locate configuration file")?;
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    apply_overrides(&args, &mut config.options);
    let config = config;
    debug!("Options: {:?}", config.options);
    debug!("{} converter(s) configured", config.converters.len());

    let mut sheet = read_sheet(named_path(args.cuefile.as_deref()))?;

    if config.options.convert {
        let engine = ConversionEngine::from_config(&config, ShellRunner::new());
        let summary = engine
            .convert_all(&mut sheet.tracks)
            .context("Conversion failed")?;
        debug!(
            "Converted {} file(s), {} already present, {} without converter, {} command(s) failed",
            summary.converted, summary.already_converted, summary.unmatched, summary.failed_commands
        );
    } else {
        debug!("Conversion disabled");
    }

    write_sheet(named_path(args.output.as_deref()), &sheet, config.options.cdtext)
}

/// Command-line flags win over the configuration file. A flag can only
/// switch its option on (or CD-TEXT off), never back.
fn apply_overrides(args: &Args, options: &mut Options) {
    if args.debug {
        options.debug = true;
    }
    if args.no_cdtext {
        options.cdtext = false;
    }
    if args.quiet {
        options.quiet = true;
    }
}

fn read_sheet(path: Option<&str>) -> Result<CueSheet> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Could not open file \"{}\"", path))?;
            read_cue(BufReader::new(file)).with_context(|| format!("Failed to parse {}", path))
        }
        None => read_cue(io::stdin().lock()).context("Failed to parse <stdin>"),
    }
}

fn write_sheet(path: Option<&str>, sheet: &CueSheet, cdtext: bool) -> Result<()> {
    let mut out: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Could not create file \"{}\"", path))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    write_toc(&mut out, sheet, cdtext).context("Failed to write TOC")
}
