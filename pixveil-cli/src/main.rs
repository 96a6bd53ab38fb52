//! Pixveil CLI - hide, recover and detect messages in images.

use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use pixveil_core::Method;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  64  Usage error (invalid arguments)
  65  Data error (no hidden message, wrong password, message too large)
  66  Cannot open input image
  74  Cannot write output file";

#[derive(Parser)]
#[command(name = "pixveil")]
#[command(author, version, about = "Image steganography: hide and recover text in pixels", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// JSON file with engine settings (DCT strength, thresholds, ...)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only print results, no decoration
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Embedding method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Lsb,
    Dct,
    #[value(name = "dwt-svd")]
    DwtSvd,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Lsb => Method::Lsb,
            MethodArg::Dct => Method::Dct,
            MethodArg::DwtSvd => Method::DwtSvd,
        }
    }
}

/// Decoding method; `all` tries every method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeMethodArg {
    All,
    Lsb,
    Dct,
    #[value(name = "dwt-svd")]
    DwtSvd,
}

impl DecodeMethodArg {
    pub fn single(self) -> Option<Method> {
        match self {
            Self::All => None,
            Self::Lsb => Some(Method::Lsb),
            Self::Dct => Some(Method::Dct),
            Self::DwtSvd => Some(Method::DwtSvd),
        }
    }
}

#[derive(Args)]
pub struct EncodeArgs {
    /// Cover image
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Message to hide
    #[arg(short, long)]
    pub message: String,

    /// Encrypt the message with this password
    #[arg(short, long)]
    pub password: Option<String>,

    #[arg(long, value_enum, default_value = "lsb")]
    pub method: MethodArg,

    /// Stamp this text as a faint watermark before hiding the message
    #[arg(long, value_name = "TEXT")]
    pub watermark: Option<String>,

    /// Output PNG (defaults to <IMAGE>_stego.png)
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Check capacity and report without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message in an image
    Encode(EncodeArgs),

    /// Recover a hidden message
    Decode {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Password used when encoding
        #[arg(short, long)]
        password: Option<String>,

        #[arg(long, value_enum, default_value = "all")]
        method: DecodeMethodArg,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate whether an image carries an LSB payload
    Analyze {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Save the blue LSB plane as a black/white PNG
        #[arg(long, value_name = "OUT")]
        noise_map: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stamp a faint tiled text watermark
    Watermark {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Watermark text
        #[arg(short, long)]
        text: String,

        /// Output PNG (defaults to <IMAGE>_watermarked.png)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Make a hidden watermark visible
    Reveal {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Output PNG (defaults to <IMAGE>_revealed.png)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Show how many characters an image can hold
    Capacity {
        /// Image to measure
        #[arg(value_name = "IMAGE", required_unless_present = "size", conflicts_with = "size")]
        image: Option<PathBuf>,

        /// Dimensions instead of an image, e.g. 1920x1080
        #[arg(long, value_name = "WxH")]
        size: Option<String>,

        /// Only this method (default: all)
        #[arg(long, value_enum)]
        method: Option<MethodArg>,
    },

    /// Hide the same message in many images (in parallel)
    BatchEncode {
        #[arg(value_name = "IMAGES", required = true)]
        images: Vec<PathBuf>,

        #[arg(short, long)]
        message: String,

        #[arg(short, long)]
        password: Option<String>,

        #[arg(long, value_enum, default_value = "lsb")]
        method: MethodArg,

        /// Directory for the outputs (defaults to each input's directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Recover messages from many images (in parallel)
    BatchDecode {
        #[arg(value_name = "IMAGES", required = true)]
        images: Vec<PathBuf>,

        #[arg(short, long)]
        password: Option<String>,

        #[arg(long, value_enum, default_value = "all")]
        method: DecodeMethodArg,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "pixveil_core=debug,pixveil=debug,info",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = utils::load_config(cli.config.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Encode(args) => commands::encode::execute(args, &config, quiet),
        Commands::Decode {
            image,
            password,
            method,
            json,
        } => commands::decode::execute(image, password, method, json, &config, quiet),
        Commands::Analyze {
            image,
            noise_map,
            json,
        } => commands::analyze::execute(image, noise_map, json, &config, quiet),
        Commands::Watermark {
            image,
            text,
            output,
        } => commands::watermark::embed(image, text, output, &config, quiet),
        Commands::Reveal { image, output } => {
            commands::watermark::reveal(image, output, &config, quiet)
        }
        Commands::Capacity {
            image,
            size,
            method,
        } => commands::capacity::execute(image, size, method, &config, quiet),
        Commands::BatchEncode {
            images,
            message,
            password,
            method,
            out_dir,
        } => commands::batch::encode(images, message, password, method, out_dir, &config, quiet),
        Commands::BatchDecode {
            images,
            password,
            method,
        } => commands::batch::decode(images, password, method, &config, quiet),
    }
}

fn main() -> ProcessExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout
            let code = if err.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = err.print();
            return ProcessExitCode::from(code as u8);
        }
    };
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ProcessExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            let exit = ExitCode::from_anyhow(&err);
            if let Some(message) = &exit.message {
                eprintln!("{} {}", "error:".red().bold(), message);
            }
            ProcessExitCode::from(exit.code as u8)
        }
    }
}
