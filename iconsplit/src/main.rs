use iconsplit::{describe, extract};
use libiconsplit::OutputSpec;
use std::path::PathBuf;
use tracing::{info, Level};

use anyhow::Result;
use clap::{Parser, Subcommand};

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// splits a monochrome icon sheet into one bitmap per icon
    Extract {
        /// The icon sheet
        input: PathBuf,

        /// The directory the icons are written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Background columns added left and right of each icon
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=1000))]
        hmargin: Option<u32>,

        /// Background rows added above and below each icon
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=1000))]
        vmargin: Option<u32>,

        /// Pad every icon to the size of the largest one
        #[arg(long)]
        same_size: bool,
    },

    /// reports the header and the icon grid of a sheet without writing anything
    Info {
        /// The icon sheet
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    match cli.command {
        Commands::Extract {
            input,
            output,
            hmargin,
            vmargin,
            same_size,
        } => {
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            info!("output directory: {}", output.display());
            let spec = OutputSpec::builder()
                .add_margins(hmargin.is_some() || vmargin.is_some())
                .horizontal_margin(hmargin.unwrap_or_default())
                .vertical_margin(vmargin.unwrap_or_default())
                .normalize_to_max_size(same_size)
                .build();
            extract(&input, &output, &spec)?;
        }
        Commands::Info { input } => {
            describe(&input, &mut std::io::stdout().lock())?;
        }
    }
    Ok(())
}
