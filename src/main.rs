use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use docx_cards::{Config, Overrides, run_batch};

#[derive(Parser)]
#[command(name = "docx-cards")]
#[command(about = "Parse .docx files into JSON flashcard lists, \
preserving bullet lists, tab indentation, and images. \
Maintains a manifest.json for incremental updates.")]
#[command(version)]
struct Cli {
    /// Index of the table to parse in each .docx (0-based, default: 0)
    #[arg(short = 't', long)]
    table_index: Option<usize>,

    /// Set this if your tables have no header row
    #[arg(long)]
    no_header: bool,

    /// Directory to scan for .docx files (default: current working directory)
    #[arg(long)]
    docx_dir: Option<PathBuf>,

    /// Directory where JSON, images, and manifest.json will be written
    /// (default: ../VTNECards/Data relative to the docx directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Read settings from this config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.init_config {
        let path = Config::init_default()?;
        println!("Default config written to {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let settings = config.resolve(Overrides {
        table_index: cli.table_index,
        no_header: cli.no_header,
        docx_dir: cli.docx_dir,
        output_dir: cli.output_dir,
    })?;

    let summary = run_batch(&settings)?;

    if let Some(manifest_path) = &summary.manifest_path {
        println!(
            "\nDone. Exported a total of {} flashcards from {} file(s) into {}",
            summary.cards,
            summary.documents_found,
            settings.output_dir.display()
        );
        if summary.documents_failed > 0 {
            println!("{} file(s) could not be parsed.", summary.documents_failed);
        }
        println!("Manifest updated at: {}", manifest_path.display());
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
