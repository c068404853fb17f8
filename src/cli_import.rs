use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cherrypick_lyrics::transcription_import::import_file;
use cherrypick_lyrics::transcription_store::{SqliteTranscriptionStore, TranscriptionStore};

/// Imports albums, songs and their transcriptions from a catalog JSON file.
#[derive(Parser, Debug)]
struct CliArgs {
    /// Catalog JSON file to import.
    pub json_file: PathBuf,

    /// Lyrics database, created when missing.
    pub db_path: PathBuf,

    /// Rebuilds the full-text index from every stored line after importing.
    #[clap(long)]
    pub reindex: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let store = SqliteTranscriptionStore::new(&cli_args.db_path)
        .with_context(|| format!("Could not open lyrics db {:?}", cli_args.db_path))?;
    let summary = import_file(&store, &cli_args.json_file)
        .with_context(|| format!("Could not import {:?}", cli_args.json_file))?;
    println!(
        "Imported {} songs ({} lines) into {}",
        summary.songs,
        summary.lines,
        cli_args.db_path.display()
    );

    if cli_args.reindex {
        let indexed = store.rebuild_search_index()?;
        info!("Rebuilt search index with {} lines", indexed);
    }
    Ok(())
}
