use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cherrypick_lyrics::config::{AppConfig, CliConfig, FileConfig};
use cherrypick_lyrics::search::{ClipSearch, QueryNormalizer};
use cherrypick_lyrics::transcription_store::{SqliteTranscriptionStore, TranscriptionStore};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the lyrics database.
    #[clap(long, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// JSON dictionary used to transliterate query words.
    #[clap(long, value_parser = parse_path)]
    pub translit_dict: Option<PathBuf>,

    /// Runs a single query and prints the result as JSON.
    #[clap(long)]
    pub query: Option<String>,

    /// Prints the N most frequent queries.
    #[clap(long)]
    pub popular_queries: Option<usize>,

    /// Prints the N most returned songs.
    #[clap(long)]
    pub popular_songs: Option<usize>,

    /// Prints a song with its timed lyrics.
    #[clap(long)]
    pub song: Option<i64>,
}

#[derive(Parser)]
#[command(name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Searches the lyrics and prints the matching songs with their clips.
    Search { words: Vec<String> },

    /// Shows a song with its timed lyrics.
    Song { song_id: i64 },

    /// Shows the most frequent queries.
    PopularQueries {
        #[clap(default_value_t = 10)]
        limit: usize,
    },

    /// Shows the most returned songs.
    PopularSongs {
        #[clap(default_value_t = 10)]
        limit: usize,
    },

    /// Lists the catalog by title, one page at a time.
    List {
        #[clap(default_value_t = 1)]
        page: usize,
        #[clap(default_value_t = 20)]
        page_size: usize,
    },

    /// Shows how many songs are stored.
    Count,

    /// Shows the path of the current lyrics db.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const PROMPT: &str = ">> ";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_command(command: InnerCommand, search: &ClipSearch, db_path: &str) -> Result<bool> {
    match command {
        InnerCommand::Search { words } => print_json(&search.search(&words.join(" "))?)?,
        InnerCommand::Song { song_id } => match search.song_details(song_id)? {
            Some(details) => print_json(&details)?,
            None => println!("Song {} not found.", song_id),
        },
        InnerCommand::PopularQueries { limit } => print_json(&search.popular_queries(limit)?)?,
        InnerCommand::PopularSongs { limit } => print_json(&search.popular_songs(limit)?)?,
        InnerCommand::List { page, page_size } => {
            print_json(&search.list_songs(page, page_size)?)?
        }
        InnerCommand::Count => println!("{}", search.store().get_songs_count()?),
        InnerCommand::Where => println!("{}", db_path),
        InnerCommand::Exit => return Ok(false),
    }
    Ok(true)
}

fn execute_command(line: String, search: &ClipSearch, db_path: &str) -> CommandExecutionResult {
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }
    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());
    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));
    match cli {
        Ok(cli) => {
            println!("{} {}", PROMPT, &line);
            match run_command(cli.command, search, db_path) {
                Ok(true) => {}
                Ok(false) => return CommandExecutionResult::Exit,
                Err(err) => return CommandExecutionResult::Error(format!("{:#}", err)),
            }
        }
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct CommandHelper {
    commands_names: Vec<String>,
}

impl CommandHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        CommandHelper { commands_names }
    }
}

impl Completer for CommandHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for CommandHelper {}
impl Validator for CommandHelper {}
impl Helper for CommandHelper {}

fn interactive_loop(search: &ClipSearch, db_path: &str) -> Result<()> {
    InnerCli::command().print_long_help()?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = Editor::<CommandHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(CommandHelper::new()));

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, search, db_path) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        eprintln!("Error: {}", err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        db_path: cli_args.db.clone(),
        translit_dict_path: cli_args.translit_dict.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let store = SqliteTranscriptionStore::new(&config.db_path)
        .with_context(|| format!("Could not open lyrics db {:?}", config.db_path))?;
    info!(
        "Opened {:?} with {} songs",
        config.db_path,
        store.get_songs_count()?
    );
    let normalizer = match &config.translit_dict_path {
        Some(path) => QueryNormalizer::load(path, config.translit_cutoff)?,
        None => QueryNormalizer::empty(),
    };
    let search = ClipSearch::new(
        Arc::new(store),
        normalizer,
        config.search.clone(),
        config.covers.clone(),
    );
    let db_path = config.db_path.display().to_string();

    let mut one_shot = false;
    if let Some(query) = &cli_args.query {
        print_json(&search.search(query)?)?;
        one_shot = true;
    }
    if let Some(limit) = cli_args.popular_queries {
        print_json(&search.popular_queries(limit)?)?;
        one_shot = true;
    }
    if let Some(limit) = cli_args.popular_songs {
        print_json(&search.popular_songs(limit)?)?;
        one_shot = true;
    }
    if let Some(song_id) = cli_args.song {
        match search.song_details(song_id)? {
            Some(details) => print_json(&details)?,
            None => println!("Song {} not found.", song_id),
        }
        one_shot = true;
    }

    if !one_shot {
        interactive_loop(&search, &db_path)?;
    }
    Ok(())
}
