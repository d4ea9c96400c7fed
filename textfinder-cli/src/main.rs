use clap::{Parser, Subcommand};
use colored::Colorize;
use std::{path::PathBuf, process::ExitCode};
use textfinder::{
    search_with_config, EncodingMode, ErrorKind, SearchConfig, SearchError, SearchOutput,
};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SearchError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliSearchConfig {
    /// Text to search for (literal, case-sensitive)
    target: String,

    /// Number of workers to split the lines across
    workers: usize,

    /// File to search, one record per line
    corpus: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print how many matches each worker found
    #[arg(short = 'w', long)]
    per_worker: bool,

    /// Log every match with its worker, line and position
    #[arg(short = 'm', long)]
    log_matches: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// How to handle invalid UTF-8 sequences (failfast|lossy) [default: failfast]
    #[arg(long)]
    encoding: Option<EncodingMode>,

    /// Log level (trace, debug, info, warn, error) [default: warn]
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count occurrences of a target string in a file using parallel workers
    Search(Box<CliSearchConfig>),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let label = match e.kind() {
                ErrorKind::BadInput => "bad input",
                ErrorKind::CorpusUnavailable => "corpus unavailable",
                ErrorKind::Internal => "internal error",
            };
            eprintln!("{}: {}", label.red().bold(), e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn exit_code(err: &SearchError) -> u8 {
    match err.kind() {
        ErrorKind::Internal => 1,
        ErrorKind::BadInput => 2,
        ErrorKind::CorpusUnavailable => 3,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => {
            let args = *args;
            let file_config = SearchConfig::load_from(args.config.as_deref())?;
            let cli_config = SearchConfig {
                target: args.target,
                corpus_path: Some(args.corpus),
                worker_count: args.workers,
                per_worker: args.per_worker,
                log_matches: args.log_matches,
                log_level: args
                    .log_level
                    .unwrap_or_else(|| file_config.log_level.clone()),
                encoding_mode: args.encoding.unwrap_or(file_config.encoding_mode),
            };
            let config = file_config.merge_with_cli(cli_config);

            setup_logging(&config.log_level, config.log_matches);

            let result = search_with_config(&config)?;
            if args.json {
                let json = result
                    .to_json()
                    .map_err(|e| SearchError::internal(format!("cannot encode result: {}", e)))?;
                println!("{}", json);
            } else {
                print_search_results(&result, config.per_worker);
            }
            Ok(())
        }
    }
}

fn setup_logging(level: &str, log_matches: bool) {
    let directives = if log_matches {
        format!("{},textfinder::search::sink=info", level)
    } else {
        level.to_string()
    };
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_search_results(result: &SearchOutput, per_worker: bool) {
    println!("\n{}", "Summary:".bold());
    if per_worker {
        for (worker_id, count) in result.per_worker_counts.iter().enumerate() {
            println!(
                "Worker {} found {} instances",
                worker_id.to_string().green(),
                count
            );
        }
    }
    println!(
        "Total instances found: {}",
        result.total_matches.to_string().blue()
    );
    println!(
        "Total time taken: {:.6} seconds",
        result.elapsed.as_secs_f64()
    );
}
