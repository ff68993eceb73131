//! cse-search CLI - query a custom search endpoint from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cse_search::{
    output::{self, NO_RESULTS_MESSAGE},
    SafeSearch, SearchClient, SearchConfig, SearchError, SearchQuery, SuggestClient, MAX_RESULTS,
};

/// cse-search - Custom search API command line client
#[derive(Parser)]
#[command(name = "cse-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search and print the results
    Search(SearchArgs),

    /// Suggest completions for a partial query
    Suggest(SuggestArgs),

    /// Show the effective configuration (API key masked)
    Config(ConfigArgs),
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Maximum number of results to display (1-10)
    #[arg(short, long, default_value_t = MAX_RESULTS)]
    limit: usize,

    /// 1-based index of the first result
    #[arg(short, long, default_value_t = 1)]
    start: u32,

    /// Restrict results to a language (e.g., lang_en)
    #[arg(long)]
    lang: Option<String>,

    /// Enable safe search
    #[arg(long)]
    safe: bool,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Proxy URL (e.g., http://127.0.0.1:8080 or socks5://127.0.0.1:1080)
    #[arg(short, long)]
    proxy: Option<String>,

    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct SuggestArgs {
    /// Partial query
    query: String,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Output format (compact is the same as text)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Proxy URL (e.g., http://127.0.0.1:8080 or socks5://127.0.0.1:1080)
    #[arg(short, long)]
    proxy: Option<String>,

    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct ConfigArgs {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Ranked "N. title - link" lines
    Text,
    /// JSON output
    Json,
    /// Tab-separated title and link
    Compact,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Suggest(args) => run_suggest(args).await,
        Commands::Config(args) => show_config(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("cse_search=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<SearchError>()
        .map(SearchError::exit_code)
        .unwrap_or(1)
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let mut config = SearchConfig::load(args.config.as_deref())?;
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(proxy) = args.proxy {
        config.proxy = Some(proxy);
    }

    let client = SearchClient::from_config(&config)?;

    let mut query = SearchQuery::new(args.query)
        .with_limit(args.limit)
        .with_start(args.start);
    if let Some(lang) = args.lang {
        query = query.with_language(lang);
    }
    if args.safe {
        query = query.with_safesearch(SafeSearch::Active);
    }

    let results = match client.search(&query).await {
        Ok(results) => results,
        Err(err) => {
            if err.is_remote_rejection() && matches!(args.format, OutputFormat::Text) {
                println!("{}", NO_RESULTS_MESSAGE);
            }
            return Err(err.into());
        }
    };

    match args.format {
        OutputFormat::Text => println!("{}", output::render_text(&results)),
        OutputFormat::Json => println!("{}", output::render_json(&results)?),
        OutputFormat::Compact => {
            if !results.is_empty() {
                println!("{}", output::render_compact(&results));
            }
        }
    }

    Ok(())
}

async fn run_suggest(args: SuggestArgs) -> Result<()> {
    let mut config = SearchConfig::load(args.config.as_deref())?;
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(proxy) = args.proxy {
        config.proxy = Some(proxy);
    }

    let client = SuggestClient::from_config(&config)?;
    let suggestions = client.suggest(&args.query).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&suggestions)?),
        OutputFormat::Text | OutputFormat::Compact => {
            if !suggestions.is_empty() {
                println!("{}", output::render_suggestions(&suggestions));
            }
        }
    }

    Ok(())
}

fn show_config(args: ConfigArgs) -> Result<()> {
    let config = SearchConfig::load(args.config.as_deref())?;
    print!("{}", serde_yaml::to_string(&config.masked())?);

    if let Err(err) = config.credentials() {
        eprintln!("Warning: {}", err);
    }
    Ok(())
}
