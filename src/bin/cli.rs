//! parkscout CLI
//!
//! Interactive explorer by default; subcommands run one step and exit.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parkscout::{
    console::{self, Console, SelectionInput},
    error::{AppError, Result},
    models::{Config, FlushPolicy},
    pipeline::Explorer,
    storage::PersistentCache,
    utils::http::ReqwestSource,
};

/// parkscout - National Park Site Explorer
#[derive(Parser, Debug)]
#[command(
    name = "parkscout",
    version,
    about = "Explore national park sites by state and find places nearby"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "parkscout.toml")]
    config: PathBuf,

    /// Override the cache file location
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Interactive state and site explorer (default)
    Explore,

    /// List every state in the directory
    Regions,

    /// List the sites of one state
    Sites {
        /// State name, any case
        region: String,
    },

    /// Show places near one site of a state
    Nearby {
        /// State name, any case
        region: String,

        /// Site number as shown by `sites`
        number: usize,
    },

    /// Validate configuration
    Validate,

    /// Show cache info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config).with_env_overrides();
    if let Some(path) = cli.cache {
        config.cache.path = path;
    }
    log::debug!("Loaded configuration from {}", cli.config.display());

    let task = match cli.command.unwrap_or(Command::Explore) {
        Command::Validate => return validate(&config),
        Command::Info => {
            show_info(&config);
            return Ok(());
        }
        Command::Explore => Task::Explore,
        Command::Regions => Task::Regions,
        Command::Sites { region } => Task::Sites { region },
        Command::Nearby { region, number } => Task::Nearby { region, number },
    };

    config.validate()?;
    let http = ReqwestSource::from_config(&config.http)?;
    let mut cache = PersistentCache::open(&config.cache);

    let outcome = run(&config, &mut cache, &http, task).await;
    let flushed = cache.flush();
    outcome?;
    flushed
}

/// Commands that need the network and the cache.
enum Task {
    Explore,
    Regions,
    Sites { region: String },
    Nearby { region: String, number: usize },
}

fn validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    log::info!("✓ Site: {}", config.site.index_url()?);
    log::info!("✓ Cache: {}", config.cache.path.display());
    if config.proximity.api_key.is_empty() {
        log::warn!("proximity.api_key is empty; nearby searches will fail");
    }
    log::info!("All validations passed!");
    Ok(())
}

fn show_info(config: &Config) {
    let cache = PersistentCache::open(&config.cache);
    log::info!("Cache file: {}", cache.path().display());
    match cache.policy() {
        FlushPolicy::Always => log::info!("Flush policy: always"),
        FlushPolicy::Deferred { max_pending } => {
            log::info!("Flush policy: deferred (every {} writes)", max_pending)
        }
    }
    log::info!("Cached pages: {}", cache.page_count());
    log::info!("Cached nearby searches: {}", cache.place_count());
    match cache.updated_at() {
        Some(at) => log::info!("Last updated: {}", at),
        None => log::info!("No cache written yet."),
    }
}

/// Run a network-backed command against the cache.
async fn run(
    config: &Config,
    cache: &mut PersistentCache,
    http: &ReqwestSource,
    task: Task,
) -> Result<()> {
    let mut explorer = Explorer::from_config(config, cache, http)?;
    let directory = explorer.directory().await?;
    log::debug!("Directory has {} states", directory.len());

    let mut stdout = std::io::stdout();
    match task {
        Task::Explore => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut session = Console::new(input, stdout);
            session.run(&mut explorer, &directory).await?;
        }
        Task::Regions => {
            for name in directory.names() {
                writeln!(stdout, "{name}")?;
            }
        }
        Task::Sites { region } => {
            let url = lookup(&directory, &region)?;
            let sites = explorer.facilities(url).await?;
            console::write_listing(&mut stdout, &region.to_lowercase(), &sites)?;
        }
        Task::Nearby { region, number } => {
            let url = lookup(&directory, &region)?;
            let sites = explorer.facilities(url).await?;
            let SelectionInput::Pick(n) = SelectionInput::parse(&number.to_string(), sites.len())
            else {
                return Err(AppError::validation(format!(
                    "site number must be between 1 and {}",
                    sites.len()
                )));
            };
            let site = &sites[n - 1];
            let places = explorer.nearby(site).await?;
            console::write_places(&mut stdout, site, &places)?;
        }
    }

    log::debug!(
        "Cache holds {} pages and {} nearby searches",
        explorer.cache().page_count(),
        explorer.cache().place_count()
    );
    Ok(())
}

fn lookup<'d>(directory: &'d parkscout::models::DirectoryIndex, region: &str) -> Result<&'d str> {
    directory
        .get(region)
        .ok_or_else(|| AppError::validation(format!("unknown state '{region}'")))
}
