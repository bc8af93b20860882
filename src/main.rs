mod cli;

use cinesync::{
    arr::{RadarrClient, RadarrSync, RadarrWebhook, WebhookDispatcher},
    catalog::{CatalogRepository, SqliteCatalog},
    config::{self, Config},
    library::{LibraryReconciler, Matcher},
    metadata::TmdbProvider,
    scanner::{BasicProber, LibraryScanner},
};
use cinesync_db::pool::init_pool;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "cinesync=trace,cinesync_db=debug,cinesync_common=debug".to_string()
        } else {
            "cinesync=info,cinesync_db=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Scan { json } => run_async(cli.config.as_deref(), |config, cancel| async move {
            scan(config, cancel, json).await
        }),
        Commands::Match { file, force } => {
            run_async(cli.config.as_deref(), |config, cancel| async move {
                match_file(config, cancel, &file, force).await
            })
        }
        Commands::Sync { json } => run_async(cli.config.as_deref(), |config, cancel| async move {
            sync(config, cancel, json).await
        }),
        Commands::SyncMovie { radarr_id } => {
            run_async(cli.config.as_deref(), |config, cancel| async move {
                sync_movie(config, cancel, radarr_id).await
            })
        }
        Commands::Webhook { payload } => {
            run_async(cli.config.as_deref(), |config, cancel| async move {
                webhook(config, cancel, &payload).await
            })
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("cinesync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Load config, start a runtime and run `f` with a token that Ctrl-C cancels.
fn run_async<F, Fut>(config_path: Option<&Path>, f: F) -> Result<()>
where
    F: FnOnce(Config, CancellationToken) -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    let config = config::load_config_or_default(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async move {
        let cancel = CancellationToken::new();
        let ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling...");
                ctrl_c.cancel();
            }
        });

        f(config, cancel).await
    })
}

fn open_catalog(config: &Config) -> Result<Arc<dyn CatalogRepository>> {
    let db_path = config.database.path.to_string_lossy();
    tracing::info!("Opening catalog at {}", db_path);
    let pool = init_pool(&db_path)?;
    Ok(Arc::new(SqliteCatalog::new(pool)))
}

fn library_reconciler(config: &Config) -> Result<LibraryReconciler> {
    config::require_tmdb(config)?;

    let repo = open_catalog(config)?;
    let provider = Arc::new(TmdbProvider::with_base_url(
        config.tmdb.api_key.clone(),
        config.tmdb.language.clone(),
        config.tmdb.base_url.clone(),
    ));
    let scanner = Arc::new(LibraryScanner::from_config(&config.library)?);
    let matcher = Arc::new(Matcher::new(repo.clone(), provider));

    Ok(LibraryReconciler::new(
        scanner,
        matcher,
        repo,
        Arc::new(BasicProber::new()),
    ))
}

fn radarr_sync(config: &Config) -> Result<RadarrSync> {
    config::require_radarr(config)?;

    let repo = open_catalog(config)?;
    let client = Arc::new(RadarrClient::new(&config.radarr));
    Ok(RadarrSync::new(client, repo))
}

async fn scan(config: Config, cancel: CancellationToken, json: bool) -> Result<()> {
    let reconciler = library_reconciler(&config)?;
    let summary = reconciler.scan_library(&cancel).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Files:          {}", summary.total_files);
    println!("  Matched:      {}", summary.matched_files);
    println!("  Unmatched:    {}", summary.unmatched_files);
    println!("Movies created: {}", summary.new_movies);
    println!("Movies reused:  {}", summary.existing_movies);
    if !summary.errors.is_empty() {
        println!("\nErrors: {}", summary.errors.len());
        for failure in &summary.errors {
            println!("  {}", failure);
        }
    }

    Ok(())
}

async fn match_file(
    config: Config,
    cancel: CancellationToken,
    file: &Path,
    force: bool,
) -> Result<()> {
    let reconciler = library_reconciler(&config)?;
    let result = reconciler.match_file(&cancel, file, force).await?;

    println!("File: {}", result.scan_result.path.display());
    match (&result.movie, &result.error) {
        (Some(movie), _) => {
            let year = movie.year.map(|y| format!(" ({y})")).unwrap_or_default();
            println!("Movie: {}{}", movie.title, year);
            println!(
                "Match: {} (confidence {:.2})",
                result.match_type, result.confidence
            );
            if result.created_new_movie {
                println!("Created new catalog entry {}", movie.id);
            }
        }
        (None, Some(err)) => println!("Unmatched: {}", err),
        (None, None) => println!("Unmatched"),
    }

    Ok(())
}

async fn sync(config: Config, cancel: CancellationToken, json: bool) -> Result<()> {
    let sync = radarr_sync(&config)?;
    let result = sync.sync_library(&cancel).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Added:    {}", result.added);
    println!("Updated:  {}", result.updated);
    println!("Removed:  {} (kept locally)", result.removed);
    println!("Skipped:  {} (no file)", result.skipped);
    println!("Took:     {:.1}s", result.duration.as_secs_f64());
    if !result.errors.is_empty() {
        println!("\nErrors: {}", result.errors.len());
        for failure in &result.errors {
            println!("  {}", failure);
        }
    }

    let status = sync.status();
    println!("\nStatus:\n{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}

async fn sync_movie(config: Config, cancel: CancellationToken, radarr_id: i64) -> Result<()> {
    let sync = radarr_sync(&config)?;
    let outcome = sync.sync_movie(&cancel, radarr_id).await?;
    println!("{:?}", outcome);
    Ok(())
}

async fn webhook(config: Config, cancel: CancellationToken, payload: &Path) -> Result<()> {
    let body = std::fs::read_to_string(payload)
        .with_context(|| format!("Failed to read webhook payload: {:?}", payload))?;
    let event: RadarrWebhook = serde_json::from_str(&body)
        .with_context(|| format!("Failed to parse webhook payload: {:?}", payload))?;

    let dispatcher = WebhookDispatcher::new(Arc::new(radarr_sync(&config)?));
    let outcome = dispatcher.dispatch(&cancel, &event).await?;
    println!("{}: {:?}", event.event_type, outcome);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Library paths: {}", config.library.paths.len());
            println!("  Database: {}", config.database.path.display());
            println!(
                "  TMDB: {}",
                if config.tmdb.api_key.is_empty() {
                    "no API key (scan and match disabled)"
                } else {
                    "configured"
                }
            );
            println!("  Radarr enabled: {}", config.radarr.enabled);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Database: {}", config.database.path.display());
        }
    }

    Ok(())
}
