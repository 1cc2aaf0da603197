use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use opennow::catalog::Catalog;
use opennow::cli::{self, Args};
use opennow::config::Config;
use opennow::query::Query;
use opennow::scheduler::{run_scheduler, OpenSetTracker};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse_args();

    if args.help {
        cli::print_help();
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("opennow=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(path) = &args.catalog {
        config.catalog_path = path.clone();
    }
    info!("Catalog: {}", config.catalog_path);

    // Handle --validate mode
    if args.validate {
        info!("Validating configuration...");
        match validate(&config) {
            Ok(()) => {
                info!("Configuration and catalog are valid");
                return Ok(());
            }
            Err(e) => {
                error!("{:#}", e);
                std::process::exit(1);
            }
        }
    }

    let catalog = Catalog::load(&config.catalog_path)?;

    if args.watch {
        return watch(&catalog, &config).await;
    }

    run_once(&catalog, &args)
}

fn validate(config: &Config) -> Result<()> {
    config.validate()?;
    let catalog = Catalog::load(&config.catalog_path)?;
    let compiled = catalog.compile()?;
    info!(
        "{} restaurants, {} schedule segments parsed",
        compiled.len(),
        compiled.segment_count()
    );
    Ok(())
}

fn run_once(catalog: &Catalog, args: &Args) -> Result<()> {
    let query = cli::build_query(args, Query::now())?;

    match catalog.open_at(&query) {
        Ok(open) => {
            println!("{}", cli::render_report(&query, &open));
            Ok(())
        }
        Err(e) => {
            // Already logged by the catalog
            eprintln!("Error trying to get restaurants at {}", query);
            Err(e.into())
        }
    }
}

async fn watch(catalog: &Catalog, config: &Config) -> Result<()> {
    let compiled = catalog.compile()?;

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => {
                warn!("Failed to listen for Ctrl-C: {}", e);
                return;
            }
        }
        ctrl_c_cancel.cancel();
    });

    let mut tracker = OpenSetTracker::new();
    run_scheduler(config.watch_interval_secs, cancel, || {
        let query = Query::now();
        let open = compiled.open_at(&query);
        if tracker.observe(&open) {
            info!("Open set changed: {} restaurants", open.len());
            println!("{}", cli::render_report(&query, &open));
        }
    })
    .await;

    Ok(())
}
