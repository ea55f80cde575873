/*
 * wkt-store: command-line front end for the geometry store
 *
 * Usage:
 *   wkt-store --backend file --path ./wkt-data add 'POLYGON((0 0,0 1,1 1,1 0,0 0))'
 *   wkt-store --config store.yaml list
 *   wkt-store paste "$(xclip -o)"
 *   wkt-store update --strict <ID> 'POLYGON((...))'
 *   wkt-store merged
 *   wkt-store --key zecompadre-wkt clear
 *
 * Logging goes to stderr and honours RUST_LOG.
 */

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wkt_storage::config::{Overrides, StoreConfig};
use wkt_storage::domain::contains_marker;
use wkt_storage::geometry::parse_wkt;
use wkt_storage::{BackendKind, GeometryStore, KeyValueBackend};

#[derive(Parser, Debug)]
#[command(name = "wkt-store")]
#[command(about = "Persist, deduplicate and merge WKT geometries")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend: memory, file or sqlite
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Directory (file backend) or database file (sqlite backend)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Storage key
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every record as `id<TAB>wkt`
    List,
    /// Validate and add a geometry
    Add { wkt: String },
    /// Add pasted text if it looks like a polygon
    Paste { text: String },
    /// Replace the geometry of a record
    Update {
        id: String,
        wkt: String,
        /// Fail if the id is unknown
        #[arg(long)]
        strict: bool,
    },
    /// Remove a record
    Remove {
        id: String,
        /// Fail if the id is unknown
        #[arg(long)]
        strict: bool,
    },
    /// Drop every record and delete the storage key
    Clear,
    /// Print all polygons merged into one WKT
    Merged,
    /// Print `min_x min_y max_x max_y` of all records
    Extent,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    load_config_from(cli, |name| std::env::var(name).ok())
}

/// Flags win over environment variables; both are merged before validation
fn load_config_from<F>(cli: &Cli, lookup: F) -> Result<StoreConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match &cli.config {
        Some(path) => {
            let path = path.to_str().context("config path is not valid UTF-8")?;
            StoreConfig::from_yaml(path)?
        }
        None => StoreConfig::default(),
    };
    let flags = Overrides {
        storage_key: cli.key.clone(),
        backend: cli.backend,
        path: cli.path.clone(),
    };
    Ok(config.apply(flags.or(Overrides::from_lookup(lookup)?))?)
}

fn run<B: KeyValueBackend>(
    command: Command,
    store: &mut GeometryStore<B>,
    config: &StoreConfig,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List => {
            for record in store.get() {
                writeln!(out, "{}\t{}", record.id, record.wkt)?;
            }
        }
        Command::Add { wkt } => {
            parse_wkt(&wkt)?;
            let before = store.len();
            store.add(&wkt)?;
            if store.len() > before {
                info!("geometry added");
            } else {
                info!("geometry already stored");
            }
            writeln!(out, "{}", wkt_storage::compute_checksum(&wkt))?;
        }
        Command::Paste { text } => {
            if !contains_marker(&text, &config.clipboard_marker) {
                warn!(marker = %config.clipboard_marker, "pasted text ignored");
                return Ok(());
            }
            parse_wkt(&text)?;
            if store.ingest_pasted(&text, &config.clipboard_marker)? {
                writeln!(out, "{}", wkt_storage::compute_checksum(&text))?;
            } else {
                info!("pasted geometry already stored");
            }
        }
        Command::Update { id, wkt, strict } => {
            parse_wkt(&wkt)?;
            if strict {
                store.try_update(&id, &wkt)?;
            } else {
                store.update(&id, &wkt)?;
            }
        }
        Command::Remove { id, strict } => {
            if strict {
                store.try_remove(&id)?;
            } else {
                store.remove(&id)?;
            }
        }
        Command::Clear => {
            let removed = store.len();
            store.clear()?;
            info!(key = %store.key(), removed, "store cleared");
        }
        Command::Merged => {
            if let Some(wkt) = store.merged_wkt() {
                writeln!(out, "{}", wkt)?;
            }
        }
        Command::Extent => {
            if let Some(rect) = store.extent() {
                writeln!(
                    out,
                    "{} {} {} {}",
                    rect.min().x,
                    rect.min().y,
                    rect.max().x,
                    rect.max().y
                )?;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let result = load_config(&cli).and_then(|config| {
        let backend = config.open_backend()?;
        let mut store = GeometryStore::open(backend, config.storage_key.clone());
        let stdout = std::io::stdout();
        run(cli.command, &mut store, &config, &mut stdout.lock())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
