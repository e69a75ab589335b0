//! StashDB CLI
//!
//! Inspect and edit a store directory of `Document` records.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stashdb::allocator::IndexAllocator;
use stashdb::storage::{files, DiskLoader};
use stashdb::{Config, Document, Record, Store, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

/// StashDB CLI
#[derive(Parser, Debug)]
#[command(name = "stashdb")]
#[command(about = "Inspect and edit a StashDB record directory")]
#[command(version)]
struct Args {
    /// Store directory
    #[arg(short, long, default_value = "./stashdb_data")]
    data_dir: PathBuf,

    /// Record file suffix
    #[arg(short, long, default_value = ".ddps")]
    suffix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every record
    List,

    /// Show one record
    Get {
        /// Record identity
        id: u64,
    },

    /// Write a new record from name=value fields
    Put {
        /// Fields, e.g. color=orange flavor=vanilla
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Set fields on an existing record
    Update {
        /// Record identity
        id: u64,

        /// Fields to set, e.g. flavor=lemon
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Delete a record
    Delete {
        /// Record identity
        id: u64,
    },

    /// Check the directory without modifying it
    Verify,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stashdb=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> stashdb::Result<()> {
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .file_suffix(&args.suffix)
        .build();

    if let Commands::Verify = args.command {
        return verify(&config);
    }

    let store: Store<Document> = Store::open(config)?;
    let outcome = execute(&store, args.command);

    if !store.stop() {
        tracing::warn!("Not every change reached disk before shutdown");
    }
    outcome
}

fn execute(store: &Store<Document>, command: Commands) -> stashdb::Result<()> {
    match command {
        Commands::List => {
            let mut records = store.values()?;
            records.sort_by_key(|doc| doc.identity);
            for doc in &records {
                println!("{}", doc.to_text()?);
            }
            tracing::info!("{} record(s)", records.len());
        }
        Commands::Get { id } => {
            let doc = store.get(id)?.ok_or(StoreError::NotFound(id))?;
            println!("{}", doc.to_text()?);
        }
        Commands::Put { fields } => {
            let doc = store.write(Document::from_pairs(&fields))?;
            println!("{}", doc.identity);
        }
        Commands::Update { id, fields } => {
            let mut doc = store.get(id)?.ok_or(StoreError::NotFound(id))?;
            doc.fields.extend(Document::from_pairs(&fields).fields);
            store.update(doc)?;
        }
        Commands::Delete { id } => {
            let doc = store.get(id)?.ok_or(StoreError::NotFound(id))?;
            store.delete(&doc)?;
        }
        Commands::Verify => unreachable!("verify runs without opening a store"),
    }
    Ok(())
}

/// Load the directory read-only and compare it with the index file
fn verify(config: &Config) -> stashdb::Result<()> {
    config.validate()?;

    let loader = DiskLoader::new(&config.data_dir, &config.file_suffix);
    let (records, result) = loader.load::<Document>()?;

    let index_path = files::index_path(&config.data_dir, &config.file_suffix);
    let next_identity = if index_path.exists() {
        Some(IndexAllocator::read_index_file(&index_path)?)
    } else {
        None
    };
    let max_identity = records.iter().map(Document::identity).max();

    println!("directory:      {}", config.data_dir.display());
    println!("records:        {}", result.records_loaded);
    println!("blank skipped:  {}", result.blank_skipped);
    println!("ignored files:  {}", result.files_ignored);
    match next_identity {
        Some(next) => println!("next identity:  {}", next),
        None => println!("next identity:  1 (no index file)"),
    }

    let next = next_identity.unwrap_or(1);
    if let Some(max) = max_identity {
        if next <= max {
            return Err(StoreError::CorruptIndex {
                path: index_path,
                reason: format!("next identity {} does not exceed stored identity {}", next, max),
            });
        }
    }

    println!("status:         ok");
    Ok(())
}
