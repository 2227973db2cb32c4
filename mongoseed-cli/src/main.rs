use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mongoseed_core::config::{default_config_path, Config};
use mongoseed_core::{
    fixtures, DocumentStore, FixtureLoader, MemoryStore, MongoStore, SemiStructuredOptions,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mongoseed")]
#[command(about = "mongoseed - load fixture documents into a MongoDB collection")]
#[command(version)]
struct Cli {
    /// Config file (default: $MONGOSEED_CONFIG or mongoseed.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Connection string, overrides the config file
    #[arg(long, global = true)]
    uri: Option<String>,
    /// Target database, overrides the config file
    #[arg(long, global = true)]
    database: Option<String>,
    /// Write to an in-memory store instead of a server
    #[arg(long, global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the four users fixture records
    Users {
        /// Target collection
        #[arg(long)]
        collection: Option<String>,
        /// Drop the collection first
        #[arg(long)]
        reset: bool,
    },
    /// Insert randomly generated semi-structured documents
    SemiStructured {
        /// Target collection
        #[arg(long)]
        collection: Option<String>,
        /// Number of documents
        #[arg(long)]
        count: Option<usize>,
        /// RNG seed, same seed gives the same documents
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Documents per insert_many call
        #[arg(long)]
        batch_size: Option<usize>,
        /// Drop the collection first
        #[arg(long)]
        reset: bool,
    },
    /// Check a collection against the users fixture
    Verify {
        /// Collection to check
        #[arg(long)]
        collection: Option<String>,
    },
    /// Print the users fixture as Extended JSON (no database needed)
    Dump {
        /// Write to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("mongoseed v{}", mongoseed_core::VERSION);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Dump { output } => dump(output.as_deref()),
        command if cli.dry_run => {
            warn!("--dry-run: documents go to an in-memory store and are discarded on exit");
            let store = memory_store(&config)?;
            execute(command, &config, store).await
        }
        command => {
            let store = MongoStore::connect(&config.connection)
                .await
                .context("Failed to configure MongoDB client")?;
            store.ping().await.with_context(|| {
                format!(
                    "Cannot reach MongoDB (database '{}')",
                    config.connection.database
                )
            })?;
            execute(command, &config, store).await
        }
    }
}

/// Config file, then command-line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;

    if let Some(uri) = &cli.uri {
        config.connection.uri = Some(uri.clone());
    }
    if let Some(database) = &cli.database {
        config.connection.database = database.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// In-memory store with the configured validators attached
fn memory_store(config: &Config) -> Result<MemoryStore> {
    let store = MemoryStore::new(config.connection.database.as_str());
    for (collection, schema) in config.schemas().context("Invalid validators")? {
        info!("Validator attached to '{}'", collection);
        store.set_schema(&collection, schema);
    }
    Ok(store)
}

async fn execute<S: DocumentStore>(command: Commands, config: &Config, store: S) -> Result<()> {
    match command {
        Commands::Users { collection, reset } => {
            let collection = collection.unwrap_or_else(|| config.fixtures.users_collection.clone());
            let loader = FixtureLoader::new(store, collection);
            if reset {
                loader
                    .reset()
                    .await
                    .with_context(|| format!("Failed to drop '{}'", loader.collection()))?;
            }

            let report = loader
                .seed()
                .await
                .with_context(|| format!("Failed to seed '{}'", loader.collection()))?;
            println!(
                "Seeded {} documents into {}.{}",
                report.inserted_count, report.database, report.collection
            );
            Ok(())
        }
        Commands::SemiStructured {
            collection,
            count,
            seed,
            batch_size,
            reset,
        } => {
            let collection =
                collection.unwrap_or_else(|| config.fixtures.semi_structured_collection.clone());
            let loader = FixtureLoader::new(store, collection);
            if reset {
                loader
                    .reset()
                    .await
                    .with_context(|| format!("Failed to drop '{}'", loader.collection()))?;
            }

            let options = SemiStructuredOptions {
                count: count.unwrap_or(config.fixtures.semi_structured_count),
                rng_seed: seed,
                batch_size: batch_size.unwrap_or(config.fixtures.batch_size),
            };
            let report = loader
                .seed_semi_structured(options)
                .await
                .with_context(|| format!("Failed to seed '{}'", loader.collection()))?;
            println!(
                "Seeded {} semi-structured documents into {}.{}",
                report.inserted_count, report.database, report.collection
            );
            Ok(())
        }
        Commands::Verify { collection } => {
            let collection = collection.unwrap_or_else(|| config.fixtures.users_collection.clone());
            let loader = FixtureLoader::new(store, collection);
            let report = loader
                .verify()
                .await
                .with_context(|| format!("Failed to read '{}'", loader.collection()))?;

            if report.is_ok() {
                println!(
                    "'{}' matches the users fixture ({} documents)",
                    loader.collection(),
                    report.document_count
                );
                return Ok(());
            }

            for violation in &report.violations {
                println!("  - {}", violation);
            }
            bail!(
                "'{}' does not match the users fixture ({} violations)",
                loader.collection(),
                report.violations.len()
            )
        }
        Commands::Dump { output } => dump(output.as_deref()),
    }
}

fn dump(output: Option<&Path>) -> Result<()> {
    let json = fixtures::dump_users().context("Failed to render fixture")?;
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            println!("Wrote users fixture to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
