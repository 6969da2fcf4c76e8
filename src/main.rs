use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use event_agent::config::Config;
use event_agent::logging;
use event_agent::query::EventQuery;
use event_agent::server;
use event_agent::store::EventStore;
use event_agent::tool;

#[derive(Parser)]
#[command(name = "event_agent")]
#[command(about = "Answer questions about a catalogue of events")]
#[command(version)]
struct Cli {
    /// Directory holding all-events.json (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the get_events tool over HTTP
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8080
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Run a single query and print the tool result as JSON
    Query {
        /// Text to search for in event names
        #[arg(long, default_value = "")]
        query: String,
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        start_date: String,
        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        end_date: String,
        /// City name fragment
        #[arg(long, default_value = "")]
        city: String,
        /// Country name fragment
        #[arg(long, default_value = "")]
        country: String,
    },
    /// Print a summary of the loaded collection
    Stats,
    /// Print the tool declaration an agent registers
    Describe,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let _guard = match logging::init_logging(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_console_logging();
            warn!("File logging disabled for {}: {}", config.log_dir.display(), e);
            None
        }
    };

    match cli.command {
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(config.bind_addr);
            let store = Arc::new(EventStore::open(config.events_path()));
            info!(events = store.len(), "Event store ready");
            server::start_server(store, addr).await?;
        }
        Commands::Query {
            query,
            start_date,
            end_date,
            city,
            country,
        } => {
            let store = EventStore::open(config.events_path());
            let params = EventQuery {
                query,
                start_date,
                end_date,
                city,
                country,
            };
            let result = tool::call_get_events(&store, &params);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Stats => {
            let store = EventStore::open(config.events_path());
            let snapshot = store.snapshot();
            let dated = snapshot.iter().filter(|e| e.has_dates()).count();
            println!("Source: {}", config.events_path().display());
            println!("Events: {}", snapshot.len());
            println!("With dates: {}", dated);
            println!("Without dates: {}", snapshot.len() - dated);
        }
        Commands::Describe => {
            println!("{}", serde_json::to_string_pretty(&tool::tool_declaration())?);
        }
    }

    Ok(())
}
