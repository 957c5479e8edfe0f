//! CLI entry point for quill

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quill")]
#[command(version = "0.1.0")]
#[command(about = "A server-rendered blog backed by a Sanity content lake", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Read documents from a dataset export instead of the Sanity API
    #[arg(short, long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List site information
    List {
        /// Type of content to list (post, route)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quill=debug,info"
    } else {
        "quill=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    if let Commands::Version = cli.command {
        println!("quill version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let quill = quill::Quill::new(&base_dir)?;
    let store = match &cli.fixture {
        Some(path) => quill.open_fixture(path)?,
        None => quill.connect()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            tracing::info!("Starting server at http://{}:{}", ip, port);
            quill.serve(store, &ip, port).await?;
        }

        Commands::List { r#type } => {
            quill.list(store.as_ref(), &r#type).await?;
        }

        Commands::Version => {}
    }

    Ok(())
}
