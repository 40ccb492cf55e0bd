//! CLI entry point for postmatter

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "postmatter")]
#[command(version = "0.1.0")]
#[command(about = "A front-matter content loader for Markdown post collections", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new post collection
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Mark the new post as a draft
        #[arg(long)]
        draft: bool,

        /// Filename to use instead of the configured pattern
        #[arg(short, long)]
        path: Option<String>,
    },

    /// List posts in the collection
    List {
        /// Include draft posts
        #[arg(long)]
        drafts: bool,
    },

    /// Parse every document and report malformed metadata
    Check,

    /// Export the collection as a JSON manifest for a renderer
    Export {
        /// Write the manifest to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include draft posts
        #[arg(long)]
        drafts: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postmatter=debug,info"
    } else {
        "postmatter=info"
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

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing post collection in {:?}", target_dir);
            postmatter::commands::init::init_collection(&target_dir)?;
            println!("Initialized empty post collection in {:?}", target_dir);
        }

        Commands::New { title, draft, path } => {
            let app = postmatter::Postmatter::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            app.new_post(&title, draft, path.as_deref())?;
        }

        Commands::List { drafts } => {
            let app = postmatter::Postmatter::new(&base_dir)?;
            postmatter::commands::list::run(&app, drafts)?;
        }

        Commands::Check => {
            let app = postmatter::Postmatter::new(&base_dir)?;
            app.check()?;
        }

        Commands::Export { output, drafts } => {
            let app = postmatter::Postmatter::new(&base_dir)?;
            postmatter::commands::export::run(&app, output.as_deref(), drafts)?;
        }

        Commands::Version => {
            println!("postmatter version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
