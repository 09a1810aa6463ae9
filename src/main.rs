//! CLI entry point for blog-pages

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_pages::Site;

#[derive(Parser)]
#[command(name = "blog-pages")]
#[command(version)]
#[command(about = "Generates blog post pages from a directory of markdown files", long_about = None)]
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
    /// Generate the post pages
    #[command(alias = "b")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// List the pages or posts a build would create
    List {
        /// Type of content to list (page, post)
        #[arg(default_value = "pages")]
        r#type: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_pages=debug,info"
    } else {
        "blog_pages=info"
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
        Commands::Build { watch } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Building post pages...");

            let written = blog_pages::commands::build::run(&site)?;
            println!("Generated {} pages into {:?}", written, site.public_dir);

            if watch {
                blog_pages::commands::build::watch(&site)?;
            }
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, json } => {
            let site = Site::new(&base_dir)?;
            blog_pages::commands::list::run(&site, &r#type, json)?;
        }

        Commands::Version => {
            println!("blog-pages version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
