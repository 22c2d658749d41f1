//! Sitesmith - static site generator with a local content editor
//!
//! Renders JSON data and Markdown posts through templates into a deployable
//! static tree, and serves a small web form for editing that content.

mod admin;
mod app;
mod core;
mod publish;
mod site;

use std::path::PathBuf;

use app::App;
use clap::{Parser, Subcommand};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "sitesmith", version, about)]
struct Cli {
    /// Site root containing site.json and src/
    #[arg(long, short, global = true, default_value = ".")]
    root: PathBuf,
    /// Show debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create site.json and the source directory layout
    Init,
    /// Render the site into the output directory
    Build {
        /// Minify generated HTML
        #[arg(long)]
        minify: bool,
        /// Downscale oversized images in the output
        #[arg(long)]
        optimize_images: bool,
        /// Override the configured base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Keep running and rebuild on changes
        #[arg(long, short)]
        watch: bool,
    },
    /// Start the content management server
    Admin {
        #[arg(long, short)]
        port: Option<u16>,
        /// Open the editor in a browser
        #[arg(long)]
        open: bool,
    },
    /// Build, commit and push the site
    Deploy {
        /// Commit message
        #[arg(long, short, default_value = "")]
        message: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(level)
        .init();

    let mut app = App::open(&cli.root)?;

    match cli.command {
        Command::Init => app.init(),
        Command::Build {
            minify,
            optimize_images,
            base_url,
            watch,
        } => {
            app.config.minify |= minify;
            app.config.images.optimize |= optimize_images;
            if let Some(base_url) = base_url {
                app.config.base_url = base_url;
            }
            if watch {
                app.watch()
            } else {
                app.build()
            }
        }
        Command::Admin { port, open } => {
            if let Some(port) = port {
                app.config.admin.port = port;
            }
            app.config.admin.open_browser |= open;
            runtime()?.block_on(app.admin())
        }
        Command::Deploy { message } => runtime()?.block_on(app.deploy(&message)),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
