//! `dramaid` CLI - browse the catalog and resolve episode links

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dramaid::{home_sections, DramaidProvider, SiteConfig};

#[derive(Parser)]
#[command(name = "dramaid")]
#[command(about = "Browse DramaId and resolve playable episode links")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Site config file (defaults to ~/.config/dramaid/config.toml)
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a home section page
    Home {
        /// Section index (0: Drama Terbaru, 1: Baru Ditambahkan, 2: Drama Popular)
        #[arg(short, long, default_value = "0")]
        section: usize,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Search the catalog
    Search {
        /// Search text
        query: String,
    },

    /// Load a series or movie detail page
    Load {
        /// Detail page URL
        url: String,
    },

    /// Resolve playable links for an episode page
    Links {
        /// Episode page URL
        url: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => SiteConfig::load_from(path)?,
        None => SiteConfig::load()?,
    };
    let provider = DramaidProvider::from_config(config)?;

    match cli.command {
        Commands::Home { section, page } => {
            let sections = home_sections();
            let section = sections
                .get(section)
                .with_context(|| format!("no home section {section} (0-{})", sections.len() - 1))?;
            eprintln!("📺 {} (page {page})", section.name);
            print_json(&provider.list_catalog_page(page, &section.filter).await?)?;
        }
        Commands::Search { query } => {
            print_json(&provider.search(&query).await?)?;
        }
        Commands::Load { url } => {
            print_json(&provider.load_entry_details(&url).await?)?;
        }
        Commands::Links { url } => {
            let report = provider.resolve_report(&url).await?;
            for failure in report.failures() {
                eprintln!("⚠️  {failure}");
            }
            let media = report.into_media();
            eprintln!("🎬 {} links, {} subtitles", media.links.len(), media.subtitles.len());
            print_json(&media)?;
        }
    }

    Ok(())
}
