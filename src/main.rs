use anyhow::Context;
use clap::{Parser, Subcommand};
use glazer_site::blog_import::{BlogImporter, ImportOptions, ImportReport, OUTPUT_FILE};
use glazer_site::calculator::{painting, wood};
use glazer_site::config::Config;
use glazer_site::db::SqliteStorage;
use glazer_site::logging::init_logging;
use glazer_site::{seed, server};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "glazer_site")]
#[command(about = "Painting and wood-finishing site backend")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = glazer_site::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
        /// Keep everything in memory and seed the sample catalog on start
        #[arg(long)]
        memory: bool,
    },
    /// Create the admin user and upsert the sample catalog
    Seed,
    /// Create an admin user, or reset the password of an existing one
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Scrape the legacy blog listing into blog-articles.json
    ImportBlogs {
        /// Listing URL (defaults to site.blog_source_url)
        #[arg(long)]
        url: Option<String>,
        /// Output directory (defaults to <site.uploads_dir>/blogs)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Maximum listing pages to fetch
        #[arg(long, default_value_t = 20)]
        max_pages: u32,
        /// Skip thumbnail downloads
        #[arg(long)]
        no_download: bool,
    },
    /// Fetch scraped articles and store them as published blog posts
    LoadBlogs {
        /// Scraped listing (defaults to <site.uploads_dir>/blogs/blog-articles.json)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Index of the first article in this batch
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long, default_value_t = 25)]
        batch_size: usize,
    },
    /// Print a painting estimate for a JSON input file
    EstimatePainting {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a wood polishing estimate for a JSON input file
    EstimateWood {
        #[arg(long)]
        input: PathBuf,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid input in {}", path.display()))
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&config.server.log_dir);

    if let Err(e) = run(cli.command, config).await {
        error!("{:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, mut config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Serve { port, memory } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let storage = server::open_storage(&config, memory)?;
            if memory {
                seed::run(storage.as_ref(), &config.seed).await?;
            }
            server::start_server(config, storage).await?;
        }
        Commands::Seed => {
            let storage = SqliteStorage::open(&config.database.path)?;
            let report = seed::run(&storage, &config.seed).await?;
            println!(
                "Seeded {} brands, {} products, {} relations",
                report.brands, report.products, report.relations
            );
        }
        Commands::CreateAdmin { email, password } => {
            let storage = SqliteStorage::open(&config.database.path)?;
            let created = seed::upsert_admin(&storage, email.trim(), &password).await?;
            if created {
                println!("Admin user created: {}", email.trim());
            } else {
                println!("Password updated for {}", email.trim());
            }
        }
        Commands::ImportBlogs {
            url,
            output,
            max_pages,
            no_download,
        } => {
            let output = output
                .unwrap_or_else(|| Path::new(&config.site.uploads_dir).join("blogs"));
            let mut options =
                ImportOptions::new(url.unwrap_or(config.site.blog_source_url.clone()), output);
            options.max_pages = max_pages;
            options.download_thumbnails = !no_download;

            let report = BlogImporter::new(options)?.run().await?;
            info!("Imported {} articles", report.total_articles);
            println!("Scraped {} articles", report.total_articles);
        }
        Commands::LoadBlogs {
            input,
            start,
            batch_size,
        } => {
            let blogs_dir = Path::new(&config.site.uploads_dir).join("blogs");
            let input = input.unwrap_or_else(|| blogs_dir.join(OUTPUT_FILE));
            let listing: ImportReport = read_json(&input)?;
            let storage = SqliteStorage::open(&config.database.path)?;
            let importer =
                BlogImporter::new(ImportOptions::new(config.site.blog_source_url.clone(), blogs_dir))?;
            let report = importer
                .load_into(&storage, &listing.articles, start, batch_size)
                .await?;
            println!(
                "Imported {}, skipped {}, errors {}",
                report.imported, report.skipped, report.errors
            );
            let next = start.saturating_add(batch_size);
            if next < listing.articles.len() {
                println!("Next batch: --start {next} --batch-size {batch_size}");
            }
        }
        Commands::EstimatePainting { input } => {
            let input: painting::PaintingInput = read_json(&input)?;
            let estimate = painting::estimate(&input);
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        }
        Commands::EstimateWood { input } => {
            let input: wood::WoodInput = read_json(&input)?;
            let estimate = wood::estimate(&input)?;
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        }
    }
    Ok(())
}
