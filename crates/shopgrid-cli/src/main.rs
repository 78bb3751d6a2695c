use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shopgrid_catalog::{Catalog, RawQuery};

#[derive(Debug, Parser)]
#[command(name = "shopgrid-cli")]
#[command(about = "Shopgrid command line interface")]
struct Cli {
    /// Directory holding the catalog CSV files.
    #[arg(long, env = "SHOPGRID_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a one-shot product search against the catalog.
    Search {
        #[arg(long)]
        lat: String,
        #[arg(long)]
        lng: String,
        /// Search radius in meters (100-2000).
        #[arg(long)]
        radius: String,
        /// Maximum number of results (0-100).
        #[arg(long)]
        count: String,
        /// Comma-separated tags; a shop matches when it carries any of them.
        #[arg(long)]
        tags: Option<String>,
    },
    /// Print catalog summary counts.
    Stats,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = shopgrid_core::load_app_config_from_env()?;
    let catalog = Catalog::load_from_dir(&cli.data_dir, config.grid)?;

    match cli.command {
        Commands::Search {
            lat,
            lng,
            radius,
            count,
            tags,
        } => {
            let raw = RawQuery {
                lat: Some(lat),
                lng: Some(lng),
                radius: Some(radius),
                count: Some(count),
                tags,
            };
            let query = match raw.validate() {
                Ok(query) => query,
                Err(errors) => {
                    for error in &errors {
                        eprintln!("error: {error}");
                    }
                    anyhow::bail!("invalid query parameters");
                }
            };
            let hits = shopgrid_catalog::search(&catalog, &query);
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Commands::Stats => {
            println!("shops:          {}", catalog.shop_count());
            println!("grid entries:   {}", catalog.grid().entry_count());
            println!("occupied cells: {}", catalog.grid().occupied_cells());
        }
    }

    Ok(())
}
