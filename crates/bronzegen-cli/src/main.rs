use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use bronzegen_catalog::{BigQueryWarehouse, WarehouseClient};
use bronzegen_core::ConfigStore;
use bronzegen_sql::ArtifactStore;
use bronzegen_templates::TemplateStore;

mod interactive;
mod preview;
mod prompt;

/// Default storage directories, relative to the working directory
const TEMPLATE_DIR: &str = "templates";
const CONFIG_DIR: &str = "configs";
const DATASETS_DIR: &str = "datasets";

/// Bronzegen - bronze layer SQL view generator
#[derive(Parser)]
#[command(name = "bronzegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a Google Cloud service account JSON credentials file
    #[arg(short, long, global = true)]
    credentials: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate a table's SQL view from its saved configuration
    Regenerate {
        /// Dataset ID
        dataset_id: String,

        /// Table ID
        table_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Regenerate {
            dataset_id,
            table_id,
        }) => regenerate_command(&dataset_id, &table_id, cli.verbose),
        None => interactive_command(cli.credentials.as_deref(), cli.verbose).await,
    }
}

/// Regenerate command - offline, touches no warehouse
fn regenerate_command(dataset_id: &str, table_id: &str, verbose: bool) -> Result<()> {
    let configs = ConfigStore::new(CONFIG_DIR);
    let templates = TemplateStore::open(TEMPLATE_DIR)?;
    let artifacts = ArtifactStore::new(DATASETS_DIR);

    if verbose {
        eprintln!(
            "{} {}.{}...",
            "Regenerating".cyan(),
            dataset_id,
            table_id
        );
    }

    let path = bronzegen_engine::regenerate(&configs, &templates, &artifacts, dataset_id, table_id)?;

    println!(
        "{} {}",
        "SQL view file regenerated:".green(),
        path.display()
    );
    Ok(())
}

/// Interactive mode - pick between generating SQL views and creating tables
async fn interactive_command(credentials: Option<&Path>, verbose: bool) -> Result<()> {
    let warehouse = connect(credentials, verbose).await?;
    let templates = TemplateStore::open(TEMPLATE_DIR)?;
    let configs = ConfigStore::new(CONFIG_DIR);
    let artifacts = ArtifactStore::new(DATASETS_DIR);

    println!("{}", "=== Bronze Layer SQL View Generator ===".bold());
    println!();
    println!("Select operation mode:");
    println!("1. Generate SQL views");
    println!("2. Create tables from SQL files");

    match prompt::select_number("\nEnter choice (number): ", 2)? {
        1 => interactive::generate_views(&warehouse, &templates, &configs, &artifacts).await,
        _ => interactive::create_tables(&warehouse, &artifacts).await,
    }
}

/// Connect to BigQuery with a credentials file or ADC
async fn connect(credentials: Option<&Path>, verbose: bool) -> Result<BigQueryWarehouse> {
    let warehouse = match credentials {
        Some(path) => BigQueryWarehouse::from_service_account_file(path).await?,
        None => {
            // ADC carries no project id; require it from the environment.
            let project = std::env::var("GOOGLE_CLOUD_PROJECT").map_err(|_| {
                anyhow::anyhow!(
                    "No credentials file given and GOOGLE_CLOUD_PROJECT is not set. \
                     Pass --credentials <path> or export GOOGLE_CLOUD_PROJECT."
                )
            })?;
            BigQueryWarehouse::with_adc(project).await?
        }
    };

    if verbose {
        eprintln!("{} {}...", "Testing connection to".cyan(), warehouse.name());
    }
    warehouse.test_connection().await?;
    if verbose {
        eprintln!("{}", "Connection successful".green());
    }

    Ok(warehouse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
