//! Interactive generate and create flows

use anyhow::Result;
use colored::Colorize;

use bronzegen_catalog::WarehouseClient;
use bronzegen_core::{ColumnConfig, ConfigStore, Selector};
use bronzegen_engine::{PreviewOutcome, ViewCreator};
use bronzegen_sql::{ArtifactStore, SqlGenerator};
use bronzegen_templates::TemplateStore;

use crate::{preview, prompt};

/// Generate-views mode: pick a table, assign a template to every column,
/// save the configuration and write the SQL artifact.
pub async fn generate_views(
    warehouse: &dyn WarehouseClient,
    templates: &TemplateStore,
    configs: &ConfigStore,
    artifacts: &ArtifactStore,
) -> Result<()> {
    println!("\n{}\n", "=== Generate SQL Views ===".bold());

    let datasets = warehouse.list_datasets().await?;
    if datasets.is_empty() {
        println!("No datasets found.");
        return Ok(());
    }
    println!("\nAvailable datasets:");
    let dataset_id = datasets[prompt::select_index("Select dataset (number): ", &datasets)?].clone();

    let tables = warehouse.list_tables(&dataset_id).await?;
    if tables.is_empty() {
        println!("No tables found in {}.", dataset_id);
        return Ok(());
    }
    println!("\nTables in {}:", dataset_id);
    let table_id = tables[prompt::select_index("Select table (number): ", &tables)?].clone();

    println!("\nProcessing table: {}.{}", dataset_id, table_id);
    let config = configure_columns(warehouse, templates, &dataset_id, &table_id).await?;

    let config_path = configs.save(&dataset_id, &table_id, &config)?;
    println!("Configuration saved to: {}", config_path.display());

    let generator = SqlGenerator::new(templates, artifacts.clone());
    let sql_path = generator.generate(&dataset_id, &table_id, &config)?;
    println!(
        "\n{} {}",
        "SQL view file generated:".green(),
        sql_path.display()
    );

    Ok(())
}

/// Prompt for a selector for every column of the table, in schema order
async fn configure_columns(
    warehouse: &dyn WarehouseClient,
    templates: &TemplateStore,
    dataset_id: &str,
    table_id: &str,
) -> Result<ColumnConfig> {
    let schema = warehouse.table_schema(dataset_id, table_id).await?;

    let mut options = templates.column_template_names();
    options.push("custom".to_string());
    options.push("skip".to_string());

    let mut config = ColumnConfig::new();
    for column in &schema.columns {
        loop {
            println!("\n{} {}", "Column:".bold(), column.name);
            println!("{} {}", "Type:".bold(), column.field_type);

            match warehouse
                .sample_values(dataset_id, table_id, &column.name)
                .await
            {
                Ok(samples) => {
                    println!("Sample values:");
                    for sample in samples {
                        println!("  - {}", sample);
                    }
                }
                Err(e) => println!("{} {}", "Could not fetch samples:".yellow(), e),
            }

            println!("\nSelect transformation template:");
            for (i, option) in options.iter().enumerate() {
                println!("{}. {}", i + 1, option);
            }
            println!("{}. Get more details", options.len() + 1);

            let choice = prompt::select_number("Enter choice (number): ", options.len() + 1)?;
            if choice == options.len() + 1 {
                show_column_details(warehouse, dataset_id, table_id, &column.name).await?;
                continue;
            }

            config.insert(&column.name, Selector::parse(&options[choice - 1]));
            break;
        }
    }

    Ok(config)
}

/// Column details view: statistics and most common values
async fn show_column_details(
    warehouse: &dyn WarehouseClient,
    dataset_id: &str,
    table_id: &str,
    column: &str,
) -> Result<()> {
    println!(
        "\n--- Detailed information for column: {} ---",
        column.bold()
    );

    match warehouse.column_stats(dataset_id, table_id, column).await {
        Ok(stats) => {
            println!("Total rows: {}", stats.total_count);
            println!(
                "Null values: {} ({:.2}%)",
                stats.null_count,
                100.0 - stats.not_null_percent
            );
            println!("Empty strings: {}", stats.empty_string_count);
            println!("Not null: {}%", stats.not_null_percent);
        }
        Err(e) => println!("{} {}", "Error getting stats:".yellow(), e),
    }

    match warehouse.value_counts(dataset_id, table_id, column).await {
        Ok(counts) if !counts.is_empty() => {
            println!("\nMost common values (value, count):");
            for entry in counts {
                println!("  - {}: {}", entry.value, entry.count);
            }
        }
        Ok(_) => {}
        Err(e) => println!("{} {}", "Error getting common values:".yellow(), e),
    }

    prompt::input("\nPress Enter to continue...")?;
    Ok(())
}

/// Create-tables mode: execute a stored artifact and show the result
pub async fn create_tables(warehouse: &dyn WarehouseClient, artifacts: &ArtifactStore) -> Result<()> {
    println!("\n{}\n", "=== Create Tables from SQL Files ===".bold());

    let datasets = artifacts.datasets()?;
    if datasets.is_empty() {
        println!("No datasets found with SQL files.");
        return Ok(());
    }
    println!("Available datasets:");
    let dataset_id = datasets[prompt::select_index("\nSelect dataset (number): ", &datasets)?].clone();

    let tables = artifacts.tables(&dataset_id)?;
    if tables.is_empty() {
        println!("No SQL files found for dataset: {}", dataset_id);
        return Ok(());
    }
    println!("\nTables available in {}:", dataset_id);
    let table_id = tables[prompt::select_index("\nSelect table to create (number): ", &tables)?].clone();

    println!(
        "\nCreating bronze view for table: {}.{}...",
        dataset_id, table_id
    );

    let creator = ViewCreator::new(warehouse, artifacts.clone());
    let creation = match creator.create_view(&dataset_id, &table_id).await {
        Ok(creation) => creation,
        Err(e) => {
            println!("\n{} {}", "Error:".red(), e);
            return Ok(());
        }
    };

    println!("\n{} {}", "Success:".green(), creation.message);
    match &creation.view_name {
        Some(name) => println!("View created: {}", name),
        None => println!(
            "{}",
            "View created, but its name could not be confirmed from the SQL.".yellow()
        ),
    }

    match creation.preview {
        PreviewOutcome::Loaded(table_preview) => {
            println!("\nHow would you like to view the preview?");
            println!("1. Transposed (column: value format)");
            println!("2. JSON format");

            match prompt::select_number("\nEnter choice (number): ", 2)? {
                1 => preview::print_transposed(&table_preview),
                _ => preview::print_json(&table_preview)?,
            }
        }
        PreviewOutcome::Failed(reason) => {
            println!("\n{} {}", "Error previewing table:".yellow(), reason);
        }
        PreviewOutcome::Skipped => {}
    }

    Ok(())
}
