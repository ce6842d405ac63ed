use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config::{self, StoreBackend};
use crate::database::{DatabaseManager, PgResultStore};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": message
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Connect to the configured Postgres store and bring its schema up to date
pub async fn open_store() -> anyhow::Result<PgResultStore> {
    let database = &config::config().database;

    if database.backend == StoreBackend::Memory {
        anyhow::bail!("STORE_BACKEND=memory lives inside the server process; point the CLI at Postgres");
    }

    let pool = DatabaseManager::connect(database)
        .await
        .context("failed to connect to the results database")?;
    DatabaseManager::migrate(&pool)
        .await
        .context("failed to run migrations")?;

    Ok(PgResultStore::new(pool))
}
