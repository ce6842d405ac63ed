use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::{open_store, output_success};
use crate::cli::OutputFormat;
use crate::database::ResultStore;

pub async fn handle(user_id: i32, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store().await?;
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user {} not found", user_id))?;

    let token = generate_jwt(&Claims::for_user(&user))?;

    match output_format {
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
        OutputFormat::Json => output_success(
            &output_format,
            &format!("Token issued for {}", user.email),
            Some(json!({ "token": token, "user_id": user.id })),
        ),
    }
}
