use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{open_store, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::NewUser;
use crate::database::ResultStore;

const DEFAULT_ROLE: &str = "ROLE_USER";
const DEFAULT_PASSWORD: &str = "changeme";

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Insert a user")]
    Add {
        #[arg(help = "Email address (unique)")]
        email: String,
        #[arg(long, help = "Password, stored as a SHA-256 digest")]
        password: Option<String>,
        #[arg(long, help = "Grant the configured administrator role")]
        admin: bool,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { email, password, admin } => {
            let password = password.unwrap_or_else(|| {
                tracing::warn!("No --password given, using the default development password");
                DEFAULT_PASSWORD.to_string()
            });

            let store = open_store().await?;
            let user = store
                .insert_user(NewUser::new(email, &password, roles(admin)))
                .await?;

            output_success(
                &output_format,
                &format!("User {} created with id {}", user.email, user.id),
                Some(json!({ "user": { "id": user.id, "email": user.email, "roles": user.roles } })),
            )
        }
    }
}

fn roles(admin: bool) -> Vec<String> {
    let mut roles = vec![DEFAULT_ROLE.to_string()];
    if admin {
        roles.push(config::config().security.admin_role.clone());
    }
    roles
}
