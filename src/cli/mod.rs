pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "results")]
#[command(about = "Results CLI - local user, token and health tooling for the Results API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "User management in the configured store")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Print a signed bearer token for an existing user")]
    Token {
        #[arg(help = "User id")]
        user_id: i32,
    },

    #[command(about = "Check server health status from the /health endpoint")]
    Health {
        #[arg(long, help = "Server URL (defaults to the configured local port)")]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
        Commands::Token { user_id } => commands::token::handle(user_id, output_format).await,
        Commands::Health { url } => commands::health::handle(url, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_add() {
        let cli = Cli::parse_from(["results", "user", "add", "a@example.com", "--admin"]);
        match cli.command {
            Commands::User {
                cmd: commands::user::UserCommands::Add { email, admin, password },
            } => {
                assert_eq!(email, "a@example.com");
                assert!(admin);
                assert!(password.is_none());
            }
            _ => panic!("expected user add"),
        }
    }

    #[test]
    fn parses_token_and_health() {
        let cli = Cli::parse_from(["results", "--json", "token", "7"]);
        assert!(matches!(cli.command, Commands::Token { user_id: 7 }));
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));

        let cli = Cli::parse_from(["results", "health", "--url", "http://localhost:9000"]);
        assert!(matches!(cli.command, Commands::Health { url: Some(_) }));
    }
}
