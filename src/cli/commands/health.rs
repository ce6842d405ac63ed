use anyhow::Context;
use serde_json::{json, Value};
use std::time::Duration;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config;

pub async fn handle(url: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = url.unwrap_or_else(default_url);
    let endpoint = format!("{}/health", base.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let response = client
        .get(&endpoint)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", endpoint))?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            &output_format,
            &format!("{} is healthy", base),
            Some(json!({ "health": body })),
        )
    } else {
        output_error(&output_format, &format!("{} answered {}: {}", base, status, body))?;
        anyhow::bail!("server unhealthy")
    }
}

fn default_url() -> String {
    format!("http://127.0.0.1:{}", config::config().api.port)
}
