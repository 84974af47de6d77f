use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::ActionMethod,
    protocol::{ActionEnvelope, ActionQuery},
};

#[derive(Parser, Debug)]
#[command(name = "actionctl", about = "Send action requests to an action view")]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// GET a page, optionally running one of its GET actions.
    Get {
        path: String,
        #[arg(long)]
        action: Option<String>,
        /// JSON passed as the `data` query parameter.
        #[arg(long)]
        data: Option<String>,
    },
    /// Run one of a page's POST actions.
    Post {
        path: String,
        #[arg(long)]
        action: String,
        /// JSON sent as the body's `data` field.
        #[arg(long)]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let http = Client::new();

    let (method, request) = match cli.command {
        Command::Get { path, action, data } => {
            let query = get_query(action, data.as_deref())?;
            (
                ActionMethod::Get,
                http.get(page_url(&cli.server_url, &path)).query(&query),
            )
        }
        Command::Post { path, action, data } => {
            let envelope = ActionEnvelope::new(action, parse_data(&data)?);
            (
                ActionMethod::Post,
                http.post(page_url(&cli.server_url, &path)).json(&envelope),
            )
        }
    };

    let response = request
        .send()
        .await
        .with_context(|| format!("{method} request to {} failed", cli.server_url))?;
    let status = response.status();
    let body = response.text().await?;

    println!("{method} {status}");
    if !body.is_empty() {
        println!("{}", pretty(&body));
    }
    if !status.is_success() {
        bail!("server answered {status}");
    }
    Ok(())
}

fn parse_data(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| anyhow!("--data is not valid JSON: {e}"))
}

fn get_query(action: Option<String>, data: Option<&str>) -> Result<ActionQuery> {
    let mut query = action.map(ActionQuery::new).unwrap_or_default();
    if let Some(raw) = data {
        query = query.with_data(&parse_data(raw)?);
    }
    Ok(query)
}

fn page_url(server_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        server_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn pretty(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}
