use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "lane-cli")]
#[command(about = "Management CLI for the lane-change server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Act on behalf of this client address (sent as X-Forwarded-For).
    #[arg(short, long)]
    client: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current lane assignment
    Show,
    /// Assign a lane
    Assign {
        lane: String,
        /// Seconds until the assignment expires (0 = server default)
        #[arg(short, long, default_value_t = 0)]
        duration: u64,
    },
    /// Clear the lane assignment
    Clear,
    /// Print the lane catalog
    Config,
    /// Fetch the content currently served
    Fetch,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let change_url = format!("{}/change", cli.url);

    let mut headers = HeaderMap::new();
    if let Some(addr) = &cli.client {
        headers.insert("x-forwarded-for", HeaderValue::from_str(addr)?);
    }

    match cli.command {
        Commands::Show => {
            let res = client.get(&change_url).headers(headers).send().await?;
            if res.status() == reqwest::StatusCode::NOT_FOUND {
                println!("No lane assigned");
                return Ok(());
            }
            print_response(res).await?;
        }
        Commands::Assign { lane, duration } => {
            let res = client
                .post(&change_url)
                .headers(headers)
                .json(&json!({ "lane": lane, "duration": duration }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Clear => {
            let res = client.delete(&change_url).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Config => {
            let res = client
                .get(format!("{}/config", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Fetch => {
            let res = client.get(&cli.url).headers(headers).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    println!("{}", render_response(status, &text)?);
    Ok(())
}

/// Output for a successful response, or an error describing a failed one.
fn render_response(
    status: reqwest::StatusCode,
    text: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if !status.is_success() {
        let mut message = format!("server returned status {}", status);
        if !text.is_empty() {
            message.push_str(&format!(": {}", text));
        }
        return Err(message.into());
    }

    if text.is_empty() {
        Ok("OK".to_string())
    } else if let Ok(json) = serde_json::from_str::<Value>(text) {
        Ok(serde_json::to_string_pretty(&json)?)
    } else {
        Ok(text.to_string())
    }
}
