use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use genai_adapter::{tolerant_json_parse, Config, GenAiClient};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "genai-adapter")]
#[command(about = "Generate text and images with Gemini")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate text from a prompt.
    Text {
        prompt: String,
        /// System instruction sent alongside the prompt.
        #[arg(long, default_value = "")]
        system: String,
        /// Request JSON output and pretty-print the recovered value.
        #[arg(long)]
        json: bool,
    },
    /// Generate an image, falling back to a placeholder URL on failure.
    Image {
        prompt: String,
        /// Write the decoded PNG here instead of printing the data URI.
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Recover JSON from loosely formatted text (stdin when omitted).
    Parse { text: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genai_adapter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Text {
            prompt,
            system,
            json,
        } => {
            let client = GenAiClient::from_config(&Config::from_env()?);
            let text = client.generate_text(&prompt, &system, json).await?;
            if json {
                match tolerant_json_parse(&text) {
                    Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                    None => {
                        warn!("Model output was not valid JSON; printing raw text");
                        println!("{}", text);
                    }
                }
            } else {
                println!("{}", text);
            }
        }
        Command::Image { prompt, out } => {
            let client = GenAiClient::from_config(&Config::from_env()?);
            let image = client.generate_image(&prompt).await;
            if image.is_degraded() {
                warn!("Image generation degraded; using placeholder");
            }

            match (out, image.png_bytes()?) {
                (Some(path), Some(bytes)) => {
                    std::fs::write(&path, bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Saved image to {}", path.display());
                }
                _ => println!("{}", image),
            }
        }
        Command::Parse { text } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            match tolerant_json_parse(&text) {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => println!("null"),
            }
        }
    }

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}
