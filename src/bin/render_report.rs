//! Offline helper for the quality notifier
//!
//! Renders a captured webhook payload exactly as the server would, without
//! touching the quality service or the chat bot, and signs payloads for
//! manual webhook testing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;

use quality_notifier::config::{LinkHost, PipelineConfig};
use quality_notifier::report::{HistoricalCounts, PayloadExtractor, ReportRenderer};
use quality_notifier::wechat::Envelope;
use quality_notifier::webhooks::signature;

#[derive(Parser)]
#[command(name = "render-report")]
#[command(about = "Preview quality notifier messages for a webhook payload")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Standard,
    Extended,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the report (and reminder, for failed gates) for a payload file
    Preview {
        /// Path to the webhook JSON body
        #[arg(short, long)]
        payload: String,

        /// Pipeline profile to render with
        #[arg(long, value_enum, default_value = "standard")]
        profile: Profile,

        /// Host substituted for `localhost` in the dashboard link
        #[arg(long, default_value = "localhost")]
        link_host: String,

        /// Open bug count to show
        #[arg(long, default_value_t = 0)]
        bugs: u64,

        /// Open vulnerability count to show
        #[arg(long, default_value_t = 0)]
        vulnerabilities: u64,

        /// Open code smell count to show
        #[arg(long, default_value_t = 0)]
        code_smells: u64,

        /// Print the JSON envelopes instead of the message bodies
        #[arg(long)]
        json: bool,
    },
    /// Print the HMAC signature header value for a payload file
    Sign {
        /// Path to the webhook JSON body
        #[arg(short, long)]
        payload: String,

        /// Shared webhook secret
        #[arg(short, long)]
        secret: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            payload,
            profile,
            link_host,
            bugs,
            vulnerabilities,
            code_smells,
            json,
        } => {
            let history = HistoricalCounts {
                bugs,
                vulnerabilities,
                code_smells,
            };
            preview(&payload, profile, link_host, history, json)?;
        }
        Commands::Sign { payload, secret } => {
            let body = fs::read(&payload).with_context(|| format!("Failed to read {}", payload))?;
            println!("{}", signature::sign(&secret, &body)?);
        }
    }

    Ok(())
}

fn preview(
    path: &str,
    profile: Profile,
    link_host: String,
    history: HistoricalCounts,
    json: bool,
) -> Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path))?;

    let mut config = match profile {
        Profile::Standard => PipelineConfig::standard(),
        Profile::Extended => PipelineConfig::extended(),
    };
    config.link_host = LinkHost::Public(link_host.clone());

    let (commit, report) = PayloadExtractor::extract(&payload, &config)?;
    let renderer = ReportRenderer::new(&config, link_host);

    let history = config.include_history.then_some(history);
    let mut messages = vec![renderer.render(&commit, &report, history.as_ref())?];
    if !report.overall_status.is_ok() {
        messages.push(renderer.render_reminder(&commit));
    }

    for message in &messages {
        if json {
            println!("{}", serde_json::to_string_pretty(&Envelope::from(message))?);
        } else {
            println!("{}", message.body);
            println!("mentions: {:?}", message.mentions);
        }
        println!();
    }

    Ok(())
}
