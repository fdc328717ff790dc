//! A command line program that asks one question and prints the reasoning
//! loop as it runs.

#[macro_use]
extern crate tracing;

mod config;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use little_react::SessionBuilder;
use little_react::core::{LoopEvent, LoopOutcome};
use little_react_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use owo_colors::OwoColorize;
use tokio::select;
use tokio::sync::mpsc;

use crate::config::Settings;

const DEFAULT_QUERY: &str = "What is the mass of Earth plus the mass of \
    Saturn and all of that times 2?";

const BAR_CHAR: &str = "▎";

#[derive(Debug, Parser)]
#[command(version, about = "Answer a question with a ReAct loop")]
struct Args {
    /// The question to ask.
    query: Option<String>,

    /// Maximum number of model calls.
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Model identifier, e.g. `openai/gpt-oss-120b`.
    #[arg(long)]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Retries for rate-limited or timed-out requests.
    #[arg(long)]
    retries: Option<u32>,

    /// Print the outcome and the transcript as JSON when done.
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::from_env()?;
    debug!("settings: {settings:?}");

    let mut config_builder =
        OpenAIConfigBuilder::with_api_key(settings.api_key);
    if let Some(base_url) = args.base_url.or(settings.base_url) {
        config_builder = config_builder.with_base_url(base_url);
    }
    if let Some(model) = args.model.or(settings.model) {
        config_builder = config_builder.with_model(model);
    }
    let model_provider = OpenAIProvider::new(config_builder.build());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut session_builder =
        SessionBuilder::with_model_provider(model_provider)
            .with_max_iterations(
                args.max_iterations.unwrap_or(settings.max_iterations),
            )
            .with_max_retries(args.retries.unwrap_or(settings.max_retries))
            .on_event(move |event| {
                event_tx.send(event.clone()).ok();
            });
    let request_timeout =
        args.timeout_secs.map(Duration::from_secs).or(settings.request_timeout);
    if let Some(timeout) = request_timeout {
        session_builder = session_builder.with_request_timeout(timeout);
    }
    let mut session = session_builder.build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .context("invalid progress template")?
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut progress_bar = None;

    let query = args.query.unwrap_or_else(|| DEFAULT_QUERY.to_owned());
    println!("{}❓ {}", BAR_CHAR.bright_green(), query.bold());

    let result = {
        let ask = session.ask(&query);
        tokio::pin!(ask);
        loop {
            select! {
                biased;
                Some(event) = event_rx.recv() => {
                    print_event(event, &mut progress_bar, &progress_style);
                }
                result = &mut ask => break result,
            }
        }
    };
    // Events emitted by the last poll of the loop.
    while let Ok(event) = event_rx.try_recv() {
        print_event(event, &mut progress_bar, &progress_style);
    }
    if let Some(progress_bar) = progress_bar.take() {
        progress_bar.finish_and_clear();
    }

    let outcome = result.context("the agent stopped with an error")?;
    match &outcome {
        LoopOutcome::Answered { answer, .. } => {
            println!("\n{} {}", "Answer:".bright_green().bold(), answer);
        }
        LoopOutcome::Exhausted { iterations } => {
            eprintln!(
                "{}",
                format!("No answer after {iterations} iterations").red()
            );
        }
    }

    if args.json {
        let report = serde_json::json!({
            "outcome": outcome,
            "transcript": session.transcript(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(match outcome {
        LoopOutcome::Answered { .. } => ExitCode::SUCCESS,
        LoopOutcome::Exhausted { .. } => ExitCode::from(2),
    })
}

fn print_event(
    event: LoopEvent,
    progress_bar: &mut Option<ProgressBar>,
    progress_style: &ProgressStyle,
) {
    match event {
        LoopEvent::Thinking { .. } => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(progress_style.clone());
            bar.set_message("🤔 Thinking...");
            bar.enable_steady_tick(Duration::from_millis(100));
            *progress_bar = Some(bar);
        }
        LoopEvent::Response { text, .. } => {
            // Finish the progress bar before printing anything else.
            if let Some(bar) = progress_bar.take() {
                bar.finish_and_clear();
            }
            println!("{}🤖 {}", BAR_CHAR.bright_cyan(), text.bright_white());
        }
        LoopEvent::Observation { text, .. } => {
            println!("{}👀 {}", BAR_CHAR.bright_yellow(), text);
        }
    }
}
