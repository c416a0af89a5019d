use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use callguard::{
    build_generator, evaluate_gate, parse_transcript, read_transcript, render_human, render_json,
    CycleReport, PipelineConfig, ReplyPolicy, ScamPipeline,
};

#[derive(Parser)]
#[command(name = "callguard")]
#[command(author, version, about = "Phone-call scam detection pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize and classify a call transcript
    Classify {
        /// Transcript file ("Caller:" / "Receiver:" lines); reads stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Text-generation provider (anthropic, gemini)
        #[arg(long, default_value = "gemini")]
        provider: String,

        /// Model override for the provider
        #[arg(long)]
        model: Option<String>,

        /// Fail when a High / Not Clear result comes without a suggested reply
        #[arg(long)]
        enforce_reply_policy: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Count caller/receiver cycles without calling any backend
    Cycles {
        /// Transcript file; reads stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            input,
            provider,
            model,
            enforce_reply_policy,
            format,
            pretty,
            verbose,
        } => {
            setup_logging(verbose);
            let policy = if enforce_reply_policy {
                ReplyPolicy::Enforce
            } else {
                ReplyPolicy::Advisory
            };
            let succeeded =
                classify_transcript(input, &provider, model.as_deref(), policy, format, pretty)
                    .await?;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Cycles {
            input,
            json,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_cycles(input, json)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Returns false when the pipeline produced the error outcome
async fn classify_transcript(
    input: Option<PathBuf>,
    provider: &str,
    model: Option<&str>,
    policy: ReplyPolicy,
    format: OutputFormat,
    pretty: bool,
) -> Result<bool> {
    let generator = build_generator(provider, model)?;
    info!("Using {} backend", generator.name());
    let pipeline = ScamPipeline::new(generator, PipelineConfig::default().with_reply_policy(policy));

    let conversation = read_transcript(input.as_deref()).context("Failed to load transcript")?;
    let outcome = pipeline.run(&conversation).await;

    match format {
        OutputFormat::Json => println!("{}", render_json(&outcome, pretty)?),
        OutputFormat::Text => print!("{}", render_human(&outcome)),
    }

    Ok(!outcome.is_failure())
}

fn analyze_cycles(input: Option<PathBuf>, json: bool) -> Result<()> {
    let conversation = read_transcript(input.as_deref()).context("Failed to load transcript")?;
    let transcript = parse_transcript(&conversation);
    let report = CycleReport::new(&transcript, evaluate_gate(transcript.cycle_count()));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report.format());
    }

    Ok(())
}
