use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Result, anyhow};
use clap::Parser;
use console::style;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use ytscript_core::{
    Config, Orchestrator, ResolutionEvent, ResolutionOutcome, TranscriptResponse, TranscriptResult,
    VideoRef, format_transcript_with_timestamps,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

#[derive(Parser)]
#[command(name = "ytscript")]
#[command(about = "Fetch YouTube captions, falling back across retrieval strategies")]
struct Cli {
    /// Video URL or bare 11-character video id
    url: String,

    /// Caption language (e.g., "en", "de"). Defaults to the configured language.
    #[arg(short, long)]
    lang: Option<String>,

    /// Print the full response as JSON
    #[arg(long, conflicts_with = "stream")]
    json: bool,

    /// Print every resolution event as a JSON line as it happens
    #[arg(long)]
    stream: bool,

    /// Prefix each line with its [MM:SS] timestamp
    #[arg(short, long)]
    timestamps: bool,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is valid"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = Config::load(cli.config.as_deref())?;
    let lang = cli.lang.clone().unwrap_or_else(|| config.lang.clone());
    let orchestrator = Orchestrator::standard(&config)?;
    tracing::debug!(
        %lang,
        timeout_secs = config.http.timeout_secs,
        strategies = ?orchestrator.providers(),
        "Configuration loaded"
    );

    let video = match VideoRef::parse(&cli.url) {
        Ok(video) => video,
        Err(err) => {
            let outcome = ResolutionOutcome::from(err);
            if cli.stream {
                println!("{}", serde_json::to_string(&outcome.into_event())?);
            } else if cli.json {
                let response = TranscriptResponse::from_outcome(outcome, &lang);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                report_failure(&outcome);
            }
            std::process::exit(1);
        }
    };

    if cli.stream {
        return stream_events(&orchestrator, video, lang).await;
    }

    let started = Instant::now();
    let outcome = resolve_with_spinner(&orchestrator, video, &lang, !cli.json).await?;
    tracing::debug!(
        success = outcome.is_success(),
        elapsed = %format_duration(started.elapsed()),
        "Resolution finished"
    );

    if cli.json {
        let ok = outcome.is_success();
        let response = TranscriptResponse::from_outcome(outcome, &lang);
        println!("{}", serde_json::to_string_pretty(&response)?);
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    match outcome {
        ResolutionOutcome::Success(result) => {
            print_transcript(&result, cli.timestamps, started.elapsed());
            Ok(())
        }
        failure => {
            report_failure(&failure);
            std::process::exit(1);
        }
    }
}

/// One JSON line per event, flushed as soon as it is produced.
async fn stream_events(orchestrator: &Orchestrator, video: VideoRef, lang: String) -> Result<()> {
    let mut events = orchestrator.events(video, lang);
    let mut failed = false;

    while let Some(event) = events.next().await {
        failed |= matches!(event, ResolutionEvent::Error { .. });
        println!("{}", serde_json::to_string(&event)?);
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

async fn resolve_with_spinner(
    orchestrator: &Orchestrator,
    video: VideoRef,
    lang: &str,
    show_spinner: bool,
) -> Result<ResolutionOutcome> {
    let spinner = if show_spinner {
        create_spinner(&format!("Resolving captions for {}...", video))
    } else {
        ProgressBar::hidden()
    };

    let mut events = orchestrator.events(video, lang.to_string());

    while let Some(event) = events.next().await {
        if let ResolutionEvent::Progress { message, .. } = &event {
            spinner.set_message(format!("{}...", message));
            continue;
        }

        spinner.finish_and_clear();
        return event
            .into_outcome()
            .ok_or_else(|| anyhow!("terminal event without outcome"));
    }

    spinner.finish_and_clear();
    Err(anyhow!("resolution ended without a terminal event"))
}

fn print_transcript(result: &TranscriptResult, timestamps: bool, elapsed: Duration) {
    let kind = result
        .kind
        .map(|k| if k.is_manual() { "manual" } else { "auto" })
        .unwrap_or("untimed");
    let length = result
        .duration_seconds()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .map(|d| format!(", {}", format_duration(d)))
        .unwrap_or_default();

    eprintln!(
        "{} Captions via {} {} {}",
        style("✓").green().bold(),
        style(result.provider.name()).cyan(),
        style(format!(
            "({}, {}, {} segments{})",
            result.language_code,
            kind,
            result.segments.len(),
            length
        ))
        .dim(),
        style(format!("[{}]", format_duration(elapsed))).dim()
    );
    eprintln!("{}", style("─".repeat(60)).dim());

    if timestamps {
        println!("{}", format_transcript_with_timestamps(result));
    } else {
        println!("{}", result.full_text);
    }
}

fn report_failure(outcome: &ResolutionOutcome) {
    if let ResolutionOutcome::Failure {
        kind,
        message,
        video_id,
    } = outcome
    {
        let video = video_id
            .as_deref()
            .map(|id| format!(" [{}]", id))
            .unwrap_or_default();
        eprintln!(
            "{} {}{} {}",
            style("Error:").red().bold(),
            message,
            style(video).dim(),
            style(format!("({:?})", kind)).dim()
        );
    }
}
