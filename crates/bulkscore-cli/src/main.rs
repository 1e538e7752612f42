mod output;
mod pipeline;
mod result_log;
mod sheet;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use bulkscore_client::ScoringClient;
use bulkscore_core::{AppConfig, ScoreMode};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::pipeline::{RunContext, RunSummary};
use crate::result_log::{result_path, ResultLog};
use crate::sheet::{column_index, Sheet};

#[derive(Debug, Parser)]
#[command(name = "bulkscore")]
#[command(about = "Score spreadsheet rows against the customer-fit API, resuming where the last run stopped")]
struct Cli {
    /// Spreadsheet containing the rows to score (.xlsx or .xls)
    #[arg(long)]
    filename: PathBuf,
    /// API key, sent as the basic-auth username
    #[arg(long = "api_key", env = "BULKSCORE_API_KEY", hide_env_values = true)]
    api_key: String,
    /// Score by company domain or by personal email: `domain` or `email`
    #[arg(long = "score_type")]
    score_type: ScoreMode,
    /// Column holding the email values (e.g. BQ)
    #[arg(long = "column_idx")]
    column_idx: String,
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match bulkscore_core::load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_tracing(&config) {
        eprintln!("invalid log filter '{}': {e}", config.log_level);
        return ExitCode::FAILURE;
    }

    match run(&cli, &config).await {
        Ok(summary) => {
            tracing::debug!(
                rows_visited = summary.rows_visited,
                skipped_empty = summary.skipped_empty,
                skipped_no_match = summary.skipped_no_match,
                already_written = summary.already_written,
                deduplicated = summary.deduplicated,
                written = summary.written,
                api_calls = summary.api_calls,
                "bulk scoring finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("bulk scoring aborted: {e:#}. Relaunch to resume");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<RunSummary> {
    let column = column_index(&cli.column_idx)?;
    let reference_column = column_index(&config.reference_column)?;

    tracing::info!(file = %cli.filename.display(), "loading spreadsheet");
    let sheet = Sheet::open(&cli.filename)?;

    let output = result_path(&config.results_dir, &cli.filename)?;
    let (log, checkpoint) = ResultLog::open(&output)
        .with_context(|| format!("failed to open result log {}", output.display()))?;
    tracing::info!(output = %log.path().display(), "spreadsheet loaded; appending results");

    let skip_offset = sheet.leading_skip_offset(reference_column);
    let start_row = checkpoint.start_row(skip_offset);
    tracing::info!(
        written_lines = checkpoint.written_lines,
        skip_offset,
        start_row,
        total_rows = sheet.row_count(),
        "resume point computed"
    );

    let client = ScoringClient::with_base_url(
        &cli.api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.api_base_url,
    )
    .context("failed to build scoring client")?;

    let mut ctx = RunContext::new(&client, cli.score_type, column, config.progress_interval, log);
    let outcome = tokio::select! {
        result = ctx.run(&sheet, start_row) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(result) => Ok(result?),
        None => {
            ctx.flush().context("failed to flush result log")?;
            anyhow::bail!("interrupted")
        }
    }
}
