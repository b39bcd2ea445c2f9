use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};
use uuid::Uuid;

use supertimeline::cli::Args;
use supertimeline::config::{build_pipeline_config, PipelineConfig, StdinResolver};
use supertimeline::constants::{EXIT_UNEXPECTED, LOG_FILE_NAME, MAIL_SUBJECT_PREFIX};
use supertimeline::errors::PipelineError;
use supertimeline::notify::Notifier;
use supertimeline::pipeline::{Pipeline, PipelineReport};
use supertimeline::summary::{build_run_summary, write_run_summary};

fn main() {
    let args = Args::parse();

    let log_path = match initialize_logging(args.verbose) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("Failed to initialize logging: {:#}", err);
            process::exit(EXIT_UNEXPECTED);
        }
    };

    info!("Starting supertimeline pipeline");

    match run(&args, &log_path) {
        Ok(()) => info!("Supertimeline pipeline completed successfully"),
        Err(err) => {
            error!("Pipeline failed: {:#}", err);
            process::exit(exit_code_for(&err));
        }
    }
}

/// Initialize logging to the terminal and the append-only process log.
fn initialize_logging(verbose: bool) -> Result<PathBuf> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_path = PathBuf::from(LOG_FILE_NAME);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            log_level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(log_level, Config::default(), log_file),
    ])
    .context("Failed to initialize logger")?;

    Ok(log_path)
}

fn run(args: &Args, log_path: &Path) -> Result<()> {
    // Validate all inputs before any workspace is created
    let resolver = StdinResolver;
    let config = build_pipeline_config(args, &resolver)?;
    config.log_resolved();

    let run_id = Uuid::new_v4();
    let started_at = Local::now();
    info!("Run id: {}", run_id);

    let report = Pipeline::default().execute(&config)?;
    info!("Timeline written to {}", config.output.display());

    let summary_path = write_summary(&run_id, started_at, &config, &report);
    send_notification(&config, &report, log_path, summary_path.as_deref());

    Ok(())
}

/// Map a failure to its dedicated process exit code.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<PipelineError>()
        .map(|e| e.exit_code())
        .unwrap_or(EXIT_UNEXPECTED)
}

/// Write the run summary next to the output file. The timeline is
/// already committed at this point, so a summary failure only warns.
fn write_summary(
    run_id: &Uuid,
    started_at: DateTime<Local>,
    config: &PipelineConfig,
    report: &PipelineReport,
) -> Option<PathBuf> {
    let summary = build_run_summary(run_id, started_at, &config.output, report);
    match write_run_summary(&summary, &config.output) {
        Ok(path) => {
            info!("Run summary written to {}", path.display());
            Some(path)
        }
        Err(err) => {
            warn!("Failed to write run summary: {:#}", err);
            None
        }
    }
}

/// Send the completion notification when an address was resolved.
/// Notification failures never unwind the already-committed run.
fn send_notification(
    config: &PipelineConfig,
    report: &PipelineReport,
    log_path: &Path,
    summary_path: Option<&Path>,
) {
    let recipient = match &config.mail_addr {
        Some(addr) => addr,
        None => {
            info!("No notification address resolved, skipping notification");
            return;
        }
    };

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let subject = format!("{} on {} finished", MAIL_SUBJECT_PREFIX, host);
    let body = format!(
        "Supertimeline extraction finished.\n\n\
         Output: {}\n\
         Extraction stage: PID {}, exit code {:?}\n\
         Export stage: PID {}, exit code {:?}\n",
        config.output.display(),
        report.extraction.pid,
        report.extraction.exit_code,
        report.export.pid,
        report.export.exit_code,
    );

    let mut attachments = vec![log_path.to_path_buf(), config.output.clone()];
    if let Some(path) = summary_path {
        attachments.push(path.to_path_buf());
    }

    match Notifier::default().notify(recipient, &subject, &body, &attachments) {
        Ok(()) => info!("Notification sent to {}", recipient),
        Err(err) => warn!("Notification failed: {:#}", err),
    }
}
