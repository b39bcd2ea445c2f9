//! External stage invocation with completion monitoring.
//!
//! Both pipeline stages are separate processes launched through a
//! [`StageRunner`]. The runner polls process liveness on a fixed interval
//! instead of blocking, captures the error stream on a side thread, and
//! only reports completion after a terminal exit status has been
//! observed. No stage output is consumed before its invocation resolves.

pub mod export;
pub mod extraction;

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, error, info};

use crate::constants::PROCESS_POLL_INTERVAL_SECS;
use crate::errors::{PipelineError, StageKind};
use crate::security::scrub_credentials;

/// Command line of one external stage invocation.
#[derive(Debug, Clone)]
pub struct StageCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl StageCommand {
    /// Rendered command line for the log and the run summary.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// A completed stage invocation: what ran, as which process, and how it
/// terminated.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: StageKind,
    pub command_line: String,
    pub pid: u32,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub exit_code: Option<i32>,
}

/// Launches stage tools and monitors them to completion.
#[derive(Debug, Clone)]
pub struct StageRunner {
    poll_interval: Duration,
}

impl Default for StageRunner {
    fn default() -> Self {
        StageRunner {
            poll_interval: Duration::from_secs(PROCESS_POLL_INTERVAL_SECS),
        }
    }
}

impl StageRunner {
    /// Runner with a custom liveness poll interval. Tests pair this with
    /// tool doubles that inject delays and exit codes.
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        StageRunner { poll_interval }
    }

    /// Launch `command` and poll it until a terminal exit status is
    /// observed.
    ///
    /// Zero exit yields a [`StageReport`]; non-zero exit surfaces the
    /// captured, scrubbed error stream as a stage failure. There is no
    /// timeout: a hung tool blocks the run until it is killed externally.
    pub fn run(&self, stage: StageKind, command: StageCommand) -> Result<StageReport> {
        let command_line = command.command_line();
        info!("Launching {} stage: {}", stage, command_line);

        let started_at = Local::now();
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to launch {} stage tool", stage))?;

        let pid = child.id();
        info!("{} stage running with PID {}", stage, pid);

        // Drain stderr on a side thread so a chatty tool cannot fill the
        // pipe and stall while we poll.
        let stderr_reader = child.stderr.take().map(|mut stream| {
            thread::spawn(move || {
                let mut captured = String::new();
                let _ = stream.read_to_string(&mut captured);
                captured
            })
        });

        let status = loop {
            match child
                .try_wait()
                .with_context(|| format!("failed to poll {} stage tool", stage))?
            {
                Some(status) => break status,
                None => {
                    debug!("{} stage still running, polling again", stage);
                    thread::sleep(self.poll_interval);
                }
            }
        };

        let finished_at = Local::now();
        let stderr = stderr_reader
            .map(|handle| handle.join().unwrap_or_default())
            .unwrap_or_default();

        if !status.success() {
            let scrubbed = scrub_credentials(stderr.trim());
            error!(
                "{} stage (PID {}) failed with {}: {}",
                stage, pid, status, scrubbed
            );
            return Err(PipelineError::StageFailed {
                stage,
                status,
                stderr: scrubbed,
            }
            .into());
        }

        info!(
            "{} stage (PID {}) finished successfully after {}s",
            stage,
            pid,
            (finished_at - started_at).num_seconds()
        );

        Ok(StageReport {
            stage,
            command_line,
            pid,
            started_at,
            finished_at,
            exit_code: status.code(),
        })
    }
}
