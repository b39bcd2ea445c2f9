//! Global constants for the supertimeline pipeline.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// External tool contracts
/// Extraction-stage tool, invoked as `log2timeline.py --parsers <profile> <evidence> <store>`
pub const EXTRACTION_TOOL: &str = "log2timeline.py";

/// Export-stage tool, invoked as `psort.py -o <format> -w <output> <store> [<filter>]`
pub const EXPORT_TOOL: &str = "psort.py";

/// Parser profile handed to the extraction tool
pub const PARSER_PROFILE: &str = "win7";

/// Export format handed to the export tool
pub const EXPORT_FORMAT: &str = "l2tcsv";

// Process monitoring
/// Seconds between liveness polls of a running stage tool
pub const PROCESS_POLL_INTERVAL_SECS: u64 = 10;

// Mail
/// Only addresses inside this domain are accepted as notification targets
pub const MAIL_DOMAIN: &str = "lsi.bayern.de";

/// Sender address stamped on notification messages
pub const MAIL_SENDER: &str = "supertimeline@lsi.bayern.de";

/// SMTP relay the notifier submits to
pub const MAIL_RELAY: &str = "mail.lsi.bayern.de";

/// Subject prefix for notification messages
pub const MAIL_SUBJECT_PREFIX: &str = "Supertimeline run";

// File naming
/// Append-only process log, created in the working directory
pub const LOG_FILE_NAME: &str = "supertimeline.log";

/// Prefix of the default output name, completed with the current date
pub const DEFAULT_OUTPUT_PREFIX: &str = "Supertimeline_";

/// Timestamp format accepted on the command line and at the prompts
pub const TIMESTAMP_INPUT_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Timestamp format used inside export filter expressions
pub const TIMESTAMP_FILTER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Workspace labels
/// Prefix for the decompressed-evidence workspace
pub const EVIDENCE_WORKSPACE_PREFIX: &str = "supertimeline-evidence-";

/// Prefix for the intermediate-store workspace
pub const STORE_WORKSPACE_PREFIX: &str = "supertimeline-store-";

/// Exit code for failures outside the validation/stage taxonomy
pub const EXIT_UNEXPECTED: i32 = 10;
