//! # supertimeline
//!
//! A two-stage forensic timeline extraction pipeline driver.
//!
//! ## Overview
//!
//! supertimeline takes a (possibly password-protected, possibly zipped)
//! evidence bundle, drives an external artifact-extraction tool into an
//! intermediate event store, drives a second external tool to filter the
//! store by a time window and export a flat csv timeline, and optionally
//! mails the result to an analyst.
//!
//! The crate owns the orchestration and validation layer:
//!
//! - **Input validation**: fail-fast checks with one exit code per
//!   failure class
//! - **Workspace management**: scoped temp directories for decompressed
//!   evidence and the intermediate store, cleaned up on every exit path
//! - **Stage invocation**: external tools launched and polled to a
//!   terminal exit status, with failure diagnostics captured
//! - **Time filtering**: export predicates built from the validated
//!   bounds
//!
//! The two external tools themselves are opaque collaborators addressed
//! through their command-line contracts.
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Input validation and the immutable run configuration
//! - [`errors`]: Fatal failure taxonomy and exit codes
//! - [`workspace`]: Scoped temporary workspaces
//! - [`archive`]: Evidence bundle decompression
//! - [`stages`]: External stage invocation and monitoring
//! - [`pipeline`]: Sequential run driver
//! - [`notify`]: Completion notification over the mail relay
//! - [`summary`]: Machine-readable run summaries
//! - [`security`]: Log redaction
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Input validation and the immutable run configuration
pub mod config;

/// Application constants and tool contracts
pub mod constants;

/// Fatal failure taxonomy and exit codes
pub mod errors;

/// Evidence bundle decompression and passthrough
pub mod archive;

/// Scoped temporary workspaces for the extraction stages
pub mod workspace;

/// External stage invocation with completion monitoring
pub mod stages;

/// Sequential pipeline driver
pub mod pipeline;

/// Completion notification over the organizational mail relay
pub mod notify;

/// Machine-readable run summaries
pub mod summary;

/// Redaction of sensitive values before logging
pub mod security;
