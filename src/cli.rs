use clap::Parser;

/// Command-line arguments for the supertimeline pipeline.
///
/// All pipeline parameters are optional here: outside quiet mode, missing
/// values are resolved interactively before the run starts. Validation
/// happens in the config module, not during parsing.
#[derive(Parser, Debug)]
#[clap(
    name = "supertimeline",
    about = "Two-stage forensic supertimeline extraction pipeline"
)]
pub struct Args {
    /// Path to the evidence bundle: a zip archive or a directory
    #[clap(short, long)]
    pub input: Option<String>,

    /// Path of the exported csv timeline (default: Supertimeline_<date>.csv)
    #[clap(short, long)]
    pub output: Option<String>,

    /// Start of the time window (format: YYYY-MM-DD HH-MM-SS)
    #[clap(short, long)]
    pub start_time: Option<String>,

    /// End of the time window (format: YYYY-MM-DD HH-MM-SS)
    #[clap(short, long)]
    pub end_time: Option<String>,

    /// Passphrase of the evidence archive
    #[clap(short, long)]
    pub password: Option<String>,

    /// Mail address receiving the log and status message
    #[clap(short, long)]
    pub mail_addr: Option<String>,

    /// Do not prompt for missing optional arguments
    #[clap(short, long)]
    pub quiet: bool,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_basic_args_parsing() {
        let args = Args::parse_from(&[
            "supertimeline",
            "--input", "/cases/host42.zip",
            "--output", "/cases/host42.csv",
            "--verbose",
        ]);

        assert_eq!(args.input, Some("/cases/host42.zip".to_string()));
        assert_eq!(args.output, Some("/cases/host42.csv".to_string()));
        assert!(args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from(&[
            "supertimeline",
            "-i", "/cases/host42",
            "-s", "2023-01-15 10-30-00",
            "-e", "2023-02-01 00-00-00",
            "-p", "infected",
            "-m", "analyst@lsi.bayern.de",
            "-q",
        ]);

        assert_eq!(args.input, Some("/cases/host42".to_string()));
        assert_eq!(args.start_time, Some("2023-01-15 10-30-00".to_string()));
        assert_eq!(args.end_time, Some("2023-02-01 00-00-00".to_string()));
        assert_eq!(args.password, Some("infected".to_string()));
        assert_eq!(args.mail_addr, Some("analyst@lsi.bayern.de".to_string()));
        assert!(args.quiet);
    }

    #[test]
    fn test_default_values() {
        let args = Args::parse_from(&["supertimeline"]);

        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(args.start_time.is_none());
        assert!(args.end_time.is_none());
        assert!(args.password.is_none());
        assert!(args.mail_addr.is_none());
        assert!(!args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_timestamps_with_spaces_stay_whole() {
        let args = Args::parse_from(&[
            "supertimeline",
            "--start-time", "2023-01-15 10-30-00",
        ]);

        assert_eq!(args.start_time, Some("2023-01-15 10-30-00".to_string()));
    }
}
