//! Completion notification over the organizational mail relay.
//!
//! The notifier composes a multipart status message (plain-text body plus
//! binary attachments tagged with their original filenames) and hands it
//! to the fixed SMTP relay. Transport is treated as an external
//! collaborator: failures are reported to the caller, never retried.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::{Message, SmtpTransport, Transport};
use log::{debug, info};

use crate::constants::{MAIL_RELAY, MAIL_SENDER};

/// Submits status messages to the organizational relay.
#[derive(Debug, Clone)]
pub struct Notifier {
    relay: String,
}

impl Default for Notifier {
    fn default() -> Self {
        Notifier {
            relay: MAIL_RELAY.to_string(),
        }
    }
}

impl Notifier {
    /// Notifier submitting to a specific relay host.
    pub fn with_relay(relay: impl Into<String>) -> Self {
        Notifier { relay: relay.into() }
    }

    /// Compose and send a status message. Each attachment is read from
    /// disk and tagged with its original filename.
    pub fn notify(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachments: &[PathBuf],
    ) -> Result<()> {
        let message = compose_message(recipient, subject, body, attachments)?;

        info!(
            "Sending notification to {} via {} ({} attachments)",
            recipient,
            self.relay,
            attachments.len()
        );
        let mailer = SmtpTransport::builder_dangerous(self.relay.as_str()).build();
        mailer
            .send(&message)
            .with_context(|| format!("mail submission to {} failed", self.relay))?;
        Ok(())
    }
}

/// Build the multipart message: status text first, then one binary part
/// per attachment.
pub fn compose_message(
    recipient: &str,
    subject: &str,
    body: &str,
    attachments: &[PathBuf],
) -> Result<Message> {
    let to: Mailbox = recipient
        .parse()
        .map_err(|e| anyhow!("invalid recipient address '{}': {}", recipient, e))?;
    let from: Mailbox = MAIL_SENDER
        .parse()
        .map_err(|e| anyhow!("invalid sender address '{}': {}", MAIL_SENDER, e))?;

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
    for path in attachments {
        parts = parts.singlepart(attachment_part(path)?);
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(parts)
        .context("failed to compose notification message")
}

fn attachment_part(path: &Path) -> Result<SinglePart> {
    let content = fs::read(path)
        .with_context(|| format!("failed to read attachment {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "attachment".to_string());
    debug!("Attaching {} ({} bytes)", filename, content.len());

    let content_type = ContentType::parse("application/octet-stream")
        .context("failed to build attachment content type")?;
    Ok(Attachment::new(filename).body(content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compose_message_with_attachments() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("supertimeline.log");
        fs::write(&log_path, b"stage log lines").unwrap();

        let message = compose_message(
            "analyst@lsi.bayern.de",
            "Supertimeline run finished",
            "Timeline exported successfully.",
            &[log_path],
        )
        .unwrap();

        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Supertimeline run finished"));
        assert!(rendered.contains("Timeline exported successfully."));
        assert!(rendered.contains("supertimeline.log"));
        assert!(rendered.contains("application/octet-stream"));
    }

    #[test]
    fn test_compose_message_without_attachments() {
        let message = compose_message(
            "analyst@lsi.bayern.de",
            "Supertimeline run failed",
            "See log.",
            &[],
        )
        .unwrap();

        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("See log."));
    }

    #[test]
    fn test_compose_message_rejects_invalid_recipient() {
        let result = compose_message("not an address", "s", "b", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_compose_message_missing_attachment_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.json");

        let result = compose_message("analyst@lsi.bayern.de", "s", "b", &[missing]);
        assert!(result.is_err());
    }
}
