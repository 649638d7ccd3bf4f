use eco::discovery::{ContactDispatcher, MailDraft, Url};
use std::io::{self, Write};
use tracing::warn;

/// Writes a line to stdout.
pub(crate) fn line(text: impl AsRef<str>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", text.as_ref())
}

/// Prints what a device would hand to its mail and chat apps.
#[derive(Debug, Default)]
pub(crate) struct StdoutDispatcher;

impl ContactDispatcher for StdoutDispatcher {
    fn open_mail(&self, draft: MailDraft) {
        let text = format!("mailto:{}?subject={}", draft.recipients.join(","), draft.subject);
        if let Err(err) = line(text) {
            warn!(error = %err, "Could not print mail draft");
        }
    }

    fn open_link(&self, link: Url) {
        if let Err(err) = line(link.as_str()) {
            warn!(error = %err, "Could not print chat link");
        }
    }
}
