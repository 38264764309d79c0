use anyhow::Context;

/// Host capabilities the session hands results to: a clipboard and a way to
/// dismiss the surrounding surface once the workflow is done.
pub(crate) trait SessionHost {
    fn copy(&mut self, text: &str) -> anyhow::Result<()>;
    fn close(&mut self);
}

pub(crate) struct ClipboardHost;

impl SessionHost for ClipboardHost {
    fn copy(&mut self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("failed to open clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("failed to write clipboard")?;
        Ok(())
    }

    fn close(&mut self) {
        // one-shot binary: closing the host surface is just returning to the
        // shell, which happens when main falls through
    }
}
