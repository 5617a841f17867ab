//! Completion hook that appends events to a JSON Lines file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use coursetrack_core::session::{CompletionEvent, CompletionHook};

/// Appends one JSON object per issued certificate.
pub struct JsonLinesHook {
    path: PathBuf,
}

impl JsonLinesHook {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn append(&self, event: &CompletionEvent) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(event)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl CompletionHook for JsonLinesHook {
    fn on_complete(&self, event: &CompletionEvent) {
        // The certificate is already issued; a failed export is only logged.
        match self.append(event) {
            Ok(()) => tracing::debug!("completion recorded in {}", self.path.display()),
            Err(e) => tracing::warn!(
                "failed to record completion in {}: {e:#}",
                self.path.display()
            ),
        }
    }
}
