// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use billsheet::application::{Confirmation, ConfirmationGate, LedgerSession};
use billsheet::cli::Console;
use billsheet::io::{ArtifactFormat, ExportError, Exporter, ShareTarget};

/// Gate that answers every request with a fixed reply and records what was asked.
pub struct ScriptedGate {
    pub answer: bool,
    pub asked: Vec<Confirmation>,
}

impl ScriptedGate {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            asked: Vec::new(),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            asked: Vec::new(),
        }
    }
}

impl ConfirmationGate for ScriptedGate {
    fn request_confirmation(&mut self, request: &Confirmation) -> bool {
        self.asked.push(*request);
        self.answer
    }
}

/// Share target that remembers which files it was handed.
#[derive(Default)]
pub struct RecordingShare {
    pub shared: Mutex<Vec<std::path::PathBuf>>,
}

impl ShareTarget for RecordingShare {
    fn share(&self, artifact: &Path) -> Result<(), ExportError> {
        self.shared
            .lock()
            .expect("share log poisoned")
            .push(artifact.to_path_buf());
        Ok(())
    }
}

/// Share target that always fails.
pub struct BrokenShare;

impl ShareTarget for BrokenShare {
    fn share(&self, _artifact: &Path) -> Result<(), ExportError> {
        Err(ExportError::ShareFailed {
            program: "broken".to_string(),
            status: "exit status: 1".to_string(),
        })
    }
}

/// Run a console over `input` on the default sheet and return the final
/// session together with everything it printed.
pub async fn run_console(
    input: &str,
    export_dir: &Path,
    share: Option<Arc<dyn ShareTarget>>,
    assume_yes: bool,
) -> Result<(LedgerSession, String)> {
    let mut output = Vec::new();
    let session = Console::new(
        Cursor::new(input.to_string()),
        &mut output,
        LedgerSession::default(),
        Exporter::new(export_dir, ArtifactFormat::Text),
    )
    .with_share(share)
    .assume_yes(assume_yes)
    .run()
    .await?;
    Ok((session, String::from_utf8(output)?))
}
