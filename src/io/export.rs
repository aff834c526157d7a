use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{ArtifactFormat, render};
use crate::application::TableSnapshot;

/// The only message users see when an export goes wrong.
pub const EXPORT_FAILED_NOTICE: &str = "could not complete export";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render artifact: {0}")]
    Render(#[from] anyhow::Error),

    #[error("share command is empty")]
    EmptyShareCommand,

    #[error("failed to launch share command '{program}': {source}")]
    ShareLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("share command '{program}' exited with {status}")]
    ShareFailed { program: String, status: String },

    #[error("export task failed: {0}")]
    Task(String),
}

/// Hands a finished artifact to the platform's sharing mechanism.
pub trait ShareTarget: Send + Sync {
    fn share(&self, artifact: &Path) -> Result<(), ExportError>;
}

/// Shares by running an external program with the artifact path as its
/// last argument, e.g. `xdg-open` or a messaging CLI.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
    args: Vec<String>,
}

impl CommandShare {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line on whitespace: the first word is the program.
    pub fn parse(command_line: &str) -> Result<Self, ExportError> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(ExportError::EmptyShareCommand)?;
        Ok(Self::new(program, words.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ShareTarget for CommandShare {
    fn share(&self, artifact: &Path) -> Result<(), ExportError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(artifact)
            .status()
            .map_err(|source| ExportError::ShareLaunch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ExportError::ShareFailed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// How an export ended, as reported back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportNotice {
    /// Artifact written and handed to the share target.
    Shared(PathBuf),
    /// Artifact written; no share target, so its location is surfaced.
    Saved(PathBuf),
    /// Something went wrong. Details are logged, not shown.
    Failed,
}

impl ExportNotice {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExportNotice::Failed)
    }
}

impl std::fmt::Display for ExportNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportNotice::Shared(path) => write!(f, "Shared export: {}", path.display()),
            ExportNotice::Saved(path) => write!(f, "Export saved to {}", path.display()),
            ExportNotice::Failed => write!(f, "{EXPORT_FAILED_NOTICE}"),
        }
    }
}

/// Writes snapshots of the sheet to artifact files.
#[derive(Debug, Clone)]
pub struct Exporter {
    out_dir: PathBuf,
    format: ArtifactFormat,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>, format: ArtifactFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            format,
        }
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path for a new artifact of this snapshot. The random suffix keeps two
    /// exports within the same second apart.
    pub fn artifact_path(&self, snapshot: &TableSnapshot) -> PathBuf {
        let suffix = Uuid::new_v4().simple().to_string();
        let name = format!(
            "billsheet-{}-{}.{}",
            snapshot.taken_at.format("%Y%m%d-%H%M%S"),
            &suffix[..8],
            self.format.extension()
        );
        self.out_dir.join(name)
    }

    /// Render `snapshot` into a new file and return its path.
    ///
    /// The artifact is rendered in memory first; a render error leaves no
    /// file behind.
    pub fn write_artifact(&self, snapshot: &TableSnapshot) -> Result<PathBuf, ExportError> {
        let mut rendered = Vec::new();
        render(snapshot, self.format, &mut rendered)?;

        fs::create_dir_all(&self.out_dir).map_err(|source| ExportError::Write {
            path: self.out_dir.clone(),
            source,
        })?;

        let path = self.artifact_path(snapshot);
        fs::write(&path, rendered).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Write the artifact, then share it if a target is given.
    pub fn export(
        &self,
        snapshot: &TableSnapshot,
        share: Option<&dyn ShareTarget>,
    ) -> Result<ExportNotice, ExportError> {
        let path = self.write_artifact(snapshot)?;
        match share {
            Some(target) => {
                target.share(&path)?;
                tracing::info!(path = %path.display(), "export shared");
                Ok(ExportNotice::Shared(path))
            }
            None => {
                tracing::info!(path = %path.display(), "export saved");
                Ok(ExportNotice::Saved(path))
            }
        }
    }

    /// Like [`Exporter::export`], but any error collapses into
    /// [`ExportNotice::Failed`] after being logged.
    pub fn export_with_notice(
        &self,
        snapshot: &TableSnapshot,
        share: Option<&dyn ShareTarget>,
    ) -> ExportNotice {
        match self.export(snapshot, share) {
            Ok(notice) => notice,
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                ExportNotice::Failed
            }
        }
    }
}

/// Start an export in the background and return right away.
///
/// The snapshot is owned by the task, so later edits to the sheet do not
/// affect what gets exported, and export failures never reach the sheet.
pub fn spawn_export(
    exporter: Exporter,
    share: Option<Arc<dyn ShareTarget>>,
    snapshot: TableSnapshot,
) -> JoinHandle<ExportNotice> {
    tokio::task::spawn_blocking(move || exporter.export_with_notice(&snapshot, share.as_deref()))
}

/// Wait for a spawned export. A panicked or cancelled task counts as a failure.
pub async fn finish_export(handle: JoinHandle<ExportNotice>) -> ExportNotice {
    match handle.await {
        Ok(notice) => notice,
        Err(err) => {
            tracing::warn!(error = %ExportError::Task(err.to_string()), "export failed");
            ExportNotice::Failed
        }
    }
}
