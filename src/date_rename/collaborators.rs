//! Interfaces between the batch driver and the outside world.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::date_rename::{RenamePlan, RunSummary};

/// Why a single rename could not be applied.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    #[error("Failed to rename {}: {source}", path.display())]
    Os {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Finds candidate files.
pub trait FileLister {
    /// List files matching a glob pattern.
    ///
    /// The order is stable within one call.
    ///
    /// # Errors
    /// Returns an error if the pattern is invalid.
    fn list(&self, pattern: &str, recursive: bool) -> anyhow::Result<Vec<PathBuf>>;
}

/// Reads file modification times.
pub trait FileMetadata: Sync {
    /// # Errors
    /// Returns an error if the file vanished or can not be accessed.
    fn modified_time(&self, path: &Path) -> io::Result<DateTime<Local>>;
}

/// Applies a single rename without ever partially renaming.
pub trait Renamer {
    /// # Errors
    /// Returns a [`RenameError`] describing why the file was left as is.
    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), RenameError>;
}

/// Blocking yes/no question to the user.
pub trait Confirmation {
    /// Returns true only for an explicit yes.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Receives structured progress of a run for display.
pub trait ReportSink {
    /// Plans that are about to be applied, in order.
    fn plans(&mut self, plans: &[RenamePlan]);

    /// File could not be stat'ed and was left out of the batch.
    fn stat_error(&mut self, path: &Path, error: &io::Error);

    /// Plans excluded because they share a target path.
    fn conflict(&mut self, target: &Path, sources: &[&Path]);

    /// A single rename failed.
    fn rename_error(&mut self, plan: &RenamePlan, error: &RenameError);

    /// Final counts after the run.
    fn summary(&mut self, summary: &RunSummary);
}
