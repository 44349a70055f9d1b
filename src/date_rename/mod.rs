//! Date prefix renaming.
//!
//! Plans are computed by the pure [`compute_plan`] function,
//! and a batch of them is applied by the [`BatchDriver`] through narrow collaborator traits,
//! so the whole flow can be tested without touching the filesystem.

mod batch;
mod collaborators;
mod config;
mod prenamed;
mod system;
mod transform;

pub use batch::{BatchDriver, RunState, RunSummary};
pub use collaborators::{Confirmation, FileLister, FileMetadata, RenameError, Renamer, ReportSink};
pub use config::{DEFAULT_DATE_FORMAT, DEFAULT_DELIMITER, DEFAULT_PATTERN, DaterConfig, RenameConfig};
pub use prenamed::strip_date_prefix;
pub use system::{FsMetadata, FsRenamer, GlobLister, StdinPrompt, TerminalReport};
pub use transform::{RenamePlan, compute_plan, render_date, split_extension, titleize};
