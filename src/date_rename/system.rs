//! Filesystem and terminal implementations of the collaborator traits.

use std::ffi::OsStr;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use colored::Colorize;
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::date_rename::{
    Confirmation, FileLister, FileMetadata, RenameError, RenamePlan, Renamer, ReportSink, RunSummary,
};
use crate::{print_error, print_warning};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Lists files with shell style glob patterns.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobLister;

/// Reads modification times from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMetadata;

/// Renames files on disk, never overwriting an existing file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRenamer;

/// Asks for confirmation on the terminal.
pub struct StdinPrompt<R: BufRead> {
    reader: R,
}

/// Prints plans and results as coloured terminal output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalReport {
    verbose: bool,
    dryrun: bool,
}

impl FileLister for GlobLister {
    fn list(&self, pattern: &str, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
        let pattern_path = Path::new(pattern);
        let name_pattern = pattern_path
            .file_name()
            .and_then(OsStr::to_str)
            .context("Pattern needs a file name part")?;
        let name_pattern =
            Pattern::new(name_pattern).with_context(|| format!("Invalid glob pattern: '{pattern}'"))?;

        let root = match pattern_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let root_string = crate::path_to_string(root);
        if Pattern::escape(&root_string) != root_string {
            anyhow::bail!("Pattern directory can not contain wildcards: '{root_string}'");
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        Ok(Self::walk(root, &name_pattern, max_depth))
    }
}

impl GlobLister {
    /// Collect files whose name matches the pattern, skipping hidden directories.
    ///
    /// Names that are not valid Unicode are matched in their lossy form,
    /// but the returned paths keep the original names.
    fn walk(root: &Path, name_pattern: &Pattern, max_depth: usize) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !(entry.file_type().is_dir() && crate::is_hidden(entry)));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    print_warning!("Skipping unreadable path: {error}");
                    continue;
                }
            };
            if !entry.file_type().is_file()
                || !name_pattern.matches_with(&entry.file_name().to_string_lossy(), MATCH_OPTIONS)
            {
                continue;
            }
            let path = entry.into_path();
            // Keep relative paths free of the implicit "./" prefix
            let path = match path.strip_prefix(".") {
                Ok(stripped) if root == Path::new(".") => stripped.to_path_buf(),
                _ => path,
            };
            files.push(path);
        }
        files
    }
}

impl FileMetadata for FsMetadata {
    fn modified_time(&self, path: &Path) -> io::Result<DateTime<Local>> {
        let modified = fs::metadata(path)?.modified()?;
        Ok(DateTime::<Local>::from(modified))
    }
}

impl Renamer for FsRenamer {
    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), RenameError> {
        match fs::symlink_metadata(old) {
            Ok(_) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(RenameError::SourceNotFound(old.to_path_buf()));
            }
            Err(source) => {
                return Err(RenameError::Os {
                    path: old.to_path_buf(),
                    source,
                });
            }
        }

        let capitalization_change_only = Self::is_capitalization_change_only(old, new);
        let destination_taken = if capitalization_change_only {
            Self::exact_name_exists(new)
        } else {
            fs::symlink_metadata(new).is_ok()
        };
        if destination_taken {
            return Err(RenameError::DestinationExists(new.to_path_buf()));
        }

        let result = if capitalization_change_only {
            Self::rename_with_temp_file(old, new)
        } else {
            fs::rename(old, new)
        };

        result.map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => RenameError::SourceNotFound(old.to_path_buf()),
            io::ErrorKind::AlreadyExists => RenameError::DestinationExists(new.to_path_buf()),
            _ => RenameError::Os {
                path: old.to_path_buf(),
                source,
            },
        })
    }
}

impl FsRenamer {
    fn is_capitalization_change_only(old: &Path, new: &Path) -> bool {
        old != new && crate::path_to_string(old).to_lowercase() == crate::path_to_string(new).to_lowercase()
    }

    /// Check for a directory entry with exactly this name,
    /// which differs from `exists` on case-insensitive file systems.
    fn exact_name_exists(path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::read_dir(parent).is_ok_and(|entries| {
            entries
                .filter_map(Result::ok)
                .any(|entry| entry.file_name().as_os_str() == name)
        })
    }

    /// Rename through an intermediate name to work around case-insensitive file systems.
    fn rename_with_temp_file(old: &Path, new: &Path) -> io::Result<()> {
        let mut temp_name = new.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".dater.tmp");
        let temp_file = new.with_file_name(temp_name);
        fs::rename(old, &temp_file)?;
        fs::rename(&temp_file, new).inspect_err(|_| {
            let _ = fs::rename(&temp_file, old);
        })
    }
}

impl StdinPrompt<io::StdinLock<'static>> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: io::stdin().lock(),
        }
    }
}

impl Default for StdinPrompt<io::StdinLock<'static>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead> StdinPrompt<R> {
    /// Read answers from the given reader instead of stdin.
    pub const fn from_reader(reader: R) -> Self {
        Self { reader }
    }

    fn is_affirmative(input: &str) -> bool {
        let answer = input.trim();
        answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
    }
}

impl<R: BufRead> Confirmation for StdinPrompt<R> {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{}", format!("{message} (y/n): ").magenta());
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => {
                // End of input counts as no
                println!();
                false
            }
            Ok(_) => Self::is_affirmative(&input),
            Err(error) => {
                print_error!("Failed to read input: {error}");
                false
            }
        }
    }
}

impl TerminalReport {
    #[must_use]
    pub const fn new(verbose: bool, dryrun: bool) -> Self {
        Self { verbose, dryrun }
    }
}

impl ReportSink for TerminalReport {
    fn plans(&mut self, plans: &[RenamePlan]) {
        let max_items = plans.len();
        let max_chars = max_items.checked_ilog10().map_or(1, |d| d as usize + 1);
        for (index, plan) in plans.iter().enumerate() {
            let number = format!("{:>max_chars$} / {max_items}", index + 1);
            let heading = if self.dryrun {
                format!("Dryrun {number}:").bold().cyan()
            } else {
                format!("Rename {number}:").bold().magenta()
            };
            if plan.was_prenamed {
                println!("{heading} {}", "(re-dated)".dimmed());
            } else {
                println!("{heading}");
            }
            crate::show_diff(
                &crate::path_to_string_relative(&plan.source),
                &crate::path_to_string_relative(&plan.target),
            );
        }
    }

    fn stat_error(&mut self, path: &Path, error: &io::Error) {
        print_error!(
            "Failed to read modification time, skipping {}: {error}",
            crate::path_to_string_relative(path)
        );
    }

    fn conflict(&mut self, target: &Path, sources: &[&Path]) {
        print_warning!(
            "Skipping {} with the same new name: {}",
            files(sources.len()),
            crate::path_to_string_relative(target)
        );
        for source in sources {
            print_warning!("  {}", crate::path_to_string_relative(source));
        }
    }

    fn rename_error(&mut self, plan: &RenamePlan, error: &RenameError) {
        eprintln!(
            "{}",
            format!(
                "Error renaming: {}\n{error}",
                crate::path_to_string_relative(&plan.source)
            )
            .red()
        );
    }

    fn summary(&mut self, summary: &RunSummary) {
        if self.verbose && summary.unchanged > 0 {
            println!("{} already up to date", files(summary.unchanged));
        }
        if summary.conflicts > 0 {
            print_warning!("Skipped {} with conflicting names", files(summary.conflicts));
        }
        if !summary.stat_failed.is_empty() {
            print_warning!("Skipped {} that could not be read", files(summary.stat_failed.len()));
        }

        if summary.dryrun {
            println!("Dryrun: would have renamed {}", files(summary.planned));
        } else if summary.declined > 0 {
            println!("{}", format!("Cancelled, skipped {}", files(summary.declined)).yellow());
        } else if summary.planned == 0 {
            println!("No files to rename");
        } else if summary.applied > 0 {
            println!("{}", format!("Renamed {}", files(summary.applied)).green());
        }

        if summary.has_failures() {
            eprintln!("{}", format!("Failed to rename {}", files(summary.failed.len())).red());
        }
    }
}

/// Count with the correct plural of "file".
fn files(count: usize) -> String {
    format!("{count} {}", if count == 1 { "file" } else { "files" })
}
