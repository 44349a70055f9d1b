//! Batch driver: scan, check, confirm once, then apply in order.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
#[cfg(not(test))]
use indicatif::ProgressStyle;
use rayon::prelude::*;

use crate::date_rename::{
    Confirmation, FileMetadata, RenameConfig, RenameError, RenamePlan, Renamer, ReportSink, compute_plan,
};

#[cfg(not(test))]
const PROGRESS_BAR_CHARS: &str = "=> ";
#[cfg(not(test))]
const PROGRESS_BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:80.cyan/blue} {pos}/{len} {percent}%";

/// Phase of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Scanning,
    AwaitingConfirmation,
    Applying,
    Done,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Plans left after the pre-flight checks.
    pub planned: usize,
    pub applied: usize,
    pub failed: Vec<(PathBuf, RenameError)>,
    /// Files dropped because their modification time could not be read.
    pub stat_failed: Vec<(PathBuf, io::Error)>,
    /// Plans dropped because another plan has the same target.
    pub conflicts: usize,
    /// Plans where the target already equals the source.
    pub unchanged: usize,
    /// Plans skipped because the user declined.
    pub declined: usize,
    pub dryrun: bool,
}

/// Runs one batch of renames through the given collaborators.
pub struct BatchDriver<'a> {
    config: &'a RenameConfig,
    metadata: &'a dyn FileMetadata,
    renamer: &'a mut dyn Renamer,
    prompt: &'a mut dyn Confirmation,
    sink: &'a mut dyn ReportSink,
    state: RunState,
}

impl RunSummary {
    /// Any rename failed during the apply phase.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl<'a> BatchDriver<'a> {
    #[must_use]
    pub fn new(
        config: &'a RenameConfig,
        metadata: &'a dyn FileMetadata,
        renamer: &'a mut dyn Renamer,
        prompt: &'a mut dyn Confirmation,
        sink: &'a mut dyn ReportSink,
    ) -> Self {
        Self {
            config,
            metadata,
            renamer,
            prompt,
            sink,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Plan every path, then rename them all after a single confirmation.
    ///
    /// No file is renamed before every plan has been computed and shown.
    /// Failures are collected per file and never abort the rest of the batch.
    pub fn run(&mut self, paths: &[PathBuf]) -> RunSummary {
        let mut summary = RunSummary {
            dryrun: self.config.dryrun,
            ..RunSummary::default()
        };

        self.state = RunState::Scanning;
        let plans = self.scan(paths, &mut summary);
        let plans = self.exclude_conflicts(plans, &mut summary);
        summary.planned = plans.len();

        if plans.is_empty() {
            return self.finish(summary);
        }

        self.sink.plans(&plans);

        if self.config.dryrun {
            return self.finish(summary);
        }

        if self.config.require_confirmation {
            self.state = RunState::AwaitingConfirmation;
            let message = format!(
                "Rename {} {}?",
                plans.len(),
                if plans.len() == 1 { "file" } else { "files" }
            );
            if !self.prompt.confirm(&message) {
                summary.declined = plans.len();
                return self.finish(summary);
            }
        }

        self.state = RunState::Applying;
        for plan in &plans {
            match self.renamer.rename(&plan.source, &plan.target) {
                Ok(()) => summary.applied += 1,
                Err(error) => {
                    self.sink.rename_error(plan, &error);
                    summary.failed.push((plan.source.clone(), error));
                }
            }
        }

        self.finish(summary)
    }

    /// Compute plans for all paths, keeping the input order.
    fn scan(&mut self, paths: &[PathBuf], summary: &mut RunSummary) -> Vec<RenamePlan> {
        let metadata = self.metadata;
        let config = self.config;
        let progress_bar = Self::create_progress_bar(paths.len() as u64);

        let results: Vec<Result<RenamePlan, (PathBuf, io::Error)>> = paths
            .par_iter()
            .map(|path| {
                let result = metadata
                    .modified_time(path)
                    .map(|modified| compute_plan(path, modified, config))
                    .map_err(|error| (path.clone(), error));
                progress_bar.inc(1);
                result
            })
            .collect();

        progress_bar.finish_and_clear();

        let mut plans = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(plan) if plan.is_unchanged() => summary.unchanged += 1,
                Ok(plan) => plans.push(plan),
                Err((path, error)) => {
                    self.sink.stat_error(&path, &error);
                    summary.stat_failed.push((path, error));
                }
            }
        }
        plans
    }

    /// Drop every plan whose target is shared with another plan.
    fn exclude_conflicts(&mut self, plans: Vec<RenamePlan>, summary: &mut RunSummary) -> Vec<RenamePlan> {
        let mut target_counts: HashMap<&Path, usize> = HashMap::new();
        for plan in &plans {
            *target_counts.entry(plan.target.as_path()).or_default() += 1;
        }

        let mut conflicting: HashSet<PathBuf> = HashSet::new();
        for plan in &plans {
            if target_counts[plan.target.as_path()] > 1 && conflicting.insert(plan.target.clone()) {
                let sources: Vec<&Path> = plans
                    .iter()
                    .filter(|other| other.target == plan.target)
                    .map(|other| other.source.as_path())
                    .collect();
                self.sink.conflict(&plan.target, &sources);
            }
        }

        if conflicting.is_empty() {
            return plans;
        }

        let (excluded, remaining): (Vec<_>, Vec<_>) =
            plans.into_iter().partition(|plan| conflicting.contains(&plan.target));
        summary.conflicts = excluded.len();
        remaining
    }

    fn finish(&mut self, summary: RunSummary) -> RunSummary {
        self.state = RunState::Done;
        self.sink.summary(&summary);
        summary
    }

    /// Create a progress bar that is hidden during tests.
    fn create_progress_bar(len: u64) -> ProgressBar {
        #[cfg(test)]
        {
            let _ = len;
            ProgressBar::hidden()
        }
        #[cfg(not(test))]
        {
            let progress_bar = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
                progress_bar.set_style(style.progress_chars(PROGRESS_BAR_CHARS));
            }
            progress_bar
        }
    }
}
