//! Pure name transformation from a source path to its dated target path.

use std::ffi::{OsStr, OsString};
use std::fmt::Write as _;
use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::date_rename::config::DEFAULT_DATE_FORMAT;
#[cfg(unix)]
use crate::date_rename::prenamed::strip_date_prefix_bytes;
use crate::date_rename::{RenameConfig, strip_date_prefix};

/// Computed, not yet applied, rename of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source: PathBuf,
    pub target: PathBuf,
    /// Source name already had a date prefix, which was replaced.
    pub was_prenamed: bool,
}

impl RenamePlan {
    /// Target and source are the same path.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.source == self.target
    }
}

/// Compute the dated target path for a file.
///
/// Never touches the filesystem and never fails:
/// names without an extension, directory or title still produce a plan.
/// File names that are not valid Unicode keep their original bytes in the title and extension.
#[must_use]
pub fn compute_plan(path: &Path, modified: DateTime<Local>, config: &RenameConfig) -> RenamePlan {
    let (directory, last_segment) = match path.file_name() {
        Some(name) => (path.parent().unwrap_or_else(|| Path::new("")), name),
        None => (path, OsStr::new("")),
    };

    let renamed = match last_segment.to_str() {
        Some(name) => {
            let (new_name, was_prenamed) = dated_name(name, modified, config);
            Some((OsString::from(new_name), was_prenamed))
        }
        None => dated_raw_name(last_segment, modified, config),
    };

    // Names that can not be represented are left as they are
    let Some((new_name, was_prenamed)) = renamed else {
        return RenamePlan {
            source: path.to_path_buf(),
            target: path.to_path_buf(),
            was_prenamed: false,
        };
    };

    let target = if directory.as_os_str().is_empty() {
        PathBuf::from(new_name)
    } else {
        directory.join(new_name)
    };

    RenamePlan {
        source: path.to_path_buf(),
        target,
        was_prenamed,
    }
}

/// New file name for a Unicode name.
fn dated_name(last_segment: &str, modified: DateTime<Local>, config: &RenameConfig) -> (String, bool) {
    let (base_name, extension) = split_extension(last_segment);

    let (title, was_prenamed) = if config.check_prenamed {
        strip_date_prefix(base_name).map_or((base_name, false), |title| (title, true))
    } else {
        (base_name, false)
    };

    let title = if config.titleize {
        titleize(title)
    } else {
        title.to_string()
    };

    let mut new_name = format!(
        "{}{}{title}",
        render_date(modified, &config.date_format),
        config.effective_delimiter()
    );
    if let Some(extension) = extension {
        new_name.push('.');
        new_name.push_str(extension);
    }
    (new_name, was_prenamed)
}

/// New file name for a name with invalid Unicode, working on the raw bytes.
#[cfg(unix)]
fn dated_raw_name(last_segment: &OsStr, modified: DateTime<Local>, config: &RenameConfig) -> Option<(OsString, bool)> {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let bytes = last_segment.as_bytes();
    let (base_name, extension) = bytes
        .iter()
        .rposition(|&byte| byte == b'.')
        .map_or((bytes, None), |dot| (&bytes[..dot], Some(&bytes[dot + 1..])));

    let (title, was_prenamed) = if config.check_prenamed {
        strip_date_prefix_bytes(base_name).map_or((base_name, false), |title| (title, true))
    } else {
        (base_name, false)
    };

    let mut new_name =
        format!("{}{}", render_date(modified, &config.date_format), config.effective_delimiter()).into_bytes();
    if config.titleize {
        for chunk in title.utf8_chunks() {
            new_name.extend_from_slice(titleize(chunk.valid()).as_bytes());
            new_name.extend_from_slice(chunk.invalid());
        }
    } else {
        new_name.extend_from_slice(title);
    }
    if let Some(extension) = extension {
        new_name.push(b'.');
        new_name.extend_from_slice(extension);
    }
    Some((OsString::from_vec(new_name), was_prenamed))
}

#[cfg(not(unix))]
const fn dated_raw_name(
    _last_segment: &OsStr,
    _modified: DateTime<Local>,
    _config: &RenameConfig,
) -> Option<(OsString, bool)> {
    None
}

/// Split a file name at the final dot into base name and extension.
///
/// The extension is `None` only when there is no dot at all,
/// so a trailing dot survives as `Some("")` and the renamed file keeps it:
/// `notes.` becomes `2024.03.05 -- notes.`, not `2024.03.05 -- notes`.
///
/// ```rust
/// use dater::date_rename::split_extension;
///
/// assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", Some("gz")));
/// assert_eq!(split_extension("notes"), ("notes", None));
/// ```
#[must_use]
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    file_name
        .rsplit_once('.')
        .map_or((file_name, None), |(base, extension)| (base, Some(extension)))
}

/// Render the modification time with the given chrono format.
///
/// Falls back to the default format if the given one can not be rendered.
#[must_use]
pub fn render_date(modified: DateTime<Local>, format: &str) -> String {
    let mut rendered = String::new();
    if write!(rendered, "{}", modified.format(format)).is_err() {
        return modified.format(DEFAULT_DATE_FORMAT).to_string();
    }
    rendered
}

/// Capitalize the first letter of each word and lowercase the rest.
///
/// Words are runs of alphanumeric characters, everything between them is kept as is.
///
/// ```rust
/// use dater::date_rename::titleize;
///
/// assert_eq!(titleize("my_old_file"), "My_Old_File");
/// assert_eq!(titleize("the lord of the RINGS"), "The Lord Of The Rings");
/// ```
#[must_use]
pub fn titleize(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut end_of_previous = 0;
    for word in word_ranges(title) {
        result.push_str(&title[end_of_previous..word.start]);
        // Each word goes through titlecase on its own so small words are not left lowercase
        result.push_str(&titlecase::titlecase(&title[word.clone()].to_lowercase()));
        end_of_previous = word.end;
    }
    result.push_str(&title[end_of_previous..]);
    result
}

/// Byte ranges of the alphanumeric words in the given string.
fn word_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start: Option<usize> = None;
    for (index, character) in text.char_indices() {
        match (character.is_alphanumeric(), start) {
            (true, None) => start = Some(index),
            (false, Some(word_start)) => {
                ranges.push(word_start..index);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(word_start) = start {
        ranges.push(word_start..text.len());
    }
    ranges
}
