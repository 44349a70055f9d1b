pub mod config;
pub mod date_rename;

use std::cmp::Ordering;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::{ColoredString, Colorize};
use difference::{Changeset, Difference};

/// Format bool value as a coloured string.
#[must_use]
pub fn colorize_bool(value: bool) -> ColoredString {
    if value { "true".green() } else { "false".red() }
}

/// Check if entry is a hidden file or directory (starts with '.')
#[must_use]
pub fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().first() == Some(&b'.')
}

/// Convert `OsStr` to String with invalid Unicode handling.
#[must_use]
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str().map_or_else(
        || name.to_string_lossy().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to string with invalid Unicode handling.
#[must_use]
pub fn path_to_string(path: &Path) -> String {
    path.to_str().map_or_else(
        || path.to_string_lossy().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert the given path to be relative to the current working directory.
/// Returns the original path if the relative path cannot be created.
#[must_use]
pub fn get_relative_path_from_current_working_directory(path: &Path) -> PathBuf {
    env::current_dir().map_or_else(
        |_| path.to_path_buf(),
        |current_dir| path.strip_prefix(&current_dir).unwrap_or(path).to_path_buf(),
    )
}

/// Get relative path and convert to string with invalid unicode handling.
#[must_use]
pub fn path_to_string_relative(path: &Path) -> String {
    path_to_string(&get_relative_path_from_current_working_directory(path))
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

/// Create a coloured diff for the given names.
///
/// With `stacked`, the shorter side is padded so the first longer common run lines up.
/// For a date prefix this shifts the old name right under the unchanged title:
///
/// ```text
///               report.txt
/// 2024.03.05 -- report.txt
/// ```
#[must_use]
pub fn color_diff(old: &str, new: &str, stacked: bool) -> (String, String) {
    let changeset = Changeset::new(old, new, "");
    let mut old_diff = String::new();
    let mut new_diff = String::new();

    if stacked {
        let anchor = changeset.diffs.iter().find_map(|diff| match diff {
            Difference::Same(x) if x.chars().count() >= 3 && !x.chars().all(char::is_whitespace) => {
                Some((old.find(x.as_str())?, new.find(x.as_str())?))
            }
            _ => None,
        });
        if let Some((old_index, new_index)) = anchor {
            let old_offset = old[..old_index].chars().count();
            let new_offset = new[..new_index].chars().count();
            match old_offset.cmp(&new_offset) {
                Ordering::Greater => new_diff = " ".repeat(old_offset - new_offset),
                Ordering::Less => old_diff = " ".repeat(new_offset - old_offset),
                Ordering::Equal => {}
            }
        }
    }

    for diff in changeset.diffs {
        match diff {
            Difference::Same(ref x) => {
                old_diff.push_str(x);
                new_diff.push_str(x);
            }
            Difference::Add(ref x) => {
                if x.chars().all(char::is_whitespace) {
                    new_diff.push_str(&x.on_green().to_string());
                } else {
                    new_diff.push_str(&x.green().to_string());
                }
            }
            Difference::Rem(ref x) => {
                if x.chars().all(char::is_whitespace) {
                    old_diff.push_str(&x.on_red().to_string());
                } else {
                    old_diff.push_str(&x.red().to_string());
                }
            }
        }
    }

    (old_diff, new_diff)
}

/// Print a stacked diff of the changes.
pub fn show_diff(old: &str, new: &str) {
    let (old_diff, new_diff) = color_diff(old, new, true);
    println!("{old_diff}");
    if old_diff != new_diff {
        println!("{new_diff}");
    }
}

/// Generate a shell completion script for the given shell.
///
/// With `install`, the script is written to the user's completion directory,
/// otherwise it is printed to stdout.
pub fn generate_shell_completion(shell: Shell, mut command: Command, install: bool, command_name: &str) -> Result<()> {
    if install {
        let out_dir = get_shell_completion_dir(shell, command_name)?;
        let path = clap_complete::generate_to(shell, &mut command, command_name, out_dir)?;
        println!("Completion file generated to: {}", path.display());
    } else {
        clap_complete::generate(shell, &mut command, command_name, &mut std::io::stdout());
    }
    Ok(())
}

/// Determine the directory for storing shell completions.
///
/// Uses the user-specific directory, creating it if needed.
/// Oh-my-zsh gets a custom plugin directory that has to be enabled in `.zshrc`.
fn get_shell_completion_dir(shell: Shell, name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;

    if shell == Shell::Zsh {
        let omz_plugins = home.join(".oh-my-zsh/custom/plugins");
        if omz_plugins.exists() {
            let plugin_dir = omz_plugins.join(name);
            std::fs::create_dir_all(&plugin_dir)?;
            return Ok(plugin_dir);
        }
    }

    let user_dir = match shell {
        Shell::PowerShell => {
            if cfg!(windows) {
                home.join(r"Documents\PowerShell\completions")
            } else {
                home.join(".config/powershell/completions")
            }
        }
        Shell::Bash => home.join(".bash_completion.d"),
        Shell::Elvish => home.join(".elvish"),
        Shell::Fish => home.join(".config/fish/completions"),
        Shell::Zsh => home.join(".zsh/completions"),
        _ => anyhow::bail!("Unsupported shell"),
    };

    std::fs::create_dir_all(&user_dir)
        .with_context(|| format!("Failed to create completion directory {}", user_dir.display()))?;
    Ok(user_dir)
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;
    use walkdir::WalkDir;

    fn find_entry(root: &Path, name: &str) -> walkdir::DirEntry {
        WalkDir::new(root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .find(|e| e.file_name().to_string_lossy().eq(name))
            .unwrap()
    }

    #[test]
    fn test_is_hidden_file() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join("visible.txt")).unwrap();

        assert!(is_hidden(&find_entry(dir.path(), ".hidden")));
        assert!(!is_hidden(&find_entry(dir.path(), "visible.txt")));
    }

    #[test]
    fn test_path_to_string_keeps_separators() {
        let path = Path::new("photos").join("2024.03.05 -- beach.jpg");
        let string = path_to_string(&path);
        assert!(string.starts_with("photos"));
        assert!(string.ends_with("2024.03.05 -- beach.jpg"));
    }

    #[test]
    fn test_relative_path_outside_cwd_is_unchanged() {
        let path = Path::new("/definitely/not/under/cwd.txt");
        assert_eq!(get_relative_path_from_current_working_directory(path), path);
    }

    #[test]
    fn test_color_diff_plain_text_is_preserved() {
        colored::control::set_override(false);
        let (old, new) = color_diff("report.txt", "2024.03.05 -- report.txt", false);
        assert_eq!(old, "report.txt");
        assert_eq!(new, "2024.03.05 -- report.txt");
    }

    #[test]
    fn test_color_diff_stacked_aligns_title() {
        colored::control::set_override(false);
        let (old, new) = color_diff("report.txt", "2024.03.05 -- report.txt", true);
        assert_eq!(old.len(), new.len());
        assert!(old.trim_start().starts_with("report"));
    }
}
