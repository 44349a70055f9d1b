use std::fmt;
use std::fs;

use anyhow::Context;
use chrono::format::{Item, StrftimeItems};
use chrono::{Local, TimeZone};
use serde::Deserialize;

pub const DEFAULT_PATTERN: &str = "*.*";
pub const DEFAULT_DATE_FORMAT: &str = "%Y.%m.%d";
pub const DEFAULT_DELIMITER: &str = "--";

/// Formatting and flow options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameConfig {
    pub date_format: String,
    pub delimiter: String,
    pub pad_delimiter: bool,
    pub titleize: bool,
    pub check_prenamed: bool,
    pub require_confirmation: bool,
    pub dryrun: bool,
    pub verbose: bool,
}

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
pub struct DaterConfig {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub pad_delimiter: Option<bool>,
    #[serde(default)]
    pub titleize: bool,
    #[serde(default)]
    pub check_prenamed: Option<bool>,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub dryrun: bool,
    #[serde(default)]
    pub verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    dater: DaterConfig,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            pad_delimiter: true,
            titleize: false,
            check_prenamed: true,
            require_confirmation: true,
            dryrun: false,
            verbose: false,
        }
    }
}

impl RenameConfig {
    /// Check that the config can produce valid file names.
    ///
    /// # Errors
    /// Returns an error if the date format contains unknown specifiers
    /// or renders a path separator.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_date_format(&self.date_format)?;
        if self.delimiter.chars().any(std::path::is_separator) {
            anyhow::bail!("Delimiter can not contain a path separator: '{}'", self.delimiter);
        }
        Ok(())
    }

    /// Delimiter as it is placed between the date and the title.
    #[must_use]
    pub fn effective_delimiter(&self) -> String {
        if self.pad_delimiter {
            format!(" {} ", self.delimiter)
        } else {
            self.delimiter.clone()
        }
    }
}

impl DaterConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = crate::config::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.dater)
            .context("Failed to parse dater config TOML")
    }
}

/// Reject formats chrono can not render, or that would create subdirectories.
fn validate_date_format(format: &str) -> anyhow::Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("Invalid date format: '{format}'");
    }
    let sample = Local
        .with_ymd_and_hms(2001, 2, 3, 4, 5, 6)
        .single()
        .context("Failed to create sample date")?;
    if sample.format(format).to_string().chars().any(std::path::is_separator) {
        anyhow::bail!("Date format can not produce a path separator: '{format}'");
    }
    Ok(())
}

impl fmt::Display for RenameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  date_format: \"{}\"", self.date_format)?;
        writeln!(f, "  delimiter: \"{}\"", self.effective_delimiter())?;
        writeln!(f, "  titleize: {}", crate::colorize_bool(self.titleize))?;
        writeln!(f, "  check_prenamed: {}", crate::colorize_bool(self.check_prenamed))?;
        writeln!(
            f,
            "  require_confirmation: {}",
            crate::colorize_bool(self.require_confirmation)
        )?;
        writeln!(f, "  dryrun: {}", crate::colorize_bool(self.dryrun))?;
        write!(f, "  verbose: {}", crate::colorize_bool(self.verbose))
    }
}


#[cfg(test)]
mod rename_config_tests {
    use super::*;

    #[test]
    fn default_values_are_correct() {
        let config = RenameConfig::default();
        assert_eq!(config.date_format, "%Y.%m.%d");
        assert_eq!(config.delimiter, "--");
        assert!(config.pad_delimiter);
        assert!(config.check_prenamed);
        assert!(config.require_confirmation);
        assert!(!config.titleize);
        assert!(!config.dryrun);
    }

    #[test]
    fn padded_delimiter_has_single_spaces() {
        let config = RenameConfig::default();
        assert_eq!(config.effective_delimiter(), " -- ");
    }

    #[test]
    fn unpadded_delimiter_is_literal() {
        let config = RenameConfig {
            pad_delimiter: false,
            ..Default::default()
        };
        assert_eq!(config.effective_delimiter(), "--");
    }

    #[test]
    fn validate_accepts_default_config() {
        assert!(RenameConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_accepts_custom_tokens() {
        let config = RenameConfig {
            date_format: "%y%m%d_%H%M".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_specifier() {
        let config = RenameConfig {
            date_format: "%Y.%Q".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_separator_in_format() {
        let config = RenameConfig {
            date_format: "%Y/%m/%d".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_separator_in_delimiter() {
        let config = RenameConfig {
            delimiter: "/".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
