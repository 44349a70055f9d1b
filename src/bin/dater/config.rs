use std::fmt;

use dater::date_rename::{DEFAULT_DATE_FORMAT, DEFAULT_DELIMITER, DEFAULT_PATTERN, DaterConfig, RenameConfig};

use crate::Args;

/// Final config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) pattern: String,
    pub(crate) recursive: bool,
    pub(crate) rename: RenameConfig,
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed,
    /// or if the resulting date format or delimiter is invalid.
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let user_config = DaterConfig::get_user_config()?;
        Self::from_args_and_user_config(args, user_config)
    }

    /// Combine args and user config, args taking precedence.
    fn from_args_and_user_config(args: Args, user_config: DaterConfig) -> anyhow::Result<Self> {
        let rename = RenameConfig {
            date_format: args
                .format
                .or(user_config.format)
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            delimiter: args
                .delimiter
                .or(user_config.delimiter)
                .unwrap_or_else(|| DEFAULT_DELIMITER.to_string()),
            pad_delimiter: !args.no_pad_delimiter && user_config.pad_delimiter.unwrap_or(true),
            titleize: args.titleize || user_config.titleize,
            check_prenamed: !args.no_check_prenamed && user_config.check_prenamed.unwrap_or(true),
            require_confirmation: !(args.force || user_config.force),
            dryrun: args.print || user_config.dryrun,
            verbose: args.verbose || user_config.verbose,
        };
        rename.validate()?;

        Ok(Self {
            pattern: args
                .pattern
                .or(user_config.pattern)
                .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            recursive: args.recursive || user_config.recursive,
            rename,
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.rename)?;
        writeln!(f, "  pattern: \"{}\"", self.pattern)?;
        write!(f, "  recursive: {}", dater::colorize_bool(self.recursive))
    }
}
