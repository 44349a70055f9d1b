mod config;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use dater::date_rename::{BatchDriver, FileLister, FsMetadata, FsRenamer, GlobLister, StdinPrompt, TerminalReport};
use dater::print_warning;

use crate::config::Config;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Prefix file names with their modification date",
    disable_version_flag = true
)]
pub struct Args {
    /// Glob pattern for the files to rename [default: *.*]
    #[arg(short, long, value_name = "PATTERN")]
    pattern: Option<String>,

    /// Date format for the prefix [default: %Y.%m.%d]
    #[arg(long, value_name = "FORMAT", allow_hyphen_values = true)]
    format: Option<String>,

    /// Delimiter between the date and the name [default: --]
    #[arg(long, value_name = "DELIMITER", allow_hyphen_values = true)]
    delimiter: Option<String>,

    /// Do not surround the delimiter with spaces
    #[arg(long)]
    no_pad_delimiter: bool,

    /// Capitalize each word of the name
    #[arg(short, long)]
    titleize: bool,

    /// Do not replace an existing date prefix
    #[arg(long)]
    no_check_prenamed: bool,

    /// Rename without asking for confirmation
    #[arg(short = 'y', long)]
    force: bool,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: (),

    /// Also match files in subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Only print changes without renaming
    #[arg(short = 'n', long)]
    print: bool,

    /// Print verbose output
    #[arg(short = 'V', long)]
    verbose: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        return dater::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"));
    }

    let config = Config::from_args(args)?;
    if config.rename.verbose {
        println!("{config}");
    }

    let files = GlobLister.list(&config.pattern, config.recursive)?;
    if files.is_empty() {
        print_warning!("No files match pattern: {}", config.pattern);
        return Ok(());
    }

    let mut renamer = FsRenamer;
    let mut prompt = StdinPrompt::new();
    let mut report = TerminalReport::new(config.rename.verbose, config.rename.dryrun);
    let summary = BatchDriver::new(&config.rename, &FsMetadata, &mut renamer, &mut prompt, &mut report).run(&files);

    if summary.has_failures() {
        anyhow::bail!("Failed to rename {} of {} files", summary.failed.len(), summary.planned);
    }
    Ok(())
}

#[cfg(test)]
mod cli_args_tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["dater"]).expect("should parse");
        assert!(args.pattern.is_none());
        assert!(args.format.is_none());
        assert!(args.delimiter.is_none());
        assert!(!args.no_pad_delimiter);
        assert!(!args.titleize);
        assert!(!args.no_check_prenamed);
        assert!(!args.force);
        assert!(args.completion.is_none());
    }

    #[test]
    fn parses_short_flags() {
        let args = Args::try_parse_from(["dater", "-p", "*.jpg", "-t", "-y", "-r", "-n", "-V"]).expect("should parse");
        assert_eq!(args.pattern.as_deref(), Some("*.jpg"));
        assert!(args.titleize);
        assert!(args.force);
        assert!(args.recursive);
        assert!(args.print);
        assert!(args.verbose);
    }

    #[test]
    fn parses_long_options() {
        let args = Args::try_parse_from([
            "dater",
            "--pattern",
            "*.txt",
            "--format",
            "%y%m%d",
            "--delimiter",
            "_",
            "--no-pad-delimiter",
            "--no-check-prenamed",
        ])
        .expect("should parse");
        assert_eq!(args.pattern.as_deref(), Some("*.txt"));
        assert_eq!(args.format.as_deref(), Some("%y%m%d"));
        assert_eq!(args.delimiter.as_deref(), Some("_"));
        assert!(args.no_pad_delimiter);
        assert!(args.no_check_prenamed);
    }

    #[test]
    fn delimiter_may_start_with_hyphen() {
        let args = Args::try_parse_from(["dater", "--delimiter", "-"]).expect("should parse");
        assert_eq!(args.delimiter.as_deref(), Some("-"));
    }

    #[test]
    fn short_version_flag_displays_version() {
        let error = Args::try_parse_from(["dater", "-v"]).err().expect("should exit with version");
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn long_version_flag_displays_version() {
        let error = Args::try_parse_from(["dater", "--version"]).err().expect("should exit with version");
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn parses_completion_shell() {
        let args = Args::try_parse_from(["dater", "-l", "zsh"]).expect("should parse");
        assert_eq!(args.completion, Some(Shell::Zsh));
    }

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }
}
