//! Command-line surface: one positional input file, or `--test-all` to
//! compile every `.txt` program under a test directory, plus the flags
//! spec.md §6 lists.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ilc")]
#[command(author, version, about = "Compiler for the IL language", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Source file to compile.
    pub input: Option<PathBuf>,

    /// Compile every `*.txt` program under `tests/` instead of a single file.
    #[arg(long)]
    pub test_all: bool,

    /// Print phase-by-phase pipeline progress.
    #[arg(long)]
    pub debug: bool,

    /// Run the AST optimizer before code generation.
    #[arg(short = 'O', long)]
    pub optimize: bool,

    /// Print diagnostics and summary information verbosely.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit a textual visualization of the AST alongside the program.
    #[arg(short = 'V', long)]
    pub visualize: bool,
}

impl Cli {
    /// Validates the mutually-exclusive `<input-file>` / `--test-all` forms
    /// spec.md §6 describes; clap's derive can't express "exactly one of a
    /// positional and a flag" directly.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.input, self.test_all) {
            (Some(_), true) => Err("cannot pass an input file together with --test-all".to_string()),
            (None, false) => Err("expected an input file, or --test-all".to_string()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_file() {
        let cli = Cli::parse_from(["ilc", "program.txt"]);
        assert_eq!(cli.input, Some(PathBuf::from("program.txt")));
        assert!(!cli.test_all);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn parses_test_all() {
        let cli = Cli::parse_from(["ilc", "--test-all"]);
        assert!(cli.test_all);
        assert!(cli.input.is_none());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::parse_from(["ilc", "-O", "-v", "-V", "program.txt"]);
        assert!(cli.optimize);
        assert!(cli.verbose);
        assert!(cli.visualize);
    }

    #[test]
    fn rejects_file_and_test_all_together() {
        let cli = Cli::parse_from(["ilc", "--test-all", "program.txt"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn rejects_neither_file_nor_test_all() {
        let cli = Cli::parse_from(["ilc"]);
        assert!(cli.validate().is_err());
    }
}
