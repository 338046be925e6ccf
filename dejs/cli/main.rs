// Copyright (C) 2024-2025 The dejs authors.
// This file is part of the dejs library.

// The dejs library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The dejs library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the dejs library. If not, see <https://www.gnu.org/licenses/>.

//! The command-line collaborator around the core pipeline: flag wiring,
//! file I/O, backups, and the process exit code. Exit code 0 covers
//! successful runs including no-op rewrites; anything non-zero is a fatal
//! parse or I/O failure.

use dejs_compiler::{Deobfuscator, DeobfuscatorOptions};
use dejs_errors::{CliError, Result};
use dejs_passes::CleanupMode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dejs", version, about = "Statically deobfuscate machine-generated helper calls")]
struct Cli {
    /// The source file to deobfuscate.
    input: PathBuf,

    /// Where to write the revised source; defaults to rewriting the input
    /// in place with a `.bak` backup.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Regular expression selecting helper routines by name.
    #[arg(long, default_value = r"^f(?:0x)?[\da-f]+$")]
    pattern: String,

    /// Regular expression further restricting which helpers are evaluated.
    #[arg(long)]
    filter: Option<String>,

    /// Smallest argument count a rewritable call may have.
    #[arg(long, default_value_t = 4)]
    min_args: usize,

    /// Largest argument count a rewritable call may have.
    #[arg(long, default_value_t = 6)]
    max_args: usize,

    /// Do not fold the reversed-string idiom before parsing.
    #[arg(long)]
    no_string_reverse: bool,

    /// Do not evaluate or rewrite helper calls.
    #[arg(long)]
    no_function_calls: bool,

    /// Evaluate helper calls but leave the source unchanged.
    #[arg(long)]
    disable_replace: bool,

    /// What to do with helpers that become dead after rewriting.
    #[arg(long, value_enum, default_value = "none")]
    cleanup: CleanupArg,

    /// Sandbox wall-clock budget in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Write a JSON call trace to this path.
    #[arg(long)]
    debug_output: Option<PathBuf>,

    /// Increase logging; `-v` for progress, `-vv` for pass internals.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log every driver line the evaluation harness assembles.
    #[arg(long)]
    trace_lines: bool,

    /// Skip the `.bak` backup when rewriting in place.
    #[arg(long)]
    no_backup: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupArg {
    None,
    Comment,
    Remove,
}

impl From<CleanupArg> for CleanupMode {
    fn from(arg: CleanupArg) -> Self {
        match arg {
            CleanupArg::None => CleanupMode::None,
            CleanupArg::Comment => CleanupMode::Comment,
            CleanupArg::Remove => CleanupMode::Remove,
        }
    }
}

impl Cli {
    fn options(&self) -> DeobfuscatorOptions {
        DeobfuscatorOptions {
            intercept_pattern: self.pattern.clone(),
            function_name_filter: self.filter.clone(),
            min_args: self.min_args,
            max_args: self.max_args,
            string_reverse: !self.no_string_reverse,
            function_calls: !self.no_function_calls,
            disable_replace: self.disable_replace,
            cleanup_mode: self.cleanup.into(),
            timeout: Duration::from_secs(self.timeout),
            verbose: self.verbose > 0,
            debug: self.verbose > 1,
            trace_lines: self.trace_lines,
            debug_output_path: self.debug_output.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = std::fs::read_to_string(&cli.input)
        .map_err(|error| CliError::FileRead { path: cli.input.clone(), error })?;

    let result = Deobfuscator::new(cli.options()).deobfuscate(&source)?;

    let destination = cli.output.clone().unwrap_or_else(|| cli.input.clone());
    if destination == cli.input && !cli.no_backup {
        let backup = backup_path(&cli.input);
        std::fs::copy(&cli.input, &backup).map_err(|error| CliError::Backup {
            path: cli.input.clone(),
            backup: backup.clone(),
            error,
        })?;
    }

    std::fs::write(&destination, &result.source)
        .map_err(|error| CliError::FileWrite { path: destination.clone(), error })?;

    let report = &result.report;
    eprintln!(
        "{} {} helpers, {} pure calls, {} evaluated, {} rewritten",
        "done:".green().bold(),
        report.helpers_found,
        report.calls_extracted,
        report.calls_evaluated,
        report.calls_rewritten,
    );
    Ok(())
}

/// The `.bak` sibling of an in-place rewrite target.
fn backup_path(input: &std::path::Path) -> PathBuf {
    let mut name = input.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".bak");
    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn in_place_rewrite_keeps_a_backup() {
        let dir = tempfile::tempdir().expect("a temp dir is available");
        let input = dir.path().join("bundle.js");
        std::fs::write(&input, "function f123(a,b,c,d){return a+b+c+d;}\nvar x = f123(1,2,3,4);\n")
            .expect("the input is writable");

        let cli = Cli::parse_from(["dejs", input.to_str().expect("utf-8 path"), "--pattern", r"^f\d+$"]);
        run(&cli).expect("the run succeeds");

        let rewritten = std::fs::read_to_string(&input).expect("the output is readable");
        assert!(rewritten.contains("var x = 10;"));
        let backup = std::fs::read_to_string(dir.path().join("bundle.js.bak"))
            .expect("the backup exists");
        assert!(backup.contains("f123(1,2,3,4)"));
    }

    #[test]
    fn explicit_output_leaves_the_input_alone() {
        let dir = tempfile::tempdir().expect("a temp dir is available");
        let input = dir.path().join("in.js");
        let output = dir.path().join("out.js");
        let source = "var s = \"dlrow olleh\".split(\"\").reverse().join(\"\");\n";
        std::fs::write(&input, source).expect("the input is writable");

        let cli = Cli::parse_from([
            "dejs",
            input.to_str().expect("utf-8 path"),
            "-o",
            output.to_str().expect("utf-8 path"),
        ]);
        run(&cli).expect("the run succeeds");

        assert_eq!(std::fs::read_to_string(&input).expect("input intact"), source);
        assert_eq!(
            std::fs::read_to_string(&output).expect("output written"),
            "var s = \"hello world\";\n"
        );
        assert!(!dir.path().join("in.js.bak").exists());
    }
}
