//! # swiftcat
//!
//! A CLI tool that gathers every Swift source of a project into one text
//! file, with the Xcode-style file headers removed.
//!
//! ## Usage
//!
//! ```bash
//! # Combine the current directory into combined_swift_no_headers.txt
//! swiftcat
//!
//! # Pick the root and output file
//! swiftcat --root MyApp --out build/all_sources.txt
//!
//! # Skip more directories (repeatable, globs allowed)
//! swiftcat --exclude Generated --exclude "Fixtures*"
//!
//! # Plain concatenation without per-file separators
//! swiftcat --no-separators
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::Style;
use swiftcatlib::{combine_sources, CombineOptions, ExcludeSet, DEFAULT_OUTPUT};
use tracing::Level;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("swiftcat")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Collect all .swift files into one file, without their top-of-file headers")
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .default_value(".")
                .help("Project root to walk"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .default_value(DEFAULT_OUTPUT)
                .help("Path of the combined output file"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude directories by name (can be specified multiple times)"),
        )
        .arg(
            Arg::new("no-separators")
                .long("no-separators")
                .action(ArgAction::SetTrue)
                .help("Do not write a separator line with each file's path"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log pruned directories and stripped headers"),
        )
}

/// Build exclusion set from matches
fn build_excludes(matches: &ArgMatches) -> Result<ExcludeSet, anyhow::Error> {
    let mut excludes = ExcludeSet::new();

    if let Some(names) = matches.get_many::<String>("exclude") {
        for name in names {
            excludes = excludes.exclude(name)?;
        }
    }

    Ok(excludes)
}

/// Build combine options from matches
fn build_options(matches: &ArgMatches) -> Result<CombineOptions, anyhow::Error> {
    let root = matches
        .get_one::<String>("root")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let out = matches
        .get_one::<String>("out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    Ok(CombineOptions::new()
        .root(root)
        .output(out)
        .exclude(build_excludes(matches)?)
        .separators(!matches.get_flag("no-separators")))
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let options = build_options(matches)?;
    let result = combine_sources(&options)
        .with_context(|| format!("failed to combine sources under {}", options.root.display()))?;

    tracing::info!(
        files = result.files,
        headers_stripped = result.headers_stripped,
        lossy = result.lossy_files,
        "combined sources"
    );
    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Done:"),
        result.output.display()
    );

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
