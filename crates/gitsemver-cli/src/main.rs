//! git-semver: print a semantic version for the current commit.
//!
//! Runs `git describe` and turns each line of its output into a version:
//! - `1.2.3` exactly on tag `v1.2.3`
//! - `1.2.4-dev.5+gabc1234` five commits past it
//! - `0.0.0+abc1234` when no tag matches
//!
//! Installed on the PATH it doubles as the git subcommand `git semver`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gitsemver::{
    config::Config,
    format,
    git::{self, DescribeOptions},
    manifest, Format, Version, FALLBACK_VERSION,
};

/// Exit codes for the CLI
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 2;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Semver,
    Cmake,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Semver => Format::Semver,
            OutputFormat::Cmake => Format::Cmake,
            OutputFormat::Json => Format::Json,
        }
    }
}

/// Retrieve semantic versioning from git tags
#[derive(Parser)]
#[command(name = "git-semver")]
#[command(author, version = env!("GIT_SEMVER_VERSION"), about, long_about = None)]
struct Cli {
    /// Commit-ish object names to describe (defaults to HEAD)
    commitish: Vec<String>,

    /// Output format (default: semver, or `format` from .git-semver.toml)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Repository directory
    #[arg(short = 'C', long, default_value = ".")]
    root: PathBuf,

    /// Debug the search strategy on stderr
    #[arg(long)]
    debug: bool,

    /// Use any tag, even unannotated
    #[arg(long)]
    tags: bool,

    /// Only follow the first parent
    #[arg(long)]
    first_parent: bool,

    /// Use <N> digits to display object names
    #[arg(long, value_name = "N")]
    abbrev: Option<u32>,

    /// Only consider tags matching <PATTERN> (default: v*)
    #[arg(long = "match", value_name = "PATTERN")]
    matches: Vec<String>,

    /// Do not consider tags matching <PATTERN>
    #[arg(long = "exclude", value_name = "PATTERN")]
    excludes: Vec<String>,

    /// Write the first version into this Cargo.toml's package version
    #[arg(long, value_name = "MANIFEST")]
    stamp: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags layered over the configuration file.
    fn describe_options(&self, config: &Config) -> DescribeOptions {
        let base = config.describe_options();
        DescribeOptions {
            debug: self.debug,
            tags: self.tags || base.tags,
            first_parent: self.first_parent || base.first_parent,
            abbrev: self.abbrev.or(base.abbrev),
            matches: if self.matches.is_empty() {
                base.matches
            } else {
                self.matches.clone()
            },
            excludes: if self.excludes.is_empty() {
                base.excludes
            } else {
                self.excludes.clone()
            },
            commitish: self.commitish.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for versions
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let json_errors = cli.format == Some(OutputFormat::Json);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            if json_errors {
                let error_json = serde_json::json!({
                    "error": "CommandFailed",
                    "message": format!("{:#}", e),
                });
                eprintln!("{}", error_json);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    if !cli.root.is_dir() {
        anyhow::bail!("Repository directory does not exist: {}", cli.root.display());
    }

    let config = Config::load(&cli.root);
    let output = cli.format.map(Format::from).unwrap_or(config.format);

    if !git::is_git_repo(&cli.root)? {
        tracing::warn!(
            "{} is not a git repository, using {}",
            cli.root.display(),
            FALLBACK_VERSION
        );
        return print_fallback(cli, output);
    }

    // A fresh repository has nothing for git describe to name
    if cli.commitish.is_empty() && !git::has_commits(&cli.root)? {
        tracing::warn!(
            "{} has no commits yet, using {}",
            cli.root.display(),
            FALLBACK_VERSION
        );
        return print_fallback(cli, output);
    }

    let build_metadata = config
        .build_metadata()
        .context("Invalid `build` in configuration")?;

    let versions: Vec<_> = git::versions(&cli.describe_options(&config), &cli.root)?
        .into_iter()
        .map(|v| v.with_build_metadata(build_metadata.clone()))
        .collect();

    for version in &versions {
        println!("{}", output.render(version));
    }

    if let Some(path) = &cli.stamp {
        let first = versions
            .first()
            .context("git describe produced no output")?;
        manifest::stamp_manifest(path, &format::semver(first))?;
    }

    Ok(exit_codes::SUCCESS)
}

/// Print (and optionally stamp) the version used when git has nothing to describe.
fn print_fallback(cli: &Cli, output: Format) -> Result<u8> {
    let version: Version = FALLBACK_VERSION.parse()?;
    println!("{}", output.render(&version));
    if let Some(path) = &cli.stamp {
        manifest::stamp_manifest(path, &format::semver(&version))?;
    }
    Ok(exit_codes::SUCCESS)
}
