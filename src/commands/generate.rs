//! # Generate Command Implementation
//!
//! Implements the `generate` subcommand: read the files changed by a commit,
//! classify them and write the child pipeline.
//!
//! ## Functionality
//!
//! - **Change listing**: diffs `--rev` (default `HEAD`) against its parent.
//! - **Configuration**: `--config`, or `.manifest-pipeline.yaml` in the
//!   repository directory, or the built-in directory layout.
//! - **Output**: the configured file (resolved against `--repo`), the file
//!   given with `--output` (resolved against the working directory), or
//!   stdout with `--stdout`. Either way the pipeline is rendered in full
//!   before anything is written.
//! - **Malformed paths**: `--on-malformed` overrides the configured policy.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use manifest_pipeline::changes::{ChangeSource, GitChangeSource};
use manifest_pipeline::config::MalformedPolicy;
use manifest_pipeline::defaults;
use manifest_pipeline::error::Error;
use manifest_pipeline::generate::{self, GenerationReport, Generator};
use manifest_pipeline::output::{marker, Marker, OutputConfig};
use manifest_pipeline::suggestions;

/// What to do with paths inside a manifest directory that cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MalformedArg {
    /// Skip silently
    Skip,
    /// Skip and log a warning
    Warn,
    /// Abort without writing the pipeline
    Fail,
}

impl From<MalformedArg> for MalformedPolicy {
    fn from(arg: MalformedArg) -> Self {
        match arg {
            MalformedArg::Skip => MalformedPolicy::Skip,
            MalformedArg::Warn => MalformedPolicy::Warn,
            MalformedArg::Fail => MalformedPolicy::Fail,
        }
    }
}

/// Write the child pipeline for the manifests changed by the latest commit
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory inside the repository to read the commit from.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Revision whose changes are turned into jobs.
    #[arg(long, value_name = "REV", default_value = defaults::REVISION)]
    pub rev: String,

    /// Path to the configuration file.
    ///
    /// Defaults to .manifest-pipeline.yaml in the repository directory when
    /// that file exists.
    #[arg(short, long, value_name = "FILE", env = "MANIFEST_PIPELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the pipeline to this file instead of the configured one.
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the pipeline to stdout instead of writing a file.
    #[arg(long)]
    pub stdout: bool,

    /// Policy for malformed manifest paths (overrides the configuration).
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_malformed: Option<MalformedArg>,
}

/// Execute the `generate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: GenerateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config = super::load_config(args.config.as_deref(), &args.repo)?;

    let mut generator = Generator::new(&config)?;
    if let Some(policy) = args.on_malformed {
        generator = generator.with_policy(policy.into());
    }
    let source = GitChangeSource::new(&args.repo, args.rev.as_str());

    if args.stdout {
        let files = source
            .changed_files()
            .map_err(|e| explain(e, &args.repo, &args.rev))?;
        // Render first: a failing run must not leave half a pipeline on stdout.
        let (text, _) = generator
            .render_to_string(&files)
            .map_err(|e| explain(e, &args.repo, &args.rev))?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.repo.join(&config.output));
    let report = generate::write_pipeline(&source, &generator, &output)
        .map_err(|e| explain(e, &args.repo, &args.rev))?;

    print_summary(&out, &report, &output);
    Ok(())
}

/// Attach hints to the library errors people can act on.
fn explain(error: Error, repo: &Path, rev: &str) -> anyhow::Error {
    match error {
        Error::Git { .. } => suggestions::repository_unreadable(repo, rev, error),
        Error::MalformedPath { path, reason } => suggestions::malformed_path(&path, &reason),
        other => anyhow::Error::new(other),
    }
}

fn print_summary(out: &OutputConfig, report: &GenerationReport, output: &Path) {
    println!(
        "{} Wrote {}: {} namespace(s), {} project(s), {} application(s)",
        marker(out, Marker::Ok),
        output.display(),
        report.namespaces,
        report.projects,
        report.applications
    );
    for skipped in &report.malformed {
        println!(
            "{} {}: {}",
            marker(out, Marker::Warn),
            skipped.path,
            skipped.reason
        );
    }
    if !report.unmatched.is_empty() {
        println!(
            "{} {} changed path(s) outside the manifest directories",
            marker(out, Marker::Skip),
            report.unmatched.len()
        );
    }
}
