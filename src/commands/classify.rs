//! # Classify Command Implementation
//!
//! Implements the `classify` subcommand, a read-only view of what `generate`
//! would do with each path. Paths can be given on the command line; without
//! them the files changed by `--rev` are classified.
//!
//! With `--json` the result is printed as a JSON array, one object per path.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use manifest_pipeline::changes::{ChangeSource, GitChangeSource};
use manifest_pipeline::classify::{Classification, Classifier};
use manifest_pipeline::defaults;
use manifest_pipeline::output::{marker, Marker, OutputConfig};
use manifest_pipeline::suggestions;

/// Show how paths are classified into namespaces, projects and applications
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Paths to classify. Without any, the files changed by --rev are used.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Directory inside the repository to read the commit from.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Revision whose changes are classified when no paths are given.
    #[arg(long, value_name = "REV", default_value = defaults::REVISION)]
    pub rev: String,

    /// Path to the configuration file.
    #[arg(short, long, value_name = "FILE", env = "MANIFEST_PIPELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One classified path, as printed with `--json`.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct ClassifiedPath {
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    identifiers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ClassifiedPath {
    fn new(path: String, classification: Classification) -> Self {
        match classification {
            Classification::Matched(resource) => Self {
                status: "matched",
                kind: Some(resource.kind().as_str()),
                identifiers: resource.identifiers().iter().map(|s| s.to_string()).collect(),
                reason: None,
                path,
            },
            Classification::Unmatched => Self {
                status: "unmatched",
                kind: None,
                identifiers: Vec::new(),
                reason: None,
                path,
            },
            Classification::Malformed(reason) => Self {
                status: "malformed",
                kind: None,
                identifiers: Vec::new(),
                reason: Some(reason.to_string()),
                path,
            },
        }
    }
}

/// Execute the `classify` command.
pub fn execute(args: ClassifyArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config = super::load_config(args.config.as_deref(), &args.repo)?;
    let classifier = Classifier::new(&config);

    let paths = if args.paths.is_empty() {
        GitChangeSource::new(&args.repo, args.rev.as_str())
            .changed_files()
            .map_err(|e| suggestions::repository_unreadable(&args.repo, &args.rev, e))?
            .into_iter()
            .map(|file| file.path)
            .collect()
    } else {
        args.paths
    };

    let classified: Vec<ClassifiedPath> = paths
        .into_iter()
        .map(|path| {
            let classification = classifier.classify(&path);
            ClassifiedPath::new(path, classification)
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classified)?);
        return Ok(());
    }

    for entry in &classified {
        let (status, detail) = match entry.status {
            "matched" => (
                Marker::Ok,
                format!(
                    "{} {}",
                    entry.kind.unwrap_or_default(),
                    entry.identifiers.join("/")
                ),
            ),
            "malformed" => (
                Marker::Warn,
                format!("malformed: {}", entry.reason.as_deref().unwrap_or_default()),
            ),
            _ => (Marker::Skip, "unmatched".to_string()),
        };
        println!("{} {} -> {}", marker(&out, status), entry.path, detail);
    }
    Ok(())
}
