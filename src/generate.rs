//! # Pipeline Generation
//!
//! The driver: one pass over the changed files of a commit. The preamble is
//! written first, then every path is classified and, when it names a
//! resource, the matching job block is appended. Paths keep their diff order.
//!
//! - `Unmatched` paths are skipped (logged at debug level).
//! - `Malformed` paths follow the [`MalformedPolicy`]: skipped, skipped with
//!   a warning, or turned into [`Error::MalformedPath`].
//! - A block that would redefine a job already in the document (a namespace
//!   and a project of the same name both own `dev-deploy-<name>`) is
//!   [`MalformedReason::DuplicateJob`] and follows the same policy. The first
//!   path in diff order keeps the job.
//!
//! [`write_pipeline`] renders the complete document in memory before the
//! output file is touched, so a failing run leaves the previous file intact.

use crate::changes::{ChangeSource, ChangedFile};
use crate::classify::{Classification, Classifier, MalformedReason, ResourceKind};
use crate::config::{Config, MalformedPolicy};
use crate::error::{Error, Result};
use crate::pipeline::{self, PipelineRenderer};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

/// A path that was left out of the pipeline, with the reason why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: String,
    pub reason: String,
}

/// What a generation run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub namespaces: usize,
    pub projects: usize,
    pub applications: usize,
    /// Paths outside every manifest directory.
    pub unmatched: Vec<String>,
    /// Paths inside a manifest directory that could not be used.
    pub malformed: Vec<SkippedPath>,
}

impl GenerationReport {
    /// Number of job blocks written.
    pub fn resources(&self) -> usize {
        self.namespaces + self.projects + self.applications
    }

    fn count(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Namespace => self.namespaces += 1,
            ResourceKind::Project => self.projects += 1,
            ResourceKind::Application => self.applications += 1,
        }
    }
}

/// Classifies changed files and writes the pipeline for them.
#[derive(Debug, Clone)]
pub struct Generator {
    classifier: Classifier,
    renderer: PipelineRenderer,
    policy: MalformedPolicy,
}

impl Generator {
    /// Build a generator using the configuration's malformed-path policy.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            classifier: Classifier::new(config),
            renderer: PipelineRenderer::new(config)?,
            policy: config.on_malformed,
        })
    }

    /// Override the malformed-path policy.
    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write the preamble and one job block per resource to `out`.
    pub fn generate<W: Write>(&self, files: &[ChangedFile], out: &mut W) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        let preamble = self.renderer.preamble()?;
        let mut jobs: HashSet<String> = pipeline::job_names(&preamble)
            .into_iter()
            .map(str::to_string)
            .collect();
        out.write_all(preamble.as_bytes())?;

        for file in files {
            match self.classifier.classify(&file.path) {
                Classification::Matched(resource) => {
                    let block = self.renderer.render(&resource)?;
                    let names = pipeline::job_names(&block);
                    if let Some(job) = names.iter().find(|name| jobs.contains(**name)) {
                        let reason = MalformedReason::DuplicateJob {
                            job: job.to_string(),
                        };
                        self.reject(&mut report, file, reason)?;
                        continue;
                    }
                    jobs.extend(names.into_iter().map(str::to_string));

                    info!("{} ({}): {}", file.path, file.status, resource);
                    out.write_all(block.as_bytes())?;
                    report.count(resource.kind());
                }
                Classification::Unmatched => {
                    debug!("{}: outside the manifest directories, skipped", file.path);
                    report.unmatched.push(file.path.clone());
                }
                Classification::Malformed(reason) => self.reject(&mut report, file, reason)?,
            }
        }

        Ok(report)
    }

    /// Apply the malformed-path policy to `file`.
    fn reject(
        &self,
        report: &mut GenerationReport,
        file: &ChangedFile,
        reason: MalformedReason,
    ) -> Result<()> {
        match self.policy {
            MalformedPolicy::Fail => {
                return Err(Error::MalformedPath {
                    path: file.path.clone(),
                    reason: reason.to_string(),
                })
            }
            MalformedPolicy::Warn => warn!("{}: {}, skipped", file.path, reason),
            MalformedPolicy::Skip => debug!("{}: {}, skipped", file.path, reason),
        }
        report.malformed.push(SkippedPath {
            path: file.path.clone(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    /// Like [`Generator::generate`], collecting the output into a string.
    pub fn render_to_string(&self, files: &[ChangedFile]) -> Result<(String, GenerationReport)> {
        let mut buffer = Vec::new();
        let report = self.generate(files, &mut buffer)?;
        // Only `str` data is written, so the conversion never replaces anything.
        let text = String::from_utf8_lossy(&buffer).into_owned();
        Ok((text, report))
    }
}

/// List the changes from `source` and (over)write the pipeline at `output`.
pub fn write_pipeline(
    source: &dyn ChangeSource,
    generator: &Generator,
    output: &Path,
) -> Result<GenerationReport> {
    let files = source.changed_files()?;
    let (text, report) = generator.render_to_string(&files)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, text)?;

    info!(
        "Wrote {} job block(s) to {}",
        report.resources(),
        output.display()
    );
    Ok(report)
}
