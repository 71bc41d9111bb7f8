//! # Path Classification
//!
//! Maps a changed file path onto the resource it describes, using the
//! directory prefixes from [`Config`]:
//!
//! | Directory     | Path shape                                 | Resource                         |
//! |---------------|--------------------------------------------|----------------------------------|
//! | `namespace`   | `<dir>/<name>.yml`                         | `Namespace { name }`             |
//! | `project`     | `<dir>/<name>.yml`                         | `Project { name }`               |
//! | `application` | `<dir>/<project>/<application>.yml`        | `Application { project, application }` |
//!
//! Prefixes are compared segment by segment, so `manifests/argocd-app-workflow-old`
//! is not inside `manifests/argocd-app-workflow`. The generated jobs address
//! manifests as `<dir>/<name>` and `<dir>/<project>/<application>`, so a file
//! nested any deeper is reported as [`MalformedReason::UnexpectedSubfolder`].
//!
//! The result is a tagged [`Classification`]; deciding what to do with
//! unmatched or malformed paths is left to the caller.

use crate::config::Config;
use crate::template::is_safe_identifier;
use std::fmt;

/// Resource category, as determined by directory convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Namespace,
    Project,
    Application,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Namespace,
        ResourceKind::Project,
        ResourceKind::Application,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Namespace => "namespace",
            ResourceKind::Project => "project",
            ResourceKind::Application => "application",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployable resource extracted from a manifest path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Namespace { name: String },
    Project { name: String },
    Application { project: String, application: String },
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Namespace { .. } => ResourceKind::Namespace,
            Resource::Project { .. } => ResourceKind::Project,
            Resource::Application { .. } => ResourceKind::Application,
        }
    }

    /// Identifiers in template order: one for namespaces and projects,
    /// `(project, application)` for applications.
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            Resource::Namespace { name } | Resource::Project { name } => vec![name.as_str()],
            Resource::Application {
                project,
                application,
            } => vec![project.as_str(), application.as_str()],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.identifiers().join("/"))
    }
}

/// Why a path inside a manifest directory could not become a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// An application manifest sits directly in the application directory.
    MissingSubfolder,
    /// The manifest sits in more folders than its category allows.
    UnexpectedSubfolder,
    /// The file does not end with the manifest suffix.
    NotAManifest { suffix: String },
    /// Nothing is left once the suffix is stripped.
    EmptyIdentifier,
    /// The identifier holds characters that would corrupt the pipeline.
    InvalidIdentifier { identifier: String },
    /// The rendered block would redefine a job an earlier path produced.
    /// Only the generator reports this; classification alone never does.
    DuplicateJob { job: String },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingSubfolder => {
                f.write_str("application manifest has no project folder")
            }
            MalformedReason::UnexpectedSubfolder => {
                f.write_str("manifest is nested deeper than its directory layout allows")
            }
            MalformedReason::NotAManifest { suffix } => {
                write!(f, "file name does not end with {suffix:?}")
            }
            MalformedReason::EmptyIdentifier => f.write_str("file name is empty once the suffix is stripped"),
            MalformedReason::InvalidIdentifier { identifier } => write!(
                f,
                "identifier {identifier:?} may only contain letters, digits, '_', '-' and '.'"
            ),
            MalformedReason::DuplicateJob { job } => {
                write!(f, "job {job} is already defined by an earlier manifest")
            }
        }
    }
}

/// Outcome of classifying one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Matched(Resource),
    Unmatched,
    Malformed(MalformedReason),
}

/// Classifies paths against the configured directory prefixes.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(ResourceKind, Vec<String>)>,
    suffix: String,
}

impl Classifier {
    pub fn new(config: &Config) -> Self {
        let dirs = &config.directories;
        let rules = ResourceKind::ALL
            .iter()
            .map(|kind| {
                let dir = match kind {
                    ResourceKind::Namespace => &dirs.namespace,
                    ResourceKind::Project => &dirs.project,
                    ResourceKind::Application => &dirs.application,
                };
                (*kind, split_segments(dir))
            })
            .collect();
        Self {
            rules,
            suffix: config.manifest_suffix.clone(),
        }
    }

    /// Classify a `/`-separated, repository-relative path.
    pub fn classify(&self, path: &str) -> Classification {
        let segments: Vec<String> = split_segments(path);

        for (kind, prefix) in &self.rules {
            if segments.len() <= prefix.len() || !segments.starts_with(prefix) {
                continue;
            }
            let rest = &segments[prefix.len()..];
            // `rest` is never empty here.
            let file = &rest[rest.len() - 1];
            return match self.identifier_from_file(file) {
                Err(reason) => Classification::Malformed(reason),
                Ok(name) => match kind {
                    ResourceKind::Application => application(rest, name),
                    _ if rest.len() > 1 => {
                        Classification::Malformed(MalformedReason::UnexpectedSubfolder)
                    }
                    ResourceKind::Namespace => Classification::Matched(Resource::Namespace { name }),
                    ResourceKind::Project => Classification::Matched(Resource::Project { name }),
                },
            };
        }

        Classification::Unmatched
    }

    fn identifier_from_file(&self, file: &str) -> Result<String, MalformedReason> {
        let stem = file
            .strip_suffix(self.suffix.as_str())
            .ok_or_else(|| MalformedReason::NotAManifest {
                suffix: self.suffix.clone(),
            })?;
        check_identifier(stem)
    }
}

fn application(rest: &[String], application: String) -> Classification {
    if rest.len() < 2 {
        return Classification::Malformed(MalformedReason::MissingSubfolder);
    }
    if rest.len() > 2 {
        return Classification::Malformed(MalformedReason::UnexpectedSubfolder);
    }
    match check_identifier(&rest[0]) {
        Ok(project) => Classification::Matched(Resource::Application {
            project,
            application,
        }),
        Err(reason) => Classification::Malformed(reason),
    }
}

fn check_identifier(identifier: &str) -> Result<String, MalformedReason> {
    if identifier.is_empty() {
        return Err(MalformedReason::EmptyIdentifier);
    }
    if !is_safe_identifier(identifier) {
        return Err(MalformedReason::InvalidIdentifier {
            identifier: identifier.to_string(),
        });
    }
    Ok(identifier.to_string())
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
