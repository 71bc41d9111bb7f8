//! # Generator Configuration
//!
//! This module defines the `.manifest-pipeline.yaml` configuration file and
//! the logic for loading and validating it. Every key is optional; anything
//! left out falls back to the values in [`crate::defaults`], which reproduce
//! the directory layout of the deployment repositories this tool targets.
//!
//! ```yaml
//! output: child-pipeline-gitlab-ci.yml
//! manifest_suffix: .yml
//! on_malformed: warn
//! directories:
//!   namespace: manifests/k8s-namespace-setup
//!   project: manifests/argocd-proj-workflow
//!   application: manifests/argocd-app-workflow
//! ```
//!
//! The directory prefixes are injected into the classifier and the templates
//! at startup, so each category can be exercised on its own in tests.

use crate::defaults;
use crate::error::{Error, Result};
use crate::template;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// What the driver does with a path that sits in a manifest directory but
/// cannot be turned into a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Skip the path without a word.
    Skip,
    /// Skip the path and log a warning.
    #[default]
    Warn,
    /// Abort generation with [`Error::MalformedPath`].
    Fail,
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MalformedPolicy::Skip => "skip",
            MalformedPolicy::Warn => "warn",
            MalformedPolicy::Fail => "fail",
        };
        f.write_str(name)
    }
}

/// Directory prefixes, one per resource category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Directories {
    /// Namespace manifests, one file per namespace.
    pub namespace: String,
    /// Argo CD project manifests, one file per project.
    pub project: String,
    /// Argo CD application manifests, `<project>/<application>.yml`.
    pub application: String,
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            namespace: defaults::NAMESPACE_DIRECTORY.to_string(),
            project: defaults::PROJECT_DIRECTORY.to_string(),
            application: defaults::APPLICATION_DIRECTORY.to_string(),
        }
    }
}

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File the pipeline is written to. The CLI resolves a relative path
    /// against the repository directory given with `--repo`.
    pub output: PathBuf,
    /// Suffix stripped from manifest file names.
    pub manifest_suffix: String,
    /// Policy for malformed manifest paths.
    pub on_malformed: MalformedPolicy,
    /// Category directory prefixes.
    pub directories: Directories,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(defaults::OUTPUT_FILENAME),
            manifest_suffix: defaults::MANIFEST_SUFFIX.to_string(),
            on_malformed: MalformedPolicy::default(),
            directories: Directories::default(),
        }
    }
}

impl Config {
    /// Normalize and check the configuration.
    ///
    /// Directory prefixes lose leading and trailing slashes. They must be
    /// non-empty, made of characters that are safe to substitute into the
    /// pipeline, and must neither repeat nor nest inside one another.
    pub fn validate(mut self) -> Result<Self> {
        let dirs = &mut self.directories;
        for (key, dir) in [
            ("namespace", &mut dirs.namespace),
            ("project", &mut dirs.project),
            ("application", &mut dirs.application),
        ] {
            let trimmed = dir.trim_matches('/').to_string();
            if trimmed.is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("directories.{key} is empty"),
                    hint: Some(format!(
                        "Remove the key to use the default directory or set a relative path like 'manifests/{key}'"
                    )),
                });
            }
            if !template::is_safe_value(&trimmed) || trimmed.split('/').any(str::is_empty) {
                return Err(Error::ConfigParse {
                    message: format!("directories.{key} has an invalid path: {trimmed:?}"),
                    hint: Some(
                        "Use a relative path made of letters, digits, '_', '-', '.' and '/'"
                            .to_string(),
                    ),
                });
            }
            *dir = trimmed;
        }

        let named = [
            ("namespace", self.directories.namespace.as_str()),
            ("project", self.directories.project.as_str()),
            ("application", self.directories.application.as_str()),
        ];
        for (i, (left_key, left)) in named.iter().enumerate() {
            for (right_key, right) in &named[i + 1..] {
                if segments_nest(left, right) {
                    return Err(Error::ConfigParse {
                        message: format!(
                            "directories.{left_key} ({left}) and directories.{right_key} ({right}) overlap"
                        ),
                        hint: Some("Give each category its own, non-nested directory".to_string()),
                    });
                }
            }
        }

        let extension_ok = self
            .manifest_suffix
            .strip_prefix('.')
            .is_some_and(template::is_safe_identifier);
        if !extension_ok {
            return Err(Error::ConfigParse {
                message: format!("manifest_suffix is invalid: {:?}", self.manifest_suffix),
                hint: Some("Use a file extension such as '.yml' or '.yaml'".to_string()),
            });
        }

        if self.output.as_os_str().is_empty() {
            return Err(Error::ConfigParse {
                message: "output is empty".to_string(),
                hint: Some(format!("The default is '{}'", defaults::OUTPUT_FILENAME)),
            });
        }

        Ok(self)
    }

    /// The manifest suffix without its leading dot (`yml` for `.yml`).
    pub fn manifest_extension(&self) -> &str {
        self.manifest_suffix
            .strip_prefix('.')
            .unwrap_or(&self.manifest_suffix)
    }
}

/// True when one prefix equals the other or contains it segment-wise.
fn segments_nest(a: &str, b: &str) -> bool {
    let a: Vec<&str> = a.split('/').collect();
    let b: Vec<&str> = b.split('/').collect();
    let shortest = a.len().min(b.len());
    a[..shortest] == b[..shortest]
}

/// Parse and validate a configuration from YAML text.
///
/// An empty document (or one holding only comments) yields the defaults.
pub fn parse(yaml_content: &str) -> Result<Config> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml_content)?;
    let config = if value.is_null() {
        Config::default()
    } else {
        serde_yaml::from_value(value).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: Some(
                "Known keys are output, manifest_suffix, on_malformed and directories".to_string(),
            ),
        })?
    };
    config.validate()
}

/// Load a configuration file. The file must exist.
pub fn from_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Load a configuration file, falling back to the defaults when it is absent.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        log::debug!("Loading configuration from {}", path.display());
        from_file(path)
    } else {
        log::debug!(
            "No configuration at {}, using defaults",
            path.display()
        );
        Config::default().validate()
    }
}
