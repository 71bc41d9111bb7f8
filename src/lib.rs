//! # Manifest Pipeline Library
//!
//! This library turns the manifests touched by a git commit into a GitLab
//! child pipeline. It is used by the `manifest-pipeline` command-line tool,
//! but every step is available on its own.
//!
//! ## Quick Example
//!
//! ```
//! use manifest_pipeline::changes::{ChangeStatus, ChangedFile};
//! use manifest_pipeline::config::Config;
//! use manifest_pipeline::generate::Generator;
//!
//! let generator = Generator::new(&Config::default()).unwrap();
//! let files = vec![ChangedFile::new(
//!     "manifests/argocd-app-workflow/teamA/serviceX.yml",
//!     ChangeStatus::Added,
//! )];
//!
//! let (pipeline, report) = generator.render_to_string(&files).unwrap();
//! assert!(pipeline.contains("dev-deploy-serviceX-teamA:"));
//! assert_eq!(report.applications, 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: directory prefixes per resource category,
//!   the manifest suffix, the output file and the malformed-path policy.
//! - **Change listing (`changes`)**: the files changed by a commit, read with
//!   `git2`.
//! - **Classification (`classify`)**: maps a path to a namespace, project or
//!   application resource, or reports it as unmatched or malformed.
//! - **Templates (`template`, `pipeline`)**: `{{placeholder}}` templates for
//!   the preamble and the per-resource job blocks.
//! - **Generation (`generate`)**: the single pass that ties it together.
//!
//! ## Execution Flow
//!
//! 1.  **List**: diff the commit against its parent (or the empty tree).
//! 2.  **Classify**: match each path against the configured directories.
//! 3.  **Render**: write the preamble, then one job block per resource.
//! 4.  **Write**: replace the output file with the rendered pipeline.

pub mod changes;
pub mod classify;
pub mod config;
pub mod defaults;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod suggestions;
pub mod template;

#[cfg(test)]
mod classify_proptest;
