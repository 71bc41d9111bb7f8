//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a git repository fixture and a few helpers so the
//! test files can focus on behaviour.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let repo = TestRepo::new();
//!     repo.commit(&[("manifests/k8s-namespace-setup/payments.yml", "kind: Namespace")]);
//!     repo.command().arg("generate").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use git2::{Repository, Signature};
use std::fs;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{configs, manifests, preamble};
    pub use super::TestRepo;
}

/// Manifest paths in the default directory layout.
#[allow(dead_code)]
pub mod manifests {
    pub const NAMESPACE: &str = "manifests/k8s-namespace-setup/payments.yml";
    pub const PROJECT: &str = "manifests/argocd-proj-workflow/teamA.yml";
    pub const APPLICATION: &str = "manifests/argocd-app-workflow/teamA/serviceX.yml";
    /// Application manifest without a project folder.
    pub const APPLICATION_NO_FOLDER: &str = "manifests/argocd-app-workflow/serviceX.yml";
    pub const UNRELATED: &str = "docs/README.md";
}

/// Configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Custom directory layout with `.yaml` manifests.
    pub const CUSTOM_LAYOUT: &str = r#"
output: ci/generated.yml
manifest_suffix: .yaml
directories:
  namespace: deploy/namespaces
  project: deploy/projects
  application: deploy/apps
"#;

    /// Fail on malformed paths.
    pub const STRICT: &str = "on_malformed: fail\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "directories: [unclosed";
}

/// The preamble rendered with the default configuration.
#[allow(dead_code)]
pub fn preamble() -> String {
    let config = manifest_pipeline::config::Config::default();
    manifest_pipeline::pipeline::PipelineRenderer::new(&config)
        .expect("built-in templates parse")
        .preamble()
        .expect("preamble renders")
}

/// A temporary git repository.
///
/// # Example
///
/// ```rust,ignore
/// let repo = TestRepo::new();
/// repo.commit(&[(manifests::NAMESPACE, "kind: Namespace")]);
///
/// let mut cmd = repo.command();
/// cmd.arg("generate").assert().success();
/// ```
pub struct TestRepo {
    temp_dir: assert_fs::TempDir,
    repo: Repository,
}

#[allow(dead_code)]
impl TestRepo {
    /// Create an empty repository in a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let repo = Repository::init(temp_dir.path()).expect("Failed to init repository");
        Self { temp_dir, repo }
    }

    /// Write `files` and commit them on top of HEAD.
    pub fn commit(&self, files: &[(&str, &str)]) -> &Self {
        let mut index = self.repo.index().expect("Failed to open index");
        for (path, content) in files {
            self.temp_dir
                .child(path)
                .write_str(content)
                .expect("Failed to write file");
            index.add_path(Path::new(path)).expect("Failed to stage file");
        }
        self.finish_commit(&mut index);
        self
    }

    /// Delete `paths` and commit the deletion on top of HEAD.
    pub fn delete(&self, paths: &[&str]) -> &Self {
        let mut index = self.repo.index().expect("Failed to open index");
        for path in paths {
            fs::remove_file(self.path().join(path)).expect("Failed to delete file");
            index
                .remove_path(Path::new(path))
                .expect("Failed to unstage file");
        }
        self.finish_commit(&mut index);
        self
    }

    fn finish_commit(&self, index: &mut git2::Index) {
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let sig = Signature::now("Test", "test@example.com").expect("Failed to build signature");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, "test commit", &tree, &parents)
            .expect("Failed to commit");
    }

    /// Add an uncommitted `.manifest-pipeline.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".manifest-pipeline.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Get the path to the repository work tree.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file from the work tree.
    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a child path in the work tree.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in the work tree, with colours and
    /// environment configuration switched off.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("manifest-pipeline");
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("MANIFEST_PIPELINE_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_commits_files() {
        let repo = TestRepo::new();
        repo.commit(&[(manifests::NAMESPACE, "kind: Namespace")]);
        assert!(repo.path().join(manifests::NAMESPACE).exists());
        assert!(repo.repo.head().is_ok());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [configs::CUSTOM_LAYOUT, configs::STRICT] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
        assert!(serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML).is_err());
    }
}
