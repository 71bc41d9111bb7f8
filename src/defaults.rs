//! Default values for manifest-pipeline configuration.
//!
//! These match the directory layout of the deployment repositories the
//! generator was written for, and are used whenever the configuration file
//! leaves a key out.

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILENAME: &str = ".manifest-pipeline.yaml";

/// File the generated child pipeline is written to.
pub const OUTPUT_FILENAME: &str = "child-pipeline-gitlab-ci.yml";

/// Suffix stripped from manifest file names to obtain identifiers.
pub const MANIFEST_SUFFIX: &str = ".yml";

/// Directory holding one Kubernetes namespace manifest per file.
pub const NAMESPACE_DIRECTORY: &str = "manifests/k8s-namespace-setup";

/// Directory holding one Argo CD AppProject manifest per file.
pub const PROJECT_DIRECTORY: &str = "manifests/argocd-proj-workflow";

/// Directory holding Argo CD Application manifests, grouped by project folder.
pub const APPLICATION_DIRECTORY: &str = "manifests/argocd-app-workflow";

/// Revision whose changes are turned into jobs.
pub const REVISION: &str = "HEAD";
