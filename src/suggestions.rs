//! # Error Suggestions
//!
//! Errors the CLI shows to people, each with hints on how to fix the
//! problem. The library errors say what went wrong; these add what to do
//! about it.
//!
//! ```rust,ignore
//! use manifest_pipeline::suggestions;
//!
//! return Err(suggestions::config_not_found(path));
//! ```

use crate::error::Error;
use std::path::Path;

/// An explicitly requested configuration file does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Omit -c/--config to use the built-in directory layout\n\
         hint: Create {default} in the repository root to customise it",
        path = path.display(),
        default = crate::defaults::CONFIG_FILENAME,
    )
}

/// Changes could not be read from the repository.
pub fn repository_unreadable(repo: &Path, revision: &str, error: Error) -> anyhow::Error {
    anyhow::anyhow!(
        "Could not read the changes of {revision} in {repo}\n\
         error: {error}\n\n\
         hint: Run inside the deployment repository or pass --repo <DIR>\n\
         hint: Check that {revision} names an existing commit (git rev-parse {revision})",
        repo = repo.display(),
    )
}

/// A manifest path was malformed and the policy is `fail`.
pub fn malformed_path(path: &str, reason: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Malformed manifest path: {path}\n\
         reason: {reason}\n\n\
         hint: Move the file to the expected location or rename it\n\
         hint: Use --on-malformed warn to skip such paths instead"
    )
}
