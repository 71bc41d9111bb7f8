//! # CLI Command Implementations
//!
//! One module per subcommand of `manifest-pipeline`. Each module holds an
//! `Args` struct derived with `clap` and an `execute` function that calls
//! into the `manifest_pipeline` library and prints the result.

pub mod classify;
pub mod completions;
pub mod generate;

use anyhow::Result;
use std::path::Path;

use manifest_pipeline::config::{self, Config};
use manifest_pipeline::defaults;
use manifest_pipeline::suggestions;

/// Load the configuration for a command.
///
/// An explicit `--config` file must exist. Without one, the default file in
/// the repository directory is used when present, the built-in layout
/// otherwise.
pub fn load_config(explicit: Option<&Path>, repo: &Path) -> Result<Config> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(suggestions::config_not_found(path));
            }
            config::from_file(path).map_err(|e| {
                anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e)
            })
        }
        None => {
            let path = repo.join(defaults::CONFIG_FILENAME);
            config::load_or_default(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e)
            })
        }
    }
}
