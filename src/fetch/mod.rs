// src/fetch/mod.rs
//
// The portal dataset is downloaded by an external tool into a directory
// tree whose exact layout we don't control; this module only resolves that
// tree to the events CSV.
use anyhow::{anyhow, Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Locate the transfer-portal events CSV under a downloaded dataset root.
/// Scans `**/*.csv`, keeps files whose name contains `portal`
/// (case-insensitive), and returns the lexicographically first match.
pub fn find_portal_csv(dataset_root: &Path) -> Result<PathBuf> {
    let pattern = format!("{}/**/*.csv", dataset_root.display());

    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in glob(&pattern).context("invalid glob pattern for find_portal_csv")? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("cannot read glob entry: {:?}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|f| f.to_str()) {
            Some(n) => n.to_lowercase(),
            None => continue,
        };
        if name.contains("portal") {
            candidates.push(path);
        }
    }

    candidates.sort();
    match candidates.into_iter().next() {
        Some(path) => {
            info!(path = %path.display(), "resolved portal CSV");
            Ok(path)
        }
        None => Err(anyhow!(
            "no portal CSV found under {}",
            dataset_root.display()
        )),
    }
}
