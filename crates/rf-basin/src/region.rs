//! Region discovery under the rapid-io root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BasinError, BasinResult};

/// File every region's input directory must carry before the solver can run.
pub const WEIGHT_TABLE_FILE: &str = "weight_table.csv";

/// One independently routed sub-basin and its directory namespace.
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    /// Static inputs, weight table and rolling initial-condition files.
    pub input_dir: PathBuf,
    /// Destination for solver output artifacts; created on demand.
    pub output_dir: PathBuf,
}

impl Region {
    pub fn weight_table(&self) -> PathBuf {
        self.input_dir.join(WEIGHT_TABLE_FILE)
    }

    /// Check the static inputs a solver run depends on.
    pub fn validate(&self) -> BasinResult<()> {
        let weights = self.weight_table();
        if !weights.is_file() {
            return Err(BasinError::MissingWeightTable { path: weights });
        }
        Ok(())
    }

    pub fn ensure_output_dir(&self) -> BasinResult<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

/// List the regions under `<io_root>/input/`, sorted by name.
///
/// Every sub-directory is a region; its output namespace is the same name
/// under `<io_root>/output/`. An empty input tree is a setup mistake and
/// fails rather than yielding a vacuous cycle.
pub fn discover_regions(io_root: &Path) -> BasinResult<Vec<Region>> {
    let input_root = io_root.join("input");
    if !input_root.is_dir() {
        return Err(BasinError::NotADirectory { path: input_root });
    }
    let output_root = io_root.join("output");

    let mut regions = Vec::new();
    for entry in fs::read_dir(&input_root)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        regions.push(Region {
            input_dir: entry.path(),
            output_dir: output_root.join(&name),
            name,
        });
    }
    if regions.is_empty() {
        return Err(BasinError::NoRegions { path: input_root });
    }
    regions.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(regions)
}
