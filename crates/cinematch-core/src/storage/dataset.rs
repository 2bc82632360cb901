use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::EnrichedRecord;

/// Load a previously generated dataset. An empty document is an empty dataset.
pub fn load_dataset(path: &Path) -> Result<Vec<EnrichedRecord>> {
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Option<Vec<EnrichedRecord>> = serde_yaml::from_str(&contents)?;
    Ok(records.unwrap_or_default())
}

/// Write records as a YAML sequence, in the given order.
pub fn save_dataset(path: &Path, records: &[EnrichedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(records)?;
    fs::write(path, yaml)?;
    Ok(())
}

/// `movies.yml` → `movies.yml_incremental.yml`, next to the output file.
pub fn incremental_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.yml".to_string());
    output.with_file_name(format!("{name}_incremental.yml"))
}
