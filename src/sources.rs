use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every `.c` file under the project directory, sorted so the request order
/// and with it the fingerprint stay stable across filesystems.
pub fn collect_sources(project: &Path) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(project) {
        let entry = entry.with_context(|| format!("failed to scan {}", project.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().map_or(false, |ext| ext == "c")
        {
            sources.push(entry.into_path());
        }
    }
    sources.sort();
    Ok(sources)
}
