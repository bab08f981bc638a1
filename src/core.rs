use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStage {
    Compile,
    Link,
}

/// What to do when objcopy or the size reporter fails after a good link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactPolicy {
    /// Log the failure and keep going; the build outcome is unchanged.
    BestEffort,
    /// Abort the pipeline on the first post-processing failure.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRequest {
    pub sources: Vec<PathBuf>,
    pub build_dir: PathBuf,
    pub image_path: PathBuf,
    pub cflags: Vec<String>,
    pub ldflags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub success: bool,
    pub image_path: Option<String>,
    pub failed_stage: Option<BuildStage>,
    pub error_output: Option<String>,
    pub fingerprint: String,
    pub duration_ms: u64,
}

impl BuildReport {
    pub fn succeeded(image_path: &std::path::Path, fingerprint: String, duration_ms: u64) -> Self {
        Self {
            success: true,
            image_path: Some(image_path.to_string_lossy().to_string()),
            failed_stage: None,
            error_output: None,
            fingerprint,
            duration_ms,
        }
    }

    pub fn failed(stage: BuildStage, error: String, fingerprint: String, duration_ms: u64) -> Self {
        Self {
            success: false,
            image_path: None,
            failed_stage: Some(stage),
            error_output: Some(error),
            fingerprint,
            duration_ms,
        }
    }
}
