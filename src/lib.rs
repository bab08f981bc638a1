pub mod core;
pub mod driver;
pub mod fingerprint;
pub mod flags;
pub mod postbuild;
pub mod process;
pub mod profile;
pub mod sources;

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub use crate::core::{ArtifactPolicy, BuildReport, BuildRequest, BuildStage};
pub use crate::driver::GccDriver;
pub use crate::postbuild::PostBuildContext;
pub use crate::process::{LogSink, MemorySink, ProcessError, ProcessRunner, TracingSink};
pub use crate::profile::{BoardProfile, InstallLayout};
pub use crate::sources::collect_sources;

/// Hook interface the build driver calls back into. A target supplies tool
/// names, flag lists, the source fingerprint, and the post-build artifact
/// pipeline; the driver owns the compile/link sequence itself.
#[async_trait]
pub trait ToolchainTarget: Send + Sync {
    fn compiler(&self) -> String;
    fn linker(&self) -> String;
    fn compiler_flags(&self, request: &BuildRequest, fingerprint: &str) -> Vec<String>;
    fn linker_flags(&self, request: &BuildRequest) -> Vec<String>;
    fn source_fingerprint(&self, sources: &[PathBuf]) -> Result<String>;
    async fn post_build(&self, ctx: PostBuildContext<'_>) -> Result<()>;
}
