use crate::core::{BuildReport, BuildRequest, BuildStage};
use crate::postbuild::PostBuildContext;
use crate::process::{LogSink, ProcessRunner};
use crate::ToolchainTarget;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info};

/// Generic GCC-family driver: compiles each source unit, links, and hands a
/// successful image to the target's post-build hook. Knows nothing about any
/// particular device; everything device-shaped comes in through the hooks.
pub struct GccDriver {
    runner: ProcessRunner,
    sink: Arc<dyn LogSink>,
}

impl GccDriver {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            runner: ProcessRunner::new(),
            sink,
        }
    }

    pub fn with_runner(runner: ProcessRunner, sink: Arc<dyn LogSink>) -> Self {
        Self { runner, sink }
    }

    /// One compile+link cycle. Tool failures come back as a failed
    /// [`BuildReport`], not as `Err`; post-processing runs only after a
    /// successful link.
    pub async fn build(
        &self,
        target: &dyn ToolchainTarget,
        request: &BuildRequest,
    ) -> Result<BuildReport> {
        let started = Instant::now();

        let fingerprint = target.source_fingerprint(&request.sources)?;
        let cflags = target.compiler_flags(request, &fingerprint);
        let ldflags = target.linker_flags(request);
        let compiler = target.compiler();
        let linker = target.linker();
        debug!("compiler flags: {:?}", cflags);
        debug!("linker flags: {:?}", ldflags);

        fs::create_dir_all(&request.build_dir)
            .await
            .with_context(|| format!("failed to create {}", request.build_dir.display()))?;

        // TODO: skip recompiling sources whose content is unchanged since the
        // previous build, the way the IDE-hosted builder does.
        let mut objects: Vec<String> = Vec::new();
        let mut taken = HashSet::new();
        for source in &request.sources {
            let object = object_path(&request.build_dir, source, &mut taken);
            self.sink.write_line(&format!(
                "   [CC]  {} -> {}",
                display_name(source),
                display_name(&object)
            ));

            let mut args = vec![
                "-c".to_string(),
                source.to_string_lossy().to_string(),
                "-o".to_string(),
                object.to_string_lossy().to_string(),
            ];
            args.extend(cflags.iter().cloned());

            match self.runner.run(&compiler, &args, self.sink.as_ref()).await {
                Ok(0) => objects.push(object.to_string_lossy().to_string()),
                Ok(code) => {
                    let error = format!(
                        "{} exited with status {} while compiling {}",
                        compiler,
                        code,
                        display_name(source)
                    );
                    return Ok(BuildReport::failed(
                        BuildStage::Compile,
                        error,
                        fingerprint,
                        elapsed_ms(started),
                    ));
                }
                Err(err) => {
                    self.sink.write_line(&err.to_string());
                    return Ok(BuildReport::failed(
                        BuildStage::Compile,
                        err.to_string(),
                        fingerprint,
                        elapsed_ms(started),
                    ));
                }
            }
        }

        self.sink
            .write_line(&format!("   [LD]  {}", display_name(&request.image_path)));

        let mut args = objects;
        args.push("-o".to_string());
        args.push(request.image_path.to_string_lossy().to_string());
        args.extend(ldflags.iter().cloned());

        match self.runner.run(&linker, &args, self.sink.as_ref()).await {
            Ok(0) => {}
            Ok(code) => {
                let error = format!("{} exited with status {}", linker, code);
                return Ok(BuildReport::failed(
                    BuildStage::Link,
                    error,
                    fingerprint,
                    elapsed_ms(started),
                ));
            }
            Err(err) => {
                self.sink.write_line(&err.to_string());
                return Ok(BuildReport::failed(
                    BuildStage::Link,
                    err.to_string(),
                    fingerprint,
                    elapsed_ms(started),
                ));
            }
        }

        target
            .post_build(PostBuildContext {
                image_path: &request.image_path,
                fingerprint: &fingerprint,
                runner: &self.runner,
                sink: self.sink.as_ref(),
            })
            .await
            .context("post-build artifact pipeline failed")?;

        let report = BuildReport::succeeded(&request.image_path, fingerprint, elapsed_ms(started));
        info!(
            "built {} in {} ms",
            display_name(&request.image_path),
            report.duration_ms
        );
        Ok(report)
    }
}

/// Object name for one unit. Sources in different directories may share a
/// stem, so a name already claimed by an earlier unit gets a numeric suffix.
fn object_path(build_dir: &Path, source: &Path, taken: &mut HashSet<String>) -> PathBuf {
    let stem = source.file_stem().and_then(|stem| stem.to_str()).unwrap_or("unit");
    let mut name = format!("{}.o", stem);
    let mut n = 1;
    while !taken.insert(name.clone()) {
        name = format!("{}_{}.o", stem, n);
        n += 1;
    }
    build_dir.join(name)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
