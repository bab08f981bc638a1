use crate::core::ArtifactPolicy;
use crate::process::{LogSink, ProcessRunner};
use crate::profile::BoardProfile;
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::warn;

/// Everything the post-build hook needs from the driver.
pub struct PostBuildContext<'a> {
    pub image_path: &'a Path,
    pub fingerprint: &'a str,
    pub runner: &'a ProcessRunner,
    pub sink: &'a dyn LogSink,
}

/// Turns the linked image into flashable artifacts and reports its size:
/// objcopy to Intel hex, objcopy to raw binary (both at the profile's load
/// address), then the size tool, finishing with the fingerprint trailer.
pub async fn run_artifact_pipeline(
    profile: &BoardProfile,
    ctx: PostBuildContext<'_>,
) -> Result<()> {
    let image = ctx.image_path.to_string_lossy().to_string();
    let image_name = ctx
        .image_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("image path has no file name"))?;

    ctx.sink
        .write_line(&format!("   [OBJCOPY]  {} -> {}.hex", image_name, image_name));
    objcopy(profile, &ctx, &image, "ihex", "hex").await?;

    ctx.sink
        .write_line(&format!("   [OBJCOPY]  {} -> {}.bin", image_name, image_name));
    objcopy(profile, &ctx, &image, "binary", "bin").await?;

    ctx.sink.write_line("Output size:");
    run_tool(profile, &ctx, &profile.tool("size"), vec![image]).await?;

    ctx.sink.write_line("md5:");
    ctx.sink.write_line(&format!("   {}", ctx.fingerprint));

    Ok(())
}

async fn objcopy(
    profile: &BoardProfile,
    ctx: &PostBuildContext<'_>,
    image: &str,
    format: &str,
    extension: &str,
) -> Result<()> {
    let args = vec![
        "--change-address".to_string(),
        profile.load_addr.clone(),
        "-O".to_string(),
        format.to_string(),
        image.to_string(),
        format!("{}.{}", image, extension),
    ];
    run_tool(profile, ctx, &profile.tool("objcopy"), args).await
}

async fn run_tool(
    profile: &BoardProfile,
    ctx: &PostBuildContext<'_>,
    program: &str,
    args: Vec<String>,
) -> Result<()> {
    match ctx.runner.run(program, &args, ctx.sink).await {
        Ok(0) => Ok(()),
        Ok(code) => match profile.artifact_policy {
            ArtifactPolicy::BestEffort => {
                warn!("{} exited with status {}", program, code);
                Ok(())
            }
            ArtifactPolicy::Strict => Err(anyhow!("{} exited with status {}", program, code)),
        },
        Err(err) => match profile.artifact_policy {
            ArtifactPolicy::BestEffort => {
                ctx.sink.write_line(&err.to_string());
                warn!("{}", err);
                Ok(())
            }
            ArtifactPolicy::Strict => Err(err.into()),
        },
    }
}
