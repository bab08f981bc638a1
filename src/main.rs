use anyhow::{anyhow, Result};
use clap::Parser;
use plc_builder::{
    collect_sources, ArtifactPolicy, BoardProfile, BuildRequest, GccDriver, InstallLayout,
    ProcessRunner, TracingSink,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Cross-builds a PLC application image for an STM32F4 controller board.
#[derive(Parser)]
#[command(name = "plc-builder", version)]
struct Args {
    /// Project directory holding the generated C sources
    project: PathBuf,

    /// Board to build for
    #[arg(long, default_value = "plc411")]
    target: String,

    /// Installation root containing RTE/src; defaults to the home checkout
    #[arg(long)]
    install_root: Option<PathBuf>,

    /// Where objects and the image go (default: <project>/build)
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Extra compiler flag, repeatable
    #[arg(long = "cflag")]
    cflags: Vec<String>,

    /// Extra linker flag, repeatable
    #[arg(long = "ldflag")]
    ldflags: Vec<String>,

    /// Fail the pipeline when objcopy or the size reporter fails
    #[arg(long)]
    strict_artifacts: bool,

    /// Kill any tool still running after this many seconds
    #[arg(long)]
    tool_timeout: Option<u64>,

    /// Print the build report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let layout = InstallLayout::discover(args.install_root.as_deref())?;
    let mut profile = BoardProfile::from_name(&args.target, &layout)
        .ok_or_else(|| anyhow!("unknown target board: {}", args.target))?;
    if args.strict_artifacts {
        profile.artifact_policy = ArtifactPolicy::Strict;
    }

    let sources = collect_sources(&args.project)?;
    if sources.is_empty() {
        return Err(anyhow!("no .c sources under {}", args.project.display()));
    }

    let project_name = args
        .project
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("plc_app")
        .to_string();
    let build_dir = args
        .build_dir
        .clone()
        .unwrap_or_else(|| args.project.join("build"));
    let image_path = build_dir.join(format!("{}.elf", project_name));

    let request = BuildRequest {
        sources,
        build_dir,
        image_path,
        cflags: args.cflags.clone(),
        ldflags: args.ldflags.clone(),
    };

    let runner = match args.tool_timeout {
        Some(seconds) => ProcessRunner::with_timeout(Duration::from_secs(seconds)),
        None => ProcessRunner::new(),
    };
    let driver = GccDriver::with_runner(runner, Arc::new(TracingSink));

    info!("building {} for {}", args.project.display(), profile.name);
    let report = driver.build(&profile, &request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if !report.success {
        error!(
            "build failed: {}",
            report.error_output.as_deref().unwrap_or("unknown error")
        );
        std::process::exit(1);
    }

    Ok(())
}
