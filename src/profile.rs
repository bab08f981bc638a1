use crate::core::{ArtifactPolicy, BuildRequest};
use crate::postbuild::{self, PostBuildContext};
use crate::{fingerprint, flags, ToolchainTarget};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct InstallLayout {
    pub base_dir: PathBuf,
    pub runtime_src_dir: PathBuf,
}

impl InstallLayout {
    /// Strategy one is the conventional checkout (`<root>/RTE/src`); strategy
    /// two is the home checkout (`<home>/YAPLC/RTE/src`, skipped on Windows).
    pub fn resolve(root: Option<&Path>, home: Option<&Path>) -> Result<Self> {
        if let Some(root) = root {
            let runtime_src_dir = root.join("RTE").join("src");
            if runtime_src_dir.is_dir() {
                return Ok(Self {
                    base_dir: root.to_path_buf(),
                    runtime_src_dir,
                });
            }
        }

        if !cfg!(windows) {
            if let Some(home) = home {
                let base_dir = home.join("YAPLC");
                let runtime_src_dir = base_dir.join("RTE").join("src");
                if runtime_src_dir.is_dir() {
                    return Ok(Self {
                        base_dir,
                        runtime_src_dir,
                    });
                }
            }
        }

        Err(anyhow!(
            "runtime source tree not found; pass an install root that contains RTE/src"
        ))
    }

    pub fn discover(explicit_root: Option<&Path>) -> Result<Self> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::resolve(explicit_root, home.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct BoardProfile {
    pub name: String,
    pub family: String,
    /// Application slot address, kept as the literal string objcopy receives.
    pub load_addr: String,
    /// Resident runtime's ABI table address, emitted as `PLC_RTE_ADDR`.
    pub runtime_addr: u32,
    pub base_flags: Vec<String>,
    pub toolchain_prefix: String,
    pub linker_script: PathBuf,
    pub include_dirs: Vec<PathBuf>,
    pub runtime_src_dir: PathBuf,
    pub artifact_policy: ArtifactPolicy,
}

impl BoardProfile {
    /// Family skeleton; board constructors fill in addresses and paths.
    pub fn stm32f4(name: &str, layout: &InstallLayout) -> Self {
        Self {
            name: name.to_string(),
            family: "STM32F4".to_string(),
            load_addr: "0".to_string(),
            runtime_addr: 0,
            base_flags: [
                "-mthumb",
                "-mcpu=cortex-m4",
                "-g3",
                "-mfloat-abi=hard",
                "-mfpu=fpv4-sp-d16",
            ]
            .iter()
            .map(|flag| flag.to_string())
            .collect(),
            toolchain_prefix: toolchain_prefix(layout),
            linker_script: PathBuf::new(),
            include_dirs: Vec::new(),
            runtime_src_dir: layout.runtime_src_dir.clone(),
            artifact_policy: ArtifactPolicy::BestEffort,
        }
    }

    pub fn plc411(layout: &InstallLayout) -> Self {
        let bsp_dir = layout.runtime_src_dir.join("bsp").join("plc411");
        let mut profile = Self::stm32f4("plc411", layout);
        profile.load_addr = "0x08040000".to_string();
        profile.runtime_addr = 0x0800_0184;
        profile.linker_script = bsp_dir.join("stm32f4xx-app.ld");
        profile.include_dirs = vec![bsp_dir];
        profile
    }

    pub fn from_name(name: &str, layout: &InstallLayout) -> Option<Self> {
        match name {
            "plc411" => Some(Self::plc411(layout)),
            _ => None,
        }
    }

    pub fn tool(&self, name: &str) -> String {
        format!("{}{}", self.toolchain_prefix, name)
    }
}

fn toolchain_prefix(layout: &InstallLayout) -> String {
    if cfg!(windows) {
        let bin_dir = layout.base_dir.join("gnu-arm-embedded").join("bin");
        format!(
            "{}{}arm-none-eabi-",
            bin_dir.display(),
            std::path::MAIN_SEPARATOR
        )
    } else {
        "arm-none-eabi-".to_string()
    }
}

#[async_trait]
impl ToolchainTarget for BoardProfile {
    fn compiler(&self) -> String {
        self.tool("gcc")
    }

    fn linker(&self) -> String {
        // The link goes through g++ even though the objects are plain C; the
        // BSP startup objects expect the C++ driver.
        self.tool("g++")
    }

    fn compiler_flags(&self, request: &BuildRequest, fingerprint: &str) -> Vec<String> {
        flags::compiler_flags(self, fingerprint, &request.cflags)
    }

    fn linker_flags(&self, request: &BuildRequest) -> Vec<String> {
        flags::linker_flags(self, &request.ldflags)
    }

    fn source_fingerprint(&self, sources: &[PathBuf]) -> Result<String> {
        fingerprint::source_md5(sources)
    }

    async fn post_build(&self, ctx: PostBuildContext<'_>) -> Result<()> {
        postbuild::run_artifact_pipeline(self, ctx).await
    }
}
