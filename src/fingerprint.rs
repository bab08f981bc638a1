use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::path::PathBuf;

/// MD5 over the concatenated contents of the build's sources, in request
/// order. The runtime compares this value against the copy embedded in the
/// image through the `PLC_MD5` define, so MD5 is part of the contract.
pub fn source_md5(sources: &[PathBuf]) -> Result<String> {
    let mut hasher = Md5::new();
    for path in sources {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read source {}", path.display()))?;
        hasher.update(&data);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
