use crate::profile::BoardProfile;

const LANGUAGE_FLAGS: [&str; 7] = [
    "-std=gnu11",
    "-Wall",
    "-fdata-sections",
    "-ffunction-sections",
    "-fno-strict-aliasing",
    "-Wno-unused-variable",
    "-Wno-unused-but-set-variable",
];

/// Ordered compiler argument list for one build. Later flags override earlier
/// identical defines, so the append order is load-bearing.
pub fn compiler_flags(
    profile: &BoardProfile,
    fingerprint: &str,
    project_cflags: &[String],
) -> Vec<String> {
    let mut flags: Vec<String> = profile.base_flags.clone();
    flags.extend(LANGUAGE_FLAGS.iter().map(|flag| flag.to_string()));
    flags.push(format!("-D{}", profile.family));
    flags.push(format!("-I{}", profile.runtime_src_dir.display()));
    for dir in &profile.include_dirs {
        flags.push(format!("-I{}", dir.display()));
    }
    flags.push(format!("-DPLC_RTE_ADDR={:#010x}", profile.runtime_addr));
    flags.push(format!("-DPLC_MD5={}", fingerprint));
    flags.extend(project_cflags.iter().cloned());
    flags
}

/// Ordered linker argument list. The load address never appears here; it only
/// feeds the objcopy calls after the link.
pub fn linker_flags(profile: &BoardProfile, project_ldflags: &[String]) -> Vec<String> {
    let mut flags: Vec<String> = profile.base_flags.clone();
    flags.push("-Xlinker".to_string());
    flags.push(format!("-T{}", profile.linker_script.display()));
    flags.push("-Wl,--gc-sections".to_string());
    flags.push("-nostartfiles".to_string());
    flags.extend(project_ldflags.iter().cloned());
    flags
}
