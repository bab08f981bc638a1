use plc_builder::{BoardProfile, BuildRequest, InstallLayout, ToolchainTarget};
use std::path::PathBuf;

const FINGERPRINT: &str = "d41d8cd98f00b204e9800998ecf8427e";

fn layout() -> InstallLayout {
    InstallLayout {
        base_dir: PathBuf::from("/opt/yaplc"),
        runtime_src_dir: PathBuf::from("/opt/yaplc/RTE/src"),
    }
}

fn request() -> BuildRequest {
    BuildRequest {
        sources: vec![PathBuf::from("plc_main.c")],
        build_dir: PathBuf::from("build"),
        image_path: PathBuf::from("build/plc_main.elf"),
        cflags: Vec::new(),
        ldflags: Vec::new(),
    }
}

#[test]
fn test_compiler_flag_order_for_plc411() {
    let profile = BoardProfile::plc411(&layout());

    let flags = profile.compiler_flags(&request(), FINGERPRINT);

    let expected: Vec<String> = [
        "-mthumb",
        "-mcpu=cortex-m4",
        "-g3",
        "-mfloat-abi=hard",
        "-mfpu=fpv4-sp-d16",
        "-std=gnu11",
        "-Wall",
        "-fdata-sections",
        "-ffunction-sections",
        "-fno-strict-aliasing",
        "-Wno-unused-variable",
        "-Wno-unused-but-set-variable",
        "-DSTM32F4",
        "-I/opt/yaplc/RTE/src",
        "-I/opt/yaplc/RTE/src/bsp/plc411",
        "-DPLC_RTE_ADDR=0x08000184",
        "-DPLC_MD5=d41d8cd98f00b204e9800998ecf8427e",
    ]
    .iter()
    .map(|flag| flag.to_string())
    .collect();

    assert_eq!(flags, expected);
}

#[test]
fn test_fingerprint_is_the_only_varying_compiler_flag() {
    let profile = BoardProfile::plc411(&layout());
    let req = request();

    let first = profile.compiler_flags(&req, FINGERPRINT);
    let second = profile.compiler_flags(&req, FINGERPRINT);
    assert_eq!(first, second);

    let other = profile.compiler_flags(&req, "0123456789abcdef0123456789abcdef");
    assert_eq!(first.len(), other.len());
    let differing: Vec<(&String, &String)> = first
        .iter()
        .zip(other.iter())
        .filter(|(a, b)| a != b)
        .collect();
    assert_eq!(differing.len(), 1);
    assert!(differing[0].0.starts_with("-DPLC_MD5="));
}

#[test]
fn test_runtime_addr_define_is_zero_padded_lowercase_hex() {
    let mut profile = BoardProfile::plc411(&layout());
    profile.runtime_addr = 0x0800_abcd;

    let flags = profile.compiler_flags(&request(), FINGERPRINT);

    assert!(flags.contains(&"-DPLC_RTE_ADDR=0x0800abcd".to_string()));
}

#[test]
fn test_project_cflags_append_after_board_flags() {
    let profile = BoardProfile::plc411(&layout());
    let mut req = request();
    req.cflags = vec!["-Os".to_string(), "-DAPP_VERSION=3".to_string()];

    let flags = profile.compiler_flags(&req, FINGERPRINT);

    assert_eq!(flags[flags.len() - 2], "-Os");
    assert_eq!(flags[flags.len() - 1], "-DAPP_VERSION=3");
}

#[test]
fn test_linker_flag_order_for_plc411() {
    let profile = BoardProfile::plc411(&layout());

    let flags = profile.linker_flags(&request());

    let expected: Vec<String> = [
        "-mthumb",
        "-mcpu=cortex-m4",
        "-g3",
        "-mfloat-abi=hard",
        "-mfpu=fpv4-sp-d16",
        "-Xlinker",
        "-T/opt/yaplc/RTE/src/bsp/plc411/stm32f4xx-app.ld",
        "-Wl,--gc-sections",
        "-nostartfiles",
    ]
    .iter()
    .map(|flag| flag.to_string())
    .collect();

    assert_eq!(flags, expected);
}

#[test]
fn test_project_ldflags_append_after_board_flags() {
    let profile = BoardProfile::plc411(&layout());
    let mut req = request();
    req.ldflags = vec!["-Wl,-Map=plc_main.map".to_string()];

    let flags = profile.linker_flags(&req);

    assert_eq!(flags[flags.len() - 1], "-Wl,-Map=plc_main.map");
}

#[test]
fn test_load_addr_stays_out_of_linker_flags() {
    let profile = BoardProfile::plc411(&layout());
    let mut moved = profile.clone();
    moved.load_addr = "0x08060000".to_string();

    assert_eq!(profile.linker_flags(&request()), moved.linker_flags(&request()));
}
