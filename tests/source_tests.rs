use plc_builder::collect_sources;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_sources_come_back_sorted() {
    let dir = tempdir().unwrap();
    let project = dir.path();
    fs::create_dir_all(project.join("sub")).unwrap();

    // Written out of order on purpose.
    fs::write(project.join("c_unit.c"), "int c;\n").unwrap();
    fs::write(project.join("a_unit.c"), "int a;\n").unwrap();
    fs::write(project.join("sub").join("b_unit.c"), "int b;\n").unwrap();

    let sources = collect_sources(project).unwrap();

    assert_eq!(
        sources,
        vec![
            project.join("a_unit.c"),
            project.join("c_unit.c"),
            project.join("sub").join("b_unit.c"),
        ]
    );
}

#[test]
fn test_only_c_files_are_collected() {
    let dir = tempdir().unwrap();
    let project = dir.path();
    fs::write(project.join("plc_main.c"), "int main;\n").unwrap();
    fs::write(project.join("plc_main.h"), "extern int main;\n").unwrap();
    fs::write(project.join("plc_main.o"), "not an object\n").unwrap();
    fs::write(project.join("notes.txt"), "remember the relay\n").unwrap();

    let sources = collect_sources(project).unwrap();

    assert_eq!(sources, vec![project.join("plc_main.c")]);
}

#[test]
fn test_empty_project_yields_no_sources() {
    let dir = tempdir().unwrap();

    let sources = collect_sources(dir.path()).unwrap();

    assert!(sources.is_empty());
}

#[test]
fn test_missing_project_is_an_error() {
    let dir = tempdir().unwrap();

    let err = collect_sources(&dir.path().join("gone")).unwrap_err();

    assert!(err.to_string().contains("failed to scan"));
}
