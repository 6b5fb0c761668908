//! Tests for the prefs CLI help and version output

mod common;

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = common::run(dir.path(), &[]);

    assert!(
        stdout.contains("Usage:"),
        "Output should contain 'Usage:': {}",
        stdout
    );
    assert!(
        stdout.contains("Commands:"),
        "Output should contain 'Commands:': {}",
        stdout
    );
    assert!(
        stdout.contains("Options:"),
        "Output should contain 'Options:': {}",
        stdout
    );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = common::run(dir.path(), &["--version"]);

    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Output should contain version '{}': {}",
        env!("CARGO_PKG_VERSION"),
        stdout
    );
}
