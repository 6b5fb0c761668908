//! Tests for the prefs CLI output and color options

mod common;

#[test]
fn test_tsv_output_has_a_header_and_one_row_per_sample() {
    let dir = tempfile::tempdir().unwrap();
    common::run(dir.path(), &["set", "theme", "dark"]);

    let stdout = common::run(dir.path(), &["--output", "tsv", "--color", "never", "show"]);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines[0], "allowed\tdescription\tkey\tname\tstored\tvalue");
    assert_eq!(lines.len(), 10, "Expected a header and nine samples: {}", stdout);
    assert!(
        lines.iter().any(|line| line.ends_with("\ttheme\ttrue\tdark")),
        "Output should contain the stored theme: {}",
        stdout
    );
}

#[test]
fn test_none_output_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = common::run(dir.path(), &["-o", "none", "set", "theme", "dark"]);
    assert!(stdout.is_empty(), "Output should be empty: {}", stdout);

    let stdout = common::run(dir.path(), &["-o", "json", "show"]);
    assert!(stdout.contains("\"dark\""), "Write should still happen: {}", stdout);
}

#[test]
fn test_color_values() {
    let dir = tempfile::tempdir().unwrap();
    for color in ["auto", "yes", "no", "always", "never"] {
        common::run(dir.path(), &["--color", color, "list"]);
    }

    let output = common::prefs(dir.path())
        .args(["--color", "sometimes", "list"])
        .output()
        .expect("Failed to execute prefs command");
    assert!(!output.status.success(), "Unknown color values should be rejected");
}
