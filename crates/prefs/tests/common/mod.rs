use std::{path::Path, process::Command};

/// Create a new prefs CLI command using `store_dir` for its stores
pub fn prefs(store_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_prefs"));
    cmd.env("PREFS_STORE_DIR", store_dir).env_remove("RUST_LOG");
    cmd
}

/// Run `prefs` with `args`, asserting success, and return stdout
#[allow(dead_code)]
pub fn run(store_dir: &Path, args: &[&str]) -> String {
    let output = prefs(store_dir)
        .args(args)
        .output()
        .expect("Failed to execute prefs command");

    assert!(
        output.status.success(),
        "prefs {:?} should succeed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
