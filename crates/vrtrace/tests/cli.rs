//! Exit codes and stderr of the `vrtrace` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn vrtrace(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vrtrace"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("vrtrace_cli_{}_{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn missing_mesh_argument_prints_usage() {
    let output = vrtrace(&[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn unreadable_mesh_fails_to_load() {
    let missing = std::env::temp_dir().join("vrtrace_cli_does_not_exist.obj");
    let output = vrtrace(&[missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load mesh"), "stderr: {stderr}");
}

#[test]
fn help_exits_cleanly() {
    let output = vrtrace(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn short_run_succeeds() {
    let mesh = temp_file(
        "tri.obj",
        "v -1 -1 -3\nv 1 -1 -3\nv 0 1 -3\nf 1 2 3\n",
    );
    let config = temp_file("small.json", r#"{ "headset": { "render_size": [8, 8] } }"#);
    let output = vrtrace(&[
        mesh.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--frames",
        "2",
    ]);
    std::fs::remove_file(&mesh).unwrap();
    std::fs::remove_file(&config).unwrap();
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
