//! Exit codes and diagnostics of the `rescc` binary.

#![cfg(feature = "cli")]

use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn rescc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rescc"))
}

#[test]
fn compile_succeeds() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    let manifest = dir.path().join("res.toml");
    fs::write(&manifest, "[[group]]\n[[group.entry]]\npath = \"a.txt\"\n").unwrap();
    let out = dir.path().join("res.rs");

    let status = rescc()
        .arg("compile")
        .arg(&manifest)
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(fs::read_to_string(&out).unwrap().contains("pub fn init() -> bool"));

    let status = rescc().arg("check").arg(&manifest).arg(&out).status().unwrap();
    assert!(status.success());
}

#[test]
fn missing_arguments_exit_one() {
    let out = rescc().arg("compile").arg("only-one.toml").output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));

    let out = rescc().output().unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn failure_prints_one_line() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("res.toml");
    fs::write(&manifest, "[[group]]\n[[group.entry]]\npath = \"gone.png\"\n").unwrap();

    let out = rescc()
        .arg("compile")
        .arg(&manifest)
        .arg(dir.path().join("res.rs"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.lines().count(), 1, "{stderr}");
    assert!(stderr.starts_with("error: "));
    assert!(stderr.contains("gone.png"));
}
