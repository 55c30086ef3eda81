use std::path::Path;
use std::process::{Command, Output};

fn axiom(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_axiom"))
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to spawn axiom")
}

#[test]
fn highlight_prints_one_row_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.rs");
    std::fs::write(&file, "fn main() {}\n// done").unwrap();
    let out = axiom(
        dir.path(),
        &[file.to_str().unwrap(), "--config", "missing.toml", "--highlight"],
    );
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with(r#"keyword:"fn""#), "{}", rows[0]);
    assert_eq!(rows[1], r#"comment:"// done""#);
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("info: Opened '"), "{stderr}");
    assert!(dir.path().join("axiom.log").exists());
}

#[test]
fn commands_edit_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("list.txt");
    std::fs::write(&file, "apple\r\nApple pie\r\n").unwrap();
    let out = axiom(
        dir.path(),
        &[
            file.to_str().unwrap(),
            "--config",
            "missing.toml",
            "-c",
            ":ra apple pear -i",
            "-c",
            ":w",
            "-c",
            ":q",
        ],
    );
    assert!(out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("info: Replaced 2 occurrences (case-insensitive)"), "{stderr}");
    assert_eq!(std::fs::read(&file).unwrap(), b"pear\r\npear pie\r\n");
}

#[test]
fn error_message_sets_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let out = axiom(dir.path(), &["--config", "missing.toml", "-c", ":zz"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("error: Unknown command: zz"), "{stderr}");
}

#[test]
fn config_file_disables_highlighting() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("axiom.toml"), "[syntax]\nenabled = false\n").unwrap();
    let file = dir.path().join("a.py");
    std::fs::write(&file, "def f(): pass").unwrap();
    let out = axiom(
        dir.path(),
        &[file.to_str().unwrap(), "--config", "axiom.toml", "--highlight"],
    );
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "normal:\"def f(): pass\"\n"
    );
}

#[test]
fn commands_after_quit_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let out = axiom(
        dir.path(),
        &["--config", "missing.toml", "-c", ":q", "-c", ":zz"],
    );
    assert!(out.status.success(), "the unknown command never ran");
}
