use std::fs;
use std::process::Command;

const PASSWORD123_MD5: &str = "482c811da5d5b4bc6d497ffa98491e38";

#[test]
fn all_wordlists_missing_is_an_error() {
    let exe = env!("CARGO_BIN_EXE_clats");
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let output = Command::new(exe)
        .args([
            "crack",
            PASSWORD123_MD5,
            "-a",
            "md5",
            "-w",
            missing.to_str().unwrap(),
        ])
        .output()
        .expect("run failed");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Check that the file exists"));
    assert!(stderr.contains("no candidates"));
}

#[test]
fn missing_config_file_is_reported() {
    let exe = env!("CARGO_BIN_EXE_clats");
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("words.txt");
    fs::write(&list, "a\n").unwrap();
    let config = dir.path().join("clats.json");
    let output = Command::new(exe)
        .args([
            "crack",
            PASSWORD123_MD5,
            "-a",
            "md5",
            "-w",
            list.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("run failed");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("reading config"));
}

#[test]
fn malformed_config_gets_syntax_hint() {
    let exe = env!("CARGO_BIN_EXE_clats");
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("words.txt");
    fs::write(&list, "a\n").unwrap();
    let config = dir.path().join("clats.json");
    fs::write(&config, "{ workers: ").unwrap();
    let output = Command::new(exe)
        .args([
            "crack",
            PASSWORD123_MD5,
            "-a",
            "md5",
            "-w",
            list.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("run failed");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Check the config file syntax"));
}

#[test]
fn wrong_digest_length_for_algorithm() {
    let exe = env!("CARGO_BIN_EXE_clats");
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("words.txt");
    fs::write(&list, "a\n").unwrap();
    let output = Command::new(exe)
        .args(["crack", "abcd", "-a", "sha256", "-w", list.to_str().unwrap()])
        .output()
        .expect("run failed");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("clats identify"));
}
