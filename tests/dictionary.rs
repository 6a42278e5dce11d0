use std::collections::HashSet;
use std::fs;

use clats::{CandidateSource, Dictionary};

#[test]
fn merges_files_without_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    fs::write(&first, "password\nletmein\n\npassword\n").unwrap();
    fs::write(&second, "  letmein  \r\nqwerty\n").unwrap();

    let dict = Dictionary::load(&[&first, &second]);
    assert_eq!(dict.words(), ["password", "letmein", "qwerty"]);
    assert!(dict.skipped().is_empty());

    let unique: HashSet<&String> = dict.words().iter().collect();
    assert_eq!(unique.len(), dict.len());
}

#[test]
fn missing_file_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("words.txt");
    let missing = dir.path().join("nope.txt");
    fs::write(&present, "one\ntwo\n").unwrap();

    let dict = Dictionary::load(&[&missing, &present]);
    assert_eq!(dict.words(), ["one", "two"]);
    assert_eq!(dict.skipped(), [missing]);
}

#[test]
fn all_missing_gives_empty_source() {
    let dir = tempfile::tempdir().unwrap();
    let dict = Dictionary::load(&[dir.path().join("a"), dir.path().join("b")]);
    assert!(dict.is_empty());
    assert_eq!(dict.skipped().len(), 2);
    assert!(CandidateSource::from(dict).is_empty());
}

#[test]
fn non_utf8_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let binary = dir.path().join("binary.txt");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();
    let dict = Dictionary::load(&[&binary]);
    assert!(dict.is_empty());
    assert_eq!(dict.skipped(), [binary]);
}

#[test]
fn description_mentions_skipped_files() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("words.txt");
    fs::write(&present, "a\nb\n").unwrap();
    let dict = Dictionary::load(&[present, dir.path().join("gone.txt")]);
    let text = CandidateSource::from(dict).describe();
    assert!(text.contains("2 unique words"));
    assert!(text.contains("1 files skipped"));
}
