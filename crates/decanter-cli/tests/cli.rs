//! Integration tests for the `decanter` binary.

use std::io::{Cursor, Write};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::write::{FileOptions, ZipWriter};

fn decanter(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_decanter"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run decanter binary")
}

fn docx(paragraph: &str) -> Vec<u8> {
    let document = format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:body></w:document>"#,
        paragraph
    );
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        zip.start_file("word/document.xml", FileOptions::<'_, ()>::default()).unwrap();
        zip.write_all(document.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

fn tar_with(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut tar = tar::Builder::new(&mut cursor);
        for (path, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_path(path).unwrap();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            tar.append(&header, content.as_slice()).unwrap();
        }
        tar.finish().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn test_extract_prints_text_in_feed_order() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bundle.tar"),
        tar_with(&[("one.docx", docx("first")), ("two.docx", docx("second"))]),
    )
    .unwrap();

    let output = decanter(&["extract", "bundle.tar"], dir.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "first\nsecond\n");
}

#[test]
fn test_extract_json_output() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("report.docx"), docx("Hello")).unwrap();

    let output = decanter(&["extract", "--format", "json", "report.docx"], dir.path());
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let records = records.as_array().expect("JSON output should be an array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["body"], "Hello\n");
    assert_eq!(records[0]["mime-type"], "text/plain");
    assert_eq!(records[0]["path"], "report.txt");
    assert_eq!(records[0]["sources"][0], "report.docx");
}

#[test]
fn test_failed_input_does_not_stop_others() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("good.docx"), docx("kept")).unwrap();
    std::fs::write(dir.path().join("notes.md"), "# unsupported").unwrap();

    let output = decanter(&["extract", "notes.md", "missing.docx", "good.docx"], dir.path());

    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "kept\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("notes.md"));
    assert!(stderr.contains("missing.docx"));
}

#[test]
fn test_max_depth_flag() {
    let dir = TempDir::new().unwrap();
    let inner = tar_with(&[("deep.docx", docx("deep"))]);
    std::fs::write(dir.path().join("outer.tar"), tar_with(&[("inner.tar", inner)])).unwrap();

    let shallow = decanter(&["extract", "--max-depth", "1", "outer.tar"], dir.path());
    assert!(!shallow.status.success());
    assert!(String::from_utf8_lossy(&shallow.stderr).contains("Limit exceeded"));

    let deep = decanter(&["extract", "--max-depth", "2", "outer.tar"], dir.path());
    assert!(deep.status.success());
    assert_eq!(String::from_utf8_lossy(&deep.stdout), "deep\n");
}

#[test]
fn test_discovered_config_applies() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("decanter.toml"), "max_total_bytes = 8\n").unwrap();
    std::fs::write(dir.path().join("bundle.tar"), tar_with(&[("a.docx", docx("a"))])).unwrap();

    let output = decanter(&["extract", "bundle.tar"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Limit exceeded"));
}

#[test]
fn test_invalid_limit_rejected() {
    let dir = TempDir::new().unwrap();
    let output = decanter(&["extract", "--max-depth", "0", "anything.tar"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}

#[test]
fn test_decomposers_lists_defaults_in_order() {
    let dir = TempDir::new().unwrap();
    let output = decanter(&["decomposers"], dir.path());
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let keys: Vec<&str> = stdout.lines().filter_map(|line| line.split('\t').next()).collect();
    assert_eq!(keys, vec!["tar", "office-open-xml-document", "office-open-xml-presentation"]);
}
