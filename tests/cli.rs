//! Integration tests driving the `mfdoc` and `mfdoc-check` binaries.
//!
//! Every `mfdoc` invocation here either fails before the upload stage or
//! runs with `--dry-run`, so no test touches the network.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn bin_path(name: &str) -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.push(name);
    path
}

/// Run `mfdoc` against a file created inside a fresh temp dir.
///
/// `rule_table`: `None` points `--mf-map` at a nonexistent path (empty
/// table); `Some(csv)` writes the table next to the file.
fn run_mfdoc(filename: &str, rule_table: Option<&str>, dry_run: bool) -> Output {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join(filename);
    fs::write(&file, b"test content").unwrap();

    let map_path = dir.path().join("mf_section_map.csv");
    if let Some(csv) = rule_table {
        fs::write(&map_path, csv).unwrap();
    }

    let mut cmd = Command::new(bin_path("mfdoc"));
    cmd.arg(&file)
        .arg("--bucket")
        .arg("test-bucket")
        .arg("--mf-map")
        .arg(&map_path);
    if dry_run {
        cmd.arg("--dry-run");
    }
    cmd.output().unwrap()
}

#[test]
fn icon_dry_run_prints_key_and_tags() {
    let out = run_mfdoc("ICON-102000-FURN.svg", None, true);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("✔ Valid filename & MF check passed"));
    assert!(stdout.contains("s3 key: s3://test-bucket/ICONS/normalized/10/ICON-102000-FURN.svg"));
    assert!(stdout.contains("tags:   kind=icon&mf_sec=102000&mf_div=10&type=FURN"));
    assert!(!stdout.contains("Uploaded"));
}

#[test]
fn icon_variant_passes_rule_table() {
    let out = run_mfdoc(
        "ICON-102000-FURN-RED.png",
        Some("mf_section,allowed_types\n102000,FURN|CASEWORK\n"),
        true,
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("type=FURN&variant=RED"));
}

#[test]
fn spec_dry_run_prints_partitioned_key() {
    let out = run_mfdoc("USA-CA-037-1-238110-102000-CABINET-STORAGE-ACME.pdf", None, true);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(
        "s3 key: s3://test-bucket/SPECS/normalized/region=USA/state=CA/county=037/ownership=1/naics=238110/10/102000/USA-CA-037-1-238110-102000-CABINET-STORAGE-ACME.pdf"
    ));
    assert!(stdout.contains("type=CABINET"));
    assert!(stdout.contains("brand=ACME"));
    assert!(stdout.contains("desc=CABINET-STORAGE"));
}

#[test]
fn missing_file_exits_2() {
    let dir = TempDir::new().unwrap();
    let out = Command::new(bin_path("mfdoc"))
        .arg(dir.path().join("ICON-102000-FURN.svg"))
        .arg("--bucket")
        .arg("test-bucket")
        .arg("--mf-map")
        .arg(dir.path().join("absent.csv"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("file not found"));
}

#[test]
fn unmatched_name_exits_3() {
    let out = run_mfdoc("random-file.txt", None, false);
    assert_eq!(out.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&out.stderr)
        .contains("filename does not match ICON or SPEC patterns: random-file.txt"));
}

#[test]
fn disallowed_type_exits_5() {
    let out = run_mfdoc(
        "USA-CA-037-1-238110-102000-SHELF-ACME.pdf",
        Some("mf_section,allowed_types\n102000,CABINET\n"),
        false,
    );
    assert_eq!(out.status.code(), Some(5));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("type 'SHELF' not allowed for MF section 102000"));
    assert!(stderr.contains("[\"CABINET\"]"));
}

#[test]
fn malformed_rule_table_exits_outside_taxonomy() {
    let out = run_mfdoc(
        "ICON-102000-FURN.svg",
        Some("mf_section,allowed_types\n102000\n"),
        true,
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Malformed row"));
}

#[test]
fn namecheck_classifies_each_line() {
    let mut child = Command::new(bin_path("mfdoc-check"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(
            b"ICON-102000-FURN.svg\n\nUSA-CA-037-1-238110-102000-CABINET-STORAGE-ACME.pdf\nrandom-file.txt\n",
        )
        .unwrap();

    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "ICON OK  → ICON-102000-FURN.svg",
            "SPEC OK  → USA-CA-037-1-238110-102000-CABINET-STORAGE-ACME.pdf",
            "FAIL     → random-file.txt",
        ]
    );
}
