//! End-to-end tests for the `invsweep` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn invsweep(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("invsweep").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).arg("--no-pause");
    cmd
}

const PAGE: &str = r#"<html><body>
<p>Your invoices are ready.</p>
<a href="https://billing.example.com/files/SI-100.pdf">SI-100.pdf</a>
<a href="mailto:ar@example.com">SI-999.pdf</a>
<a href="https://billing.example.com/prefs">Click here to manage alerts</a>
<a href="https://billing.example.com/files/SI-200.pdf">SI-200.pdf</a>
</body></html>"#;

#[test]
fn test_links_lists_qualifying_anchors() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("invoices.html");
    fs::write(&page, PAGE).unwrap();

    invsweep(dir.path())
        .arg("links")
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1) SI-100.pdf"))
        .stdout(predicate::str::contains("(2) SI-200.pdf"))
        .stdout(predicate::str::contains("SI-999.pdf").not())
        .stdout(predicate::str::contains("manage alerts").not());
}

fn links_json(config_home: &Path, source: &Path) -> Vec<serde_json::Value> {
    let output = invsweep(config_home)
        .args(["links", "--format", "json"])
        .arg(source)
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_links_json_output_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("invoices.htm");
    fs::write(&page, PAGE).unwrap();

    let links = links_json(dir.path(), &page);

    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["anchor_text"], "SI-100.pdf");
    assert_eq!(links[1]["url"], "https://billing.example.com/files/SI-200.pdf");
}

#[test]
fn test_links_json_from_email_keeps_status_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let mail = dir.path().join("inbox.eml");
    fs::write(
        &mail,
        format!(
            "From: billing@example.com\r\n\
             Content-Type: text/html; charset=utf-8\r\n\
             \r\n\
             {}\r\n",
            PAGE
        ),
    )
    .unwrap();

    invsweep(dir.path())
        .args(["links", "--format", "json"])
        .arg(&mail)
        .assert()
        .success()
        .stderr(predicate::str::contains("Opening inbox.eml..."))
        .stderr(predicate::str::contains("Data not base64 encoded."));

    assert_eq!(links_json(dir.path(), &mail).len(), 2);
}

#[test]
fn test_links_json_without_links_is_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("empty.html");
    fs::write(&page, r#"<a href="mailto:ar@example.com">Contact us</a>"#).unwrap();

    assert!(links_json(dir.path(), &page).is_empty());
}

#[test]
fn test_links_text_without_links_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("empty.html");
    fs::write(&page, r#"<a href="mailto:ar@example.com">Contact us</a>"#).unwrap();

    invsweep(dir.path())
        .arg("links")
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found to download. Exiting."));
}

#[test]
fn test_links_duplicate_href_skips_mailto() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("dup.html");
    fs::write(
        &page,
        r#"<a href="mailto:ar@example.com" href="https://example.com/SI-1.pdf">SI-1.pdf</a>"#,
    )
    .unwrap();

    let links = links_json(dir.path(), &page);

    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["url"], "https://example.com/SI-1.pdf");
}

#[test]
fn test_run_without_links_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("empty.html");
    fs::write(&page, r#"<a href="mailto:ar@example.com">Contact us</a>"#).unwrap();

    invsweep(dir.path())
        .arg("--workdir")
        .arg(dir.path())
        .arg("run")
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found to download. Exiting."));

    assert!(!dir.path().join("downloaded_invoice_data.csv").exists());
}

#[test]
fn test_run_with_empty_email_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let mail = dir.path().join("inbox.eml");
    fs::write(&mail, "").unwrap();

    invsweep(dir.path())
        .arg("--workdir")
        .arg(dir.path())
        .arg("run")
        .arg(&mail)
        .assert()
        .success()
        .stdout(predicate::str::contains("Opening inbox.eml..."))
        .stdout(predicate::str::contains("Empty file: inbox.eml"));
}

#[test]
fn test_run_prompt_quit() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("inbox.eml"), "").unwrap();

    invsweep(dir.path())
        .arg("--workdir")
        .arg(dir.path())
        .arg("run")
        .write_stdin("7\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(1) inbox.eml"))
        .stdout(predicate::str::contains("Invalid entry, please try again."))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn test_run_missing_source_fails() {
    let dir = tempfile::tempdir().unwrap();

    invsweep(dir.path())
        .arg("run")
        .arg(dir.path().join("nope.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open nope.html"));
}

#[test]
fn test_parse_empty_directory_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();

    invsweep(dir.path())
        .arg("--workdir")
        .arg(dir.path())
        .arg("parse")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Writing data to 'downloaded_invoice_data.csv'...",
        ))
        .stdout(predicate::str::contains("0 of 0 files renamed successfully."));

    assert_eq!(
        fs::read_to_string(dir.path().join("downloaded_invoice_data.csv")).unwrap(),
        "location,invoice_number,total\n"
    );
}

#[test]
fn test_parse_aborts_on_unreadable_pdf() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("SI-1.pdf"), "not a pdf").unwrap();

    invsweep(dir.path())
        .arg("--workdir")
        .arg(dir.path())
        .arg("parse")
        .assert()
        .failure();

    invsweep(dir.path())
        .arg("--workdir")
        .arg(dir.path())
        .args(["parse", "--skip-bad-pdfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped SI-1.pdf"));
}

#[test]
fn test_config_init_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sweep.json");

    invsweep(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    invsweep(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    invsweep(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"file_name\": \"downloaded_invoice_data.csv\""))
        .stdout(predicate::str::contains("\"total_anchor\": \"Please\""));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{ "extraction": { "total_width": 0 } }"#).unwrap();

    invsweep(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("--workdir")
        .arg(dir.path())
        .arg("parse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("total_width"));
}
