//! CLI integration tests: run the built binary against temp trees.

use serde_json::Value;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn sunat(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sunat"))
        .args(args)
        .env("SUNAT_HOME", home)
        .env_remove("SUNAT_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sunat binary")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({}): {}",
            err,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn write_tree(root: &Path) {
    fs::write(root.join("01-F001-1.pdf"), b"factura").unwrap();
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for name in ["03-B001-7.pdf", "01-F001-1.pdf"] {
        writer
            .start_file(name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"zipped").unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    fs::write(root.join("bundle.zip"), bytes).unwrap();
}

#[test]
fn find_json_lists_records_with_status() {
    let home = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    write_tree(docs.path());

    let output = sunat(home.path(), &["find", docs.path().to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["files_found"], 3);
    let files = json["files"].as_array().unwrap();
    let unique = files.iter().filter(|f| f["status"] == "UNIQUE").count();
    assert_eq!(unique, 2);
    assert!(files
        .iter()
        .any(|f| f["classification"] == "boleta" && f["address"].as_str().unwrap().contains("bundle.zip:")));
}

#[test]
fn process_json_writes_archive() {
    let home = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_tree(docs.path());

    let output = sunat(
        home.path(),
        &[
            "process",
            docs.path().to_str().unwrap(),
            "--output",
            out.path().to_str().unwrap(),
            "--json",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["message"], "Processing complete.");
    assert_eq!(json["unique_files_packaged"], 2);
    let archive = json["output_zip_file"].as_str().unwrap();
    assert!(Path::new(archive).exists());
    let log = json["process_log_file"].as_str().unwrap();
    assert!(Path::new(log).starts_with(home.path()));
    assert!(docs.path().join("01-F001-1.pdf").exists());
}

#[test]
fn missing_path_fails_with_json_error() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("does-not-exist");

    let output = sunat(home.path(), &["find", missing.to_str().unwrap(), "--json"]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert!(json["error"].as_str().unwrap().contains("does-not-exist"));
}

#[test]
fn config_json_reports_home() {
    let home = TempDir::new().unwrap();
    let output = sunat(home.path(), &["config", "--json"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["home"], home.path().to_str().unwrap());
    assert_eq!(json["config_exists"], false);
    assert_eq!(json["settings"]["api"]["port"], 8000);
}
