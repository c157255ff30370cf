//! CLI tests against real input files in a scratch directory.
//!
//! The `render` tests never reach a working Typst installation; they only
//! cover the failure paths that do not need one.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use hr_core::exit_codes::ExitCode;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

const ARCHIVE: &str = r#"{"log": {"version": "1.2", "entries": [
    {
        "startedDateTime": "2024-01-15T14:30:22Z",
        "request": {"method": "GET", "url": "https://app.example/home", "httpVersion": "HTTP/1.1",
                    "headers": [{"name": "User-Agent", "value": "Example/1.0"}]},
        "response": {"status": 200, "statusText": "OK", "httpVersion": "HTTP/1.1",
                     "content": {"size": 2, "mimeType": "text/plain", "text": "ok"}}
    },
    {
        "startedDateTime": "2024-01-15T14:30:23Z",
        "request": {"method": "POST", "url": "https://tracker.example/collect?v=2", "httpVersion": "HTTP/1.1",
                    "postData": {"mimeType": "text/plain", "text": "device_id=abc123"}},
        "response": {"status": 204, "statusText": "No Content", "httpVersion": "HTTP/1.1"}
    }
]}}"#;

const ANNOTATIONS: &str = r#"[
    null,
    [{"adapter": "exampleTracker/exampleAdapter", "property": "device_id", "value": "abc123"}]
]"#;

const ADAPTERS: &str = r#"[
    {"tracker": {"slug": "exampleTracker", "name": "Example Tracker Inc."},
     "slug": "exampleAdapter", "name": "Example SDK"}
]"#;

const METADATA: &str = r#"{
    "platform": "android",
    "appName": "Example App",
    "appVersion": "1.2.3",
    "analysisDate": "2024-01-15T14:00:00Z",
    "analysisPlatformVersion": "2024.1"
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::write(dir.path().join("capture.har"), ARCHIVE).unwrap();
        fs::write(dir.path().join("annotations.json"), ANNOTATIONS).unwrap();
        fs::write(dir.path().join("adapters.json"), ADAPTERS).unwrap();
        fs::write(dir.path().join("metadata.json"), METADATA).unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// `har-report <subcommand>` isolated from the caller's config and logs.
    fn cmd(&self, subcommand: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("har-report");
        cmd.timeout(Duration::from_secs(60))
            .env("HR_CONFIG", self.path("config.toml"))
            .env_remove("HR_LOG")
            .env_remove("RUST_LOG")
            .arg(subcommand);
        cmd
    }

    fn markup(&self, out_dir: &Path) -> Command {
        let mut cmd = self.cmd("markup");
        cmd.arg("--har")
            .arg(self.path("capture.har"))
            .arg("--annotations")
            .arg(self.path("annotations.json"))
            .arg("--adapters")
            .arg(self.path("adapters.json"))
            .arg("--metadata")
            .arg(self.path("metadata.json"))
            .arg("--out-dir")
            .arg(out_dir);
        cmd
    }
}

#[test]
fn help_lists_subcommands() {
    cargo_bin_cmd!("har-report")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("markup"));
}

#[test]
fn version_json() {
    cargo_bin_cmd!("har-report")
        .args(["version", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"har_report_version\""))
        .stdout(predicate::str::contains("\"de\""));
}

#[test]
fn unknown_subcommand_is_args_error() {
    cargo_bin_cmd!("har-report")
        .arg("frobnicate")
        .assert()
        .code(ExitCode::ArgsError.as_i32());
}

#[test]
fn markup_writes_report_sources() {
    let fx = Fixture::new();
    let out = fx.path("out");

    fx.markup(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("main.typ"));

    let main = fs::read_to_string(out.join("main.typ")).unwrap();
    let har = fs::read_to_string(out.join("har.typ")).unwrap();
    assert!(out.join("style.typ").exists());

    assert!(main.contains("<finding-1>"));
    assert!(main.contains("Example Tracker Inc. (Example SDK)"));
    assert!(main.contains("Example App"));
    assert!(main.contains("#include \"/har.typ\""));

    // only the referenced entry lands in the appendix
    assert!(har.contains("<e1>"));
    assert!(!har.contains("<e0>"));
}

#[test]
fn markup_traffic_needs_no_metadata() {
    let fx = Fixture::new();
    let out = fx.path("traffic");

    fx.cmd("markup")
        .arg("--har")
        .arg(fx.path("capture.har"))
        .args(["--kind", "traffic", "--language", "de", "--no-responses"])
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success();

    let main = fs::read_to_string(out.join("main.typ")).unwrap();
    assert!(main.contains("<e0>"));
    assert!(main.contains("<e1>"));
    assert!(!main.contains("<e0-res>"));
}

#[test]
fn report_without_metadata_is_input_error() {
    let fx = Fixture::new();
    fx.cmd("markup")
        .arg("--har")
        .arg(fx.path("capture.har"))
        .arg("--out-dir")
        .arg(fx.path("out"))
        .assert()
        .code(ExitCode::InputError.as_i32())
        .stderr(predicate::str::contains("require report metadata"));
}

#[test]
fn missing_archive_is_input_error() {
    let fx = Fixture::new();
    fx.cmd("markup")
        .arg("--har")
        .arg(fx.path("nope.har"))
        .args(["--kind", "traffic"])
        .arg("--out-dir")
        .arg(fx.path("out"))
        .assert()
        .code(ExitCode::InputError.as_i32())
        .stderr(predicate::str::contains("nope.har"));
}

#[test]
fn unknown_adapter_is_annotation_error() {
    let fx = Fixture::new();
    fx.write(
        "annotations.json",
        r#"[null, [{"adapter": "nonexistent/slug", "property": "x", "value": "y"}]]"#,
    );
    let out = fx.path("out");

    fx.markup(&out)
        .assert()
        .code(ExitCode::AnnotationError.as_i32())
        .stderr(predicate::str::contains("nonexistent/slug"));
    assert!(!out.join("main.typ").exists());
}

#[test]
fn unsupported_encoding_is_archive_error() {
    let fx = Fixture::new();
    fx.write(
        "capture.har",
        &ARCHIVE.replace(r#""text": "ok""#, r#""text": "H4sI", "encoding": "gzip""#),
    );

    fx.markup(&fx.path("out"))
        .assert()
        .code(ExitCode::ArchiveError.as_i32())
        .stderr(predicate::str::contains("gzip"));
}

#[test]
fn unsupported_language_is_args_error() {
    let fx = Fixture::new();
    fx.markup(&fx.path("out"))
        .args(["--language", "xx"])
        .assert()
        .code(ExitCode::ArgsError.as_i32())
        .stderr(predicate::str::contains("unsupported language: xx"));
}

#[test]
fn unknown_kind_is_args_error() {
    let fx = Fixture::new();
    fx.markup(&fx.path("out"))
        .args(["--kind", "memo"])
        .assert()
        .code(ExitCode::ArgsError.as_i32());
}

#[test]
fn invalid_config_is_config_error() {
    let fx = Fixture::new();
    fx.write("config.toml", "[render]\nlanguage = 3\n");
    fx.markup(&fx.path("out"))
        .assert()
        .code(ExitCode::ConfigError.as_i32());
}

#[test]
fn config_language_applies() {
    let fx = Fixture::new();
    fx.write("config.toml", "[render]\nlanguage = \"de\"\n");
    let out = fx.path("out");
    fx.markup(&out).assert().success();

    let main = fs::read_to_string(out.join("main.typ")).unwrap();
    assert!(main.contains("#set text(lang: \"de\")"));
}

#[test]
fn render_with_missing_compiler_is_compile_error() {
    let fx = Fixture::new();
    let output = fx.path("report.pdf");

    fx.cmd("render")
        .arg("--har")
        .arg(fx.path("capture.har"))
        .args(["--kind", "traffic"])
        .arg("--typst")
        .arg(fx.path("no-such-typst"))
        .arg("-o")
        .arg(&output)
        .assert()
        .code(ExitCode::CompileError.as_i32());
    assert!(!output.exists());
}
