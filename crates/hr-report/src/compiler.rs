//! Hand-off to the external Typst compiler.
//!
//! The generator only produces source text. A [`Compiler`] collects the
//! named sources of a [`Document`] and turns them into output bytes.

use crate::error::{ReportError, Result};
use crate::generator::Document;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Output formats a compiler can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pdf,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
        }
    }
}

/// A Typst compiler that resolves cross-references across all registered
/// sources.
pub trait Compiler {
    /// Register a source file under an absolute root-relative path.
    fn add_source(&mut self, path: &str, text: &str) -> Result<()>;

    /// Compile starting at `entry_path`.
    fn compile(
        &mut self,
        entry_path: &str,
        format: OutputFormat,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Register every source of `document`.
    fn add_document(&mut self, document: &Document) -> Result<()> {
        for source in &document.sources {
            self.add_source(&source.path, &source.text)?;
        }
        Ok(())
    }
}

/// Root-relative form of a source path. Only plain components are allowed.
pub fn relative_source_path(path: &str) -> Result<PathBuf> {
    let invalid = || ReportError::InvalidSourcePath(path.to_string());

    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(part) => out.push(part),
            Component::ParentDir | Component::Prefix(_) => return Err(invalid()),
        }
    }
    if out.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(out)
}

/// Runs the `typst` command-line compiler in a scratch directory.
#[derive(Debug, Clone)]
pub struct TypstCli {
    binary: PathBuf,
    sources: BTreeMap<PathBuf, String>,
}

impl Default for TypstCli {
    fn default() -> Self {
        Self::new("typst")
    }
}

impl TypstCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            sources: BTreeMap::new(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Registered source paths, root-relative.
    pub fn source_paths(&self) -> impl Iterator<Item = &Path> {
        self.sources.keys().map(PathBuf::as_path)
    }

    async fn write_sources(&self, root: &Path) -> Result<()> {
        for (path, text) in &self.sources {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, text).await?;
        }
        Ok(())
    }
}

impl Compiler for TypstCli {
    fn add_source(&mut self, path: &str, text: &str) -> Result<()> {
        let path = relative_source_path(path)?;
        debug!(path = %path.display(), bytes = text.len(), "Source registered");
        self.sources.insert(path, text.to_string());
        Ok(())
    }

    async fn compile(&mut self, entry_path: &str, format: OutputFormat) -> Result<Vec<u8>> {
        let entry = relative_source_path(entry_path)?;
        if !self.sources.contains_key(&entry) {
            return Err(ReportError::CompilationFailure(format!(
                "entry file not registered: {entry_path}"
            )));
        }

        let dir = tempfile::tempdir()?;
        self.write_sources(dir.path()).await?;
        let output_path = dir.path().join(format!("output.{}", format.as_str()));

        debug!(
            binary = %self.binary.display(),
            root = %dir.path().display(),
            entry = %entry.display(),
            "Running compiler"
        );

        let output = Command::new(&self.binary)
            .arg("compile")
            .arg("--root")
            .arg(dir.path())
            .arg("--format")
            .arg(format.as_str())
            .arg(dir.path().join(&entry))
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ReportError::CompilationFailure(format!(
                    "failed to run {}: {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, "Compiler rejected document");
            return Err(ReportError::CompilationFailure(stderr));
        }

        let bytes = tokio::fs::read(&output_path).await?;
        info!(bytes = bytes.len(), format = format.as_str(), "Document compiled");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_source_path() {
        assert_eq!(relative_source_path("/main.typ").unwrap(), PathBuf::from("main.typ"));
        assert_eq!(
            relative_source_path("/parts/./har.typ").unwrap(),
            PathBuf::from("parts/har.typ")
        );
        for bad in ["", "/", "/../etc/passwd", "a/../../b"] {
            assert!(
                matches!(relative_source_path(bad), Err(ReportError::InvalidSourcePath(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[tokio::test]
    async fn test_unregistered_entry() {
        let mut compiler = TypstCli::default();
        compiler.add_source("/style.typ", "").unwrap();
        let err = compiler.compile("/main.typ", OutputFormat::Pdf).await.unwrap_err();
        assert!(matches!(err, ReportError::CompilationFailure(m) if m.contains("/main.typ")));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let mut compiler = TypstCli::new("/nonexistent/typst-binary");
        compiler.add_source("/main.typ", "= Hi").unwrap();
        let err = compiler.compile("/main.typ", OutputFormat::Pdf).await.unwrap_err();
        assert!(matches!(err, ReportError::CompilationFailure(m) if m.contains("failed to run")));
    }

    #[cfg(unix)]
    fn fake_binary(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-typst");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fake_compiler_success() {
        let bin_dir = tempfile::tempdir().unwrap();
        // Check the included file exists under --root, then write the last arg.
        let binary = fake_binary(
            bin_dir.path(),
            r#"test -f "$3/har.typ" || exit 3
for last; do :; done
printf '%%PDF-fake' > "$last""#,
        );

        let mut compiler = TypstCli::new(binary);
        compiler.add_source("/main.typ", "#include \"/har.typ\"").unwrap();
        compiler.add_source("/har.typ", "= Traffic").unwrap();
        let bytes = compiler.compile("/main.typ", OutputFormat::Pdf).await.unwrap();
        assert_eq!(bytes, b"%PDF-fake");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fake_compiler_failure_carries_stderr() {
        let bin_dir = tempfile::tempdir().unwrap();
        let binary = fake_binary(
            bin_dir.path(),
            "echo 'error: unclosed delimiter' >&2\nexit 1",
        );

        let mut compiler = TypstCli::new(binary);
        compiler.add_source("/main.typ", "```").unwrap();
        let err = compiler.compile("/main.typ", OutputFormat::Pdf).await.unwrap_err();
        assert!(matches!(err, ReportError::CompilationFailure(m) if m == "error: unclosed delimiter"));
    }
}
