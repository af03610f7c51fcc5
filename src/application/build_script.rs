//! Cargo build-script host: reads the inputs from disk, runs the generator
//! and writes the units into `OUT_DIR`.
//!
//! ```no_run
//! // build.rs
//! use servicegen::application::BuildScriptHost;
//!
//! fn main() -> anyhow::Result<()> {
//!     let host = BuildScriptHost::from_env()?
//!         .source_root("src/services", "crate::services")
//!         .additional_file("analyzer.config.json")
//!         .additional_file("services.json");
//!     let output = host.run()?;
//!     host.emit_cargo_directives(&output);
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::application::{GeneratorInput, GeneratorOutput, SourceGenerator};
use crate::generation::{AdditionalText, OutputSink};
use crate::infrastructure::analysis::{
    DeclarationSnapshot, RustSourceAnalyzer, RustSourceFile, module_namespace,
};
use crate::infrastructure::config::resolve_config;
use crate::infrastructure::output::FileSystemOutputSink;

#[derive(Debug, Clone)]
struct SourceRoot {
    dir: PathBuf,
    namespace: String,
}

/// Drives one generator run from a `build.rs`
#[derive(Debug, Clone)]
pub struct BuildScriptHost {
    module_name: String,
    out_dir: PathBuf,
    source_roots: Vec<SourceRoot>,
    additional_files: Vec<PathBuf>,
}

impl BuildScriptHost {
    pub fn new<M: Into<String>, P: Into<PathBuf>>(module_name: M, out_dir: P) -> Self {
        Self {
            module_name: module_name.into(),
            out_dir: out_dir.into(),
            source_roots: Vec::new(),
            additional_files: Vec::new(),
        }
    }

    /// Host built from the variables cargo sets for build scripts
    pub fn from_env() -> anyhow::Result<Self> {
        let module_name =
            std::env::var("CARGO_PKG_NAME").context("CARGO_PKG_NAME is not set")?;
        let out_dir = std::env::var("OUT_DIR").context("OUT_DIR is not set")?;

        Ok(Self::new(module_name.replace('-', "_"), out_dir))
    }

    /// Analyze every `.rs` file below `dir`; the directory itself is the
    /// module `namespace`.
    pub fn source_root<P: Into<PathBuf>, N: Into<String>>(mut self, dir: P, namespace: N) -> Self {
        self.source_roots.push(SourceRoot {
            dir: dir.into(),
            namespace: namespace.into(),
        });
        self
    }

    /// Hand a file to the run as an auxiliary input
    pub fn additional_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.additional_files.push(path.into());
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Read all inputs, run the generator and write the registered units.
    ///
    /// Generator failures come back as diagnostics in the output; only I/O
    /// problems on the host side are errors here.
    pub fn run(&self) -> anyhow::Result<GeneratorOutput> {
        let additional_texts = self.read_additional_texts()?;

        // Sources are only parsed when the service model pipeline will read them.
        let declarations = if extracts_services(&additional_texts) {
            match RustSourceAnalyzer::new().analyze(&self.read_sources()?) {
                Ok(snapshot) => snapshot,
                Err(e) => return Ok(GeneratorOutput::failed(vec![e.to_diagnostic()])),
            }
        } else {
            debug!("Service model pipeline disabled, skipping source analysis");
            DeclarationSnapshot::default()
        };

        let input = GeneratorInput {
            module_name: self.module_name.clone(),
            declarations,
            additional_texts,
        };

        let generator = SourceGenerator::new().context("Failed to load built-in templates")?;
        let output = generator.run(&input);

        FileSystemOutputSink::new(&self.out_dir)
            .write_units(&output.units)
            .context("Failed to write generated units")?;

        info!(
            out_dir = %self.out_dir.display(),
            units = output.units.len(),
            diagnostics = output.diagnostics.len(),
            "Build script run finished"
        );

        Ok(output)
    }

    /// Print the `cargo:` lines that make cargo rerun on input changes and
    /// surface diagnostics as build warnings.
    pub fn emit_cargo_directives(&self, output: &GeneratorOutput) {
        for line in self.cargo_directives(output) {
            println!("{line}");
        }
    }

    fn cargo_directives(&self, output: &GeneratorOutput) -> Vec<String> {
        let watched = self
            .source_roots
            .iter()
            .map(|root| &root.dir)
            .chain(&self.additional_files);

        watched
            .map(|path| format!("cargo:rerun-if-changed={}", path.display()))
            .chain(
                output
                    .diagnostics
                    .iter()
                    .map(|diagnostic| format!("cargo:warning={diagnostic}")),
            )
            .collect()
    }

    fn read_sources(&self) -> anyhow::Result<Vec<RustSourceFile>> {
        let mut files = Vec::new();

        for root in &self.source_roots {
            for entry in WalkDir::new(&root.dir).sort_by_file_name() {
                let entry = entry.with_context(|| {
                    format!("Failed to walk source root {}", root.dir.display())
                })?;
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|ext| ext.to_str()) != Some("rs")
                {
                    continue;
                }

                let relative = path.strip_prefix(&root.dir).unwrap_or(path);
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;

                files.push(RustSourceFile::new(
                    path.display().to_string(),
                    module_namespace(&root.namespace, relative),
                    text,
                ));
            }
        }

        Ok(files)
    }

    fn read_additional_texts(&self) -> anyhow::Result<Vec<AdditionalText>> {
        self.additional_files
            .iter()
            .map(|path| {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok(AdditionalText::new(path.display().to_string(), text))
            })
            .collect()
    }
}

/// True when the run config enables the service model pipeline. A missing
/// or malformed config is left to the generator to report.
fn extracts_services(additional_texts: &[AdditionalText]) -> bool {
    matches!(
        resolve_config(additional_texts),
        Ok(Some(config)) if config.services_namespace().is_some()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::RunState;
    use tempfile::TempDir;

    fn write(path: &Path, text: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_run_reads_inputs_and_writes_units() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        write(
            &root.join("src/services/billing.rs"),
            "pub struct Billing;\nimpl Billing { pub fn charge(&self) -> Receipt { todo!() } }",
        );
        write(&root.join("src/services/notes.txt"), "not rust");
        write(
            &root.join("analyzer.config.json"),
            r#"{"ControllerServicesNamespace":"crate::services::billing"}"#,
        );

        let host = BuildScriptHost::new("acme_app", root.join("out"))
            .source_root(root.join("src/services"), "crate::services")
            .additional_file(root.join("analyzer.config.json"));
        let output = host.run().unwrap();

        assert_eq!(output.state, RunState::Registered(1));
        let written = fs::read_to_string(host.out_dir().join("acme_app.generated.rs")).unwrap();
        assert!(written.contains("'Name': 'Billing'"));
        assert!(written.contains("'Type': 'Receipt'"));
    }

    #[test]
    fn test_unparseable_source_becomes_diagnostic() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        write(&root.join("src/broken.rs"), "pub struct {");

        write(
            &root.join("analyzer.config.json"),
            r#"{"ControllerServicesNamespace":"crate"}"#,
        );

        let host = BuildScriptHost::new("acme_app", root.join("out"))
            .source_root(root.join("src"), "crate")
            .additional_file(root.join("analyzer.config.json"));
        let output = host.run().unwrap();

        assert_eq!(output.state, RunState::Failed);
        assert_eq!(output.diagnostics[0].id, "SG0006");
        assert!(host.cargo_directives(&output).iter().any(|line| {
            line.starts_with("cargo:warning=error[SG0006]")
        }));
    }

    #[test]
    fn test_unparseable_source_is_ignored_without_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        write(&root.join("src/broken.rs"), "pub struct {");

        let host = BuildScriptHost::new("acme_app", root.join("out"))
            .source_root(root.join("src"), "crate");
        let output = host.run().unwrap();

        assert_eq!(output.state, RunState::NoOp);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_unparseable_source_does_not_block_controllers() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        write(&root.join("src/broken.rs"), "pub struct {");
        write(&root.join("analyzer.config.json"), r#"{"JsonSchema":"services.json"}"#);
        write(&root.join("services.json"), r#"[{"Name":"Billing"}]"#);

        let host = BuildScriptHost::new("acme_app", root.join("out"))
            .source_root(root.join("src"), "crate")
            .additional_file(root.join("analyzer.config.json"))
            .additional_file(root.join("services.json"));
        let output = host.run().unwrap();

        assert_eq!(output.state, RunState::Registered(1));
        assert!(output.diagnostics.is_empty());
        assert!(host.out_dir().join("BillingController.generated.rs").exists());
    }

    #[test]
    fn test_missing_additional_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let host = BuildScriptHost::new("acme_app", temp_dir.path().join("out"))
            .additional_file(temp_dir.path().join("analyzer.config.json"));

        let err = host.run().unwrap_err();
        assert!(err.to_string().contains("analyzer.config.json"));
    }

    #[test]
    fn test_cargo_directives_watch_inputs() {
        let host = BuildScriptHost::new("acme_app", "out")
            .source_root("src/services", "crate::services")
            .additional_file("services.json");

        assert_eq!(
            host.cargo_directives(&GeneratorOutput::noop()),
            vec![
                "cargo:rerun-if-changed=src/services".to_string(),
                "cargo:rerun-if-changed=services.json".to_string(),
            ]
        );
    }
}
