//! Conformance test helpers for the QHDL elaborator.
//!
//! Provides pipeline functions that run QHDL source text through
//! parse → register → elaborate and return structured results for
//! assertion in integration tests.

#![warn(missing_docs)]

use std::path::Path;

use qhdl_common::Interner;
use qhdl_config::{load_config, ConfigError, ElaborationOptions};
use qhdl_diagnostics::{Diagnostic, DiagnosticCode, Severity, TerminalRenderer};
use qhdl_elaborate::{elaborate, Library};
use qhdl_netlist::FlatGraph;
use qhdl_parser::parse_all;
use qhdl_source::SourceDb;

/// Result of running the full parse → register → elaborate pipeline.
pub struct PipelineResult {
    /// The flattened graph, present only when no error was emitted.
    pub graph: Option<FlatGraph>,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
    /// The sources the diagnostics point into.
    pub source_db: SourceDb,
}

impl PipelineResult {
    /// Codes of all diagnostics, in emission order.
    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }

    /// Returns `true` if some diagnostic has `code`.
    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// The graph, panicking with the rendered diagnostics if there is none.
    pub fn expect_graph(&self) -> &FlatGraph {
        match &self.graph {
            Some(graph) => graph,
            None => panic!("elaboration failed:\n{}", self.render()),
        }
    }

    /// Renders every diagnostic without colour.
    pub fn render(&self) -> String {
        TerminalRenderer::new(false).render_all(&self.diagnostics, &self.source_db)
    }
}

/// Runs a single QHDL source text through the pipeline with default options.
pub fn full_pipeline(source: &str, top: &str) -> PipelineResult {
    full_pipeline_multi(&[source], top, &ElaborationOptions::default())
}

/// Runs a single QHDL source text through the pipeline with `options`.
pub fn full_pipeline_with(source: &str, top: &str, options: &ElaborationOptions) -> PipelineResult {
    full_pipeline_multi(&[source], top, options)
}

/// Runs several source texts, parsed in parallel, through the pipeline.
pub fn full_pipeline_multi(sources: &[&str], top: &str, options: &ElaborationOptions) -> PipelineResult {
    let mut db = SourceDb::new();
    for (i, source) in sources.iter().enumerate() {
        db.add_source(format!("input_{i}.qhdl"), source.to_string());
    }
    run(db, top, options)
}

/// Loads `qhdl.toml` from `dir` and elaborates the project it describes.
///
/// Source paths are relative to `dir`.
pub fn run_project(dir: &Path) -> Result<PipelineResult, ConfigError> {
    let config = load_config(dir)?;
    let mut db = SourceDb::new();
    for source in &config.project.sources {
        db.load_file(&dir.join(source))?;
    }
    Ok(run(db, &config.project.top, &config.elaborate))
}

fn run(source_db: SourceDb, top: &str, options: &ElaborationOptions) -> PipelineResult {
    let interner = Interner::new();
    let mut diagnostics = Vec::new();

    let mut library = Library::new(&interner);
    let mut syntax_failed = false;
    for (_, parsed) in parse_all(&source_db, &source_db.file_ids(), &interner) {
        match parsed {
            Ok(file) => {
                if let Err(errors) = library.register_file(file) {
                    diagnostics.extend(errors);
                }
            }
            Err(err) => {
                syntax_failed = true;
                diagnostics.push(err.into());
            }
        }
    }

    // A file that failed to parse contributes no units, so elaborating the
    // rest would mostly report its missing entities.
    let mut graph = None;
    if !syntax_failed {
        let registered_cleanly = !diagnostics.iter().any(Diagnostic::is_error);
        match elaborate(&library, top, options, &interner) {
            Ok(elaboration) => {
                diagnostics.extend(elaboration.diagnostics);
                graph = registered_cleanly.then_some(elaboration.graph);
            }
            Err(errors) => diagnostics.extend(errors),
        }
    }

    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    PipelineResult {
        graph,
        diagnostics,
        has_errors: error_count > 0,
        error_count,
        warning_count,
        source_db,
    }
}
