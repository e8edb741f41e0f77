//! CLI logic for the phaseline segmentation tool.
//!
//! Loads a TOML process document, segments it into phases and writes a TOML
//! phase report.

pub mod document;
pub mod error_adapter;
pub mod report;

mod args;
mod config;

pub use args::Args;

use std::{fs, io::Write};

use log::info;

use phaseline::{PhaseSegmenter, PhaselineError};

use document::ProcessDocument;
use report::PhaseReport;

/// Run the phaseline CLI application
///
/// # Errors
///
/// Returns `PhaselineError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed process documents
pub fn run(args: &Args) -> Result<(), PhaselineError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let document = ProcessDocument::parse(&source)?;
    info!(elements = document.element_count(); "Document loaded");

    let mut graph = document.into_graph();
    let segmenter = PhaseSegmenter::new(app_config.segmenter());
    let (mode, _) = segmenter.segment(&mut graph);

    let report = PhaseReport::new(&graph, mode);
    let rendered = report.to_toml()?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path.as_str(), phases = report.phase_count(); "Phase report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
