// src/batch.rs
//! Batch conversion of many input documents in one call.
//!
//! Runs import -> render -> export sequentially per file, synchronously on
//! the calling thread (batch jobs have no preview to keep responsive).
//! A failing file is recorded and skipped; the batch carries on.

use crate::config::RenderConfig;
use crate::error::PipelineError;
use crate::export::{ExportFormat, export_pages};
use crate::import::import_file;
use crate::renderer::{HandwritingRenderer, PageSet};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Outcome of one input file within a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub result: Result<Vec<PathBuf>, PipelineError>,
}

/// Summary of a finished batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

/// Converts every input document to handwriting pages in `output_dir`.
///
/// Output files take the input's stem: `essay.txt` exported as PDF becomes
/// `output_dir/essay.pdf`. The whole batch only fails when the output
/// directory cannot be created.
pub fn run_batch(
    renderer: &dyn HandwritingRenderer,
    config: &RenderConfig,
    inputs: &[PathBuf],
    output_dir: &Path,
    format: ExportFormat,
) -> Result<BatchReport, PipelineError> {
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for input in inputs {
        let result = convert_one(renderer, config, input, output_dir, format);
        if let Err(err) = &result {
            warn!("[BATCH] {} failed: {}", input.display(), err);
        }
        report.entries.push(BatchEntry {
            input: input.clone(),
            result,
        });
    }

    info!(
        "[BATCH] {} succeeded, {} failed of {} file(s)",
        report.succeeded(),
        report.failed(),
        report.entries.len()
    );
    Ok(report)
}

fn convert_one(
    renderer: &dyn HandwritingRenderer,
    config: &RenderConfig,
    input: &Path,
    output_dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, PipelineError> {
    let text = import_file(input)?;
    let pages = renderer
        .render(&text, config)?
        .collect::<Result<PageSet, _>>()
        .map_err(|err| match err {
            PipelineError::Render(message) => PipelineError::from_renderer(message),
            other => other,
        })?;
    if pages.is_empty() {
        return Err(PipelineError::EmptyResult);
    }

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    export_pages(&pages, &output_dir.join(stem), format)
}
