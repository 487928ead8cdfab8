// src/lib.rs
//! scriven: turns plain text into images resembling handwritten pages.
//!
//! The glyph-level handwriting simulation itself is an external capability
//! consumed through the [`renderer::HandwritingRenderer`] trait; this crate
//! provides everything around it:
//!
//! - [`pipeline::RenderPipeline`]: the cancellable background render task
//!   with incremental progress and a single-subscriber notification channel
//! - [`preview::PreviewState`]: the paginated preview cache
//! - [`import`]/[`export`]: document text extraction and page-set export
//! - [`settings::SettingsStore`]: JSON configuration and preset persistence
//! - [`fonts::FontLibrary`]: font discovery for the configuration's font
//!   reference
//! - [`batch`]: many-file import/render/export runs

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod fonts;
pub mod import;
pub mod pipeline;
pub mod preview;
pub mod renderer;
pub mod settings;

pub use config::{Margins, Perturbations, RenderConfig};
pub use error::PipelineError;
pub use export::{ExportFormat, export_pages};
pub use fonts::FontLibrary;
pub use import::import_file;
pub use pipeline::{Notification, RenderPipeline, RenderRequest, TaskHandle, TaskId, TaskState};
pub use preview::{PreviewState, PreviewThrottle};
pub use renderer::{HandwritingRenderer, PageImage, PageIter, PageSet};
pub use settings::SettingsStore;
