// src/renderer.rs
//! The seam between this engine and the external handwriting renderer.
//!
//! The actual glyph-placement algorithm (jitter, metrics, perturbed line
//! wrapping) is an opaque external capability. This engine only configures
//! it, invokes it, and consumes the page sequence it produces lazily.

use crate::config::RenderConfig;
use crate::error::PipelineError;

/// A single rendered page.
pub type PageImage = image::RgbaImage;

/// The ordered output of a completed render. Ownership transfers to the
/// subscriber on delivery; pages are never mutated afterwards.
pub type PageSet = Vec<PageImage>;

/// Lazily produced page sequence. The number of pages is not known until
/// the iterator is exhausted, and any step may fail.
pub type PageIter = Box<dyn Iterator<Item = Result<PageImage, PipelineError>> + Send>;

/// A backend that turns text plus a [`RenderConfig`] into page images.
///
/// Implementations may reject a configuration either up front (from
/// `render`) or lazily from the returned iterator; the pipeline handles
/// both identically. Implementations must be shareable across the worker
/// threads the pipeline spawns.
pub trait HandwritingRenderer: Send + Sync {
    fn render(&self, text: &str, config: &RenderConfig) -> Result<PageIter, PipelineError>;
}
