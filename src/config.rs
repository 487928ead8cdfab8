// src/config.rs
//! Rendering configuration passed through to the handwriting renderer.
//!
//! The engine treats [`RenderConfig`] as an opaque bundle: its fields are
//! forwarded to the renderer unmodified. The only interpretation offered
//! here is the caller-owned precondition check ([`RenderConfig::validate`])
//! for the one combination the renderer is known to reject, and the
//! convenience auto-adjust ([`RenderConfig::ensure_line_spacing`]) mirroring
//! what the settings UI does before dispatch.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Page margins, in pixels of the output page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 105,
            bottom: 0,
            left: 86,
            right: 93,
        }
    }
}

/// The randomization sigmas that make the output look hand-written.
///
/// Each sigma independently perturbs one aspect of glyph placement inside
/// the renderer; zero disables that perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perturbations {
    pub word_spacing_sigma: f64,
    pub line_spacing_sigma: f64,
    pub font_size_sigma: f64,
    pub x_offset_sigma: f64,
    pub y_offset_sigma: f64,
    pub rotation_sigma: f64,
}

impl Default for Perturbations {
    fn default() -> Self {
        Self {
            word_spacing_sigma: 2.0,
            line_spacing_sigma: 1.0,
            font_size_sigma: 2.0,
            x_offset_sigma: 2.0,
            y_offset_sigma: 2.0,
            rotation_sigma: 0.05,
        }
    }
}

/// Everything the handwriting renderer needs to lay out a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Font family name, resolved against the [`crate::fonts::FontLibrary`].
    pub font_family: String,
    pub font_size: u32,
    pub margins: Margins,
    /// Horizontal gap between glyphs, in pixels.
    pub word_spacing: u32,
    /// Vertical distance between line baselines, in pixels. The renderer
    /// requires this to exceed `font_size`.
    pub line_spacing: u32,
    pub perturbations: Perturbations,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: 40,
            margins: Margins::default(),
            word_spacing: 5,
            line_spacing: 100,
            perturbations: Perturbations::default(),
        }
    }
}

impl RenderConfig {
    /// Checks the known-invalid combination before dispatch.
    ///
    /// This is the caller's precondition, not the pipeline's: the pipeline
    /// forwards whatever it is given and translates the renderer's failure
    /// after the fact.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.line_spacing <= self.font_size {
            return Err(PipelineError::InvalidConfiguration(format!(
                "line spacing ({}) must be greater than the font size ({})",
                self.line_spacing, self.font_size
            )));
        }
        Ok(())
    }

    /// Bumps the line spacing to 1.5x the font size when it does not exceed
    /// the font size. Returns true when an adjustment was made.
    pub fn ensure_line_spacing(&mut self) -> bool {
        if self.line_spacing <= self.font_size {
            self.line_spacing = self.font_size + self.font_size / 2;
            true
        } else {
            false
        }
    }
}
