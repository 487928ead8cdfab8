// src/export.rs
//! Writes a completed page set to disk.
//!
//! Raster formats produce one numbered file per page; PDF and DOCX combine
//! all pages into a single document. Pixel dimensions are interpreted at
//! 96 dpi when a physical page size is needed.

use crate::error::PipelineError;
use crate::renderer::{PageImage, PageSet};
use docx_rs::{BreakType, Docx, Paragraph, Pic, Run};
use image::{DynamicImage, ImageFormat};
use log::info;
use printpdf::image::RawImage;
use printpdf::ops::Op;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, XObjectId};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

const PX_PER_INCH: f32 = 96.0;
const PT_PER_INCH: f32 = 72.0;
const MM_PER_INCH: f32 = 25.4;

/// Word export embeds each page at this width, scaled proportionally.
const DOCX_IMAGE_WIDTH_EMU: u32 = 6 * 914_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
    Docx,
}

impl ExportFormat {
    /// Infers the format from a target path's extension.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            other => Err(PipelineError::UnsupportedFormat(format!(
                "cannot export to .{other}"
            ))),
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

/// Writes `pages` to files derived from `target` and returns their paths.
///
/// For raster formats `target`'s stem seeds per-page names
/// (`stem_page_1.png`, ...); for PDF and DOCX a single file is written at
/// `target` with the proper extension.
pub fn export_pages(
    pages: &PageSet,
    target: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, PipelineError> {
    if pages.is_empty() {
        return Err(PipelineError::Export("no pages to export".to_string()));
    }

    let paths = match format {
        ExportFormat::Png | ExportFormat::Jpeg => export_raster(pages, target, format)?,
        ExportFormat::Pdf => vec![export_pdf(pages, target)?],
        ExportFormat::Docx => vec![export_docx(pages, target)?],
    };

    info!(
        "[EXPORT] Wrote {} file(s) for {} page(s) to {}",
        paths.len(),
        pages.len(),
        target.display()
    );
    Ok(paths)
}

fn export_raster(
    pages: &PageSet,
    target: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, PipelineError> {
    let stem = target
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");
    let dir = target.parent().unwrap_or_else(|| Path::new(""));

    let mut paths = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        let path = dir.join(format!("{stem}_page_{}.{}", i + 1, format.extension()));
        match format {
            ExportFormat::Png => page
                .save_with_format(&path, ImageFormat::Png)
                .map_err(|e| PipelineError::Export(e.to_string()))?,
            ExportFormat::Jpeg => {
                // The JPEG encoder has no alpha channel; flatten first.
                DynamicImage::ImageRgba8(page.clone())
                    .to_rgb8()
                    .save_with_format(&path, ImageFormat::Jpeg)
                    .map_err(|e| PipelineError::Export(e.to_string()))?
            }
            _ => unreachable!(),
        }
        paths.push(path);
    }
    Ok(paths)
}

fn export_pdf(pages: &PageSet, target: &Path) -> Result<PathBuf, PipelineError> {
    let path = target.with_extension("pdf");
    let mut document = PdfDocument::new("Handwritten pages");

    for page in pages {
        let png = encode_png(page)?;
        let mut warnings = Vec::new();
        let raw = RawImage::decode_from_bytes(&png, &mut warnings)
            .map_err(|e| PipelineError::Export(format!("failed to decode page image: {e}")))?;
        let (img_w, img_h) = (raw.width as f32, raw.height as f32);

        let xobj_id = XObjectId::new();
        document
            .resources
            .xobjects
            .map
            .insert(xobj_id.clone(), XObject::Image(raw));

        let page_w_pt = img_w / PX_PER_INCH * PT_PER_INCH;
        let page_h_pt = img_h / PX_PER_INCH * PT_PER_INCH;
        let transform = XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            scale_x: Some(page_w_pt / img_w),
            scale_y: Some(page_h_pt / img_h),
            rotate: None,
            dpi: Some(72.0),
        };
        let ops = vec![Op::UseXobject {
            id: xobj_id,
            transform,
        }];

        let width_mm = Mm(img_w / PX_PER_INCH * MM_PER_INCH);
        let height_mm = Mm(img_h / PX_PER_INCH * MM_PER_INCH);
        document.pages.push(PdfPage::new(width_mm, height_mm, ops));
    }

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    let mut warnings = Vec::new();
    document.save_writer(&mut writer, &PdfSaveOptions::default(), &mut warnings);
    Ok(path)
}

fn export_docx(pages: &PageSet, target: &Path) -> Result<PathBuf, PipelineError> {
    let path = target.with_extension("docx");
    let mut docx = Docx::new();

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            docx = docx
                .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        }
        let png = encode_png(page)?;
        let height_emu = (DOCX_IMAGE_WIDTH_EMU as u64 * page.height() as u64
            / page.width().max(1) as u64) as u32;
        let pic = Pic::new(&png).size(DOCX_IMAGE_WIDTH_EMU, height_emu);
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_image(pic)));
    }

    let file = File::create(&path)?;
    docx.build()
        .pack(file)
        .map_err(|e| PipelineError::Export(e.to_string()))?;
    Ok(path)
}

fn encode_png(page: &PageImage) -> Result<Vec<u8>, PipelineError> {
    let mut bytes = Vec::new();
    page.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| PipelineError::Export(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn pages(n: usize) -> PageSet {
        (0..n)
            .map(|i| RgbaImage::from_pixel(16, 24, image::Rgba([255, 255, 255, 255 - i as u8])))
            .collect()
    }

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out.PNG")).unwrap(),
            ExportFormat::Png
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.jpeg")).unwrap(),
            ExportFormat::Jpeg
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.pdf")).unwrap(),
            ExportFormat::Pdf
        );
        assert!(ExportFormat::from_path(Path::new("out.bmp")).is_err());
        assert!(ExportFormat::from_path(Path::new("out")).is_err());
    }

    #[test]
    fn empty_page_set_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_pages(&Vec::new(), &dir.path().join("out.png"), ExportFormat::Png);
        assert!(matches!(result, Err(PipelineError::Export(_))));
    }

    #[test]
    fn raster_export_writes_one_file_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let paths =
            export_pages(&pages(3), &dir.path().join("out.png"), ExportFormat::Png).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("out_page_1.png"));
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[test]
    fn jpeg_export_flattens_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let paths =
            export_pages(&pages(1), &dir.path().join("out.jpg"), ExportFormat::Jpeg).unwrap();
        let back = image::open(&paths[0]).unwrap();
        assert_eq!(back.width(), 16);
        assert_eq!(back.height(), 24);
    }

    #[test]
    fn pdf_export_combines_pages_into_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths =
            export_pages(&pages(2), &dir.path().join("out.pdf"), ExportFormat::Pdf).unwrap();
        assert_eq!(paths.len(), 1);
        let bytes = std::fs::read(&paths[0]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn docx_export_produces_a_zip_container() {
        let dir = tempfile::tempdir().unwrap();
        let paths =
            export_pages(&pages(2), &dir.path().join("out.docx"), ExportFormat::Docx).unwrap();
        assert_eq!(paths.len(), 1);
        let bytes = std::fs::read(&paths[0]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
