//! Chart export.
//!
//! The exporter takes any [`ChartSurface`] (a stable handle to the rendered
//! box plot) and produces PNG bytes at the layout's canvas size, or a
//! single-page PDF with that raster placed at a fixed position.
//!
//! # Default layout
//!
//! | Setting | Value |
//! |---|---|
//! | Canvas | 900 × 450 px |
//! | Page | A4 landscape, 297 × 210 mm |
//! | Image placement | (10, 10) mm, 270 × 150 mm |

mod pdf;
mod render;

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::info;

pub use pdf::{single_image_page, PagePlacement};
pub use render::{BoxPlotSurface, BoxSummary};

/// Errors from rendering or encoding an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No committed cycle data to draw.
    #[error("Nothing to export: no data has been loaded")]
    NothingToExport,

    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A chart that can be rasterized for export.
pub trait ChartSurface {
    /// Whether there is anything to draw.
    fn has_content(&self) -> bool;

    /// Rasterize at the given pixel size.
    fn render(&self, width: u32, height: u32) -> Result<RgbaImage, ExportError>;
}

/// Export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// `boxplot.png` / `boxplot.pdf`
    pub fn default_filename(&self) -> String {
        format!("boxplot.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{}' (expected png or pdf)", other)),
        }
    }
}

/// Canvas size and page placement for exports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub page: PagePlacement,
}

impl ExportLayout {
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }
}

impl Default for ExportLayout {
    fn default() -> Self {
        Self {
            canvas_width: 900,
            canvas_height: 450,
            page: PagePlacement {
                page_width_mm: 297.0,
                page_height_mm: 210.0,
                x_mm: 10.0,
                y_mm: 10.0,
                width_mm: 270.0,
                height_mm: 150.0,
            },
        }
    }
}

/// Turns chart surfaces into export bytes.
pub trait ChartExporter {
    fn export_png<S: ChartSurface + ?Sized>(&self, surface: &S) -> Result<Vec<u8>, ExportError>;

    fn export_pdf<S: ChartSurface + ?Sized>(&self, surface: &S) -> Result<Vec<u8>, ExportError>;

    fn export<S: ChartSurface + ?Sized>(
        &self,
        surface: &S,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Png => self.export_png(surface),
            ExportFormat::Pdf => self.export_pdf(surface),
        }
    }
}

/// Exporter using the image crate for PNG and the built-in PDF writer.
#[derive(Debug, Clone, Default)]
pub struct StandardExporter {
    layout: ExportLayout,
}

impl StandardExporter {
    pub fn new(layout: ExportLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ExportLayout {
        &self.layout
    }

    fn rasterize<S: ChartSurface + ?Sized>(&self, surface: &S) -> Result<RgbaImage, ExportError> {
        if !surface.has_content() {
            return Err(ExportError::NothingToExport);
        }
        surface.render(self.layout.canvas_width, self.layout.canvas_height)
    }
}

impl ChartExporter for StandardExporter {
    fn export_png<S: ChartSurface + ?Sized>(&self, surface: &S) -> Result<Vec<u8>, ExportError> {
        let img = self.rasterize(surface)?;
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    fn export_pdf<S: ChartSurface + ?Sized>(&self, surface: &S) -> Result<Vec<u8>, ExportError> {
        let img = self.rasterize(surface)?;
        single_image_page(&img, &self.layout.page)
    }
}

/// Render `surface` in `format` and write it to `path`.
pub fn export_to_file<E, S>(
    exporter: &E,
    surface: &S,
    format: ExportFormat,
    path: &Path,
) -> Result<PathBuf, ExportError>
where
    E: ChartExporter,
    S: ChartSurface + ?Sized,
{
    let bytes = exporter.export(surface, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;

    info!(path = %path.display(), format = %format, bytes = bytes.len(), "Chart exported");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct SolidSurface {
        content: bool,
    }

    impl ChartSurface for SolidSurface {
        fn has_content(&self) -> bool {
            self.content
        }

        fn render(&self, width: u32, height: u32) -> Result<RgbaImage, ExportError> {
            Ok(RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255])))
        }
    }

    #[test]
    fn test_png_has_layout_size() {
        let exporter = StandardExporter::default();
        let bytes = exporter.export_png(&SolidSurface { content: true }).unwrap();

        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (900, 450));
    }

    #[test]
    fn test_custom_canvas() {
        let exporter = StandardExporter::new(ExportLayout::default().with_canvas(300, 100));
        let bytes = exporter.export_png(&SolidSurface { content: true }).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 300);
    }

    #[test]
    fn test_pdf_export() {
        let exporter = StandardExporter::default();
        let bytes = exporter
            .export(&SolidSurface { content: true }, ExportFormat::Pdf)
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_empty_surface_is_nothing_to_export() {
        let exporter = StandardExporter::default();
        let surface = SolidSurface { content: false };
        assert!(matches!(
            exporter.export_png(&surface),
            Err(ExportError::NothingToExport)
        ));
        assert!(matches!(
            exporter.export_pdf(&surface),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("svg".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Pdf.default_filename(), "boxplot.pdf");
    }

    #[test]
    fn test_export_to_file_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out").join("boxplot.png");

        let written = export_to_file(
            &StandardExporter::default(),
            &SolidSurface { content: true },
            ExportFormat::Png,
            &path,
        )
        .unwrap();

        assert_eq!(written, path);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
