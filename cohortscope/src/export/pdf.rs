//! Minimal single-page PDF writer.
//!
//! Produces a PDF 1.4 document with one page holding one raster image. The
//! image is stored as a Flate-compressed DeviceRGB XObject. Page geometry is
//! given in millimetres with a top-left origin and converted to PDF points.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;

use super::ExportError;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Placement of an image on a page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

fn pt(mm: f64) -> String {
    format!("{:.2}", mm * POINTS_PER_MM)
}

/// Tracks object byte offsets for the cross-reference table.
struct PdfBuffer {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuffer {
    fn new() -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            bytes,
            offsets: Vec::new(),
        }
    }

    /// Append the next object. Objects are numbered from 1 in call order.
    fn object(&mut self, dict: &str, stream: Option<&[u8]>) {
        self.offsets.push(self.bytes.len());
        let id = self.offsets.len();
        self.bytes
            .extend_from_slice(format!("{} 0 obj\n{}\n", id, dict).as_bytes());
        if let Some(data) = stream {
            self.bytes.extend_from_slice(b"stream\n");
            self.bytes.extend_from_slice(data);
            self.bytes.extend_from_slice(b"\nendstream\n");
        }
        self.bytes.extend_from_slice(b"endobj\n");
    }

    fn finish(mut self, root: usize) -> Vec<u8> {
        let xref_offset = self.bytes.len();
        let size = self.offsets.len() + 1;

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, root, xref_offset
        ));

        self.bytes.extend_from_slice(xref.as_bytes());
        self.bytes
    }
}

/// Write a one-page PDF with `image` at `placement`.
pub fn single_image_page(image: &RgbaImage, placement: &PagePlacement) -> Result<Vec<u8>, ExportError> {
    let (width, height) = image.dimensions();

    let rgb: Vec<u8> = image
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&rgb)?;
    let compressed = encoder.finish()?;

    // PDF user space has its origin at the bottom-left.
    let bottom_mm = placement.page_height_mm - placement.y_mm - placement.height_mm;
    let content = format!(
        "q\n{} 0 0 {} {} {} cm\n/Im0 Do\nQ\n",
        pt(placement.width_mm),
        pt(placement.height_mm),
        pt(placement.x_mm),
        pt(bottom_mm)
    );

    let mut pdf = PdfBuffer::new();
    pdf.object("<< /Type /Catalog /Pages 2 0 R >>", None);
    pdf.object("<< /Type /Pages /Kids [3 0 R] /Count 1 >>", None);
    pdf.object(
        &format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>",
            pt(placement.page_width_mm),
            pt(placement.page_height_mm)
        ),
        None,
    );
    pdf.object(
        &format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode /Length {} >>",
            width,
            height,
            compressed.len()
        ),
        Some(&compressed),
    );
    pdf.object(
        &format!("<< /Length {} >>", content.len()),
        Some(content.as_bytes()),
    );

    Ok(pdf.finish(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn a4_landscape() -> PagePlacement {
        PagePlacement {
            page_width_mm: 297.0,
            page_height_mm: 210.0,
            x_mm: 10.0,
            y_mm: 10.0,
            width_mm: 270.0,
            height_mm: 150.0,
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_page_structure() {
        let img = RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        let pdf = single_image_page(&img, &a4_landscape()).unwrap();

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(find(&pdf, b"/MediaBox [0 0 841.89 595.28]").is_some());
        assert!(find(&pdf, b"/Width 4 /Height 2").is_some());
        // 270x150 mm at (10, 50) mm from the bottom-left.
        assert!(find(&pdf, b"765.35 0 0 425.20 28.35 141.73 cm").is_some());
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        let pdf = single_image_page(&img, &a4_landscape()).unwrap();

        let xref = find(&pdf, b"xref\n").unwrap();
        let table = String::from_utf8_lossy(&pdf[xref..]);
        let offsets: Vec<usize> = table
            .lines()
            .skip(3)
            .take(5)
            .map(|l| l[..10].parse().unwrap())
            .collect();

        for (i, offset) in offsets.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(pdf[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn test_image_stream_is_zlib_rgb() {
        let img = RgbaImage::from_pixel(3, 1, image::Rgba([1, 2, 3, 255]));
        let pdf = single_image_page(&img, &a4_landscape()).unwrap();

        let start = find(&pdf, b"stream\n").unwrap() + b"stream\n".len();
        let end = start + find(&pdf[start..], b"\nendstream").unwrap();

        let mut raw = Vec::new();
        ZlibDecoder::new(&pdf[start..end])
            .read_to_end(&mut raw)
            .unwrap();
        assert_eq!(raw, vec![1, 2, 3, 1, 2, 3, 1, 2, 3]);
    }
}
