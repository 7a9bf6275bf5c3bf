//! Box plot rasterizer.
//!
//! Draws the two-cohort box plot with tiny-skia: a box from P25 to P75, a
//! median line, and whiskers out to the smallest and largest sanitized
//! values. Both boxes share one y-scale padded by 5% of the data range.
//! Text is left to whoever frames the image.

use image::RgbaImage;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::{ChartSurface, ExportError};
use crate::cohort::Cohort;
use crate::refresh::{CohortView, DashboardSnapshot};
use crate::stats::SummaryStats;

/// Fraction of the data range added above and below the plotted values.
const Y_PADDING: f64 = 0.05;

/// Plot area as fractions of the canvas (left, top, right, bottom).
const PLOT_AREA: (f32, f32, f32, f32) = (0.08, 0.05, 0.97, 0.90);

/// Box width as a fraction of one cohort's horizontal slot.
const BOX_WIDTH: f32 = 0.4;

const AXIS_RGBA: (u8, u8, u8, u8) = (90, 90, 90, 255);
const GRID_RGBA: (u8, u8, u8, u8) = (225, 225, 225, 255);

/// Five-number summary of one cohort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl BoxSummary {
    /// Build from sanitized values and their stats. `None` for an empty
    /// cohort.
    pub fn from_values(values: &[f64], stats: &SummaryStats) -> Option<Self> {
        let min = values.iter().copied().min_by(f64::total_cmp)?;
        let max = values.iter().copied().max_by(f64::total_cmp)?;

        Some(Self {
            min,
            p25: stats.p25?,
            median: stats.median?,
            p75: stats.p75?,
            max,
        })
    }
}

/// The box plot surface for one committed cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotSurface {
    boxes: [(Cohort, Option<BoxSummary>); 2],
}

impl BoxPlotSurface {
    pub fn from_view(view: &CohortView) -> Self {
        Self {
            boxes: Cohort::ALL.map(|cohort| {
                let summary =
                    BoxSummary::from_values(view.outcomes.get(cohort), view.stats.get(cohort));
                (cohort, summary)
            }),
        }
    }

    /// Surface for the latest committed data.
    ///
    /// Fails with [`ExportError::NothingToExport`] unless the snapshot holds
    /// a ready view.
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Result<Self, ExportError> {
        snapshot
            .view()
            .map(Self::from_view)
            .ok_or(ExportError::NothingToExport)
    }

    pub fn summary(&self, cohort: Cohort) -> Option<&BoxSummary> {
        self.boxes
            .iter()
            .find(|(c, _)| *c == cohort)
            .and_then(|(_, s)| s.as_ref())
    }

    /// Shared y-range with padding, or `None` when nothing is plotted.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let summaries = self.boxes.iter().filter_map(|(_, s)| s.as_ref());
        let (lo, hi) = summaries.fold(None, |acc: Option<(f64, f64)>, s| match acc {
            None => Some((s.min, s.max)),
            Some((lo, hi)) => Some((lo.min(s.min), hi.max(s.max))),
        })?;

        // Halved so that extreme values cannot overflow the span.
        let half_span = hi / 2.0 - lo / 2.0;
        let pad = if half_span > 0.0 {
            half_span * (2.0 * Y_PADDING)
        } else {
            lo.abs().max(1.0) * Y_PADDING
        };
        let bottom = (lo - pad).max(f64::MIN);
        let top = (hi + pad).min(f64::MAX);
        Some((bottom, top))
    }
}

fn cohort_rgb(cohort: Cohort) -> (u8, u8, u8) {
    match cohort {
        Cohort::Disease => (214, 84, 76),
        Cohort::NonDisease => (70, 130, 200),
    }
}

fn solid(rgba: (u8, u8, u8, u8)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(rgba.0, rgba.1, rgba.2, rgba.3));
    paint.anti_alias = true;
    paint
}

fn line(pixmap: &mut Pixmap, from: (f32, f32), to: (f32, f32), paint: &Paint, width: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(
            &path,
            paint,
            &Stroke {
                width,
                ..Default::default()
            },
            Transform::identity(),
            None,
        );
    }
}

impl ChartSurface for BoxPlotSurface {
    fn has_content(&self) -> bool {
        self.boxes.iter().any(|(_, s)| s.is_some())
    }

    fn render(&self, width: u32, height: u32) -> Result<RgbaImage, ExportError> {
        let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::InvalidSize { width, height })?;
        pixmap.fill(Color::WHITE);

        let (w, h) = (width as f32, height as f32);
        let (left, top) = (PLOT_AREA.0 * w, PLOT_AREA.1 * h);
        let (right, bottom) = (PLOT_AREA.2 * w, PLOT_AREA.3 * h);

        let grid = solid(GRID_RGBA);
        for i in 1..5 {
            let y = top + (bottom - top) * i as f32 / 5.0;
            line(&mut pixmap, (left, y), (right, y), &grid, 1.0);
        }

        let axis = solid(AXIS_RGBA);
        line(&mut pixmap, (left, top), (left, bottom), &axis, 1.5);
        line(&mut pixmap, (left, bottom), (right, bottom), &axis, 1.5);

        let Some((lo, hi)) = self.y_range() else {
            return image_from_pixmap(pixmap);
        };
        let to_y = |v: f64| {
            let fraction = (v / 2.0 - lo / 2.0) / (hi / 2.0 - lo / 2.0);
            bottom - fraction as f32 * (bottom - top)
        };

        let slot = (right - left) / self.boxes.len() as f32;
        for (i, (cohort, summary)) in self.boxes.iter().enumerate() {
            let Some(s) = summary else { continue };

            let (r, g, b) = cohort_rgb(*cohort);
            let edge = solid((r, g, b, 255));
            let fill = solid((r, g, b, 90));

            let center = left + slot * (i as f32 + 0.5);
            let half = slot * BOX_WIDTH / 2.0;
            let cap = half / 2.0;

            // Whiskers and caps
            line(&mut pixmap, (center, to_y(s.min)), (center, to_y(s.p25)), &edge, 1.5);
            line(&mut pixmap, (center, to_y(s.p75)), (center, to_y(s.max)), &edge, 1.5);
            line(&mut pixmap, (center - cap, to_y(s.min)), (center + cap, to_y(s.min)), &edge, 1.5);
            line(&mut pixmap, (center - cap, to_y(s.max)), (center + cap, to_y(s.max)), &edge, 1.5);

            // Box, drawn at least one pixel tall so a zero-IQR cohort stays visible.
            let (box_top, box_bottom) = (to_y(s.p75), to_y(s.p25).max(to_y(s.p75) + 1.0));
            if let Some(rect) = Rect::from_ltrb(center - half, box_top, center + half, box_bottom) {
                pixmap.fill_rect(rect, &fill, Transform::identity(), None);
                let path = PathBuilder::from_rect(rect);
                pixmap.stroke_path(
                    &path,
                    &edge,
                    &Stroke {
                        width: 1.5,
                        ..Default::default()
                    },
                    Transform::identity(),
                    None,
                );
            }

            line(
                &mut pixmap,
                (center - half, to_y(s.median)),
                (center + half, to_y(s.median)),
                &edge,
                3.0,
            );
        }

        image_from_pixmap(pixmap)
    }
}

/// Convert an opaque pixmap to an image buffer.
///
/// The canvas is filled white before drawing, so premultiplied and straight
/// alpha coincide.
fn image_from_pixmap(pixmap: Pixmap) -> Result<RgbaImage, ExportError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| ExportError::Encode("pixel buffer size mismatch".to_string()))
}
