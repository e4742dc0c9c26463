//! PNG rendering with the plotters bitmap backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use bank_model::SummarySeries;
use bank_stats::{Bins, Histogram};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::error::{ChartError, Result};
use crate::shape::{ChartShape, ChartSpec};

/// Image size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1200, 800);

const FONT: &str = "sans-serif";

/// Categorical palette; the first two colours carry two-series charts.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

fn color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Renders charts into a fixed output directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            size: DEFAULT_SIZE,
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Draw `shape` to `<output_dir>/<spec.file_name>` and return the path.
    ///
    /// The output directory is created if missing. Input is validated before
    /// anything touches the filesystem.
    pub fn render(&self, spec: &ChartSpec, shape: &ChartShape) -> Result<PathBuf> {
        shape.validate()?;
        if spec.file_name.is_empty() {
            return Err(ChartError::invalid("chart file name is empty"));
        }

        fs::create_dir_all(&self.output_dir).map_err(|source| ChartError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.output_dir.join(&spec.file_name);
        let start = Instant::now();

        {
            let root = BitMapBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(ChartError::drawing)?;
            match shape {
                ChartShape::StackedBar { lower, upper } => {
                    draw_bars(&root, spec, &[lower, upper], true)?;
                }
                ChartShape::Bar { series } => draw_bars(&root, spec, &[series], false)?,
                ChartShape::CumulativeHistogram { samples, bins } => {
                    draw_cumulative(&root, spec, samples, *bins)?;
                }
                ChartShape::OverlaidHistogram {
                    samples,
                    bins,
                    x_range,
                    y_max,
                } => draw_overlaid(&root, spec, samples, *bins, *x_range, *y_max)?,
            }
            root.present().map_err(ChartError::drawing)?;
        }

        if !path.exists() {
            return Err(ChartError::Io {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "image was not written"),
            });
        }
        info!(
            path = %path.display(),
            shape = shape.kind(),
            duration_ms = start.elapsed().as_millis(),
            "saved chart"
        );
        Ok(path)
    }
}

/// Bars per label. With `stacked`, each series sits on top of the previous
/// one; otherwise a single series is drawn with one colour per bar.
fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    series: &[&SummarySeries],
    stacked: bool,
) -> Result<()> {
    let labels = series[0].labels();
    let bars = labels.len();
    let mut tops = vec![0.0f64; bars];
    for item in series {
        for (top, value) in tops.iter_mut().zip(item.values()) {
            *top += value.max(0.0);
        }
    }
    let y_max = tops.iter().copied().fold(0.0, f64::max).max(f64::EPSILON) * 1.05;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 32))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(70)
        .build_cartesian_2d((0..bars).into_segmented(), 0.0..y_max)
        .map_err(ChartError::drawing)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&spec.x_label)
        .y_desc(&spec.y_label)
        .x_labels(bars + 1)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(idx) => {
                labels.get(*idx).map(ToString::to_string).unwrap_or_default()
            }
            _ => String::new(),
        })
        .x_label_style((FONT, 14))
        .axis_desc_style((FONT, 20))
        .draw()
        .map_err(ChartError::drawing)?;

    let mut base = vec![0.0f64; bars];
    for (series_idx, item) in series.iter().enumerate() {
        let rects: Vec<_> = item
            .values()
            .into_iter()
            .enumerate()
            .map(|(idx, value)| {
                let fill = if stacked { color(series_idx) } else { color(idx) };
                let bottom = base[idx];
                let top = bottom + value.max(0.0);
                base[idx] = top;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(idx), bottom), (SegmentValue::Exact(idx + 1), top)],
                    fill.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            })
            .collect();

        let drawn = chart.draw_series(rects).map_err(ChartError::drawing)?;
        if stacked && let Some(name) = spec.legend.get(series_idx) {
            let fill = color(series_idx);
            drawn
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], fill.filled()));
        }
    }

    if stacked && !spec.legend.is_empty() {
        draw_legend(&mut chart)?;
    }
    debug!(bars, series = series.len(), "drew bar chart");
    Ok(())
}

/// Cumulative normalized histograms; every sample is binned over its own range.
fn draw_cumulative<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    samples: &[Vec<f64>],
    bins: Bins,
) -> Result<()> {
    let histograms = samples
        .iter()
        .map(|sample| {
            Histogram::new(sample, bins).map_err(|err| ChartError::invalid(err.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    let (x_min, x_max) = edge_span(&histograms);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..1.05)
        .map_err(ChartError::drawing)?;
    configure_numeric_mesh(&mut chart, spec)?;

    for (idx, histogram) in histograms.iter().enumerate() {
        let alpha = if idx == 0 { 1.0 } else { 0.5 };
        let fill = color(idx).mix(alpha);
        let rects: Vec<_> = histogram
            .edges()
            .windows(2)
            .zip(histogram.cumulative())
            .map(|(edge, share)| Rectangle::new([(edge[0], 0.0), (edge[1], share)], fill.filled()))
            .collect();
        let drawn = chart.draw_series(rects).map_err(ChartError::drawing)?;
        if let Some(name) = spec.legend.get(idx) {
            drawn
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], fill.filled()));
        }
    }

    if !spec.legend.is_empty() {
        draw_legend(&mut chart)?;
    }
    Ok(())
}

/// Density histograms over a shared view, clipped to `x_range` and `y_max`.
fn draw_overlaid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    samples: &[Vec<f64>],
    bins: usize,
    x_range: Option<(f64, f64)>,
    y_max: Option<f64>,
) -> Result<()> {
    let histograms = samples
        .iter()
        .map(|sample| {
            Histogram::new(sample, Bins::Count(bins))
                .map_err(|err| ChartError::invalid(err.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    let densities: Vec<Vec<f64>> = histograms.iter().map(Histogram::density).collect();

    let (x_min, x_max) = x_range.unwrap_or_else(|| edge_span(&histograms));
    let y_top = y_max.unwrap_or_else(|| {
        densities
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
            .max(f64::EPSILON)
            * 1.05
    });

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, 0.0..y_top)
        .map_err(ChartError::drawing)?;
    configure_numeric_mesh(&mut chart, spec)?;

    for (idx, (histogram, density)) in histograms.iter().zip(&densities).enumerate() {
        let fill = color(idx).mix(0.5);
        let rects: Vec<_> = histogram
            .edges()
            .windows(2)
            .zip(density)
            .filter_map(|(edge, &height)| {
                let left = edge[0].max(x_min);
                let right = edge[1].min(x_max);
                (left < right && height > 0.0)
                    .then(|| Rectangle::new([(left, 0.0), (right, height.min(y_top))], fill.filled()))
            })
            .collect();
        let drawn = chart.draw_series(rects).map_err(ChartError::drawing)?;
        if let Some(name) = spec.legend.get(idx) {
            drawn
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], fill.filled()));
        }
    }

    if !spec.legend.is_empty() {
        draw_legend(&mut chart)?;
    }
    Ok(())
}

fn configure_numeric_mesh<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    spec: &ChartSpec,
) -> Result<()> {
    chart
        .configure_mesh()
        .x_desc(&spec.x_label)
        .y_desc(&spec.y_label)
        .label_style((FONT, 16))
        .axis_desc_style((FONT, 20))
        .draw()
        .map_err(ChartError::drawing)
}

fn draw_legend<'a, DB: DrawingBackend + 'a, CT: CoordTranslate>(
    chart: &mut ChartContext<'a, DB, CT>,
) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 18))
        .draw()
        .map_err(ChartError::drawing)
}

/// Smallest and largest edge across histograms.
fn edge_span(histograms: &[Histogram]) -> (f64, f64) {
    histograms
        .iter()
        .flat_map(|histogram| {
            let edges = histogram.edges();
            [edges[0], edges[edges.len() - 1]]
        })
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), edge| {
            (low.min(edge), high.max(edge))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        assert_eq!(color(0), RGBColor(31, 119, 180));
        assert_eq!(color(1), RGBColor(255, 127, 14));
        assert_eq!(color(10), color(0));
    }

    #[test]
    fn edge_span_covers_every_histogram() {
        let first = Histogram::new(&[1.0, 4.0], Bins::Count(3)).unwrap();
        let second = Histogram::new(&[-2.0, 2.0], Bins::Count(2)).unwrap();
        assert_eq!(edge_span(&[first, second]), (-2.0, 4.0));
    }
}
