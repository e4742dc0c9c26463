//! Chart descriptions and input validation.

use bank_model::SummarySeries;
use bank_stats::Bins;

use crate::error::{ChartError, Result};

/// Metadata shared by every chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// One entry per drawn series or sample; missing entries draw unlabelled.
    pub legend: Vec<String>,
    /// File name inside the renderer's output directory.
    pub file_name: String,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            legend: Vec::new(),
            file_name: file_name.into(),
        }
    }

    #[must_use]
    pub fn with_axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    #[must_use]
    pub fn with_legend<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legend = entries.into_iter().map(Into::into).collect();
        self
    }
}

/// What to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartShape {
    /// Two aligned series stacked per label, `lower` at the bottom.
    StackedBar {
        lower: SummarySeries,
        upper: SummarySeries,
    },
    /// One series, one colour per bar.
    Bar { series: SummarySeries },
    /// Cumulative normalized histogram per sample; later samples translucent.
    CumulativeHistogram { samples: Vec<Vec<f64>>, bins: Bins },
    /// Density histograms drawn on top of each other with transparency.
    OverlaidHistogram {
        samples: Vec<Vec<f64>>,
        bins: usize,
        /// Visible x window; bars are clipped to it.
        x_range: Option<(f64, f64)>,
        /// Upper bound of the y axis.
        y_max: Option<f64>,
    },
}

impl ChartShape {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StackedBar { .. } => "stacked bar",
            Self::Bar { .. } => "bar",
            Self::CumulativeHistogram { .. } => "cumulative histogram",
            Self::OverlaidHistogram { .. } => "overlaid histogram",
        }
    }

    /// Reject input that would produce a misleading or empty chart.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::StackedBar { lower, upper } => {
                check_series("lower", lower)?;
                check_series("upper", upper)?;
                if lower.labels() != upper.labels() {
                    return Err(ChartError::invalid(
                        "stacked series do not share the same labels in the same order",
                    ));
                }
                Ok(())
            }
            Self::Bar { series } => check_series("bar", series),
            Self::CumulativeHistogram { samples, .. } => check_samples(samples),
            Self::OverlaidHistogram {
                samples,
                bins,
                x_range,
                y_max,
            } => {
                check_samples(samples)?;
                if *bins == 0 {
                    return Err(ChartError::invalid("histogram needs at least one bin"));
                }
                if let Some((low, high)) = x_range
                    && !(low.is_finite() && high.is_finite() && low < high)
                {
                    return Err(ChartError::invalid(format!(
                        "x range [{low}, {high}] is empty"
                    )));
                }
                if let Some(y_max) = y_max
                    && !(y_max.is_finite() && *y_max > 0.0)
                {
                    return Err(ChartError::invalid(format!("y max {y_max} is not positive")));
                }
                Ok(())
            }
        }
    }
}

fn check_series(name: &str, series: &SummarySeries) -> Result<()> {
    if series.is_empty() {
        return Err(ChartError::invalid(format!("{name} series is empty")));
    }
    let undefined = series.undefined_labels();
    if !undefined.is_empty() {
        return Err(ChartError::invalid(format!(
            "{name} series has undefined values for: {}",
            undefined.join(", ")
        )));
    }
    Ok(())
}

fn check_samples(samples: &[Vec<f64>]) -> Result<()> {
    if samples.is_empty() {
        return Err(ChartError::invalid("no samples to plot"));
    }
    for (idx, sample) in samples.iter().enumerate() {
        if sample.is_empty() {
            return Err(ChartError::invalid(format!("sample {idx} is empty")));
        }
        if sample.iter().any(|value| !value.is_finite()) {
            return Err(ChartError::invalid(format!(
                "sample {idx} contains non-finite values"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: &[(&str, f64)]) -> SummarySeries {
        entries.iter().map(|&(label, value)| (label, value)).collect()
    }

    #[test]
    fn stacked_series_must_align() {
        let shape = ChartShape::StackedBar {
            lower: series(&[("admin.", 40.0), ("student", 10.0)]),
            upper: series(&[("student", 90.0), ("admin.", 60.0)]),
        };
        assert!(matches!(shape.validate(), Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn nan_values_are_rejected() {
        let shape = ChartShape::Bar {
            series: series(&[("no", f64::NAN), ("yes", 50.0)]),
        };
        let err = shape.validate().unwrap_err();
        assert!(err.to_string().contains("no"));
    }

    #[test]
    fn empty_window_is_rejected() {
        let shape = ChartShape::OverlaidHistogram {
            samples: vec![vec![1.0, 2.0]],
            bins: 10,
            x_range: Some((5.0, 5.0)),
            y_max: None,
        };
        assert!(shape.validate().is_err());
    }

    #[test]
    fn spec_builder_sets_metadata() {
        let spec = ChartSpec::new("Housing loans by job", "bar_chart_housing_job.png")
            .with_axes("Job", "Share (%)")
            .with_legend(["Yes", "No"]);
        assert_eq!(spec.legend, vec!["Yes", "No"]);
        assert_eq!(spec.y_label, "Share (%)");
    }
}
