//! Renderer-neutral chart descriptions built from computed metrics.

use crate::domain::{EerEstimate, OrientationStream, RateCurve, RateTable, ReportBody};

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Connected line with a marker at each sample.
    Line,
    /// Markers only.
    Scatter,
    /// Highlighted point(s), e.g. the EER.
    Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub label: String,
    pub kind: SeriesKind,
    pub points: Vec<(f64, f64)>,
}

impl NamedSeries {
    pub fn new(label: impl Into<String>, kind: SeriesKind, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            kind,
            points,
        }
    }
}

/// One chart: axis labels, optional fixed ranges, and its series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fixed x range; `None` fits the data.
    pub x_range: Option<(f64, f64)>,
    /// Fixed y range; `None` fits the data (with padding).
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<NamedSeries>,
}

impl ChartData {
    fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x_range: None,
            y_range: None,
            series: Vec::new(),
        }
    }

    /// Plot bounds: fixed ranges when set, otherwise the data range with the
    /// y range padded by 5%.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let x = self
            .x_range
            .or_else(|| self.data_x_range())
            .unwrap_or_else(|| fallback_range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0))));
        let y = match self.y_range {
            Some(r) => r,
            None => {
                let (lo, hi) = self
                    .data_y_range()
                    .unwrap_or_else(|| fallback_range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1))));
                pad_range(lo, hi, 0.05)
            }
        };
        (x, y)
    }

    /// `(min, max)` over all x values, if any are finite and distinct.
    pub fn data_x_range(&self) -> Option<(f64, f64)> {
        finite_range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))
    }

    /// `(min, max)` over all y values, if any are finite and distinct.
    pub fn data_y_range(&self) -> Option<(f64, f64)> {
        finite_range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)))
    }
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

/// Range for data that has no spread: center a unit window on the value.
fn fallback_range(mut values: impl Iterator<Item = f64>) -> (f64, f64) {
    match values.find(|v| v.is_finite()) {
        Some(v) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn zip_points(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter().copied().zip(ys.iter().copied()).collect()
}

fn eer_marker(eer: &EerEstimate) -> NamedSeries {
    NamedSeries::new(
        format!("EER ({:.2}, {:.2})", eer.threshold, eer.rate),
        SeriesKind::Marker,
        vec![(eer.threshold, eer.rate)],
    )
}

/// Two rate curves vs threshold with the EER marked.
pub fn crossing_chart(thresholds: &[f64], curve_a: &RateCurve, curve_b: &RateCurve, eer: &EerEstimate) -> ChartData {
    let mut chart = ChartData::new(
        &format!("{} and {} vs threshold", curve_a.label, curve_b.label),
        "threshold",
        "rate",
    );
    chart.series.push(NamedSeries::new(
        curve_a.label.clone(),
        SeriesKind::Line,
        zip_points(thresholds, &curve_a.values),
    ));
    chart.series.push(NamedSeries::new(
        curve_b.label.clone(),
        SeriesKind::Line,
        zip_points(thresholds, &curve_b.values),
    ));
    chart.series.push(eer_marker(eer));
    chart
}

/// TPR, FPR and FNR vs threshold with the direct EER marked (when present).
pub fn rates_chart(table: &RateTable, eer: Option<&EerEstimate>) -> ChartData {
    let thresholds = table.thresholds();
    let mut chart = ChartData::new("TPR, FPR and FNR vs threshold", "threshold", "rate");
    chart.series.push(NamedSeries::new("TPR", SeriesKind::Line, zip_points(&thresholds, &table.tpr())));
    chart.series.push(NamedSeries::new("FPR", SeriesKind::Line, zip_points(&thresholds, &table.fpr())));
    chart.series.push(NamedSeries::new("FNR", SeriesKind::Line, zip_points(&thresholds, &table.fnr())));
    if let Some(eer) = eer {
        chart.series.push(eer_marker(eer));
    }
    chart
}

/// ROC curve: TPR against FPR, one point per threshold.
pub fn roc_chart(table: &RateTable) -> ChartData {
    let mut chart = ChartData::new("ROC curve", "FPR", "TPR");
    let points = table.roc_points().iter().map(|p| (p.fpr, p.tpr)).collect();
    chart.series.push(NamedSeries::new("ROC", SeriesKind::Line, points));
    chart
}

/// Per-threshold `(FPR + FNR) / 2`.
pub fn error_mean_chart(table: &RateTable) -> ChartData {
    let mut chart = ChartData::new("EER vs threshold", "threshold", "(FPR+FNR)/2");
    chart.series.push(NamedSeries::new(
        "EER",
        SeriesKind::Line,
        zip_points(&table.thresholds(), &table.error_mean()),
    ));
    chart
}

/// Quaternion components vs sample index for every stream.
pub fn orientation_chart(streams: &[OrientationStream]) -> ChartData {
    let mut chart = ChartData::new("Normalized quaternion orientation", "index", "component");
    chart.y_range = Some((-1.1, 1.1));
    for stream in streams {
        for (c, name) in ["W", "X", "Y", "Z"].iter().enumerate() {
            let points = stream
                .samples
                .iter()
                .enumerate()
                .map(|(i, s)| (i as f64, s.components()[c]))
                .collect();
            chart
                .series
                .push(NamedSeries::new(format!("{} - {name}", stream.label), SeriesKind::Line, points));
        }
    }
    chart
}

/// Every chart a saved report can show.
pub fn report_charts(body: &ReportBody) -> Vec<ChartData> {
    match body {
        ReportBody::Crossing {
            thresholds,
            curve_a,
            curve_b,
            eer,
        } => vec![crossing_chart(thresholds, curve_a, curve_b, eer)],
        ReportBody::Rates { table, eer, .. } => {
            vec![roc_chart(table), rates_chart(table, eer.as_ref()), error_mean_chart(table)]
        }
        ReportBody::Orientation { streams, .. } => vec![orientation_chart(streams)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfusionRow, OrientationSample};
    use crate::eer::{EerOptions, estimate_direct};
    use crate::rates::convert_counts;

    #[test]
    fn rates_chart_has_marker_at_eer() {
        let rows = [ConfusionRow::new(0.60, 7, 2, 1), ConfusionRow::new(0.65, 5, 3, 1)];
        let table = convert_counts(&rows, 150.0).unwrap();
        let eer = estimate_direct(&table.thresholds(), &table.fpr(), &table.fnr(), EerOptions::default()).unwrap();
        let chart = rates_chart(&table, Some(&eer));

        assert_eq!(chart.series.len(), 4);
        let marker = &chart.series[3];
        assert_eq!(marker.kind, SeriesKind::Marker);
        assert_eq!(marker.points, vec![(eer.threshold, eer.rate)]);
        assert_eq!(chart.data_x_range(), Some((0.60, 0.65)));
    }

    #[test]
    fn rates_chart_without_eer_has_no_marker() {
        let table = convert_counts(&[ConfusionRow::new(0.60, 7, 2, 1)], 150.0).unwrap();
        let chart = rates_chart(&table, None);
        assert_eq!(chart.series.len(), 3);
        assert!(chart.series.iter().all(|s| s.kind == SeriesKind::Line));
    }

    #[test]
    fn bounds_pad_data_and_respect_fixed_ranges() {
        let mut chart = ChartData::new("t", "x", "y");
        chart.series.push(NamedSeries::new("a", SeriesKind::Line, vec![(0.0, 0.0), (2.0, 1.0)]));
        let ((x0, x1), (y0, y1)) = chart.bounds();
        assert_eq!((x0, x1), (0.0, 2.0));
        assert!((y0 + 0.05).abs() < 1e-12 && (y1 - 1.05).abs() < 1e-12);

        chart.y_range = Some((-1.1, 1.1));
        assert_eq!(chart.bounds().1, (-1.1, 1.1));

        let single = {
            let mut c = ChartData::new("t", "x", "y");
            c.series.push(NamedSeries::new("p", SeriesKind::Scatter, vec![(3.0, 0.2)]));
            c
        };
        assert_eq!(single.bounds().0, (2.5, 3.5));
    }

    #[test]
    fn orientation_chart_has_four_components_per_stream() {
        let stream = OrientationStream {
            label: "Watch".to_string(),
            samples: vec![OrientationSample::new(1.0, 0.0, 0.0, 0.0), OrientationSample::new(0.0, 1.0, 0.0, 0.0)],
        };
        let chart = orientation_chart(&[stream.clone(), stream]);
        assert_eq!(chart.series.len(), 8);
        assert_eq!(chart.series[1].label, "Watch - X");
        assert_eq!(chart.series[1].points, vec![(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(chart.y_range, Some((-1.1, 1.1)));
    }
}
