//! Derived rows and the render payload handed to front ends.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::query::{ComorbidityStat, ForecastQuery, QueryId};

/// Total dose of the selected medication on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub total_dose: f64,
    /// `None` until the window has seen enough points.
    pub moving_average: Option<f64>,
}

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Raw uniform sample multiplied by the predicted-comorbidity factor.
    pub adjusted_dose: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A labeled line on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub style: LineStyle,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(name: impl Into<String>, style: LineStyle, points: Vec<SeriesPoint>) -> Self {
        Self {
            name: name.into(),
            style,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Sum of all point values.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

/// Everything a renderer needs to draw the consumption chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Raw daily totals.
    pub daily: Series,
    /// Trailing moving average, only where defined.
    pub moving_average: Series,
    /// Adjusted forecast samples, drawn dashed.
    pub forecast: Series,
}

impl ChartPayload {
    /// The three series in drawing order.
    pub fn series(&self) -> [&Series; 3] {
        [&self.daily, &self.moving_average, &self.forecast]
    }

    /// Earliest and latest date across all series, if any point exists.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self
            .series()
            .into_iter()
            .flat_map(|s| s.points.iter().map(|p| p.date));
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Largest value across all series, or `0.0` when the chart is empty.
    pub fn max_value(&self) -> f64 {
        self.series()
            .into_iter()
            .flat_map(|s| s.points.iter().map(|p| p.value))
            .fold(0.0, f64::max)
    }
}

/// Scalar results shown next to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub comorbidity_stat: ComorbidityStat,
    /// Population mean or median of all patients' scores.
    pub comorbidity_value: f64,
    /// Sum of adjusted forecast samples. `None` when no data was selected.
    pub forecast_total: Option<f64>,
    /// Last observed date for the medication. `None` when no data was selected.
    pub anchor_date: Option<NaiveDate>,
}

/// The full result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub query_id: QueryId,
    pub query: ForecastQuery,
    pub aggregates: Vec<DailyAggregate>,
    pub forecast: Vec<ForecastPoint>,
    pub chart: ChartPayload,
    pub stats: DashboardStats,
    pub summary: String,
}

impl Dashboard {
    /// False when the medication matched no events.
    pub fn has_data(&self) -> bool {
        !self.aggregates.is_empty()
    }
}
