//! The query/transform pipeline.
//!
//! One call to `Pipeline::compute` runs the whole dashboard computation:
//!
//!   Filter → Daily totals → Moving average → Comorbidity statistic
//!         → Anchor date → Forecast draw → Chart payload → Summary text
//!
//! Every step except the forecast draw is a pure function of the dataset and
//! the query. The draw goes through the pipeline's `Forecaster`.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use medcast_contracts::{
    chart::{
        ChartPayload, DailyAggregate, Dashboard, DashboardStats, ForecastPoint, LineStyle,
        Series, SeriesPoint,
    },
    dataset::{Dataset, MedicationEvent},
    error::{MedcastError, MedcastResult},
    query::{ComorbidityStat, ForecastHorizon, ForecastQuery, QueryId},
};

use crate::{stats, traits::Forecaster};

pub const DAILY_SERIES_NAME: &str = "Daily Consumption";
pub const FORECAST_SERIES_NAME: &str = "Forecasted Consumption";
pub const X_AXIS_LABEL: &str = "Date";
pub const Y_AXIS_LABEL: &str = "Consumption (Doses)";

/// Runs dashboard queries against a borrowed dataset.
///
/// The pipeline owns only its forecaster; the dataset is passed per call so a
/// single pipeline can serve any number of fixtures or generated datasets.
pub struct Pipeline {
    forecaster: Box<dyn Forecaster>,
}

impl Pipeline {
    pub fn new(forecaster: Box<dyn Forecaster>) -> Self {
        Self { forecaster }
    }

    /// Compute the dashboard for one query.
    ///
    /// An unknown or never-dispensed medication is not an error: the result
    /// carries three empty series and a "no data" summary, and the forecaster
    /// is never consulted.
    ///
    /// # Errors
    ///
    /// Only forecaster failures and calendar overflow past the anchor date.
    pub fn compute(&self, dataset: &Dataset, query: &ForecastQuery) -> MedcastResult<Dashboard> {
        let query_id = QueryId::new();

        debug!(
            query_id = %query_id,
            medication = %query.medication,
            forecast_days = query.forecast_days.days(),
            ma_window = query.ma_window.days(),
            comorbidity_stat = %query.comorbidity_stat,
            predicted_comorbidity = query.predicted_comorbidity.score(),
            "computing dashboard"
        );

        // ── Steps 1–3: filter, daily totals, moving average ──────────────────
        let aggregates = daily_aggregates(
            dataset.events_for(&query.medication),
            query.ma_window.days(),
        );

        // ── Step 4: population comorbidity statistic ─────────────────────────
        let comorbidity = comorbidity_value(dataset, query.comorbidity_stat);

        // ── Steps 5–6: anchor date and forecast draw ─────────────────────────
        let forecast = match aggregates.last() {
            None => {
                info!(
                    query_id = %query_id,
                    medication = %query.medication,
                    "no consumption data for medication; forecast skipped"
                );
                Vec::new()
            }
            Some(last) => self.forecast(&aggregates, last.date, query)?,
        };

        // ── Steps 7–8: chart payload and summary ─────────────────────────────
        let chart = build_chart(query, &aggregates, &forecast);
        let has_data = !aggregates.is_empty();
        let forecast_total = has_data.then(|| forecast.iter().map(|p| p.adjusted_dose).sum::<f64>());

        let stats = DashboardStats {
            comorbidity_stat: query.comorbidity_stat,
            comorbidity_value: comorbidity,
            forecast_total,
            anchor_date: aggregates.last().map(|a| a.date),
        };
        let summary = summary_text(query, &stats);

        debug!(
            query_id = %query_id,
            daily_points = chart.daily.len(),
            ma_points = chart.moving_average.len(),
            forecast_points = chart.forecast.len(),
            "dashboard computed"
        );

        Ok(Dashboard {
            query_id,
            query: query.clone(),
            aggregates,
            forecast,
            chart,
            stats,
            summary,
        })
    }

    fn forecast(
        &self,
        aggregates: &[DailyAggregate],
        anchor: NaiveDate,
        query: &ForecastQuery,
    ) -> MedcastResult<Vec<ForecastPoint>> {
        let totals: Vec<f64> = aggregates.iter().map(|a| a.total_dose).collect();
        // Both are Some: the caller only forecasts when aggregates is non-empty.
        let low = stats::mean(&totals).unwrap_or_default();
        let high = stats::max(&totals).unwrap_or_default();

        let dates = forecast_dates(anchor, query.forecast_days)?;
        let samples = self.forecaster.draw(low, high, dates.len())?;
        let factor = query.predicted_comorbidity.scale_factor();

        debug!(low, high, factor, "forecast interval");

        Ok(dates
            .into_iter()
            .zip(samples)
            .map(|(date, raw)| ForecastPoint {
                date,
                adjusted_dose: raw * factor,
            })
            .collect())
    }
}

/// Sum doses per date (ascending) and attach the trailing moving average.
///
/// Dates with no events are absent from the output, not zero-filled, so the
/// moving-average window counts observed days rather than calendar days.
pub fn daily_aggregates<'a>(
    events: impl Iterator<Item = &'a MedicationEvent>,
    window: usize,
) -> Vec<DailyAggregate> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for event in events {
        *totals.entry(event.date).or_insert(0.0) += event.dose;
    }

    let values: Vec<f64> = totals.values().copied().collect();
    let averages = stats::trailing_mean(&values, window);

    totals
        .into_iter()
        .zip(averages)
        .map(|((date, total_dose), moving_average)| DailyAggregate {
            date,
            total_dose,
            moving_average,
        })
        .collect()
}

/// Mean or median of every patient's comorbidity score; `0.0` for an empty
/// roster. Independent of the selected medication.
pub fn comorbidity_value(dataset: &Dataset, stat: ComorbidityStat) -> f64 {
    let scores = dataset.comorbidity_scores();
    let value = match stat {
        ComorbidityStat::Mean => stats::mean(&scores),
        ComorbidityStat::Median => stats::median(&scores),
    };
    value.unwrap_or_default()
}

/// The `horizon` consecutive calendar days following `anchor`.
pub fn forecast_dates(anchor: NaiveDate, horizon: ForecastHorizon) -> MedcastResult<Vec<NaiveDate>> {
    (1..=u64::from(horizon.days()))
        .map(|offset| {
            anchor
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| MedcastError::Forecast {
                    reason: format!("forecast date {offset} day(s) after {anchor} is out of range"),
                })
        })
        .collect()
}

/// Legend label for the moving-average series, e.g. "7-Day MA".
pub fn moving_average_series_name(window: usize) -> String {
    format!("{window}-Day MA")
}

fn build_chart(
    query: &ForecastQuery,
    aggregates: &[DailyAggregate],
    forecast: &[ForecastPoint],
) -> ChartPayload {
    let daily = aggregates
        .iter()
        .map(|a| SeriesPoint {
            date: a.date,
            value: a.total_dose,
        })
        .collect();

    let moving_average = aggregates
        .iter()
        .filter_map(|a| {
            a.moving_average.map(|value| SeriesPoint {
                date: a.date,
                value,
            })
        })
        .collect();

    let forecast_points = forecast
        .iter()
        .map(|p| SeriesPoint {
            date: p.date,
            value: p.adjusted_dose,
        })
        .collect();

    ChartPayload {
        title: format!("Medication Consumption and Forecast for {}", query.medication),
        x_label: X_AXIS_LABEL.to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        daily: Series::new(DAILY_SERIES_NAME, LineStyle::Solid, daily),
        moving_average: Series::new(
            moving_average_series_name(query.ma_window.days()),
            LineStyle::Solid,
            moving_average,
        ),
        forecast: Series::new(FORECAST_SERIES_NAME, LineStyle::Dashed, forecast_points),
    }
}

/// Render the one-paragraph summary shown under the chart.
pub fn summary_text(query: &ForecastQuery, stats: &DashboardStats) -> String {
    let tail = format!(
        "Comorbidity Metric ({}): {:.2} Predicted Comorbidity Score: {:.2}",
        stats.comorbidity_stat.label(),
        stats.comorbidity_value,
        query.predicted_comorbidity.score()
    );

    match stats.forecast_total {
        Some(total) => format!(
            "Predicted required doses of {} for the next {} days: {:.2} doses. {}",
            query.medication,
            query.forecast_days.days(),
            total,
            tail
        ),
        None => format!(
            "No consumption data available for {}. {}",
            query.medication, tail
        ),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
