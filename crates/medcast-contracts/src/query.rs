//! Query parameter types.
//!
//! Every control on the dashboard maps to one type here. Each type can only be
//! constructed with an in-domain value, so a `ForecastQuery` that exists is a
//! query the pipeline can run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MedcastError, MedcastResult};

/// Unique identifier for one computed dashboard.
///
/// Appears in the tracing span of the computation and in the returned payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryId(pub uuid::Uuid);

impl QueryId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ── Comorbidity statistic ────────────────────────────────────────────────────

/// Which population statistic summarizes the roster's comorbidity scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComorbidityStat {
    Mean,
    Median,
}

impl ComorbidityStat {
    /// Capitalized label used in the summary text.
    pub fn label(self) -> &'static str {
        match self {
            ComorbidityStat::Mean => "Mean",
            ComorbidityStat::Median => "Median",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ComorbidityStat::Mean => ComorbidityStat::Median,
            ComorbidityStat::Median => ComorbidityStat::Mean,
        }
    }
}

impl fmt::Display for ComorbidityStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComorbidityStat::Mean => f.write_str("mean"),
            ComorbidityStat::Median => f.write_str("median"),
        }
    }
}

impl FromStr for ComorbidityStat {
    type Err = MedcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(ComorbidityStat::Mean),
            "median" => Ok(ComorbidityStat::Median),
            other => Err(MedcastError::out_of_range(
                "comorbidity_stat",
                format!("expected 'mean' or 'median', got '{other}'"),
            )),
        }
    }
}

// ── Moving-average window ────────────────────────────────────────────────────

/// Trailing moving-average window, restricted to the four offered periods.
///
/// Deserializes from any JSON number with a whole value, so `7` and `7.0`
/// agree with the request schema's integer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub enum MovingAverageWindow {
    Three,
    Seven,
    Fourteen,
    Thirty,
}

impl MovingAverageWindow {
    pub const ALL: [MovingAverageWindow; 4] = [
        MovingAverageWindow::Three,
        MovingAverageWindow::Seven,
        MovingAverageWindow::Fourteen,
        MovingAverageWindow::Thirty,
    ];

    /// Window length in aggregate points.
    pub fn days(self) -> usize {
        match self {
            MovingAverageWindow::Three => 3,
            MovingAverageWindow::Seven => 7,
            MovingAverageWindow::Fourteen => 14,
            MovingAverageWindow::Thirty => 30,
        }
    }

    /// The next window in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        match self {
            MovingAverageWindow::Three => MovingAverageWindow::Seven,
            MovingAverageWindow::Seven => MovingAverageWindow::Fourteen,
            MovingAverageWindow::Fourteen => MovingAverageWindow::Thirty,
            MovingAverageWindow::Thirty => MovingAverageWindow::Three,
        }
    }
}

impl TryFrom<u32> for MovingAverageWindow {
    type Error = MedcastError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            3 => Ok(MovingAverageWindow::Three),
            7 => Ok(MovingAverageWindow::Seven),
            14 => Ok(MovingAverageWindow::Fourteen),
            30 => Ok(MovingAverageWindow::Thirty),
            other => Err(MedcastError::out_of_range(
                "ma_window",
                format!("expected one of 3, 7, 14, 30, got {other}"),
            )),
        }
    }
}

impl TryFrom<f64> for MovingAverageWindow {
    type Error = MedcastError;

    fn try_from(days: f64) -> Result<Self, Self::Error> {
        Self::try_from(whole_days("ma_window", days)?)
    }
}

impl From<MovingAverageWindow> for u32 {
    fn from(window: MovingAverageWindow) -> Self {
        window.days() as u32
    }
}

impl fmt::Display for MovingAverageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// A day count given as a JSON number. Fractions, negatives and non-finite
/// values are out of range.
fn whole_days(field: &str, days: f64) -> MedcastResult<u32> {
    if days.is_finite() && days.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&days) {
        Ok(days as u32)
    } else {
        Err(MedcastError::out_of_range(
            field,
            format!("expected a whole number of days, got {days}"),
        ))
    }
}

// ── Forecast horizon ─────────────────────────────────────────────────────────

/// Number of days to forecast, `1..=30`. Deserializes from whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub struct ForecastHorizon(u32);

impl ForecastHorizon {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 30;

    pub fn new(days: u32) -> MedcastResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&days) {
            Ok(Self(days))
        } else {
            Err(MedcastError::out_of_range(
                "forecast_days",
                format!("expected {}..={}, got {days}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn days(self) -> u32 {
        self.0
    }

    /// One day longer, saturating at `MAX`.
    pub fn increment(self) -> Self {
        Self((self.0 + 1).min(Self::MAX))
    }

    /// One day shorter, saturating at `MIN`.
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = MedcastError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl TryFrom<f64> for ForecastHorizon {
    type Error = MedcastError;

    fn try_from(days: f64) -> Result<Self, Self::Error> {
        Self::new(whole_days("forecast_days", days)?)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(horizon: ForecastHorizon) -> Self {
        horizon.0
    }
}

// ── Predicted comorbidity ────────────────────────────────────────────────────

/// The comorbidity score expected over the forecast period, `0.0..=10.0`.
///
/// The forecast is scaled by `score / BASELINE`: a score of 5 leaves samples
/// unchanged, 0 zeroes them, 10 doubles them.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PredictedComorbidity(f64);

impl PredictedComorbidity {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;
    pub const BASELINE: f64 = 5.0;
    /// Slider increment used by interactive front ends.
    pub const STEP: f64 = 0.1;

    pub fn new(score: f64) -> MedcastResult<Self> {
        if score.is_finite() && (Self::MIN..=Self::MAX).contains(&score) {
            Ok(Self(score))
        } else {
            Err(MedcastError::out_of_range(
                "predicted_comorbidity",
                format!("expected {:.1}..={:.1}, got {score}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn score(self) -> f64 {
        self.0
    }

    /// Multiplier applied to every raw forecast sample.
    pub fn scale_factor(self) -> f64 {
        self.0 / Self::BASELINE
    }

    /// Move by `steps` slider increments, clamped to the domain and rounded
    /// to one decimal so repeated stepping does not accumulate float drift.
    pub fn stepped(self, steps: i32) -> Self {
        let raw = self.0 + f64::from(steps) * Self::STEP;
        let rounded = (raw * 10.0).round() / 10.0;
        Self(rounded.clamp(Self::MIN, Self::MAX))
    }
}

impl TryFrom<f64> for PredictedComorbidity {
    type Error = MedcastError;

    fn try_from(score: f64) -> Result<Self, Self::Error> {
        Self::new(score)
    }
}

impl From<PredictedComorbidity> for f64 {
    fn from(score: PredictedComorbidity) -> Self {
        score.0
    }
}

// ── The query ────────────────────────────────────────────────────────────────

/// The five dashboard controls, validated.
///
/// `medication` is free text: a name outside the catalog is a valid query
/// that simply selects no events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastQuery {
    pub medication: String,
    pub forecast_days: ForecastHorizon,
    pub ma_window: MovingAverageWindow,
    pub comorbidity_stat: ComorbidityStat,
    pub predicted_comorbidity: PredictedComorbidity,
}

impl ForecastQuery {
    /// Build a query from raw control values, validating each one.
    pub fn from_raw(
        medication: impl Into<String>,
        forecast_days: u32,
        ma_window: u32,
        comorbidity_stat: &str,
        predicted_comorbidity: f64,
    ) -> MedcastResult<Self> {
        Ok(Self {
            medication: medication.into(),
            forecast_days: ForecastHorizon::new(forecast_days)?,
            ma_window: MovingAverageWindow::try_from(ma_window)?,
            comorbidity_stat: comorbidity_stat.parse()?,
            predicted_comorbidity: PredictedComorbidity::new(predicted_comorbidity)?,
        })
    }
}
