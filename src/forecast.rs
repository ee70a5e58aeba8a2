//! Revenue forecasting: ordinary-least-squares trend over the monthly
//! series, extrapolated one month ahead

use anyhow::Context;
use chrono::NaiveDate;

use crate::data::SalesLedger;
use crate::store::{AnalyticsStore, ForecastRecord};
use crate::timeseries::{monthly_revenue, split_key};

/// A fitted line `value = intercept + slope * index`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn predict(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }
}

/// Fit a least-squares line over `values` at indices 0..N-1
///
/// Closed form on mean-centered sums; no regularization, single feature.
/// Returns `None` below two points, where a trend is undefined.
pub fn fit_trend(values: &[f64]) -> Option<LinearTrend> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut ss_xy = 0.0;
    let mut ss_xx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        ss_xy += dx * (y - y_mean);
        ss_xx += dx * dx;
    }

    let slope = ss_xy / ss_xx;
    Some(LinearTrend {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// First day of the calendar month following a "YYYY-MM" key
/// (December rolls to January of the next year)
fn month_after(key: &str) -> crate::Result<NaiveDate> {
    let (year, month) = split_key(key)
        .with_context(|| format!("malformed month key {key:?}"))?;
    let (year, month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(year, month as u32, 1)
        .with_context(|| format!("no calendar month after {key:?}"))
}

/// Recompute the next-month revenue forecast and persist it
///
/// Derives the full monthly series from the ledger, fits the trend and
/// appends one `ForecastRecord` for the month following the last observed
/// one. Fewer than two observed months is not an error: the run is
/// skipped and `Ok(None)` returned.
pub fn recompute_forecast<S: AnalyticsStore>(
    ledger: &SalesLedger,
    store: &mut S,
) -> crate::Result<Option<ForecastRecord>> {
    let by_month = monthly_revenue(ledger.orders());
    if by_month.len() < 2 {
        tracing::debug!(
            months = by_month.len(),
            "insufficient history, skipping forecast"
        );
        return Ok(None);
    }

    let values: Vec<f64> = by_month.values().copied().collect();
    let Some(trend) = fit_trend(&values) else {
        return Ok(None);
    };
    let predicted = trend.predict(values.len() as f64);

    let last_key = by_month
        .keys()
        .next_back()
        .context("monthly series unexpectedly empty")?;
    let record = ForecastRecord {
        month: month_after(last_key)?,
        value: predicted,
    };

    tracing::debug!(month = %record.month, value = record.value, "appending forecast");
    store.insert_forecast(record.clone())?;
    Ok(Some(record))
}
