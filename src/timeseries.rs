//! Monthly revenue aggregation and year-over-year alignment

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::data::Order;

/// How many calendar months the dashboard view spans
pub const DASHBOARD_WINDOW: usize = 12;

/// Fixed-width "YYYY-MM" grouping key; lexicographic order is
/// chronological order.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Aggregate realized, dated orders into revenue per month
///
/// Single pass over the input; undated orders and orders whose status is
/// not realized are skipped. The BTreeMap keeps keys sorted, so iteration
/// yields the series in chronological order.
pub fn monthly_revenue<'a, I>(orders: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut by_month = BTreeMap::new();
    for order in orders {
        if !order.status.is_realized() {
            continue;
        }
        let Some(date) = order.date else {
            continue;
        };
        *by_month.entry(month_key(date)).or_insert(0.0) += order.total_amount;
    }
    by_month
}

/// An ascending slice of the monthly series with parallel value array
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSeries {
    pub months: Vec<String>,
    pub values: Vec<f64>,
}

impl RevenueSeries {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Clip the full monthly mapping to the months observed within the most
/// recent `window` calendar months (ending at the latest observed month),
/// ascending. Months with no revenue inside the window are absent, not
/// zero-filled.
pub fn recent_series(by_month: &BTreeMap<String, f64>, window: usize) -> RevenueSeries {
    let cutoff = by_month
        .keys()
        .next_back()
        .and_then(|last| shift_key(last, -((window as i32) - 1)));

    let (months, values) = match cutoff {
        Some(cutoff) => by_month
            .iter()
            .filter(|(key, _)| **key >= cutoff)
            .map(|(key, value)| (key.clone(), *value))
            .unzip(),
        None => (Vec::new(), Vec::new()),
    };
    RevenueSeries { months, values }
}

/// For each month key, the revenue at the same key one year earlier in the
/// full mapping; months with no prior-year data yield exactly 0.0, so the
/// result is always parallel to `months`.
pub fn prior_year_values(by_month: &BTreeMap<String, f64>, months: &[String]) -> Vec<f64> {
    months
        .iter()
        .map(|key| {
            shift_key(key, -12)
                .and_then(|prev| by_month.get(&prev).copied())
                .unwrap_or(0.0)
        })
        .collect()
}

/// Move a "YYYY-MM" key by a signed number of months
fn shift_key(key: &str, months: i32) -> Option<String> {
    let (year, month) = split_key(key)?;
    let total = year * 12 + (month - 1) + months;
    if total < 0 {
        return None;
    }
    Some(format!("{:04}-{:02}", total / 12, total % 12 + 1))
}

pub(crate) fn split_key(key: &str) -> Option<(i32, i32)> {
    let (year, month) = key.split_once('-')?;
    Some((year.parse().ok()?, month.parse().ok()?))
}
