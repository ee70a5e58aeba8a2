//! Dashboard assembly: merges every analytic view into one payload

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::{LeadKind, OrderStatus, SalesLedger};
use crate::store::AnalyticsStore;
use crate::timeseries::{monthly_revenue, prior_year_values, recent_series, DASHBOARD_WINDOW};
use crate::topn::{top_totals, RankedTotals, DEFAULT_TOP_N};

/// Fixed funnel stage names, leads first
pub const FUNNEL_STAGES: [&str; 4] = ["Leads", "Opportunities", "Quotations", "Orders"];

/// Most forecast points the payload carries
pub const FORECAST_POINTS: usize = 6;

/// Degraded-mode growth multiple applied when no forecast is persisted
pub const FALLBACK_GROWTH: f64 = 1.10;
const FALLBACK_POINTS: usize = 3;

/// Label/count arrays aligned by index
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabeledCounts {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

/// Current-year revenue against the same months one year earlier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoyComparison {
    pub months: Vec<String>,
    pub last_year: Vec<f64>,
    pub current_year: Vec<f64>,
}

/// Everything the dashboard charts consume, in one object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPayload {
    pub months: Vec<String>,
    pub actual: Vec<f64>,
    pub forecast: Vec<f64>,
    pub top_products: RankedTotals,
    pub salespersons: RankedTotals,
    pub lifetime_values: RankedTotals,
    pub segments: LabeledCounts,
    pub funnel: LabeledCounts,
    pub yoy: YoyComparison,
}

/// Flat degraded-mode forecast: three points of the last actual revenue
/// grown by a constant 10%, not compounding. Never persisted, so a
/// payload built from this is always distinguishable from a fitted trend
/// by its constant series.
pub fn fallback_forecast(last_actual: f64) -> Vec<f64> {
    vec![last_actual * FALLBACK_GROWTH; FALLBACK_POINTS]
}

/// Assemble the dashboard payload from the ledger and persisted analytics
///
/// Pure orchestration: nothing here computes beyond merging the component
/// views, and a sub-view without data degrades to empty arrays instead of
/// failing the whole payload.
pub fn assemble<S: AnalyticsStore>(
    ledger: &SalesLedger,
    store: &S,
) -> crate::Result<DashboardPayload> {
    let by_month = monthly_revenue(ledger.orders());
    let series = recent_series(&by_month, DASHBOARD_WINDOW);
    let last_year = prior_year_values(&by_month, &series.months);

    let persisted = store.forecasts()?;
    let forecast: Vec<f64> = if !persisted.is_empty() {
        persisted
            .iter()
            .take(FORECAST_POINTS)
            .map(|r| r.value)
            .collect()
    } else if let Some(&last) = series.values.last() {
        fallback_forecast(last)
    } else {
        Vec::new()
    };

    let top_products = top_totals(
        ledger
            .realized_lines()
            .into_iter()
            .map(|l| (l.product.clone(), l.subtotal)),
        DEFAULT_TOP_N,
    );
    let salespersons = top_totals(
        ledger.realized_orders().map(|o| {
            let name = o.salesperson.clone().unwrap_or_else(|| "Unknown".to_string());
            (name, o.total_amount)
        }),
        DEFAULT_TOP_N,
    );
    let lifetime_values = top_totals(
        ledger.realized_orders().map(|o| {
            let name = ledger
                .customer_name(o.customer_id)
                .unwrap_or("Unknown")
                .to_string();
            (name, o.total_amount)
        }),
        DEFAULT_TOP_N,
    );

    let mut cluster_counts: BTreeMap<usize, usize> = BTreeMap::new();
    for segment in store.segments()? {
        *cluster_counts.entry(segment.cluster).or_insert(0) += 1;
    }
    let segments = LabeledCounts {
        labels: cluster_counts.keys().map(|c| format!("Cluster {c}")).collect(),
        values: cluster_counts.into_values().collect(),
    };

    let funnel = LabeledCounts {
        labels: FUNNEL_STAGES.iter().map(|s| s.to_string()).collect(),
        values: vec![
            ledger.count_leads(LeadKind::Lead),
            ledger.count_leads(LeadKind::Opportunity),
            ledger.count_orders_with_status(OrderStatus::Sent),
            ledger.realized_orders().count(),
        ],
    };

    Ok(DashboardPayload {
        months: series.months.clone(),
        actual: series.values.clone(),
        forecast,
        top_products,
        salespersons,
        lifetime_values,
        segments,
        funnel,
        yoy: YoyComparison {
            months: series.months,
            last_year,
            current_year: series.values,
        },
    })
}
