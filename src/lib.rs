//! SalesPulse: sales analytics engine
//!
//! This library computes derived analytics from sales transaction data:
//! monthly revenue aggregation, short-horizon revenue forecasting via a
//! fitted linear trend, RFM (Recency, Frequency, Monetary) customer
//! segmentation using K-Means clustering, and top-N / funnel summaries,
//! all assembled into one dashboard payload for visualization.

pub mod cli;
pub mod dashboard;
pub mod data;
pub mod forecast;
pub mod rfm;
pub mod segment;
pub mod store;
pub mod timeseries;
pub mod topn;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use dashboard::{assemble, fallback_forecast, DashboardPayload, LabeledCounts, YoyComparison};
pub use data::{load_ledger, Customer, Lead, LeadKind, Order, OrderLine, OrderStatus, SalesLedger};
pub use forecast::{fit_trend, recompute_forecast, LinearTrend};
pub use rfm::{build_rfm, RfmFeatures};
pub use segment::{cluster_rfm, recompute_segments, DEFAULT_CLUSTERS};
pub use store::{AnalyticsStore, ForecastRecord, MemoryStore, SegmentRecord};
pub use timeseries::{monthly_revenue, month_key, recent_series, RevenueSeries};
pub use topn::{top_totals, RankedTotals, DEFAULT_TOP_N};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
