//! RFM (Recency, Frequency, Monetary) feature computation per customer

use chrono::NaiveDate;
use ndarray::Array2;

use crate::data::SalesLedger;

/// RFM feature matrix with parallel customer ids
///
/// Row i holds `[recency_days, frequency, monetary]` for `customer_ids[i]`.
/// Values are raw, not normalized, so the monetary column dominates
/// Euclidean distance downstream. Changing that alters cluster membership
/// and is a behavior change, not a fix.
#[derive(Debug, Clone)]
pub struct RfmFeatures {
    pub customer_ids: Vec<i64>,
    pub features: Array2<f64>,
}

impl RfmFeatures {
    pub fn len(&self) -> usize {
        self.customer_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customer_ids.is_empty()
    }
}

/// Build the RFM matrix for every customer with at least one realized,
/// dated order
///
/// Recency is the day count from the most recent realized order to
/// `today` (ties on the date resolve by highest order id); frequency is
/// the realized order count; monetary their summed totals. Customers with
/// no realized orders are excluded entirely rather than given a zero
/// vector. Row order mirrors ledger customer iteration and carries no
/// meaning downstream.
pub fn build_rfm(ledger: &SalesLedger, today: NaiveDate) -> crate::Result<RfmFeatures> {
    let mut customer_ids = Vec::new();
    let mut raw = Vec::new();

    for customer in ledger.customers() {
        let mut last: Option<(NaiveDate, i64)> = None;
        let mut frequency = 0u32;
        let mut monetary = 0.0;

        for order in ledger.realized_orders() {
            if order.customer_id != customer.id {
                continue;
            }
            let Some(date) = order.date else {
                continue;
            };
            frequency += 1;
            monetary += order.total_amount;
            if last.map_or(true, |seen| (date, order.id) > seen) {
                last = Some((date, order.id));
            }
        }

        let Some((last_date, _)) = last else {
            continue;
        };
        let recency = (today - last_date).num_days() as f64;

        customer_ids.push(customer.id);
        raw.extend_from_slice(&[recency, frequency as f64, monetary]);
    }

    let features = Array2::from_shape_vec((customer_ids.len(), 3), raw)?;
    Ok(RfmFeatures {
        customer_ids,
        features,
    })
}
