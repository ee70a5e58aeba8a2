//! Customer segmentation: K-Means clustering over raw RFM vectors

use chrono::NaiveDate;
use linfa::prelude::*;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::SalesLedger;
use crate::rfm::build_rfm;
use crate::store::{AnalyticsStore, SegmentRecord};

/// Default number of customer segments
pub const DEFAULT_CLUSTERS: usize = 3;

/// Fixed seed so repeated runs assign reproducible labels
const KMEANS_SEED: u64 = 1;
const MAX_ITERATIONS: u64 = 300;
const TOLERANCE: f64 = 1e-4;

/// Assign each RFM row to one of `k` clusters
///
/// Lloyd's algorithm with Euclidean distance over the raw feature rows.
/// `k` is clamped to the row count so every non-empty input clusters.
/// Labels are arbitrary integers with no inherent ordering.
pub fn cluster_rfm(features: &Array2<f64>, k: usize) -> crate::Result<Array1<usize>> {
    if k == 0 {
        anyhow::bail!("cluster count must be at least 1");
    }
    let n_samples = features.nrows();
    if n_samples == 0 {
        anyhow::bail!("cannot cluster an empty feature matrix");
    }
    let k = k.min(n_samples);

    // Dummy targets for unsupervised learning
    let targets: Array1<usize> = Array1::zeros(n_samples);
    let dataset = Dataset::new(features.clone(), targets);

    let rng = StdRng::seed_from_u64(KMEANS_SEED);
    let model = KMeans::params_with(k, rng, L2Dist)
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(TOLERANCE)
        .fit(&dataset)?;

    Ok(model.predict(&dataset))
}

/// Count how many rows landed in each cluster
pub fn cluster_sizes(labels: &Array1<usize>, k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for &label in labels.iter() {
        if label < k {
            sizes[label] += 1;
        }
    }
    sizes
}

/// Recompute customer segments and replace the persisted set
///
/// Builds the RFM matrix, clusters it, and swaps in one fresh
/// `SegmentRecord` per qualifying customer, superseding all prior
/// records. A ledger with no qualifying customers is not an error: the
/// run is skipped, nothing is written, and `Ok(0)` returned.
///
/// # Arguments
/// * `ledger` - Sales records to segment
/// * `store` - Destination for the replaced segment set
/// * `today` - Reference date for recency calculation
/// * `k` - Requested cluster count (clamped to the customer count)
///
/// # Returns
/// * Number of segment records written
pub fn recompute_segments<S: AnalyticsStore>(
    ledger: &SalesLedger,
    store: &mut S,
    today: NaiveDate,
    k: usize,
) -> crate::Result<usize> {
    let rfm = build_rfm(ledger, today)?;
    if rfm.is_empty() {
        tracing::debug!("no customers with realized orders, skipping segmentation");
        return Ok(0);
    }

    let labels = cluster_rfm(&rfm.features, k)?;

    let records: Vec<SegmentRecord> = rfm
        .customer_ids
        .iter()
        .zip(labels.iter())
        .enumerate()
        .map(|(row, (&customer_id, &cluster))| SegmentRecord {
            customer_id,
            cluster,
            recency_days: rfm.features[[row, 0]],
            frequency: rfm.features[[row, 1]] as u32,
            monetary: rfm.features[[row, 2]],
            active: true,
        })
        .collect();

    let written = records.len();
    tracing::debug!(customers = written, clusters = k, "replacing segment set");
    store.replace_segments(records)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Customer, Order, OrderStatus};
    use crate::store::MemoryStore;

    fn features() -> Array2<f64> {
        // Two tight groups far apart in the monetary dimension
        Array2::from_shape_vec(
            (6, 3),
            vec![
                5.0, 2.0, 100.0, //
                6.0, 3.0, 110.0, //
                4.0, 2.0, 105.0, //
                300.0, 1.0, 9000.0, //
                320.0, 1.0, 9100.0, //
                310.0, 2.0, 9050.0, //
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_cluster_rfm_labels() {
        let labels = cluster_rfm(&features(), 2).unwrap();
        assert_eq!(labels.len(), 6);
        assert!(labels.iter().all(|&l| l < 2));

        // The two monetary groups must not share a cluster
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let first = cluster_rfm(&features(), 3).unwrap();
        let second = cluster_rfm(&features(), 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_k_clamped_to_rows() {
        let small = Array2::from_shape_vec((2, 3), vec![1.0, 1.0, 1.0, 9.0, 9.0, 9.0]).unwrap();
        let labels = cluster_rfm(&small, 5).unwrap();
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().all(|&l| l < 2));
    }

    #[test]
    fn test_cluster_sizes_sum() {
        let labels = cluster_rfm(&features(), 2).unwrap();
        let sizes = cluster_sizes(&labels, 2);
        assert_eq!(sizes.iter().sum::<usize>(), 6);
    }

    fn ledger_with_customers(n: i64) -> SalesLedger {
        let mut orders = Vec::new();
        let mut customers = Vec::new();
        for i in 0..n {
            customers.push(Customer {
                id: i,
                name: format!("Customer {i}"),
            });
            orders.push(Order {
                id: i,
                date: NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32),
                total_amount: 100.0 * (i + 1) as f64,
                status: OrderStatus::Confirmed,
                customer_id: i,
                salesperson: None,
            });
        }
        SalesLedger::new(orders, Vec::new(), customers, Vec::new())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_recompute_one_record_per_customer() {
        let ledger = ledger_with_customers(5);
        let mut store = MemoryStore::new();

        let written = recompute_segments(&ledger, &mut store, today(), DEFAULT_CLUSTERS).unwrap();
        assert_eq!(written, 5);

        let segments = store.segments().unwrap();
        assert_eq!(segments.len(), 5);
        assert!(segments.iter().all(|s| s.active));

        // Rerunning on unchanged data keeps the record count stable
        let rewritten = recompute_segments(&ledger, &mut store, today(), DEFAULT_CLUSTERS).unwrap();
        assert_eq!(rewritten, 5);
        assert_eq!(store.segments().unwrap().len(), 5);
    }

    #[test]
    fn test_recompute_with_no_customers_is_noop() {
        let ledger = SalesLedger::default();
        let mut store = MemoryStore::new();

        let written = recompute_segments(&ledger, &mut store, today(), DEFAULT_CLUSTERS).unwrap();
        assert_eq!(written, 0);
        assert!(store.segments().unwrap().is_empty());
    }
}
