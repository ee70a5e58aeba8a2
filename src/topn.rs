//! Generic "sum per key, take top K" reducer

use std::collections::HashMap;

use serde::Serialize;

/// Default number of entries kept by the dashboard summaries
pub const DEFAULT_TOP_N: usize = 5;

/// Parallel name/value arrays aligned by index, ready for charting
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedTotals {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

impl RankedTotals {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Sum values per key and keep the top `k` keys by total, descending.
///
/// Keys accumulate in first-seen order and the descending sort is stable,
/// so ties resolve to whichever key appeared first. Empty input yields two
/// empty arrays.
pub fn top_totals<I>(pairs: I, k: usize) -> RankedTotals
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();

    for (key, value) in pairs {
        match index.get(&key) {
            Some(&slot) => totals[slot].1 += value,
            None => {
                index.insert(key.clone(), totals.len());
                totals.push((key, value));
            }
        }
    }

    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals.truncate(k);

    let (names, values) = totals.into_iter().unzip();
    RankedTotals { names, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, f64)]) -> Vec<(String, f64)> {
        raw.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_sums_per_key() {
        let ranked = top_totals(
            pairs(&[("a", 10.0), ("b", 5.0), ("a", 15.0), ("b", 1.0)]),
            DEFAULT_TOP_N,
        );
        assert_eq!(ranked.names, vec!["a", "b"]);
        assert_eq!(ranked.values, vec![25.0, 6.0]);
    }

    #[test]
    fn test_truncates_to_k_descending() {
        let ranked = top_totals(
            pairs(&[("a", 1.0), ("b", 9.0), ("c", 4.0), ("d", 7.0)]),
            2,
        );
        assert_eq!(ranked.names, vec!["b", "d"]);
        assert_eq!(ranked.values, vec![9.0, 7.0]);
        assert!(ranked.len() <= 2);

        // values are non-increasing
        for pair in ranked.values.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ranked = top_totals(
            pairs(&[("late", 1.0), ("first", 5.0), ("second", 5.0)]),
            3,
        );
        assert_eq!(ranked.names, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_empty_input() {
        let ranked = top_totals(Vec::new(), DEFAULT_TOP_N);
        assert!(ranked.is_empty());
        assert!(ranked.values.is_empty());
    }
}
