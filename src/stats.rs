//! Frequency aggregation over derived domains.
//!
//! [`DomainTally`] is a simple occurrence counter. Ordering of the
//! sorted view is descending count, then lexicographic, so output is
//! deterministic for equal counts.

use std::collections::{HashMap, HashSet};

/// Occurrence counter keyed by domain string.
#[derive(Default, Debug, Clone)]
pub struct DomainTally {
    map: HashMap<String, u32>,
}

impl DomainTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Count one occurrence (creates the entry if absent).
    pub fn bump<S: AsRef<str>>(&mut self, domain: S) {
        *self.map.entry(domain.as_ref().to_string()).or_insert(0) += 1;
    }

    /// Build a tally from an iterator of values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tally = Self::new();
        for v in values {
            tally.bump(v);
        }
        tally
    }

    /// Number of distinct keys.
    pub fn unique_count(&self) -> usize {
        self.map.len()
    }

    /// Number of distinct keys whose count is at or below `threshold`.
    pub fn count_at_or_below(&self, threshold: u32) -> usize {
        self.map.values().filter(|&&c| c <= threshold).count()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Consume and return a sorted Vec (count desc then lexicographic).
    pub fn into_sorted(self) -> Vec<(String, u32)> {
        let mut v: Vec<_> = self.map.into_iter().collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        v
    }

    /// Sorted view preserving the underlying map.
    pub fn snapshot_sorted(&self) -> Vec<(String, u32)> {
        let mut v: Vec<_> = self.map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        v
    }
}

/// Count distinct values in any string column or derived sequence.
pub fn unique_count<I, S>(values: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    for v in values {
        seen.insert(v.as_ref().to_string());
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_counts_order_desc_then_lexicographic() {
        let tally = DomainTally::from_values([
            "b.example.com",
            "a.example.com",
            "a.example.com",
            "c.example.com",
            "b.example.com",
        ]);
        let sorted = tally.into_sorted();
        assert_eq!(
            sorted,
            vec![
                ("a.example.com".to_string(), 2),
                ("b.example.com".to_string(), 2),
                ("c.example.com".to_string(), 1),
            ]
        );
    }

    #[test]
    fn threshold_count_is_inclusive() {
        let mut tally = DomainTally::new();
        for (domain, count) in [("a", 15u32), ("b", 3), ("c", 10), ("d", 1)] {
            for _ in 0..count {
                tally.bump(domain);
            }
        }
        // a:15 b:3 c:10 d:1, threshold 10 -> b, c, d
        assert_eq!(tally.count_at_or_below(10), 3);
        assert_eq!(tally.count_at_or_below(0), 0);
        assert_eq!(tally.count_at_or_below(15), 4);
    }

    #[test]
    fn empty_tally_reports_zeros() {
        let tally = DomainTally::new();
        assert!(tally.is_empty());
        assert_eq!(tally.unique_count(), 0);
        assert_eq!(tally.count_at_or_below(10), 0);
        assert!(tally.into_sorted().is_empty());
    }

    #[test]
    fn unique_count_over_values() {
        assert_eq!(unique_count(["x", "y", "x", "z"]), 3);
        assert_eq!(unique_count(Vec::<&str>::new()), 0);
    }
}
