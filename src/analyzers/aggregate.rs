use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

/// Aggregate computed over the numeric column of each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Mean of the present values; NaN when a group has none.
    Mean,
    /// Number of rows in the group, whether or not the value is present.
    Count,
    /// Sum of the present values.
    Sum,
}

/// Aggregate value for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub key: String,
    pub value: f64,
    /// Rows carrying this key.
    pub rows: usize,
    /// Rows carrying this key and a present value.
    pub observed: usize,
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    rows: usize,
    observed: usize,
}

/// Groups `(key, value)` pairs by key and aggregates the values.
///
/// Groups are returned in order of first encounter. Missing values are
/// ignored by [`Aggregate::Mean`] and [`Aggregate::Sum`] but still counted by
/// [`Aggregate::Count`].
pub fn group_by<'k, I>(pairs: I, aggregate: Aggregate) -> Vec<GroupStat>
where
    I: IntoIterator<Item = (&'k str, Option<f64>)>,
{
    let mut index: HashMap<&'k str, usize> = HashMap::new();
    let mut groups: Vec<(&'k str, Accumulator)> = Vec::new();

    for (key, value) in pairs {
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, Accumulator::default()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.rows += 1;
        if let Some(v) = value {
            acc.sum += v;
            acc.observed += 1;
        }
    }

    groups
        .into_iter()
        .map(|(key, acc)| {
            let value = match aggregate {
                Aggregate::Mean if acc.observed == 0 => f64::NAN,
                Aggregate::Mean => acc.sum / acc.observed as f64,
                Aggregate::Count => acc.rows as f64,
                Aggregate::Sum => acc.sum,
            };
            GroupStat {
                key: key.to_string(),
                value,
                rows: acc.rows,
                observed: acc.observed,
            }
        })
        .collect()
}

/// Descending order with NaN placed last.
pub fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Keeps the `k` groups with the largest aggregate.
///
/// The sort is stable, so ties keep their encounter order.
pub fn top_k(mut stats: Vec<GroupStat>, k: usize) -> Vec<GroupStat> {
    stats.sort_by(|a, b| descending(a.value, b.value));
    stats.truncate(k);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Comedy", Some(10.0)),
            ("Drama", Some(4.0)),
            ("Comedy", None),
            ("Family", Some(4.0)),
            ("Comedy", Some(20.0)),
        ]
    }

    #[test]
    fn test_mean_ignores_missing_values() {
        let stats = group_by(pairs(), Aggregate::Mean);

        assert_eq!(stats[0].key, "Comedy");
        assert_eq!(stats[0].value, 15.0);
        assert_eq!(stats[0].rows, 3);
        assert_eq!(stats[0].observed, 2);
    }

    #[test]
    fn test_count_includes_missing_values() {
        let stats = group_by(pairs(), Aggregate::Count);
        let values: Vec<_> = stats.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_sum() {
        let stats = group_by(pairs(), Aggregate::Sum);
        assert_eq!(stats[0].value, 30.0);
    }

    #[test]
    fn test_mean_without_values_is_nan() {
        let stats = group_by([("Sport", None)], Aggregate::Mean);
        assert!(stats[0].value.is_nan());
    }

    #[test]
    fn test_top_k_sorted_and_stable() {
        let stats = group_by(pairs(), Aggregate::Mean);
        let top = top_k(stats, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, "Comedy");
        // Drama and Family tie at 4.0; Drama was seen first
        assert_eq!(top[1].key, "Drama");
    }

    #[test]
    fn test_top_k_puts_nan_last() {
        let stats = group_by(
            [("A", None), ("B", Some(1.0)), ("C", Some(2.0))],
            Aggregate::Mean,
        );
        let top = top_k(stats, 10);
        let keys: Vec<_> = top.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["C", "B", "A"]);
    }
}
