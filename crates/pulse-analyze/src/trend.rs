//! Per-day sentiment trend aggregation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pulse_core::{Distribution, SentimentLabel, TrendBucket};

/// Bucket classified documents by UTC calendar day.
///
/// Documents without a timestamp are skipped here (they still count in the
/// overall distribution, which is computed separately). Buckets are sparse:
/// no entry exists for a day with zero documents. Output is ascending by
/// date string; `YYYY-MM-DD` makes lexicographic order chronological.
pub fn daily_trend(items: &[(Option<DateTime<Utc>>, SentimentLabel)]) -> Vec<TrendBucket> {
    let mut by_day: BTreeMap<String, Distribution> = BTreeMap::new();

    for (created_at, label) in items {
        let Some(ts) = created_at else { continue };
        let day = ts.format("%Y-%m-%d").to_string();
        by_day.entry(day).or_default().add(*label);
    }

    by_day
        .into_iter()
        .map(|(date, d)| TrendBucket {
            date,
            positive: d.positive,
            neutral: d.neutral,
            negative: d.negative,
            total: d.total(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Option<DateTime<Utc>> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_buckets_by_utc_day_sorted() {
        let items = vec![
            (ts("2024-01-02T08:00:00Z"), SentimentLabel::Neutral),
            (ts("2024-01-01T10:00:00Z"), SentimentLabel::Positive),
            (ts("2024-01-01T23:59:59Z"), SentimentLabel::Negative),
        ];
        let trend = daily_trend(&items);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, "2024-01-01");
        assert_eq!(trend[0].positive, 1);
        assert_eq!(trend[0].negative, 1);
        assert_eq!(trend[0].total, 2);
        assert_eq!(trend[1].date, "2024-01-02");
        assert_eq!(trend[1].neutral, 1);
        assert_eq!(trend[1].total, 1);
    }

    #[test]
    fn test_missing_timestamps_excluded() {
        let items = vec![
            (None, SentimentLabel::Positive),
            (ts("2024-03-05T00:00:00Z"), SentimentLabel::Positive),
        ];
        let trend = daily_trend(&items);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].total, 1);
    }

    #[test]
    fn test_total_invariant() {
        let items = vec![
            (ts("2024-01-01T01:00:00Z"), SentimentLabel::Positive),
            (ts("2024-01-01T02:00:00Z"), SentimentLabel::Neutral),
            (ts("2024-01-01T03:00:00Z"), SentimentLabel::Negative),
        ];
        let trend = daily_trend(&items);
        for bucket in &trend {
            assert_eq!(bucket.total, bucket.positive + bucket.neutral + bucket.negative);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(daily_trend(&[]).is_empty());
    }
}
