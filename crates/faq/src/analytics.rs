//! Usage statistics over query logs and FAQ entries.

use crate::search::sort_by_popularity;
use crate::types::{FaqEntry, QueryLogEntry};
use serde::Serialize;

/// Number of entries listed as most viewed.
pub const TOP_VIEWED: usize = 5;

/// Aggregated helpdesk usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_queries: usize,
    pub total_faqs: usize,
    pub helpful_count: usize,
    pub unhelpful_count: usize,

    /// Percentage of rated queries marked helpful (0.0 when none are rated)
    pub helpful_rate: f64,

    pub average_views: f64,
    pub total_views: u64,
    pub top_faqs: Vec<FaqEntry>,
}

/// Compute the report from full snapshots of both collections.
pub fn compute_stats(logs: &[QueryLogEntry], faqs: &[FaqEntry]) -> AnalyticsReport {
    let helpful_count = logs.iter().filter(|l| l.was_helpful == Some(true)).count();
    let unhelpful_count = logs.iter().filter(|l| l.was_helpful == Some(false)).count();

    let rated = helpful_count + unhelpful_count;
    let helpful_rate = if rated == 0 {
        0.0
    } else {
        helpful_count as f64 / rated as f64 * 100.0
    };

    let total_views: u64 = faqs.iter().map(|f| f.view_count).sum();
    let average_views = if faqs.is_empty() {
        0.0
    } else {
        total_views as f64 / faqs.len() as f64
    };

    let mut top_faqs = faqs.to_vec();
    sort_by_popularity(&mut top_faqs);
    top_faqs.truncate(TOP_VIEWED);

    AnalyticsReport {
        total_queries: logs.len(),
        total_faqs: faqs.len(),
        helpful_count,
        unhelpful_count,
        helpful_rate,
        average_views,
        total_views,
        top_faqs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{faq, query_log};

    #[test]
    fn test_empty_report() {
        let report = compute_stats(&[], &[]);
        assert_eq!(report.total_queries, 0);
        assert_eq!(report.helpful_rate, 0.0);
        assert_eq!(report.average_views, 0.0);
        assert!(report.top_faqs.is_empty());
    }

    #[test]
    fn test_helpful_rate_ignores_unrated() {
        let logs = vec![
            query_log(Some(true)),
            query_log(Some(true)),
            query_log(Some(true)),
            query_log(Some(false)),
            query_log(None),
        ];

        let report = compute_stats(&logs, &[]);
        assert_eq!(report.total_queries, 5);
        assert_eq!(report.helpful_count, 3);
        assert_eq!(report.unhelpful_count, 1);
        assert!((report.helpful_rate - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_views_and_top_list() {
        let faqs: Vec<FaqEntry> = [4, 10, 0, 7, 7, 1]
            .iter()
            .enumerate()
            .map(|(i, views)| {
                let mut entry = faq(&format!("Question {}", i), "Answer", *views);
                entry.id = format!("f{}", i);
                entry
            })
            .collect();

        let report = compute_stats(&[], &faqs);
        assert_eq!(report.total_faqs, 6);
        assert_eq!(report.total_views, 29);
        assert!((report.average_views - 29.0 / 6.0).abs() < 1e-9);

        let top: Vec<&str> = report.top_faqs.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(top, vec!["f1", "f3", "f4", "f0", "f5"]);
    }
}
