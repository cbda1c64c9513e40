//! Monthly duty review: groups paid occurrences by calendar month and totals
//! them for the review report.

mod chart;
mod summary;

use anyhow::{Context, Result};
use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{MonthlyReview, MonthlyReviewItem, Occurrence, ReviewReport};

pub(crate) use chart::monthly_chart;
pub(crate) use summary::monthly_summary;

/// Anything that can hand over the joined occurrence read model, optionally
/// narrowed to one category.
pub(crate) trait OccurrenceSource {
    fn fetch_occurrences(&self, category: Option<&str>) -> Result<Vec<Occurrence>>;
}

/// Fetch occurrences once from `source` and aggregate them.
pub(crate) fn load_review(
    source: &dyn OccurrenceSource,
    category: Option<&str>,
) -> Result<ReviewReport> {
    let occurrences = source
        .fetch_occurrences(category)
        .context("Failed to load duty occurrences")?;
    let report = aggregate(&occurrences, category);
    debug!(
        fetched = occurrences.len(),
        months = report.monthly_reviews.len(),
        items = report.item_count(),
        category = category.unwrap_or("*"),
        "built duty review"
    );
    Ok(report)
}

/// Group paid occurrences by (year, month), most recent month first.
///
/// Occurrences without an amount, or with an amount that is not strictly
/// positive, are skipped. With a `category` filter only exact name matches
/// take part. Items inside a month are ordered by completion date, then duty
/// id, then occurrence id, and every sum runs in that order so the floating
/// point result is the same on every call.
pub(crate) fn aggregate(occurrences: &[Occurrence], category: Option<&str>) -> ReviewReport {
    let mut paid: Vec<(&Occurrence, f64)> = occurrences
        .iter()
        .filter(|o| category.is_none_or(|c| o.category_name == c))
        .filter_map(|o| match o.paid_amount {
            Some(amount) if amount > 0.0 => Some((o, amount)),
            _ => None,
        })
        .collect();
    paid.sort_by_key(|(o, _)| (o.completed_date, o.duty_id, o.id));

    let mut buckets: BTreeMap<(i32, u32), Vec<MonthlyReviewItem>> = BTreeMap::new();
    for (o, amount) in paid {
        let key = (o.completed_date.year(), o.completed_date.month());
        buckets.entry(key).or_default().push(MonthlyReviewItem {
            duty_id: o.duty_id,
            duty_title: o.duty_title.clone(),
            category_name: o.category_name.clone(),
            paid_amount: amount,
            completed_date: o.completed_date,
        });
    }

    let monthly_reviews: Vec<MonthlyReview> = buckets
        .into_iter()
        .rev()
        .map(|((year, month_number), items)| MonthlyReview {
            month_number,
            year,
            total_paid: items.iter().fold(0.0, |acc, i| acc + i.paid_amount),
            items,
        })
        .collect();

    let grand_total = monthly_reviews
        .iter()
        .fold(0.0, |acc, m| acc + m.total_paid);

    ReviewReport {
        monthly_reviews,
        grand_total,
    }
}
