use std::collections::BTreeSet;

use crate::models::{Duty, DutyOccurrence, MonthlySummary};

/// Summarize one category for a month from that month's occurrences and the
/// category's duties. A duty done twice still counts once; a missing amount
/// adds nothing to the total.
pub(crate) fn monthly_summary(
    category_name: &str,
    year: i32,
    month: u32,
    occurrences: &[DutyOccurrence],
    duties: &[Duty],
) -> MonthlySummary {
    let mut in_month: Vec<&DutyOccurrence> = occurrences
        .iter()
        .filter(|o| o.is_in_month(year, month))
        .collect();
    in_month.sort_by_key(|o| (o.completed_date, o.duty_id, o.id));

    let completed: BTreeSet<i64> = in_month.iter().map(|o| o.duty_id).collect();
    let total_paid = in_month
        .iter()
        .fold(0.0, |acc, o| acc + o.paid_amount.unwrap_or(0.0));

    MonthlySummary {
        category_name: category_name.to_string(),
        year,
        month,
        total_paid,
        completed: completed.len(),
        total: duties.len(),
    }
}
