use chrono::Datelike;
use std::collections::BTreeMap;

use crate::models::{ChartData, DutyOccurrence, DutyType, MonthlyChartPoint};

/// Per-month series for a single duty, oldest month first.
///
/// Actionable duties count completions; payable duties sum what was paid,
/// with a missing amount counting as zero.
pub(crate) fn monthly_chart(occurrences: &[DutyOccurrence], duty_type: DutyType) -> ChartData {
    let mut by_month: BTreeMap<(i32, u32), Vec<&DutyOccurrence>> = BTreeMap::new();
    for occ in occurrences {
        let key = (occ.completed_date.year(), occ.completed_date.month());
        by_month.entry(key).or_default().push(occ);
    }

    let points = by_month
        .into_iter()
        .map(|((year, month), mut occs)| {
            occs.sort_by_key(|o| (o.completed_date, o.id));
            let value = match duty_type {
                DutyType::Actionable => occs.len() as f64,
                DutyType::Payable => occs
                    .iter()
                    .fold(0.0, |acc, o| acc + o.paid_amount.unwrap_or(0.0)),
            };
            MonthlyChartPoint { month, year, value }
        })
        .collect();

    ChartData { points, duty_type }
}
