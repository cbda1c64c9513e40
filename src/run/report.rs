use chrono::NaiveDate;
use std::fmt::Write;

use super::util::{format_amount, month_name, short_month_name, truncate};
use crate::models::{
    ChartData, Duty, DutyCategory, DutyOccurrence, DutyType, DutyWithLastOccurrence, MonthlySummary,
    ReviewReport,
};

const RULE_WIDTH: usize = 60;

pub(crate) fn render_review(report: &ReviewReport, currency: &str, category: Option<&str>) -> String {
    let mut out = String::new();
    let scope = category.unwrap_or("all categories");
    let _ = writeln!(out, "Duty review ({scope})");
    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));

    if report.is_empty() {
        let _ = writeln!(out, "No paid duties yet");
        return out;
    }

    for review in &report.monthly_reviews {
        let heading = format!("{} {}", month_name(review.month_number), review.year);
        let _ = writeln!(
            out,
            "{heading:<44}{:>16}",
            format_amount(review.total_paid, currency)
        );
        for item in &review.items {
            let _ = writeln!(
                out,
                "  {}  {:<22} {:<10}{:>14}",
                item.completed_date.format("%Y-%m-%d"),
                truncate(&item.duty_title, 22),
                truncate(&item.category_name, 10),
                format_amount(item.paid_amount, currency)
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:<44}{:>16}",
        "Grand total",
        format_amount(report.grand_total, currency)
    );
    out
}

pub(crate) fn render_chart(duty: &Duty, chart: &ChartData, currency: &str) -> String {
    let mut out = String::new();
    let what = match chart.duty_type {
        DutyType::Actionable => "times done per month",
        DutyType::Payable => "paid per month",
    };
    let _ = writeln!(out, "{} ({}): {what}", duty.title, chart.duty_type);

    if chart.points.is_empty() {
        let _ = writeln!(out, "  No occurrences recorded");
        return out;
    }

    for point in &chart.points {
        let value = match chart.duty_type {
            DutyType::Actionable => format!("{:.0}", point.value),
            DutyType::Payable => format_amount(point.value, currency),
        };
        let _ = writeln!(
            out,
            "  {} {}  {value:>14}",
            short_month_name(point.month),
            point.year
        );
    }
    out
}

pub(crate) fn render_month(
    occurrences: &[DutyOccurrence],
    duties: &[Duty],
    currency: &str,
    category: &str,
    year: i32,
    month: u32,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{category}: {} {year}", month_name(month));
    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));

    if occurrences.is_empty() {
        let _ = writeln!(out, "Nothing done this month");
        return out;
    }

    for occ in occurrences {
        let title = duties
            .iter()
            .find(|d| d.id == Some(occ.duty_id))
            .map(|d| d.title.as_str())
            .unwrap_or("?");
        let amount = occ
            .paid_amount
            .map(|a| format_amount(a, currency))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}  {:<34}{amount:>16}",
            occ.completed_date.format("%Y-%m-%d"),
            truncate(title, 34)
        );
    }
    out
}

/// One "done X of Y, paid Z" line per category summary.
pub(crate) fn render_summaries(summaries: &[MonthlySummary], currency: &str) -> String {
    let mut out = String::new();
    for summary in summaries {
        let _ = writeln!(
            out,
            "{:<10} {:<15} done {} of {:<6} paid {:>14}",
            truncate(&summary.category_name, 10),
            format!("{} {}", month_name(summary.month), summary.year),
            summary.completed,
            summary.total,
            format_amount(summary.total_paid, currency)
        );
    }
    out
}

/// Duty listing grouped by category: built-in categories first, then any
/// other names in the order they appear.
pub(crate) fn render_duties(duties: &[DutyWithLastOccurrence], currency: &str, today: NaiveDate) -> String {
    let mut out = String::new();
    if duties.is_empty() {
        let _ = writeln!(out, "No duties");
        return out;
    }

    let mut categories: Vec<&str> = DutyCategory::all()
        .iter()
        .map(|c| c.as_str())
        .filter(|name| duties.iter().any(|d| d.duty.category_name == *name))
        .collect();
    for d in duties {
        if !categories.contains(&d.duty.category_name.as_str()) {
            categories.push(&d.duty.category_name);
        }
    }

    for (i, category) in categories.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{category}");
        let _ = writeln!(
            out,
            "{:<5} {:<24} {:<11} {:<11} {:<24} Status",
            "ID", "Title", "Type", "Due", "Last done"
        );
        let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH + 25));
        for entry in duties.iter().filter(|d| d.duty.category_name == *category) {
            let duty = &entry.duty;
            let last = match &entry.last_occurrence {
                Some(o) => match o.paid_amount {
                    Some(amount) => format!(
                        "{} {}",
                        o.completed_date.format("%Y-%m-%d"),
                        format_amount(amount, currency)
                    ),
                    None => o.completed_date.format("%Y-%m-%d").to_string(),
                },
                None => "never".to_string(),
            };
            let status = if entry.has_current_month_occurrence {
                "done this month"
            } else if duty.is_overdue(today) {
                "overdue"
            } else {
                "pending"
            };
            let _ = writeln!(
                out,
                "{:<5} {:<24} {:<11} {:<11} {:<24} {status}",
                duty.id.unwrap_or(0),
                truncate(&duty.title, 24),
                duty.duty_type.to_string(),
                duty.due_date.format("%Y-%m-%d").to_string(),
                last,
            );
        }
    }
    out
}
