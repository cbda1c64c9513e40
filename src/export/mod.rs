use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::models::ReviewReport;

const HEADER: [&str; 7] = [
    "year",
    "month",
    "date",
    "duty_id",
    "duty",
    "category",
    "paid_amount",
];

/// Write one CSV row per review item, in report order. Returns the row count.
pub(crate) fn write_review_csv<W: Write>(report: &ReviewReport, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    let mut count = 0;
    for review in &report.monthly_reviews {
        for item in &review.items {
            wtr.write_record([
                review.year.to_string(),
                review.month_number.to_string(),
                item.completed_date.format("%Y-%m-%d").to_string(),
                item.duty_id.to_string(),
                item.duty_title.clone(),
                item.category_name.clone(),
                format!("{:.2}", item.paid_amount),
            ])?;
            count += 1;
        }
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(count)
}

pub(crate) fn export_review_to_csv(report: &ReviewReport, path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_review_csv(report, file)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(rows = count, path = %path.display(), "exported review");
    Ok(count)
}
