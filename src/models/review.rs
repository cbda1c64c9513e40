use chrono::NaiveDate;

use super::DutyType;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReviewItem {
    pub duty_id: i64,
    pub duty_title: String,
    pub category_name: String,
    pub paid_amount: f64,
    pub completed_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReview {
    /// 1-12
    pub month_number: u32,
    pub year: i32,
    pub total_paid: f64,
    pub items: Vec<MonthlyReviewItem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReviewReport {
    /// Most recent month first.
    pub monthly_reviews: Vec<MonthlyReview>,
    pub grand_total: f64,
}

impl ReviewReport {
    pub fn is_empty(&self) -> bool {
        self.monthly_reviews.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.monthly_reviews.iter().map(|m| m.items.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyChartPoint {
    pub month: u32,
    pub year: i32,
    /// Occurrence count for actionable duties, amount paid for payable ones.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub points: Vec<MonthlyChartPoint>,
    pub duty_type: DutyType,
}

/// One category's progress in a calendar month: how many of its duties were
/// done at least once, and what was paid.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub category_name: String,
    pub year: i32,
    pub month: u32,
    pub total_paid: f64,
    /// Distinct duties with at least one occurrence in the month.
    pub completed: usize,
    /// Every duty in the category.
    pub total: usize,
}
