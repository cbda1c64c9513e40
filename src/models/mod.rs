mod category;
mod duty;
mod occurrence;
mod review;

pub use category::DutyCategory;
pub use duty::{Duty, DutyType};
pub use occurrence::{DutyOccurrence, DutyWithLastOccurrence, Occurrence};
pub use review::{
    ChartData, MonthlyChartPoint, MonthlyReview, MonthlyReviewItem, MonthlySummary, ReviewReport,
};
