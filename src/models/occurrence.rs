use chrono::{Datelike, NaiveDate};

use super::Duty;

/// A single completion of a duty, as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct DutyOccurrence {
    pub id: Option<i64>,
    pub duty_id: i64,
    pub paid_amount: Option<f64>,
    pub completed_date: NaiveDate,
}

impl DutyOccurrence {
    pub fn new(duty_id: i64, paid_amount: Option<f64>, completed_date: NaiveDate) -> Self {
        Self {
            id: None,
            duty_id,
            paid_amount,
            completed_date,
        }
    }

    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.completed_date.year() == year && self.completed_date.month() == month
    }
}

/// Read model joining an occurrence with the title and category of its duty.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub id: i64,
    pub duty_id: i64,
    pub paid_amount: Option<f64>,
    pub completed_date: NaiveDate,
    pub duty_title: String,
    pub category_name: String,
}

#[derive(Debug, Clone)]
pub struct DutyWithLastOccurrence {
    pub duty: Duty,
    pub last_occurrence: Option<DutyOccurrence>,
    pub has_current_month_occurrence: bool,
}
