use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyType {
    Actionable,
    Payable,
}

impl DutyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actionable => "ACTIONABLE",
            Self::Payable => "PAYABLE",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PAYABLE" => Self::Payable,
            _ => Self::Actionable,
        }
    }

    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Payable)
    }
}

impl std::fmt::Display for DutyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Actionable => write!(f, "Actionable"),
            Self::Payable => write!(f, "Payable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Duty {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub duty_type: DutyType,
    pub category_name: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Days before the due date to remind, when a reminder is set.
    pub reminder_days: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

impl Duty {
    pub fn new(
        title: String,
        duty_type: DutyType,
        category_name: String,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: None,
            title,
            description: String::new(),
            duty_type,
            category_name,
            start_date,
            due_date,
            reminder_days: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }
}
