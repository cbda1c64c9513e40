use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{Duty, DutyOccurrence, DutyType};

const DATE_FORMAT: &str = "%Y-%m-%d";
const REMINDER_DAYS: std::ops::RangeInclusive<u32> = 1..=30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum FormField {
    Title,
    Category,
    StartDate,
    DueDate,
    ReminderDays,
    PaidAmount,
    CompletedDate,
}

impl FormField {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Category => "category",
            Self::StartDate => "start date",
            Self::DueDate => "due date",
            Self::ReminderDays => "reminder",
            Self::PaidAmount => "amount",
            Self::CompletedDate => "completed date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationError {
    EmptyTitle,
    EmptyCategory,
    InvalidDate,
    StartAfterDue,
    InvalidReminderDays,
    InvalidAmount,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyCategory => write!(f, "category cannot be empty"),
            Self::InvalidDate => write!(f, "expected a date as YYYY-MM-DD"),
            Self::StartAfterDue => write!(f, "start date is after the due date"),
            Self::InvalidReminderDays => write!(
                f,
                "reminder must be {}-{} days before",
                REMINDER_DAYS.start(),
                REMINDER_DAYS.end()
            ),
            Self::InvalidAmount => write!(f, "amount must be a number greater than zero"),
        }
    }
}

pub(crate) type FieldErrors = BTreeMap<FormField, ValidationError>;

/// Raw input for a new duty, before any parsing.
#[derive(Debug, Clone)]
pub(crate) struct DutyForm {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) duty_type: DutyType,
    pub(crate) category_name: String,
    /// Defaults to the due date when absent.
    pub(crate) start_date: Option<String>,
    pub(crate) due_date: String,
    pub(crate) reminder_days: Option<u32>,
}

impl DutyForm {
    pub(crate) fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert(FormField::Title, ValidationError::EmptyTitle);
        }
        if self.category_name.trim().is_empty() {
            errors.insert(FormField::Category, ValidationError::EmptyCategory);
        }

        let due = parse_date(&self.due_date);
        if due.is_none() {
            errors.insert(FormField::DueDate, ValidationError::InvalidDate);
        }
        if let Some(raw) = &self.start_date {
            match (parse_date(raw), due) {
                (None, _) => {
                    errors.insert(FormField::StartDate, ValidationError::InvalidDate);
                }
                (Some(start), Some(due)) if start > due => {
                    errors.insert(FormField::StartDate, ValidationError::StartAfterDue);
                }
                _ => {}
            }
        }

        if self
            .reminder_days
            .is_some_and(|days| !REMINDER_DAYS.contains(&days))
        {
            errors.insert(FormField::ReminderDays, ValidationError::InvalidReminderDays);
        }

        errors
    }

    pub(crate) fn to_duty(&self) -> Result<Duty> {
        check(self.validate())?;
        let due_date = require_date(&self.due_date)?;
        let start_date = match &self.start_date {
            Some(raw) => require_date(raw)?,
            None => due_date,
        };
        let mut duty = Duty::new(
            self.title.trim().to_string(),
            self.duty_type,
            self.category_name.trim().to_string(),
            start_date,
            due_date,
        );
        duty.description = self.description.trim().to_string();
        duty.reminder_days = self.reminder_days;
        Ok(duty)
    }
}

/// Raw input for recording that a duty was done (and possibly paid).
#[derive(Debug, Clone)]
pub(crate) struct OccurrenceForm {
    pub(crate) duty_type: DutyType,
    pub(crate) paid_amount: Option<String>,
    pub(crate) completed_date: String,
}

impl OccurrenceForm {
    pub(crate) fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.duty_type.is_payable() {
            if let Some(raw) = self.paid_amount.as_deref().filter(|s| !s.trim().is_empty()) {
                if !parse_amount(raw).is_some_and(|a| a > 0.0) {
                    errors.insert(FormField::PaidAmount, ValidationError::InvalidAmount);
                }
            }
        }
        if parse_date(&self.completed_date).is_none() {
            errors.insert(FormField::CompletedDate, ValidationError::InvalidDate);
        }

        errors
    }

    /// Actionable duties never carry an amount.
    pub(crate) fn to_occurrence(&self, duty_id: i64) -> Result<DutyOccurrence> {
        check(self.validate())?;
        let paid_amount = if self.duty_type.is_payable() {
            self.paid_amount
                .as_deref()
                .and_then(parse_amount)
                .filter(|a| *a > 0.0)
        } else {
            None
        };
        Ok(DutyOccurrence::new(
            duty_id,
            paid_amount,
            require_date(&self.completed_date)?,
        ))
    }
}

/// Accepts either `.` or `,` as the decimal separator.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn require_date(raw: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| anyhow::anyhow!("Invalid date '{raw}'"))
}

fn check(errors: FieldErrors) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let messages: Vec<String> = errors
        .iter()
        .map(|(field, err)| format!("{}: {err}", field.label()))
        .collect();
    anyhow::bail!("Invalid input: {}", messages.join("; "))
}
