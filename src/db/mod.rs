mod schema;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, info};

use crate::models::*;
use crate::review::OccurrenceSource;

const DATE_FORMAT: &str = "%Y-%m-%d";

const DUTY_COLUMNS: &str = "d.id, d.title, d.description, d.duty_type, d.category_name,
     d.start_date, d.due_date, d.reminder_days_before, d.created_at, d.updated_at";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            debug!(version = schema::CURRENT_VERSION, "created schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        let tx = self.conn.transaction()?;
        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                debug!(from_version, "applying migration");
                tx.execute_batch(sql)?;
            }
        }
        if current < schema::CURRENT_VERSION {
            tx.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            info!(from = current, to = schema::CURRENT_VERSION, "schema migrated");
        }
        tx.commit()?;

        Ok(())
    }

    // ── Duties ────────────────────────────────────────────────

    pub(crate) fn insert_duty(&self, duty: &Duty) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO duties (title, description, duty_type, category_name, start_date, due_date,
                                 reminder_days_before, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                duty.title,
                duty.description,
                duty.duty_type.as_str(),
                duty.category_name,
                format_date(duty.start_date),
                format_date(duty.due_date),
                duty.reminder_days,
                duty.created_at,
                duty.updated_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, title = %duty.title, "inserted duty");
        Ok(id)
    }

    pub(crate) fn get_duties(&self) -> Result<Vec<Duty>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DUTY_COLUMNS} FROM duties d ORDER BY d.created_at DESC, d.id DESC"
        ))?;
        let rows = stmt.query_map([], duty_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_duties_by_category(&self, category: &str) -> Result<Vec<Duty>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DUTY_COLUMNS} FROM duties d WHERE d.category_name = ?1
             ORDER BY d.created_at DESC, d.id DESC"
        ))?;
        let rows = stmt.query_map(params![category], duty_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_duty_by_id(&self, id: i64) -> Result<Option<Duty>> {
        let result = self.conn.query_row(
            &format!("SELECT {DUTY_COLUMNS} FROM duties d WHERE d.id = ?1"),
            params![id],
            duty_from_row,
        );
        match result {
            Ok(d) => Ok(Some(d)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn update_duty(&self, duty: &Duty) -> Result<()> {
        let id = duty
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update a duty that was never saved"))?;
        let changed = self.conn.execute(
            "UPDATE duties SET title = ?1, description = ?2, duty_type = ?3, category_name = ?4,
                               start_date = ?5, due_date = ?6, reminder_days_before = ?7,
                               updated_at = ?8
             WHERE id = ?9",
            params![
                duty.title,
                duty.description,
                duty.duty_type.as_str(),
                duty.category_name,
                format_date(duty.start_date),
                format_date(duty.due_date),
                duty.reminder_days,
                chrono::Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("Duty {id} not found");
        }
        debug!(id, "updated duty");
        Ok(())
    }

    /// Deletes the duty and, through the foreign key, all of its occurrences.
    pub(crate) fn delete_duty(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM duties WHERE id = ?1", params![id])?;
        if changed == 0 {
            anyhow::bail!("Duty {id} not found");
        }
        info!(id, "deleted duty");
        Ok(())
    }

    // ── Occurrences ───────────────────────────────────────────

    pub(crate) fn insert_occurrence(&self, occurrence: &DutyOccurrence) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO duty_occurrences (duty_id, paid_amount, completed_date)
                 VALUES (?1, ?2, ?3)",
                params![
                    occurrence.duty_id,
                    occurrence.paid_amount,
                    format_date(occurrence.completed_date),
                ],
            )
            .with_context(|| format!("Failed to record occurrence for duty {}", occurrence.duty_id))?;
        let id = self.conn.last_insert_rowid();
        debug!(id, duty_id = occurrence.duty_id, "inserted occurrence");
        Ok(id)
    }

    /// Occurrences of one duty, most recent first.
    pub(crate) fn get_occurrences_by_duty(&self, duty_id: i64) -> Result<Vec<DutyOccurrence>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, duty_id, paid_amount, completed_date FROM duty_occurrences
             WHERE duty_id = ?1 ORDER BY completed_date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![duty_id], occurrence_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_last_occurrence(&self, duty_id: i64) -> Result<Option<DutyOccurrence>> {
        let result = self.conn.query_row(
            "SELECT id, duty_id, paid_amount, completed_date FROM duty_occurrences
             WHERE duty_id = ?1 ORDER BY completed_date DESC, id DESC LIMIT 1",
            params![duty_id],
            occurrence_from_row,
        );
        match result {
            Ok(o) => Ok(Some(o)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Occurrences in one calendar month for duties of the given category.
    pub(crate) fn get_monthly_occurrences(
        &self,
        category: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DutyOccurrence>> {
        let mut stmt = self.conn.prepare(
            "SELECT o.id, o.duty_id, o.paid_amount, o.completed_date
             FROM duty_occurrences o JOIN duties d ON o.duty_id = d.id
             WHERE d.category_name = ?1 AND o.completed_date LIKE ?2
             ORDER BY o.completed_date DESC, o.id DESC",
        )?;
        let rows = stmt.query_map(
            params![category, format!("{year:04}-{month:02}-%")],
            occurrence_from_row,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn delete_occurrence(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM duty_occurrences WHERE id = ?1", params![id])?;
        if changed == 0 {
            anyhow::bail!("Occurrence {id} not found");
        }
        debug!(id, "deleted occurrence");
        Ok(())
    }

    // ── Read models ───────────────────────────────────────────

    /// Every occurrence joined with its duty's title and category.
    pub(crate) fn get_occurrences_with_duty_info(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Occurrence>> {
        let mut sql = String::from(
            "SELECT o.id, o.duty_id, o.paid_amount, o.completed_date, d.title, d.category_name
             FROM duty_occurrences o JOIN duties d ON o.duty_id = d.id WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(c) = category {
            sql.push_str(&format!(" AND d.category_name = ?{}", param_values.len() + 1));
            param_values.push(Box::new(c.to_string()));
        }

        sql.push_str(" ORDER BY o.completed_date DESC, o.id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok(Occurrence {
                id: row.get(0)?,
                duty_id: row.get(1)?,
                paid_amount: amount_column(row, 2)?,
                completed_date: date_column(row, 3)?,
                duty_title: row.get(4)?,
                category_name: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Duties (optionally one category) paired with their latest occurrence,
    /// flagged when that occurrence falls in the month of `today`.
    pub(crate) fn get_duties_with_last_occurrence(
        &self,
        category: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<DutyWithLastOccurrence>> {
        let duties = match category {
            Some(c) => self.get_duties_by_category(c)?,
            None => self.get_duties()?,
        };

        let mut result = Vec::with_capacity(duties.len());
        for duty in duties {
            let last_occurrence = match duty.id {
                Some(id) => self.get_last_occurrence(id)?,
                None => None,
            };
            let has_current_month_occurrence = last_occurrence
                .as_ref()
                .is_some_and(|o| o.is_in_month(today.year(), today.month()));
            result.push(DutyWithLastOccurrence {
                duty,
                last_occurrence,
                has_current_month_occurrence,
            });
        }
        Ok(result)
    }
}

impl OccurrenceSource for Database {
    fn fetch_occurrences(&self, category: Option<&str>) -> Result<Vec<Occurrence>> {
        self.get_occurrences_with_duty_info(category)
    }
}

// ── Row mapping ───────────────────────────────────────────────

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Negative amounts are the legacy "no amount" marker.
fn amount_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f64>> {
    let amount: Option<f64> = row.get(idx)?;
    Ok(amount.filter(|a| *a >= 0.0))
}

fn duty_from_row(row: &Row<'_>) -> rusqlite::Result<Duty> {
    Ok(Duty {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        duty_type: DutyType::parse(&row.get::<_, String>(3)?),
        category_name: row.get(4)?,
        start_date: date_column(row, 5)?,
        due_date: date_column(row, 6)?,
        reminder_days: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn occurrence_from_row(row: &Row<'_>) -> rusqlite::Result<DutyOccurrence> {
    Ok(DutyOccurrence {
        id: Some(row.get(0)?),
        duty_id: row.get(1)?,
        paid_amount: amount_column(row, 2)?,
        completed_date: date_column(row, 3)?,
    })
}

#[cfg(test)]
mod tests;
