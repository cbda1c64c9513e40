#![allow(clippy::unwrap_used)]

use super::*;
use crate::review::load_review;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn make_duty(title: &str, duty_type: DutyType, category: &str) -> Duty {
    Duty::new(
        title.into(),
        duty_type,
        category.into(),
        date("2024-01-01"),
        date("2024-01-10"),
    )
}

/// Two personal duties and one company duty with a spread of occurrences.
fn setup_test_data(db: &Database) -> (i64, i64, i64) {
    let rent = db
        .insert_duty(&make_duty("Rent", DutyType::Payable, "Personal"))
        .unwrap();
    let gym = db
        .insert_duty(&make_duty("Gym", DutyType::Actionable, "Personal"))
        .unwrap();
    let taxes = db
        .insert_duty(&make_duty("Taxes", DutyType::Payable, "Company"))
        .unwrap();

    let occurrences = [
        DutyOccurrence::new(rent, Some(1200.0), date("2024-01-05")),
        DutyOccurrence::new(rent, Some(1250.0), date("2024-02-05")),
        DutyOccurrence::new(gym, None, date("2024-02-10")),
        DutyOccurrence::new(taxes, Some(300.0), date("2024-02-20")),
        DutyOccurrence::new(taxes, Some(310.0), date("2024-03-20")),
    ];
    for occ in &occurrences {
        db.insert_occurrence(occ).unwrap();
    }

    (rent, gym, taxes)
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_duties().unwrap().is_empty());
    assert!(db.get_occurrences_with_duty_info(None).unwrap().is_empty());
}

#[test]
fn test_open_file_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("organizeplus.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_duty(&make_duty("Rent", DutyType::Payable, "Personal"))
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_duties().unwrap().len(), 1);
}

#[test]
fn test_migrates_v1_negative_amount_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER NOT NULL);
             INSERT INTO schema_version (version) VALUES (1);
             CREATE TABLE duties (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL,
                 description TEXT NOT NULL DEFAULT '',
                 duty_type TEXT NOT NULL DEFAULT 'ACTIONABLE',
                 category_name TEXT NOT NULL,
                 start_date TEXT NOT NULL,
                 due_date TEXT NOT NULL,
                 reminder_days_before INTEGER,
                 created_at TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             );
             CREATE TABLE duty_occurrences (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 duty_id INTEGER NOT NULL REFERENCES duties(id) ON DELETE CASCADE,
                 paid_amount REAL,
                 completed_date TEXT NOT NULL
             );
             INSERT INTO duties (title, category_name, start_date, due_date, created_at, updated_at)
                 VALUES ('Gym', 'Personal', '2024-01-01', '2024-01-10', '', '');
             INSERT INTO duty_occurrences (duty_id, paid_amount, completed_date)
                 VALUES (1, -1.0, '2024-01-05');",
        )
        .unwrap();
    }

    let db = Database::open(&path).unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);

    let raw: Option<f64> = db
        .conn
        .query_row("SELECT paid_amount FROM duty_occurrences", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert!(raw.is_none());
}

// ── Duty CRUD ─────────────────────────────────────────────────

#[test]
fn test_duty_without_description_reads_back_empty() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_duty(&make_duty("Gym", DutyType::Actionable, "Personal"))
        .unwrap();
    let fetched = db.get_duty_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.description, "");

    let stored: String = db
        .conn
        .query_row(
            "SELECT description FROM duties WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "");
}

#[test]
fn test_duty_crud() {
    let db = Database::open_in_memory().unwrap();
    let mut duty = make_duty("Electricity", DutyType::Payable, "Personal");
    duty.description = "Monthly power bill".into();
    duty.reminder_days = Some(3);
    let id = db.insert_duty(&duty).unwrap();
    assert!(id > 0);

    let fetched = db.get_duty_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.id, Some(id));
    assert_eq!(fetched.title, "Electricity");
    assert_eq!(fetched.description, "Monthly power bill");
    assert_eq!(fetched.duty_type, DutyType::Payable);
    assert_eq!(fetched.category_name, "Personal");
    assert_eq!(fetched.start_date, date("2024-01-01"));
    assert_eq!(fetched.due_date, date("2024-01-10"));
    assert_eq!(fetched.reminder_days, Some(3));

    let mut edited = fetched.clone();
    edited.title = "Power".into();
    edited.due_date = date("2024-01-15");
    edited.reminder_days = None;
    db.update_duty(&edited).unwrap();

    let updated = db.get_duty_by_id(id).unwrap().unwrap();
    assert_eq!(updated.title, "Power");
    assert_eq!(updated.due_date, date("2024-01-15"));
    assert!(updated.reminder_days.is_none());
    assert_eq!(updated.created_at, fetched.created_at);

    db.delete_duty(id).unwrap();
    assert!(db.get_duty_by_id(id).unwrap().is_none());
}

#[test]
fn test_duty_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_duty_by_id(99999).unwrap().is_none());
}

#[test]
fn test_update_unsaved_or_missing_duty_fails() {
    let db = Database::open_in_memory().unwrap();
    let mut duty = make_duty("Ghost", DutyType::Actionable, "Personal");
    assert!(db.update_duty(&duty).is_err());

    duty.id = Some(424242);
    let err = db.update_duty(&duty).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_delete_missing_duty_fails() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.delete_duty(77).is_err());
}

#[test]
fn test_duties_newest_first_and_by_category() {
    let db = Database::open_in_memory().unwrap();
    let (rent, gym, taxes) = setup_test_data(&db);

    let ids: Vec<i64> = db
        .get_duties()
        .unwrap()
        .iter()
        .filter_map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![taxes, gym, rent]);

    let personal = db.get_duties_by_category("Personal").unwrap();
    assert_eq!(personal.len(), 2);
    assert!(personal.iter().all(|d| d.category_name == "Personal"));

    assert!(db.get_duties_by_category("personal").unwrap().is_empty());
}

// ── Occurrences ───────────────────────────────────────────────

#[test]
fn test_occurrences_by_duty_most_recent_first() {
    let db = Database::open_in_memory().unwrap();
    let (rent, _, _) = setup_test_data(&db);

    let occs = db.get_occurrences_by_duty(rent).unwrap();
    let dates: Vec<NaiveDate> = occs.iter().map(|o| o.completed_date).collect();
    assert_eq!(dates, vec![date("2024-02-05"), date("2024-01-05")]);

    let last = db.get_last_occurrence(rent).unwrap().unwrap();
    assert_eq!(last.completed_date, date("2024-02-05"));
    assert_eq!(last.paid_amount, Some(1250.0));
}

#[test]
fn test_null_amount_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let (_, gym, _) = setup_test_data(&db);
    let occs = db.get_occurrences_by_duty(gym).unwrap();
    assert_eq!(occs.len(), 1);
    assert!(occs[0].paid_amount.is_none());
}

#[test]
fn test_last_occurrence_none_for_new_duty() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_duty(&make_duty("New", DutyType::Actionable, "Company"))
        .unwrap();
    assert!(db.get_last_occurrence(id).unwrap().is_none());
}

#[test]
fn test_occurrence_for_missing_duty_fails() {
    let db = Database::open_in_memory().unwrap();
    let err = db
        .insert_occurrence(&DutyOccurrence::new(999, Some(1.0), date("2024-01-01")))
        .unwrap_err();
    assert!(err.to_string().contains("duty 999"));
}

#[test]
fn test_delete_occurrence() {
    let db = Database::open_in_memory().unwrap();
    let (rent, _, _) = setup_test_data(&db);
    let last = db.get_last_occurrence(rent).unwrap().unwrap();
    db.delete_occurrence(last.id.unwrap()).unwrap();
    assert_eq!(db.get_occurrences_by_duty(rent).unwrap().len(), 1);
    assert!(db.delete_occurrence(last.id.unwrap()).is_err());
}

#[test]
fn test_delete_duty_cascades_occurrences() {
    let db = Database::open_in_memory().unwrap();
    let (rent, _, _) = setup_test_data(&db);
    db.delete_duty(rent).unwrap();
    assert!(db.get_occurrences_by_duty(rent).unwrap().is_empty());
    let remaining = db.get_occurrences_with_duty_info(None).unwrap();
    assert_eq!(remaining.len(), 3);
    assert!(remaining.iter().all(|o| o.duty_id != rent));
}

#[test]
fn test_monthly_occurrences_by_category() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let feb_personal = db.get_monthly_occurrences("Personal", 2024, 2).unwrap();
    assert_eq!(feb_personal.len(), 2);

    let feb_company = db.get_monthly_occurrences("Company", 2024, 2).unwrap();
    assert_eq!(feb_company.len(), 1);
    assert_eq!(feb_company[0].paid_amount, Some(300.0));

    assert!(db
        .get_monthly_occurrences("Company", 2024, 1)
        .unwrap()
        .is_empty());
}

// ── Read models ───────────────────────────────────────────────

#[test]
fn test_occurrences_with_duty_info_join() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let all = db.get_occurrences_with_duty_info(None).unwrap();
    assert_eq!(all.len(), 5);
    let newest = &all[0];
    assert_eq!(newest.duty_title, "Taxes");
    assert_eq!(newest.category_name, "Company");
    assert_eq!(newest.completed_date, date("2024-03-20"));

    let personal = db.get_occurrences_with_duty_info(Some("Personal")).unwrap();
    assert_eq!(personal.len(), 3);
    assert!(personal.iter().all(|o| o.category_name == "Personal"));
}

#[test]
fn test_duties_with_last_occurrence() {
    let db = Database::open_in_memory().unwrap();
    let (rent, gym, taxes) = setup_test_data(&db);
    let fresh = db
        .insert_duty(&make_duty("Insurance", DutyType::Payable, "Personal"))
        .unwrap();

    let listing = db
        .get_duties_with_last_occurrence(None, date("2024-02-28"))
        .unwrap();
    assert_eq!(listing.len(), 4);

    let find = |id: i64| listing.iter().find(|d| d.duty.id == Some(id)).unwrap();
    assert!(find(rent).has_current_month_occurrence);
    assert!(find(gym).has_current_month_occurrence);
    assert!(!find(taxes).has_current_month_occurrence);
    assert_eq!(
        find(taxes).last_occurrence.as_ref().unwrap().completed_date,
        date("2024-03-20")
    );
    assert!(find(fresh).last_occurrence.is_none());
    assert!(!find(fresh).has_current_month_occurrence);

    let company = db
        .get_duties_with_last_occurrence(Some("Company"), date("2024-03-01"))
        .unwrap();
    assert_eq!(company.len(), 1);
    assert!(company[0].has_current_month_occurrence);
}

#[test]
fn test_review_from_database() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let report = load_review(&db, None).unwrap();
    let months: Vec<(i32, u32, f64)> = report
        .monthly_reviews
        .iter()
        .map(|m| (m.year, m.month_number, m.total_paid))
        .collect();
    assert_eq!(
        months,
        vec![(2024, 3, 310.0), (2024, 2, 1550.0), (2024, 1, 1200.0)]
    );
    assert_eq!(report.grand_total, 3060.0);

    let personal = load_review(&db, Some("Personal")).unwrap();
    assert_eq!(personal.grand_total, 2450.0);
    assert_eq!(personal.monthly_reviews.len(), 2);
}
