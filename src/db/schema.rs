pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS duties (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    title                 TEXT NOT NULL,
    description           TEXT NOT NULL DEFAULT '',
    duty_type             TEXT NOT NULL DEFAULT 'ACTIONABLE',
    category_name         TEXT NOT NULL,
    start_date            TEXT NOT NULL,
    due_date              TEXT NOT NULL,
    reminder_days_before  INTEGER,
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_duties_category ON duties(category_name);

CREATE TABLE IF NOT EXISTS duty_occurrences (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    duty_id         INTEGER NOT NULL REFERENCES duties(id) ON DELETE CASCADE,
    paid_amount     REAL,
    completed_date  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_duty_occurrences_duty ON duty_occurrences(duty_id);
CREATE INDEX IF NOT EXISTS idx_duty_occurrences_date ON duty_occurrences(completed_date);
"#;

pub(crate) const CURRENT_VERSION: i32 = 2;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // v1 stored a missing amount as -1 and had no date index
    (
        1,
        "UPDATE duty_occurrences SET paid_amount = NULL WHERE paid_amount < 0;
         CREATE INDEX IF NOT EXISTS idx_duty_occurrences_date ON duty_occurrences(completed_date);",
    ),
];
