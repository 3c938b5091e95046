//! SQL schema for the Rollcall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY,
    full_name     TEXT    NOT NULL,
    role          TEXT    NOT NULL DEFAULT 'student',
    template_pos  INTEGER UNIQUE,          -- sensor slot; NULL until enrolled
    date_enrolled TEXT    NOT NULL         -- ISO 8601 UTC; server-assigned
);

-- Attendance is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS attendance (
    log_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(user_id),
    scan_time   TEXT    NOT NULL,
    status      TEXT    NOT NULL DEFAULT 'present',
    course_code TEXT,
    synced      INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS attendance_user_idx ON attendance(user_id);
CREATE INDEX IF NOT EXISTS attendance_time_idx ON attendance(scan_time);

PRAGMA user_version = 1;
";
