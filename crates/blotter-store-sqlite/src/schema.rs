//! SQL schema for the blotter SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS inmates (
    inmate_id      TEXT PRIMARY KEY,
    booking_number TEXT NOT NULL UNIQUE,
    first_name     TEXT NOT NULL,
    last_name      TEXT NOT NULL,
    age            INTEGER,         -- NULL when the upstream birth field was unusable
    created_at     TEXT NOT NULL    -- ISO 8601 UTC
);

-- Replaced wholesale per inmate on every scrape pass.
-- No UPDATE is ever issued against this table.
CREATE TABLE IF NOT EXISTS charges (
    charge_id         TEXT PRIMARY KEY,
    inmate_id         TEXT NOT NULL REFERENCES inmates(inmate_id) ON DELETE CASCADE,
    description       TEXT NOT NULL,
    bond_amount       TEXT,
    court_case_number TEXT,
    court_location    TEXT,
    note              TEXT
);

-- One marker table per category side, cleared and rebuilt by each
-- classification run. Membership is at most one marker per side.
CREATE TABLE IF NOT EXISTS idx_child_abuse (
    inmate_id  TEXT PRIMARY KEY REFERENCES inmates(inmate_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS idx_non_child_abuse (
    inmate_id  TEXT PRIMARY KEY REFERENCES inmates(inmate_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS idx_murder (
    inmate_id  TEXT PRIMARY KEY REFERENCES inmates(inmate_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS idx_non_murder (
    inmate_id  TEXT PRIMARY KEY REFERENCES inmates(inmate_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS idx_cannabis (
    inmate_id  TEXT PRIMARY KEY REFERENCES inmates(inmate_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS idx_cocaine_fentanyl (
    inmate_id  TEXT PRIMARY KEY REFERENCES inmates(inmate_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS leaderboard_entries (
    entry_id   TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    score      INTEGER NOT NULL,
    mode       TEXT NOT NULL,       -- 'child' | 'murder' | 'drugs'
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS charges_inmate_idx    ON charges(inmate_id);
CREATE INDEX IF NOT EXISTS leaderboard_mode_idx  ON leaderboard_entries(mode, score);

PRAGMA user_version = 1;
";
