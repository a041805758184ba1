//! SQL schema for the Escopo SQLite directory.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS identities (
    uid               TEXT PRIMARY KEY,
    email             TEXT,
    disabled          INTEGER NOT NULL DEFAULT 0,
    creation_time     TEXT NOT NULL,   -- RFC 3339 UTC
    last_sign_in_time TEXT,            -- NULL until first sign in
    custom_claims     TEXT NOT NULL DEFAULT '{}'
);

-- Documents of the `users` collection. Deliberately no foreign key: a
-- profile may outlive (or predate) its account.
CREATE TABLE IF NOT EXISTS profiles (
    id            TEXT PRIMARY KEY,
    license_type  TEXT,
    trial_ends_at TEXT
);

-- Only the SHA-256 digest of a bearer token is ever stored.
CREATE TABLE IF NOT EXISTS credentials (
    token_hash TEXT PRIMARY KEY,
    uid        TEXT NOT NULL REFERENCES identities(uid),
    issued_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS credentials_uid_idx ON credentials(uid);

PRAGMA user_version = 1;
";
