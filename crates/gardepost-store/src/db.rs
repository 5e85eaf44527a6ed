use rusqlite::Connection;

use crate::error::Result;

/// Initialise the full schema in `conn`.
///
/// Safe to call on every startup — uses `IF NOT EXISTS` throughout. The
/// index on `posts (pharmacy_id, scheduled_at)` keeps the duplicate-guard
/// query cheap even with years of history.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pharmacies (
            id                TEXT    NOT NULL PRIMARY KEY,
            name              TEXT    NOT NULL,
            facebook_page_id  TEXT,
            posting_day       TEXT    NOT NULL,
            posting_frequency TEXT    NOT NULL,
            address           TEXT    NOT NULL,
            latitude          REAL,
            longitude         REAL,
            radius_km         INTEGER NOT NULL DEFAULT 1,
            api_mode          TEXT    NOT NULL DEFAULT 'threshold',
            duty_api_token    TEXT    NOT NULL,
            page_access_token TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS posts (
            id           TEXT NOT NULL PRIMARY KEY,
            pharmacy_id  TEXT NOT NULL,
            image_path   TEXT NOT NULL,
            scheduled_at TEXT NOT NULL,   -- RFC 3339 UTC
            status       TEXT NOT NULL DEFAULT 'scheduled',
            fb_post_id   TEXT,
            FOREIGN KEY (pharmacy_id) REFERENCES pharmacies(id)
        );

        -- Duplicate guard: one lookup per pharmacy per calendar day.
        CREATE INDEX IF NOT EXISTS idx_posts_pharmacy_day
            ON posts (pharmacy_id, scheduled_at);

        CREATE TABLE IF NOT EXISTS post_message (
            id      TEXT NOT NULL PRIMARY KEY,
            message TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}
