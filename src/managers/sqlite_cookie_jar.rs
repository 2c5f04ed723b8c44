//! SQLite-backed cookie jar.
//!
//! Stores cookies the way a browser profile does: one row per cookie with
//! host, path and expiry, so history survives process restarts.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::managers::cookie_jar::CookieJar;
use crate::types::cookie::Cookie;
use crate::types::errors::CookieError;

/// Cookie jar backed by a SQLite connection.
pub struct SqliteCookieJar<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCookieJar<'a> {
    /// Creates a new `SqliteCookieJar` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_cookie(row: &rusqlite::Row) -> rusqlite::Result<Cookie> {
        let expiry: i64 = row.get(4)?;
        Ok(Cookie {
            name: row.get(0)?,
            value: row.get(1)?,
            domain: row.get(2)?,
            path: row.get(3)?,
            expires: DateTime::from_timestamp(expiry, 0).unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    /// Returns the live cookie called `name` with all of its attributes.
    pub fn cookie(&self, name: &str) -> Result<Option<Cookie>, CookieError> {
        let cookie = self
            .conn
            .query_row(
                "SELECT name, value, host, path, expiry FROM cookies \
                 WHERE name = ?1 AND expiry > ?2",
                params![name, Utc::now().timestamp()],
                Self::row_to_cookie,
            )
            .optional()?;
        Ok(cookie)
    }

    /// Lists all live cookies ordered by name.
    pub fn list(&self) -> Result<Vec<Cookie>, CookieError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, value, host, path, expiry FROM cookies \
             WHERE expiry > ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![Utc::now().timestamp()], Self::row_to_cookie)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Deletes cookies that expired at or before `now`. Returns the number removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, CookieError> {
        let removed = self
            .conn
            .execute("DELETE FROM cookies WHERE expiry <= ?1", params![now.timestamp()])?;
        if removed > 0 {
            tracing::debug!(removed, "purged expired cookies");
        }
        Ok(removed)
    }
}

impl<'a> CookieJar for SqliteCookieJar<'a> {
    fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        Ok(self.cookie(name)?.map(|c| c.value))
    }

    fn set(&mut self, cookie: Cookie) -> Result<(), CookieError> {
        cookie.validate()?;
        self.conn.execute(
            "INSERT OR REPLACE INTO cookies (name, value, host, path, expiry, last_written) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                cookie.name,
                cookie.value,
                cookie.domain,
                cookie.path,
                cookie.expires.timestamp(),
                Utc::now().timestamp_millis()
            ],
        )?;
        Ok(())
    }
}
