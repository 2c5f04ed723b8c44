use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::CookieError;

/// Format used by the `expires` attribute (RFC 1123, always GMT).
pub const COOKIE_EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A single cookie together with the scoping attributes it was written with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub expires: DateTime<Utc>,
}

impl Cookie {
    /// Renders the cookie the way it is assigned to `document.cookie`:
    /// `name=value;domain=…;expires=…;path=…`.
    pub fn to_header_string(&self) -> String {
        format!(
            "{}={};domain={};expires={};path={}",
            self.name,
            self.value,
            self.domain,
            self.expires.format(COOKIE_EXPIRES_FORMAT),
            self.path
        )
    }

    /// Returns true when the cookie has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// Checks that name and value can be carried in a cookie header.
    pub fn validate(&self) -> Result<(), CookieError> {
        if self.name.is_empty()
            || self
                .name
                .chars()
                .any(|c| c.is_control() || c.is_whitespace() || matches!(c, '=' | ';' | ','))
        {
            return Err(CookieError::InvalidName(self.name.clone()));
        }
        if self.value.chars().any(|c| c.is_control() || c == ';') {
            return Err(CookieError::InvalidValue(format!(
                "value of '{}' contains ';' or control characters",
                self.name
            )));
        }
        Ok(())
    }
}
