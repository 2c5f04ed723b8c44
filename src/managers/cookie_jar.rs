//! Cookie jar abstraction.
//!
//! A jar is the only durability layer the history store knows about: a
//! name-keyed string store whose entries carry domain, path and expiry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::types::cookie::Cookie;
use crate::types::errors::CookieError;

/// Trait defining cookie storage operations.
pub trait CookieJar {
    /// Returns the value of the live cookie called `name`, if any.
    fn get(&self, name: &str) -> Result<Option<String>, CookieError>;
    /// Stores `cookie`, replacing any previous cookie with the same name.
    fn set(&mut self, cookie: Cookie) -> Result<(), CookieError>;
}

/// In-memory cookie jar, the equivalent of a single page's `document.cookie`.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    cookies: HashMap<String, Cookie>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a jar from a `document.cookie` string. Such strings carry no
    /// attributes, so the cookies get an empty domain, path `/` and no expiry.
    /// When a name repeats, the first pair wins, as in a browser.
    pub fn from_document_cookie(document_cookie: &str) -> Self {
        let mut cookies = HashMap::new();
        let pairs = document_cookie
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| !name.is_empty());
        for (name, value) in pairs {
            cookies.entry(name.to_string()).or_insert_with(|| Cookie {
                name: name.to_string(),
                value: value.to_string(),
                domain: String::new(),
                path: "/".to_string(),
                expires: DateTime::<Utc>::MAX_UTC,
            });
        }
        Self { cookies }
    }

    /// Renders the live cookies as a `document.cookie` string, sorted by name.
    pub fn document_cookie(&self) -> String {
        let now = Utc::now();
        let mut pairs: Vec<String> = self
            .cookies
            .values()
            .filter(|c| !c.is_expired_at(now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        pairs.sort();
        pairs.join("; ")
    }

    /// Returns the full cookie, attributes included.
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        Ok(self
            .cookies
            .get(name)
            .filter(|c| !c.is_expired_at(Utc::now()))
            .map(|c| c.value.clone()))
    }

    fn set(&mut self, cookie: Cookie) -> Result<(), CookieError> {
        cookie.validate()?;
        self.cookies.insert(cookie.name.clone(), cookie);
        Ok(())
    }
}
