//! History Store.
//!
//! Keeps a bounded, per-user, per-context navigation history in a single
//! cookie, plus per-user settings in a second cookie. Every mutation is a full
//! load → transform → store round trip; nothing is cached between calls except
//! the latest settings published to subscribers.

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::config::HistoryConfig;
use crate::managers::cookie_jar::CookieJar;
use crate::services::codec;
use crate::services::domain::default_cookie_domain;
use crate::services::notifier::{HistoryNotifier, HttpNotifier};
use crate::types::cookie::Cookie;
use crate::types::errors::ConfigError;
use crate::types::history::{HistoryContext, HistoryEntry, NotificationPayload};
use crate::types::settings::HistorySettings;

/// History and settings store over a [`CookieJar`].
pub struct HistoryStore<J: CookieJar> {
    jar: J,
    config: HistoryConfig,
    notifier: Option<Box<dyn HistoryNotifier>>,
    expires: DateTime<Utc>,
    settings_tx: watch::Sender<Vec<HistorySettings>>,
}

impl<J: CookieJar> HistoryStore<J> {
    /// Creates a store over `jar`.
    ///
    /// The cookie expiry is fixed here, `expiry_days` from now, and reused
    /// for every write made by this store. When the config names a
    /// notification URL an [`HttpNotifier`] is installed.
    pub fn new(jar: J, config: HistoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let expires = Utc::now() + Duration::days(config.expiry_days);
        let notifier: Option<Box<dyn HistoryNotifier>> = config
            .notification_url
            .as_deref()
            .map(|url| Box::new(HttpNotifier::for_endpoint(url)) as Box<dyn HistoryNotifier>);
        let (settings_tx, _) = watch::channel(Vec::new());

        Ok(Self {
            jar,
            config,
            notifier,
            expires,
            settings_tx,
        })
    }

    /// Replaces the notifier.
    pub fn with_notifier(mut self, notifier: Box<dyn HistoryNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Expiry stamped on every cookie this store writes.
    pub fn expires(&self) -> DateTime<Utc> {
        self.expires
    }

    pub fn jar(&self) -> &J {
        &self.jar
    }

    // --- History ---

    /// Records a navigation event.
    ///
    /// Every call is reported to the notifier, rejected ones included.
    /// Returns `false` when the URL is too long (the cookie is left alone) or
    /// when the cookie could not be written.
    pub fn add_entry(&mut self, entry: HistoryEntry, domain: Option<&str>) -> bool {
        if let Some(notifier) = &self.notifier {
            notifier.notify(NotificationPayload::from(&entry));
        }

        if let Some(url) = &entry.url {
            let len = url.chars().count();
            if len >= self.config.max_url_size {
                tracing::debug!(
                    username = %entry.username,
                    url_len = len,
                    "url too long, history entry not recorded"
                );
                return false;
            }
        }

        let mut history = self.load_history();
        history.retain(|existing| !existing.is_same_page(&entry));

        let username = entry.username.clone();
        let context = entry.context.clone();
        history.push(entry);

        // Keep only the newest entries of this user/context slice.
        let in_slice = |e: &HistoryEntry| e.username == username && e.matches_context(&context);
        let slice_len = history.iter().filter(|e| in_slice(*e)).count();
        let mut excess = slice_len.saturating_sub(self.config.max_entries_per_context);
        history.retain(|e| {
            if excess > 0 && in_slice(e) {
                excess -= 1;
                false
            } else {
                true
            }
        });

        self.store_history(history, domain)
    }

    /// Entries of `username` whose context contains every key of `context`,
    /// oldest first.
    pub fn get_history(&self, username: &str, context: &HistoryContext) -> Vec<HistoryEntry> {
        self.load_history()
            .into_iter()
            .filter(|e| e.username == username && e.matches_context(context))
            .collect()
    }

    /// Entries to show in a history widget.
    ///
    /// The current page (the newest entry) is left out, as is every other
    /// entry with its title. Scanning from newest to oldest, the first
    /// `max_display_entries` distinct titles are kept; the result is returned
    /// oldest first.
    pub fn get_history_for_display(
        &self,
        username: &str,
        context: &HistoryContext,
    ) -> Vec<HistoryEntry> {
        let history = self.get_history(username, context);
        let Some(current) = history.last() else {
            return history;
        };
        let current_title = current.title.clone();

        let mut seen: Vec<&str> = Vec::new();
        let mut to_display: Vec<HistoryEntry> = Vec::new();
        for entry in history.iter().rev() {
            if seen.len() >= self.config.max_display_entries {
                break;
            }
            if entry.title == current_title || seen.contains(&entry.title.as_str()) {
                continue;
            }
            seen.push(&entry.title);
            to_display.push(entry.clone());
        }

        to_display.reverse();
        to_display
    }

    /// Removes every entry matching `entry`'s (username, title, context).
    pub fn remove_entry(&mut self, entry: &HistoryEntry) {
        let mut history = self.load_history();
        let before = history.len();
        history.retain(|existing| !existing.is_same_page(entry));
        tracing::debug!(
            username = %entry.username,
            removed = before - history.len(),
            "removed history entries"
        );
        self.store_history(history, None);
    }

    /// Clears the history of every user.
    pub fn reset_history(&mut self) {
        self.store_history(Vec::new(), None);
    }

    /// Drops the oldest entries until the serialized collection fits
    /// `max_size`. Never removes from the end.
    pub fn reduce_to_size_budget(&self, entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        let mut reduced = entries;
        let mut dropped = 0usize;
        while !reduced.is_empty() && codec::serialized_len(&reduced) > self.config.max_size {
            reduced.remove(0);
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!(dropped, kept = reduced.len(), "history trimmed to size budget");
        }
        reduced
    }

    fn load_history(&self) -> Vec<HistoryEntry> {
        match self.jar.get(&self.config.cookie_name) {
            Ok(Some(value)) => codec::decode(&value),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, cookie = %self.config.cookie_name, "failed to read history cookie");
                Vec::new()
            }
        }
    }

    fn store_history(&mut self, entries: Vec<HistoryEntry>, domain: Option<&str>) -> bool {
        let entries = self.reduce_to_size_budget(entries);
        let value = codec::encode(&entries);
        let name = self.config.cookie_name.clone();
        self.write_cookie(&name, value, domain)
    }

    // --- Settings ---

    /// Ensures `username` has a settings row, without touching an existing one,
    /// and publishes the full settings collection.
    pub fn initialize_settings(&mut self, username: &str, domain: Option<&str>) {
        let settings = self.load_settings();
        if settings.iter().any(|s| s.username == username) {
            self.settings_tx.send_replace(settings);
        } else {
            self.set_history_pinned(username, false, domain);
        }
    }

    /// Sets the pin state of `username`, creating the row when needed, then
    /// persists the settings collection and publishes it once stored.
    pub fn set_history_pinned(&mut self, username: &str, pin: bool, domain: Option<&str>) {
        let mut settings = self.load_settings();
        match settings.iter_mut().find(|s| s.username == username) {
            Some(existing) => existing.history_pinned = pin,
            None => settings.push(HistorySettings::new(username, pin)),
        }

        let value = match codec::encode_settings(&settings) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize history settings");
                return;
            }
        };

        let name = self.config.settings_cookie_name.clone();
        if self.write_cookie(&name, value, domain) {
            self.settings_tx.send_replace(settings);
        }
    }

    /// Subscribes to the settings stream. The receiver immediately holds the
    /// last published collection.
    pub fn subscribe_settings(&self) -> watch::Receiver<Vec<HistorySettings>> {
        self.settings_tx.subscribe()
    }

    /// Last published settings collection.
    pub fn current_settings(&self) -> Vec<HistorySettings> {
        self.settings_tx.borrow().clone()
    }

    /// Whether `username`'s history is pinned according to the persisted settings.
    pub fn is_history_pinned(&self, username: &str) -> bool {
        self.load_settings()
            .iter()
            .any(|s| s.username == username && s.history_pinned)
    }

    fn load_settings(&self) -> Vec<HistorySettings> {
        let value = match self.jar.get(&self.config.settings_cookie_name) {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read history settings cookie");
                return Vec::new();
            }
        };
        codec::try_decode_settings(&value).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "discarding malformed history settings cookie");
            Vec::new()
        })
    }

    // --- Cookies ---

    fn write_cookie(&mut self, name: &str, value: String, domain: Option<&str>) -> bool {
        let domain = match domain {
            Some(d) => d.to_string(),
            None => default_cookie_domain(&self.config.hostname),
        };
        let cookie = Cookie {
            name: name.to_string(),
            value,
            domain,
            path: "/".to_string(),
            expires: self.expires,
        };

        match self.jar.set(cookie) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, cookie = %name, "failed to write cookie");
                false
            }
        }
    }
}
