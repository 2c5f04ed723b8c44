use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application-defined scoping tags for a history entry, e.g. `applicationName`
/// or `tenantid`.
pub type HistoryContext = BTreeMap<String, String>;

/// One recorded navigation event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub username: String,
    #[serde(default)]
    pub context: HistoryContext,
    pub title: String,
    #[serde(default)]
    pub page_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl HistoryEntry {
    pub fn new(username: &str, title: &str, page_name: &str, url: Option<&str>) -> Self {
        Self {
            username: username.to_string(),
            context: HistoryContext::new(),
            title: title.to_string(),
            page_name: page_name.to_string(),
            url: url.map(str::to_string),
        }
    }

    /// Adds a context tag, builder style.
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    /// Returns true when every key of `query` exists in this entry's context
    /// with the same value. An empty query matches every entry.
    pub fn matches_context(&self, query: &HistoryContext) -> bool {
        query
            .iter()
            .all(|(key, value)| self.context.get(key) == Some(value))
    }

    /// Returns true when `self` and `other` identify the same page for the
    /// same user within `other`'s context.
    pub fn is_same_page(&self, other: &HistoryEntry) -> bool {
        self.username == other.username
            && self.title == other.title
            && self.matches_context(&other.context)
    }
}

/// Body POSTed to the external history endpoint for each recorded entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub username: String,
    pub page_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl From<&HistoryEntry> for NotificationPayload {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            username: entry.username.clone(),
            page_name: entry.page_name.clone(),
            application_name: entry.context.get("applicationName").cloned(),
            tenant_id: entry.context.get("tenantid").cloned(),
            title: entry.title.clone(),
            url: entry.url.clone(),
            context: entry.context.get("context").cloned(),
        }
    }
}
