use serde::{Deserialize, Serialize};

/// Per-user history display preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistorySettings {
    pub username: String,
    #[serde(default)]
    pub history_pinned: bool,
}

impl HistorySettings {
    pub fn new(username: &str, history_pinned: bool) -> Self {
        Self {
            username: username.to_string(),
            history_pinned,
        }
    }
}
