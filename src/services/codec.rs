//! History blob codec.
//!
//! The persisted form is `JSON → base64 → cookie-safe substitution`. Base64
//! output can contain `+`, `/` and `=`, none of which belong in a cookie
//! value, so they are swapped for `-`, `_` and `!`. None of the replacements
//! occur in standard base64, which keeps the substitution reversible.
//!
//! `title` and `pageName` are percent-escaped before serialization and
//! unescaped after reading, so arbitrary text survives the round trip.
//!
//! The settings cookie holds percent-escaped JSON. Plain JSON written before
//! escaping was introduced has no `%` sequences and reads back unchanged.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::types::errors::CodecError;
use crate::types::history::HistoryEntry;
use crate::types::settings::HistorySettings;

/// `(base64 character, cookie-safe replacement)`.
const SUBSTITUTIONS: [(char, char); 3] = [('+', '-'), ('/', '_'), ('=', '!')];

fn escape_entry(entry: &HistoryEntry) -> HistoryEntry {
    HistoryEntry {
        title: urlencoding::encode(&entry.title).into_owned(),
        page_name: urlencoding::encode(&entry.page_name).into_owned(),
        ..entry.clone()
    }
}

fn unescape_entry(mut entry: HistoryEntry) -> Result<HistoryEntry, CodecError> {
    entry.title = urlencoding::decode(&entry.title)
        .map_err(|e| CodecError::Escape(format!("title: {}", e)))?
        .into_owned();
    entry.page_name = urlencoding::decode(&entry.page_name)
        .map_err(|e| CodecError::Escape(format!("pageName: {}", e)))?
        .into_owned();
    Ok(entry)
}

/// Serializes entries to the JSON text that gets base64-encoded.
///
/// This is also the text whose length the size budget is measured against.
pub fn to_wire_json(entries: &[HistoryEntry]) -> String {
    let escaped: Vec<HistoryEntry> = entries.iter().map(escape_entry).collect();
    // String-keyed maps and plain strings always serialize.
    serde_json::to_string(&escaped).unwrap_or_else(|_| String::from("[]"))
}

/// Length in bytes of the serialized collection.
pub fn serialized_len(entries: &[HistoryEntry]) -> usize {
    to_wire_json(entries).len()
}

/// Encodes entries into a cookie-safe string.
pub fn encode(entries: &[HistoryEntry]) -> String {
    let mut encoded = BASE64.encode(to_wire_json(entries));
    for (from, to) in SUBSTITUTIONS {
        encoded = encoded.replace(from, &to.to_string());
    }
    encoded
}

/// Decodes a cookie value produced by [`encode`], reporting why it failed.
pub fn try_decode(content: &str) -> Result<Vec<HistoryEntry>, CodecError> {
    let mut base64 = content.trim().to_string();
    for (from, to) in SUBSTITUTIONS {
        base64 = base64.replace(to, &from.to_string());
    }

    let bytes = BASE64
        .decode(base64.as_bytes())
        .map_err(|e| CodecError::Base64(e.to_string()))?;
    let json = String::from_utf8(bytes).map_err(|e| CodecError::Utf8(e.to_string()))?;
    let entries: Vec<HistoryEntry> =
        serde_json::from_str(&json).map_err(|e| CodecError::Json(e.to_string()))?;

    entries.into_iter().map(unescape_entry).collect()
}

/// Decodes a cookie value; malformed content yields an empty history.
pub fn decode(content: &str) -> Vec<HistoryEntry> {
    match try_decode(content) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(error = %e, "discarding malformed history cookie");
            Vec::new()
        }
    }
}

/// Encodes the settings collection into a cookie-safe string.
pub fn encode_settings(settings: &[HistorySettings]) -> Result<String, CodecError> {
    let json = serde_json::to_string(settings).map_err(|e| CodecError::Json(e.to_string()))?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Decodes a settings cookie value produced by [`encode_settings`].
pub fn try_decode_settings(content: &str) -> Result<Vec<HistorySettings>, CodecError> {
    let json = urlencoding::decode(content.trim())
        .map_err(|e| CodecError::Escape(format!("settings: {}", e)))?;
    serde_json::from_str(&json).map_err(|e| CodecError::Json(e.to_string()))
}
