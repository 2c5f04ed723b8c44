// Cookie domain resolution
// Picks the domain attribute used when the caller does not override it.

use std::net::IpAddr;

/// Returns the default cookie domain for `hostname`.
///
/// The first label is dropped so the cookie is shared with sibling hosts
/// (`app.example.com` → `example.com`). Single-label hosts such as
/// `localhost` and IP literals are returned unchanged.
pub fn default_cookie_domain(hostname: &str) -> String {
    let host = hostname.trim().trim_end_matches('.');
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if bare.parse::<IpAddr>().is_ok() {
        return host.to_string();
    }

    match host.split_once('.') {
        Some((_, parent)) if !parent.is_empty() => parent.to_string(),
        _ => host.to_string(),
    }
}
