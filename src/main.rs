//! Cookie History console demo.
//!
//! Walks through the history store against an in-memory SQLite cookie jar and
//! prints the resulting cookies. An optional first argument names a JSON
//! config file.

use std::error::Error;

use cookie_history::config::HistoryConfig;
use cookie_history::database::Database;
use cookie_history::managers::history_store::HistoryStore;
use cookie_history::managers::sqlite_cookie_jar::SqliteCookieJar;
use cookie_history::services::codec;
use cookie_history::types::history::{HistoryContext, HistoryEntry};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn titles(entries: &[HistoryEntry]) -> String {
    entries
        .iter()
        .map(|e| e.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => HistoryConfig::load(path)?,
        None => HistoryConfig::default().with_hostname("portal.example.com"),
    };
    tracing::info!(hostname = %config.hostname, "starting cookie history demo");

    let db = Database::open_in_memory()?;
    let jar = SqliteCookieJar::new(db.connection());
    let mut store = HistoryStore::new(jar, config)?;

    let mut context = HistoryContext::new();
    context.insert("applicationName".to_string(), "crm".to_string());
    context.insert("tenantid".to_string(), "acme".to_string());

    section("Recording visits");
    for (title, page) in [
        ("Dashboard", "dashboard"),
        ("Customers", "customers"),
        ("Dashboard", "dashboard"),
        ("Orders", "orders"),
        ("Invoices", "invoices"),
        ("Reports", "reports"),
    ] {
        let mut entry = HistoryEntry::new("alice", title, page, Some(format!("/{}", page).as_str()));
        entry.context = context.clone();
        let added = store.add_entry(entry, None);
        println!("  add {:<10} -> {}", title, added);
    }
    let long_url = format!("/search?q={}", "x".repeat(300));
    let rejected = store.add_entry(HistoryEntry::new("alice", "Search", "search", Some(long_url.as_str())), None);
    println!("  add {:<10} -> {} (url of {} chars)", "Search", rejected, long_url.len());

    section("Reading history");
    let history = store.get_history("alice", &context);
    println!("  history:  [{}]", titles(&history));
    let display = store.get_history_for_display("alice", &context);
    println!("  display:  [{}]", titles(&display));
    println!("  serialized size: {} bytes", codec::serialized_len(&history));

    section("Settings");
    let rx = store.subscribe_settings();
    store.initialize_settings("alice", None);
    store.set_history_pinned("alice", true, None);
    store.initialize_settings("alice", None);
    println!("  published: {:?}", *rx.borrow());
    println!("  alice pinned: {}", store.is_history_pinned("alice"));

    section("Cookies");
    for cookie in store.jar().list()? {
        println!("  {}", cookie.to_header_string());
    }

    store.reset_history();
    println!();
    println!(
        "  after reset: {} entries",
        store.get_history("alice", &context).len()
    );
    Ok(())
}
