//! Unit tests for the HistoryStore history operations.
//!
//! Uses an in-memory cookie jar; tests that need persistence across store
//! instances use the SQLite jar.

use std::sync::{Arc, Mutex};

use cookie_history::config::HistoryConfig;
use cookie_history::database::Database;
use cookie_history::managers::cookie_jar::{CookieJar, MemoryCookieJar};
use cookie_history::managers::history_store::HistoryStore;
use cookie_history::managers::sqlite_cookie_jar::SqliteCookieJar;
use cookie_history::services::codec;
use cookie_history::services::notifier::HistoryNotifier;
use cookie_history::types::history::{HistoryContext, HistoryEntry, NotificationPayload};

fn ctx(pairs: &[(&str, &str)]) -> HistoryContext {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn crm() -> HistoryContext {
    ctx(&[("applicationName", "crm"), ("tenantid", "acme")])
}

fn visit(username: &str, title: &str, context: &HistoryContext) -> HistoryEntry {
    let page = title.to_lowercase();
    let mut entry = HistoryEntry::new(username, title, &page, Some(format!("/{}", page).as_str()));
    entry.context = context.clone();
    entry
}

fn setup() -> HistoryStore<MemoryCookieJar> {
    HistoryStore::new(MemoryCookieJar::new(), HistoryConfig::default()).expect("valid config")
}

fn titles(entries: &[HistoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.title.as_str()).collect()
}

/// Notifier that records every payload it receives.
#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<NotificationPayload>>>,
}

impl HistoryNotifier for RecordingNotifier {
    fn notify(&self, payload: NotificationPayload) {
        self.sent.lock().unwrap().push(payload);
    }
}

#[test]
fn test_add_entry_then_get_history() {
    let mut store = setup();
    assert!(store.add_entry(visit("alice", "Dashboard", &crm()), None));
    assert!(store.add_entry(visit("alice", "Customers", &crm()), None));

    let history = store.get_history("alice", &crm());
    assert_eq!(titles(&history), vec!["Dashboard", "Customers"]);
    assert_eq!(history[1].url.as_deref(), Some("/customers"));
}

#[test]
fn test_five_inserts_keep_last_four() {
    let mut store = setup();
    for title in ["P1", "P2", "P3", "P4", "P5"] {
        assert!(store.add_entry(visit("alice", title, &crm()), None));
    }
    let history = store.get_history("alice", &crm());
    assert_eq!(titles(&history), vec!["P2", "P3", "P4", "P5"]);
}

#[test]
fn test_long_url_is_rejected_and_history_unchanged() {
    let mut store = setup();
    store.add_entry(visit("alice", "Dashboard", &crm()), None);
    let before = store.jar().get("clr.history").unwrap();

    let mut entry = visit("alice", "Search", &crm());
    entry.url = Some(format!("/search?q={}", "x".repeat(246)));
    assert_eq!(entry.url.as_ref().unwrap().len(), 256);
    assert!(!store.add_entry(entry.clone(), None));

    // A duplicate of an existing page is not removed by a rejected add either.
    entry.title = "Dashboard".to_string();
    assert!(!store.add_entry(entry, None));

    assert_eq!(store.jar().get("clr.history").unwrap(), before);
}

#[test]
fn test_url_just_under_limit_is_accepted() {
    let mut store = setup();
    let mut entry = visit("alice", "Search", &crm());
    entry.url = Some("u".repeat(255));
    assert!(store.add_entry(entry, None));
}

#[test]
fn test_entry_without_url_is_accepted() {
    let mut store = setup();
    let entry = HistoryEntry::new("alice", "Home", "home", None);
    assert!(store.add_entry(entry, None));
    assert_eq!(store.get_history("alice", &HistoryContext::new()).len(), 1);
}

#[test]
fn test_revisit_moves_entry_to_end() {
    let mut store = setup();
    for title in ["A", "B", "A"] {
        store.add_entry(visit("alice", title, &crm()), None);
    }
    assert_eq!(titles(&store.get_history("alice", &crm())), vec!["B", "A"]);
}

#[test]
fn test_display_example_sequence() {
    let mut store = setup();
    for title in ["A", "B", "A", "C"] {
        store.add_entry(visit("alice", title, &crm()), None);
    }
    let display = store.get_history_for_display("alice", &crm());
    assert_eq!(titles(&display), vec!["B", "A"]);
}

#[test]
fn test_display_excludes_current_title_and_duplicates() {
    let mut store = setup();
    // Same title under different contexts produces duplicates in a broad query.
    store.add_entry(visit("alice", "Orders", &ctx(&[("applicationName", "crm"), ("tenantid", "t1")])), None);
    store.add_entry(visit("alice", "Orders", &ctx(&[("applicationName", "crm"), ("tenantid", "t2")])), None);
    store.add_entry(visit("alice", "Reports", &ctx(&[("applicationName", "crm"), ("tenantid", "t1")])), None);
    store.add_entry(visit("alice", "Home", &ctx(&[("applicationName", "crm"), ("tenantid", "t2")])), None);

    let broad = ctx(&[("applicationName", "crm")]);
    assert_eq!(store.get_history("alice", &broad).len(), 4);

    let display = store.get_history_for_display("alice", &broad);
    assert_eq!(titles(&display), vec!["Orders", "Reports"]);
}

#[test]
fn test_display_caps_at_four_distinct_titles() {
    let mut store = setup();
    let contexts: Vec<HistoryContext> = (0..3)
        .map(|i| ctx(&[("applicationName", "crm"), ("tenantid", format!("t{}", i).as_str())]))
        .collect();
    for (i, title) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
        store.add_entry(visit("alice", title, &contexts[i % 3]), None);
    }
    let display = store.get_history_for_display("alice", &ctx(&[("applicationName", "crm")]));
    assert_eq!(titles(&display), vec!["B", "C", "D", "E"]);
}

#[test]
fn test_display_of_single_entry_is_empty() {
    let mut store = setup();
    store.add_entry(visit("alice", "Home", &crm()), None);
    assert!(store.get_history_for_display("alice", &crm()).is_empty());
    assert!(store.get_history_for_display("nobody", &crm()).is_empty());
}

#[test]
fn test_other_users_and_contexts_survive() {
    let mut store = setup();
    let erp = ctx(&[("applicationName", "erp"), ("tenantid", "acme")]);
    store.add_entry(visit("bob", "Ledger", &erp), None);
    for title in ["P1", "P2", "P3", "P4", "P5", "P6"] {
        store.add_entry(visit("alice", title, &crm()), None);
    }
    store.remove_entry(&visit("alice", "P6", &crm()));

    assert_eq!(titles(&store.get_history("bob", &erp)), vec!["Ledger"]);
    assert_eq!(titles(&store.get_history("alice", &crm())), vec!["P3", "P4", "P5"]);
    assert!(store.get_history("alice", &erp).is_empty());
}

#[test]
fn test_context_requires_all_keys_to_match() {
    let mut store = setup();
    store.add_entry(visit("alice", "Home", &crm()), None);

    let wrong_app = ctx(&[("applicationName", "erp"), ("tenantid", "acme")]);
    assert!(store.get_history("alice", &wrong_app).is_empty());
    assert_eq!(store.get_history("alice", &HistoryContext::new()).len(), 1);
}

#[test]
fn test_remove_entry() {
    let mut store = setup();
    for title in ["A", "B", "C"] {
        store.add_entry(visit("alice", title, &crm()), None);
    }
    store.remove_entry(&visit("alice", "B", &crm()));
    assert_eq!(titles(&store.get_history("alice", &crm())), vec!["A", "C"]);

    // Removing something absent is harmless.
    store.remove_entry(&visit("alice", "Z", &crm()));
    assert_eq!(store.get_history("alice", &crm()).len(), 2);
}

#[test]
fn test_reset_history_clears_everyone() {
    let mut store = setup();
    store.add_entry(visit("alice", "A", &crm()), None);
    store.add_entry(visit("bob", "B", &crm()), None);

    store.reset_history();
    assert!(store.get_history("alice", &crm()).is_empty());
    assert!(store.get_history("bob", &HistoryContext::new()).is_empty());
    assert_eq!(store.jar().get("clr.history").unwrap().as_deref(), Some("W10!"));
}

#[test]
fn test_global_budget_drops_oldest_entries() {
    let mut store = setup();
    let long_title = "T".repeat(40);
    for i in 0..10 {
        let context = ctx(&[("applicationName", format!("app{}", i).as_str())]);
        let entry = visit("alice", &format!("{}{}", long_title, i), &context);
        assert!(store.add_entry(entry, None));
    }

    let all = store.get_history("alice", &HistoryContext::new());
    assert!(all.len() > 1 && all.len() < 10);
    assert!(codec::serialized_len(&all) <= 1024);
    // The newest entry always survives.
    assert!(all.last().unwrap().title.ends_with('9'));
    let first_kept: usize = all[0].title.trim_start_matches('T').parse().unwrap();
    let kept: Vec<usize> = all
        .iter()
        .map(|e| e.title.trim_start_matches('T').parse().unwrap())
        .collect();
    assert_eq!(kept, (first_kept..10).collect::<Vec<_>>());
}

#[test]
fn test_corrupt_cookie_reads_as_empty_and_is_replaced() {
    let mut store = HistoryStore::new(
        MemoryCookieJar::from_document_cookie("clr.history=garbage"),
        HistoryConfig::default(),
    )
    .unwrap();
    assert!(store.get_history("alice", &crm()).is_empty());

    assert!(store.add_entry(visit("alice", "Home", &crm()), None));
    assert_eq!(titles(&store.get_history("alice", &crm())), vec!["Home"]);
}

#[test]
fn test_cookie_attributes_default_domain_and_override() {
    let config = HistoryConfig::default().with_hostname("app.example.com");
    let mut store = HistoryStore::new(MemoryCookieJar::new(), config).unwrap();

    store.add_entry(visit("alice", "Home", &crm()), None);
    let cookie = store.jar().cookie("clr.history").unwrap().clone();
    assert_eq!(cookie.domain, "example.com");
    assert_eq!(cookie.path, "/");
    assert_eq!(cookie.expires, store.expires());
    assert!(cookie.to_header_string().starts_with("clr.history="));

    store.add_entry(visit("alice", "Other", &crm()), Some("app.example.com"));
    assert_eq!(store.jar().cookie("clr.history").unwrap().domain, "app.example.com");
}

#[test]
fn test_history_persists_across_store_instances() {
    let db = Database::open_in_memory().unwrap();
    {
        let mut store = HistoryStore::new(SqliteCookieJar::new(db.connection()), HistoryConfig::default()).unwrap();
        store.add_entry(visit("alice", "A", &crm()), None);
        store.add_entry(visit("alice", "B", &crm()), None);
    }
    let store = HistoryStore::new(SqliteCookieJar::new(db.connection()), HistoryConfig::default()).unwrap();
    assert_eq!(titles(&store.get_history("alice", &crm())), vec!["A", "B"]);
}

#[test]
fn test_notifier_receives_every_entry_including_rejected() {
    let notifier = RecordingNotifier::default();
    let sent = notifier.sent.clone();
    let mut store = setup().with_notifier(Box::new(notifier));

    let mut entry = visit("alice", "Orders", &crm());
    entry.context.insert("context".to_string(), "sales".to_string());
    assert!(store.add_entry(entry, None));

    let mut too_long = visit("alice", "Search", &crm());
    too_long.url = Some("x".repeat(300));
    assert!(!store.add_entry(too_long, None));

    assert_eq!(titles(&store.get_history("alice", &crm())), vec!["Orders"]);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].username, "alice");
    assert_eq!(sent[0].page_name, "orders");
    assert_eq!(sent[0].application_name.as_deref(), Some("crm"));
    assert_eq!(sent[0].tenant_id.as_deref(), Some("acme"));
    assert_eq!(sent[0].context.as_deref(), Some("sales"));
    assert_eq!(sent[0].url.as_deref(), Some("/orders"));
    assert_eq!(sent[1].page_name, "search");
    assert_eq!(sent[1].url.as_deref().map(str::len), Some(300));
}

#[test]
fn test_rejected_entry_is_notified_but_keeps_its_duplicate() {
    let notifier = RecordingNotifier::default();
    let sent = notifier.sent.clone();
    let mut store = setup().with_notifier(Box::new(notifier));

    store.add_entry(visit("alice", "Search", &crm()), None);
    store.add_entry(visit("alice", "Orders", &crm()), None);
    let before = store.jar().get("clr.history").unwrap();

    let mut too_long = visit("alice", "Search", &crm());
    too_long.url = Some("x".repeat(300));
    assert!(!store.add_entry(too_long, None));

    assert_eq!(store.jar().get("clr.history").unwrap(), before);
    assert_eq!(titles(&store.get_history("alice", &crm())), vec!["Search", "Orders"]);
    assert_eq!(sent.lock().unwrap().len(), 3);
}

#[test]
fn test_entry_without_context_replaces_same_title_in_every_context() {
    let mut store = setup();
    let erp = ctx(&[("applicationName", "erp"), ("tenantid", "acme")]);
    store.add_entry(visit("alice", "Home", &crm()), None);
    store.add_entry(visit("alice", "Home", &erp), None);
    store.add_entry(visit("alice", "Orders", &crm()), None);
    store.add_entry(visit("bob", "Home", &crm()), None);

    assert!(store.add_entry(visit("alice", "Home", &HistoryContext::new()), None));

    // An empty context matches every context of the user, so both earlier
    // visits are treated as the same page and dropped.
    assert_eq!(titles(&store.get_history("alice", &crm())), vec!["Orders"]);
    assert!(store.get_history("alice", &erp).is_empty());
    assert_eq!(
        titles(&store.get_history("alice", &HistoryContext::new())),
        vec!["Orders", "Home"]
    );
    assert_eq!(titles(&store.get_history("bob", &crm())), vec!["Home"]);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = HistoryConfig {
        max_entries_per_context: 0,
        ..HistoryConfig::default()
    };
    assert!(HistoryStore::new(MemoryCookieJar::new(), config).is_err());
}
