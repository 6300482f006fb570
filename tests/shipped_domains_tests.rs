//! The domain configurations shipped in `domains/` must stay loadable.

use std::path::PathBuf;
use std::sync::Arc;

use ticketgen::{DomainStore, LanguageCode, TicketEngine};

fn shipped_store() -> DomainStore {
    let domains_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("domains");
    DomainStore::new(domains_dir)
}

#[test]
fn shipped_domains_are_listed() {
    let store = shipped_store();
    assert_eq!(store.list(), vec!["banking", "medical"]);
}

#[test]
fn shipped_domains_validate() {
    let store = shipped_store();
    for name in store.list() {
        let (valid, message) = store.validate(&name);
        assert!(valid, "{message}");
    }
}

#[test]
fn banking_domain_renders_in_both_languages() {
    let store = shipped_store();
    let config = store.load("banking").unwrap();
    assert_eq!(config.languages(), &[LanguageCode::Pl, LanguageCode::En]);

    let mut engine = TicketEngine::new(Arc::clone(&config), Some(42)).unwrap();
    for language in [LanguageCode::Pl, LanguageCode::En] {
        let ticket = engine.render_document(language).unwrap();
        assert!(!ticket.content.is_empty());
        assert!(!ticket.content.contains("{{"));
        assert!(config.categories().contains_key(&ticket.category));
    }
}
