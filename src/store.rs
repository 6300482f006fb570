//! Domain configuration store: discovery, validation, and memoization.
//!
//! The store resolves a domain name to `<domains_dir>/<name>.yaml`, runs the
//! schema validator on first load, and caches the validated configuration by
//! name. Domains are deployment-time artifacts, so the cache is a plain map
//! with no eviction. The cache is the only mutable shared state in the
//! engine: validated configs are handed out as `Arc<DomainConfig>` and read
//! lock-free by any number of concurrent callers.
//!
//! Concurrent first-loads of the same name may each run the (pure,
//! side-effect-free) validation; the first writer's value survives and the
//! rest adopt it, so the cache holds at most one entry per name.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::ConfigError;
use crate::model::{DomainConfig, LanguageCode};
use crate::validation::validate_domain;

/// File stem reserved for the scaffold users copy when authoring a new
/// domain; never listed as a loadable domain.
const SCAFFOLD_STEM: &str = "template";

pub struct DomainStore {
    domains_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<DomainConfig>>>,
}

impl DomainStore {
    pub fn new(domains_dir: impl Into<PathBuf>) -> Self {
        let domains_dir = domains_dir.into();
        debug!(domains_dir = %domains_dir.display(), "domain store initialized");
        Self {
            domains_dir,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn domains_dir(&self) -> &Path {
        &self.domains_dir
    }

    /// Loads and validates a domain configuration, memoizing the result.
    ///
    /// The first call parses and validates the YAML source; later calls
    /// return the cached `Arc`. Fails with
    /// [`ConfigError::DomainNotFound`] (listing discoverable domains) when
    /// no source exists, and surfaces validator failures unchanged.
    pub fn load(&self, name: &str) -> Result<Arc<DomainConfig>, ConfigError> {
        if let Some(config) = self.cache.read().get(name) {
            debug!(domain = name, "configuration cache hit");
            return Ok(Arc::clone(config));
        }

        let config = Arc::new(self.load_uncached(name)?);
        let mut cache = self.cache.write();
        let cached = cache
            .entry(name.to_string())
            .or_insert_with(|| Arc::clone(&config));
        info!(
            domain = name,
            categories = cached.categories().len(),
            "configuration loaded"
        );
        Ok(Arc::clone(cached))
    }

    /// Lists discoverable domain names, sorted. Hidden files and the
    /// authoring scaffold are skipped.
    pub fn list(&self) -> Vec<String> {
        if !self.domains_dir.exists() {
            warn!(domains_dir = %self.domains_dir.display(), "domains directory does not exist");
            return Vec::new();
        }

        let mut names: Vec<String> = WalkDir::new(&self.domains_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path();
                let stem = path.file_stem()?.to_str()?;
                let extension = path.extension()?.to_str()?;
                if extension != "yaml" || stem.starts_with('.') || stem == SCAFFOLD_STEM {
                    return None;
                }
                Some(stem.to_string())
            })
            .collect();
        names.sort();
        names
    }

    /// Validates a domain with a fresh parse, bypassing the cache.
    ///
    /// This is the deliberate escape hatch around the memoization contract:
    /// external edits to a configuration source become observable without a
    /// process restart. A successful validation refreshes the cache entry.
    pub fn validate(&self, name: &str) -> (bool, String) {
        match self.load_uncached(name) {
            Ok(config) => {
                let message = format!(
                    "Domain '{}' is valid:\n  - Languages: {}\n  - Categories: {}\n  - Total templates: {}",
                    name,
                    config
                        .languages()
                        .iter()
                        .map(LanguageCode::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                    config.categories().len(),
                    config.template_count(),
                );
                self.cache
                    .write()
                    .insert(name.to_string(), Arc::new(config));
                (true, message)
            }
            Err(error) => (false, error.to_string()),
        }
    }

    fn load_uncached(&self, name: &str) -> Result<DomainConfig, ConfigError> {
        let path = self.domains_dir.join(format!("{name}.yaml"));
        if !path.exists() {
            let available = self.list();
            let available = if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            };
            return Err(ConfigError::DomainNotFound {
                domain: name.to_string(),
                available,
            });
        }

        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            domain: name.to_string(),
            path: path.display().to_string(),
            source,
        })?;

        validate_domain(name, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    const VALID_YAML: &str = r#"
languages: [en]
categories:
  a:
    weight: 1.0
    templates: {en: ["hello {{ who }}"]}
    faker_vars:
      who: [world]
"#;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, DomainStore) {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let store = DomainStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn load_memoizes_validated_config() {
        let (_dir, store) = store_with(&[("banking.yaml", VALID_YAML)]);
        let first = store.load("banking").unwrap();
        let second = store.load("banking").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_domain_lists_available() {
        let (_dir, store) = store_with(&[("banking.yaml", VALID_YAML)]);
        let err = store.load("medical").unwrap_err();
        assert_matches!(err, ConfigError::DomainNotFound { .. });
        assert!(err.to_string().contains("banking"));
    }

    #[test]
    fn missing_domain_with_empty_dir_says_none() {
        let (_dir, store) = store_with(&[]);
        let err = store.load("medical").unwrap_err();
        assert!(err.to_string().contains("none"));
    }

    #[test]
    fn list_is_sorted_and_skips_non_domain_files() {
        let (_dir, store) = store_with(&[
            ("medical.yaml", VALID_YAML),
            ("banking.yaml", VALID_YAML),
            ("template.yaml", VALID_YAML),
            (".hidden.yaml", VALID_YAML),
            ("notes.txt", "not a domain"),
        ]);
        assert_eq!(store.list(), vec!["banking", "medical"]);
    }

    #[test]
    fn list_handles_missing_directory() {
        let store = DomainStore::new("/nonexistent/domains");
        assert!(store.list().is_empty());
    }

    #[test]
    fn validator_failure_surfaces_through_load() {
        let (_dir, store) = store_with(&[("broken.yaml", "languages: [en]\ncategories: {}\n")]);
        let err = store.load("broken").unwrap_err();
        assert_matches!(err, ConfigError::InvalidSemantics { .. });
    }

    #[test]
    fn load_serves_cache_even_after_source_breaks() {
        let (dir, store) = store_with(&[("banking.yaml", VALID_YAML)]);
        store.load("banking").unwrap();
        fs::write(dir.path().join("banking.yaml"), "categories: 5\n").unwrap();
        assert!(store.load("banking").is_ok());
    }

    #[test]
    fn validate_bypasses_cache_and_sees_edits() {
        let (dir, store) = store_with(&[("banking.yaml", VALID_YAML)]);
        store.load("banking").unwrap();

        fs::write(dir.path().join("banking.yaml"), "categories: 5\n").unwrap();
        let (valid, message) = store.validate("banking");
        assert!(!valid);
        assert!(message.contains("banking"));
    }

    #[test]
    fn successful_validate_refreshes_cache() {
        let (dir, store) = store_with(&[("banking.yaml", VALID_YAML)]);
        let before = store.load("banking").unwrap();

        let updated = VALID_YAML.replace("hello {{ who }}", "goodbye {{ who }}");
        fs::write(dir.path().join("banking.yaml"), updated).unwrap();
        let (valid, message) = store.validate("banking");
        assert!(valid, "{message}");
        assert!(message.contains("Categories: 1"));

        let after = store.load("banking").unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
