//! Core data model for domain configurations and generated documents.
//!
//! Validated types (`DomainConfig`, `Category`, `LanguageMix`) follow a
//! validate-on-construct pattern: they are built only by code in this crate
//! after every invariant has been checked, and expose read-only accessors.
//! A `DomainConfig` is shared across callers as `Arc<DomainConfig>` and is
//! never mutated after construction.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::IntoEnumIterator;

use crate::error::{MixError, RequestError};

/// Upper bound on documents per generation run.
pub const MAX_DOCUMENT_COUNT: usize = 10_000;

/// Maximum length of a domain identifier.
pub const DOMAIN_NAME_MAX: usize = 50;

/// Maximum length of a category name.
pub const CATEGORY_NAME_MAX: usize = 100;

static DOMAIN_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_]+$").expect("domain name pattern is a valid regex")
});

/// Returns `true` if `name` is a usable domain identifier.
pub(crate) fn is_valid_domain_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= DOMAIN_NAME_MAX && DOMAIN_NAME_RE.is_match(name)
}

// ============================================================================
// Language codes
// ============================================================================

/// Supported language codes, ISO 639-1.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LanguageCode {
    /// Polish (pl_PL locale)
    Pl,
    /// English (en_US locale)
    En,
}

impl LanguageCode {
    /// Comma-separated list of every supported code, for diagnostics.
    pub fn valid_codes() -> String {
        Self::iter()
            .map(|code| code.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// Variable pools
// ============================================================================

/// One candidate value for a template variable.
///
/// The untagged representation accepts plain YAML scalars; `5` parses as an
/// integer, `5.5` as a float, anything else as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoolValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

// ============================================================================
// Categories and domain configuration
// ============================================================================

/// One weighted topic bucket within a domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub(crate) name: String,
    pub(crate) weight: f64,
    pub(crate) templates: IndexMap<LanguageCode, Vec<String>>,
    pub(crate) variable_pools: IndexMap<String, Vec<PoolValue>>,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Templates declared for `language`, if any.
    pub fn templates_for(&self, language: LanguageCode) -> Option<&[String]> {
        self.templates.get(&language).map(Vec::as_slice)
    }

    /// Declared variable pools, in declaration order.
    pub fn variable_pools(&self) -> &IndexMap<String, Vec<PoolValue>> {
        &self.variable_pools
    }

    /// Total number of templates across all languages.
    pub fn template_count(&self) -> usize {
        self.templates.values().map(Vec::len).sum()
    }
}

/// A validated domain configuration.
///
/// Only the schema validator constructs this type; every instance satisfies
/// the invariants documented on its accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainConfig {
    pub(crate) domain: String,
    pub(crate) languages: Vec<LanguageCode>,
    pub(crate) categories: IndexMap<String, Category>,
}

impl DomainConfig {
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Supported languages. Non-empty; every category declares templates for
    /// each entry.
    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    /// Categories in declaration order. Non-empty; weights sum to ~1.0.
    pub fn categories(&self) -> &IndexMap<String, Category> {
        &self.categories
    }

    /// Total number of templates across categories and languages.
    pub fn template_count(&self) -> usize {
        self.categories.values().map(Category::template_count).sum()
    }
}

// ============================================================================
// Language mix
// ============================================================================

/// Tolerance applied when checking that a probability distribution sums to 1.
pub const DISTRIBUTION_TOLERANCE: f64 = 0.01;

/// A probability distribution over supported language codes, used to pick a
/// document's language independently of its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageMix {
    distribution: IndexMap<LanguageCode, f64>,
}

impl LanguageMix {
    /// Validates and constructs a mix. Every probability must lie in
    /// [0.0, 1.0] and the total must be within [`DISTRIBUTION_TOLERANCE`]
    /// of 1.0.
    pub fn new(distribution: IndexMap<LanguageCode, f64>) -> Result<Self, MixError> {
        for (language, probability) in &distribution {
            if !(0.0..=1.0).contains(probability) {
                return Err(MixError::ProbabilityOutOfRange {
                    language: language.to_string(),
                    value: *probability,
                });
            }
        }
        let total: f64 = distribution.values().sum();
        if (total - 1.0).abs() >= DISTRIBUTION_TOLERANCE {
            return Err(MixError::InvalidDistribution { total });
        }
        Ok(Self { distribution })
    }

    pub fn distribution(&self) -> &IndexMap<LanguageCode, f64> {
        &self.distribution
    }
}

// ============================================================================
// Generation artifacts
// ============================================================================

/// Metadata for one generated document. Created once per generation request
/// and handed off to the sink; never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    /// Opaque unique token (UUID v4).
    pub id: String,
    pub domain: String,
    pub category: String,
    pub language: LanguageCode,
    /// Rendered template content.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Where the sink should place the document.
    pub destination: PathBuf,
}

/// Parameters for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub domain: String,
    pub count: usize,
    pub language_mix: LanguageMix,
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// Validates and constructs a request.
    pub fn new(
        domain: impl Into<String>,
        count: usize,
        language_mix: LanguageMix,
        output_dir: impl Into<PathBuf>,
        seed: Option<u64>,
    ) -> Result<Self, RequestError> {
        let domain = domain.into();
        if !is_valid_domain_name(&domain) {
            return Err(RequestError::InvalidDomainName { domain });
        }
        if count == 0 || count > MAX_DOCUMENT_COUNT {
            return Err(RequestError::CountOutOfRange {
                count,
                max: MAX_DOCUMENT_COUNT,
            });
        }
        Ok(Self {
            domain,
            count,
            language_mix,
            output_dir: output_dir.into(),
            seed,
        })
    }
}
