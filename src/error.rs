//! Error taxonomy for configuration loading and document rendering.
//!
//! This module provides:
//! - `ConfigError`: failures while resolving, parsing, or validating a
//!   domain configuration
//! - `RenderError`: failures while rendering a single document
//! - `MixError`: failures while parsing a language-mix specification
//!
//! Validation errors are never recovered locally: they abort the load and
//! surface to the caller carrying the domain name, the offending field, and
//! the expected versus actual value. Render errors are scoped to a single
//! document so that batch generation can count them and continue.

use thiserror::Error;

// ============================================================================
// Configuration errors
// ============================================================================

/// Errors raised while loading or validating a domain configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration source exists for the requested domain name.
    #[error("domain '{domain}' not found. Available domains: {available}")]
    DomainNotFound { domain: String, available: String },

    /// The configuration source is structurally unusable (unreadable YAML,
    /// wrong top-level shape, missing required keys).
    #[error("malformed configuration for domain '{domain}': {message}")]
    Malformed { domain: String, message: String },

    /// The configuration parsed but violates a semantic invariant.
    #[error("invalid configuration for domain '{domain}': {field}: {message}")]
    InvalidSemantics {
        domain: String,
        field: String,
        message: String,
    },

    /// A language code outside the supported set was used.
    #[error(
        "unknown language code '{code}' in {location} of domain '{domain}'. Valid codes: {valid}"
    )]
    UnknownLanguageCode {
        domain: String,
        location: String,
        code: String,
        valid: String,
    },

    /// The configuration source could not be read.
    #[error("failed to read configuration for domain '{domain}' from {path}: {source}")]
    Io {
        domain: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Render errors
// ============================================================================

/// Errors raised while rendering a single document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A template placeholder has no corresponding variable value.
    #[error(
        "undefined variable '{name}' in category '{category}'. Available variables: {available:?}"
    )]
    UndefinedVariable {
        category: String,
        name: String,
        available: Vec<String>,
    },

    /// The template text itself is malformed.
    #[error("template syntax error in category '{category}': {message}")]
    TemplateSyntax { category: String, message: String },

    /// The selected category has no templates for the requested language.
    /// Validation rejects such configurations, so this only fires when a
    /// config reached the engine outside the validated path.
    #[error("no templates for language '{language}' in category '{category}'")]
    MissingLanguage { category: String, language: String },

    /// The category weight table could not be turned into a sampling
    /// distribution. Validation guarantees a usable table, so this only
    /// fires when a config reached the engine outside the validated path.
    #[error("invalid category weights: {message}")]
    InvalidWeights { message: String },

    /// Rendering failed for a reason outside the template/variable contract.
    #[error("render failure: {message}")]
    Internal { message: String },
}

// ============================================================================
// Language-mix errors
// ============================================================================

/// Errors raised while parsing a `lang:percentage` mix specification.
#[derive(Debug, Error)]
pub enum MixError {
    #[error("invalid format '{pair}'. Expected 'lang:percentage'")]
    BadFormat { pair: String },

    #[error("unknown language code '{code}'. Valid codes: {valid}")]
    UnknownLanguage { code: String, valid: String },

    #[error("invalid percentage '{value}' for language '{language}'. Expected numeric value")]
    BadPercentage { language: String, value: String },

    #[error("duplicate language code '{code}' in mix specification")]
    DuplicateLanguage { code: String },

    #[error("language mix probabilities must sum to 1.0, got {total:.3}")]
    InvalidDistribution { total: f64 },

    #[error("language '{language}' probability must be in [0.0, 1.0], got {value}")]
    ProbabilityOutOfRange { language: String, value: f64 },
}

/// Errors raised while validating a generation request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("domain name '{domain}' must match ^[a-z_]+$ and be at most 50 characters")]
    InvalidDomainName { domain: String },

    #[error("document count must be between 1 and {max}, got {count}")]
    CountOutOfRange { count: usize, max: usize },
}
