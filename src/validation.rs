//! Schema validation for raw domain configurations.
//!
//! `validate_domain` parses a raw YAML document and enforces every
//! structural and semantic invariant before a [`DomainConfig`] exists:
//!
//! - the document is a mapping with the required keys
//! - language codes are members of the supported set
//! - each category declares at least one template per declared language
//! - each variable pool has at least one candidate value
//! - category weights sum to 1.0 within [`DISTRIBUTION_TOLERANCE`]
//!
//! Structural parsing completes before semantic checks run, so a broken
//! document fails fast with the parser's message rather than a misleading
//! semantic complaint. Any single violation aborts validation with a message
//! naming the domain, category, language, or field involved.

use indexmap::IndexMap;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::model::{
    CATEGORY_NAME_MAX, Category, DISTRIBUTION_TOLERANCE, DomainConfig, LanguageCode, PoolValue,
    is_valid_domain_name,
};

/// Raw shape of a domain YAML document. Unknown top-level keys are ignored;
/// missing required keys fail structural parsing.
#[derive(Debug, Deserialize)]
struct RawDomainConfig {
    domain: Option<String>,
    languages: Vec<String>,
    categories: IndexMap<String, RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    templates: IndexMap<String, Vec<String>>,
    #[serde(default)]
    faker_vars: IndexMap<String, Vec<PoolValue>>,
}

/// Parses and validates a raw YAML configuration for `domain_name`.
///
/// On success the returned [`DomainConfig`] satisfies every invariant this
/// module checks; on failure the error names the offending field and value.
/// A missing `domain` key defaults to `domain_name` (the file stem).
pub fn validate_domain(domain_name: &str, raw: &str) -> Result<DomainConfig, ConfigError> {
    let malformed = |message: String| ConfigError::Malformed {
        domain: domain_name.to_string(),
        message,
    };

    let value: serde_yaml::Value = serde_yaml::from_str(raw)
        .map_err(|e| malformed(format!("YAML syntax error: {e}")))?;

    match &value {
        serde_yaml::Value::Mapping(_) => {}
        serde_yaml::Value::Null => {
            return Err(malformed("configuration is empty".to_string()));
        }
        other => {
            return Err(malformed(format!(
                "configuration must be a mapping, got {}",
                yaml_type_name(other)
            )));
        }
    }

    let raw_config: RawDomainConfig =
        serde_yaml::from_value(value).map_err(|e| malformed(e.to_string()))?;

    build_config(domain_name, raw_config)
}

/// Converts the structurally-parsed document into a validated config.
fn build_config(
    domain_name: &str,
    raw: RawDomainConfig,
) -> Result<DomainConfig, ConfigError> {
    let semantics = |field: &str, message: String| ConfigError::InvalidSemantics {
        domain: domain_name.to_string(),
        field: field.to_string(),
        message,
    };

    let domain = raw.domain.unwrap_or_else(|| domain_name.to_string());
    if !is_valid_domain_name(&domain) {
        return Err(semantics(
            "domain",
            format!("identifier '{domain}' must match ^[a-z_]+$ and be at most 50 characters"),
        ));
    }

    if raw.languages.is_empty() {
        return Err(semantics(
            "languages",
            "domain must declare at least one language".to_string(),
        ));
    }
    let mut languages = Vec::with_capacity(raw.languages.len());
    for code in &raw.languages {
        languages.push(parse_language(domain_name, "languages list", code)?);
    }

    if raw.categories.is_empty() {
        return Err(semantics(
            "categories",
            "domain must have at least one category".to_string(),
        ));
    }

    let mut categories = IndexMap::with_capacity(raw.categories.len());
    for (name, raw_category) in raw.categories {
        let category = build_category(domain_name, &name, raw_category)?;
        categories.insert(name, category);
    }

    // Semantic cross-checks run only after every category parsed cleanly.
    let total_weight: f64 = categories.values().map(Category::weight).sum();
    if (total_weight - 1.0).abs() >= DISTRIBUTION_TOLERANCE {
        return Err(semantics(
            "categories",
            format!("category weights must sum to 1.0, got {total_weight:.3}"),
        ));
    }

    for (name, category) in &categories {
        let missing: Vec<String> = languages
            .iter()
            .filter(|language| !category.templates.contains_key(*language))
            .map(LanguageCode::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(semantics(
                &format!("categories.{name}.templates"),
                format!(
                    "category '{}' missing templates for languages: {}",
                    name,
                    missing.join(", ")
                ),
            ));
        }
    }

    Ok(DomainConfig {
        domain,
        languages,
        categories,
    })
}

fn build_category(
    domain_name: &str,
    name: &str,
    raw: RawCategory,
) -> Result<Category, ConfigError> {
    let semantics = |field: String, message: String| ConfigError::InvalidSemantics {
        domain: domain_name.to_string(),
        field,
        message,
    };

    if name.is_empty() || name.len() > CATEGORY_NAME_MAX {
        return Err(semantics(
            "categories".to_string(),
            format!("category name '{name}' must be 1..={CATEGORY_NAME_MAX} characters"),
        ));
    }

    if !(0.0..=1.0).contains(&raw.weight) {
        return Err(semantics(
            format!("categories.{name}.weight"),
            format!("weight must be in [0.0, 1.0], got {}", raw.weight),
        ));
    }

    let mut templates = IndexMap::with_capacity(raw.templates.len());
    for (code, list) in raw.templates {
        let language = parse_language(domain_name, &format!("category '{name}'"), &code)?;
        if list.is_empty() {
            return Err(semantics(
                format!("categories.{name}.templates.{language}"),
                format!("language '{language}' must have at least one template"),
            ));
        }
        templates.insert(language, list);
    }

    for (variable, values) in &raw.faker_vars {
        if values.is_empty() {
            return Err(semantics(
                format!("categories.{name}.faker_vars.{variable}"),
                format!("variable '{variable}' must have at least one value"),
            ));
        }
    }

    Ok(Category {
        name: name.to_string(),
        weight: raw.weight,
        templates,
        variable_pools: raw.faker_vars,
    })
}

fn parse_language(
    domain_name: &str,
    location: &str,
    code: &str,
) -> Result<LanguageCode, ConfigError> {
    LanguageCode::from_str(code).map_err(|_| ConfigError::UnknownLanguageCode {
        domain: domain_name.to_string(),
        location: location.to_string(),
        code: code.to_string(),
        valid: LanguageCode::valid_codes(),
    })
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
