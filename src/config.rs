//! Command-line surface and generation-request assembly.
//!
//! Argument parsing, the `lang:percentage` mix format, and defaults live
//! here; the engine itself never reads flags or environment variables.

use clap::{Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::MixError;
use crate::model::{LanguageCode, LanguageMix};

const DEFAULT_COUNT: usize = 100;
const DEFAULT_LANG_MIX: &str = "pl:70,en:30";
const DEFAULT_OUTPUT_DIR: &str = "./output";
const DEFAULT_DOMAINS_DIR: &str = "./domains";

/// How generated documents are materialized on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One plain-text file per document
    Text,
    /// One JSON object per document, appended to a single corpus file
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "ticketgen",
    about = "Generate synthetic support-ticket documents from domain configurations",
    version
)]
pub struct CliArgs {
    /// Directory containing domain YAML configurations
    #[arg(
        long,
        env = "TICKETGEN_DOMAINS_DIR",
        default_value = DEFAULT_DOMAINS_DIR,
        global = true
    )]
    pub domains_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate synthetic documents
    Generate {
        /// Domain to use (e.g. banking, medical)
        #[arg(long, short)]
        domain: String,

        /// Number of documents to generate (1-10000)
        #[arg(long, short, default_value_t = DEFAULT_COUNT)]
        count: usize,

        /// Language distribution, e.g. 'pl:70,en:30'
        #[arg(long = "lang-mix", short = 'l', default_value = DEFAULT_LANG_MIX)]
        lang_mix: String,

        /// Output directory for generated documents
        #[arg(long, short, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Random seed for reproducible output
        #[arg(long, short)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate a domain configuration with a fresh parse
    Validate {
        /// Domain name to validate (e.g. banking)
        domain: String,
    },

    /// List available domains and their status
    ListDomains,
}

/// Parses a `lang1:percentage1,lang2:percentage2` specification into a
/// validated [`LanguageMix`]. Percentages are whole-number shares of 100,
/// e.g. `pl:70,en:30` becomes `{pl: 0.7, en: 0.3}`.
pub fn parse_language_mix(spec: &str) -> Result<LanguageMix, MixError> {
    let mut distribution: IndexMap<LanguageCode, f64> = IndexMap::new();

    for pair in spec.split(',') {
        let pair = pair.trim();
        let (code, percentage) = pair.split_once(':').ok_or_else(|| MixError::BadFormat {
            pair: pair.to_string(),
        })?;
        let code = code.trim().to_lowercase();
        let percentage = percentage.trim();

        let language =
            LanguageCode::from_str(&code).map_err(|_| MixError::UnknownLanguage {
                code: code.clone(),
                valid: LanguageCode::valid_codes(),
            })?;

        let share: f64 = percentage.parse().map_err(|_| MixError::BadPercentage {
            language: code.clone(),
            value: percentage.to_string(),
        })?;

        if distribution.contains_key(&language) {
            return Err(MixError::DuplicateLanguage { code });
        }
        distribution.insert(language, share / 100.0);
    }

    LanguageMix::new(distribution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_default_mix() {
        let mix = parse_language_mix("pl:70,en:30").unwrap();
        assert_eq!(mix.distribution()[&LanguageCode::Pl], 0.7);
        assert_eq!(mix.distribution()[&LanguageCode::En], 0.3);
    }

    #[test]
    fn tolerates_spaces_and_case() {
        let mix = parse_language_mix(" PL : 70 , en : 30 ").unwrap();
        assert_eq!(mix.distribution().len(), 2);
    }

    #[test]
    fn single_language_mix_is_valid() {
        let mix = parse_language_mix("en:100").unwrap();
        assert_eq!(mix.distribution()[&LanguageCode::En], 1.0);
    }

    #[test]
    fn rejects_missing_colon() {
        let err = parse_language_mix("pl70").unwrap_err();
        assert_matches!(err, MixError::BadFormat { .. });
    }

    #[test]
    fn rejects_unknown_language() {
        let err = parse_language_mix("de:100").unwrap_err();
        assert_matches!(err, MixError::UnknownLanguage { .. });
        assert!(err.to_string().contains("pl, en"));
    }

    #[test]
    fn rejects_non_numeric_percentage() {
        let err = parse_language_mix("pl:seventy,en:30").unwrap_err();
        assert_matches!(err, MixError::BadPercentage { .. });
    }

    #[test]
    fn rejects_duplicate_language() {
        let err = parse_language_mix("pl:50,pl:50").unwrap_err();
        assert_matches!(err, MixError::DuplicateLanguage { .. });
    }

    #[test]
    fn rejects_mix_not_summing_to_one() {
        let err = parse_language_mix("pl:70,en:10").unwrap_err();
        assert_matches!(err, MixError::InvalidDistribution { .. });
        assert!(err.to_string().contains("0.800"));
    }

    #[test]
    fn cli_generate_defaults() {
        let cli = CliArgs::try_parse_from(["ticketgen", "generate", "--domain", "banking"])
            .unwrap();
        match cli.command {
            Command::Generate {
                domain,
                count,
                lang_mix,
                output,
                seed,
                format,
            } => {
                assert_eq!(domain, "banking");
                assert_eq!(count, DEFAULT_COUNT);
                assert_eq!(lang_mix, DEFAULT_LANG_MIX);
                assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT_DIR));
                assert_eq!(seed, None);
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.domains_dir, PathBuf::from(DEFAULT_DOMAINS_DIR));
    }

    #[test]
    fn cli_accepts_seed_and_mix() {
        let cli = CliArgs::try_parse_from([
            "ticketgen", "generate", "-d", "banking", "-c", "10", "-l", "en:100", "-s", "42",
        ])
        .unwrap();
        match cli.command {
            Command::Generate { count, seed, .. } => {
                assert_eq!(count, 10);
                assert_eq!(seed, Some(42));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
