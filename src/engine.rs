//! Seeded content selection: weighted category draw, uniform template and
//! variable draws, then template rendering.
//!
//! Every engine owns its own [`ChaCha8Rng`] stream — never process-global
//! randomness — so two engines built from the same configuration and seed
//! produce byte-identical selection sequences, and concurrent runs with
//! different seeds cannot interfere. Category order follows the
//! configuration's declaration order, which pins tie-breaks under a fixed
//! seed without affecting the distribution.

use indexmap::IndexMap;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::model::{Category, DomainConfig, LanguageCode, LanguageMix, PoolValue};
use crate::template;

/// Output of one validate-then-render unit: the selected category, the
/// rendered content, and the template that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTicket {
    pub category: String,
    pub content: String,
    pub template: String,
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// Ticket engine
// ============================================================================

/// Renders documents from a validated domain configuration.
pub struct TicketEngine {
    config: Arc<DomainConfig>,
    weights: WeightedIndex<f64>,
    rng: ChaCha8Rng,
}

impl TicketEngine {
    /// Builds an engine over `config` with a private random stream.
    ///
    /// The weight table is taken as unnormalized probability mass, so minor
    /// floating drift in a validated configuration is absorbed here rather
    /// than re-checked.
    pub fn new(config: Arc<DomainConfig>, seed: Option<u64>) -> Result<Self, RenderError> {
        let weights = WeightedIndex::new(config.categories().values().map(Category::weight))
            .map_err(|error| RenderError::InvalidWeights {
                message: error.to_string(),
            })?;
        debug!(
            domain = config.domain(),
            categories = config.categories().len(),
            seeded = seed.is_some(),
            "ticket engine initialized"
        );
        Ok(Self {
            config,
            weights,
            rng: seeded_rng(seed),
        })
    }

    /// Generates one document in `language`: weighted category draw, uniform
    /// template draw, one uniform draw per variable pool, then rendering.
    ///
    /// All draws come from the engine's single stream, in a fixed order, so
    /// a seed pins the entire sequence.
    pub fn render_document(
        &mut self,
        language: LanguageCode,
    ) -> Result<RenderedTicket, RenderError> {
        let config = Arc::clone(&self.config);

        let index = self.weights.sample(&mut self.rng);
        let (name, category) =
            config
                .categories()
                .get_index(index)
                .ok_or_else(|| RenderError::Internal {
                    message: format!("sampled category index {index} out of range"),
                })?;

        let templates =
            category
                .templates_for(language)
                .ok_or_else(|| RenderError::MissingLanguage {
                    category: name.clone(),
                    language: language.to_string(),
                })?;
        let template =
            templates
                .choose(&mut self.rng)
                .ok_or_else(|| RenderError::MissingLanguage {
                    category: name.clone(),
                    language: language.to_string(),
                })?;

        let variables = sample_variables(category, &mut self.rng);
        let content = template::render(name, template, &variables)?;

        debug!(
            category = name.as_str(),
            language = %language,
            variables = variables.len(),
            "rendered document"
        );

        Ok(RenderedTicket {
            category: name.clone(),
            content,
            template: template.clone(),
        })
    }
}

/// One uniform draw per declared variable.
///
/// An empty pool cannot occur on the validated path; if one shows up anyway
/// the variable resolves to an empty string so a single drifted config entry
/// does not sink a whole batch.
fn sample_variables(category: &Category, rng: &mut ChaCha8Rng) -> IndexMap<String, PoolValue> {
    let mut variables = IndexMap::with_capacity(category.variable_pools().len());
    for (name, pool) in category.variable_pools() {
        match pool.as_slice().choose(rng) {
            Some(value) => {
                variables.insert(name.clone(), value.clone());
            }
            None => {
                warn!(
                    category = category.name(),
                    variable = name.as_str(),
                    "empty value pool, substituting empty string"
                );
                variables.insert(name.clone(), PoolValue::Text(String::new()));
            }
        }
    }
    variables
}

// ============================================================================
// Language selector
// ============================================================================

/// Weighted language draw over a validated [`LanguageMix`].
///
/// Owns a stream independent of the ticket engine's, seeded with the same
/// seed value, so language selection and content selection stay individually
/// reproducible.
pub struct LanguageSelector {
    languages: Vec<LanguageCode>,
    weights: WeightedIndex<f64>,
    rng: ChaCha8Rng,
}

impl LanguageSelector {
    pub fn new(mix: &LanguageMix, seed: Option<u64>) -> Result<Self, RenderError> {
        let languages: Vec<LanguageCode> = mix.distribution().keys().copied().collect();
        let weights = WeightedIndex::new(mix.distribution().values().copied()).map_err(
            |error| RenderError::InvalidWeights {
                message: error.to_string(),
            },
        )?;
        Ok(Self {
            languages,
            weights,
            rng: seeded_rng(seed),
        })
    }

    pub fn select(&mut self) -> LanguageCode {
        self.languages[self.weights.sample(&mut self.rng)]
    }
}
