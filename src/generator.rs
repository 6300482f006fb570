//! Batch document generation.
//!
//! A generation run loads one domain (fatal on failure — without a valid
//! template set there is nothing to sample from), then renders `count`
//! documents best-effort: a single document's render or write failure is
//! logged and counted, and the batch continues.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::engine::{LanguageSelector, TicketEngine};
use crate::model::{GeneratedDocument, GenerationRequest, LanguageCode};
use crate::sink::DocumentSink;
use crate::store::DomainStore;

/// How often batch progress is logged.
const PROGRESS_INTERVAL: usize = 250;

/// Aggregate outcome of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub requested: usize,
    pub generated: usize,
    pub failed: usize,
    /// Total bytes of rendered content successfully written.
    pub content_bytes: u64,
}

/// Runs one batch: load + validate the domain, then render and hand off
/// `request.count` documents.
///
/// Configuration failures abort the whole run; per-document failures do not.
pub fn run_generation(
    store: &DomainStore,
    request: &GenerationRequest,
    sink: &dyn DocumentSink,
) -> Result<GenerationReport> {
    let config = store.load(&request.domain)?;
    let mut engine = TicketEngine::new(Arc::clone(&config), request.seed)?;
    let mut selector = LanguageSelector::new(&request.language_mix, request.seed)?;

    info!(
        domain = request.domain.as_str(),
        count = request.count,
        seeded = request.seed.is_some(),
        "starting generation run"
    );

    let mut report = GenerationReport {
        requested: request.count,
        ..GenerationReport::default()
    };

    for sequence in 0..request.count {
        let language = selector.select();
        match render_one(&mut engine, request, language) {
            Ok(document) => match sink.write(&document) {
                Ok(()) => {
                    report.generated += 1;
                    report.content_bytes += document.content.len() as u64;
                }
                Err(cause) => {
                    report.failed += 1;
                    error!(
                        sequence,
                        domain = request.domain.as_str(),
                        error = %cause,
                        "failed to write document"
                    );
                }
            },
            Err(cause) => {
                report.failed += 1;
                error!(
                    sequence,
                    domain = request.domain.as_str(),
                    error = %cause,
                    "failed to render document"
                );
            }
        }

        if (sequence + 1) % PROGRESS_INTERVAL == 0 {
            info!(
                progress = sequence + 1,
                total = request.count,
                generated = report.generated,
                failed = report.failed,
                "generation progress"
            );
        }
    }

    info!(
        domain = request.domain.as_str(),
        generated = report.generated,
        failed = report.failed,
        "generation run complete"
    );

    Ok(report)
}

fn render_one(
    engine: &mut TicketEngine,
    request: &GenerationRequest,
    language: LanguageCode,
) -> Result<GeneratedDocument> {
    let ticket = engine.render_document(language)?;
    let id = Uuid::new_v4().to_string();
    let filename = format!(
        "{}_{}_{}_{}.txt",
        request.domain,
        ticket.category,
        language,
        &id[..8]
    );
    Ok(GeneratedDocument {
        id,
        domain: request.domain.clone(),
        category: ticket.category,
        language,
        content: ticket.content,
        timestamp: Utc::now(),
        destination: request.output_dir.join(filename),
    })
}
