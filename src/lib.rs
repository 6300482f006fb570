pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod logging;
pub mod model;
pub mod sink;
pub mod store;
pub mod template;
pub mod validation;

pub use config::{CliArgs, Command, OutputFormat, parse_language_mix};
pub use engine::{LanguageSelector, RenderedTicket, TicketEngine};
pub use error::{ConfigError, MixError, RenderError, RequestError};
pub use generator::{GenerationReport, run_generation};
pub use logging::{LogFormat, LogOutput, LoggingConfig, init_logging};
pub use model::{
    Category, DomainConfig, GeneratedDocument, GenerationRequest, LanguageCode, LanguageMix,
    PoolValue,
};
pub use sink::{DocumentSink, JsonLinesSink, TextFileSink};
pub use store::DomainStore;
pub use validation::validate_domain;
