use anyhow::Result;
use clap::Parser;
use std::path::Path;
use ticketgen::{
    CliArgs, Command, DocumentSink, DomainStore, GenerationRequest, JsonLinesSink, LoggingConfig,
    OutputFormat, TextFileSink, init_logging, parse_language_mix, run_generation,
};

fn main() -> Result<()> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = CliArgs::parse();
    let store = DomainStore::new(&cli.domains_dir);

    match cli.command {
        Command::Generate {
            domain,
            count,
            lang_mix,
            output,
            seed,
            format,
        } => generate(&store, domain, count, &lang_mix, &output, seed, format),
        Command::Validate { domain } => validate(&store, &domain),
        Command::ListDomains => list_domains(&store),
    }
}

fn generate(
    store: &DomainStore,
    domain: String,
    count: usize,
    lang_mix: &str,
    output: &Path,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let language_mix = parse_language_mix(lang_mix)?;
    let request = GenerationRequest::new(domain, count, language_mix, output, seed)?;
    let sink: Box<dyn DocumentSink> = match format {
        OutputFormat::Text => Box::new(TextFileSink::new(&request.output_dir)?),
        OutputFormat::Jsonl => {
            Box::new(JsonLinesSink::create(request.output_dir.join("tickets.jsonl"))?)
        }
    };

    let report = run_generation(store, &request, sink.as_ref())?;

    println!(
        "Generated {} of {} documents ({} failed)",
        report.generated, report.requested, report.failed
    );
    println!("Output directory: {}", request.output_dir.display());
    println!("Total content size: {}", format_size(report.content_bytes));
    Ok(())
}

fn validate(store: &DomainStore, domain: &str) -> Result<()> {
    let (valid, message) = store.validate(domain);
    if valid {
        println!("{message}");
        Ok(())
    } else {
        anyhow::bail!(message)
    }
}

fn list_domains(store: &DomainStore) -> Result<()> {
    let domains = store.list();
    if domains.is_empty() {
        println!("No domains found in {}", store.domains_dir().display());
        return Ok(());
    }

    println!("Available domains:");
    for name in domains {
        match store.load(&name) {
            Ok(config) => {
                let languages = config
                    .languages()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "  {name:<20} valid    {} categories, languages: {languages}",
                    config.categories().len()
                );
            }
            Err(error) => {
                println!("  {name:<20} invalid  {error}");
            }
        }
    }
    println!("\nDomain directory: {}", store.domains_dir().display());
    Ok(())
}

/// Formats a byte count for the end-of-run summary, e.g. `1.5 KB`.
fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}
