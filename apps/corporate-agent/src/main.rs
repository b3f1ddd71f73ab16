//! ADGM Corporate Agent
//!
//! Reviews a batch of corporate documents (.docx) against ADGM filing
//! requirements and writes:
//!
//! - `reviewed_<name>.docx`: each document with inline review comments
//! - `report.json`: the full structured report
//! - `summary.txt`, `narrative.txt`, `summary.csv`: renderings of the report

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use compliance_engine::{render, ComplianceEngine, EngineConfig, PipelineError};
use shared_types::{ComplianceReport, RejectedDocument};
use tracing::{error, info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod advisory;
mod references;

use advisory::HttpAdvisor;
use references::JsonReferenceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Json,
    Summary,
    Narrative,
    Csv,
}

/// Command-line arguments for the corporate agent
#[derive(Parser, Debug)]
#[command(name = "corporate-agent")]
#[command(about = "Review ADGM corporate documents and write annotated copies")]
struct Args {
    /// Documents to review
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for annotated documents and reports
    #[arg(short, long, default_value = "review-output")]
    output_dir: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report files to write
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [ReportFormat::Json, ReportFormat::Summary, ReportFormat::Narrative, ReportFormat::Csv]
    )]
    format: Vec<ReportFormat>,

    /// Advisory service endpoint; advisory analysis is off without it
    #[arg(long)]
    advisory_url: Option<String>,

    /// Model name passed to the advisory service
    #[arg(long, default_value = "default")]
    advisory_model: String,

    /// Advisory timeout in milliseconds (overrides the config file)
    #[arg(long)]
    advisory_timeout_ms: Option<u64>,

    /// JSON file of reference snippets sent as advisory context
    #[arg(long)]
    references: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(ms) = args.advisory_timeout_ms {
        config.advisory_timeout_ms = ms;
    }

    let mut engine = ComplianceEngine::new(config).context("Invalid engine configuration")?;
    if let Some(url) = &args.advisory_url {
        let mut advisor =
            HttpAdvisor::new(url, &args.advisory_model, engine.config().advisory_timeout())?;
        if let Some(path) = &args.references {
            let store = JsonReferenceStore::from_file(path)?;
            if store.is_empty() {
                warn!("Reference file {} has no entries", path.display());
            }
            info!("Loaded {} reference snippet(s)", store.len());
            advisor = advisor.with_references(Arc::new(store));
        }
        info!("Advisory analysis via {}", url);
        engine = engine.with_advisor(Arc::new(advisor));
    }

    let mut documents = Vec::new();
    let mut rejected = Vec::new();
    for path in &args.inputs {
        match engine.ingestor().ingest_path(path) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                warn!("Rejected {}: {}", path.display(), e);
                rejected.push(RejectedDocument {
                    name: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let outcome = match engine.analyze_ingested(documents, rejected) {
        Ok(outcome) => outcome,
        Err(PipelineError::NoDocuments { rejected }) => {
            for r in &rejected {
                error!("{}: {}", r.name, r.reason);
            }
            anyhow::bail!("None of the {} input file(s) could be read", args.inputs.len());
        }
    };

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    for annotated in &outcome.annotated {
        let bytes = annotated
            .to_docx()
            .with_context(|| format!("Failed to encode {}", annotated.output_name))?;
        let path = args.output_dir.join(&annotated.output_name);
        write_file(&path, &bytes)?;
        info!("Wrote {}", path.display());
    }

    write_reports(&outcome.report, &args.format, &args.output_dir)?;
    let summary =
        render::executive_summary(&outcome.report).context("Failed to render summary")?;
    print!("{summary}");
    Ok(())
}

fn write_reports(report: &ComplianceReport, formats: &[ReportFormat], dir: &Path) -> Result<()> {
    for format in formats {
        let (name, content) = match format {
            ReportFormat::Json => (
                "report.json",
                render::json(report).context("Failed to serialize report")?,
            ),
            ReportFormat::Summary => (
                "summary.txt",
                render::executive_summary(report).context("Failed to render summary")?,
            ),
            ReportFormat::Narrative => (
                "narrative.txt",
                render::narrative(report).context("Failed to render narrative")?,
            ),
            ReportFormat::Csv => (
                "summary.csv",
                render::csv_summary(report).context("Failed to render CSV summary")?,
            ),
        };
        write_file(&dir.join(name), content.as_bytes())?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_formats() {
        let args = Args::parse_from(["corporate-agent", "a.docx"]);
        assert_eq!(
            args.format,
            vec![
                ReportFormat::Json,
                ReportFormat::Summary,
                ReportFormat::Narrative,
                ReportFormat::Csv
            ]
        );
        assert_eq!(args.output_dir, PathBuf::from("review-output"));
    }

    #[test]
    fn test_format_list() {
        let args = Args::parse_from(["corporate-agent", "--format", "json,csv", "a.docx", "b.docx"]);
        assert_eq!(args.format, vec![ReportFormat::Json, ReportFormat::Csv]);
        assert_eq!(args.inputs.len(), 2);
    }
}
