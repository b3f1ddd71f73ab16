//! HTTP-backed advisory analyzer
//!
//! Posts the document text, its type and a handful of reference snippets to
//! an advisory service and reads back a list of issues. The service owns
//! provider and model choice; this side only speaks the fixed JSON shape.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use compliance_engine::{AdvisoryAnalyzer, AdvisoryError, ReferenceSnippet, ReferenceStore};
use serde::{Deserialize, Serialize};
use shared_types::{DocumentType, Issue, Severity};
use tracing::debug;

/// Reference snippets sent along with each request
const CONTEXT_SNIPPETS: usize = 5;

#[derive(Debug, Serialize)]
struct AdvisoryRequest<'a> {
    mode: &'a str,
    model: &'a str,
    document_type: DocumentType,
    text: &'a str,
    context: Vec<ReferenceSnippet>,
}

#[derive(Debug, Deserialize)]
struct AdvisoryResponse {
    issues: Vec<AdvisoryIssue>,
}

#[derive(Debug, Deserialize)]
struct AdvisoryIssue {
    #[serde(default)]
    section: Option<String>,
    issue: String,
    severity: Severity,
    #[serde(default)]
    suggestion: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

pub struct HttpAdvisor {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    references: Option<Arc<dyn ReferenceStore>>,
}

impl HttpAdvisor {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build advisory HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: std::env::var("ADVISORY_API_KEY").ok(),
            references: None,
        })
    }

    pub fn with_references(mut self, store: Arc<dyn ReferenceStore>) -> Self {
        self.references = Some(store);
        self
    }

    fn request(
        &self,
        mode: &str,
        text: &str,
        document_type: DocumentType,
    ) -> Result<Vec<Issue>, AdvisoryError> {
        let context = self
            .references
            .as_ref()
            .map(|store| {
                store.search(
                    &format!("{} ADGM requirements", document_type.label()),
                    CONTEXT_SNIPPETS,
                )
            })
            .unwrap_or_default();

        let body = AdvisoryRequest {
            mode,
            model: &self.model,
            document_type,
            text,
            context,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| AdvisoryError::Unavailable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Unavailable(format!(
                "advisory service returned {status}"
            )));
        }

        let text = response
            .text()
            .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;
        let issues = parse_response(&text, document_type)?;
        debug!("Advisory {} returned {} issue(s)", mode, issues.len());
        Ok(issues)
    }
}

impl AdvisoryAnalyzer for HttpAdvisor {
    fn analyze(&self, text: &str, document_type: DocumentType) -> Result<Vec<Issue>, AdvisoryError> {
        self.request("analyze", text, document_type)
    }

    fn identify_red_flags(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<Vec<Issue>, AdvisoryError> {
        self.request("red_flags", text, document_type)
    }
}

/// Decode a service response. Anything but the expected shape is an error.
fn parse_response(body: &str, document_type: DocumentType) -> Result<Vec<Issue>, AdvisoryError> {
    let response: AdvisoryResponse = serde_json::from_str(body)
        .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;

    Ok(response
        .issues
        .into_iter()
        .map(|raw| Issue {
            document: document_type.label().to_string(),
            section: raw.section,
            issue: raw.issue,
            severity: raw.severity,
            suggestion: raw.suggestion,
            reference: raw.reference,
            position: None,
        })
        .collect())
}
