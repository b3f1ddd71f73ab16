//! Human-readable renderings of a `ComplianceReport`
//!
//! Everything here is derived from the report alone.

use std::fmt::{self, Write as _};

use shared_types::{ComplianceReport, Severity};

/// Top-level summary: process, completeness, issue tally, key recommendations
pub fn executive_summary(report: &ComplianceReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let completeness = &report.completeness;

    writeln!(out, "ADGM Corporate Agent - Analysis Summary")?;
    writeln!(out)?;
    writeln!(out, "Process Identification")?;
    writeln!(out, "- Identified Process: {}", report.process.process)?;
    writeln!(out, "- Documents Uploaded: {}", completeness.total_uploaded)?;
    writeln!(out, "- Required Documents: {}", completeness.total_required)?;
    writeln!(out, "- Overall Compliance Score: {}%", report.overall_score)?;
    writeln!(out)?;

    if completeness.missing_documents.is_empty() {
        writeln!(out, "All Required Documents Present")?;
    } else {
        writeln!(out, "Missing Documents")?;
        for doc in &completeness.missing_documents {
            writeln!(out, "- {doc}")?;
        }
    }
    writeln!(out)?;

    let counts = report.severity_counts();
    if counts.total() == 0 {
        writeln!(out, "No Compliance Issues Found")?;
    } else {
        writeln!(out, "Issues Summary")?;
        for severity in Severity::DESCENDING {
            let count = counts.get(severity);
            if count > 0 {
                writeln!(out, "- {severity}: {count} issue(s)")?;
            }
        }
    }
    writeln!(out)?;

    if !report.recommendations.is_empty() {
        writeln!(out, "Key Recommendations")?;
        for rec in report.recommendations.iter().take(5) {
            writeln!(out, "- {rec}")?;
        }
        writeln!(out)?;
    }

    if !report.rejected.is_empty() {
        writeln!(out, "Rejected Files")?;
        for rejected in &report.rejected {
            writeln!(out, "- {}: {}", rejected.name, rejected.reason)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Processing Details")?;
    writeln!(
        out,
        "- Analysis Date: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "- Documents Analyzed: {}", report.documents.len())?;
    writeln!(out, "- Total Issues Found: {}", counts.total())?;
    Ok(out)
}

/// Document-by-document narrative with every issue spelled out
pub fn narrative(report: &ComplianceReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let completeness = &report.completeness;

    writeln!(out, "ADGM Corporate Agent - Detailed Analysis Report")?;
    writeln!(out)?;
    writeln!(out, "Process Type: {}", report.process.process)?;
    writeln!(out, "Overall Compliance Score: {}%", report.overall_score)?;
    writeln!(out, "Completeness: {:.1}%", completeness.completeness_percentage)?;
    writeln!(out, "Typical Timeline: {}", report.guidance.typical_timeline)?;
    writeln!(out)?;

    for (i, doc) in report.documents.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, doc.name)?;
        writeln!(out, "   Document Type: {}", doc.document_type)?;
        writeln!(out, "   Type Confidence: {:.1}%", doc.type_confidence * 100.0)?;
        writeln!(out, "   Compliance Score: {}%", doc.compliance_score)?;
        writeln!(out, "   Word Count: {}", doc.word_count)?;
        writeln!(out, "   Issues Found: {}", doc.issues.len())?;

        if doc.issues.is_empty() {
            writeln!(out, "   No issues found in this document")?;
        }
        for (j, issue) in doc.issues.iter().enumerate() {
            writeln!(
                out,
                "   {}.{} {} - {}",
                i + 1,
                j + 1,
                issue.severity,
                issue.section.as_deref().unwrap_or("General")
            )?;
            writeln!(out, "      Issue: {}", issue.issue)?;
            writeln!(
                out,
                "      Suggestion: {}",
                issue
                    .suggestion
                    .as_deref()
                    .unwrap_or("No specific suggestion provided")
            )?;
            writeln!(
                out,
                "      ADGM Reference: {}",
                issue
                    .reference
                    .as_deref()
                    .unwrap_or("General ADGM requirements")
            )?;
        }
        writeln!(out)?;
    }

    if !completeness.missing_documents.is_empty() {
        writeln!(out, "Missing Required Documents")?;
        for doc in &completeness.missing_documents {
            writeln!(out, "- {doc}: Required for {}", completeness.process)?;
        }
        writeln!(out)?;
    }

    if !report.recommendations.is_empty() {
        writeln!(out, "Detailed Recommendations")?;
        for (i, rec) in report.recommendations.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, rec)?;
        }
    }
    Ok(out)
}

/// One row per analyzed document
pub fn csv_summary(report: &ComplianceReport) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Document",
        "Type",
        "Compliance Score",
        "Word Count",
        "Issues Count",
        "Critical Issues",
        "High Issues",
        "Medium Issues",
        "Low Issues",
    ])?;

    for doc in &report.documents {
        let counts = doc.severity_counts();
        writer.write_record([
            doc.name.clone(),
            doc.document_type.label().to_string(),
            doc.compliance_score.to_string(),
            doc.word_count.to_string(),
            doc.issues.len().to_string(),
            counts.critical.to_string(),
            counts.high.to_string(),
            counts.medium.to_string(),
            counts.low.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn json(report: &ComplianceReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
