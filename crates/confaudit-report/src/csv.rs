use anyhow::{Context, Result};

use confaudit_core::audit::AuditReport;

/// Render the findings table as CSV, one row per finding, in audit order.
/// Column set matches the HTML report table.
pub fn format_report(report: &AuditReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "ID",
            "Section",
            "Title",
            "Status",
            "Risk",
            "Remark",
            "Evidence",
            "Recommendation",
        ])
        .context("failed to write CSV header")?;

    for f in &report.findings {
        writer
            .write_record([
                f.id.as_str(),
                f.section.as_str(),
                f.title.as_str(),
                &f.status.to_string(),
                &f.risk.to_string(),
                f.remark.as_str(),
                f.evidence.as_str(),
                f.recommendation.as_str(),
            ])
            .with_context(|| format!("failed to write CSV row for rule {}", f.id))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {e}"))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}
