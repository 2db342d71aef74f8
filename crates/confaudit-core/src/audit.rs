use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detect::{DetectionResult, DeviceClassifier, DeviceType};
use crate::engine::{evaluate_all, Status};
use crate::normalize::{extract_version, normalize_config, VersionInfo};
use crate::rule::{Risk, Rule};

/// A rule result joined with the fields of the rule that produced it.
/// This join is the complete contract handed to the report renderers.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub id: String,
    pub section: String,
    pub title: String,
    pub status: Status,
    pub risk: Risk,
    pub remark: String,
    pub evidence: String,
    pub recommendation: String,
}

/// Status counts over a finding list.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub manual: usize,
}

impl AuditSummary {
    fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self {
            total: findings.len(),
            ..Self::default()
        };
        for f in findings {
            match f.status {
                Status::Pass => summary.pass += 1,
                Status::Fail => summary.fail += 1,
                Status::Manual => summary.manual += 1,
            }
        }
        summary
    }
}

/// Everything a renderer needs about one audit run.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    /// Label for the audited input, usually the file name.
    pub source: String,
    pub device: DetectionResult,
    pub version: VersionInfo,
    /// Name of the ruleset the findings were produced from.
    pub ruleset: String,
    pub benchmark_url: String,
    pub findings: Vec<Finding>,
    pub summary: AuditSummary,
}

/// Published CIS benchmark for the detected device class.
pub fn benchmark_url(device: DeviceType) -> &'static str {
    match device {
        DeviceType::Router => "https://www.cisecurity.org/benchmark/cisco_ios",
        DeviceType::SwitchL2 | DeviceType::SwitchL3 => "https://www.cisecurity.org/benchmark/cisco",
        DeviceType::Unknown => "https://www.cisecurity.org/cis-benchmarks",
    }
}

/// Run a full audit: normalize, classify, evaluate every rule, and join
/// results into findings. Pure over its inputs; one report per invocation.
pub fn run_audit(source: &str, raw: &str, rules: &[Rule], ruleset: &str) -> AuditReport {
    let cfg = normalize_config(raw);
    let version = extract_version(&cfg);
    let device = DeviceClassifier::new().classify(&cfg);

    tracing::info!(
        source,
        device = %device.device_type,
        confidence = %device.confidence,
        rules = rules.len(),
        "running audit"
    );

    let results = evaluate_all(&cfg, rules);

    let findings: Vec<Finding> = rules
        .iter()
        .zip(results)
        .map(|(rule, result)| Finding {
            id: rule.id.clone(),
            section: rule.section.clone(),
            title: rule.title.clone(),
            status: result.status,
            risk: rule.risk,
            remark: result.remark,
            evidence: result.evidence,
            recommendation: rule.recommendation.clone(),
        })
        .collect();

    let summary = AuditSummary::from_findings(&findings);
    let benchmark_url = benchmark_url(device.device_type).to_string();

    AuditReport {
        generated_at: Utc::now(),
        source: source.to_string(),
        device,
        version,
        ruleset: ruleset.to_string(),
        benchmark_url,
        findings,
        summary,
    }
}
