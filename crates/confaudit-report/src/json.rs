use serde::Serialize;

use confaudit_core::audit::AuditReport;
use confaudit_core::engine::Status;
use confaudit_core::rule::Risk;

/// Format a full audit report as JSON.
pub fn format_report(report: &AuditReport, compact: bool) -> String {
    if compact {
        serde_json::to_string(report).expect("AuditReport should be serializable")
    } else {
        serde_json::to_string_pretty(report).expect("AuditReport should be serializable")
    }
}

/// Wrapper for check output that adds pass/fail metadata.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    #[serde(flatten)]
    pub report: &'a AuditReport,
    pub check: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub passed: bool,
    pub fail_risk: Risk,
    pub failing_count: usize,
}

/// Format a check result as JSON. Returns (json_string, passed).
pub fn format_check(report: &AuditReport, fail_risk: Risk, compact: bool) -> (String, bool) {
    let failing_count = report
        .findings
        .iter()
        .filter(|f| f.status == Status::Fail && f.risk >= fail_risk)
        .count();

    let passed = failing_count == 0;

    let output = CheckOutput {
        report,
        check: CheckStatus {
            passed,
            fail_risk,
            failing_count,
        },
    };

    let json = if compact {
        serde_json::to_string(&output).expect("CheckOutput should be serializable")
    } else {
        serde_json::to_string_pretty(&output).expect("CheckOutput should be serializable")
    };

    (json, passed)
}
