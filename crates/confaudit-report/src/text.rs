use colored::Colorize;

use confaudit_core::audit::AuditReport;
use confaudit_core::engine::Status;
use confaudit_core::rule::Risk;

/// Format a full audit report for terminal output.
pub fn format_report(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "Confaudit - Configuration Audit".bold()));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    out.push_str(&format!("{}: {}\n", "Source".bold(), report.source));
    out.push_str(&format!(
        "{}: {} (confidence: {})\n",
        "Device".bold(),
        report.device.device_type,
        confidence_colored(report),
    ));
    out.push_str(&format!(
        "{}: router={} switch={} l3={}\n",
        "Scores".bold(),
        report.device.scores.router,
        report.device.scores.switch,
        report.device.scores.l3,
    ));

    if let Some(ref version) = report.version.os_version {
        out.push_str(&format!("{}: {}\n", "OS Version".bold(), version));
    }
    if let Some(ref line) = report.version.software_line {
        out.push_str(&format!("{}: {}\n", "Software".bold(), line));
    }
    out.push_str(&format!("{}: {}\n", "Ruleset".bold(), report.ruleset));
    out.push_str(&format!("{}: {}\n", "Benchmark".bold(), report.benchmark_url));

    if !report.device.indicators.is_empty() {
        out.push_str(&format!("\n{}\n", "Indicators".bold()));
        for indicator in &report.device.indicators {
            out.push_str(&format!("  - {indicator}\n"));
        }
    }

    out.push_str(&format!(
        "\n{}: {} checks, {} pass, {} fail, {} manual\n",
        "Summary".bold(),
        report.summary.total,
        report.summary.pass.to_string().green(),
        report.summary.fail.to_string().red(),
        report.summary.manual.to_string().yellow(),
    ));

    out.push_str(&format!("\n{}\n{}\n", "Findings".bold(), "-".repeat(40)));

    for f in &report.findings {
        let status_str = match f.status {
            Status::Pass => "PASS".green().bold().to_string(),
            Status::Fail => "FAIL".red().bold().to_string(),
            Status::Manual => "MANUAL".yellow().bold().to_string(),
        };

        out.push_str(&format!(
            "\n  {} [{}] {} - {}\n",
            status_str, f.id, f.section, f.title,
        ));
        out.push_str(&format!("    Risk: {} | {}\n", f.risk, f.remark));

        if f.evidence != "-" {
            for line in f.evidence.lines() {
                out.push_str(&format!("      | {line}\n"));
            }
        }
        if f.status == Status::Fail && f.recommendation != "-" {
            out.push_str(&format!(
                "    {}: {}\n",
                "Recommendation".cyan(),
                f.recommendation
            ));
        }
    }

    out.push('\n');
    out
}

fn confidence_colored(report: &AuditReport) -> String {
    let label = report.device.confidence.to_string();
    match report.device.confidence {
        confaudit_core::detect::Confidence::High => label.green().to_string(),
        confaudit_core::detect::Confidence::Medium => label.yellow().to_string(),
        confaudit_core::detect::Confidence::Low => label.red().to_string(),
    }
}

/// Format a check result for CI use. Returns (text, passed): the check fails
/// when any FAIL finding carries a risk at or above `fail_risk`.
pub fn format_check(report: &AuditReport, fail_risk: Risk) -> (String, bool) {
    let failing = report
        .findings
        .iter()
        .filter(|f| f.status == Status::Fail && f.risk >= fail_risk)
        .count();

    let passed = failing == 0;

    let mut out = format_report(report);

    if passed {
        out.push_str(&format!("{}\n", "CHECK PASSED".green().bold()));
    } else {
        out.push_str(&format!(
            "{}: {} failing check(s) at risk {} or above\n",
            "CHECK FAILED".red().bold(),
            failing,
            fail_risk,
        ));
    }

    (out, passed)
}
