use confaudit_core::audit::AuditReport;
use confaudit_core::detect::Confidence;
use confaudit_core::engine::Status;
use confaudit_core::rule::Risk;

/// Render a self-contained HTML report: summary cards, detection scores,
/// indicator chips, and a searchable/filterable findings table.
pub fn format_report(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\" />\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n");
    out.push_str("<title>Configuration Audit Report</title>\n");
    out.push_str(STYLE);
    out.push_str("</head>\n<body>\n<div class=\"wrap\">\n");

    // Header
    out.push_str(&format!(
        "<div class=\"header\"><div><h1>Configuration Audit Report</h1>\
         <div class=\"sub\">Source: {} &middot; Generated: {}</div></div></div>\n",
        escape(&report.source),
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));

    // Summary cards
    out.push_str("<div class=\"grid\">\n");

    out.push_str(&format!(
        "<div class=\"card\"><div class=\"label\">Detected Device Type</div>\
         <div class=\"value\">{}</div>\
         <div class=\"sub\">Confidence: {}</div></div>\n",
        report.device.device_type,
        confidence_badge(report.device.confidence),
    ));

    let version = report.version.os_version.as_deref().unwrap_or("Not Found");
    let software = report.version.software_line.as_deref().unwrap_or("Not Found");
    out.push_str(&format!(
        "<div class=\"card\"><div class=\"label\">OS Version</div>\
         <div class=\"value\">{}</div>\
         <div class=\"sub\">{}</div>\
         <div class=\"sub\"><a href=\"{}\" target=\"_blank\">Check latest CIS benchmark</a></div></div>\n",
        escape(version),
        escape(software),
        escape(&report.benchmark_url),
    ));

    out.push_str(&format!(
        "<div class=\"card\"><div class=\"label\">Ruleset</div>\
         <div class=\"value mono\">{}</div></div>\n",
        escape(&report.ruleset),
    ));

    // KPI row
    out.push_str(&format!(
        "<div class=\"card span2\"><div class=\"label\">Summary</div><div class=\"kpis\">\
         <div class=\"kpi\"><div class=\"label\">Total</div><div class=\"big\">{}</div></div>\
         <div class=\"kpi\"><div class=\"label\">PASS</div><div class=\"big pass\">{}</div></div>\
         <div class=\"kpi\"><div class=\"label\">FAIL</div><div class=\"big fail\">{}</div></div>\
         <div class=\"kpi\"><div class=\"label\">MANUAL</div><div class=\"big manual\">{}</div></div>\
         </div></div>\n",
        report.summary.total, report.summary.pass, report.summary.fail, report.summary.manual,
    ));

    out.push_str(&format!(
        "<div class=\"card\"><div class=\"label\">Detection Scores</div><div class=\"kpis\">\
         <div class=\"kpi\"><div class=\"label\">Router</div><div class=\"big\">{}</div></div>\
         <div class=\"kpi\"><div class=\"label\">Switch</div><div class=\"big\">{}</div></div>\
         <div class=\"kpi\"><div class=\"label\">L3</div><div class=\"big\">{}</div></div>\
         </div></div>\n",
        report.device.scores.router, report.device.scores.switch, report.device.scores.l3,
    ));

    // Indicators
    out.push_str("<div class=\"card span3\"><div class=\"label\">Indicators</div><div class=\"chips\">");
    if report.device.indicators.is_empty() {
        out.push_str("<span class=\"chip\">No indicators found</span>");
    } else {
        for indicator in &report.device.indicators {
            out.push_str(&format!("<span class=\"chip\">{}</span>", escape(indicator)));
        }
    }
    out.push_str("</div></div>\n");

    out.push_str("</div>\n");

    // Findings table with search + status filter
    out.push_str(
        "<div class=\"toolbar\">\
         <input id=\"searchBox\" type=\"text\" placeholder=\"Search findings...\" onkeyup=\"applyFilters()\" />\
         <div class=\"filters\">\
         <button class=\"filterBtn active\" id=\"btnALL\" onclick=\"setFilter('ALL')\">ALL</button>\
         <button class=\"filterBtn\" id=\"btnPASS\" onclick=\"setFilter('PASS')\">PASS</button>\
         <button class=\"filterBtn\" id=\"btnFAIL\" onclick=\"setFilter('FAIL')\">FAIL</button>\
         <button class=\"filterBtn\" id=\"btnMANUAL\" onclick=\"setFilter('MANUAL')\">MANUAL</button>\
         </div></div>\n",
    );

    out.push_str(
        "<table id=\"auditTable\"><thead><tr>\
         <th>ID</th><th>Section</th><th>Title</th><th>Status</th><th>Risk</th>\
         <th>Remark</th><th>Evidence</th><th>Recommendation</th>\
         </tr></thead><tbody>\n",
    );

    for f in &report.findings {
        out.push_str(&format!(
            "<tr data-status=\"{status}\">\
             <td class=\"mono\">{id}</td><td>{section}</td><td class=\"title\">{title}</td>\
             <td>{status_badge}</td><td>{risk_badge}</td><td>{remark}</td>\
             <td class=\"evidence\"><pre>{evidence}</pre></td><td>{recommendation}</td></tr>\n",
            status = f.status,
            id = escape(&f.id),
            section = escape(&f.section),
            title = escape(&f.title),
            status_badge = status_badge(f.status),
            risk_badge = risk_badge(f.risk),
            remark = escape(&f.remark),
            evidence = escape(&f.evidence),
            recommendation = escape(&f.recommendation),
        ));
    }

    out.push_str("</tbody></table>\n");
    out.push_str(SCRIPT);
    out.push_str("</div>\n</body>\n</html>\n");

    out
}

/// Minimal HTML escaping for interpolated text.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn status_badge(status: Status) -> &'static str {
    match status {
        Status::Pass => "<span class=\"pill pill-green\">PASS</span>",
        Status::Fail => "<span class=\"pill pill-red\">FAIL</span>",
        Status::Manual => "<span class=\"pill pill-yellow\">MANUAL</span>",
    }
}

fn risk_badge(risk: Risk) -> &'static str {
    match risk {
        Risk::High => "<span class=\"pill pill-red\">High</span>",
        Risk::Medium => "<span class=\"pill pill-yellow\">Medium</span>",
        Risk::Low => "<span class=\"pill pill-blue\">Low</span>",
    }
}

fn confidence_badge(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "<span class=\"pill pill-green\">High</span>",
        Confidence::Medium => "<span class=\"pill pill-yellow\">Medium</span>",
        Confidence::Low => "<span class=\"pill pill-red\">Low</span>",
    }
}

const STYLE: &str = r#"<style>
:root { --bg: #0b1020; --card: rgba(255,255,255,0.06); --border: rgba(255,255,255,0.12);
        --text: #e5e7eb; --muted: rgba(229,231,235,0.72); }
* { box-sizing: border-box; }
body { margin: 0; font-family: ui-sans-serif, system-ui, sans-serif;
       background: linear-gradient(180deg, #0b1020, #070a14); color: var(--text); }
.wrap { max-width: 1300px; margin: auto; padding: 22px 16px 40px; }
.header h1 { margin: 0; font-size: 24px; }
.sub { margin-top: 6px; font-size: 13px; color: var(--muted); word-break: break-word; }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 14px; margin-top: 14px; }
.card { background: var(--card); border: 1px solid var(--border); border-radius: 14px; padding: 16px; }
.span2 { grid-column: span 2; }
.span3 { grid-column: span 3; }
@media(max-width: 950px) { .grid { grid-template-columns: 1fr; } .span2, .span3 { grid-column: span 1; } }
.label { font-size: 12px; color: var(--muted); margin-bottom: 6px; }
.value { font-size: 18px; font-weight: 800; }
.mono { font-family: ui-monospace, Menlo, Consolas, monospace; font-size: 12px; }
.kpis { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; }
.kpi { padding: 10px; border-radius: 10px; background: rgba(255,255,255,0.05);
       border: 1px solid var(--border); }
.kpi .big { font-size: 18px; font-weight: 900; margin-top: 4px; }
.big.pass { color: #86efac; } .big.fail { color: #fca5a5; } .big.manual { color: #fde68a; }
.chips { display: flex; gap: 8px; flex-wrap: wrap; }
.chip { padding: 6px 10px; border-radius: 999px; background: rgba(255,255,255,0.06);
        border: 1px solid var(--border); font-size: 12px; }
.pill { display: inline-flex; padding: 4px 10px; border-radius: 999px; font-weight: 800;
        font-size: 12px; border: 1px solid var(--border); }
.pill-green { color: #86efac; background: rgba(34,197,94,0.18); }
.pill-red { color: #fca5a5; background: rgba(239,68,68,0.18); }
.pill-yellow { color: #fde68a; background: rgba(245,158,11,0.18); }
.pill-blue { color: #93c5fd; background: rgba(59,130,246,0.18); }
.toolbar { display: flex; gap: 10px; margin-top: 16px; flex-wrap: wrap; }
#searchBox { flex: 1; min-width: 260px; padding: 10px 14px; border-radius: 10px;
             border: 1px solid var(--border); background: rgba(255,255,255,0.06);
             color: #fff; font-size: 14px; outline: none; }
.filters { display: flex; gap: 8px; }
.filterBtn { cursor: pointer; padding: 8px 12px; border-radius: 10px; font-weight: 700;
             font-size: 12px; border: 1px solid var(--border);
             background: rgba(255,255,255,0.06); color: var(--text); }
.filterBtn.active { background: rgba(255,255,255,0.16); }
table { width: 100%; border-collapse: collapse; margin-top: 14px;
        border: 1px solid var(--border); background: rgba(255,255,255,0.04); }
thead th { position: sticky; top: 0; background: rgba(15,23,42,0.92); padding: 10px;
           font-size: 12px; text-transform: uppercase; letter-spacing: 0.5px;
           border-bottom: 1px solid var(--border); text-align: left; }
td { padding: 10px; border-bottom: 1px solid rgba(255,255,255,0.08);
     vertical-align: top; font-size: 13px; }
td.title { font-weight: 700; }
.evidence pre { white-space: pre-wrap; margin: 0; padding: 8px; border-radius: 8px;
                background: rgba(0,0,0,0.35); border: 1px solid var(--border);
                font-size: 12px; }
tr[data-status="PASS"] td { border-left: 3px solid rgba(34,197,94,0.0); }
tr[data-status="PASS"] td:first-child { border-left: 3px solid rgba(34,197,94,0.75); }
tr[data-status="FAIL"] td:first-child { border-left: 3px solid rgba(239,68,68,0.75); }
tr[data-status="MANUAL"] td:first-child { border-left: 3px solid rgba(245,158,11,0.75); }
</style>
"#;

const SCRIPT: &str = r##"<script>
let statusFilter = "ALL";
function setFilter(status) {
  statusFilter = status;
  for (const id of ["ALL", "PASS", "FAIL", "MANUAL"]) {
    document.getElementById("btn" + id).classList.toggle("active", id === status);
  }
  applyFilters();
}
function applyFilters() {
  const query = document.getElementById("searchBox").value.toLowerCase();
  const rows = document.querySelectorAll("#auditTable tbody tr");
  for (const row of rows) {
    const matchText = row.innerText.toLowerCase().includes(query);
    const matchStatus = statusFilter === "ALL" || row.dataset.status === statusFilter;
    row.style.display = matchText && matchStatus ? "" : "none";
  }
}
</script>
"##;
