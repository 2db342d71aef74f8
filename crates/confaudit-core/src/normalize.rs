use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Unify line endings so all downstream scanning can assume LF.
pub fn normalize_config(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Software identity pulled out of a configuration export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Value of the `version` statement, e.g. `15.2`.
    pub os_version: Option<String>,
    /// The `Cisco IOS Software ...` line when the export carries one.
    pub software_line: Option<String>,
}

/// Extract OS version and software description from normalized config text.
///
/// The version statement is matched as a full line first; some exports embed
/// it mid-line (pasted `show version` output), so a loose match is the
/// fallback.
pub fn extract_version(cfg: &str) -> VersionInfo {
    let strict = line_regex(r"^\s*version\s+([0-9A-Za-z().]+)\s*$");
    let loose = line_regex(r"\bversion\s+([0-9A-Za-z().]+)");
    let software = line_regex(r"^\s*(Cisco IOS Software.*)$");

    let os_version = strict
        .captures(cfg)
        .or_else(|| loose.captures(cfg))
        .map(|c| c[1].trim().to_string());

    let software_line = software.captures(cfg).map(|c| c[1].trim().to_string());

    VersionInfo {
        os_version,
        software_line,
    }
}

fn line_regex(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .case_insensitive(true)
        .build()
        .expect("static pattern")
}
