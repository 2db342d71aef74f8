use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::banner::extract_banner;
use crate::blocks::extract_blocks;
use crate::rule::{Expectation, Rule, RuleKind};

/// Verdict for a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    Manual,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
            Status::Manual => write!(f, "MANUAL"),
        }
    }
}

/// Outcome of evaluating one rule. `evidence` is never the empty string:
/// "no evidence captured" is always the `-` sentinel.
#[derive(Debug, Clone, Serialize)]
pub struct RuleResult {
    pub status: Status,
    pub remark: String,
    pub evidence: String,
}

/// Sentinel for "no evidence captured".
pub const NO_EVIDENCE: &str = "-";

impl RuleResult {
    fn new(status: Status, remark: impl Into<String>, evidence: impl Into<String>) -> Self {
        let evidence = evidence.into();
        Self {
            status,
            remark: remark.into(),
            evidence: if evidence.is_empty() {
                NO_EVIDENCE.to_string()
            } else {
                evidence
            },
        }
    }

    fn manual(remark: impl Into<String>) -> Self {
        Self::new(Status::Manual, remark, NO_EVIDENCE)
    }
}

const MAX_EVIDENCE_LINES: usize = 8;
const MAX_EVIDENCE_ENTRIES: usize = 200;

/// Compile a rule-supplied pattern with the whole-text matching semantics
/// every rule kind uses: case-insensitive, `^`/`$` anchoring per line.
fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .case_insensitive(true)
        .build()
}

/// Up to `max` matching lines, verbatim (trailing whitespace stripped).
fn evidence_lines(text: &str, re: &Regex, max: usize) -> String {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| re.is_match(line))
        .take(max)
        .map(|line| line.trim_end())
        .collect();
    if lines.is_empty() {
        NO_EVIDENCE.to_string()
    } else {
        lines.join("\n")
    }
}

/// Evaluate one rule against normalized configuration text.
///
/// Never fails: rule-definition problems (missing or un-compilable pattern,
/// unsupported type, nonsensical expect) degrade to MANUAL results so the
/// audit always completes with one result per rule.
pub fn evaluate(cfg: &str, rule: &Rule) -> RuleResult {
    match &rule.kind {
        RuleKind::Manual => RuleResult::manual("Manual verification required"),

        RuleKind::Regex { pattern, expect } => eval_regex(cfg, rule, pattern, *expect),

        RuleKind::RegexCapture { pattern, expect } => {
            eval_regex_capture(cfg, rule, pattern, *expect)
        }

        RuleKind::RegexCaptureAll { pattern, expect } => {
            eval_regex_capture_all(cfg, rule, pattern, *expect)
        }

        RuleKind::Banner {
            banner_type,
            expect,
        } => eval_banner(cfg, *banner_type, *expect),

        RuleKind::BlockPresent {
            block,
            pattern,
            evidence_pattern,
            expect,
        } => eval_block_present(cfg, rule, block, pattern, evidence_pattern.as_deref(), *expect),

        RuleKind::BlockAbsent {
            block,
            pattern,
            evidence_pattern,
            expect,
        } => eval_block_absent(cfg, rule, block, pattern, evidence_pattern.as_deref(), *expect),

        RuleKind::Unsupported => RuleResult::manual("Rule type not supported"),
    }
}

/// Evaluate a full rule list. Results are returned in input order; rules are
/// independent, so evaluation itself runs in parallel.
pub fn evaluate_all(cfg: &str, rules: &[Rule]) -> Vec<RuleResult> {
    tracing::debug!(rules = rules.len(), "evaluating ruleset");
    rules.par_iter().map(|rule| evaluate(cfg, rule)).collect()
}

fn eval_regex(cfg: &str, rule: &Rule, pattern: &str, expect: Expectation) -> RuleResult {
    if pattern.is_empty() {
        return RuleResult::manual(format!("{} (pattern missing)", rule.title));
    }
    let re = match compile(pattern) {
        Ok(re) => re,
        Err(_) => return RuleResult::manual(format!("{} (invalid pattern)", rule.title)),
    };

    let found = re.is_match(cfg);
    let evidence = evidence_lines(cfg, &re, MAX_EVIDENCE_LINES);

    match expect {
        Expectation::Present => {
            if found {
                RuleResult::new(Status::Pass, "Matched", evidence)
            } else {
                RuleResult::new(Status::Fail, "Not found", NO_EVIDENCE)
            }
        }
        Expectation::Absent => {
            if found {
                RuleResult::new(Status::Fail, "Insecure config found", evidence)
            } else {
                RuleResult::new(Status::Pass, "Not present (good)", NO_EVIDENCE)
            }
        }
        Expectation::Manual => {
            let evidence = if found { evidence } else { NO_EVIDENCE.to_string() };
            RuleResult::new(Status::Manual, "Manual verification required", evidence)
        }
    }
}

fn eval_regex_capture(cfg: &str, rule: &Rule, pattern: &str, expect: Expectation) -> RuleResult {
    if pattern.is_empty() {
        return RuleResult::manual(format!("{} (pattern missing)", rule.title));
    }
    let re = match compile(pattern) {
        Ok(re) => re,
        Err(_) => return RuleResult::manual(format!("{} (invalid pattern)", rule.title)),
    };

    let matched = re.find(cfg);
    let evidence = matched
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_EVIDENCE.to_string());

    match expect {
        Expectation::Present => {
            if matched.is_some() {
                RuleResult::new(Status::Pass, "Matched", evidence)
            } else {
                RuleResult::new(Status::Fail, "Not found", NO_EVIDENCE)
            }
        }
        Expectation::Absent => {
            if matched.is_some() {
                RuleResult::new(Status::Fail, "Insecure config found", evidence)
            } else {
                RuleResult::new(Status::Pass, "Not present (good)", NO_EVIDENCE)
            }
        }
        Expectation::Manual => RuleResult::manual("Invalid expect value"),
    }
}

fn eval_regex_capture_all(
    cfg: &str,
    rule: &Rule,
    pattern: &str,
    expect: Expectation,
) -> RuleResult {
    if pattern.is_empty() {
        return RuleResult::manual(format!("{} (pattern missing)", rule.title));
    }
    let re = match compile(pattern) {
        Ok(re) => re,
        Err(_) => return RuleResult::manual(format!("{} (invalid pattern)", rule.title)),
    };

    let entries: Vec<&str> = re
        .find_iter(cfg)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() {
        return match expect {
            Expectation::Present => RuleResult::new(Status::Fail, "Not found", NO_EVIDENCE),
            Expectation::Absent => {
                RuleResult::new(Status::Pass, "Not present (good)", NO_EVIDENCE)
            }
            Expectation::Manual => RuleResult::manual("Invalid expect value"),
        };
    }

    let count = entries.len();
    let evidence = entries
        .into_iter()
        .take(MAX_EVIDENCE_ENTRIES)
        .collect::<Vec<_>>()
        .join("\n");

    match expect {
        Expectation::Present => {
            RuleResult::new(Status::Pass, format!("Matched {count} entries"), evidence)
        }
        Expectation::Absent => RuleResult::new(
            Status::Fail,
            format!("Insecure config found ({count} entries)"),
            evidence,
        ),
        Expectation::Manual => RuleResult::new(Status::Manual, "Invalid expect value", evidence),
    }
}

fn eval_banner(
    cfg: &str,
    banner_type: crate::banner::BannerKind,
    expect: Expectation,
) -> RuleResult {
    let banner = extract_banner(cfg, banner_type);

    match expect {
        Expectation::Present => match banner {
            Some(b) => RuleResult::new(Status::Pass, "Matched", b.render()),
            None => RuleResult::new(Status::Fail, "Not found", NO_EVIDENCE),
        },
        Expectation::Absent => match banner {
            Some(b) => RuleResult::new(
                Status::Fail,
                "Banner present (should be removed)",
                b.render(),
            ),
            None => RuleResult::new(Status::Pass, "Not present (good)", NO_EVIDENCE),
        },
        Expectation::Manual => RuleResult::manual("Invalid expect value"),
    }
}

/// Header regex for block rules: the configured header text, escaped,
/// anchored at the start of a line.
fn block_header_regex(block: &str) -> Regex {
    RegexBuilder::new(&format!("^{}", regex::escape(block)))
        .case_insensitive(true)
        .build()
        .expect("escaped pattern")
}

fn eval_block_present(
    cfg: &str,
    rule: &Rule,
    block: &str,
    pattern: &str,
    evidence_pattern: Option<&str>,
    expect: Expectation,
) -> RuleResult {
    if block.is_empty() || pattern.is_empty() {
        return RuleResult::manual(format!("{} (block/pattern missing)", rule.title));
    }
    let re = match compile(pattern) {
        Ok(re) => re,
        Err(_) => return RuleResult::manual(format!("{} (invalid pattern)", rule.title)),
    };
    let evidence_re = match evidence_pattern.map(compile).transpose() {
        Ok(re) => re,
        Err(_) => return RuleResult::manual(format!("{} (invalid pattern)", rule.title)),
    };

    let blocks = extract_blocks(cfg, &block_header_regex(block));
    if blocks.is_empty() {
        return RuleResult::new(Status::Fail, format!("{block} block not found"), NO_EVIDENCE);
    }

    let mut matched_blocks = 0usize;
    let mut evidence_parts = Vec::new();

    for blk in &blocks {
        if re.is_match(blk) {
            matched_blocks += 1;
            let scan_re = evidence_re.as_ref().unwrap_or(&re);
            let lines = evidence_lines(blk, scan_re, MAX_EVIDENCE_ENTRIES);
            evidence_parts.push(blk.lines().next().unwrap_or_default().to_string());
            evidence_parts.push(lines);
        }
    }

    let evidence = evidence_parts.join("\n").trim().to_string();
    let found = matched_blocks > 0;

    match expect {
        Expectation::Present => {
            if found {
                RuleResult::new(
                    Status::Pass,
                    format!("Matched in {matched_blocks} block(s)"),
                    evidence,
                )
            } else {
                RuleResult::new(Status::Fail, "Not found", NO_EVIDENCE)
            }
        }
        Expectation::Manual => {
            if found {
                RuleResult::new(
                    Status::Manual,
                    format!("Matched in {matched_blocks} block(s)"),
                    evidence,
                )
            } else {
                RuleResult::manual("Manual verification required")
            }
        }
        Expectation::Absent => RuleResult::new(Status::Manual, "Invalid expect value", evidence),
    }
}

fn eval_block_absent(
    cfg: &str,
    rule: &Rule,
    block: &str,
    pattern: &str,
    evidence_pattern: Option<&str>,
    expect: Expectation,
) -> RuleResult {
    if block.is_empty() || pattern.is_empty() {
        return RuleResult::manual(format!("{} (block/pattern missing)", rule.title));
    }
    let re = match compile(pattern) {
        Ok(re) => re,
        Err(_) => return RuleResult::manual(format!("{} (invalid pattern)", rule.title)),
    };
    let evidence_re = match evidence_pattern.map(compile).transpose() {
        Ok(re) => re,
        Err(_) => return RuleResult::manual(format!("{} (invalid pattern)", rule.title)),
    };

    let blocks = extract_blocks(cfg, &block_header_regex(block));
    if blocks.is_empty() {
        // A missing block is a finding here too, not a pass. See DESIGN.md.
        return RuleResult::new(Status::Fail, format!("{block} block not found"), NO_EVIDENCE);
    }

    let mut found = false;
    let mut evidence_parts = Vec::new();

    for blk in &blocks {
        if re.is_match(blk) {
            found = true;
            let lines = match evidence_re.as_ref() {
                Some(ev_re) => evidence_lines(blk, ev_re, MAX_EVIDENCE_ENTRIES),
                None => evidence_lines(blk, &re, MAX_EVIDENCE_LINES),
            };
            if lines != NO_EVIDENCE {
                evidence_parts.push(lines);
            }
        }
    }

    let evidence = evidence_parts.join("\n\n").trim().to_string();

    match expect {
        Expectation::Absent => {
            if found {
                RuleResult::new(Status::Fail, "Insecure config found in block", evidence)
            } else {
                RuleResult::new(Status::Pass, "Not present (good)", NO_EVIDENCE)
            }
        }
        _ => RuleResult::manual("Invalid expect value"),
    }
}
