use serde::Deserialize;

use crate::banner::BannerKind;

/// Polarity of a rule's pattern: does a match indicate a secure or an
/// insecure configuration?
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    /// Pattern indicates a secure configuration; PASS when found.
    #[default]
    Present,
    /// Pattern indicates an insecure configuration; FAIL when found.
    Absent,
    /// Always yields MANUAL, with evidence captured for human inspection.
    Manual,
}

/// Risk rating carried through to the report unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    #[serde(alias = "Low")]
    Low,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Risk::Low => write!(f, "Low"),
            Risk::Medium => write!(f, "Medium"),
            Risk::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for Risk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Risk::Low),
            "medium" | "med" => Ok(Risk::Medium),
            "high" => Ok(Risk::High),
            _ => Err(format!("unknown risk level: {s}")),
        }
    }
}

/// One declarative benchmark rule. Read-only input to the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(default = "default_dash")]
    pub section: String,
    #[serde(default = "default_dash")]
    pub title: String,
    #[serde(default)]
    pub risk: Risk,
    #[serde(default = "default_dash")]
    pub recommendation: String,
    #[serde(flatten)]
    pub kind: RuleKind,
}

fn default_id() -> String {
    "N/A".to_string()
}

fn default_dash() -> String {
    "-".to_string()
}

/// The six rule kinds, dispatched by the JSON `type` tag. Closed set:
/// anything else deserializes to `Unsupported` and evaluates to MANUAL
/// rather than failing the whole ruleset.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// No matching performed; the check is inherently human.
    Manual,
    /// Whole-text search; evidence is up to 8 matching lines.
    Regex {
        #[serde(default)]
        pattern: String,
        #[serde(default)]
        expect: Expectation,
    },
    /// First match only; evidence is the matched substring.
    RegexCapture {
        #[serde(default)]
        pattern: String,
        #[serde(default)]
        expect: Expectation,
    },
    /// Every non-overlapping match, one evidence line each, capped at 200.
    RegexCaptureAll {
        #[serde(default)]
        pattern: String,
        #[serde(default)]
        expect: Expectation,
    },
    /// Existence of an extractable banner of the given subtype.
    Banner {
        #[serde(default)]
        banner_type: BannerKind,
        #[serde(default)]
        expect: Expectation,
    },
    /// Pattern searched within each block under the given header.
    BlockPresent {
        #[serde(default)]
        block: String,
        #[serde(default)]
        pattern: String,
        #[serde(default)]
        evidence_pattern: Option<String>,
        #[serde(default)]
        expect: Expectation,
    },
    /// As BlockPresent, but a match is a finding against the device.
    BlockAbsent {
        #[serde(default)]
        block: String,
        #[serde(default)]
        pattern: String,
        #[serde(default)]
        evidence_pattern: Option<String>,
        #[serde(default = "absent")]
        expect: Expectation,
    },
    #[serde(other)]
    Unsupported,
}

fn absent() -> Expectation {
    Expectation::Absent
}
