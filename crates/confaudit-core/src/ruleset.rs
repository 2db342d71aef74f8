use std::path::Path;

use crate::detect::DeviceType;
use crate::error::AuditError;
use crate::rule::Rule;

/// The three shipped benchmark rulesets, selected by classifier verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RulesetKind {
    Router,
    SwitchL2,
    SwitchL3,
}

impl RulesetKind {
    /// Ruleset used for a classified device. An `Unknown` verdict falls back
    /// to the L2 switch benchmark, the most conservative of the three.
    pub fn for_device(device: DeviceType) -> Self {
        match device {
            DeviceType::Router => RulesetKind::Router,
            DeviceType::SwitchL3 => RulesetKind::SwitchL3,
            DeviceType::SwitchL2 | DeviceType::Unknown => RulesetKind::SwitchL2,
        }
    }

    /// Stable identifier, also the stem of the shipped ruleset files.
    pub fn name(&self) -> &'static str {
        match self {
            RulesetKind::Router => "cisco_router",
            RulesetKind::SwitchL2 => "switch_l2",
            RulesetKind::SwitchL3 => "switch_l3",
        }
    }
}

impl std::fmt::Display for RulesetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Deserialize a JSON array of rules. Unknown rule types survive as
/// `Unsupported` entries; only structurally invalid JSON is an error.
pub fn load_rules_str(json: &str) -> Result<Vec<Rule>, AuditError> {
    let rules: Vec<Rule> = serde_json::from_str(json)?;
    tracing::debug!(rules = rules.len(), "loaded ruleset");
    Ok(rules)
}

/// Load a ruleset from a JSON file.
pub fn load_rules(path: &Path) -> Result<Vec<Rule>, AuditError> {
    let json = std::fs::read_to_string(path).map_err(|source| AuditError::ReadRuleset {
        path: path.to_path_buf(),
        source,
    })?;
    load_rules_str(&json)
}
