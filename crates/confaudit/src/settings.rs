use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use confaudit_core::rule::Risk;
use confaudit_core::ruleset::RulesetKind;

/// Tool configuration from `.confaudit.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub rulesets: RulesetPaths,
    #[serde(default)]
    pub check: CheckSettings,
}

/// Optional per-device-type ruleset overrides. Unset entries fall back to
/// the benchmarks embedded in the binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesetPaths {
    #[serde(default)]
    pub router: Option<PathBuf>,
    #[serde(default)]
    pub switch_l2: Option<PathBuf>,
    #[serde(default)]
    pub switch_l3: Option<PathBuf>,
}

impl RulesetPaths {
    pub fn for_kind(&self, kind: RulesetKind) -> Option<&Path> {
        match kind {
            RulesetKind::Router => self.router.as_deref(),
            RulesetKind::SwitchL2 => self.switch_l2.as_deref(),
            RulesetKind::SwitchL3 => self.switch_l3.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSettings {
    #[serde(default = "default_fail_risk")]
    pub fail_risk: Risk,
}

fn default_fail_risk() -> Risk {
    Risk::Low
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            fail_risk: default_fail_risk(),
        }
    }
}

impl Settings {
    /// Load settings from a `.confaudit.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let settings: Settings = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `confaudit init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(settings)
    }

    /// Load from `.confaudit.toml` in the given directory or any ancestor,
    /// or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(".confaudit.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(settings) => settings,
                    Err(e) => {
                        tracing::warn!(
                            "failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `confaudit init`.
    pub fn default_toml() -> String {
        r#"# confaudit configuration
# See https://github.com/confaudit/confaudit for documentation

[rulesets]
# Override the embedded benchmarks with your own JSON rulesets.
# router = "rulesets/cisco_router.json"
# switch_l2 = "rulesets/switch_l2.json"
# switch_l3 = "rulesets/switch_l3.json"

[check]
# Minimum risk level at which a FAIL finding fails `confaudit check`:
# "low", "medium" or "high"
fail_risk = "low"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.rulesets.router.is_none());
        assert_eq!(settings.check.fail_risk, Risk::Low);
    }

    #[test]
    fn test_deserialize_settings() {
        let toml_str = r#"
[rulesets]
router = "custom/router.json"

[check]
fail_risk = "high"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(
            settings.rulesets.router.as_deref(),
            Some(Path::new("custom/router.json"))
        );
        assert!(settings.rulesets.switch_l2.is_none());
        assert_eq!(settings.check.fail_risk, Risk::High);
    }

    #[test]
    fn test_default_toml_is_valid() {
        let settings: Settings = toml::from_str(&Settings::default_toml()).unwrap();
        assert_eq!(settings.check.fail_risk, Risk::Low);
    }

    #[test]
    fn test_ruleset_path_lookup() {
        let paths = RulesetPaths {
            switch_l3: Some(PathBuf::from("l3.json")),
            ..Default::default()
        };
        assert!(paths.for_kind(RulesetKind::Router).is_none());
        assert_eq!(
            paths.for_kind(RulesetKind::SwitchL3),
            Some(Path::new("l3.json"))
        );
    }
}
