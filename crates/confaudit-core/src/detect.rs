use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Device class resolved from a configuration export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Router,
    SwitchL2,
    SwitchL3,
    Unknown,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Router => write!(f, "router"),
            DeviceType::SwitchL2 => write!(f, "switch_l2"),
            DeviceType::SwitchL3 => write!(f, "switch_l3"),
            DeviceType::Unknown => write!(f, "unknown"),
        }
    }
}

/// How strongly the signals support the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::High => write!(f, "High"),
        }
    }
}

/// Raw accumulator values behind a verdict. Uncapped.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DetectionScores {
    #[serde(rename = "router_score")]
    pub router: u32,
    #[serde(rename = "switch_score")]
    pub switch: u32,
    #[serde(rename = "l3_score")]
    pub l3: u32,
}

/// Classifier output: verdict plus the evidence that produced it.
///
/// `device_type` and `confidence` are pure functions of `scores`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub device_type: DeviceType,
    pub confidence: Confidence,
    pub indicators: Vec<String>,
    pub scores: DetectionScores,
}

const MAX_INDICATORS: usize = 15;

/// A line-anchored feature signal with its score contribution.
struct Signal {
    regex: Regex,
    weight: u32,
    reason: &'static str,
}

/// A signal that feeds both the switch and L3 accumulators.
struct L3Signal {
    regex: Regex,
    switch_weight: u32,
    l3_weight: u32,
    reason: &'static str,
}

/// Scores configuration text against weighted pattern tables and resolves
/// a device-type verdict.
///
/// All patterns are compiled once at construction; `classify` is pure.
pub struct DeviceClassifier {
    router_models: Vec<Regex>,
    switch_models: Vec<Regex>,
    switch_features: Vec<Signal>,
    router_features: Vec<Signal>,
    l3_signals: Vec<L3Signal>,
}

fn model_regex(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("static pattern")
}

fn feature_regex(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .case_insensitive(true)
        .build()
        .expect("static pattern")
}

impl DeviceClassifier {
    pub fn new() -> Self {
        let router_models = [
            r"\bisr\b",
            r"\basr\b",
            r"\bcisco\s*29\d{2}\b",
            r"\bcisco\s*19\d{2}\b",
            r"\bcisco\s*39\d{2}\b",
        ]
        .iter()
        .map(|p| model_regex(p))
        .collect();

        let switch_models = [
            r"\bws-c\d{4}\b",
            r"\bcatalyst\b",
            r"\bc\d{4}\b",
            r"\bnexus\b",
        ]
        .iter()
        .map(|p| model_regex(p))
        .collect();

        let switch_features = vec![
            signal(r"^\s*switchport\b", 6, "Switchport found"),
            signal(r"^\s*spanning-tree\b", 6, "Spanning-tree found"),
            signal(r"^\s*vlan\s+\d+\b", 4, "VLAN config found"),
            signal(r"^\s*channel-group\b", 3, "Port-channel config found"),
            signal(r"^\s*ip dhcp snooping\b", 5, "DHCP snooping found"),
        ];

        let router_features = vec![
            signal(r"^\s*ip nat\b", 6, "NAT found"),
            signal(r"^\s*crypto (isakmp|ikev2|ipsec)\b", 6, "VPN/Crypto found"),
            signal(
                r"^\s*interface\s+(Serial|Tunnel|Dialer|Cellular)\d+",
                6,
                "WAN interface found",
            ),
            signal(r"^\s*router\s+(bgp|eigrp|rip|isis)\b", 5, "Routing protocol found"),
        ];

        let l3_signals = vec![
            l3_signal(r"^\s*interface\s+Vlan\d+\b", 5, 8, "SVI found (interface VlanX)"),
            l3_signal(r"^\s*ip routing\b", 4, 8, "ip routing enabled"),
            l3_signal(r"^\s*ip route\b", 3, 6, "Static route found (ip route)"),
            l3_signal(r"^\s*no switchport\b", 3, 6, "Routed port found (no switchport)"),
        ];

        Self {
            router_models,
            switch_models,
            switch_features,
            router_features,
            l3_signals,
        }
    }

    /// Classify normalized configuration text.
    ///
    /// Total: always produces a result, defaulting to `Unknown`/`Low` when
    /// no signal fires.
    pub fn classify(&self, cfg: &str) -> DetectionResult {
        let mut scores = DetectionScores::default();
        let mut indicators = Vec::new();

        // Hardware model signatures count once per side, whichever model
        // matches first.
        if self.router_models.iter().any(|re| re.is_match(cfg)) {
            scores.router += 8;
            indicators.push("Router hardware model signature found".to_string());
        }
        if self.switch_models.iter().any(|re| re.is_match(cfg)) {
            scores.switch += 8;
            indicators.push("Switch hardware model signature found".to_string());
        }

        for sig in &self.switch_features {
            if sig.regex.is_match(cfg) {
                scores.switch += sig.weight;
                indicators.push(sig.reason.to_string());
            }
        }

        for sig in &self.router_features {
            if sig.regex.is_match(cfg) {
                scores.router += sig.weight;
                indicators.push(sig.reason.to_string());
            }
        }

        for sig in &self.l3_signals {
            if sig.regex.is_match(cfg) {
                scores.switch += sig.switch_weight;
                scores.l3 += sig.l3_weight;
                indicators.push(sig.reason.to_string());
            }
        }

        indicators.truncate(MAX_INDICATORS);

        let device_type = resolve_device_type(&scores);
        let confidence = resolve_confidence(device_type, &scores);

        tracing::debug!(
            router = scores.router,
            switch = scores.switch,
            l3 = scores.l3,
            %device_type,
            "classified configuration"
        );

        DetectionResult {
            device_type,
            confidence,
            indicators,
            scores,
        }
    }
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn signal(pattern: &str, weight: u32, reason: &'static str) -> Signal {
    Signal {
        regex: feature_regex(pattern),
        weight,
        reason,
    }
}

fn l3_signal(pattern: &str, switch_weight: u32, l3_weight: u32, reason: &'static str) -> L3Signal {
    L3Signal {
        regex: feature_regex(pattern),
        switch_weight,
        l3_weight,
        reason,
    }
}

/// Verdict priority: L3 switch, then router, then L2 switch. A side must
/// both clear an absolute floor and lead the other by 4 to win.
fn resolve_device_type(s: &DetectionScores) -> DeviceType {
    if s.l3 >= 12 && s.switch >= 10 {
        DeviceType::SwitchL3
    } else if s.router >= s.switch + 4 && s.router >= 10 {
        DeviceType::Router
    } else if s.switch >= s.router + 4 && s.switch >= 10 {
        DeviceType::SwitchL2
    } else {
        DeviceType::Unknown
    }
}

fn resolve_confidence(device_type: DeviceType, s: &DetectionScores) -> Confidence {
    if device_type == DeviceType::Unknown {
        return Confidence::Low;
    }
    let top = s.router.max(s.switch).max(s.l3);
    if top >= 22 {
        Confidence::High
    } else if top >= 14 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(cfg: &str) -> DetectionResult {
        DeviceClassifier::new().classify(cfg)
    }

    #[test]
    fn test_empty_input_is_unknown_low() {
        let result = classify("");
        assert_eq!(result.device_type, DeviceType::Unknown);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.indicators.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let cfg = "hostname R1\nip nat inside\nrouter bgp 65000\n";
        let a = classify(cfg);
        let b = classify(cfg);
        assert_eq!(a.device_type, b.device_type);
        assert_eq!(a.scores.router, b.scores.router);
        assert_eq!(a.indicators, b.indicators);
    }

    #[test]
    fn test_router_scenario() {
        let cfg = "hostname R1\n\
                   ip nat inside\n\
                   crypto isakmp policy 10\n\
                   router bgp 65000\n";
        let result = classify(cfg);
        assert!(result.scores.router >= 10);
        assert!(result.scores.router >= result.scores.switch + 4);
        assert_eq!(result.device_type, DeviceType::Router);
    }

    #[test]
    fn test_l3_switch_scenario() {
        let cfg = "interface Vlan10\n\
                   ip routing\n\
                   switchport mode access\n\
                   spanning-tree mode rapid-pvst\n";
        let result = classify(cfg);
        assert!(result.scores.l3 >= 12);
        assert!(result.scores.switch >= 10);
        assert_eq!(result.device_type, DeviceType::SwitchL3);
    }

    #[test]
    fn test_l2_switch_scenario() {
        let cfg = "switchport mode access\n\
                   spanning-tree portfast\n\
                   vlan 20\n";
        let result = classify(cfg);
        assert_eq!(result.device_type, DeviceType::SwitchL2);
    }

    #[test]
    fn test_model_signature_counted_once() {
        // Two router model strings still add only a single 8.
        let cfg = "Cisco 2911 ISR\ncisco 2951\n";
        let result = classify(cfg);
        assert_eq!(result.scores.router, 8);
    }

    #[test]
    fn test_indicator_cap() {
        // Fire every signal in the tables: 2 model + 5 switch + 4 router + 4 L3 = 15,
        // so the cap holds even with all signals present.
        let cfg = "cisco 2911 isr\n\
                   catalyst ws-c2960\n\
                   switchport mode access\n\
                   spanning-tree portfast\n\
                   vlan 10\n\
                   channel-group 1 mode active\n\
                   ip dhcp snooping\n\
                   ip nat inside\n\
                   crypto isakmp policy 10\n\
                   interface Serial0/0/0\n\
                   router bgp 65000\n\
                   interface Vlan10\n\
                   ip routing\n\
                   ip route 0.0.0.0 0.0.0.0 10.0.0.1\n\
                   no switchport\n";
        let result = classify(cfg);
        assert!(result.indicators.len() <= 15);
        assert_eq!(result.indicators.len(), 15);
    }

    #[test]
    fn test_indicator_order_is_discovery_order() {
        let cfg = "switchport mode access\nip nat inside\n";
        let result = classify(cfg);
        assert_eq!(result.indicators, vec!["Switchport found", "NAT found"]);
    }

    #[test]
    fn test_confidence_band_boundaries() {
        // router=22 -> High
        let s = DetectionScores { router: 22, switch: 0, l3: 0 };
        assert_eq!(resolve_confidence(DeviceType::Router, &s), Confidence::High);
        // router=21 -> Medium
        let s = DetectionScores { router: 21, switch: 0, l3: 0 };
        assert_eq!(resolve_confidence(DeviceType::Router, &s), Confidence::Medium);
        // router=13 -> Low
        let s = DetectionScores { router: 13, switch: 0, l3: 0 };
        assert_eq!(resolve_confidence(DeviceType::Router, &s), Confidence::Low);
        // unknown is always Low regardless of scores
        let s = DetectionScores { router: 50, switch: 50, l3: 50 };
        assert_eq!(resolve_confidence(DeviceType::Unknown, &s), Confidence::Low);
    }

    #[test]
    fn test_verdict_requires_margin_and_floor() {
        // switch=10, router=8: margin of 2 is below 4 -> unknown
        let s = DetectionScores { router: 8, switch: 10, l3: 0 };
        assert_eq!(resolve_device_type(&s), DeviceType::Unknown);
        // switch=9, router=0: floor of 10 not met -> unknown
        let s = DetectionScores { router: 0, switch: 9, l3: 0 };
        assert_eq!(resolve_device_type(&s), DeviceType::Unknown);
        // l3 verdict takes priority over a strong router score
        let s = DetectionScores { router: 30, switch: 10, l3: 12 };
        assert_eq!(resolve_device_type(&s), DeviceType::SwitchL3);
    }

    #[test]
    fn test_indented_feature_lines_match() {
        let cfg = "interface GigabitEthernet0/1\n switchport mode access\n";
        let result = classify(cfg);
        assert!(result.indicators.contains(&"Switchport found".to_string()));
    }
}
