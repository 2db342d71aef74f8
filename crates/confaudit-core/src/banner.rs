use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// Banner subtype as declared in `banner <type> <delimiter>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    #[default]
    Login,
    Motd,
    Exec,
}

impl BannerKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            BannerKind::Login => "login",
            BannerKind::Motd => "motd",
            BannerKind::Exec => "exec",
        }
    }
}

impl std::fmt::Display for BannerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A banner located in configuration text. An empty `body` is a valid,
/// found banner — distinct from no banner at all (`extract_banner` -> None).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    /// Delimiter token declared on the banner line.
    pub delimiter: String,
    /// Delimiter line that actually terminated the banner.
    pub terminator: String,
    pub body: String,
}

impl Banner {
    /// Reconstruct the banner as it appears in the configuration.
    pub fn render(&self) -> String {
        format!(
            "banner {} {}\n{}\n{}",
            self.kind, self.delimiter, self.body, self.terminator
        )
    }
}

/// Extract a delimiter-bounded banner body.
///
/// The declared delimiter is an arbitrary token chosen by the config author.
/// IOS exports frequently declare a multi-character caret token (e.g. `^CCC`)
/// but terminate with plain `^C`, so that is tried as a fallback, in declared
/// order: the token itself, `^C` when the token is caret-prefixed and longer
/// than two characters, and `^C` unconditionally last. Candidates are
/// deduplicated preserving first-seen order.
pub fn extract_banner(cfg: &str, kind: BannerKind) -> Option<Banner> {
    let decl = RegexBuilder::new(&format!(r"^\s*banner\s+{}\s+(\S+)\s*$", kind.keyword()))
        .multi_line(true)
        .case_insensitive(true)
        .build()
        .expect("static pattern");

    let m = decl.captures(cfg)?;
    let delimiter = m[1].trim().to_string();
    let after = &cfg[m.get(0).map(|g| g.end())?..];

    let mut candidates = vec![delimiter.clone()];
    if delimiter.starts_with('^') && delimiter.len() > 2 {
        candidates.push("^C".to_string());
    }
    candidates.push("^C".to_string());

    let mut seen = Vec::new();
    candidates.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(c.clone());
            true
        }
    });

    for candidate in &candidates {
        let end = RegexBuilder::new(&format!(r"^\s*{}\s*$", regex::escape(candidate)))
            .multi_line(true)
            .case_insensitive(true)
            .build()
            .expect("escaped pattern");

        if let Some(end_match) = end.find(after) {
            let body = after[..end_match.start()]
                .trim_matches('\n')
                .to_string();
            return Some(Banner {
                kind,
                delimiter,
                terminator: candidate.clone(),
                body,
            });
        }
    }

    None
}
