use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading rule sets.
///
/// Evaluation itself never fails: misconfigured rules degrade to MANUAL
/// findings so a single bad rule cannot abort an audit.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to read ruleset {path:?}")]
    ReadRuleset {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed ruleset JSON: {0}")]
    ParseRuleset(#[from] serde_json::Error),
}
