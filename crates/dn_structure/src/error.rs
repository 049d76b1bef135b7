use thiserror::Error;

/// Errors raised while reading notation or building a BondGraph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A line of domain-level notation could not be lexed.
    #[error("cannot parse strand '{line}': {reason}")]
    Parse {
        /// The offending line (trimmed).
        line: String,
        /// What went wrong.
        reason: String,
    },

    /// A bond label occurs only once in its block.
    #[error("bond label '!{0}' has no partner domain")]
    UnpairedBond(String),

    /// A bond label occurs more than twice in its block.
    #[error("bond label '!{0}' is used by more than two domains")]
    OverboundLabel(String),
}

impl StructureError {
    pub fn parse(line: &str, reason: impl Into<String>) -> Self {
        StructureError::Parse {
            line: line.trim_end().to_string(),
            reason: reason.into(),
        }
    }
}
