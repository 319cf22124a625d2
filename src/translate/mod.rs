// Translation routing and execution
//
// - Resolver: picks a direct model pair, or composes two pairs through the pivot language
// - Executor: runs one or two inference calls over the resolved path

pub mod resolver;
pub mod executor;

pub use resolver::ModelResolver;
pub use executor::{TranslationExecutor, TranslationResult, run_inference};

use crate::models::ModelPair;

/// Which resolution attempt produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    Direct,
    Pivot,
}

/// Why one resolution attempt did not yield a usable path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub attempt: AttemptKind,
    pub reason: String,
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let attempt = match self.attempt {
            AttemptKind::Direct => "direct",
            AttemptKind::Pivot => "pivot",
        };
        write!(f, "{}: {}", attempt, self.reason)
    }
}

/// Resolved way of translating one language pair
#[derive(Debug, Clone)]
pub enum ModelPath {
    /// One model trained for source→target
    Direct {
        source: String,
        target: String,
        pair: ModelPair,
    },
    /// source→pivot followed by pivot→target
    Pivot {
        source: String,
        pivot: String,
        target: String,
        source_to_pivot: ModelPair,
        pivot_to_target: ModelPair,
    },
    /// No usable path; `failures` records each failed attempt
    Unavailable {
        source: String,
        target: String,
        failures: Vec<AttemptFailure>,
    },
}

impl ModelPath {
    pub fn source(&self) -> &str {
        match self {
            ModelPath::Direct { source, .. }
            | ModelPath::Pivot { source, .. }
            | ModelPath::Unavailable { source, .. } => source,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            ModelPath::Direct { target, .. }
            | ModelPath::Pivot { target, .. }
            | ModelPath::Unavailable { target, .. } => target,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, ModelPath::Unavailable { .. })
    }

    pub fn is_pivot(&self) -> bool {
        matches!(self, ModelPath::Pivot { .. })
    }

    /// Names of the models the path runs, in order
    pub fn model_names(&self) -> Vec<&str> {
        match self {
            ModelPath::Direct { pair, .. } => vec![pair.name.as_str()],
            ModelPath::Pivot { source_to_pivot, pivot_to_target, .. } => {
                vec![source_to_pivot.name.as_str(), pivot_to_target.name.as_str()]
            }
            ModelPath::Unavailable { .. } => Vec::new(),
        }
    }
}

/// Human-readable hop, e.g. "Japanese → English"
pub fn hop(from_label: &str, to_label: &str) -> String {
    format!("{} → {}", from_label, to_label)
}
