//! Error types for the `wirelab-catalog` crate.
//!
//! All fallible operations in this crate return [`CatalogError`] through the
//! standard [`Result`] type alias.

use wirelab_types::{ComponentId, SignalId, StageId};

/// Errors that can occur while loading or validating a project catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read a project file from disk.
    #[error("failed to read project file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse project YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A project declared no stages.
    #[error("project {title:?} has no stages")]
    EmptyProject {
        /// The offending project's title.
        title: String,
    },

    /// Two stages share an id.
    #[error("duplicate stage id: {0}")]
    DuplicateStage(StageId),

    /// Two catalog signals share an id or short code.
    #[error("duplicate signal code: {code:?}")]
    DuplicateSignal {
        /// The colliding short code.
        code: String,
    },

    /// Two initial components share an id.
    #[error("duplicate initial component id: {0}")]
    DuplicateComponent(ComponentId),

    /// A rule, wiring rule, or initial state references a signal that is
    /// not in the project's catalog.
    #[error("reference to unknown signal {signal} in {context}")]
    UnknownSignalReference {
        /// The dangling signal id.
        signal: SignalId,
        /// Where the reference appears (stage rule, wiring rule, initial
        /// state).
        context: String,
    },

    /// A project file names a signal code with no catalog entry.
    #[error("reference to unknown signal code {code:?} in {context}")]
    UnknownSignalCode {
        /// The dangling short code.
        code: String,
        /// Where the reference appears.
        context: String,
    },

    /// A hint declares an attempts threshold of zero.
    #[error("hint in stage {stage} has an after-attempts threshold of 0")]
    ZeroAttemptThreshold {
        /// The stage whose hint is malformed.
        stage: StageId,
    },

    /// The proximity threshold is not strictly positive.
    #[error("proximity threshold {threshold} must be strictly positive")]
    InvalidThreshold {
        /// The declared threshold.
        threshold: rust_decimal::Decimal,
    },

    /// Two initial components sit closer than the proximity threshold.
    #[error("initial components {first} and {second} violate the proximity threshold")]
    InitialPlacementOverlap {
        /// The first component.
        first: ComponentId,
        /// The overlapping component.
        second: ComponentId,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in catalog validation")]
    ArithmeticOverflow,
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
