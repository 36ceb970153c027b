//! Error types for the `wirelab-engine` crate.
//!
//! Every error here is locally recoverable and surfaced to the caller as a
//! typed failure -- never a silent no-op, never a panic. Validation
//! failures are *not* errors: a stage that does not yet pass is a normal
//! outcome carried in [`ValidationOutcome`].
//!
//! [`ValidationOutcome`]: wirelab_types::ValidationOutcome

use wirelab_types::{ComponentId, HintId, Position, ProjectId, SignalId, StageId};

/// Errors that can occur while executing engine commands.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The same project is already open; re-opening must not silently
    /// reset in-progress work.
    #[error("project {project} is already open")]
    AlreadyOpen {
        /// The project that is open.
        project: ProjectId,
    },

    /// A command was issued with no project open.
    #[error("no project is open")]
    NoProjectOpen,

    /// A placement fell within the proximity threshold of an existing
    /// component.
    #[error("placement at ({x}, {y}) overlaps component {conflict}", x = .position.x, y = .position.y)]
    InvalidPlacement {
        /// The rejected position.
        position: Position,
        /// The existing component it would crowd.
        conflict: ComponentId,
    },

    /// The signal id is not in the open project's catalog.
    #[error("unknown signal: {signal}")]
    UnknownSignal {
        /// The unresolved signal id.
        signal: SignalId,
    },

    /// The component id is not placed in the simulation.
    #[error("unknown component: {component}")]
    UnknownComponent {
        /// The unresolved component id.
        component: ComponentId,
    },

    /// The stage id is not in the open project.
    #[error("unknown stage: {stage}")]
    UnknownStage {
        /// The unresolved stage id.
        stage: StageId,
    },

    /// The progress record's stage index does not resolve to a catalog
    /// stage.
    #[error("stage index {index} is out of range")]
    StageIndexOutOfRange {
        /// The unresolved index.
        index: usize,
    },

    /// The hint id is not attached to the named stage.
    #[error("unknown hint: {hint}")]
    UnknownHint {
        /// The unresolved hint id.
        hint: HintId,
    },

    /// The hint's reveal condition does not yet hold.
    #[error("hint {hint} is not yet available")]
    HintNotYetAvailable {
        /// The gated hint.
        hint: HintId,
    },

    /// `complete_stage` was called without a recorded passing validation.
    #[error("current stage has no passing validation on record")]
    StageNotValidated,

    /// `complete_stage` was called on a stage that is already completed.
    #[error("stage {stage} is already completed")]
    StageAlreadyCompleted {
        /// The completed stage.
        stage: StageId,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in engine calculation")]
    ArithmeticOverflow,
}
