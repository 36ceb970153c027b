//! Append-only event records for telemetry and debugging.
//!
//! Every state change the engine commits produces one [`Event`] stamped
//! with a monotone ordinal. The log is ordered and append-only; consumers
//! receive it read-only and must not rely on anything but the ordinal for
//! ordering (events carry no wall-clock timestamps -- the engine is pure
//! with respect to real time).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ComponentKind;
use crate::ids::{ComponentId, HintId, PathId, ProjectId, SignalId, StageId};
use crate::structs::Position;

/// What happened in one committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// A project was opened and fresh state created.
    ProjectOpened {
        /// The opened project.
        project: ProjectId,
    },
    /// A component was placed on the build surface.
    ComponentPlaced {
        /// The new component.
        component: ComponentId,
        /// Its kind.
        kind: ComponentKind,
        /// Where it was placed.
        position: Position,
    },
    /// A control signal changed level.
    SignalToggled {
        /// The toggled signal.
        signal: SignalId,
        /// Its level after the toggle.
        active: bool,
    },
    /// Bus ownership changed hands (or was cleared).
    BusOwnerChanged {
        /// The new owner, if any.
        owner: Option<ComponentId>,
    },
    /// One clock cycle committed.
    ClockCycle {
        /// The cycle counter after the commit.
        cycle: u64,
        /// Paths that transferred during this cycle; empty for a no-op
        /// cycle.
        transfers: Vec<PathId>,
    },
    /// The simulation was reset to the project's initial state.
    SimulationReset,
    /// A validation attempt ran against a stage.
    ValidationAttempted {
        /// The validated stage.
        stage: StageId,
        /// The attempt number this run counted as.
        attempt: u32,
        /// Aggregate outcome.
        passed: bool,
    },
    /// A stage was completed.
    StageCompleted {
        /// The completed stage.
        stage: StageId,
    },
    /// A hint was revealed to the player.
    HintRevealed {
        /// The stage the hint belongs to.
        stage: StageId,
        /// The revealed hint.
        hint: HintId,
    },
    /// Every stage of the project is complete.
    ProjectCompleted {
        /// The finished project.
        project: ProjectId,
    },
}

/// One entry in the append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Position in the log, starting at 0 and increasing by 1 per event.
    pub ordinal: u64,
    /// What happened.
    pub kind: EventKind,
}
