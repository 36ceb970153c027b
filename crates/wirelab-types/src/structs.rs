//! Core entity structs for the Wirelab simulation engine.
//!
//! Catalog records (`Project`, `Stage`, `ValidationRule`, `Hint`,
//! `ControlSignal`, `WiringRule`) are immutable after load. Runtime records
//! (`Component`, `DataPath`) are owned and mutated exclusively by the
//! engine's simulation store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BusRequirement, ComponentKind, RevealCondition, RuleCheck, Task};
use crate::ids::{
    ComponentId, HintId, PathId, ProjectId, RuleId, SignalId, StageId, WireId,
};

// ---------------------------------------------------------------------------
// Placement geometry
// ---------------------------------------------------------------------------

/// A 2-D placement coordinate on the build surface.
///
/// Coordinates are exact decimals so that proximity comparisons are
/// reproducible across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate.
    #[ts(as = "String")]
    pub x: Decimal,
    /// Vertical coordinate.
    #[ts(as = "String")]
    pub y: Decimal,
}

impl Position {
    /// Create a position from exact decimal coordinates.
    pub const fn new(x: Decimal, y: Decimal) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another position.
    ///
    /// Returns `None` on [`Decimal`] arithmetic overflow. Proximity checks
    /// compare squared distances against a squared threshold so no square
    /// root is needed.
    #[must_use]
    pub fn squared_distance_to(&self, other: &Self) -> Option<Decimal> {
        let dx = self.x.checked_sub(other.x)?;
        let dy = self.y.checked_sub(other.y)?;
        let dx2 = dx.checked_mul(dx)?;
        let dy2 = dy.checked_mul(dy)?;
        dx2.checked_add(dy2)
    }
}

/// The default minimum center-to-center distance between two placed
/// components, in build-surface units.
pub fn default_proximity_threshold() -> Decimal {
    Decimal::new(15, 1) // 1.5
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Kind-specific mutable state carried by a placed component.
///
/// A payload *drives* a transfer when it exposes a stored value
/// ([`Self::driven_value`]) and *receives* one when [`Self::store`]
/// accepts a value. Wiring-only kinds (bus, control unit, decoder) carry
/// no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ComponentPayload {
    /// One stored word.
    Register {
        /// Current register contents.
        value: u32,
    },
    /// One addressable memory cell.
    Memory {
        /// Current cell contents.
        value: u32,
    },
    /// The ALU's accumulator.
    Alu {
        /// Current accumulator contents.
        accumulator: u32,
    },
    /// A multiplexer's selection state.
    Mux {
        /// Index of the selected input.
        selected: u8,
    },
    /// The shared bus carries no state of its own.
    Bus,
    /// The control unit carries no data payload.
    ControlUnit,
    /// Decoders are combinational; no state.
    Decoder,
}

impl ComponentPayload {
    /// The initial payload for a freshly placed component of `kind`.
    #[must_use]
    pub const fn initial_for(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Register => Self::Register { value: 0 },
            ComponentKind::Memory => Self::Memory { value: 0 },
            ComponentKind::Alu => Self::Alu { accumulator: 0 },
            ComponentKind::Mux => Self::Mux { selected: 0 },
            ComponentKind::Bus => Self::Bus,
            ComponentKind::ControlUnit => Self::ControlUnit,
            ComponentKind::Decoder => Self::Decoder,
        }
    }

    /// The value this payload drives onto a data path, if it holds one.
    #[must_use]
    pub const fn driven_value(&self) -> Option<u32> {
        match *self {
            Self::Register { value } | Self::Memory { value } => Some(value),
            Self::Alu { accumulator } => Some(accumulator),
            Self::Mux { .. } | Self::Bus | Self::ControlUnit | Self::Decoder => None,
        }
    }

    /// Store a transferred value into this payload.
    ///
    /// Returns `true` if the payload accepted the value, `false` for
    /// stateless kinds (the transfer is then a signal-only activation).
    pub const fn store(&mut self, incoming: u32) -> bool {
        match self {
            Self::Register { value } | Self::Memory { value } => {
                *value = incoming;
                true
            }
            Self::Alu { accumulator } => {
                *accumulator = incoming;
                true
            }
            Self::Mux { .. } | Self::Bus | Self::ControlUnit | Self::Decoder => false,
        }
    }
}

/// A placed hardware component instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Component {
    /// Unique id of this instance.
    pub id: ComponentId,
    /// The kind placed.
    pub kind: ComponentKind,
    /// Where on the build surface it sits.
    pub position: Position,
    /// Kind-specific mutable state.
    pub payload: ComponentPayload,
}

impl Component {
    /// Create a component of `kind` at `position` with its initial payload.
    pub fn place(kind: ComponentKind, position: Position) -> Self {
        Self {
            id: ComponentId::new(),
            kind,
            position,
            payload: ComponentPayload::initial_for(kind),
        }
    }
}

// ---------------------------------------------------------------------------
// Data paths & wiring
// ---------------------------------------------------------------------------

/// An instantiated data path between two placed components.
///
/// Paths are created by the engine when placement produces a (source, dest)
/// pair matching a [`WiringRule`]. The `active` flag reflects the most
/// recent clock cycle: cleared when a commit begins, set for paths that
/// transferred during that commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DataPath {
    /// Unique id of this path instance.
    pub id: PathId,
    /// The wiring rule this path was instantiated from.
    pub wire: WireId,
    /// Source component.
    pub source: ComponentId,
    /// Destination component.
    pub dest: ComponentId,
    /// Whether this path committed a transfer on the most recent cycle.
    pub active: bool,
}

/// A project-level wiring rule: which signal/bus combination turns a
/// (source kind, dest kind) pair into a committed transfer at clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WiringRule {
    /// Unique id of the rule.
    pub id: WireId,
    /// Kind of the driving component.
    pub source_kind: ComponentKind,
    /// Kind of the receiving component.
    pub dest_kind: ComponentKind,
    /// Control signals that must all be active for the path to commit.
    pub required_signals: Vec<SignalId>,
    /// Whether the source must own the bus at commit time.
    pub bus: BusRequirement,
}

// ---------------------------------------------------------------------------
// Control signals
// ---------------------------------------------------------------------------

/// A control signal declared in a project's catalog.
///
/// The catalog entry is immutable; the live active flag is tracked by the
/// simulation state, keyed by [`SignalId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ControlSignal {
    /// Unique id of the signal.
    pub id: SignalId,
    /// Full display name (e.g. "Memory Read Enable").
    pub name: String,
    /// Short mnemonic code (e.g. "mem-read").
    pub code: String,
    /// Grouping tag used only for UI panel layout.
    pub group: String,
}

/// A target level for one control signal, used by [`Task::SetSignals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SignalSetting {
    /// The signal to drive.
    pub signal: SignalId,
    /// The level to drive it to.
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// A named predicate that checks one required condition on the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ValidationRule {
    /// Unique id of the rule.
    pub id: RuleId,
    /// Human-readable failure message shown when the check fails.
    pub message: String,
    /// The predicate itself.
    pub check: RuleCheck,
}

/// A hint attached to a stage, gated by its reveal condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Hint {
    /// Unique id of the hint.
    pub id: HintId,
    /// The hint text shown once revealed.
    pub text: String,
    /// When the hint becomes revealable.
    pub reveal: RevealCondition,
}

/// One step of a multi-step build exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Stage {
    /// Unique id of the stage.
    pub id: StageId,
    /// Short title shown in the stage tracker.
    pub title: String,
    /// Instructional text shown to the player.
    pub instructions: String,
    /// The expected interaction shape (UI affordance only).
    pub task: Task,
    /// Validation rules, evaluated independently and all reported.
    pub rules: Vec<ValidationRule>,
    /// Hints, in disclosure order.
    pub hints: Vec<Hint>,
    /// Component kinds placeable while this stage is current.
    pub placeable: Vec<ComponentKind>,
    /// Optional estimated duration in minutes, for UI display.
    pub estimated_minutes: Option<u32>,
}

// ---------------------------------------------------------------------------
// Projects & initial state
// ---------------------------------------------------------------------------

/// A component declared in a project's initial state.
///
/// Initial components carry pre-assigned ids so that a simulation reset
/// restores the exact same identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InitialComponent {
    /// Stable id assigned at catalog load.
    pub id: ComponentId,
    /// The kind pre-placed.
    pub kind: ComponentKind,
    /// Where it sits.
    pub position: Position,
    /// Its starting payload.
    pub payload: ComponentPayload,
}

/// The declared starting state of a project's simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InitialState {
    /// Components present before the player places anything.
    pub components: Vec<InitialComponent>,
    /// Signals that start active; all others start inactive.
    pub active_signals: Vec<SignalId>,
}

/// A complete build exercise: ordered stages over a shared signal catalog
/// and wiring configuration. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Project {
    /// Unique id of the project.
    pub id: ProjectId,
    /// Display title.
    pub title: String,
    /// Ordered stages; stage 0 is always accessible.
    pub stages: Vec<Stage>,
    /// The control signals available across the whole project.
    pub signals: Vec<ControlSignal>,
    /// Wiring rules that govern which transfers commit at clock time.
    pub wiring: Vec<WiringRule>,
    /// The simulation state a fresh open (or reset) starts from.
    pub initial_state: InitialState,
    /// Minimum center-to-center distance between placed components.
    #[ts(as = "String")]
    pub proximity_threshold: Decimal,
}

impl Project {
    /// Look up a catalog signal by id.
    #[must_use]
    pub fn signal(&self, id: SignalId) -> Option<&ControlSignal> {
        self.signals.iter().find(|s| s.id == id)
    }

    /// Look up a wiring rule by id.
    #[must_use]
    pub fn wire(&self, id: WireId) -> Option<&WiringRule> {
        self.wiring.iter().find(|w| w.id == id)
    }

    /// Look up a stage and its index by id.
    #[must_use]
    pub fn stage(&self, id: StageId) -> Option<(usize, &Stage)> {
        self.stages.iter().enumerate().find(|(_, s)| s.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn initial_payload_matches_kind() {
        assert_eq!(
            ComponentPayload::initial_for(ComponentKind::Register),
            ComponentPayload::Register { value: 0 }
        );
        assert_eq!(
            ComponentPayload::initial_for(ComponentKind::Bus),
            ComponentPayload::Bus
        );
    }

    #[test]
    fn stateful_payloads_drive_and_store() {
        let mut register = ComponentPayload::Register { value: 7 };
        assert_eq!(register.driven_value(), Some(7));
        assert!(register.store(42));
        assert_eq!(register.driven_value(), Some(42));
    }

    #[test]
    fn stateless_payloads_neither_drive_nor_store() {
        let mut bus = ComponentPayload::Bus;
        assert_eq!(bus.driven_value(), None);
        assert!(!bus.store(9));
        assert_eq!(bus, ComponentPayload::Bus);
    }

    #[test]
    fn placed_component_starts_with_initial_payload() {
        let component = Component::place(
            ComponentKind::Alu,
            Position::new(dec!(1.0), dec!(2.5)),
        );
        assert_eq!(component.kind, ComponentKind::Alu);
        assert_eq!(component.payload, ComponentPayload::Alu { accumulator: 0 });
    }

    #[test]
    fn default_threshold_is_one_and_a_half_units() {
        assert_eq!(default_proximity_threshold(), dec!(1.5));
    }
}
