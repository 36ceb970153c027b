//! Enumeration types for the Wirelab simulation engine.
//!
//! Component kinds, stage lifecycle status, hint reveal conditions, task
//! shapes, bus requirements, and the tagged validation predicates. Reveal
//! conditions and rule checks are deliberately data (tagged variants
//! dispatched through one evaluation function each) rather than closures,
//! so catalogs stay serializable and rules are testable in isolation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SignalId;
use crate::structs::SignalSetting;

// ---------------------------------------------------------------------------
// Component kinds
// ---------------------------------------------------------------------------

/// The closed set of hardware component kinds a player can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ComponentKind {
    /// A general-purpose register holding one word.
    Register,
    /// The arithmetic-logic unit with an accumulator.
    Alu,
    /// A memory cell addressable by the datapath.
    Memory,
    /// The shared communication bus.
    Bus,
    /// The control unit driving signal sequencing.
    ControlUnit,
    /// A multiplexer selecting one of several inputs.
    Mux,
    /// A decoder expanding an encoded input.
    Decoder,
}

impl ComponentKind {
    /// All placeable kinds, in catalog display order.
    pub const ALL: [Self; 7] = [
        Self::Register,
        Self::Alu,
        Self::Memory,
        Self::Bus,
        Self::ControlUnit,
        Self::Mux,
        Self::Decoder,
    ];
}

// ---------------------------------------------------------------------------
// Stage lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle status of a single stage.
///
/// Transitions are strictly forward: `Locked -> Current` when the preceding
/// stage completes, `Current -> Completed` via stage completion. A completed
/// stage never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum StageStatus {
    /// Not yet reachable; an earlier stage is unfinished.
    Locked,
    /// The stage the player is working on.
    Current,
    /// Validated and completed.
    Completed,
}

// ---------------------------------------------------------------------------
// Bus requirement for wiring rules
// ---------------------------------------------------------------------------

/// Whether a wiring rule's transfer is mediated by the shared bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BusRequirement {
    /// The path is a dedicated connection; bus ownership is irrelevant.
    NotRequired,
    /// The path's source component must be the declared bus owner at the
    /// instant the clock commits.
    SourceOwnsBus,
}

// ---------------------------------------------------------------------------
// Hint reveal conditions
// ---------------------------------------------------------------------------

/// Policy governing when a hint becomes available to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RevealCondition {
    /// Always offered; the player may request it at any time.
    OnRequest,
    /// Offered once the most recent validation of the stage failed.
    OnError,
    /// Offered once the stage's attempt counter reaches the threshold.
    AfterAttempts {
        /// Minimum number of validation attempts before the hint unlocks.
        attempts: u32,
    },
}

// ---------------------------------------------------------------------------
// Task descriptors
// ---------------------------------------------------------------------------

/// The expected interaction shape for a stage.
///
/// Tasks drive UI affordances (which palette to open, which panel to
/// highlight) and never gate validation -- the stage's rules alone decide
/// pass/fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Task {
    /// Place one component of the given kind.
    PlaceComponent {
        /// The kind to place.
        kind: ComponentKind,
    },
    /// Drive one or more control signals to target values.
    SetSignals {
        /// The signal/value pairs the player should reach.
        settings: Vec<SignalSetting>,
    },
    /// Trigger one clock cycle.
    TriggerClock,
    /// Observe a value; terminal no-op check.
    Observe,
}

// ---------------------------------------------------------------------------
// Validation rule checks
// ---------------------------------------------------------------------------

/// A serializable predicate over a simulation snapshot.
///
/// Every check is a pure function of the snapshot: no wall-clock time, no
/// randomness, no external services. Identical snapshots always evaluate
/// identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RuleCheck {
    /// At least `at_least` components of `kind` are placed.
    ComponentOfKind {
        /// Required component kind.
        kind: ComponentKind,
        /// Minimum placed count.
        at_least: u32,
    },
    /// The named control signal is currently at the expected level.
    SignalIs {
        /// The signal to inspect.
        signal: SignalId,
        /// Expected active flag.
        active: bool,
    },
    /// The clock-cycle counter has reached at least `cycles`.
    ClockAtLeast {
        /// Minimum cycle count.
        cycles: u64,
    },
    /// The bus is currently driven by a component of the given kind.
    BusDriven {
        /// Required kind of the bus owner.
        kind: ComponentKind,
    },
    /// A data path between the two kinds committed a transfer on the most
    /// recent clock cycle.
    PathActiveBetween {
        /// Kind of the path's source component.
        source_kind: ComponentKind,
        /// Kind of the path's destination component.
        dest_kind: ComponentKind,
    },
    /// Some component of `kind` currently holds the expected value.
    ValueEquals {
        /// The kind whose payload is inspected.
        kind: ComponentKind,
        /// Expected stored value.
        value: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_kind_all_is_exhaustive_and_distinct() {
        let mut seen = std::collections::BTreeSet::new();
        for kind in ComponentKind::ALL {
            assert!(seen.insert(kind), "duplicate kind {kind:?}");
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn reveal_condition_roundtrip_serde() {
        let condition = RevealCondition::AfterAttempts { attempts: 3 };
        let json = serde_json::to_string(&condition).ok();
        assert!(json.is_some());
        let restored: Result<RevealCondition, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(condition));
    }

    #[test]
    fn rule_check_is_plain_data() {
        let check = RuleCheck::ClockAtLeast { cycles: 2 };
        let json = serde_json::to_string(&check).ok();
        assert!(json.is_some());
        let restored: Result<RuleCheck, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(check));
    }
}
