//! The live simulation aggregate and the append-only event log.
//!
//! [`SimulationState`] bundles everything the clock driver and validation
//! engine read: placed components, instantiated data paths, control-signal
//! levels, bus ownership, and the cycle counter. It is owned exclusively by
//! the store; consumers only ever see it behind a shared reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wirelab_types::{
    Component, ComponentId, DataPath, Event, EventKind, PathId, Project, SignalId,
    WiringRule,
};

use crate::clock::CycleClock;

/// The live, mutable simulation model for one open project.
///
/// Serializes as-is; the rendering surface consumes the same shape the
/// engine holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Placed components by id.
    pub components: BTreeMap<ComponentId, Component>,
    /// Instantiated data paths, in creation order.
    pub paths: Vec<DataPath>,
    /// Live level of every catalog signal.
    pub signals: BTreeMap<SignalId, bool>,
    /// The at-most-one component currently driving the bus.
    pub bus_owner: Option<ComponentId>,
    /// The discrete clock.
    pub clock: CycleClock,
}

impl SimulationState {
    /// Build the state a fresh open (or a reset) starts from.
    ///
    /// Initial components keep their catalog-assigned ids, every catalog
    /// signal starts at the declared level, the bus is undriven, and the
    /// clock is at zero. Data paths are instantiated for every initial
    /// component pair that matches a wiring rule.
    #[must_use]
    pub fn from_project(project: &Project) -> Self {
        let components: BTreeMap<ComponentId, Component> = project
            .initial_state
            .components
            .iter()
            .map(|initial| {
                (
                    initial.id,
                    Component {
                        id: initial.id,
                        kind: initial.kind,
                        position: initial.position,
                        payload: initial.payload,
                    },
                )
            })
            .collect();

        let mut signals: BTreeMap<SignalId, bool> = project
            .signals
            .iter()
            .map(|signal| (signal.id, false))
            .collect();
        for active in &project.initial_state.active_signals {
            signals.insert(*active, true);
        }

        let mut state = Self {
            components,
            paths: Vec::new(),
            signals,
            bus_owner: None,
            clock: CycleClock::new(),
        };
        state.instantiate_paths(&project.wiring);
        state
    }

    /// The live level of a signal; unknown ids read as inactive.
    #[must_use]
    pub fn signal_active(&self, signal: SignalId) -> bool {
        self.signals.get(&signal).copied().unwrap_or(false)
    }

    /// Number of placed components of the given kind.
    #[must_use]
    pub fn count_of_kind(&self, kind: wirelab_types::ComponentKind) -> usize {
        self.components.values().filter(|c| c.kind == kind).count()
    }

    /// Instantiate missing data paths from the wiring rules.
    ///
    /// For every rule and every (source, dest) component pair matching its
    /// kinds, creates a path if one for that rule and pair does not already
    /// exist. Called after each placement so paths appear as soon as both
    /// endpoints do.
    pub fn instantiate_paths(&mut self, wiring: &[WiringRule]) {
        for wire in wiring {
            let sources: Vec<ComponentId> = self
                .components
                .values()
                .filter(|c| c.kind == wire.source_kind)
                .map(|c| c.id)
                .collect();
            let dests: Vec<ComponentId> = self
                .components
                .values()
                .filter(|c| c.kind == wire.dest_kind)
                .map(|c| c.id)
                .collect();

            for &source in &sources {
                for &dest in &dests {
                    if source == dest {
                        continue;
                    }
                    let exists = self.paths.iter().any(|p| {
                        p.wire == wire.id && p.source == source && p.dest == dest
                    });
                    if !exists {
                        self.paths.push(DataPath {
                            id: PathId::new(),
                            wire: wire.id,
                            source,
                            dest,
                            active: false,
                        });
                    }
                }
            }
        }
    }
}

/// The ordered, append-only event log for one open project.
///
/// Ordinals start at 0 and increase by 1 per event; consumers must treat
/// the slice as read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// An empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append one event, stamping the next ordinal.
    pub fn append(&mut self, kind: EventKind) {
        let ordinal = u64::try_from(self.events.len()).unwrap_or(u64::MAX);
        self.events.push(Event { ordinal, kind });
    }

    /// The full log, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wirelab_catalog::create_sample_project;
    use wirelab_types::{Component, ComponentKind, Position};

    use super::*;

    #[test]
    fn fresh_state_mirrors_the_initial_declaration() {
        let (project, refs) = create_sample_project();
        let state = SimulationState::from_project(&project);

        assert_eq!(state.components.len(), 1);
        assert!(state.components.contains_key(&refs.memory));
        assert!(state.bus_owner.is_none());
        assert_eq!(state.clock.cycle(), 0);
        // All three catalog signals exist and start low.
        assert_eq!(state.signals.len(), 3);
        assert!(!state.signal_active(refs.mem_read));
    }

    #[test]
    fn paths_appear_once_both_endpoints_exist() {
        let (project, _) = create_sample_project();
        let mut state = SimulationState::from_project(&project);
        // Only the memory cell exists: no pairs, no paths.
        assert!(state.paths.is_empty());

        let register = Component::place(
            ComponentKind::Register,
            Position::new(rust_decimal::Decimal::ZERO, rust_decimal::Decimal::ZERO),
        );
        state.components.insert(register.id, register);
        state.instantiate_paths(&project.wiring);
        assert_eq!(state.paths.len(), 1);

        // Re-instantiating is idempotent.
        state.instantiate_paths(&project.wiring);
        assert_eq!(state.paths.len(), 1);
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let (project, _) = create_sample_project();
        let state = SimulationState::from_project(&project);
        let json = serde_json::to_string(&state).unwrap();
        let restored: SimulationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn event_log_ordinals_are_dense_from_zero() {
        let mut log = EventLog::new();
        assert!(log.is_empty());
        log.append(EventKind::SimulationReset);
        log.append(EventKind::SimulationReset);
        let ordinals: Vec<u64> = log.events().iter().map(|e| e.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1]);
        assert_eq!(log.len(), 2);
    }
}
