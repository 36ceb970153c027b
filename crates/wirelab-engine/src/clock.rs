//! The discrete clock and the cycle commit.
//!
//! The cycle counter is the single temporal source of truth for the
//! simulation: it never decreases, and every call to the driver advances
//! it by exactly one. A commit is two-phase -- transfers are *planned*
//! against the pre-cycle snapshot, then *applied* -- so a cycle is
//! all-or-nothing and every source value read is the value from before
//! the clock edge.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wirelab_types::{BusRequirement, ComponentId, PathId, Project};

use crate::state::SimulationState;

/// The monotonically increasing clock-cycle counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleClock {
    cycle: u64,
}

impl CycleClock {
    /// A clock at cycle 0 (no edges yet).
    #[must_use]
    pub const fn new() -> Self {
        Self { cycle: 0 }
    }

    /// The number of committed cycles.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Advance by one cycle and return the new count.
    ///
    /// Never fails. At `u64::MAX` the counter holds instead of wrapping:
    /// monotonicity is preserved, but the count stops increasing by one
    /// per call at that extreme.
    pub const fn advance(&mut self) -> u64 {
        self.cycle = self.cycle.saturating_add(1);
        self.cycle
    }
}

/// What one committed clock cycle did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// The cycle counter after the commit.
    pub cycle: u64,
    /// Paths that carried a transfer this cycle, in path order. Empty for
    /// a no-op cycle.
    pub transfers: Vec<PathId>,
}

/// A transfer planned during phase one of a commit.
struct PlannedTransfer {
    path: PathId,
    dest: ComponentId,
    /// The value driven by the source, read before any mutation. `None`
    /// for stateless sources (the path still activates).
    value: Option<u32>,
}

/// Commit one clock cycle against the simulation state.
///
/// Advances the counter, clears every path's `active` flag, then plans and
/// applies one transfer per satisfied path. A path is satisfied when every
/// control signal its wiring rule requires is active and the rule's bus
/// requirement holds at this instant (for [`BusRequirement::SourceOwnsBus`],
/// the declared bus owner must be the path's source component). If no bus
/// owner is declared, no bus-mediated path can commit.
pub(crate) fn commit_cycle(state: &mut SimulationState, project: &Project) -> CycleSummary {
    let cycle = state.clock.advance();

    // The active flag always reflects the most recent cycle.
    for path in &mut state.paths {
        path.active = false;
    }

    // Phase one: plan against the pre-cycle snapshot.
    let mut planned: Vec<PlannedTransfer> = Vec::new();
    for path in &state.paths {
        let Some(wire) = project.wire(path.wire) else {
            continue;
        };

        let signals_high = wire
            .required_signals
            .iter()
            .all(|signal| state.signal_active(*signal));
        if !signals_high {
            continue;
        }

        let bus_satisfied = match wire.bus {
            BusRequirement::NotRequired => true,
            BusRequirement::SourceOwnsBus => state.bus_owner == Some(path.source),
        };
        if !bus_satisfied {
            continue;
        }

        let value = state
            .components
            .get(&path.source)
            .and_then(|source| source.payload.driven_value());
        planned.push(PlannedTransfer {
            path: path.id,
            dest: path.dest,
            value,
        });
    }

    // Phase two: apply every planned transfer.
    let mut transfers = Vec::with_capacity(planned.len());
    for transfer in planned {
        if let Some(path) = state.paths.iter_mut().find(|p| p.id == transfer.path) {
            path.active = true;
        }
        if let (Some(value), Some(dest)) = (
            transfer.value,
            state.components.get_mut(&transfer.dest),
        ) {
            let stored = dest.payload.store(value);
            debug!(cycle, path = %transfer.path, dest = %transfer.dest, value, stored, "Transfer applied");
        }
        transfers.push(transfer.path);
    }

    info!(cycle, transfers = transfers.len(), "Clock cycle committed");
    CycleSummary { cycle, transfers }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wirelab_catalog::create_sample_project;
    use wirelab_types::{Component, ComponentKind, Position};

    use super::*;
    use crate::state::SimulationState;

    fn place_register(state: &mut SimulationState, project: &Project) -> ComponentId {
        let register = Component::place(
            ComponentKind::Register,
            Position::new(rust_decimal::Decimal::ZERO, rust_decimal::Decimal::ZERO),
        );
        let id = register.id;
        state.components.insert(id, register);
        state.instantiate_paths(&project.wiring);
        id
    }

    #[test]
    fn clock_advances_by_exactly_one_per_call() {
        let mut clock = CycleClock::new();
        assert_eq!(clock.cycle(), 0);
        for expected in 1..=5 {
            assert_eq!(clock.advance(), expected);
        }
    }

    #[test]
    fn clock_saturates_at_max_instead_of_wrapping() {
        let mut clock = CycleClock { cycle: u64::MAX };
        assert_eq!(clock.advance(), u64::MAX);
    }

    #[test]
    fn no_op_cycle_still_counts() {
        let (project, _) = create_sample_project();
        let mut state = SimulationState::from_project(&project);
        let summary = commit_cycle(&mut state, &project);
        assert_eq!(summary.cycle, 1);
        assert!(summary.transfers.is_empty());
    }

    #[test]
    fn satisfied_path_transfers_on_commit() {
        let (project, refs) = create_sample_project();
        let mut state = SimulationState::from_project(&project);
        let register = place_register(&mut state, &project);

        state.signals.insert(refs.mem_read, true);
        state.signals.insert(refs.reg_load, true);

        let summary = commit_cycle(&mut state, &project);
        assert_eq!(summary.cycle, 1);
        assert_eq!(summary.transfers.len(), 1);

        let stored = state
            .components
            .get(&register)
            .unwrap()
            .payload
            .driven_value();
        assert_eq!(stored, Some(wirelab_catalog::SAMPLE_MEMORY_VALUE));
        assert!(state.paths.iter().any(|p| p.active));
    }

    #[test]
    fn missing_signal_means_no_transfer() {
        let (project, refs) = create_sample_project();
        let mut state = SimulationState::from_project(&project);
        let register = place_register(&mut state, &project);

        state.signals.insert(refs.mem_read, true);
        // reg-load stays low.

        let summary = commit_cycle(&mut state, &project);
        assert!(summary.transfers.is_empty());
        let stored = state
            .components
            .get(&register)
            .unwrap()
            .payload
            .driven_value();
        assert_eq!(stored, Some(0));
    }

    #[test]
    fn bus_mediated_path_requires_source_ownership() {
        let (project, refs) = create_sample_project();
        let mut state = SimulationState::from_project(&project);
        let register = place_register(&mut state, &project);

        // Add an ALU so the register-to-ALU path instantiates.
        let alu = Component::place(
            ComponentKind::Alu,
            Position::new(
                rust_decimal::Decimal::ZERO,
                rust_decimal::Decimal::from(4),
            ),
        );
        let alu_id = alu.id;
        state.components.insert(alu_id, alu);
        state.instantiate_paths(&project.wiring);

        // Latch signal high but nobody owns the bus: no transfer.
        state.signals.insert(refs.alu_latch, true);
        let summary = commit_cycle(&mut state, &project);
        assert!(summary.transfers.is_empty());

        // With the register owning the bus the path commits.
        state.bus_owner = Some(register);
        let summary = commit_cycle(&mut state, &project);
        assert_eq!(summary.transfers.len(), 1);
        assert_eq!(summary.cycle, 2);
    }

    #[test]
    fn active_flags_reflect_only_the_latest_cycle() {
        let (project, refs) = create_sample_project();
        let mut state = SimulationState::from_project(&project);
        place_register(&mut state, &project);

        state.signals.insert(refs.mem_read, true);
        state.signals.insert(refs.reg_load, true);
        commit_cycle(&mut state, &project);
        assert!(state.paths.iter().any(|p| p.active));

        // Drop an enable; the next cycle clears the flag.
        state.signals.insert(refs.reg_load, false);
        commit_cycle(&mut state, &project);
        assert!(state.paths.iter().all(|p| !p.active));
    }
}
