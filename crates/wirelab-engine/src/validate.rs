//! The validation engine: declarative rule checks over a state snapshot.
//!
//! Every [`RuleCheck`] is dispatched through [`evaluate_check`], a pure
//! function of the snapshot -- no wall-clock time, no randomness, no
//! external services -- so identical states always validate identically.
//! Rules are evaluated independently; all failing rules are reported, and
//! the stage passes only if every rule passes.

use wirelab_types::{RuleCheck, RuleResult, Stage, ValidationOutcome};

use crate::state::SimulationState;

/// Evaluate one check against the snapshot.
#[must_use]
pub fn evaluate_check(check: &RuleCheck, state: &SimulationState) -> bool {
    match *check {
        RuleCheck::ComponentOfKind { kind, at_least } => {
            let count = u32::try_from(state.count_of_kind(kind)).unwrap_or(u32::MAX);
            count >= at_least
        }
        RuleCheck::SignalIs { signal, active } => state.signal_active(signal) == active,
        RuleCheck::ClockAtLeast { cycles } => state.clock.cycle() >= cycles,
        RuleCheck::BusDriven { kind } => state
            .bus_owner
            .and_then(|owner| state.components.get(&owner))
            .is_some_and(|component| component.kind == kind),
        RuleCheck::PathActiveBetween {
            source_kind,
            dest_kind,
        } => state.paths.iter().any(|path| {
            path.active
                && state
                    .components
                    .get(&path.source)
                    .is_some_and(|c| c.kind == source_kind)
                && state
                    .components
                    .get(&path.dest)
                    .is_some_and(|c| c.kind == dest_kind)
        }),
        RuleCheck::ValueEquals { kind, value } => state
            .components
            .values()
            .any(|c| c.kind == kind && c.payload.driven_value() == Some(value)),
    }
}

/// Evaluate every rule of a stage and aggregate the outcome.
///
/// `attempt` is the attempt number this run counts as; the caller (the
/// store) owns the counter and increments it exactly once per invocation.
#[must_use]
pub fn evaluate_stage(
    stage: &Stage,
    state: &SimulationState,
    attempt: u32,
) -> ValidationOutcome {
    let results: Vec<RuleResult> = stage
        .rules
        .iter()
        .map(|rule| RuleResult {
            rule: rule.id,
            passed: evaluate_check(&rule.check, state),
            message: rule.message.clone(),
        })
        .collect();
    let passed = results.iter().all(|r| r.passed);
    ValidationOutcome {
        stage: stage.id,
        attempt,
        passed,
        results,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wirelab_catalog::{SAMPLE_MEMORY_VALUE, create_sample_project};
    use wirelab_types::{Component, ComponentKind, Position};

    use super::*;

    fn state_with_register(
        project: &wirelab_types::Project,
    ) -> (SimulationState, wirelab_types::ComponentId) {
        let mut state = SimulationState::from_project(project);
        let register = Component::place(
            ComponentKind::Register,
            Position::new(rust_decimal::Decimal::ZERO, rust_decimal::Decimal::ZERO),
        );
        let id = register.id;
        state.components.insert(id, register);
        state.instantiate_paths(&project.wiring);
        (state, id)
    }

    #[test]
    fn component_count_check_respects_threshold() {
        let (project, _) = create_sample_project();
        let (state, _) = state_with_register(&project);
        assert!(evaluate_check(
            &RuleCheck::ComponentOfKind {
                kind: ComponentKind::Register,
                at_least: 1
            },
            &state,
        ));
        assert!(!evaluate_check(
            &RuleCheck::ComponentOfKind {
                kind: ComponentKind::Register,
                at_least: 2
            },
            &state,
        ));
    }

    #[test]
    fn signal_check_reads_live_levels() {
        let (project, refs) = create_sample_project();
        let mut state = SimulationState::from_project(&project);
        let check = RuleCheck::SignalIs {
            signal: refs.mem_read,
            active: true,
        };
        assert!(!evaluate_check(&check, &state));
        state.signals.insert(refs.mem_read, true);
        assert!(evaluate_check(&check, &state));
    }

    #[test]
    fn bus_check_requires_owner_of_the_right_kind() {
        let (project, refs) = create_sample_project();
        let (mut state, register) = state_with_register(&project);
        let check = RuleCheck::BusDriven {
            kind: ComponentKind::Register,
        };
        assert!(!evaluate_check(&check, &state));
        state.bus_owner = Some(refs.memory);
        assert!(!evaluate_check(&check, &state));
        state.bus_owner = Some(register);
        assert!(evaluate_check(&check, &state));
    }

    #[test]
    fn value_check_reads_payloads() {
        let (project, _) = create_sample_project();
        let state = SimulationState::from_project(&project);
        assert!(evaluate_check(
            &RuleCheck::ValueEquals {
                kind: ComponentKind::Memory,
                value: SAMPLE_MEMORY_VALUE
            },
            &state,
        ));
        assert!(!evaluate_check(
            &RuleCheck::ValueEquals {
                kind: ComponentKind::Memory,
                value: 9
            },
            &state,
        ));
    }

    #[test]
    fn stage_outcome_reports_every_rule() {
        let (project, _) = create_sample_project();
        let state = SimulationState::from_project(&project);
        // Stage 3 ("Execute the transfer") has three rules; none hold yet.
        let stage = project.stages.get(2).unwrap();
        let outcome = evaluate_stage(stage, &state, 1);
        assert!(!outcome.passed);
        assert_eq!(outcome.attempt, 1);
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results.iter().all(|r| !r.passed));
    }

    #[test]
    fn evaluation_is_deterministic_for_identical_states() {
        let (project, _) = create_sample_project();
        let state = SimulationState::from_project(&project);
        let stage = project.stages.first().unwrap();
        let first = evaluate_stage(stage, &state, 1);
        let second = evaluate_stage(stage, &state, 1);
        assert_eq!(first, second);
    }
}
