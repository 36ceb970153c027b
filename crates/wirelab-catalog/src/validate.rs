//! Catalog integrity validation.
//!
//! A [`Project`] is checked once, after loading or construction, before the
//! engine is allowed to open it. Every reference inside the project must
//! resolve (rules and wiring to catalog signals, initial placements to the
//! proximity invariant), so the engine can assume a well-formed catalog and
//! keep its own error taxonomy focused on player mistakes.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::debug;
use wirelab_types::{Project, RevealCondition, RuleCheck, SignalId, Stage};

use crate::error::CatalogError;

/// Validate a project's internal consistency.
///
/// # Errors
///
/// Returns the first [`CatalogError`] found: empty stage list, duplicate
/// stage/signal/component ids, dangling signal references, zero-attempt
/// hint thresholds, a non-positive proximity threshold, or initial
/// placements that violate it.
pub fn validate_project(project: &Project) -> Result<(), CatalogError> {
    if project.stages.is_empty() {
        return Err(CatalogError::EmptyProject {
            title: project.title.clone(),
        });
    }

    if project.proximity_threshold <= Decimal::ZERO {
        return Err(CatalogError::InvalidThreshold {
            threshold: project.proximity_threshold,
        });
    }

    let known_signals = check_signals(project)?;
    check_wiring(project, &known_signals)?;
    check_initial_state(project, &known_signals)?;

    let mut stage_ids = BTreeSet::new();
    for stage in &project.stages {
        if !stage_ids.insert(stage.id) {
            return Err(CatalogError::DuplicateStage(stage.id));
        }
        check_stage(stage, &known_signals)?;
    }

    debug!(
        project = %project.id,
        stages = project.stages.len(),
        signals = project.signals.len(),
        wires = project.wiring.len(),
        "Project catalog validated"
    );
    Ok(())
}

/// Check signal uniqueness and return the set of known signal ids.
fn check_signals(project: &Project) -> Result<BTreeSet<SignalId>, CatalogError> {
    let mut ids = BTreeSet::new();
    let mut codes = BTreeSet::new();
    for signal in &project.signals {
        if !ids.insert(signal.id) || !codes.insert(signal.code.as_str()) {
            return Err(CatalogError::DuplicateSignal {
                code: signal.code.clone(),
            });
        }
    }
    Ok(ids)
}

/// Check that every wiring rule references catalog signals.
fn check_wiring(
    project: &Project,
    known_signals: &BTreeSet<SignalId>,
) -> Result<(), CatalogError> {
    for wire in &project.wiring {
        for signal in &wire.required_signals {
            if !known_signals.contains(signal) {
                return Err(CatalogError::UnknownSignalReference {
                    signal: *signal,
                    context: format!("wiring rule {}", wire.id),
                });
            }
        }
    }
    Ok(())
}

/// Check the declared initial state: unique component ids, known active
/// signals, and pairwise placement distances at or above the threshold.
fn check_initial_state(
    project: &Project,
    known_signals: &BTreeSet<SignalId>,
) -> Result<(), CatalogError> {
    for signal in &project.initial_state.active_signals {
        if !known_signals.contains(signal) {
            return Err(CatalogError::UnknownSignalReference {
                signal: *signal,
                context: String::from("initial active signals"),
            });
        }
    }

    let threshold_squared = project
        .proximity_threshold
        .checked_mul(project.proximity_threshold)
        .ok_or(CatalogError::ArithmeticOverflow)?;

    let components = &project.initial_state.components;
    let mut ids = BTreeSet::new();
    for (index, component) in components.iter().enumerate() {
        if !ids.insert(component.id) {
            return Err(CatalogError::DuplicateComponent(component.id));
        }
        for earlier in components.get(..index).unwrap_or(&[]) {
            let squared = component
                .position
                .squared_distance_to(&earlier.position)
                .ok_or(CatalogError::ArithmeticOverflow)?;
            if squared < threshold_squared {
                return Err(CatalogError::InitialPlacementOverlap {
                    first: earlier.id,
                    second: component.id,
                });
            }
        }
    }
    Ok(())
}

/// Check one stage's rules and hints.
fn check_stage(
    stage: &Stage,
    known_signals: &BTreeSet<SignalId>,
) -> Result<(), CatalogError> {
    for rule in &stage.rules {
        if let RuleCheck::SignalIs { signal, .. } = rule.check {
            if !known_signals.contains(&signal) {
                return Err(CatalogError::UnknownSignalReference {
                    signal,
                    context: format!("rule {} of stage {}", rule.id, stage.id),
                });
            }
        }
    }
    for hint in &stage.hints {
        if let RevealCondition::AfterAttempts { attempts } = hint.reveal {
            if attempts == 0 {
                return Err(CatalogError::ZeroAttemptThreshold { stage: stage.id });
            }
        }
    }
    Ok(())
}
