//! Progress-tracking records and engine result shapes.
//!
//! [`StageProgress`] and [`ProjectProgress`] are owned by the engine's
//! progression controller; consumers receive them read-only. The outcome
//! types here ([`ValidationOutcome`], [`RuleResult`], [`HintAvailability`])
//! are what the engine hands back to the UI layer after commands and
//! queries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::StageStatus;
use crate::ids::{HintId, RuleId, StageId};

// ---------------------------------------------------------------------------
// Per-stage progress
// ---------------------------------------------------------------------------

/// The mutable progress record for one stage.
///
/// Attempt counts and revealed hints survive simulation resets: resetting
/// the build surface never un-completes a stage or re-hides a hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StageProgress {
    /// Where the stage sits in its lifecycle.
    pub status: StageStatus,
    /// Number of validation attempts made against this stage.
    pub attempts: u32,
    /// Hints that have been revealed; monotone for the project's lifetime.
    pub revealed_hints: BTreeSet<HintId>,
    /// Outcome of the most recent validation attempt, if any.
    pub last_validation_passed: Option<bool>,
}

impl StageProgress {
    /// A fresh locked stage.
    #[must_use]
    pub const fn locked() -> Self {
        Self {
            status: StageStatus::Locked,
            attempts: 0,
            revealed_hints: BTreeSet::new(),
            last_validation_passed: None,
        }
    }

    /// A fresh current stage (stage 0 at project open).
    #[must_use]
    pub const fn current() -> Self {
        Self {
            status: StageStatus::Current,
            attempts: 0,
            revealed_hints: BTreeSet::new(),
            last_validation_passed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Project-wide progress
// ---------------------------------------------------------------------------

/// Progress across a whole project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProjectProgress {
    /// Index of the stage the player is on. Stays on the final stage once
    /// the project is complete.
    pub current_stage: usize,
    /// Per-stage progress, parallel to the project's stage list.
    pub stages: Vec<StageProgress>,
    /// Stamped when the final stage completes.
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProjectProgress {
    /// Fresh progress for a project with `stage_count` stages: stage 0 is
    /// current, the rest are locked.
    #[must_use]
    pub fn start(stage_count: usize) -> Self {
        let stages = (0..stage_count)
            .map(|index| {
                if index == 0 {
                    StageProgress::current()
                } else {
                    StageProgress::locked()
                }
            })
            .collect();
        Self {
            current_stage: 0,
            stages,
            completed_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation outcomes
// ---------------------------------------------------------------------------

/// Pass/fail for a single validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RuleResult {
    /// The rule that was evaluated.
    pub rule: RuleId,
    /// Whether the check held against the snapshot.
    pub passed: bool,
    /// The rule's failure message (rendered by the UI when `passed` is
    /// false).
    pub message: String,
}

/// Aggregate result of validating a stage: the AND of all rule results.
///
/// A failed validation is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ValidationOutcome {
    /// The stage that was validated.
    pub stage: StageId,
    /// The attempt number this validation counted as (1-based).
    pub attempt: u32,
    /// True iff every rule passed.
    pub passed: bool,
    /// Per-rule detail, in the stage's rule order.
    pub results: Vec<RuleResult>,
}

// ---------------------------------------------------------------------------
// Hint availability
// ---------------------------------------------------------------------------

/// Disclosure state of one hint, as reported to the hints panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HintAvailability {
    /// The hint in question.
    pub hint: HintId,
    /// Whether its reveal condition currently holds.
    pub revealable: bool,
    /// Whether it has already been revealed (monotone).
    pub revealed: bool,
}
