//! The stage progression controller.
//!
//! Pure queries over [`ProjectProgress`] (accessibility, completion
//! percentage) plus the single mutation that moves the per-stage state
//! machine forward: `locked -> current -> completed`, never backward.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use wirelab_types::{Project, ProjectProgress, StageId, StageStatus};

use crate::error::EngineError;

/// What completing a stage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCompletion {
    /// The stage that just completed.
    pub completed: StageId,
    /// The stage that became current, if any remains.
    pub next: Option<StageId>,
    /// True when this completion finished the whole project.
    pub project_completed: bool,
}

/// Whether the stage at `index` may currently be entered.
///
/// Stage 0 is always accessible; stage i (i > 0) only once stage i-1 is
/// completed. Out-of-range indices are never accessible.
#[must_use]
pub fn is_stage_accessible(progress: &ProjectProgress, index: usize) -> bool {
    if index >= progress.stages.len() {
        return false;
    }
    if index == 0 {
        return true;
    }
    index
        .checked_sub(1)
        .and_then(|prev| progress.stages.get(prev))
        .is_some_and(|stage| stage.status == StageStatus::Completed)
}

/// Completed stages as a percentage of all stages, rounded to the nearest
/// integer (3 of 7 -> 43).
#[must_use]
pub fn progress_percentage(progress: &ProjectProgress) -> u8 {
    let total = u64::try_from(progress.stages.len()).unwrap_or(u64::MAX);
    if total == 0 {
        return 0;
    }
    let completed = u64::try_from(
        progress
            .stages
            .iter()
            .filter(|s| s.status == StageStatus::Completed)
            .count(),
    )
    .unwrap_or(u64::MAX);

    // Integer rounding: (completed * 200 + total) / (2 * total). The result
    // is at most 100, so the narrowing conversion cannot fail.
    let percent = completed
        .saturating_mul(200)
        .saturating_add(total)
        .checked_div(total.saturating_mul(2))
        .unwrap_or(0);
    u8::try_from(percent).unwrap_or(100)
}

/// Mark the current stage completed and advance the index.
///
/// The caller (the store) has already checked that the most recent
/// validation passed; this function owns only the state-machine step.
///
/// # Errors
///
/// Returns [`EngineError::StageAlreadyCompleted`] if the current stage is
/// already completed, or [`EngineError::StageIndexOutOfRange`] if the
/// progress record does not line up with the catalog's stage list.
pub(crate) fn complete_current_stage(
    project: &Project,
    progress: &mut ProjectProgress,
) -> Result<StageCompletion, EngineError> {
    let index = progress.current_stage;
    let stage_id = project
        .stages
        .get(index)
        .map(|s| s.id)
        .ok_or(EngineError::StageIndexOutOfRange { index })?;

    let record = progress
        .stages
        .get_mut(index)
        .ok_or(EngineError::StageIndexOutOfRange { index })?;
    if record.status == StageStatus::Completed {
        return Err(EngineError::StageAlreadyCompleted { stage: stage_id });
    }
    record.status = StageStatus::Completed;

    let next_index = index.saturating_add(1);
    let next = if let Some(next_record) = progress.stages.get_mut(next_index) {
        next_record.status = StageStatus::Current;
        progress.current_stage = next_index;
        project.stages.get(next_index).map(|s| s.id)
    } else {
        None
    };

    let project_completed = next.is_none();
    if project_completed {
        progress.completed_at = Some(Utc::now());
        info!(project = %project.id, stage = %stage_id, "Project completed");
    } else {
        info!(project = %project.id, stage = %stage_id, "Stage completed");
    }

    Ok(StageCompletion {
        completed: stage_id,
        next,
        project_completed,
    })
}
