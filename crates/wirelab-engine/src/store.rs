//! The simulation state store: sole owner of mutable engine state.
//!
//! Every write to the simulation or to project progress funnels through the
//! command set here; each command is an atomic transition that either
//! completes or fails with a typed [`EngineError`] and no partial effect.
//! Consumers (rendering surface, control panel, stage tracker, hints
//! panel) use the read queries and must treat everything they receive as
//! read-only.

use tracing::{debug, info, warn};
use wirelab_types::{
    Component, ComponentId, ComponentKind, Event, EventKind, HintAvailability, HintId,
    Position, Project, ProjectProgress, SignalId, Stage, StageId, StageProgress,
    ValidationOutcome,
};

use crate::clock::{self, CycleSummary};
use crate::error::EngineError;
use crate::hints;
use crate::progress::{self, StageCompletion};
use crate::state::{EventLog, SimulationState};
use crate::validate;

/// Everything that lives while one project is open.
#[derive(Debug)]
struct OpenProject {
    project: Project,
    state: SimulationState,
    progress: ProjectProgress,
    log: EventLog,
}

/// The engine's command and query surface.
///
/// Holds at most one open project. All commands run synchronously to
/// completion; there is no background execution and no interleaving.
#[derive(Debug, Default)]
pub struct SimulationStore {
    open: Option<OpenProject>,
}

impl SimulationStore {
    /// A store with no project open.
    #[must_use]
    pub const fn new() -> Self {
        Self { open: None }
    }

    // -----------------------------------------------------------------
    // Lifecycle commands
    // -----------------------------------------------------------------

    /// Open a project, creating fresh simulation state and progress from
    /// its declared initial state.
    ///
    /// Re-opening the project that is already open fails with
    /// [`EngineError::AlreadyOpen`] so in-progress work is never silently
    /// reset. Opening a different project replaces the open one.
    pub fn open_project(&mut self, project: Project) -> Result<(), EngineError> {
        if let Some(open) = &self.open {
            if open.project.id == project.id {
                warn!(project = %project.id, "Rejected re-open of the open project");
                return Err(EngineError::AlreadyOpen {
                    project: project.id,
                });
            }
        }

        let state = SimulationState::from_project(&project);
        let progress = ProjectProgress::start(project.stages.len());
        let mut log = EventLog::new();
        log.append(EventKind::ProjectOpened {
            project: project.id,
        });
        info!(project = %project.id, title = %project.title, "Project opened");

        self.open = Some(OpenProject {
            project,
            state,
            progress,
            log,
        });
        Ok(())
    }

    /// Close the open project, discarding its simulation state, progress,
    /// and event log.
    pub fn close_project(&mut self) -> Result<(), EngineError> {
        let open = self.open.take().ok_or(EngineError::NoProjectOpen)?;
        info!(project = %open.project.id, "Project closed");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Simulation commands
    // -----------------------------------------------------------------

    /// Place a new component of `kind` at `position`.
    ///
    /// Fails with [`EngineError::InvalidPlacement`] if the position falls
    /// within the project's proximity threshold of any existing component.
    /// On success the component receives a fresh id, data paths for newly
    /// matched wiring-rule pairs are instantiated, and a placement event
    /// is appended.
    pub fn place_component(
        &mut self,
        kind: ComponentKind,
        position: Position,
    ) -> Result<ComponentId, EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoProjectOpen)?;

        let threshold_squared = open
            .project
            .proximity_threshold
            .checked_mul(open.project.proximity_threshold)
            .ok_or(EngineError::ArithmeticOverflow)?;

        for existing in open.state.components.values() {
            let squared = position
                .squared_distance_to(&existing.position)
                .ok_or(EngineError::ArithmeticOverflow)?;
            if squared < threshold_squared {
                warn!(?kind, conflict = %existing.id, "Rejected overlapping placement");
                return Err(EngineError::InvalidPlacement {
                    position,
                    conflict: existing.id,
                });
            }
        }

        let component = Component::place(kind, position);
        let id = component.id;
        open.state.components.insert(id, component);
        open.state.instantiate_paths(&open.project.wiring);
        open.log.append(EventKind::ComponentPlaced {
            component: id,
            kind,
            position,
        });
        debug!(component = %id, ?kind, "Component placed");
        Ok(id)
    }

    /// Flip the named control signal and return its new level.
    ///
    /// Fails with [`EngineError::UnknownSignal`] if the id is not in the
    /// project's catalog.
    pub fn toggle_signal(&mut self, signal: SignalId) -> Result<bool, EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoProjectOpen)?;
        let Some(level) = open.state.signals.get_mut(&signal) else {
            return Err(EngineError::UnknownSignal { signal });
        };
        *level = !*level;
        let active = *level;
        open.log.append(EventKind::SignalToggled { signal, active });
        debug!(%signal, active, "Signal toggled");
        Ok(active)
    }

    /// Declare the bus owner, clearing any previous owner; `None` leaves
    /// the bus undriven.
    ///
    /// Fails with [`EngineError::UnknownComponent`] if the id is not a
    /// placed component, leaving the previous owner in place.
    pub fn set_bus_owner(
        &mut self,
        owner: Option<ComponentId>,
    ) -> Result<(), EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoProjectOpen)?;
        if let Some(component) = owner {
            if !open.state.components.contains_key(&component) {
                return Err(EngineError::UnknownComponent { component });
            }
        }
        open.state.bus_owner = owner;
        open.log.append(EventKind::BusOwnerChanged { owner });
        debug!(?owner, "Bus owner changed");
        Ok(())
    }

    /// Advance the clock by one cycle, committing every satisfied data
    /// path (see the clock driver for the commit semantics).
    ///
    /// Never fails once a project is open; a cycle with no satisfied path
    /// is a valid, logged no-op cycle.
    pub fn trigger_clock(&mut self) -> Result<CycleSummary, EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoProjectOpen)?;
        let summary = clock::commit_cycle(&mut open.state, &open.project);
        open.log.append(EventKind::ClockCycle {
            cycle: summary.cycle,
            transfers: summary.transfers.clone(),
        });
        Ok(summary)
    }

    /// Restore the simulation to the project's declared initial state.
    ///
    /// Progress is untouched: completed stages stay completed, attempt
    /// counters keep counting, and revealed hints stay revealed.
    pub fn reset_simulation(&mut self) -> Result<(), EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoProjectOpen)?;
        open.state = SimulationState::from_project(&open.project);
        open.log.append(EventKind::SimulationReset);
        info!(project = %open.project.id, "Simulation reset");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Validation & progression commands
    // -----------------------------------------------------------------

    /// Run every validation rule of the current stage against the live
    /// snapshot.
    ///
    /// Each call is a genuine attempt: the stage's attempt counter
    /// increments exactly once per invocation, even when nothing changed
    /// since the last call. A failed validation is a normal outcome, not
    /// an error.
    pub fn validate_current_stage(&mut self) -> Result<ValidationOutcome, EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoProjectOpen)?;
        let index = open.progress.current_stage;
        let stage = open
            .project
            .stages
            .get(index)
            .ok_or(EngineError::StageIndexOutOfRange { index })?;
        let record = open
            .progress
            .stages
            .get_mut(index)
            .ok_or(EngineError::StageIndexOutOfRange { index })?;

        record.attempts = record.attempts.saturating_add(1);
        let outcome = validate::evaluate_stage(stage, &open.state, record.attempts);
        record.last_validation_passed = Some(outcome.passed);

        open.log.append(EventKind::ValidationAttempted {
            stage: stage.id,
            attempt: outcome.attempt,
            passed: outcome.passed,
        });
        info!(
            stage = %stage.id,
            attempt = outcome.attempt,
            passed = outcome.passed,
            "Stage validated"
        );
        Ok(outcome)
    }

    /// Complete the current stage and advance to the next.
    ///
    /// Callable only after the most recent [`Self::validate_current_stage`]
    /// returned a passing outcome; otherwise fails with
    /// [`EngineError::StageNotValidated`] and progress is unchanged. When
    /// the final stage completes, the completion timestamp is stamped.
    pub fn complete_stage(&mut self) -> Result<StageCompletion, EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoProjectOpen)?;
        let index = open.progress.current_stage;
        let record = open
            .progress
            .stages
            .get(index)
            .ok_or(EngineError::StageIndexOutOfRange { index })?;
        // A completed final stage still carries its passing validation, so
        // the already-completed case falls through to the progression step
        // below and is rejected there.
        if record.status != wirelab_types::StageStatus::Completed
            && record.last_validation_passed != Some(true)
        {
            warn!("Rejected stage completion without a passing validation");
            return Err(EngineError::StageNotValidated);
        }

        let completion =
            progress::complete_current_stage(&open.project, &mut open.progress)?;
        open.log.append(EventKind::StageCompleted {
            stage: completion.completed,
        });
        if completion.project_completed {
            open.log.append(EventKind::ProjectCompleted {
                project: open.project.id,
            });
        }
        Ok(completion)
    }

    /// Reveal a hint on a stage.
    ///
    /// Fails with [`EngineError::HintNotYetAvailable`] while the reveal
    /// condition does not hold; revealing an already-revealed hint is a
    /// no-op success. Reveals are monotone for the project's lifetime.
    pub fn reveal_hint(
        &mut self,
        stage_id: StageId,
        hint_id: HintId,
    ) -> Result<(), EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoProjectOpen)?;
        let (index, stage) = open
            .project
            .stage(stage_id)
            .ok_or(EngineError::UnknownStage { stage: stage_id })?;
        let hint = stage
            .hints
            .iter()
            .find(|h| h.id == hint_id)
            .ok_or(EngineError::UnknownHint { hint: hint_id })?;
        let record = open
            .progress
            .stages
            .get_mut(index)
            .ok_or(EngineError::UnknownStage { stage: stage_id })?;

        if record.revealed_hints.contains(&hint_id) {
            return Ok(());
        }
        if !hints::condition_met(hint.reveal, record) {
            return Err(EngineError::HintNotYetAvailable { hint: hint_id });
        }

        record.revealed_hints.insert(hint_id);
        open.log.append(EventKind::HintRevealed {
            stage: stage_id,
            hint: hint_id,
        });
        info!(stage = %stage_id, hint = %hint_id, "Hint revealed");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Read queries
    // -----------------------------------------------------------------

    /// The stage the player is currently on.
    pub fn current_stage(&self) -> Result<&Stage, EngineError> {
        let open = self.open.as_ref().ok_or(EngineError::NoProjectOpen)?;
        let index = open.progress.current_stage;
        open.project
            .stages
            .get(index)
            .ok_or(EngineError::StageIndexOutOfRange { index })
    }

    /// A stage and its progress record, by id.
    pub fn stage_state(
        &self,
        stage_id: StageId,
    ) -> Result<(&Stage, &StageProgress), EngineError> {
        let open = self.open.as_ref().ok_or(EngineError::NoProjectOpen)?;
        let (index, stage) = open
            .project
            .stage(stage_id)
            .ok_or(EngineError::UnknownStage { stage: stage_id })?;
        let record = open
            .progress
            .stages
            .get(index)
            .ok_or(EngineError::UnknownStage { stage: stage_id })?;
        Ok((stage, record))
    }

    /// Whether the stage at `index` may currently be entered.
    pub fn is_stage_accessible(&self, index: usize) -> Result<bool, EngineError> {
        let open = self.open.as_ref().ok_or(EngineError::NoProjectOpen)?;
        Ok(progress::is_stage_accessible(&open.progress, index))
    }

    /// Completed stages as a rounded percentage of all stages.
    pub fn progress_percentage(&self) -> Result<u8, EngineError> {
        let open = self.open.as_ref().ok_or(EngineError::NoProjectOpen)?;
        Ok(progress::progress_percentage(&open.progress))
    }

    /// Disclosure state of every hint of the current stage.
    pub fn available_hints(&self) -> Result<Vec<HintAvailability>, EngineError> {
        let open = self.open.as_ref().ok_or(EngineError::NoProjectOpen)?;
        let index = open.progress.current_stage;
        let stage = open
            .project
            .stages
            .get(index)
            .ok_or(EngineError::StageIndexOutOfRange { index })?;
        let record = open
            .progress
            .stages
            .get(index)
            .ok_or(EngineError::StageIndexOutOfRange { index })?;
        Ok(hints::availability(stage, record))
    }

    /// The open project's catalog.
    pub fn project(&self) -> Result<&Project, EngineError> {
        self.open
            .as_ref()
            .map(|open| &open.project)
            .ok_or(EngineError::NoProjectOpen)
    }

    /// The live simulation snapshot (read-only).
    pub fn snapshot(&self) -> Result<&SimulationState, EngineError> {
        self.open
            .as_ref()
            .map(|open| &open.state)
            .ok_or(EngineError::NoProjectOpen)
    }

    /// Progress across the open project (read-only).
    pub fn progress(&self) -> Result<&ProjectProgress, EngineError> {
        self.open
            .as_ref()
            .map(|open| &open.progress)
            .ok_or(EngineError::NoProjectOpen)
    }

    /// The append-only event log, oldest first (read-only).
    pub fn events(&self) -> Result<&[Event], EngineError> {
        self.open
            .as_ref()
            .map(|open| open.log.events())
            .ok_or(EngineError::NoProjectOpen)
    }
}
