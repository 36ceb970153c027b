//! Shared type definitions for the Wirelab simulation engine.
//!
//! This crate is the single source of truth for all types used across the
//! Wirelab workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the rendering surface, control panel, stage tracker,
//! and hints panel.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (component kinds, stage status, reveal
//!   conditions, tasks, rule checks)
//! - [`structs`] -- Catalog and runtime entity structs (projects, stages,
//!   components, data paths, signals, wiring)
//! - [`progress`] -- Progress records and engine result shapes
//! - [`events`] -- Append-only event log records

pub mod enums;
pub mod events;
pub mod ids;
pub mod progress;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    BusRequirement, ComponentKind, RevealCondition, RuleCheck, StageStatus, Task,
};
pub use events::{Event, EventKind};
pub use ids::{
    ComponentId, EventId, HintId, PathId, ProjectId, RuleId, SignalId, StageId, WireId,
};
pub use progress::{
    HintAvailability, ProjectProgress, RuleResult, StageProgress, ValidationOutcome,
};
pub use structs::{
    Component, ComponentPayload, ControlSignal, DataPath, Hint, InitialComponent,
    InitialState, Position, Project, SignalSetting, Stage, ValidationRule, WiringRule,
    default_proximity_threshold,
};
