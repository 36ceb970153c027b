//! Simulation and progression engine for Wirelab exercise projects.
//!
//! The engine owns all mutable state for one open project: the live
//! simulation (placed components, control signals, bus ownership, the
//! discrete clock) and the learner's progress through the project's
//! stages. Every mutation goes through the [`SimulationStore`] command
//! surface; commands are atomic and synchronous, and each failure is a
//! typed [`EngineError`] with no partial effect.
//!
//! # Architecture
//!
//! - [`store`] -- The [`SimulationStore`]: the command and query surface.
//! - [`state`] -- The live [`SimulationState`] snapshot and the
//!   append-only [`EventLog`].
//! - [`clock`] -- The discrete [`CycleClock`] and the two-phase cycle
//!   commit.
//! - [`validate`] -- Declarative rule evaluation against a snapshot.
//! - [`hints`] -- Hint disclosure policy.
//! - [`progress`] -- Stage progression, accessibility, and percentages.
//! - [`error`] -- The [`EngineError`] type.
//!
//! # Clock semantics
//!
//! Nothing moves between components except on a clock edge. One call to
//! [`SimulationStore::trigger_clock`] plans every data path transfer
//! against the pre-cycle snapshot and then applies them all at once, so
//! within a single cycle no transfer can observe another's effect.
//!
//! # Usage
//!
//! ```
//! use rust_decimal::Decimal;
//! use wirelab_catalog::create_sample_project;
//! use wirelab_engine::SimulationStore;
//! use wirelab_types::{ComponentKind, Position};
//!
//! let (project, _refs) = create_sample_project();
//! let mut store = SimulationStore::new();
//! store.open_project(project).ok();
//!
//! // First stage: place a register clear of the pre-placed memory cell.
//! let register = store
//!     .place_component(
//!         ComponentKind::Register,
//!         Position::new(Decimal::ZERO, Decimal::ZERO),
//!     )
//!     .ok();
//! assert!(register.is_some());
//!
//! let outcome = store.validate_current_stage().ok();
//! assert_eq!(outcome.map(|o| o.passed), Some(true));
//! assert!(store.complete_stage().is_ok());
//! ```

pub mod clock;
pub mod error;
pub mod hints;
pub mod progress;
pub mod state;
pub mod store;
pub mod validate;

pub use clock::{CycleClock, CycleSummary};
pub use error::EngineError;
pub use progress::StageCompletion;
pub use state::{EventLog, SimulationState};
pub use store::SimulationStore;
