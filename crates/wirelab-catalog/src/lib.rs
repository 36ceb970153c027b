//! Static project/stage catalog loading and validation for Wirelab.
//!
//! A project catalog is pure data: ordered stages, each with a task, a set
//! of validation rules, and a set of hints, plus the project-wide control
//! signal catalog, wiring rules, and declared initial simulation state.
//! This crate loads catalogs from YAML, checks their internal consistency,
//! and ships the built-in sample project. It contains no behavior beyond
//! loading -- the live engine lives in `wirelab-engine`.
//!
//! # Modules
//!
//! - [`error`] -- Error types for catalog loading and validation.
//! - [`loader`] -- YAML project files resolved into typed [`Project`]s.
//! - [`sample`] -- The built-in "minimal datapath" exercise.
//! - [`validate`] -- Catalog integrity checks run before a project is
//!   handed to the engine.
//!
//! [`Project`]: wirelab_types::Project

pub mod error;
pub mod loader;
pub mod sample;
pub mod validate;

// Re-export primary entry points at crate root.
pub use error::CatalogError;
pub use loader::{load_project, parse_project};
pub use sample::{SAMPLE_MEMORY_VALUE, SampleRefs, create_sample_project};
pub use validate::validate_project;
