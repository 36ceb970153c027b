//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the engine has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. All IDs use UUID v7 (time-ordered)
//! so that generated ids sort by creation order.
//!
//! Catalog entities (projects, stages, rules, hints, signals, wiring rules)
//! have their ids assigned once at load time and never change. Runtime
//! entities (components, data paths, events) receive fresh ids from the
//! `new()` constructors here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a buildable project (an ordered exercise).
    ProjectId
}

define_id! {
    /// Unique identifier for one stage of a project.
    StageId
}

define_id! {
    /// Unique identifier for a validation rule within a stage.
    RuleId
}

define_id! {
    /// Unique identifier for a hint within a stage.
    HintId
}

define_id! {
    /// Unique identifier for a control signal in a project's catalog.
    SignalId
}

define_id! {
    /// Unique identifier for a placed hardware component.
    ComponentId
}

define_id! {
    /// Unique identifier for an instantiated data path between components.
    PathId
}

define_id! {
    /// Unique identifier for a wiring rule (the template data paths are
    /// instantiated from).
    WireId
}

define_id! {
    /// Unique identifier for an entry in the append-only event log.
    EventId
}
