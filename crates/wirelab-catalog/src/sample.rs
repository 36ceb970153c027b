//! Built-in sample project: a minimal memory-to-register datapath.
//!
//! Four stages: place a register, raise the transfer signals, execute a
//! clock cycle, and observe the result. Used by tests and as the default
//! exercise shipped with the engine.

use rust_decimal::Decimal;
use wirelab_types::{
    BusRequirement, ComponentId, ComponentKind, ComponentPayload, ControlSignal, Hint,
    HintId, InitialComponent, InitialState, Position, Project, ProjectId,
    RevealCondition, RuleCheck, RuleId, SignalId, SignalSetting, Stage, StageId, Task,
    ValidationRule, WireId, WiringRule, default_proximity_threshold,
};

/// Helper to build a [`ControlSignal`].
fn sig(name: &str, code: &str, group: &str) -> ControlSignal {
    ControlSignal {
        id: SignalId::new(),
        name: name.to_string(),
        code: code.to_string(),
        group: group.to_string(),
    }
}

/// Helper to build a [`ValidationRule`].
fn rule(message: &str, check: RuleCheck) -> ValidationRule {
    ValidationRule {
        id: RuleId::new(),
        message: message.to_string(),
        check,
    }
}

/// Helper to build a [`Hint`].
fn hint(text: &str, reveal: RevealCondition) -> Hint {
    Hint {
        id: HintId::new(),
        text: text.to_string(),
        reveal,
    }
}

/// Identifiers for the sample project's catalog entries, returned alongside
/// the project so that callers can reference specific signals and wires for
/// commands, tests, and UI wiring.
#[derive(Debug, Clone)]
pub struct SampleRefs {
    /// "Memory Read Enable" (`mem-read`).
    pub mem_read: SignalId,
    /// "Register Load Enable" (`reg-load`).
    pub reg_load: SignalId,
    /// "ALU Latch" (`alu-latch`).
    pub alu_latch: SignalId,
    /// The pre-placed memory cell holding the value 7.
    pub memory: ComponentId,
    /// Dedicated memory-to-register wiring rule.
    pub memory_to_register: WireId,
    /// Bus-mediated register-to-ALU wiring rule.
    pub register_to_alu: WireId,
}

/// The value the sample's memory cell starts with; stage 3 checks that it
/// reaches the player's register.
pub const SAMPLE_MEMORY_VALUE: u32 = 7;

/// Create the built-in "minimal datapath" project.
///
/// The simulation starts with one memory cell at (4, 0) holding
/// [`SAMPLE_MEMORY_VALUE`] and no active signals. Stage order: place a
/// register, raise `mem-read` and `reg-load`, trigger the clock, observe.
#[must_use]
pub fn create_sample_project() -> (Project, SampleRefs) {
    let mem_read = sig("Memory Read Enable", "mem-read", "memory");
    let reg_load = sig("Register Load Enable", "reg-load", "register");
    let alu_latch = sig("ALU Latch", "alu-latch", "alu");

    let refs = SampleRefs {
        mem_read: mem_read.id,
        reg_load: reg_load.id,
        alu_latch: alu_latch.id,
        memory: ComponentId::new(),
        memory_to_register: WireId::new(),
        register_to_alu: WireId::new(),
    };

    let wiring = vec![
        // Dedicated path: no bus arbitration, just both enables high.
        WiringRule {
            id: refs.memory_to_register,
            source_kind: ComponentKind::Memory,
            dest_kind: ComponentKind::Register,
            required_signals: vec![refs.mem_read, refs.reg_load],
            bus: BusRequirement::NotRequired,
        },
        // Bus-mediated path: the register must own the bus at commit time.
        WiringRule {
            id: refs.register_to_alu,
            source_kind: ComponentKind::Register,
            dest_kind: ComponentKind::Alu,
            required_signals: vec![refs.alu_latch],
            bus: BusRequirement::SourceOwnsBus,
        },
    ];

    let initial_state = InitialState {
        components: vec![InitialComponent {
            id: refs.memory,
            kind: ComponentKind::Memory,
            position: Position::new(Decimal::new(4, 0), Decimal::ZERO),
            payload: ComponentPayload::Memory {
                value: SAMPLE_MEMORY_VALUE,
            },
        }],
        active_signals: Vec::new(),
    };

    let stages = vec![
        Stage {
            id: StageId::new(),
            title: String::from("Place a register"),
            instructions: String::from(
                "The datapath needs somewhere to put the word it reads from \
                 memory. Place a register on the build surface.",
            ),
            task: Task::PlaceComponent {
                kind: ComponentKind::Register,
            },
            rules: vec![rule(
                "Place at least one register on the build surface.",
                RuleCheck::ComponentOfKind {
                    kind: ComponentKind::Register,
                    at_least: 1,
                },
            )],
            hints: vec![
                hint(
                    "Open the component palette and drop a register anywhere \
                     clear of the memory cell.",
                    RevealCondition::OnRequest,
                ),
                hint(
                    "Components need breathing room: keep at least 1.5 units \
                     between centers or the placement is rejected.",
                    RevealCondition::AfterAttempts { attempts: 2 },
                ),
            ],
            placeable: vec![ComponentKind::Register],
            estimated_minutes: Some(2),
        },
        Stage {
            id: StageId::new(),
            title: String::from("Raise the transfer signals"),
            instructions: String::from(
                "A path only carries data while its enables are high. Raise \
                 Memory Read Enable and Register Load Enable.",
            ),
            task: Task::SetSignals {
                settings: vec![
                    SignalSetting {
                        signal: refs.mem_read,
                        active: true,
                    },
                    SignalSetting {
                        signal: refs.reg_load,
                        active: true,
                    },
                ],
            },
            rules: vec![
                rule(
                    "Memory Read Enable must be high.",
                    RuleCheck::SignalIs {
                        signal: refs.mem_read,
                        active: true,
                    },
                ),
                rule(
                    "Register Load Enable must be high.",
                    RuleCheck::SignalIs {
                        signal: refs.reg_load,
                        active: true,
                    },
                ),
            ],
            hints: vec![hint(
                "There is one enable in the memory signal group and one in \
                 the register group. Both must be on at the same time.",
                RevealCondition::OnError,
            )],
            placeable: Vec::new(),
            estimated_minutes: Some(1),
        },
        Stage {
            id: StageId::new(),
            title: String::from("Execute the transfer"),
            instructions: String::from(
                "Nothing moves until the clock ticks. Trigger one cycle and \
                 watch the word leave memory.",
            ),
            task: Task::TriggerClock,
            rules: vec![
                rule(
                    "Trigger at least one clock cycle.",
                    RuleCheck::ClockAtLeast { cycles: 1 },
                ),
                rule(
                    "The memory-to-register path must carry a transfer.",
                    RuleCheck::PathActiveBetween {
                        source_kind: ComponentKind::Memory,
                        dest_kind: ComponentKind::Register,
                    },
                ),
                rule(
                    "The register must hold the value read from memory.",
                    RuleCheck::ValueEquals {
                        kind: ComponentKind::Register,
                        value: SAMPLE_MEMORY_VALUE,
                    },
                ),
            ],
            hints: vec![
                hint(
                    "The clock button commits every satisfied path at once.",
                    RevealCondition::OnError,
                ),
                hint(
                    "A path commits only if both its enables are still high \
                     at the instant the clock fires. Check the signal panel \
                     before you trigger.",
                    RevealCondition::AfterAttempts { attempts: 3 },
                ),
            ],
            placeable: Vec::new(),
            estimated_minutes: Some(2),
        },
        Stage {
            id: StageId::new(),
            title: String::from("Read out the result"),
            instructions: String::from(
                "Inspect the register. The word that lived in memory is now \
                 latched in your register.",
            ),
            task: Task::Observe,
            rules: vec![rule(
                "The register must still hold the transferred value.",
                RuleCheck::ValueEquals {
                    kind: ComponentKind::Register,
                    value: SAMPLE_MEMORY_VALUE,
                },
            )],
            hints: vec![hint(
                "Click the register to open its inspector.",
                RevealCondition::OnRequest,
            )],
            placeable: Vec::new(),
            estimated_minutes: Some(1),
        },
    ];

    let project = Project {
        id: ProjectId::new(),
        title: String::from("Minimal Datapath"),
        stages,
        signals: vec![mem_read, reg_load, alu_latch],
        wiring,
        initial_state,
        proximity_threshold: default_proximity_threshold(),
    };

    (project, refs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_four_sequential_stages() {
        let (project, _) = create_sample_project();
        assert_eq!(project.stages.len(), 4);
        assert_eq!(project.signals.len(), 3);
        assert_eq!(project.wiring.len(), 2);
    }

    #[test]
    fn refs_point_into_the_catalog() {
        let (project, refs) = create_sample_project();
        assert!(project.signal(refs.mem_read).is_some());
        assert!(project.signal(refs.reg_load).is_some());
        assert!(project.signal(refs.alu_latch).is_some());
        assert!(project.wire(refs.memory_to_register).is_some());
        assert!(project.wire(refs.register_to_alu).is_some());
        let memory = project
            .initial_state
            .components
            .iter()
            .find(|c| c.id == refs.memory)
            .unwrap();
        assert_eq!(memory.kind, ComponentKind::Memory);
        assert_eq!(
            memory.payload,
            ComponentPayload::Memory {
                value: SAMPLE_MEMORY_VALUE
            }
        );
    }

    #[test]
    fn sample_memory_path_needs_no_bus_owner() {
        let (project, refs) = create_sample_project();
        let wire = project.wire(refs.memory_to_register).unwrap();
        assert_eq!(wire.bus, BusRequirement::NotRequired);
        assert_eq!(wire.required_signals.len(), 2);
    }
}
