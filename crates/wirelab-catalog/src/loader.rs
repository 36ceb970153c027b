//! Project file loading.
//!
//! Project catalogs live in YAML documents authored by content designers.
//! The raw file structs here mirror the YAML shape (signals referenced by
//! short code, component kinds by name); loading resolves every code to a
//! freshly assigned typed id and then runs the full integrity validation
//! before a [`Project`] is handed out.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use wirelab_types::{
    BusRequirement, ComponentId, ComponentKind, ComponentPayload, ControlSignal, Hint,
    HintId, InitialComponent, InitialState, Position, Project, ProjectId,
    RevealCondition, RuleCheck, RuleId, SignalId, SignalSetting, Stage, StageId, Task,
    ValidationRule, WireId, WiringRule, default_proximity_threshold,
};

use crate::error::CatalogError;
use crate::validate::validate_project;

/// Load and validate a project from a YAML file on disk.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be read,
/// [`CatalogError::Yaml`] if it cannot be parsed, or any integrity error
/// from [`validate_project`].
pub fn load_project(path: &Path) -> Result<Project, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    let project = parse_project(&contents)?;
    info!(project = %project.id, title = %project.title, "Project loaded");
    Ok(project)
}

/// Parse and validate a project from YAML text.
///
/// # Errors
///
/// Returns [`CatalogError::Yaml`] on malformed YAML, or any integrity error
/// from [`validate_project`].
pub fn parse_project(yaml: &str) -> Result<Project, CatalogError> {
    let file: ProjectFile = serde_yml::from_str(yaml)?;
    let project = file.resolve()?;
    validate_project(&project)?;
    Ok(project)
}

// ---------------------------------------------------------------------------
// Raw file shapes
// ---------------------------------------------------------------------------

/// A component kind as written in project files.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum KindFile {
    Register,
    Alu,
    Memory,
    Bus,
    ControlUnit,
    Mux,
    Decoder,
}

impl From<KindFile> for ComponentKind {
    fn from(kind: KindFile) -> Self {
        match kind {
            KindFile::Register => Self::Register,
            KindFile::Alu => Self::Alu,
            KindFile::Memory => Self::Memory,
            KindFile::Bus => Self::Bus,
            KindFile::ControlUnit => Self::ControlUnit,
            KindFile::Mux => Self::Mux,
            KindFile::Decoder => Self::Decoder,
        }
    }
}

/// A bus requirement as written in project files.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum BusFile {
    #[default]
    NotRequired,
    SourceOwnsBus,
}

impl From<BusFile> for BusRequirement {
    fn from(bus: BusFile) -> Self {
        match bus {
            BusFile::NotRequired => Self::NotRequired,
            BusFile::SourceOwnsBus => Self::SourceOwnsBus,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SignalFile {
    name: String,
    code: String,
    #[serde(default)]
    group: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireFile {
    source: KindFile,
    dest: KindFile,
    #[serde(default)]
    signals: Vec<String>,
    #[serde(default)]
    bus: BusFile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InitialComponentFile {
    kind: KindFile,
    x: Decimal,
    y: Decimal,
    #[serde(default)]
    value: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InitialFile {
    #[serde(default)]
    components: Vec<InitialComponentFile>,
    #[serde(default)]
    signals: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SignalSettingFile {
    signal: String,
    active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum TaskFile {
    PlaceComponent { kind: KindFile },
    SetSignals { settings: Vec<SignalSettingFile> },
    TriggerClock,
    Observe,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum CheckFile {
    ComponentOfKind {
        kind: KindFile,
        #[serde(default = "default_at_least")]
        at_least: u32,
    },
    SignalIs {
        signal: String,
        active: bool,
    },
    ClockAtLeast {
        cycles: u64,
    },
    BusDriven {
        kind: KindFile,
    },
    PathActiveBetween {
        source: KindFile,
        dest: KindFile,
    },
    ValueEquals {
        kind: KindFile,
        value: u32,
    },
}

const fn default_at_least() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    message: String,
    check: CheckFile,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RevealFile {
    OnRequest,
    OnError,
    AfterAttempts { attempts: u32 },
}

impl From<RevealFile> for RevealCondition {
    fn from(reveal: RevealFile) -> Self {
        match reveal {
            RevealFile::OnRequest => Self::OnRequest,
            RevealFile::OnError => Self::OnError,
            RevealFile::AfterAttempts { attempts } => Self::AfterAttempts { attempts },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HintFile {
    text: String,
    reveal: RevealFile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StageFile {
    title: String,
    #[serde(default)]
    instructions: String,
    task: TaskFile,
    #[serde(default)]
    rules: Vec<RuleFile>,
    #[serde(default)]
    hints: Vec<HintFile>,
    #[serde(default)]
    placeable: Vec<KindFile>,
    #[serde(default)]
    estimated_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectFile {
    title: String,
    #[serde(default)]
    proximity_threshold: Option<Decimal>,
    #[serde(default)]
    signals: Vec<SignalFile>,
    #[serde(default)]
    wiring: Vec<WireFile>,
    #[serde(default)]
    initial: InitialFile,
    stages: Vec<StageFile>,
}

// ---------------------------------------------------------------------------
// Resolution: codes -> typed ids
// ---------------------------------------------------------------------------

impl ProjectFile {
    /// Assign typed ids to every catalog entry and resolve signal codes.
    fn resolve(self) -> Result<Project, CatalogError> {
        let signals: Vec<ControlSignal> = self
            .signals
            .into_iter()
            .map(|s| ControlSignal {
                id: SignalId::new(),
                name: s.name,
                code: s.code,
                group: s.group,
            })
            .collect();

        let by_code: BTreeMap<&str, SignalId> =
            signals.iter().map(|s| (s.code.as_str(), s.id)).collect();

        let lookup = |code: &str, context: &str| -> Result<SignalId, CatalogError> {
            by_code
                .get(code)
                .copied()
                .ok_or_else(|| CatalogError::UnknownSignalCode {
                    code: code.to_string(),
                    context: context.to_string(),
                })
        };

        let wiring = self
            .wiring
            .into_iter()
            .map(|w| {
                let required_signals = w
                    .signals
                    .iter()
                    .map(|code| lookup(code, "wiring rule"))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(WiringRule {
                    id: WireId::new(),
                    source_kind: w.source.into(),
                    dest_kind: w.dest.into(),
                    required_signals,
                    bus: w.bus.into(),
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let components = self
            .initial
            .components
            .into_iter()
            .map(|c| {
                let kind: ComponentKind = c.kind.into();
                let mut payload = ComponentPayload::initial_for(kind);
                if let Some(value) = c.value {
                    // Stateless kinds silently ignore a declared value.
                    let _ = payload.store(value);
                }
                InitialComponent {
                    id: ComponentId::new(),
                    kind,
                    position: Position::new(c.x, c.y),
                    payload,
                }
            })
            .collect();

        let active_signals = self
            .initial
            .signals
            .iter()
            .map(|code| lookup(code, "initial active signals"))
            .collect::<Result<Vec<_>, _>>()?;

        let stages = self
            .stages
            .into_iter()
            .map(|s| resolve_stage(s, &lookup))
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(Project {
            id: ProjectId::new(),
            title: self.title,
            stages,
            signals,
            wiring,
            initial_state: InitialState {
                components,
                active_signals,
            },
            proximity_threshold: self
                .proximity_threshold
                .unwrap_or_else(default_proximity_threshold),
        })
    }
}

/// Resolve one stage's task, rules, and hints.
fn resolve_stage(
    stage: StageFile,
    lookup: &impl Fn(&str, &str) -> Result<SignalId, CatalogError>,
) -> Result<Stage, CatalogError> {
    let task = match stage.task {
        TaskFile::PlaceComponent { kind } => Task::PlaceComponent { kind: kind.into() },
        TaskFile::SetSignals { settings } => Task::SetSignals {
            settings: settings
                .iter()
                .map(|s| {
                    Ok(SignalSetting {
                        signal: lookup(&s.signal, "stage task")?,
                        active: s.active,
                    })
                })
                .collect::<Result<Vec<_>, CatalogError>>()?,
        },
        TaskFile::TriggerClock => Task::TriggerClock,
        TaskFile::Observe => Task::Observe,
    };

    let rules = stage
        .rules
        .into_iter()
        .map(|r| {
            let check = match r.check {
                CheckFile::ComponentOfKind { kind, at_least } => {
                    RuleCheck::ComponentOfKind {
                        kind: kind.into(),
                        at_least,
                    }
                }
                CheckFile::SignalIs { signal, active } => RuleCheck::SignalIs {
                    signal: lookup(&signal, "stage rule")?,
                    active,
                },
                CheckFile::ClockAtLeast { cycles } => RuleCheck::ClockAtLeast { cycles },
                CheckFile::BusDriven { kind } => RuleCheck::BusDriven { kind: kind.into() },
                CheckFile::PathActiveBetween { source, dest } => {
                    RuleCheck::PathActiveBetween {
                        source_kind: source.into(),
                        dest_kind: dest.into(),
                    }
                }
                CheckFile::ValueEquals { kind, value } => RuleCheck::ValueEquals {
                    kind: kind.into(),
                    value,
                },
            };
            Ok(ValidationRule {
                id: RuleId::new(),
                message: r.message,
                check,
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    let hints = stage
        .hints
        .into_iter()
        .map(|h| Hint {
            id: HintId::new(),
            text: h.text,
            reveal: h.reveal.into(),
        })
        .collect();

    Ok(Stage {
        id: StageId::new(),
        title: stage.title,
        instructions: stage.instructions,
        task,
        rules,
        hints,
        placeable: stage.placeable.into_iter().map(Into::into).collect(),
        estimated_minutes: stage.estimated_minutes,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use wirelab_types::RevealCondition;

    use super::*;

    const MINIMAL_PROJECT: &str = r#"
title: Fetch Cycle
proximity_threshold: "2.0"
signals:
  - { name: Memory Read Enable, code: mem-read, group: memory }
  - { name: Register Load Enable, code: reg-load, group: register }
wiring:
  - source: memory
    dest: register
    signals: [mem-read, reg-load]
    bus: source-owns-bus
initial:
  components:
    - { kind: memory, x: "4.0", y: "0.0", value: 42 }
  signals: [mem-read]
stages:
  - title: Place a register
    instructions: Put a register on the surface.
    task: { type: place-component, kind: register }
    placeable: [register]
    estimated_minutes: 2
    rules:
      - message: Place at least one register.
        check: { type: component-of-kind, kind: register }
    hints:
      - text: Use the palette.
        reveal: { type: on-request }
      - text: Leave space around the memory cell.
        reveal: { type: after-attempts, attempts: 2 }
  - title: Observe
    task: { type: observe }
    rules:
      - message: The clock must have run.
        check: { type: clock-at-least, cycles: 1 }
"#;

    #[test]
    fn minimal_project_parses_and_resolves() {
        let project = parse_project(MINIMAL_PROJECT).unwrap();
        assert_eq!(project.title, "Fetch Cycle");
        assert_eq!(project.proximity_threshold, dec!(2.0));
        assert_eq!(project.stages.len(), 2);
        assert_eq!(project.signals.len(), 2);

        // Signal codes resolved to the catalog ids.
        let mem_read = project
            .signals
            .iter()
            .find(|s| s.code == "mem-read")
            .unwrap();
        let wire = project.wiring.first().unwrap();
        assert!(wire.required_signals.contains(&mem_read.id));
        assert_eq!(project.initial_state.active_signals, vec![mem_read.id]);

        // Declared value landed in the memory payload.
        let memory = project.initial_state.components.first().unwrap();
        assert_eq!(memory.payload.driven_value(), Some(42));
    }

    #[test]
    fn default_rule_count_threshold_is_one() {
        let project = parse_project(MINIMAL_PROJECT).unwrap();
        let stage = project.stages.first().unwrap();
        assert!(matches!(
            stage.rules.first().unwrap().check,
            RuleCheck::ComponentOfKind { at_least: 1, .. }
        ));
    }

    #[test]
    fn hint_reveals_resolve_to_conditions() {
        let project = parse_project(MINIMAL_PROJECT).unwrap();
        let stage = project.stages.first().unwrap();
        assert_eq!(stage.hints.len(), 2);
        assert_eq!(
            stage.hints.get(1).unwrap().reveal,
            RevealCondition::AfterAttempts { attempts: 2 }
        );
    }

    #[test]
    fn unknown_signal_code_is_rejected() {
        let yaml = MINIMAL_PROJECT.replace("signals: [mem-read]", "signals: [mem-write]");
        assert!(matches!(
            parse_project(&yaml),
            Err(CatalogError::UnknownSignalCode { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(matches!(
            parse_project("title: ["),
            Err(CatalogError::Yaml { .. })
        ));
    }

    #[test]
    fn missing_threshold_falls_back_to_default() {
        let yaml = MINIMAL_PROJECT.replace("proximity_threshold: \"2.0\"\n", "");
        let project = parse_project(&yaml).unwrap();
        assert_eq!(project.proximity_threshold, dec!(1.5));
    }
}
