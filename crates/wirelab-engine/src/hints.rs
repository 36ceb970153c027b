//! The hint disclosure policy.
//!
//! Hints are gated by their declared reveal condition against the owning
//! stage's live counters. Once revealed, a hint stays revealed for the
//! lifetime of the project progress -- reveals survive simulation resets.

use wirelab_types::{Hint, HintAvailability, RevealCondition, Stage, StageProgress};

/// Whether a hint's reveal condition currently holds for a stage.
///
/// Does not consider reveal history; an already-revealed hint is reported
/// through [`availability`] instead.
#[must_use]
pub const fn condition_met(condition: RevealCondition, progress: &StageProgress) -> bool {
    match condition {
        RevealCondition::OnRequest => true,
        RevealCondition::OnError => matches!(progress.last_validation_passed, Some(false)),
        RevealCondition::AfterAttempts { attempts } => progress.attempts >= attempts,
    }
}

/// Whether the hint may be revealed right now (condition holds, or it has
/// already been revealed -- reveals are idempotent).
#[must_use]
pub fn is_revealable(hint: &Hint, progress: &StageProgress) -> bool {
    progress.revealed_hints.contains(&hint.id) || condition_met(hint.reveal, progress)
}

/// Disclosure state of every hint of a stage, in catalog order.
#[must_use]
pub fn availability(stage: &Stage, progress: &StageProgress) -> Vec<HintAvailability> {
    stage
        .hints
        .iter()
        .map(|hint| HintAvailability {
            hint: hint.id,
            revealable: is_revealable(hint, progress),
            revealed: progress.revealed_hints.contains(&hint.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use wirelab_types::{HintId, RevealCondition, StageProgress};

    use super::*;

    fn hint(reveal: RevealCondition) -> Hint {
        Hint {
            id: HintId::new(),
            text: String::from("test hint"),
            reveal,
        }
    }

    #[test]
    fn on_request_is_always_revealable() {
        let progress = StageProgress::current();
        assert!(is_revealable(&hint(RevealCondition::OnRequest), &progress));
    }

    #[test]
    fn on_error_needs_a_failed_validation_on_record() {
        let mut progress = StageProgress::current();
        let h = hint(RevealCondition::OnError);
        assert!(!is_revealable(&h, &progress));

        progress.last_validation_passed = Some(true);
        assert!(!is_revealable(&h, &progress));

        progress.last_validation_passed = Some(false);
        assert!(is_revealable(&h, &progress));
    }

    #[test]
    fn after_attempts_unlocks_at_the_threshold() {
        let mut progress = StageProgress::current();
        let h = hint(RevealCondition::AfterAttempts { attempts: 2 });

        progress.attempts = 1;
        assert!(!is_revealable(&h, &progress));

        progress.attempts = 2;
        assert!(is_revealable(&h, &progress));
    }

    #[test]
    fn revealed_hints_stay_revealable_regardless_of_condition() {
        let mut progress = StageProgress::current();
        let h = hint(RevealCondition::AfterAttempts { attempts: 5 });
        progress.revealed_hints.insert(h.id);
        assert!(is_revealable(&h, &progress));
    }
}
