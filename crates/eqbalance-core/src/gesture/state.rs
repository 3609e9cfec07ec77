//! Gesture state definitions.

use crate::fraction::Fraction;
use crate::term::TermId;
use std::fmt;

/// Which element of a term the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The single element of a constant term.
    Constant,
    /// The coefficient element of a variable term.
    Coefficient,
    /// The symbol element of a variable term.
    Symbol,
}

/// The phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// Pressed, still overlapping the equation.
    #[default]
    InitialTouch,
    /// Carried away from the equation.
    Separated,
    /// Hovering a term it would merge into.
    MergeCandidate {
        target: TermId,
        /// The target's value before the preview.
        original: Fraction,
    },
    /// Released before leaving the equation; nothing changed.
    TouchAborted,
    /// Dropped at a cursor slot.
    Committed,
    /// Dropped onto a merge target.
    MergeCommitted,
}

impl GesturePhase {
    /// Check if the gesture has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::TouchAborted | Self::Committed | Self::MergeCommitted
        )
    }

    /// Check if the term has left the equation.
    pub fn is_separated(&self) -> bool {
        matches!(self, Self::Separated | Self::MergeCandidate { .. })
    }

    /// Current merge target, if any.
    pub fn merge_target(&self) -> Option<TermId> {
        match self {
            Self::MergeCandidate { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::InitialTouch => "initial-touch",
            Self::Separated => "separated",
            Self::MergeCandidate { .. } => "merge-candidate",
            Self::TouchAborted => "touch-aborted",
            Self::Committed => "committed",
            Self::MergeCommitted => "merge-committed",
        }
    }
}

impl fmt::Display for GesturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_phase_helpers() {
        assert!(!GesturePhase::InitialTouch.is_terminal());
        assert!(!GesturePhase::InitialTouch.is_separated());
        assert!(GesturePhase::Separated.is_separated());
        assert!(GesturePhase::Committed.is_terminal());

        let target = Uuid::new_v4();
        let hover = GesturePhase::MergeCandidate {
            target,
            original: Fraction::ONE,
        };
        assert!(hover.is_separated());
        assert_eq!(hover.merge_target(), Some(target));
        assert_eq!(hover.to_string(), "merge-candidate");
        assert_eq!(GesturePhase::default(), GesturePhase::InitialTouch);
    }
}
