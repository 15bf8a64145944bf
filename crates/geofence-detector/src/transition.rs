//! Two-state membership machine and transition classification

use geofence_core::models::{EventType, RuleType};
use serde::{Deserialize, Serialize};

/// Membership of one vehicle relative to one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    #[default]
    Outside,
    Inside,
}

impl From<bool> for Membership {
    fn from(inside: bool) -> Self {
        if inside {
            Membership::Inside
        } else {
            Membership::Outside
        }
    }
}

/// A change of membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Entry,
    Exit,
}

impl Transition {
    /// Diff two membership states; `None` when nothing changed
    pub fn between(previous: Membership, current: Membership) -> Option<Self> {
        match (previous, current) {
            (Membership::Outside, Membership::Inside) => Some(Transition::Entry),
            (Membership::Inside, Membership::Outside) => Some(Transition::Exit),
            _ => None,
        }
    }

    /// Event type for this transition under a zone rule
    pub fn event_type(self, rule: RuleType) -> EventType {
        match self {
            Transition::Entry => EventType::for_entry(rule),
            Transition::Exit => EventType::for_exit(rule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between() {
        use Membership::*;

        assert_eq!(Transition::between(Outside, Inside), Some(Transition::Entry));
        assert_eq!(Transition::between(Inside, Outside), Some(Transition::Exit));
        assert_eq!(Transition::between(Inside, Inside), None);
        assert_eq!(Transition::between(Outside, Outside), None);
    }

    #[test]
    fn test_alerting_transitions() {
        // (rule, transition, alerts)
        let table = [
            (RuleType::Standard, Transition::Entry, false),
            (RuleType::Standard, Transition::Exit, false),
            (RuleType::Forbidden, Transition::Entry, true),
            (RuleType::Forbidden, Transition::Exit, false),
            (RuleType::StayIn, Transition::Entry, false),
            (RuleType::StayIn, Transition::Exit, true),
        ];

        for (rule, transition, alerts) in table {
            assert_eq!(
                transition.event_type(rule).is_violation(),
                alerts,
                "{:?} under {}",
                transition,
                rule
            );
        }
    }
}
