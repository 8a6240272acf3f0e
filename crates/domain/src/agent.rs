//! Agent — a user allowed to list houses.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationErrors, Violation};
use crate::id::{AgentId, UserId};

/// Allowed phone number length range, inclusive.
pub const PHONE_MIN_LEN: usize = 7;
pub const PHONE_MAX_LEN: usize = 15;

/// A registered agent. One user becomes at most one agent, and the
/// registration is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub user_id: UserId,
    pub phone_number: String,
}

/// Input shape for becoming an agent.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentInput {
    pub phone_number: String,
}

impl AgentInput {
    /// Collect every validation violation in this input.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        let len = self.phone_number.chars().count();
        if len == 0 {
            violations.push(Violation::Required {
                field: "phone_number",
            });
        } else if !(PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&len) {
            violations.push(Violation::Length {
                field: "phone_number",
                min: PHONE_MIN_LEN,
                max: PHONE_MAX_LEN,
            });
        }
        violations
    }

    /// Check the input, returning all violations at once on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every violated constraint.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_phone_number_within_range() {
        let input = AgentInput {
            phone_number: "+35988123456".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn should_reject_empty_phone_number() {
        let input = AgentInput {
            phone_number: String::new(),
        };
        let violations = input.violations();
        assert_eq!(
            violations,
            vec![Violation::Required {
                field: "phone_number"
            }]
        );
    }

    #[test]
    fn should_reject_too_short_phone_number() {
        let input = AgentInput {
            phone_number: "12345".to_string(),
        };
        assert!(matches!(
            input.violations().as_slice(),
            [Violation::Length { .. }]
        ));
    }

    #[test]
    fn should_reject_too_long_phone_number() {
        let input = AgentInput {
            phone_number: "1".repeat(16),
        };
        assert!(input.validate().is_err());
    }
}
