//! Control-flow resolver
//!
//! Conditional blocks and label jumps are resolved by scanning the token
//! stream. No label table is built: every lookup is a linear scan and the
//! first matching marker wins.

use crate::error::{DecodeError, DecodeResult};
use crate::stack::Value;
use crate::token::{Program, Token};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How to decide a conditional block whose tested value is unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchPolicy {
    /// List the body, then continue after the terminator
    #[default]
    Enter,
    /// Skip to the first terminator
    Skip,
}

impl FromStr for BranchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enter" => Ok(BranchPolicy::Enter),
            "skip" => Ok(BranchPolicy::Skip),
            other => Err(format!("Invalid branch policy: {}", other)),
        }
    }
}

/// Conditional instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    IfZero,
    IfNotZero,
}

impl Condition {
    /// Whether the block body runs for the given top of stack
    pub fn holds(self, top: Value, policy: BranchPolicy) -> bool {
        match (self, top.is_zero()) {
            (Condition::IfZero, Some(zero)) => zero,
            (Condition::IfNotZero, Some(zero)) => !zero,
            (_, None) => policy == BranchPolicy::Enter,
        }
    }
}

impl Program {
    /// Position of the first block terminator at or after `from`. Nested
    /// blocks are not counted.
    pub fn find_first_endif(&self, from: usize) -> DecodeResult<usize> {
        self.tokens()
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, token)| matches!(token, Token::BlockEnd))
            .map(|(position, _)| position)
            .ok_or_else(|| DecodeError::out_of_bounds(self.len(), self.len()))
    }

    /// Position of the first marker named `label`
    pub fn find_marker(&self, label: &str) -> Option<usize> {
        self.tokens()
            .iter()
            .position(|token| matches!(token, Token::Marker(name) if name == label))
    }
}

/// Label name carried by the jump target at `position`
pub fn jump_target_at(program: &Program, position: usize) -> DecodeResult<&str> {
    match program.get(position) {
        Some(Token::Target(name)) => Ok(name.as_str()),
        Some(other) => Err(DecodeError::InvalidJumpTarget {
            token: other.to_string(),
            position,
        }),
        None => Err(DecodeError::out_of_bounds(position, program.len())),
    }
}

/// Cursor after jumping to `label`: one past its marker
pub fn resolve_label(program: &Program, label: &str, position: usize) -> DecodeResult<usize> {
    program
        .find_marker(label)
        .map(|marker| marker + 1)
        .ok_or_else(|| DecodeError::LabelNotFound {
            label: label.to_string(),
            position,
        })
}

/// Cursor after a computed return to `target`. Valid targets are real
/// token positions or the end of the program.
pub fn resolve_return(program: &Program, target: Value, position: usize) -> DecodeResult<usize> {
    let Value::Known(raw) = target else {
        return Err(DecodeError::UnresolvedReturn { position });
    };

    usize::try_from(raw)
        .ok()
        .filter(|cursor| (1..=program.len()).contains(cursor))
        .ok_or(DecodeError::OutOfBounds {
            position: raw,
            length: program.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_known() {
        let policy = BranchPolicy::Skip;
        assert!(Condition::IfZero.holds(Value::Known(0), policy));
        assert!(!Condition::IfZero.holds(Value::Known(5), policy));
        assert!(Condition::IfNotZero.holds(Value::Known(-1), policy));
        assert!(!Condition::IfNotZero.holds(Value::Known(0), policy));
    }

    #[test]
    fn test_condition_unknown_follows_policy() {
        assert!(Condition::IfZero.holds(Value::Unknown, BranchPolicy::Enter));
        assert!(Condition::IfNotZero.holds(Value::Unknown, BranchPolicy::Enter));
        assert!(!Condition::IfZero.holds(Value::Unknown, BranchPolicy::Skip));
        assert!(!Condition::IfNotZero.holds(Value::Unknown, BranchPolicy::Skip));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("enter".parse::<BranchPolicy>(), Ok(BranchPolicy::Enter));
        assert_eq!(" SKIP ".parse::<BranchPolicy>(), Ok(BranchPolicy::Skip));
        assert!("maybe".parse::<BranchPolicy>().is_err());
    }

    #[test]
    fn test_find_first_endif_ignores_nesting() {
        //                          1  2  3  4  5  6  7
        let program = Program::parse("😲 📤 😄 🍡 😐 🔪 😐");
        assert_eq!(program.find_first_endif(2).unwrap(), 5);
        assert_eq!(program.find_first_endif(6).unwrap(), 7);
        assert_eq!(program.find_first_endif(5).unwrap(), 5);
    }

    #[test]
    fn test_find_first_endif_missing() {
        let program = Program::parse("😲 📤 🍡");
        assert!(matches!(
            program.find_first_endif(2),
            Err(DecodeError::OutOfBounds { position: 4, length: 4 })
        ));
    }

    #[test]
    fn test_first_marker_wins() {
        let program = Program::parse("🖋a 📤 🖋b 🖋a");
        assert_eq!(program.find_marker("a"), Some(1));
        assert_eq!(program.find_marker("b"), Some(3));
        assert_eq!(program.find_marker("c"), None);
    }

    #[test]
    fn test_jump_target_at() {
        let program = Program::parse("🏀 💰end 🏀 📤");
        assert_eq!(jump_target_at(&program, 2).unwrap(), "end");
        assert!(matches!(
            jump_target_at(&program, 4),
            Err(DecodeError::InvalidJumpTarget { position: 4, .. })
        ));
    }

    #[test]
    fn test_resolve_label() {
        let program = Program::parse("📤 🖋top 🍡");
        assert_eq!(resolve_label(&program, "top", 1).unwrap(), 3);
        assert!(matches!(
            resolve_label(&program, "nope", 1),
            Err(DecodeError::LabelNotFound { position: 1, .. })
        ));
    }

    #[test]
    fn test_resolve_return_bounds() {
        let program = Program::parse("📤 📤 📤");
        assert_eq!(resolve_return(&program, Value::Known(2), 1).unwrap(), 2);
        assert_eq!(resolve_return(&program, Value::Known(4), 1).unwrap(), 4);
        assert!(matches!(
            resolve_return(&program, Value::Known(0), 1),
            Err(DecodeError::OutOfBounds { position: 0, .. })
        ));
        assert!(matches!(
            resolve_return(&program, Value::Known(-3), 1),
            Err(DecodeError::OutOfBounds { position: -3, .. })
        ));
        assert!(matches!(
            resolve_return(&program, Value::Known(5), 1),
            Err(DecodeError::OutOfBounds { position: 5, .. })
        ));
        assert!(matches!(
            resolve_return(&program, Value::Unknown, 3),
            Err(DecodeError::UnresolvedReturn { position: 3 })
        ));
    }
}
