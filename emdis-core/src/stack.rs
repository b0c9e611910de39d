//! Abstract working stack
//!
//! Static decoding never sees real program values, so the stack holds
//! symbolic values. It starts from a configured seed and degrades to
//! [`Value::Unknown`] instead of failing when it runs dry.

use serde::Serialize;

/// A value on the working stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Value {
    Known(i64),
    Unknown,
}

impl Value {
    /// `Some(true)` for a known zero, `None` when unknown
    pub fn is_zero(self) -> Option<bool> {
        match self {
            Value::Known(v) => Some(v == 0),
            Value::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Value::Known(_))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Known(v)
    }
}

/// Pop-two, push-one transforms. The result is always `second ⊙ first`,
/// where `first` is the value popped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Multiply,
    /// Truncates toward zero
    Divide,
    /// Remainder takes the sign of the divisor
    Modulo,
    Xor,
}

impl BinaryOp {
    pub fn combine(self, second: Value, first: Value) -> Value {
        let (Value::Known(a), Value::Known(b)) = (second, first) else {
            return Value::Unknown;
        };

        let result = match self {
            BinaryOp::Multiply => a.checked_mul(b),
            BinaryOp::Divide => a.checked_div(b),
            BinaryOp::Modulo => floored_rem(a, b),
            BinaryOp::Xor => Some(a ^ b),
        };

        result.map_or(Value::Unknown, Value::Known)
    }
}

fn floored_rem(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        Some(r + b)
    } else {
        Some(r)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingStack {
    values: Vec<Value>,
}

impl WorkingStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack seeded bottom-first
    pub fn with_seed(seed: &[i64]) -> Self {
        Self {
            values: seed.iter().copied().map(Value::Known).collect(),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Value {
        self.values.pop().unwrap_or(Value::Unknown)
    }

    pub fn peek(&self) -> Value {
        self.values.last().copied().unwrap_or(Value::Unknown)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(a: i64, b: i64, op: BinaryOp) -> Value {
        op.combine(Value::Known(a), Value::Known(b))
    }

    #[test]
    fn test_operand_order() {
        // second popped is the left operand
        assert_eq!(known(20, 6, BinaryOp::Divide), Value::Known(3));
        assert_eq!(known(6, 20, BinaryOp::Divide), Value::Known(0));
    }

    #[test]
    fn test_divide_truncates() {
        assert_eq!(known(-7, 2, BinaryOp::Divide), Value::Known(-3));
        assert_eq!(known(7, -2, BinaryOp::Divide), Value::Known(-3));
    }

    #[test]
    fn test_modulo_follows_divisor() {
        assert_eq!(known(7, 3, BinaryOp::Modulo), Value::Known(1));
        assert_eq!(known(-7, 2, BinaryOp::Modulo), Value::Known(1));
        assert_eq!(known(7, -2, BinaryOp::Modulo), Value::Known(-1));
        assert_eq!(known(-6, 3, BinaryOp::Modulo), Value::Known(0));
    }

    #[test]
    fn test_multiply_and_xor() {
        assert_eq!(known(6, 7, BinaryOp::Multiply), Value::Known(42));
        assert_eq!(known(0b1100, 0b1010, BinaryOp::Xor), Value::Known(0b0110));
    }

    #[test]
    fn test_faults_degrade_to_unknown() {
        assert_eq!(known(1, 0, BinaryOp::Divide), Value::Unknown);
        assert_eq!(known(1, 0, BinaryOp::Modulo), Value::Unknown);
        assert_eq!(known(i64::MAX, 2, BinaryOp::Multiply), Value::Unknown);
        assert_eq!(
            BinaryOp::Xor.combine(Value::Unknown, Value::Known(1)),
            Value::Unknown
        );
    }

    #[test]
    fn test_empty_stack_is_unknown() {
        let mut stack = WorkingStack::new();
        assert_eq!(stack.peek(), Value::Unknown);
        assert_eq!(stack.pop(), Value::Unknown);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_seed_order() {
        let mut stack = WorkingStack::with_seed(&[1, 2, 3]);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.peek(), Value::Known(3));
        assert_eq!(stack.pop(), Value::Known(3));
        assert_eq!(stack.pop(), Value::Known(2));
    }
}
