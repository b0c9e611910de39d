//! Operand decoder
//!
//! Parses the inline operands that follow `push`, `pop` and `load`. These
//! are pure functions of the program and a position; the caller owns the
//! cursor and moves it past whatever was consumed.

use crate::error::{DecodeError, DecodeResult};
use crate::stack::Value;
use crate::token::{Program, Token};
use serde::Serialize;

/// Register selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Register {
    /// 🥇
    Eax,
    /// 🥈
    Ebx,
}

impl Register {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "🥇" => Some(Register::Eax),
            "🥈" => Some(Register::Ebx),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Register::Eax => "🥇",
            Register::Ebx => "🥈",
        }
    }

    /// AT&T register name
    pub fn name(&self) -> &'static str {
        match self {
            Register::Eax => "%eax",
            Register::Ebx => "%ebx",
        }
    }

    fn index(self) -> usize {
        match self {
            Register::Eax => 0,
            Register::Ebx => 1,
        }
    }
}

/// What the decoder believes each register holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    values: [Value; 2],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            values: [Value::Unknown; 2],
        }
    }

    pub fn get(&self, reg: Register) -> Value {
        self.values[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: Value) {
        self.values[reg.index()] = value;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded `load` literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate {
    pub value: i64,
    /// Position of the terminator that closed the literal
    pub end: usize,
}

/// Reads the register selector at `position`
pub fn register_at(program: &Program, position: usize) -> DecodeResult<Register> {
    match program.get(position) {
        Some(Token::Register(reg)) => Ok(*reg),
        Some(other) => Err(DecodeError::UnknownOperand {
            token: other.to_string(),
            position,
        }),
        None => Err(DecodeError::out_of_bounds(position, program.len())),
    }
}

/// Reads digit tokens from `start` up to the immediate terminator,
/// accumulating `num = num * 10 + digit`
pub fn immediate_at(program: &Program, start: usize) -> DecodeResult<Immediate> {
    let mut value: i64 = 0;
    let mut position = start;

    loop {
        match program.get(position) {
            Some(Token::ImmediateEnd) => return Ok(Immediate { value, end: position }),
            Some(token @ Token::Digit(d)) => {
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(i64::from(*d)))
                    .ok_or_else(|| DecodeError::MalformedImmediate {
                        token: token.to_string(),
                        position,
                    })?;
            }
            Some(other) => {
                return Err(DecodeError::MalformedImmediate {
                    token: other.to_string(),
                    position,
                });
            }
            None => return Err(DecodeError::out_of_bounds(position, program.len())),
        }
        position += 1;
    }
}
