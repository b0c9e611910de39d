//! Tokens and programs
//!
//! A program is a whitespace-separated stream of emoji tokens. Position 0
//! holds a sentinel so the first real token sits at position 1.

use crate::opcode::Instruction;
use crate::operand::Register;
use std::fmt;

/// Emoji presentation selector, ignored when classifying tokens
const VARIATION_SELECTOR: char = '\u{FE0F}';

pub const IMMEDIATE_END: &str = "✋";
pub const BLOCK_END: &str = "😐";
pub const MARKER_PREFIX: char = '🖋';
pub const TARGET_PREFIX: char = '💰';

/// One symbolic unit of a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unused slot at position 0
    Sentinel,
    Instruction(Instruction),
    Register(Register),
    Digit(u8),
    /// Closes a `load` literal
    ImmediateEnd,
    /// Closes a conditional block
    BlockEnd,
    /// Label marker, `🖋name`
    Marker(String),
    /// Jump target, `💰name`
    Target(String),
    /// Anything outside the alphabet, kept verbatim for diagnostics
    Unknown(String),
}

impl Token {
    /// Classifies a raw token
    pub fn classify(raw: &str) -> Self {
        let symbol = raw.trim_end_matches(VARIATION_SELECTOR);

        if let Some(ins) = Instruction::from_symbol(symbol) {
            return Token::Instruction(ins);
        }
        if let Some(reg) = Register::from_symbol(symbol) {
            return Token::Register(reg);
        }
        if let Some(name) = symbol.strip_prefix(MARKER_PREFIX) {
            return Token::Marker(name.trim_start_matches(VARIATION_SELECTOR).to_string());
        }
        if let Some(name) = symbol.strip_prefix(TARGET_PREFIX) {
            return Token::Target(name.trim_start_matches(VARIATION_SELECTOR).to_string());
        }

        match symbol {
            IMMEDIATE_END => Token::ImmediateEnd,
            BLOCK_END => Token::BlockEnd,
            _ => match symbol.as_bytes() {
                [d @ b'0'..=b'9'] => Token::Digit(d - b'0'),
                _ => Token::Unknown(raw.to_string()),
            },
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Sentinel => Ok(()),
            Token::Instruction(ins) => write!(f, "{}", ins.symbol()),
            Token::Register(reg) => write!(f, "{}", reg.symbol()),
            Token::Digit(d) => write!(f, "{}", d),
            Token::ImmediateEnd => write!(f, "{}", IMMEDIATE_END),
            Token::BlockEnd => write!(f, "{}", BLOCK_END),
            Token::Marker(name) => write!(f, "{}{}", MARKER_PREFIX, name),
            Token::Target(name) => write!(f, "{}{}", TARGET_PREFIX, name),
            Token::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Ordered token stream with the sentinel at position 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    tokens: Vec<Token>,
}

impl Program {
    /// Tokenizes program text. Empty text is a valid empty program.
    pub fn parse(source: &str) -> Self {
        Self::from_tokens(source.split_whitespace().map(Token::classify))
    }

    /// Builds a program from already classified tokens
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut all = vec![Token::Sentinel];
        all.extend(tokens);
        Self { tokens: all }
    }

    /// Length including the sentinel
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when nothing follows the sentinel
    pub fn is_empty(&self) -> bool {
        self.tokens.len() <= 1
    }

    pub fn get(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::from_tokens(std::iter::empty())
    }
}
