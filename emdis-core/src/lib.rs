//! # emdis-core — Emoji Bytecode Disassembler
//!
//! Decodes programs for a stack machine whose instructions are single emoji
//! tokens into the x86-style assembly a compiler for that machine would
//! emit.
//!
//! ## Fluxo
//!
//! ```text
//! program text
//!      ↓
//! ProgramLoader / Program::parse   (tokens, sentinel at position 0)
//!      ↓
//! Disassembler                     (cursor, opcode table, control flow)
//!      ↓
//! ListingWriter                    (text, JSON Lines, memory)
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use emdis_core::{disassemble, DecodeConfig, MemoryListing, Program};
//!
//! let program = Program::parse("🚛 🥇 1 2 3 ✋ 📥 🥇 ⌛");
//! let mut listing = MemoryListing::new();
//! disassemble(&program, &mut listing, &DecodeConfig::default()).unwrap();
//!
//! assert_eq!(listing.lines(), vec!["mov\t$123,%eax", "push\t%eax"]);
//! ```

pub mod config;
pub mod control;
pub mod disassembler;
pub mod error;
pub mod listing;
pub mod loader;
pub mod opcode;
pub mod operand;
pub mod stack;
pub mod token;

pub use config::DecodeConfig;
pub use control::{BranchPolicy, Condition};
pub use disassembler::{DecodeReport, Disassembler, Flow, Outcome, HALT_NOTICE};
pub use error::{DecodeError, DecodeResult};
pub use listing::{AsmLine, JsonListing, ListingEntry, ListingWriter, MemoryListing, TextListing};
pub use loader::ProgramLoader;
pub use opcode::{Instruction, OpcodeCategory};
pub use operand::{Register, Registers};
pub use stack::{BinaryOp, Value, WorkingStack};
pub use token::{Program, Token};

/// Decodes `program` into `writer`. On error the writer keeps whatever was
/// emitted before the failure.
pub fn disassemble<W: ListingWriter>(
    program: &Program,
    writer: W,
    config: &DecodeConfig,
) -> DecodeResult<DecodeReport> {
    Disassembler::new(program, writer, config).run()
}

/// Parses and decodes `source` into memory
pub fn disassemble_to_vec(
    source: &str,
    config: &DecodeConfig,
) -> DecodeResult<(Vec<ListingEntry>, DecodeReport)> {
    let program = Program::parse(source);
    let mut listing = MemoryListing::new();
    let report = disassemble(&program, &mut listing, config)?;
    Ok((listing.entries().to_vec(), report))
}
