//! Program loader

use crate::error::{DecodeError, DecodeResult};
use crate::token::Program;
use std::fs;
use std::path::Path;

/// Carregador de programas
pub struct ProgramLoader;

impl ProgramLoader {
    /// Reads and tokenizes a program file
    pub fn load_file(path: impl AsRef<Path>) -> DecodeResult<Program> {
        let source = fs::read_to_string(path.as_ref())
            .map_err(|_| DecodeError::FileNotFound(path.as_ref().display().to_string()))?;

        Ok(Self::load_source(&source))
    }

    pub fn load_source(source: &str) -> Program {
        Program::parse(source)
    }
}
