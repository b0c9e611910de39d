//! Listing sinks
//!
//! The decoder streams its output one entry at a time through a
//! [`ListingWriter`]; nothing beyond the current entry is buffered by the
//! core.

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// One emitted assembly line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsmLine {
    pub mnemonic: &'static str,
    pub operands: String,
}

impl AsmLine {
    pub fn new(mnemonic: &'static str, operands: impl Into<String>) -> Self {
        Self {
            mnemonic,
            operands: operands.into(),
        }
    }
}

impl fmt::Display for AsmLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.mnemonic, self.operands)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ListingEntry {
    Instruction(AsmLine),
    /// Character written by `print_top`
    Char(char),
    /// Out-of-band text such as the halt notice
    Notice(String),
}

/// Append-only sink for the listing
pub trait ListingWriter {
    fn instruction(&mut self, line: &AsmLine) -> io::Result<()>;

    /// Writes a printed character and flushes
    fn character(&mut self, ch: char) -> io::Result<()>;

    fn notice(&mut self, text: &str) -> io::Result<()>;
}

impl<W: ListingWriter + ?Sized> ListingWriter for &mut W {
    fn instruction(&mut self, line: &AsmLine) -> io::Result<()> {
        (**self).instruction(line)
    }

    fn character(&mut self, ch: char) -> io::Result<()> {
        (**self).character(ch)
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        (**self).notice(text)
    }
}

/// Plain text listing, one line per instruction
pub struct TextListing<W: Write> {
    out: W,
    // printed characters leave the output mid-line
    mid_line: bool,
}

impl<W: Write> TextListing<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            mid_line: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &dyn fmt::Display) -> io::Result<()> {
        if self.mid_line {
            writeln!(self.out)?;
            self.mid_line = false;
        }
        writeln!(self.out, "{}", text)
    }
}

impl<W: Write> ListingWriter for TextListing<W> {
    fn instruction(&mut self, line: &AsmLine) -> io::Result<()> {
        self.line(line)
    }

    fn character(&mut self, ch: char) -> io::Result<()> {
        write!(self.out, "{}", ch)?;
        self.mid_line = ch != '\n';
        self.out.flush()
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        self.line(&text)?;
        self.out.flush()
    }
}

/// JSON Lines listing, one object per entry
pub struct JsonListing<W: Write> {
    out: W,
}

impl<W: Write> JsonListing<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn entry(&mut self, entry: &ListingEntry) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, entry)?;
        writeln!(self.out)
    }
}

impl<W: Write> ListingWriter for JsonListing<W> {
    fn instruction(&mut self, line: &AsmLine) -> io::Result<()> {
        self.entry(&ListingEntry::Instruction(line.clone()))
    }

    fn character(&mut self, ch: char) -> io::Result<()> {
        self.entry(&ListingEntry::Char(ch))?;
        self.out.flush()
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        self.entry(&ListingEntry::Notice(text.to_string()))
    }
}

/// Collects entries in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryListing {
    entries: Vec<ListingEntry>,
}

impl MemoryListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }

    /// Rendered instruction lines, in order
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ListingEntry::Instruction(line) => Some(line.to_string()),
                _ => None,
            })
            .collect()
    }

    /// Everything written by `print_top`
    pub fn printed(&self) -> String {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ListingEntry::Char(ch) => Some(*ch),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ListingEntry::Notice(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ListingWriter for MemoryListing {
    fn instruction(&mut self, line: &AsmLine) -> io::Result<()> {
        self.entries.push(ListingEntry::Instruction(line.clone()));
        Ok(())
    }

    fn character(&mut self, ch: char) -> io::Result<()> {
        self.entries.push(ListingEntry::Char(ch));
        Ok(())
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        self.entries.push(ListingEntry::Notice(text.to_string()));
        Ok(())
    }
}
