use colored::Colorize;
use std::fmt;

use crate::error::{Result, TriggerError};

// KEY SINK INTERFACE ----------------------------------------------------------

/// One entry of the fixed output alphabet: a printable character key or the
/// spacebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySymbol {
    Char(char),
    Space,
}

impl KeySymbol {
    /// Parses a config-file key name. Accepts a single character or the
    /// literal `space` (case-insensitive).
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("space") {
            return Ok(KeySymbol::Space);
        }
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(KeySymbol::Char(c)),
            _ => Err(TriggerError::InvalidConfig(format!(
                "unrecognized key symbol '{}'",
                name
            ))),
        }
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySymbol::Char(c) => write!(f, "{}", c),
            KeySymbol::Space => write!(f, "space"),
        }
    }
}

/// Output action sink. The pipeline only ever asks for a single
/// press-then-release of one symbol; keyboard emulation proper lives behind
/// this trait.
pub trait KeySink {
    fn press_and_release(&mut self, symbol: KeySymbol) -> Result<()>;
}

// CONSOLE SINK ----------------------------------------------------------------

/// Sink that reports each emitted key on the terminal. Stands in for real
/// keyboard emulation during bench runs against the synthetic source.
pub struct ConsoleKeySink;

impl KeySink for ConsoleKeySink {
    fn press_and_release(&mut self, symbol: KeySymbol) -> Result<()> {
        println!("{} {}", ">> key".green().bold(), symbol.to_string().green());
        Ok(())
    }
}
