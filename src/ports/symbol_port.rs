//! Instrument specification port trait.

use crate::domain::symbol::SymbolSpec;

pub trait SymbolInfoPort {
    /// `None` when the broker has no specification for `instrument`.
    fn get_symbol_spec(&self, instrument: &str) -> Option<SymbolSpec>;
}
