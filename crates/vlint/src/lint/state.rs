//! Per-module analysis tables

use crate::common::Span;
use std::collections::{HashMap, HashSet};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Parameters whose name contains this are treated as FSM state encodings
const STATE_MARKER: &str = "STATE";

/// The logic that last wrote a register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    /// The always block at this item position in the module body
    Always(usize),
    /// The continuous assignment at this item position in the module body
    Continuous(usize),
}

/// Everything the passes learn about one module. A fresh state is built
/// for every module; nothing is shared between analyses.
#[derive(Default)]
pub struct LintState {
    names: DefaultStringInterner,
    parameters: HashMap<DefaultSymbol, u64>,
    widths: HashMap<DefaultSymbol, u32>,
    drivers: HashMap<DefaultSymbol, Driver>,
    written: HashMap<DefaultSymbol, bool>,
    /// Tracked registers in declaration order
    registers: Vec<(DefaultSymbol, Span)>,
    state_candidates: Vec<(DefaultSymbol, Span)>,
    used_case_values: HashSet<DefaultSymbol>,
}

impl LintState {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, name: &str) -> DefaultSymbol {
        self.names.get_or_intern(name)
    }

    fn resolve(&self, symbol: DefaultSymbol) -> &str {
        self.names.resolve(symbol).unwrap_or_default()
    }

    pub fn define_parameter(&mut self, name: &str, value: u64) {
        let symbol = self.intern(name);
        self.parameters.insert(symbol, value);
    }

    pub fn parameter_value(&self, name: &str) -> Option<u64> {
        self.names.get(name).and_then(|s| self.parameters.get(&s).copied())
    }

    pub fn set_width(&mut self, name: &str, width: u32) {
        let symbol = self.intern(name);
        self.widths.insert(symbol, width);
    }

    pub fn width(&self, name: &str) -> Option<u32> {
        self.names.get(name).and_then(|s| self.widths.get(&s).copied())
    }

    /// Start tracking a register as not yet written
    pub fn declare_register(&mut self, name: &str, span: Span) {
        let symbol = self.intern(name);
        self.written.insert(symbol, false);
        if !self.registers.iter().any(|(s, _)| *s == symbol) {
            self.registers.push((symbol, span));
        }
    }

    /// Mark `name` written by `driver`. Returns true when a different
    /// driver had written it before; the new driver is recorded either way.
    pub fn record_write(&mut self, name: &str, driver: Driver) -> bool {
        let symbol = self.intern(name);
        self.written.insert(symbol, true);
        let previous = self.drivers.insert(symbol, driver);
        previous.is_some_and(|p| p != driver)
    }

    pub fn add_state_candidate(&mut self, name: &str, span: Span) {
        let symbol = self.intern(name);
        self.state_candidates.push((symbol, span));
    }

    pub fn mark_case_value_used(&mut self, name: &str) {
        let symbol = self.intern(name);
        self.used_case_values.insert(symbol);
    }

    /// State-like parameters never matched by a case arm, in declaration order
    pub fn unreachable_states(&self) -> Vec<(String, Span)> {
        self.state_candidates
            .iter()
            .filter(|(symbol, _)| !self.used_case_values.contains(symbol))
            .map(|&(symbol, span)| (self.resolve(symbol).to_string(), span))
            .filter(|(name, _)| name.contains(STATE_MARKER))
            .collect()
    }

    /// Tracked registers that were never written, in declaration order
    pub fn undriven_registers(&self) -> Vec<(String, Span)> {
        self.registers
            .iter()
            .filter(|(symbol, _)| self.written.get(symbol) == Some(&false))
            .map(|&(symbol, span)| (self.resolve(symbol).to_string(), span))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_write_reports_only_a_different_driver() {
        let mut state = LintState::new();

        assert!(!state.record_write("q", Driver::Always(0)));
        assert!(!state.record_write("q", Driver::Always(0)));
        assert!(state.record_write("q", Driver::Always(1)));
        // Last writer wins
        assert!(state.record_write("q", Driver::Always(0)));
        assert!(state.record_write("q", Driver::Continuous(0)));
    }

    #[test]
    fn test_undriven_registers_keep_declaration_order() {
        let mut state = LintState::new();
        state.declare_register("b", Span::new(0, 1));
        state.declare_register("a", Span::new(2, 3));
        state.declare_register("c", Span::new(4, 5));
        state.record_write("a", Driver::Always(0));

        let names: Vec<String> = state.undriven_registers().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn test_unreachable_states_use_name_heuristic() {
        let mut state = LintState::new();
        state.add_state_candidate("WIDTH", Span::default());
        state.add_state_candidate("STATE_IDLE", Span::default());
        state.add_state_candidate("STATE_HALT", Span::default());
        state.mark_case_value_used("STATE_IDLE");

        let names: Vec<String> = state.unreachable_states().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["STATE_HALT"]);
    }

    #[test]
    fn test_unknown_names_have_no_value_or_width() {
        let mut state = LintState::new();
        state.define_parameter("WIDTH", 8);
        state.set_width("q", 4);

        assert_eq!(state.parameter_value("WIDTH"), Some(8));
        assert_eq!(state.parameter_value("q"), None);
        assert_eq!(state.width("q"), Some(4));
        assert_eq!(state.width("missing"), None);
    }
}
