//! Module-level orchestration of the lint passes
//!
//! A module is analyzed in four ordered passes:
//! 1. Parameters: FSM state candidates and constant values
//! 2. Ports: declared widths, output registers to track
//! 3. Body items: always blocks, inline declarations, continuous assignments
//! 4. Post-pass: unreachable FSM states, registers never driven

use log::{debug, trace};

use super::state::{Driver, LintState};
use super::stmt::BlockContext;
use super::violation::{Violation, ViolationKind};
use crate::common::Span;
use crate::frontend::verilog::ast::{Module, ModuleItem, PortDirection, SignalDecl};

/// Analyzer for a single module. Consumed by [`Linter::analyze_module`],
/// so every module gets fresh tables.
#[derive(Default)]
pub struct Linter {
    pub(super) state: LintState,
    violations: Vec<Violation>,
}

impl Linter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every pass over `module` and return the violations in discovery order
    pub fn analyze_module(mut self, module: &Module) -> Vec<Violation> {
        debug!("linting module {}", module.name);

        self.seed_declarations(module);

        for (index, item) in module.items.iter().enumerate() {
            match item {
                ModuleItem::Always(block) => {
                    let ctx = BlockContext {
                        driver: Driver::Always(index),
                        combinational: block.is_combinational(),
                    };
                    trace!(
                        "always block at item {} ({})",
                        index,
                        if ctx.combinational { "combinational" } else { "sequential" }
                    );
                    self.analyze_stmt(&block.body, ctx);
                }
                ModuleItem::Signal(decl) => self.declare_signals(decl),
                ModuleItem::Assign(assign) => {
                    let rhs = self.evaluate(&assign.rhs);
                    self.check_assignment_target(
                        &assign.lhs,
                        rhs,
                        Driver::Continuous(index),
                        assign.span,
                    );
                }
            }
        }

        self.check_state_coverage();
        self.check_undriven_registers();

        debug!(
            "module {}: {} violation(s)",
            module.name,
            self.violations.len()
        );
        self.violations
    }

    /// Passes 1 and 2: parameter values and port widths
    pub(super) fn seed_declarations(&mut self, module: &Module) {
        for parameter in &module.parameters {
            self.state.add_state_candidate(&parameter.name, parameter.span);
            if let Some(value) = self.evaluate(&parameter.value).value {
                self.state.define_parameter(&parameter.name, value);
            }
        }

        for port in &module.ports {
            let width = self.range_width(port.range.as_ref());
            self.state.set_width(&port.name, width);
            if port.is_reg && port.direction == PortDirection::Output {
                self.state.declare_register(&port.name, port.span);
            }
        }
    }

    fn declare_signals(&mut self, decl: &SignalDecl) {
        let width = self.range_width(decl.range.as_ref());
        for (name, span) in &decl.names {
            self.state.set_width(name, width);
            if decl.is_reg {
                self.state.declare_register(name, *span);
            }
        }
    }

    fn check_state_coverage(&mut self) {
        for (name, span) in self.state.unreachable_states() {
            self.report(
                ViolationKind::UnreachableState,
                format!(
                    "Unreachable Finite State Machine State: Parameter '{}' never used.",
                    name
                ),
                span,
            );
        }
    }

    fn check_undriven_registers(&mut self) {
        for (name, span) in self.state.undriven_registers() {
            self.report(
                ViolationKind::UninitializedRegister,
                format!("Un-initialized Register: '{}' declared but never driven.", name),
                span,
            );
        }
    }

    pub(super) fn report(&mut self, kind: ViolationKind, message: impl Into<String>, span: Span) {
        let violation = Violation::new(kind, message, span);
        trace!("{} at {:?}: {}", kind.code(), span, violation);
        self.violations.push(violation);
    }

    #[cfg(test)]
    pub(super) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
