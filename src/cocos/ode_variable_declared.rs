use std::collections::HashSet;

use log::debug;

use crate::ast::{Ast, AstKind, BlockKind};
use crate::logger::{DiagnosticSink, Severity};
use crate::visitor::visit_neuron;

use super::{expect_neuron, neuron_message, CoCo, CocoError};

/// The left-hand side of an ODE equation must be declared in the `state` or
/// `initial_values` block. The declaration may come after the equation.
#[derive(Debug, Default, Clone, Copy)]
pub struct OdeVariableDeclared;

impl OdeVariableDeclared {
    pub const NAME: &'static str = "OdeVariableDeclared";
}

impl CoCo for OdeVariableDeclared {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_coco(&self, node: &Ast<'_>, sink: &dyn DiagnosticSink) -> Result<(), CocoError> {
        let neuron = expect_neuron(node, Self::NAME)?;
        debug!("{}: checking neuron {}", Self::NAME, neuron.name);
        let state_variables: HashSet<&str> = [BlockKind::State, BlockKind::InitialValues]
            .into_iter()
            .flat_map(move |kind| neuron.blocks_of_kind(kind))
            .flat_map(|block| block.items.iter())
            .filter_map(|item| match &item.kind {
                AstKind::Declaration(decl) => Some(decl.variables.iter()),
                _ => None,
            })
            .flatten()
            .filter_map(|var| var.as_variable().map(|var| var.name))
            .collect();
        visit_neuron(node, &mut |node| {
            if let AstKind::OdeEquation(eqn) = &node.kind {
                if let Some(lhs) = eqn.lhs.as_variable() {
                    if !state_variables.contains(lhs.name) {
                        let text = format!(
                            "Ode equation lhs-variable '{}' at {} not declared in state or initial_values block!",
                            lhs.name,
                            node.position_string()
                        );
                        sink.log_message(neuron_message(neuron.name, &text), Severity::Error);
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Logger;
    use crate::parser::parse_nestml_string;

    fn check(text: &str) -> Vec<String> {
        let unit = parse_nestml_string(text).unwrap();
        let neuron = &unit.as_compilation_unit().unwrap().neurons[0];
        let logger = Logger::default();
        OdeVariableDeclared.check_coco(neuron, &logger).unwrap();
        logger.take().into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn declared_after_use() {
        let messages = check(
            "
            neuron n:
              equations:
                V_m' = -V_m
                g' = -g
              end
              state:
                V_m mV = 0mV
              end
              initial_values:
                g real = 0
              end
            end
            ",
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn parameters_do_not_count() {
        let messages = check(
            "
            neuron n:
              parameters:
                V_m mV = 0mV
              end
              equations:
                V_m' = -V_m
              end
            end
            ",
        );
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("[n.nestml] Ode equation lhs-variable 'V_m' at [7:17;"));
    }
}
