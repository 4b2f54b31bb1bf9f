use log::debug;

use crate::ast::{Ast, AstKind};
use crate::logger::{DiagnosticSink, Severity};
use crate::visitor::visit_neuron;

use super::{expect_neuron, neuron_message, CoCo, CocoError};

/// Every ODE equation must define a derivative: `V_m' = ...` is allowed,
/// `V_m = ...` inside an equations block is not. Shapes and functions are not
/// checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct CorrectOrderInEquation;

impl CorrectOrderInEquation {
    pub const NAME: &'static str = "CorrectOrderInEquation";
}

impl CoCo for CorrectOrderInEquation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_coco(&self, node: &Ast<'_>, sink: &dyn DiagnosticSink) -> Result<(), CocoError> {
        let neuron_name = expect_neuron(node, Self::NAME)?.name;
        debug!("{}: checking neuron {}", Self::NAME, neuron_name);
        visit_neuron(node, &mut |node| {
            if let AstKind::OdeEquation(eqn) = &node.kind {
                match eqn.lhs.as_variable() {
                    Some(lhs) if lhs.differential_order == 0 => {
                        let text = format!(
                            "Order of differential equation for {} at {} is not declared!",
                            lhs.name,
                            node.position_string()
                        );
                        sink.log_message(neuron_message(neuron_name, &text), Severity::Error);
                    }
                    _ => (),
                }
            }
        })
    }
}
