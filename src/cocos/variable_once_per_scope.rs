use std::collections::HashSet;

use log::debug;

use crate::ast::{Ast, AstKind};
use crate::logger::{DiagnosticSink, Severity};
use crate::visitor::visit_neuron;

use super::{expect_neuron, neuron_message, CoCo, CocoError};

/// A name is declared at most once per neuron, counting the declaration
/// blocks and the functions of the equations block.
#[derive(Debug, Default, Clone, Copy)]
pub struct VariableOncePerScope;

impl VariableOncePerScope {
    pub const NAME: &'static str = "VariableOncePerScope";
}

impl CoCo for VariableOncePerScope {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_coco(&self, node: &Ast<'_>, sink: &dyn DiagnosticSink) -> Result<(), CocoError> {
        let neuron_name = expect_neuron(node, Self::NAME)?.name;
        debug!("{}: checking neuron {}", Self::NAME, neuron_name);
        let mut declared = HashSet::new();
        let report = |name: &str, at: &Ast| {
            let text = format!("Variable '{}' defined twice at {}!", name, at.position_string());
            sink.log_message(neuron_message(neuron_name, &text), Severity::Error);
        };
        visit_neuron(node, &mut |node| match &node.kind {
            AstKind::Declaration(decl) => {
                for var_node in &decl.variables {
                    if let Some(var) = var_node.as_variable() {
                        if !declared.insert(var.name) {
                            report(var.name, var_node.as_ref());
                        }
                    }
                }
            }
            AstKind::OdeFunction(func) => {
                if !declared.insert(func.name) {
                    report(func.name, node);
                }
            }
            _ => (),
        })
    }
}
