use std::collections::HashSet;

use log::debug;

use crate::ast::{Ast, AstKind};
use crate::logger::{DiagnosticSink, Severity};
use crate::visitor::visit_neuron;

use super::{expect_neuron, neuron_message, CoCo, CocoError};

/// Each kind of block may appear at most once in a neuron.
#[derive(Debug, Default, Clone, Copy)]
pub struct EachBlockUnique;

impl EachBlockUnique {
    pub const NAME: &'static str = "EachBlockUnique";
}

impl CoCo for EachBlockUnique {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_coco(&self, node: &Ast<'_>, sink: &dyn DiagnosticSink) -> Result<(), CocoError> {
        let neuron_name = expect_neuron(node, Self::NAME)?.name;
        debug!("{}: checking neuron {}", Self::NAME, neuron_name);
        let mut seen = HashSet::new();
        visit_neuron(node, &mut |node| {
            if let AstKind::Block(block) = &node.kind {
                if !seen.insert(block.kind) {
                    let text = format!(
                        "{} block not unique at {}!",
                        block.kind,
                        node.position_string()
                    );
                    sink.log_message(neuron_message(neuron_name, &text), Severity::Error);
                }
            }
        })
    }
}
