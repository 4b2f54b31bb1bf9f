//! Context conditions: semantic checks run over a parsed neuron.
//!
//! A context condition (CoCo) walks one neuron with [`crate::visitor::visit_neuron`]
//! and reports every violation of its invariant to a [`DiagnosticSink`]. The
//! neuron name used in messages is a local of each invocation, so one CoCo
//! instance can be shared between threads and reused across neurons.

pub mod error;
pub use error::CocoError;

pub mod manager;
pub use manager::CoCosManager;

pub mod correct_order_in_equation;
pub use correct_order_in_equation::CorrectOrderInEquation;

pub mod each_block_unique;
pub use each_block_unique::EachBlockUnique;

pub mod ode_variable_declared;
pub use ode_variable_declared::OdeVariableDeclared;

pub mod variable_once_per_scope;
pub use variable_once_per_scope::VariableOncePerScope;

use crate::ast::{Ast, Neuron};
use crate::logger::DiagnosticSink;

pub trait CoCo: Send + Sync {
    fn name(&self) -> &'static str;

    /// Check one neuron. Violations go to `sink`; only a node that is not a
    /// neuron is an error.
    fn check_coco(&self, node: &Ast<'_>, sink: &dyn DiagnosticSink) -> Result<(), CocoError>;
}

pub fn expect_neuron<'b, 'a>(
    node: &'b Ast<'a>,
    context: &'static str,
) -> Result<&'b Neuron<'a>, CocoError> {
    node.as_neuron().ok_or(CocoError::InvalidInput {
        context,
        expected: "neuron",
        found: node.kind.name(),
    })
}

/// prefix shared by every context condition message
pub fn neuron_message(neuron_name: &str, text: &str) -> String {
    format!("[{}.nestml] {}", neuron_name, text)
}
