use crate::ast::{Ast, AstKind};
use crate::cocos::CocoError;

/// Walk a tree depth-first in document order, calling `visitor` on each node
/// before its children. Every node kind is matched explicitly so that a new
/// kind cannot be skipped by accident.
pub fn walk<'a, V>(node: &Ast<'a>, visitor: &mut V)
where
    V: FnMut(&Ast<'a>),
{
    visitor(node);

    match &node.kind {
        AstKind::CompilationUnit(unit) => {
            for neuron in &unit.neurons {
                walk(neuron, visitor);
            }
        }
        AstKind::Neuron(neuron) => {
            for block in &neuron.blocks {
                walk(block, visitor);
            }
        }
        AstKind::Block(block) => {
            for item in &block.items {
                walk(item, visitor);
            }
        }
        AstKind::Declaration(decl) => {
            for var in &decl.variables {
                walk(var, visitor);
            }
            if let Some(expression) = &decl.expression {
                walk(expression, visitor);
            }
        }
        AstKind::OdeEquation(eqn) => {
            walk(&eqn.lhs, visitor);
            walk(&eqn.rhs, visitor);
        }
        AstKind::OdeShape(shape) => {
            walk(&shape.lhs, visitor);
            walk(&shape.rhs, visitor);
        }
        AstKind::OdeFunction(func) => {
            walk(&func.rhs, visitor);
        }
        AstKind::Assignment(assign) => {
            walk(&assign.lhs, visitor);
            walk(&assign.rhs, visitor);
        }
        AstKind::Binop(binop) => {
            walk(&binop.left, visitor);
            walk(&binop.right, visitor);
        }
        AstKind::Monop(monop) => {
            walk(&monop.child, visitor);
        }
        AstKind::Call(call) => {
            for arg in &call.args {
                walk(arg, visitor);
            }
        }

        // leaves
        AstKind::InputLine(_)
        | AstKind::Output(_)
        | AstKind::Variable(_)
        | AstKind::Quantity(_) => {}
    }
}

/// Walk a neuron and everything below it. Fails if `node` is not a neuron.
pub fn visit_neuron<'a, V>(node: &Ast<'a>, visitor: &mut V) -> Result<(), CocoError>
where
    V: FnMut(&Ast<'a>),
{
    if node.as_neuron().is_none() {
        return Err(CocoError::InvalidInput {
            context: "Visitor",
            expected: "neuron",
            found: node.kind.name(),
        });
    }
    walk(node, visitor);
    Ok(())
}

pub fn node_count(node: &Ast) -> usize {
    let mut count = 0;
    walk(node, &mut |_| count += 1);
    count
}
