use std::boxed::Box;
use std::fmt;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    State,
    InitialValues,
    Parameters,
    Internals,
    Equations,
    Input,
    Output,
    Update,
}

impl BlockKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::State => "state",
            BlockKind::InitialValues => "initial_values",
            BlockKind::Parameters => "parameters",
            BlockKind::Internals => "internals",
            BlockKind::Equations => "equations",
            BlockKind::Input => "input",
            BlockKind::Output => "output",
            BlockKind::Update => "update",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalType {
    Spike,
    Current,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignalType::Spike => write!(f, "spike"),
            SignalType::Current => write!(f, "current"),
        }
    }
}

/// Line/column range of a node in the source text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}:{};{}:{}]",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

#[derive(Debug)]
pub struct CompilationUnit<'a> {
    pub neurons: Vec<Box<Ast<'a>>>,
}

impl<'a> CompilationUnit<'a> {
    pub fn find_neuron(&self, name: &str) -> Option<&Ast<'a>> {
        self.neurons
            .iter()
            .map(|neuron| neuron.as_ref())
            .find(|neuron| matches!(neuron.as_neuron(), Some(n) if n.name == name))
    }
}

#[derive(Debug)]
pub struct Neuron<'a> {
    pub name: &'a str,
    pub blocks: Vec<Box<Ast<'a>>>,
}

impl<'a> Neuron<'a> {
    pub fn blocks_of_kind(&self, kind: BlockKind) -> impl Iterator<Item = &Block<'a>> {
        self.blocks.iter().filter_map(move |block| match &block.kind {
            AstKind::Block(block) if block.kind == kind => Some(block),
            _ => None,
        })
    }
}

#[derive(Debug)]
pub struct Block<'a> {
    pub kind: BlockKind,
    pub items: Vec<Box<Ast<'a>>>,
}

#[derive(Debug)]
pub struct Declaration<'a> {
    pub variables: Vec<Box<Ast<'a>>>,
    pub data_type: &'a str,
    pub expression: Option<Box<Ast<'a>>>,
}

#[derive(Debug)]
pub struct OdeEquation<'a> {
    pub lhs: Box<Ast<'a>>,
    pub rhs: Box<Ast<'a>>,
}

#[derive(Debug)]
pub struct OdeShape<'a> {
    pub lhs: Box<Ast<'a>>,
    pub rhs: Box<Ast<'a>>,
}

#[derive(Debug)]
pub struct OdeFunction<'a> {
    pub name: &'a str,
    pub data_type: &'a str,
    pub rhs: Box<Ast<'a>>,
}

#[derive(Debug)]
pub struct InputLine<'a> {
    pub name: &'a str,
    pub qualifiers: Vec<&'a str>,
    pub signal: SignalType,
}

#[derive(Debug)]
pub struct Output {
    pub signal: SignalType,
}

#[derive(Debug)]
pub struct Assignment<'a> {
    pub lhs: Box<Ast<'a>>,
    pub op: &'a str,
    pub rhs: Box<Ast<'a>>,
}

#[derive(Debug)]
pub struct Variable<'a> {
    pub name: &'a str,
    /// number of prime marks, `V_m` is 0, `V_m'` is 1
    pub differential_order: usize,
}

#[derive(Debug)]
pub struct Quantity<'a> {
    pub value: f64,
    pub unit: Option<&'a str>,
}

#[derive(Debug)]
pub struct Binop<'a> {
    pub op: &'a str,
    pub left: Box<Ast<'a>>,
    pub right: Box<Ast<'a>>,
}

#[derive(Debug)]
pub struct Monop<'a> {
    pub op: char,
    pub child: Box<Ast<'a>>,
}

#[derive(Debug)]
pub struct Call<'a> {
    pub fn_name: &'a str,
    pub args: Vec<Box<Ast<'a>>>,
}

#[derive(Debug)]
pub enum AstKind<'a> {
    CompilationUnit(CompilationUnit<'a>),
    Neuron(Neuron<'a>),
    Block(Block<'a>),
    Declaration(Declaration<'a>),
    OdeEquation(OdeEquation<'a>),
    OdeShape(OdeShape<'a>),
    OdeFunction(OdeFunction<'a>),
    InputLine(InputLine<'a>),
    Output(Output),
    Assignment(Assignment<'a>),
    Variable(Variable<'a>),
    Quantity(Quantity<'a>),
    Binop(Binop<'a>),
    Monop(Monop<'a>),
    Call(Call<'a>),
}

impl AstKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            AstKind::CompilationUnit(_) => "CompilationUnit",
            AstKind::Neuron(_) => "Neuron",
            AstKind::Block(_) => "Block",
            AstKind::Declaration(_) => "Declaration",
            AstKind::OdeEquation(_) => "OdeEquation",
            AstKind::OdeShape(_) => "OdeShape",
            AstKind::OdeFunction(_) => "OdeFunction",
            AstKind::InputLine(_) => "InputLine",
            AstKind::Output(_) => "Output",
            AstKind::Assignment(_) => "Assignment",
            AstKind::Variable(_) => "Variable",
            AstKind::Quantity(_) => "Quantity",
            AstKind::Binop(_) => "Binop",
            AstKind::Monop(_) => "Monop",
            AstKind::Call(_) => "Call",
        }
    }
}

#[derive(Debug)]
pub struct Ast<'a> {
    pub kind: AstKind<'a>,
    pub position: Option<SourcePosition>,
}

impl<'a> Ast<'a> {
    pub fn new(kind: AstKind<'a>, position: Option<SourcePosition>) -> Self {
        Self { kind, position }
    }

    pub fn as_neuron(&self) -> Option<&Neuron<'a>> {
        match &self.kind {
            AstKind::Neuron(neuron) => Some(neuron),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable<'a>> {
        match &self.kind {
            AstKind::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_compilation_unit(&self) -> Option<&CompilationUnit<'a>> {
        match &self.kind {
            AstKind::CompilationUnit(unit) => Some(unit),
            _ => None,
        }
    }

    /// renders the position for diagnostics, `[-]` when the node has none
    pub fn position_string(&self) -> String {
        match self.position {
            Some(position) => position.to_string(),
            None => "[-]".to_string(),
        }
    }
}

fn precedence(op: &str) -> u8 {
    match op {
        "+" | "-" => 1,
        "*" | "/" => 2,
        _ => 3,
    }
}

fn fmt_operand(f: &mut fmt::Formatter, child: &Ast, parent_op: &str, is_right: bool) -> fmt::Result {
    if let AstKind::Binop(binop) = &child.kind {
        let (child_prec, parent_prec) = (precedence(binop.op), precedence(parent_op));
        // `**` is right associative, everything else left
        let needs_parens = child_prec < parent_prec
            || (child_prec == parent_prec && is_right != (parent_op == "**"));
        if needs_parens {
            return write!(f, "({})", child);
        }
    }
    write!(f, "{}", child)
}

impl fmt::Display for Ast<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            AstKind::CompilationUnit(unit) => {
                write!(f, "{}", unit.neurons.iter().join("\n"))
            }
            AstKind::Neuron(neuron) => {
                writeln!(f, "neuron {}:", neuron.name)?;
                for block in &neuron.blocks {
                    writeln!(f, "{}", block)?;
                }
                write!(f, "end")
            }
            AstKind::Block(block) => match block.kind {
                BlockKind::Output => write!(f, "output: {}", block.items.iter().join(" ")),
                _ => {
                    writeln!(f, "{}:", block.kind)?;
                    for item in &block.items {
                        writeln!(f, "  {}", item)?;
                    }
                    write!(f, "end")
                }
            },
            AstKind::Declaration(decl) => {
                write!(f, "{} {}", decl.variables.iter().join(", "), decl.data_type)?;
                if let Some(expression) = &decl.expression {
                    write!(f, " = {}", expression)?;
                }
                Ok(())
            }
            AstKind::OdeEquation(eqn) => write!(f, "{} = {}", eqn.lhs, eqn.rhs),
            AstKind::OdeShape(shape) => write!(f, "shape {} = {}", shape.lhs, shape.rhs),
            AstKind::OdeFunction(func) => {
                write!(f, "function {} {} = {}", func.name, func.data_type, func.rhs)
            }
            AstKind::InputLine(line) => {
                write!(f, "{} <-", line.name)?;
                for qualifier in &line.qualifiers {
                    write!(f, " {}", qualifier)?;
                }
                write!(f, " {}", line.signal)
            }
            AstKind::Output(output) => write!(f, "{}", output.signal),
            AstKind::Assignment(assign) => write!(f, "{} {} {}", assign.lhs, assign.op, assign.rhs),
            AstKind::Variable(var) => {
                write!(f, "{}{}", var.name, "'".repeat(var.differential_order))
            }
            AstKind::Quantity(quantity) => {
                write!(f, "{}{}", quantity.value, quantity.unit.unwrap_or(""))
            }
            AstKind::Binop(binop) => {
                fmt_operand(f, &binop.left, binop.op, false)?;
                write!(f, " {} ", binop.op)?;
                fmt_operand(f, &binop.right, binop.op, true)
            }
            AstKind::Monop(monop) => match &monop.child.kind {
                AstKind::Binop(binop) if precedence(binop.op) == 1 => {
                    write!(f, "{}({})", monop.op, monop.child)
                }
                _ => write!(f, "{}{}", monop.op, monop.child),
            },
            AstKind::Call(call) => write!(f, "{}({})", call.fn_name, call.args.iter().join(", ")),
        }
    }
}
