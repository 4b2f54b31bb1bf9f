#![allow(clippy::empty_docs)]
#[derive(Parser)]
#[grammar = "parser/nestml_grammar.pest"] // relative to src
pub struct NestmlParser;

use pest::error::Error;
use pest::iterators::Pair;
use pest::Parser;
use std::boxed::Box;

use crate::ast;
use crate::ast::Ast;
use crate::ast::AstKind;
use crate::ast::BlockKind;
use crate::ast::SignalType;
use crate::ast::SourcePosition;

// rules that end in a repetition also consume the whitespace and comments
// after them, so these are cut off the end of the span
fn trim_span(text: &str) -> &str {
    let mut text = text.trim_end();
    loop {
        let line_start = text.rfind('\n').map_or(0, |i| i + 1);
        match text[line_start..].find('#') {
            Some(comment) => text = text[..line_start + comment].trim_end(),
            None => return text,
        }
    }
}

fn position(pair: &Pair<Rule>) -> Option<SourcePosition> {
    let span = pair.as_span();
    let (start_line, start_column) = span.start_pos().line_col();
    let text = trim_span(span.as_str());
    let (end_line, end_column) = match text.rfind('\n') {
        Some(i) => (
            start_line + text.matches('\n').count(),
            text[i + 1..].chars().count() + 1,
        ),
        None => (start_line, start_column + text.chars().count()),
    };
    Some(SourcePosition {
        start_line,
        start_column,
        end_line,
        end_column,
    })
}

fn merge_positions(
    start: Option<SourcePosition>,
    end: Option<SourcePosition>,
) -> Option<SourcePosition> {
    match (start, end) {
        (Some(start), Some(end)) => Some(SourcePosition {
            start_line: start.start_line,
            start_column: start.start_column,
            end_line: end.end_line,
            end_column: end.end_column,
        }),
        _ => start.or(end),
    }
}

//sign       = @{ "-" | "+" }
fn parse_sign(pair: Pair<Rule>) -> char {
    *pair
        .as_str()
        .chars()
        .collect::<Vec<char>>()
        .first()
        .unwrap()
}

//name       = @{ !keyword ~ identifier }
fn parse_name(pair: Pair<Rule>) -> &str {
    pair.as_str()
}

//signal_type = @{ "spike" | "current" }
fn parse_signal_type(pair: Pair<Rule>) -> SignalType {
    match pair.as_str() {
        "spike" => SignalType::Spike,
        "current" => SignalType::Current,
        _ => unreachable!("{:?}", pair.to_string()),
    }
}

fn block_kind(rule: Rule) -> BlockKind {
    match rule {
        Rule::state_block => BlockKind::State,
        Rule::initial_values_block => BlockKind::InitialValues,
        Rule::parameters_block => BlockKind::Parameters,
        Rule::internals_block => BlockKind::Internals,
        Rule::equations_block => BlockKind::Equations,
        Rule::input_block => BlockKind::Input,
        Rule::output_block => BlockKind::Output,
        Rule::update_block => BlockKind::Update,
        _ => unreachable!("{:?} is not a block", rule),
    }
}

fn parse_binops<'a, I>(head: Ast<'a>, inner: &mut std::iter::Peekable<I>) -> Ast<'a>
where
    I: Iterator<Item = Pair<'a, Rule>>,
{
    let mut head = head;
    while inner.peek().is_some() {
        let op = inner.next().unwrap().as_str();
        let rhs = parse_value(inner.next().unwrap());
        let position = merge_positions(head.position, rhs.position);
        head = Ast::new(
            AstKind::Binop(ast::Binop {
                op,
                left: Box::new(head),
                right: Box::new(rhs),
            }),
            position,
        );
    }
    head
}

fn parse_value(pair: Pair<'_, Rule>) -> Ast<'_> {
    let position = position(&pair);
    match pair.as_rule() {
        // neuron = { "neuron" ~ name ~ ":" ~ block* ~ "end" }
        Rule::neuron => {
            let mut inner = pair.into_inner();
            let name = parse_name(inner.next().unwrap());
            let blocks = inner.map(parse_value).map(Box::new).collect();
            Ast::new(AstKind::Neuron(ast::Neuron { name, blocks }), position)
        }

        // state_block = { "state" ~ ":" ~ declaration* ~ "end" }, and so on for each block kind
        Rule::state_block
        | Rule::initial_values_block
        | Rule::parameters_block
        | Rule::internals_block
        | Rule::equations_block
        | Rule::input_block
        | Rule::output_block
        | Rule::update_block => {
            let kind = block_kind(pair.as_rule());
            let items = pair.into_inner().map(parse_value).map(Box::new).collect();
            Ast::new(AstKind::Block(ast::Block { kind, items }), position)
        }

        // declaration = { variable ~ ("," ~ variable)* ~ data_type ~ ("=" ~ expression)? }
        Rule::declaration => {
            let mut inner = pair.into_inner().peekable();
            let mut variables = Vec::new();
            while inner.peek().unwrap().as_rule() == Rule::variable {
                variables.push(Box::new(parse_value(inner.next().unwrap())));
            }
            let data_type = inner.next().unwrap().as_str();
            let expression = inner.next().map(parse_value).map(Box::new);
            Ast::new(
                AstKind::Declaration(ast::Declaration {
                    variables,
                    data_type,
                    expression,
                }),
                position,
            )
        }

        // ode_equation = { variable ~ "=" ~ expression }
        Rule::ode_equation => {
            let mut inner = pair.into_inner();
            Ast::new(
                AstKind::OdeEquation(ast::OdeEquation {
                    lhs: Box::new(parse_value(inner.next().unwrap())),
                    rhs: Box::new(parse_value(inner.next().unwrap())),
                }),
                position,
            )
        }

        // ode_shape = { "shape" ~ variable ~ "=" ~ expression }
        Rule::ode_shape => {
            let mut inner = pair.into_inner();
            Ast::new(
                AstKind::OdeShape(ast::OdeShape {
                    lhs: Box::new(parse_value(inner.next().unwrap())),
                    rhs: Box::new(parse_value(inner.next().unwrap())),
                }),
                position,
            )
        }

        // ode_function = { "function" ~ name ~ data_type ~ "=" ~ expression }
        Rule::ode_function => {
            let mut inner = pair.into_inner();
            let name = parse_name(inner.next().unwrap());
            let data_type = inner.next().unwrap().as_str();
            Ast::new(
                AstKind::OdeFunction(ast::OdeFunction {
                    name,
                    data_type,
                    rhs: Box::new(parse_value(inner.next().unwrap())),
                }),
                position,
            )
        }

        // input_line = { name ~ "<-" ~ input_qualifier* ~ signal_type }
        Rule::input_line => {
            let mut inner = pair.into_inner().peekable();
            let name = parse_name(inner.next().unwrap());
            let mut qualifiers = Vec::new();
            while inner.peek().unwrap().as_rule() == Rule::input_qualifier {
                qualifiers.push(inner.next().unwrap().as_str());
            }
            let signal = parse_signal_type(inner.next().unwrap());
            Ast::new(
                AstKind::InputLine(ast::InputLine {
                    name,
                    qualifiers,
                    signal,
                }),
                position,
            )
        }

        // output_block = { "output" ~ ":" ~ signal_type }
        Rule::signal_type => Ast::new(
            AstKind::Output(ast::Output {
                signal: parse_signal_type(pair),
            }),
            position,
        ),

        // assignment = { variable ~ assign_op ~ expression }
        Rule::assignment => {
            let mut inner = pair.into_inner();
            let lhs = Box::new(parse_value(inner.next().unwrap()));
            let op = inner.next().unwrap().as_str();
            let rhs = Box::new(parse_value(inner.next().unwrap()));
            Ast::new(AstKind::Assignment(ast::Assignment { lhs, op, rhs }), position)
        }

        // variable = ${ name ~ differential_order }
        Rule::variable => {
            let mut inner = pair.into_inner();
            let name = parse_name(inner.next().unwrap());
            let differential_order = inner.next().map_or(0, |primes| primes.as_str().len());
            Ast::new(
                AstKind::Variable(ast::Variable {
                    name,
                    differential_order,
                }),
                position,
            )
        }

        // quantity = ${ real ~ unit? }
        Rule::quantity => {
            let mut inner = pair.into_inner();
            let value = inner.next().unwrap().as_str().parse().unwrap();
            let unit = inner.next().map(|unit| unit.as_str());
            Ast::new(AstKind::Quantity(ast::Quantity { value, unit }), position)
        }

        // call = { name ~ "(" ~ (expression ~ ("," ~ expression)*)? ~ ")" }
        Rule::call => {
            let mut inner = pair.into_inner();
            Ast::new(
                AstKind::Call(ast::Call {
                    fn_name: parse_name(inner.next().unwrap()),
                    args: inner.map(parse_value).map(Box::new).collect(),
                }),
                position,
            )
        }

        // expression = { sign? ~ term ~ (term_op ~ term)* }
        Rule::expression => {
            let mut inner = pair.into_inner().peekable();
            let sign = if inner.peek().unwrap().as_rule() == Rule::sign {
                Some(parse_sign(inner.next().unwrap()))
            } else {
                None
            };
            let head_term = match sign {
                Some(op) => {
                    let child = parse_value(inner.next().unwrap());
                    let child_position = child.position;
                    Ast::new(
                        AstKind::Monop(ast::Monop {
                            op,
                            child: Box::new(child),
                        }),
                        merge_positions(position, child_position),
                    )
                }
                None => parse_value(inner.next().unwrap()),
            };
            parse_binops(head_term, &mut inner)
        }

        // term = { factor ~ (factor_op ~ factor)* }
        Rule::term => {
            let mut inner = pair.into_inner().peekable();
            let head_factor = parse_value(inner.next().unwrap());
            parse_binops(head_factor, &mut inner)
        }

        // factor = { atom ~ (power_op ~ factor)? }
        Rule::factor => {
            let mut inner = pair.into_inner().peekable();
            let base = parse_value(inner.next().unwrap());
            parse_binops(base, &mut inner)
        }

        _ => unreachable!("{:?}", pair.to_string()),
    }
}

pub fn parse_string(text: &str) -> Result<Ast<'_>, Box<Error<Rule>>> {
    let main = NestmlParser::parse(Rule::main, text)?.next().unwrap();
    let position = position(&main);
    let neurons = main
        .into_inner()
        .take_while(|pair| pair.as_rule() != Rule::EOI)
        .map(parse_value)
        .map(Box::new)
        .collect();
    Ok(Ast::new(
        AstKind::CompilationUnit(ast::CompilationUnit { neurons }),
        position,
    ))
}
