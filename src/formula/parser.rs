use pest::{Parser, iterators::Pair, pratt_parser::PrattParser};
use pest_derive::Parser;

use crate::compiler::ParseError;

use super::{
    builtins::BuiltinRegistry,
    expression::{Expr, Operation},
    namespace::VariableNamespace,
};

#[derive(Parser)]
#[grammar = "formula/formula.pest"]
pub struct FormulaGrammar;

lazy_static::lazy_static! {
    static ref FORMULA_PRATT_PARSER : PrattParser<Rule> = {
        use pest::pratt_parser::{Assoc::*, Op};
        use Rule::*;
        // Precedence is defined lowest to highest
        PrattParser::new()
            .op(Op::infix(xor, Left))
            .op(
                Op::infix(and, Left) |
                Op::infix(or, Left)
            )
            .op(
                Op::infix(add, Left) |
                Op::infix(subtract, Left)
            )
            .op(
                Op::infix(multiply, Left) |
                Op::infix(divide, Left) |
                Op::infix(modulo, Left)
            )
            .op(
                Op::infix(shift_left, Left) |
                Op::infix(shift_right, Left)
            )
    };
}

/// Deepest parenthesis nesting accepted, call parentheses included.
pub const MAX_NESTING: usize = 256;
/// Most grammar nodes a single formula may produce.
pub const MAX_PAIRS: usize = 4096;

/// Rejects text nested deeper than [`MAX_NESTING`] before the grammar
/// descends into it. Comments are skipped the way the grammar skips them.
fn check_nesting(text: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let (mut line, mut col) = (1, 0);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        col += 1;
        match c {
            '\n' => {
                line += 1;
                col = 0;
            }
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::at_line_col(
                        line,
                        col,
                        Rule::expression,
                        "Formula is nested too deeply.".to_owned(),
                    ));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|&c| c != '\n').is_some() {}
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                col += 1;
                let mut previous = '\0';
                for c in chars.by_ref() {
                    col += 1;
                    if c == '\n' {
                        line += 1;
                        col = 0;
                    }
                    if previous == '*' && c == '/' {
                        break;
                    }
                    previous = c;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn operation(rule: Rule) -> Operation {
    match rule {
        Rule::xor => Operation::Xor,
        Rule::and => Operation::And,
        Rule::or => Operation::Or,
        Rule::add => Operation::Add,
        Rule::subtract => Operation::Subtract,
        Rule::multiply => Operation::Multiply,
        Rule::divide => Operation::Divide,
        Rule::modulo => Operation::Mod,
        Rule::shift_left => Operation::ShiftLeft,
        Rule::shift_right => Operation::ShiftRight,
        rule => unreachable!("Not an operator: {rule:?}"),
    }
}

/// Turns formula text into a tree, checking names and argument counts
/// against the registry and namespace it was built with.
pub struct TreeBuilder<'a> {
    registry: &'a BuiltinRegistry,
    namespace: &'a VariableNamespace,
    folding: bool,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(registry: &'a BuiltinRegistry, namespace: &'a VariableNamespace, folding: bool) -> Self {
        TreeBuilder { registry, namespace, folding }
    }

    pub fn build(&self, text: &str) -> Result<Expr, ParseError> {
        check_nesting(text)?;
        let mut pairs = FormulaGrammar::parse(Rule::input, text)?;
        // Long operator chains build trees as deep as they are long.
        if let Some(pair) = pairs.clone().flatten().nth(MAX_PAIRS) {
            return Err(ParseError::at(
                &pair,
                Rule::expression,
                "Formula is too long.".to_owned(),
            ));
        }
        let expression = pairs
            .next()
            .and_then(|input| input.into_inner().next())
            .ok_or_else(|| ParseError::internal("Empty parse tree"))?;
        self.build_expression(expression)
    }

    fn build_expression(&self, pair: Pair<Rule>) -> Result<Expr, ParseError> {
        FORMULA_PRATT_PARSER
            .map_primary(|primary| self.build_atom(primary))
            .map_infix(|lhs, op, rhs| {
                let (lhs, rhs) = (lhs?, rhs?);
                Ok(self.binary(operation(op.as_rule()), lhs, rhs))
            })
            .parse(pair.into_inner())
    }

    fn build_atom(&self, pair: Pair<Rule>) -> Result<Expr, ParseError> {
        match pair.as_rule() {
            Rule::number => {
                let text = pair.as_str();
                let value = text.parse::<i32>().map_err(|_| {
                    ParseError::at(&pair, Rule::number, format!("Number {text} is out of range."))
                })?;
                Ok(Expr::constant(value))
            }
            Rule::variable => {
                let identifier = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| ParseError::internal("Variable without identifier"))?;
                let name = identifier.as_str();
                if !self.namespace.contains(name) {
                    return Err(ParseError::at(
                        &identifier,
                        Rule::variable,
                        format!("Unknown variable {name}."),
                    ));
                }
                Ok(Expr::variable(name))
            }
            Rule::function_call => self.build_call(pair),
            Rule::expression => self.build_expression(pair),
            rule => unreachable!("Unexpected atom: {rule:?}"),
        }
    }

    fn build_call(&self, pair: Pair<Rule>) -> Result<Expr, ParseError> {
        let call = pair.clone();
        let mut inner = pair.into_inner();
        let function_name = inner
            .next()
            .ok_or_else(|| ParseError::internal("Call without function name"))?;
        let name = function_name.as_str();
        let Some(builtin) = self.registry.get(name).copied() else {
            return Err(ParseError::at(
                &function_name,
                Rule::function_name,
                format!("Unknown function {name}."),
            ));
        };
        let args = inner
            .map(|arg| self.build_expression(arg))
            .collect::<Result<Vec<_>, _>>()?;
        if !builtin.arity.accepts(args.len()) {
            return Err(ParseError::at(
                &call,
                Rule::function_call,
                format!(
                    "The {name} function has an inappropriate number of parameters: {}.",
                    args.len()
                ),
            ));
        }
        Ok(if self.folding {
            Expr::call(name, builtin, args)
        } else {
            Expr::call_unfolded(name, builtin, args)
        })
    }

    fn binary(&self, op: Operation, lhs: Expr, rhs: Expr) -> Expr {
        if self.folding {
            Expr::binary(op, lhs, rhs)
        } else {
            Expr::binary_unfolded(op, lhs, rhs)
        }
    }
}
