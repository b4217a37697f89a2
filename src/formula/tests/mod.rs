use crate::compiler::{FormulaCompiler, ParseError};
use crate::formula::{Bindings, Block, Expr, VariableNamespace};

mod builtins;
mod evaluation;
mod folding;
mod invariants;
mod precedence;

pub fn parse(source: &str) -> Expr {
    FormulaCompiler::default()
        .parse(source)
        .unwrap_or_else(|e| panic!("{source:?} failed to parse: {e}"))
}

pub fn parse_unfolded(source: &str) -> Expr {
    FormulaCompiler::default()
        .with_folding(false)
        .parse(source)
        .unwrap_or_else(|e| panic!("{source:?} failed to parse: {e}"))
}

pub fn parse_error(source: &str) -> ParseError {
    match FormulaCompiler::default().parse(source) {
        Ok(tree) => panic!("{source:?} unexpectedly parsed to {tree}"),
        Err(e) => e,
    }
}

/// Evaluates with every namespace variable bound to zero, except `vars`.
pub fn eval_with(source: &str, vars: &[(&str, Block)], block_len: usize) -> Block {
    let mut bindings: Bindings = VariableNamespace::standard().zeroed_bindings(block_len);
    for (name, values) in vars {
        bindings.insert(name.to_string(), values.clone());
    }
    parse(source).evaluate(&bindings, block_len)
}

pub fn eval(source: &str, block_len: usize) -> Block {
    eval_with(source, &[], block_len)
}
