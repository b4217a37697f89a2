//! Block evaluation of formula trees.
//!
//! Every value is a 32-bit signed integer with two's-complement wraparound.
//! Division and modulo by zero yield zero, and shift amounts are reduced
//! modulo 16, element by element. None of these conditions is an error: an
//! audio callback must always get a full block back.

use std::collections::HashMap;

use super::expression::{Expression, Operation};

/// One value per sample of the block.
pub type Block = Vec<i32>;

/// Variable name to per-sample values, each exactly one block long.
pub type Bindings = HashMap<String, Block>;

/// Scalar kernel shared by folding and block evaluation.
pub type Kernel = fn(i32, i32) -> i32;

/// Shift amounts only ever use their low four bits.
#[inline]
pub fn shift_amount(rhs: i32) -> u32 {
    rhs.rem_euclid(16) as u32
}

fn divide(lhs: i32, rhs: i32) -> i32 {
    if rhs == 0 { 0 } else { lhs.wrapping_div(rhs) }
}

fn modulo(lhs: i32, rhs: i32) -> i32 {
    if rhs == 0 { 0 } else { lhs.wrapping_rem(rhs) }
}

fn shift_left(lhs: i32, rhs: i32) -> i32 {
    lhs << shift_amount(rhs)
}

fn shift_right(lhs: i32, rhs: i32) -> i32 {
    lhs >> shift_amount(rhs)
}

impl Operation {
    pub fn kernel(&self) -> Kernel {
        match self {
            Operation::Add => i32::wrapping_add,
            Operation::Subtract => i32::wrapping_sub,
            Operation::Multiply => i32::wrapping_mul,
            Operation::Divide => divide,
            Operation::Mod => modulo,
            Operation::And => |l, r| l & r,
            Operation::Or => |l, r| l | r,
            Operation::Xor => |l, r| l ^ r,
            Operation::ShiftLeft => shift_left,
            Operation::ShiftRight => shift_right,
        }
    }
}

/// Applies `op` to a single pair of values.
#[inline]
pub fn apply_scalar(op: Operation, lhs: i32, rhs: i32) -> i32 {
    op.kernel()(lhs, rhs)
}

fn combine_in_place(lhs: &mut [i32], rhs: &[i32], kernel: Kernel) {
    for (l, r) in lhs.iter_mut().zip(rhs) {
        *l = kernel(*l, *r);
    }
}

/// Evaluates `expression` over a block of `block_len` samples.
///
/// # Panics
///
/// When the tree references a variable that `bindings` does not provide.
/// Callers bind the whole variable namespace every block, so this only
/// happens on a broken caller.
pub fn evaluate(expression: &Expression, bindings: &Bindings, block_len: usize) -> Block {
    match expression {
        Expression::Constant(value) => vec![*value; block_len],
        Expression::Variable(name) => {
            let values = bindings
                .get(name)
                .unwrap_or_else(|| panic!("no binding supplied for variable {name}"));
            debug_assert_eq!(values.len(), block_len, "binding {name} has the wrong length");
            values.clone()
        }
        Expression::Binary(op, lhs, rhs) => {
            let mut result = evaluate(lhs, bindings, block_len);
            let rhs = evaluate(rhs, bindings, block_len);
            combine_in_place(&mut result, &rhs, op.kernel());
            result
        }
        Expression::Call(call) => call.builtin.call(&call.args, bindings, block_len),
    }
}

impl Expression {
    pub fn evaluate(&self, bindings: &Bindings, block_len: usize) -> Block {
        evaluate(self, bindings, block_len)
    }
}
