//! Node construction with eager constant folding.
//!
//! Every tree the parser hands out is built through [`Expr::binary`] and
//! [`Expr::call`], so no operation or call in it ever has only constant
//! operands: those collapse into a single constant on the spot. The
//! `_unfolded` constructors skip this and exist to compare folded results
//! against plain evaluation.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Rem, Shl, Shr, Sub};

use super::{
    builtins::Builtin,
    evaluate::{Bindings, apply_scalar, shift_amount},
    expression::{Expr, Expression, FunctionCall, Operation},
};

impl Expr {
    /// Builds `lhs op rhs`, folding constants and algebraic identities.
    pub fn binary(op: Operation, lhs: Expr, rhs: Expr) -> Expr {
        if let (Some(l), Some(r)) = (lhs.constant_value(), rhs.constant_value()) {
            return Expr::constant(apply_scalar(op, l, r));
        }
        match identity(op, &lhs, &rhs) {
            Some(Simplified::Left) => lhs,
            Some(Simplified::Right) => rhs,
            Some(Simplified::Zero) => Expr::constant(0),
            None => Expr::binary_unfolded(op, lhs, rhs),
        }
    }

    pub fn binary_unfolded(op: Operation, lhs: Expr, rhs: Expr) -> Expr {
        Expression::Binary(op, lhs, rhs).into()
    }

    /// Builds a call, evaluating it once right away when every argument is
    /// constant. A call without arguments counts as constant too, which
    /// freezes `rand()` to the single value drawn here.
    pub fn call<S: Into<String>>(name: S, builtin: Builtin, args: Vec<Expr>) -> Expr {
        if args.iter().all(|arg| arg.is_constant()) {
            let value = builtin.call(&args, &Bindings::new(), 1);
            return Expr::constant(value[0]);
        }
        Expr::call_unfolded(name, builtin, args)
    }

    pub fn call_unfolded<S: Into<String>>(name: S, builtin: Builtin, args: Vec<Expr>) -> Expr {
        Expression::Call(FunctionCall { name: name.into(), builtin, args }).into()
    }
}

enum Simplified {
    Left,
    Right,
    Zero,
}

fn identity(op: Operation, lhs: &Expr, rhs: &Expr) -> Option<Simplified> {
    let l = lhs.constant_value();
    let r = rhs.constant_value();
    match op {
        Operation::Add | Operation::Or | Operation::Xor => {
            if l == Some(0) {
                Some(Simplified::Right)
            } else if r == Some(0) {
                Some(Simplified::Left)
            } else {
                None
            }
        }
        Operation::Subtract => (r == Some(0)).then_some(Simplified::Left),
        Operation::Multiply | Operation::And | Operation::Divide | Operation::Mod => {
            (l == Some(0) || r == Some(0)).then_some(Simplified::Zero)
        }
        Operation::ShiftLeft | Operation::ShiftRight => {
            if l == Some(0) {
                Some(Simplified::Zero)
            } else if r.is_some_and(|r| shift_amount(r) == 0) {
                Some(Simplified::Left)
            } else {
                None
            }
        }
    }
}

macro_rules! folding_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, self, rhs)
            }
        }
    };
}

folding_operator!(Add, add, Operation::Add);
folding_operator!(Sub, sub, Operation::Subtract);
folding_operator!(Mul, mul, Operation::Multiply);
folding_operator!(Div, div, Operation::Divide);
folding_operator!(Rem, rem, Operation::Mod);
folding_operator!(BitAnd, bitand, Operation::And);
folding_operator!(BitOr, bitor, Operation::Or);
folding_operator!(BitXor, bitxor, Operation::Xor);
folding_operator!(Shl, shl, Operation::ShiftLeft);
folding_operator!(Shr, shr, Operation::ShiftRight);
