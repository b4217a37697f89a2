//! # Formula language
//!
//! Bytebeat formulas are short integer expressions over a handful of
//! variables and builtins, for example:
//!
//! ```text
//! // classic
//! t * ((t >> 12 | t >> 8) & 63 & t >> 4)
//! /* tempo synced wobble */
//! sin(T * 4) ^ (t >> x)
//! ```
//!
//! Operators, loosest first: `^`, then `&` and `|`, then `+ -`, then
//! `* / %`, then `<< >>`. All of them are left associative.
//!
//! A formula is parsed once into an [`Expr`] tree, folded as it is built,
//! then evaluated over whole blocks of samples with [`evaluate`].

pub mod builtins;
pub mod evaluate;
pub mod expression;
mod fold;
pub mod namespace;
pub mod parser;
pub mod tables;

pub use builtins::{Arity, Builtin, BuiltinFn, BuiltinRegistry, seed_random};
pub use evaluate::{Bindings, Block, apply_scalar, evaluate};
pub use expression::{Expr, Expression, FunctionCall, Operation};
pub use namespace::VariableNamespace;

#[cfg(test)]
mod tests;
