//! The closed set of functions a formula may call.
//!
//! | name    | args | result                                         |
//! |---------|------|------------------------------------------------|
//! | `sin`   | 1    | sine table at `x` wrapped into `0..256`        |
//! | `cos`   | 1    | sine table at `x + 64`                         |
//! | `tri`   | 1    | triangle table at `x`                          |
//! | `abs`   | 1    | absolute value                                 |
//! | `rand`  | 0    | independent uniform values in `0..=255`        |
//! | `srand` | 1    | deterministic integer hash of `x`              |

use std::{cell::RefCell, collections::HashMap};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    evaluate::{Bindings, Block, evaluate},
    expression::Expr,
    tables::{SINE_TABLE, TABLE_SIZE, TRIANGLE_TABLE, table_index},
};

/// Signature of a builtin: it receives its unevaluated arguments and
/// evaluates whichever of them it needs.
pub type BuiltinFn = fn(&[Expr], &Bindings, usize) -> Block;

/// Inclusive bounds on the number of arguments. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arity {
    pub lower: Option<usize>,
    pub upper: Option<usize>,
}

impl Arity {
    pub const fn exactly(count: usize) -> Self {
        Arity { lower: Some(count), upper: Some(count) }
    }

    pub const fn between(lower: Option<usize>, upper: Option<usize>) -> Self {
        Arity { lower, upper }
    }

    pub fn accepts(&self, count: usize) -> bool {
        self.lower.is_none_or(|lower| count >= lower) && self.upper.is_none_or(|upper| count <= upper)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub function: BuiltinFn,
    pub arity: Arity,
}

impl Builtin {
    pub const fn new(function: BuiltinFn, arity: Arity) -> Self {
        Builtin { function, arity }
    }

    #[inline]
    pub fn call(&self, args: &[Expr], bindings: &Bindings, block_len: usize) -> Block {
        (self.function)(args, bindings, block_len)
    }
}

/// Function name to implementation and arity.
///
/// Built once at startup and only read afterwards, so one registry can be
/// shared by any number of parsers.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    functions: HashMap<String, Builtin>,
}

impl BuiltinRegistry {
    pub fn standard() -> Self {
        let mut registry = BuiltinRegistry::default();
        registry.insert("sin", Builtin::new(sin, Arity::exactly(1)));
        registry.insert("cos", Builtin::new(cos, Arity::exactly(1)));
        registry.insert("tri", Builtin::new(tri, Arity::exactly(1)));
        registry.insert("abs", Builtin::new(abs, Arity::exactly(1)));
        registry.insert("rand", Builtin::new(random_bytes, Arity::exactly(0)));
        registry.insert("srand", Builtin::new(srand, Arity::exactly(1)));
        registry
    }

    pub(crate) fn insert(&mut self, name: &str, builtin: Builtin) {
        self.functions.insert(name.to_owned(), builtin);
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

thread_local! {
    static RANDOM_SOURCE: RefCell<StdRng> = RefCell::new(StdRng::from_os_rng());
}

/// Reseeds the calling thread's `rand()` source.
///
/// Every thread draws from its own source, so voices rendered on separate
/// threads never contend for it.
pub fn seed_random(seed: u64) {
    RANDOM_SOURCE.with(|source| *source.borrow_mut() = StdRng::seed_from_u64(seed));
}

fn wavetable(table: &[i32; TABLE_SIZE], mut phases: Block, offset: i32) -> Block {
    for phase in phases.iter_mut() {
        *phase = table[table_index(phase.wrapping_add(offset))];
    }
    phases
}

fn sin(args: &[Expr], bindings: &Bindings, block_len: usize) -> Block {
    wavetable(&SINE_TABLE, evaluate(&args[0], bindings, block_len), 0)
}

fn cos(args: &[Expr], bindings: &Bindings, block_len: usize) -> Block {
    wavetable(&SINE_TABLE, evaluate(&args[0], bindings, block_len), 64)
}

fn tri(args: &[Expr], bindings: &Bindings, block_len: usize) -> Block {
    wavetable(&TRIANGLE_TABLE, evaluate(&args[0], bindings, block_len), 0)
}

fn abs(args: &[Expr], bindings: &Bindings, block_len: usize) -> Block {
    let mut values = evaluate(&args[0], bindings, block_len);
    for value in values.iter_mut() {
        *value = value.wrapping_abs();
    }
    values
}

fn random_bytes(_args: &[Expr], _bindings: &Bindings, block_len: usize) -> Block {
    RANDOM_SOURCE.with(|source| {
        let mut source = source.borrow_mut();
        (0..block_len).map(|_| source.random_range(0..=255)).collect()
    })
}

/// Integer mix behind `srand`. The shifts here are plain 32-bit shifts, not
/// the mod-16 shifts of the formula operators.
pub fn scramble(x: i32) -> i32 {
    let mut r = x.wrapping_add(3463).wrapping_mul(2971);
    r ^= r << 13;
    r ^= r >> 17;
    r ^ (r << 5)
}

fn srand(args: &[Expr], bindings: &Bindings, block_len: usize) -> Block {
    let mut values = evaluate(&args[0], bindings, block_len);
    for value in values.iter_mut() {
        *value = scramble(*value);
    }
    values
}
