//! Bytebeat formulas: a small integer expression language evaluated over
//! whole blocks of audio samples.
//!
//! ```
//! let tree = bytebeat::parse("t * (t >> 8 & 42)").unwrap();
//! let mut bindings = bytebeat::formula::VariableNamespace::standard().zeroed_bindings(4);
//! bindings.insert("t".to_string(), vec![0, 256, 512, 768]);
//! assert_eq!(bytebeat::formula::evaluate(&tree, &bindings, 4), vec![0, 0, 1024, 1536]);
//! ```

pub mod compiler;
pub mod config;
pub mod formula;
pub mod log;
pub mod logger;
pub mod manager;
pub mod publish;
pub mod render;

pub use compiler::{FormulaCompiler, ParseError, ParseResult, parse};
pub use formula::Expr;
pub use log::{LogMessage, Severity};
