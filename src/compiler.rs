//! Entry point turning formula text into an evaluable tree.
//!
//! A [`FormulaCompiler`] bundles the builtin registry and the variable
//! namespace the formula is checked against. Both are fixed when the
//! compiler is built and only read afterwards, so a compiler can be shared
//! freely between threads.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use crate::formula::{BuiltinRegistry, Expr, VariableNamespace, parser::TreeBuilder};

mod parse_error;
pub use parse_error::ParseError;

/// Outcome of a parse: the folded tree, or the first diagnostic.
pub type ParseResult = Result<Expr, ParseError>;

#[derive(Debug, Clone)]
pub struct FormulaCompiler {
    registry: BuiltinRegistry,
    namespace: VariableNamespace,
    folding: bool,
}

impl FormulaCompiler {
    pub fn new(registry: BuiltinRegistry, namespace: VariableNamespace) -> Self {
        FormulaCompiler {
            registry,
            namespace,
            folding: true,
        }
    }

    /// Turns constant folding on or off. Trees built without folding are
    /// only meant for checking folded trees against.
    pub fn with_folding(mut self, folding: bool) -> Self {
        self.folding = folding;
        self
    }

    pub fn registry(&self) -> &BuiltinRegistry {
        &self.registry
    }

    pub fn namespace(&self) -> &VariableNamespace {
        &self.namespace
    }

    /// Parses `text`. Never panics: any fault while building the tree is
    /// reported as a [`ParseError`] like any other failure.
    pub fn parse(&self, text: &str) -> ParseResult {
        let builder = TreeBuilder::new(&self.registry, &self.namespace, self.folding);
        match panic::catch_unwind(AssertUnwindSafe(|| builder.build(text))) {
            Ok(result) => result,
            Err(payload) => Err(ParseError::internal(panic_message(payload))),
        }
    }
}

impl Default for FormulaCompiler {
    fn default() -> Self {
        FormulaCompiler::new(BuiltinRegistry::standard(), VariableNamespace::standard())
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown exception".to_owned()
    }
}

/// Parses `text` against the standard registry and namespace.
pub fn parse(text: &str) -> ParseResult {
    FormulaCompiler::default().parse(text)
}
