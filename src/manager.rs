use serde::{Deserialize, Serialize};

use crate::{
    compiler::{FormulaCompiler, ParseError},
    formula::Expr,
    log_error, log_warn,
    publish::{PublishError, TreePublisher},
    render::{BlockClock, Renderer},
};

/// Where the current formula text stands.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub enum ParseState {
    #[default]
    NotParsed,
    Parsed,
    Error(ParseError),
}

impl ParseState {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseState::Parsed)
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            ParseState::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::NotParsed
    }
}

/// Keeps the formula being edited next to the last tree that parsed.
///
/// A failed parse never replaces the tree: whatever is playing keeps playing
/// until the text is fixed.
pub struct FormulaManager {
    compiler: FormulaCompiler,
    formula: String,
    state: ParseState,
    expr: Option<Expr>,
    publisher: Option<TreePublisher>,
}

impl FormulaManager {
    pub fn new(compiler: FormulaCompiler) -> Self {
        FormulaManager {
            compiler,
            formula: String::new(),
            state: ParseState::default(),
            expr: None,
            publisher: None,
        }
    }

    /// Every successful parse will also be published to `publisher`.
    pub fn with_publisher(mut self, publisher: TreePublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn set_formula<S: Into<String>>(&mut self, text: S) {
        self.formula = text.into();
        self.state.clear();
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn is_parsed(&self) -> bool {
        self.state.is_parsed()
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// The last tree that parsed, possibly for an older text.
    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn compiler(&self) -> &FormulaCompiler {
        &self.compiler
    }

    /// A renderer binding exactly the variables this manager's formulas may
    /// use.
    pub fn renderer(&self, clock: BlockClock, max_block: usize) -> Renderer {
        Renderer::new(clock, self.compiler.namespace(), max_block)
    }

    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        match self.compiler.parse(&self.formula) {
            Ok(expr) => {
                self.publish(expr.clone());
                self.expr = Some(expr.clone());
                self.state = ParseState::Parsed;
                Ok(expr)
            }
            Err(error) => {
                log_error!("Formula rejected: {error}");
                self.state = ParseState::Error(error.clone());
                Err(error)
            }
        }
    }

    fn publish(&self, expr: Expr) {
        let Some(publisher) = &self.publisher else {
            return;
        };
        match publisher.publish(expr) {
            Ok(()) => {}
            Err(e @ PublishError::Full(_)) => {
                log_warn!("{e}, the new formula will not be heard until the next parse")
            }
            Err(e @ PublishError::Disconnected(_)) => log_warn!("{e}"),
        }
    }
}

impl Default for FormulaManager {
    fn default() -> Self {
        FormulaManager::new(FormulaCompiler::default())
    }
}
