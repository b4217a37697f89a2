use std::{error, fmt};

use pest::{
    error::{Error as PestError, ErrorVariant, LineColLocation},
    iterators::Pair,
};
use serde::{Deserialize, Serialize};

use crate::formula::parser::Rule;

/// Why a formula was rejected, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    /// 1-based line of the failure, 0 when no position is known.
    pub line: usize,
    /// 1-based column of the failure, 0 when no position is known.
    pub col: usize,
    /// Human-readable diagnostic.
    pub message: String,
    /// Name of the grammar rule that failed.
    pub rule: String,
}

impl ParseError {
    pub fn at(pair: &Pair<Rule>, rule: Rule, message: String) -> Self {
        let (line, col) = pair.line_col();
        ParseError {
            line,
            col,
            message,
            rule: rule_name(rule),
        }
    }

    pub fn at_line_col(line: usize, col: usize, rule: Rule, message: String) -> Self {
        ParseError {
            line,
            col,
            message,
            rule: rule_name(rule),
        }
    }

    /// A failure that has nothing to do with the formula text itself.
    pub fn internal<S: ToString>(message: S) -> Self {
        ParseError {
            line: 0,
            col: 0,
            message: message.to_string(),
            rule: rule_name(Rule::input),
        }
    }
}

fn rule_name(rule: Rule) -> String {
    format!("{rule:?}")
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} [{}] {}", self.line, self.col, self.rule, self.message)
    }
}

impl error::Error for ParseError {}

/// Converts a grammar mismatch reported by pest.
impl From<PestError<Rule>> for ParseError {
    fn from(e: PestError<Rule>) -> Self {
        let (line, col) = match e.line_col {
            LineColLocation::Pos(position) => position,
            LineColLocation::Span(start, _) => start,
        };
        let rule = match &e.variant {
            ErrorVariant::ParsingError { positives, .. } => {
                positives.first().copied().unwrap_or(Rule::input)
            }
            ErrorVariant::CustomError { .. } => Rule::input,
        };
        ParseError {
            line,
            col,
            message: format!("Syntax error: {}.", e.variant.message()),
            rule: rule_name(rule),
        }
    }
}
