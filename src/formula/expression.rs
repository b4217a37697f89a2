use std::{collections::BTreeSet, fmt, ops::Deref, sync::Arc};

use serde::{Deserialize, Serialize};

use super::builtins::Builtin;

/// Binary operators, listed from the loosest to the tightest binding group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Xor,
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    ShiftLeft,
    ShiftRight,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Xor,
        Operation::And,
        Operation::Or,
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Mod,
        Operation::ShiftLeft,
        Operation::ShiftRight,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Xor => "^",
            Operation::And => "&",
            Operation::Or => "|",
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Mod => "%",
            Operation::ShiftLeft => "<<",
            Operation::ShiftRight => ">>",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A call to a builtin, resolved against the registry at parse time.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(skip)]
    pub builtin: Builtin,
    pub args: Vec<Expr>,
}

impl PartialEq for FunctionCall {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

/// A formula tree node. Nodes never change once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Constant(i32),
    Variable(String),
    Binary(Operation, Expr, Expr),
    Call(FunctionCall),
}

impl Expression {
    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }

    pub fn constant_value(&self) -> Option<i32> {
        match self {
            Expression::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// Number of nodes in the tree rooted here.
    pub fn node_count(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Variable(_) => 1,
            Expression::Binary(_, lhs, rhs) => 1 + lhs.node_count() + rhs.node_count(),
            Expression::Call(call) => 1 + call.args.iter().map(|a| a.node_count()).sum::<usize>(),
        }
    }

    /// Names of every variable referenced below this node.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Expression::Constant(_) => (),
            Expression::Variable(name) => {
                names.insert(name.as_str());
            }
            Expression::Binary(_, lhs, rhs) => {
                lhs.collect_variables(names);
                rhs.collect_variables(names);
            }
            Expression::Call(call) => {
                for arg in &call.args {
                    arg.collect_variables(names);
                }
            }
        }
    }

    /// True when no operation or call below this node has only constant
    /// operands left, i.e. folding has nothing more to do.
    pub fn is_fully_folded(&self) -> bool {
        match self {
            Expression::Constant(_) | Expression::Variable(_) => true,
            Expression::Binary(_, lhs, rhs) => {
                !(lhs.is_constant() && rhs.is_constant())
                    && lhs.is_fully_folded()
                    && rhs.is_fully_folded()
            }
            Expression::Call(call) => {
                !call.args.iter().all(|arg| arg.is_constant())
                    && call.args.iter().all(|arg| arg.is_fully_folded())
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{value}"),
            Expression::Variable(name) => f.write_str(name),
            Expression::Binary(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Expression::Call(call) => {
                write!(f, "{}(", call.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Shared handle to an immutable [`Expression`].
///
/// Cloning is a reference count increment, so a tree can be handed to the
/// audio thread while the editor keeps its own copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Expr(Arc<Expression>);

impl Expr {
    pub fn constant(value: i32) -> Self {
        Expression::Constant(value).into()
    }

    pub fn variable<S: Into<String>>(name: S) -> Self {
        Expression::Variable(name.into()).into()
    }

    /// True if both handles point at the very same node.
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Expr {
    type Target = Expression;

    fn deref(&self) -> &Expression {
        &self.0
    }
}

impl From<Expression> for Expr {
    fn from(expression: Expression) -> Self {
        Expr(Arc::new(expression))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
