use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use itertools::Itertools;

/// The AST is a pair of closed enums plus a couple of helper structs; the
/// evaluator dispatches over them with exhaustive matches. `Display` renders
/// a normalized form of the source that parses back to the same tree
/// (expressions come out fully parenthesized).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.statements.iter().join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let { name: String, value: Expr },
    Return(Expr),
    Expr(Expr),
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value } => write!(f, "let {} = {};", name, value),
            Stmt::Return(value) => write!(f, "return {};", value),
            Stmt::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

/// A brace-delimited statement sequence, as found in `if` arms and function
/// bodies. Function objects share their body via `Rc`, so blocks outlive the
/// `Program` that produced them when a closure escapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.statements.iter().join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    Integer(i64),
    Str(String),
    Boolean(bool),
    Prefix {
        operator: PrefixOp,
        right: Box<Expr>,
    },
    Infix {
        operator: InfixOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function {
        parameters: Rc<Vec<String>>,
        body: Rc<Block>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Array(Vec<Expr>),
    // Pairs keep their source order so printing is deterministic
    Hash(Vec<(Expr, Expr)>),
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Integer(value) => write!(f, "{}", value),
            Expr::Str(value) => write!(f, "\"{}\"", value),
            Expr::Boolean(value) => write!(f, "{}", value),
            Expr::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expr::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({}) {{ {} }}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {{ {} }}", alternative)?;
                }
                Ok(())
            }
            Expr::Function { parameters, body } => {
                write!(f, "fn({}) {{ {} }}", parameters.iter().join(", "), body)
            }
            Expr::Call { callee, arguments } => {
                write!(f, "{}({})", callee, arguments.iter().join(", "))
            }
            Expr::Array(elements) => write!(f, "[{}]", elements.iter().join(", ")),
            Expr::Hash(pairs) => write!(
                f,
                "{{{}}}",
                pairs
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .join(", ")
            ),
            Expr::Index { left, index } => write!(f, "({}[{}])", left, index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Bang,
    Minus,
}

impl Display for PrefixOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Bang => f.write_str("!"),
            PrefixOp::Minus => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl Display for InfixOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InfixOp::Plus => f.write_str("+"),
            InfixOp::Minus => f.write_str("-"),
            InfixOp::Asterisk => f.write_str("*"),
            InfixOp::Slash => f.write_str("/"),
            InfixOp::Lt => f.write_str("<"),
            InfixOp::Gt => f.write_str(">"),
            InfixOp::Eq => f.write_str("=="),
            InfixOp::NotEq => f.write_str("!="),
        }
    }
}
