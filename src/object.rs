use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

use itertools::Itertools;
use thiserror::Error;

use crate::ast::{Block, InfixOp, PrefixOp};
use crate::builtins::Builtin;
use crate::environment::Environment;

/// A runtime value. Aggregates sit behind `Rc` so that binding and argument
/// passing clone a handle, not the payload; the builtins that "modify" an
/// array always build a fresh one.
#[derive(Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Str(Rc<String>),
    Array(Rc<Vec<Object>>),
    Hash(Rc<HashMap<HashKey, Object>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Null,
}

/// A user-defined function value. Holds the environment that was current at
/// its definition site; calls extend that environment, not the caller's,
/// which is what makes closures work.
pub struct Function {
    pub parameters: Rc<Vec<String>>,
    pub body: Rc<Block>,
    pub env: Rc<RefCell<Environment>>,
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Str(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Null => "NULL",
        }
    }

    /// Only `false` and `null` are falsy; everything else, `0` and `""`
    /// included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Boolean(value) => *value,
            Object::Null => false,
            _ => true,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(l), Object::Integer(r)) => l == r,
            (Object::Boolean(l), Object::Boolean(r)) => l == r,
            (Object::Str(l), Object::Str(r)) => l == r,
            (Object::Array(l), Object::Array(r)) => l == r,
            (Object::Hash(l), Object::Hash(r)) => l == r,
            // Functions have no structural identity worth comparing
            (Object::Function(l), Object::Function(r)) => Rc::ptr_eq(l, r),
            (Object::Builtin(l), Object::Builtin(r)) => l.name == r.name,
            (Object::Null, Object::Null) => true,
            _ => false,
        }
    }
}

/// The human-readable rendering the REPL prints.
impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Str(value) => f.write_str(value),
            Object::Array(elements) => write!(f, "[{}]", elements.iter().join(", ")),
            Object::Hash(pairs) => {
                // Iteration order is unspecified; sort the rendering so
                // equal hashes print identically
                let entries = pairs
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .sorted()
                    .join(", ");
                write!(f, "{{{}}}", entries)
            }
            Object::Function(function) => write!(
                f,
                "fn({}) {{ {} }}",
                function.parameters.iter().join(", "),
                function.body
            ),
            Object::Builtin(builtin) => write!(f, "builtin function {}", builtin.name),
            Object::Null => f.write_str("null"),
        }
    }
}

// Hand-written because a closure's environment can refer back to the closure
// itself; deriving would chase the cycle.
impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Function(function) => {
                write!(f, "Function(fn({}))", function.parameters.iter().join(", "))
            }
            Object::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
            other => write!(f, "{}({})", other.type_name(), other),
        }
    }
}

/// Key derived from a hashable object. Keeping the discriminant in the enum
/// means an integer and a boolean can never collide, and two keys built from
/// equal values always hash alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    Str(String),
}

impl TryFrom<&Object> for HashKey {
    type Error = EvalError;

    fn try_from(obj: &Object) -> Result<HashKey, EvalError> {
        match obj {
            Object::Integer(value) => Ok(HashKey::Integer(*value)),
            Object::Boolean(value) => Ok(HashKey::Boolean(*value)),
            Object::Str(value) => Ok(HashKey::Str(value.to_string())),
            other => Err(EvalError::UnusableHashKey(other.type_name())),
        }
    }
}

impl Display for HashKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(value) => write!(f, "{}", value),
            HashKey::Boolean(value) => write!(f, "{}", value),
            HashKey::Str(value) => f.write_str(value),
        }
    }
}

/// An evaluation failure. These flow back up the interpreter as ordinary
/// `Err` values; the host renders them as `ERROR: <message>` and carries on
/// with its next input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: InfixOp,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: InfixOp,
        right: &'static str,
    },
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: PrefixOp,
        operand: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments: got={got}, want={want}")]
    WrongNumberOfArguments { got: usize, want: usize },
    #[error("argument to `{builtin}` not supported, got {got}")]
    UnsupportedArgument {
        builtin: &'static str,
        got: &'static str,
    },
    #[error("argument to `{builtin}` must be ARRAY, got {got}")]
    ArrayArgumentRequired {
        builtin: &'static str,
        got: &'static str,
    },
    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),
    #[error("index operator not supported: {0}")]
    IndexOperatorNotSupported(&'static str),
}
