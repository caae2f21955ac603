use std::rc::Rc;

use crate::object::{EvalError, Object};

pub type BuiltinFn = fn(Vec<Object>) -> Result<Object, EvalError>;

/// A native function. Plain data, so `Object::Builtin` stays `Copy`-cheap
/// and comparable by name.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

/// The fixed table the evaluator consults when an identifier misses the
/// whole environment chain. Constructed per evaluator instance; there is no
/// global registry.
pub fn table() -> Vec<Builtin> {
    vec![
        Builtin {
            name: "len",
            func: len,
        },
        Builtin {
            name: "first",
            func: first,
        },
        Builtin {
            name: "last",
            func: last,
        },
        Builtin {
            name: "rest",
            func: rest,
        },
        Builtin {
            name: "push",
            func: push,
        },
    ]
}

fn expect_args(args: &[Object], want: usize) -> Result<(), EvalError> {
    if args.len() != want {
        return Err(EvalError::WrongNumberOfArguments {
            got: args.len(),
            want,
        });
    }
    Ok(())
}

fn expect_array(builtin: &'static str, arg: &Object) -> Result<Rc<Vec<Object>>, EvalError> {
    match arg {
        Object::Array(elements) => Ok(Rc::clone(elements)),
        other => Err(EvalError::ArrayArgumentRequired {
            builtin,
            got: other.type_name(),
        }),
    }
}

fn len(args: Vec<Object>) -> Result<Object, EvalError> {
    expect_args(&args, 1)?;
    match &args[0] {
        // Character count, not byte count
        Object::Str(value) => Ok(Object::Integer(value.chars().count() as i64)),
        Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
        other => Err(EvalError::UnsupportedArgument {
            builtin: "len",
            got: other.type_name(),
        }),
    }
}

fn first(args: Vec<Object>) -> Result<Object, EvalError> {
    expect_args(&args, 1)?;
    let elements = expect_array("first", &args[0])?;
    Ok(elements.first().cloned().unwrap_or(Object::Null))
}

fn last(args: Vec<Object>) -> Result<Object, EvalError> {
    expect_args(&args, 1)?;
    let elements = expect_array("last", &args[0])?;
    Ok(elements.last().cloned().unwrap_or(Object::Null))
}

fn rest(args: Vec<Object>) -> Result<Object, EvalError> {
    expect_args(&args, 1)?;
    let elements = expect_array("rest", &args[0])?;
    if elements.is_empty() {
        return Ok(Object::Null);
    }
    Ok(Object::Array(Rc::new(elements[1..].to_vec())))
}

fn push(args: Vec<Object>) -> Result<Object, EvalError> {
    expect_args(&args, 2)?;
    let elements = expect_array("push", &args[0])?;
    // Value semantics: the input array is never touched
    let mut appended = elements.as_ref().clone();
    appended.push(args[1].clone());
    Ok(Object::Array(Rc::new(appended)))
}
