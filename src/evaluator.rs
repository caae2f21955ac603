use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Block, Expr, InfixOp, PrefixOp, Program, Stmt};
use crate::builtins::{self, Builtin};
use crate::environment::{shared, Environment};
use crate::object::{EvalError, Function, HashKey, Object};

/// Why an evaluation stopped early. Both causes travel up through `?`;
/// `Return` is caught and unwrapped at the function-call (or top-level)
/// boundary, `Error` escapes to the caller. Because `Return` lives in the
/// `Err` channel it can never nest and never leaks into a value position.
enum Unwind {
    Return(Object),
    Error(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(error: EvalError) -> Unwind {
        Unwind::Error(error)
    }
}

/// Tree-walking evaluator. Owns the builtin table so independent instances
/// can run side by side; all mutable interpreter state lives in the
/// `Environment` the caller passes in, which is how a REPL session keeps its
/// bindings across inputs.
pub struct Evaluator {
    builtins: HashMap<&'static str, Builtin>,
}

impl Default for Evaluator {
    fn default() -> Evaluator {
        Evaluator::new()
    }
}

impl Evaluator {
    pub fn new() -> Evaluator {
        Evaluator {
            builtins: builtins::table()
                .into_iter()
                .map(|builtin| (builtin.name, builtin))
                .collect(),
        }
    }

    /// Evaluates a whole program. An early `return` at the top level yields
    /// its value, like the last statement of a function body would.
    pub fn eval(
        &self,
        program: &Program,
        env: &Rc<RefCell<Environment>>,
    ) -> Result<Object, EvalError> {
        let mut result = Object::Null;
        for stmt in &program.statements {
            match self.eval_stmt(stmt, env) {
                Ok(value) => result = value,
                Err(Unwind::Return(value)) => return Ok(value),
                Err(Unwind::Error(error)) => return Err(error),
            }
        }
        Ok(result)
    }

    fn eval_stmt(&self, stmt: &Stmt, env: &Rc<RefCell<Environment>>) -> Result<Object, Unwind> {
        match stmt {
            Stmt::Let { name, value } => {
                let value = self.eval_expr(value, env)?;
                env.borrow_mut().set(name.clone(), value);
                Ok(Object::Null)
            }
            Stmt::Return(value) => {
                let value = self.eval_expr(value, env)?;
                Err(Unwind::Return(value))
            }
            Stmt::Expr(expr) => self.eval_expr(expr, env),
        }
    }

    // A `Return` inside the block propagates out through `?` untouched;
    // only a function-call boundary unwraps it.
    fn eval_block(&self, block: &Block, env: &Rc<RefCell<Environment>>) -> Result<Object, Unwind> {
        let mut result = Object::Null;
        for stmt in &block.statements {
            result = self.eval_stmt(stmt, env)?;
        }
        Ok(result)
    }

    fn eval_expr(&self, expr: &Expr, env: &Rc<RefCell<Environment>>) -> Result<Object, Unwind> {
        match expr {
            Expr::Integer(value) => Ok(Object::Integer(*value)),
            Expr::Boolean(value) => Ok(Object::Boolean(*value)),
            Expr::Str(value) => Ok(Object::Str(Rc::new(value.clone()))),
            Expr::Identifier(name) => self.eval_identifier(name, env),
            Expr::Prefix { operator, right } => {
                let right = self.eval_expr(right, env)?;
                self.eval_prefix(*operator, right)
            }
            Expr::Infix {
                operator,
                left,
                right,
            } => {
                // Left fully evaluates first; an error there means the
                // right side is never touched
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                self.eval_infix(*operator, left, right)
            }
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expr(condition, env)?;
                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    Ok(Object::Null)
                }
            }
            Expr::Function { parameters, body } => Ok(Object::Function(Rc::new(Function {
                parameters: Rc::clone(parameters),
                body: Rc::clone(body),
                env: Rc::clone(env),
            }))),
            Expr::Call { callee, arguments } => {
                let callee = self.eval_expr(callee, env)?;
                let arguments = self.eval_expressions(arguments, env)?;
                self.apply_function(callee, arguments)
            }
            Expr::Array(elements) => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Object::Array(Rc::new(elements)))
            }
            Expr::Hash(pairs) => self.eval_hash_literal(pairs, env),
            Expr::Index { left, index } => {
                let left = self.eval_expr(left, env)?;
                let index = self.eval_expr(index, env)?;
                self.eval_index(left, index)
            }
        }
    }

    fn eval_identifier(
        &self,
        name: &str,
        env: &Rc<RefCell<Environment>>,
    ) -> Result<Object, Unwind> {
        if let Some(value) = env.borrow().get(name) {
            return Ok(value);
        }
        if let Some(builtin) = self.builtins.get(name) {
            return Ok(Object::Builtin(*builtin));
        }
        Err(EvalError::IdentifierNotFound(name.to_string()).into())
    }

    fn eval_prefix(&self, operator: PrefixOp, right: Object) -> Result<Object, Unwind> {
        match operator {
            PrefixOp::Bang => Ok(Object::Boolean(!right.is_truthy())),
            PrefixOp::Minus => match right {
                Object::Integer(value) => Ok(Object::Integer(
                    value.checked_neg().ok_or(EvalError::IntegerOverflow)?,
                )),
                other => Err(EvalError::UnknownPrefixOperator {
                    operator,
                    operand: other.type_name(),
                }
                .into()),
            },
        }
    }

    fn eval_infix(
        &self,
        operator: InfixOp,
        left: Object,
        right: Object,
    ) -> Result<Object, Unwind> {
        match (left, right) {
            (Object::Integer(left), Object::Integer(right)) => {
                self.eval_integer_infix(operator, left, right)
            }
            (Object::Str(left), Object::Str(right)) => match operator {
                InfixOp::Plus => {
                    let mut concat = left.as_ref().clone();
                    concat.push_str(&right);
                    Ok(Object::Str(Rc::new(concat)))
                }
                // Only concatenation is defined on strings
                other => Err(EvalError::UnknownInfixOperator {
                    left: "STRING",
                    operator: other,
                    right: "STRING",
                }
                .into()),
            },
            (left, right) => match operator {
                InfixOp::Eq => Ok(Object::Boolean(left == right)),
                InfixOp::NotEq => Ok(Object::Boolean(left != right)),
                other if left.type_name() != right.type_name() => {
                    Err(EvalError::TypeMismatch {
                        left: left.type_name(),
                        operator: other,
                        right: right.type_name(),
                    }
                    .into())
                }
                other => Err(EvalError::UnknownInfixOperator {
                    left: left.type_name(),
                    operator: other,
                    right: right.type_name(),
                }
                .into()),
            },
        }
    }

    fn eval_integer_infix(
        &self,
        operator: InfixOp,
        left: i64,
        right: i64,
    ) -> Result<Object, Unwind> {
        // Arithmetic is checked; out-of-range results are runtime errors in
        // every build profile rather than panics or silent wraps
        let result = match operator {
            InfixOp::Plus => {
                Object::Integer(left.checked_add(right).ok_or(EvalError::IntegerOverflow)?)
            }
            InfixOp::Minus => {
                Object::Integer(left.checked_sub(right).ok_or(EvalError::IntegerOverflow)?)
            }
            InfixOp::Asterisk => {
                Object::Integer(left.checked_mul(right).ok_or(EvalError::IntegerOverflow)?)
            }
            InfixOp::Slash => {
                if right == 0 {
                    return Err(EvalError::DivisionByZero.into());
                }
                // Truncating division; i64::MIN / -1 is the one overflow case
                Object::Integer(left.checked_div(right).ok_or(EvalError::IntegerOverflow)?)
            }
            InfixOp::Lt => Object::Boolean(left < right),
            InfixOp::Gt => Object::Boolean(left > right),
            InfixOp::Eq => Object::Boolean(left == right),
            InfixOp::NotEq => Object::Boolean(left != right),
        };
        Ok(result)
    }

    /// Arguments evaluate left to right; the first error wins and later
    /// arguments are never evaluated.
    fn eval_expressions(
        &self,
        exprs: &[Expr],
        env: &Rc<RefCell<Environment>>,
    ) -> Result<Vec<Object>, Unwind> {
        let mut results = Vec::with_capacity(exprs.len());
        for expr in exprs {
            results.push(self.eval_expr(expr, env)?);
        }
        Ok(results)
    }

    fn apply_function(&self, callee: Object, arguments: Vec<Object>) -> Result<Object, Unwind> {
        match callee {
            Object::Function(function) => {
                if arguments.len() != function.parameters.len() {
                    return Err(EvalError::WrongNumberOfArguments {
                        got: arguments.len(),
                        want: function.parameters.len(),
                    }
                    .into());
                }
                // The call scope extends the environment captured at the
                // definition site, not the caller's
                let mut call_env = Environment::new_enclosed(Rc::clone(&function.env));
                for (parameter, argument) in function.parameters.iter().zip(arguments) {
                    call_env.set(parameter.clone(), argument);
                }
                match self.eval_block(&function.body, &shared(call_env)) {
                    Err(Unwind::Return(value)) => Ok(value),
                    other => other,
                }
            }
            Object::Builtin(builtin) => Ok((builtin.func)(arguments)?),
            other => Err(EvalError::NotAFunction(other.type_name()).into()),
        }
    }

    fn eval_hash_literal(
        &self,
        pairs: &[(Expr, Expr)],
        env: &Rc<RefCell<Environment>>,
    ) -> Result<Object, Unwind> {
        let mut hash = HashMap::with_capacity(pairs.len());
        for (key_expr, value_expr) in pairs {
            let key = self.eval_expr(key_expr, env)?;
            let key = HashKey::try_from(&key)?;
            let value = self.eval_expr(value_expr, env)?;
            // A repeated key keeps the last value
            hash.insert(key, value);
        }
        Ok(Object::Hash(Rc::new(hash)))
    }

    fn eval_index(&self, left: Object, index: Object) -> Result<Object, Unwind> {
        match (left, index) {
            (Object::Array(elements), Object::Integer(index)) => {
                // Out of range is null, not an error
                let element = usize::try_from(index)
                    .ok()
                    .and_then(|i| elements.get(i).cloned());
                Ok(element.unwrap_or(Object::Null))
            }
            (Object::Hash(pairs), index) => {
                let key = HashKey::try_from(&index)?;
                Ok(pairs.get(&key).cloned().unwrap_or(Object::Null))
            }
            (other, _) => Err(EvalError::IndexOperatorNotSupported(other.type_name()).into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn run(input: &str) -> Result<Object, EvalError> {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        assert_eq!(
            0,
            parser.errors().len(),
            "parse errors for {:?}: {:?}",
            input,
            parser.errors()
        );
        Evaluator::new().eval(&program, &shared(Environment::new()))
    }

    fn run_ok(input: &str) -> Object {
        run(input).unwrap_or_else(|e| panic!("eval of {:?} failed: {}", input, e))
    }

    fn assert_int(expected: i64, input: &str) {
        assert_eq!(Object::Integer(expected), run_ok(input), "{}", input);
    }

    fn assert_bool(expected: bool, input: &str) {
        assert_eq!(Object::Boolean(expected), run_ok(input), "{}", input);
    }

    fn assert_error(expected: &str, input: &str) {
        match run(input) {
            Err(error) => assert_eq!(expected, error.to_string(), "{}", input),
            Ok(value) => panic!("expected error for {:?}, got {}", input, value),
        }
    }

    #[test]
    fn integer_arithmetic() {
        assert_int(5, "5");
        assert_int(-5, "-5");
        assert_int(10, "5 + 5 + 5 + 5 - 10");
        assert_int(32, "2 * 2 * 2 * 2 * 2");
        assert_int(7, "1 + 2 * 3");
        assert_int(9, "(1 + 2) * 3");
        assert_int(1, "-1 + 2");
        assert_int(0, "15 / 2 - 7");
        assert_int(60, "3 * (3 * 3) + 10 * 3 + 3");
        assert_int(-3, "-7 / 2");
    }

    #[test]
    fn boolean_expressions() {
        assert_bool(true, "true");
        assert_bool(false, "false");
        assert_bool(true, "1 < 2");
        assert_bool(false, "1 > 2");
        assert_bool(true, "1 == 1");
        assert_bool(false, "1 != 1");
        assert_bool(true, "true == true");
        assert_bool(false, "true == false");
        assert_bool(true, "true != false");
        assert_bool(true, "(1 < 2) == true");
        assert_bool(false, "(1 > 2) == true");
    }

    #[test]
    fn bang_operator_uses_truthiness() {
        assert_bool(false, "!true");
        assert_bool(true, "!false");
        assert_bool(false, "!5");
        assert_bool(false, "!0");
        assert_bool(true, "!!true");
        assert_bool(false, "!\"\"");
        assert_bool(true, "!(if (false) { 1 })");
    }

    #[test]
    fn if_expressions() {
        assert_int(10, "if (true) { 10 }");
        assert_int(10, "if (1) { 10 }");
        assert_int(10, "if (1 < 2) { 10 }");
        assert_int(20, "if (1 > 2) { 10 } else { 20 }");
        assert_eq!(Object::Null, run_ok("if (false) { 10 }"));
        assert_eq!(Object::Null, run_ok("if (1 > 2) { 10 }"));
    }

    #[test]
    fn return_statements() {
        assert_int(10, "return 10;");
        assert_int(10, "return 10; 9;");
        assert_int(10, "return 2 * 5; 9;");
        assert_int(10, "9; return 2 * 5; 9;");
    }

    #[test]
    fn return_propagates_through_nested_blocks() {
        assert_int(10, "if (true) { if (true) { return 10; } return 1; }");
        assert_int(
            10,
            "let f = fn() { if (true) { if (true) { return 10; } return 1; } }; f();",
        );
    }

    #[test]
    fn error_messages() {
        assert_error("type mismatch: INTEGER + BOOLEAN", "5 + true;");
        assert_error("type mismatch: INTEGER + BOOLEAN", "5 + true; 5;");
        assert_error("unknown operator: -BOOLEAN", "-true");
        assert_error("unknown operator: BOOLEAN + BOOLEAN", "true + false;");
        assert_error("unknown operator: BOOLEAN + BOOLEAN", "5; true + false; 5");
        assert_error(
            "unknown operator: BOOLEAN + BOOLEAN",
            "if (10 > 1) { true + false; }",
        );
        assert_error(
            "unknown operator: BOOLEAN + BOOLEAN",
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
        );
        assert_error("identifier not found: foobar", "foobar;");
        assert_error("unknown operator: STRING - STRING", "\"Hello\" - \"World\"");
        assert_error("unknown operator: STRING == STRING", "\"a\" == \"a\"");
        assert_error("division by zero", "5 / 0");
        assert_error(
            "unusable as hash key: FUNCTION",
            "{\"name\": \"Monkey\"}[fn(x) { x }];",
        );
    }

    #[test]
    fn error_short_circuits_argument_evaluation() {
        // The unbound identifier errors before the later bad operand would
        assert_error(
            "identifier not found: missing",
            "len(missing, true + false);",
        );
    }

    #[test]
    fn integer_overflow_is_a_runtime_error() {
        assert_error("integer overflow", "9223372036854775807 + 1");
        assert_error("integer overflow", "0 - 9223372036854775807 - 2");
        assert_error("integer overflow", "9223372036854775807 * 2");
        // Negating i64::MIN, which is only reachable via arithmetic since
        // the literal itself would not parse
        assert_error("integer overflow", "-(0 - 9223372036854775807 - 1)");
        assert_error("integer overflow", "(0 - 9223372036854775807 - 1) / -1");
        // The extremes themselves are fine
        assert_int(i64::MAX, "9223372036854775806 + 1");
        assert_int(i64::MIN, "0 - 9223372036854775807 - 1");
    }

    #[test]
    fn let_statements() {
        assert_int(5, "let a = 5; a;");
        assert_int(25, "let a = 5 * 5; a;");
        assert_int(5, "let a = 5; let b = a; b;");
        assert_int(15, "let a = 5; let b = a; let c = a + b + 5; c;");
    }

    #[test]
    fn function_object() {
        match run_ok("fn(x) { x + 2; };") {
            Object::Function(function) => {
                assert_eq!(vec!["x".to_string()], *function.parameters);
                assert_eq!("(x + 2)", function.body.to_string());
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn function_application() {
        assert_int(5, "let identity = fn(x) { x; }; identity(5);");
        assert_int(5, "let identity = fn(x) { return x; }; identity(5);");
        assert_int(10, "let double = fn(x) { x * 2; }; double(5);");
        assert_int(7, "let add = fn(x, y) { x + y; }; add(3, 4);");
        assert_int(20, "let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));");
        assert_int(5, "fn(x) { x; }(5)");
    }

    #[test]
    fn empty_function_body_yields_null() {
        assert_eq!(Object::Null, run_ok("fn() {}()"));
    }

    #[test]
    fn arity_is_checked() {
        assert_error(
            "wrong number of arguments: got=2, want=1",
            "fn(x) { x; }(1, 2)",
        );
        assert_error("wrong number of arguments: got=0, want=1", "fn(x) { x; }()");
    }

    #[test]
    fn calling_a_non_function_is_an_error() {
        assert_error("not a function: INTEGER", "let x = 5; x(1);");
    }

    #[test]
    fn closures() {
        assert_int(
            5,
            "let newAdder = fn(x) { fn(y) { x + y }; }; let addTwo = newAdder(2); addTwo(3);",
        );
    }

    #[test]
    fn closures_see_the_live_defining_scope() {
        assert_int(6, "let a = 5; let b = fn() { a }; let a = 6; b();");
    }

    #[test]
    fn recursion() {
        assert_int(
            120,
            "let fact = fn(n) { if (n < 2) { 1 } else { n * fact(n - 1) } }; fact(5);",
        );
        assert_int(
            55,
            "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(10);",
        );
    }

    #[test]
    fn functions_compose_with_builtins() {
        // map written in Monkey on top of rest/push
        let input = "
            let map = fn(arr, f) {
                let iter = fn(arr, acc) {
                    if (len(arr) == 0) {
                        acc
                    } else {
                        iter(rest(arr), push(acc, f(first(arr))))
                    }
                };
                iter(arr, []);
            };
            map([1, 2, 3, 4], fn(x) { x * 2 });
        ";
        assert_eq!(
            Object::Array(Rc::new(vec![
                Object::Integer(2),
                Object::Integer(4),
                Object::Integer(6),
                Object::Integer(8),
            ])),
            run_ok(input)
        );
    }

    #[test]
    fn string_literals_and_concatenation() {
        assert_eq!(
            Object::Str(Rc::new("Hello World!".to_string())),
            run_ok("\"Hello\" + \" \" + \"World!\"")
        );
        assert_eq!(
            Object::Str(Rc::new("Hello World!".to_string())),
            run_ok("\"Hello World!\"")
        );
    }

    #[test]
    fn builtin_len_through_the_interpreter() {
        assert_int(4, "len(\"four\")");
        assert_int(3, "len([1, 2, 3])");
        assert_error("argument to `len` not supported, got INTEGER", "len(1)");
        assert_error(
            "wrong number of arguments: got=2, want=1",
            "len(\"one\", \"two\")",
        );
    }

    #[test]
    fn builtin_push_leaves_other_bindings_untouched() {
        assert_int(2, "let a = [1, 2]; let b = push(a, 3); len(a);");
        assert_int(3, "let a = [1, 2]; let b = push(a, 3); len(b);");
    }

    #[test]
    fn array_literals() {
        assert_eq!(
            Object::Array(Rc::new(vec![
                Object::Integer(1),
                Object::Integer(4),
                Object::Integer(6),
            ])),
            run_ok("[1, 2 * 2, 3 + 3]")
        );
    }

    #[test]
    fn array_index_expressions() {
        assert_int(1, "[1, 2, 3][0]");
        assert_int(2, "[1, 2, 3][1]");
        assert_int(3, "[1, 2, 3][2]");
        assert_int(1, "let i = 0; [1][i];");
        assert_int(3, "[1, 2, 3][1 + 1];");
        assert_int(3, "let myArray = [1, 2, 3]; myArray[2];");
        assert_int(
            6,
            "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
        );
        assert_eq!(Object::Null, run_ok("[1, 2, 3][3]"));
        assert_eq!(Object::Null, run_ok("[1, 2, 3][5]"));
        assert_eq!(Object::Null, run_ok("[1, 2, 3][-1]"));
    }

    #[test]
    fn index_on_unsupported_types_is_an_error() {
        assert_error("index operator not supported: ARRAY", "[1, 2, 3][\"x\"]");
        assert_error("index operator not supported: STRING", "\"abc\"[0]");
        assert_error("index operator not supported: INTEGER", "5[0]");
    }

    #[test]
    fn hash_literals() {
        let input = "
            let two = \"two\";
            {
                \"one\": 10 - 9,
                two: 1 + 1,
                \"thr\" + \"ee\": 6 / 2,
                4: 4,
                true: 5,
                false: 6
            }
        ";
        match run_ok(input) {
            Object::Hash(pairs) => {
                assert_eq!(6, pairs.len());
                assert_eq!(
                    Some(&Object::Integer(1)),
                    pairs.get(&HashKey::Str("one".to_string()))
                );
                assert_eq!(
                    Some(&Object::Integer(2)),
                    pairs.get(&HashKey::Str("two".to_string()))
                );
                assert_eq!(
                    Some(&Object::Integer(3)),
                    pairs.get(&HashKey::Str("three".to_string()))
                );
                assert_eq!(Some(&Object::Integer(4)), pairs.get(&HashKey::Integer(4)));
                assert_eq!(Some(&Object::Integer(5)), pairs.get(&HashKey::Boolean(true)));
                assert_eq!(
                    Some(&Object::Integer(6)),
                    pairs.get(&HashKey::Boolean(false))
                );
            }
            other => panic!("expected hash, got {:?}", other),
        }
    }

    #[test]
    fn hash_index_expressions() {
        assert_int(1, "{\"a\": 1}[\"a\"]");
        assert_int(5, "{\"foo\": 5}[\"f\" + \"oo\"]");
        assert_int(5, "let key = \"foo\"; {\"foo\": 5}[key]");
        assert_int(5, "{5: 5}[5]");
        assert_int(5, "{true: 5}[true]");
        assert_int(5, "{false: 5}[false]");
        assert_eq!(Object::Null, run_ok("{\"foo\": 5}[\"bar\"]"));
        assert_eq!(Object::Null, run_ok("{}[\"foo\"]"));
    }

    #[test]
    fn integer_and_boolean_hash_keys_do_not_collide() {
        assert_eq!(
            Object::Str(Rc::new("bool".to_string())),
            run_ok("{1: \"int\", true: \"bool\"}[true]")
        );
        assert_eq!(
            Object::Str(Rc::new("int".to_string())),
            run_ok("{1: \"int\", true: \"bool\"}[1]")
        );
    }

    #[test]
    fn unhashable_literal_key_is_an_error() {
        assert_error("unusable as hash key: ARRAY", "{[1, 2]: \"x\"}");
    }

    #[test]
    fn equality_falls_back_to_value_identity() {
        assert_bool(true, "[1, 2] == [1, 2]");
        assert_bool(false, "[1, 2] == [1, 3]");
        assert_bool(false, "1 == true");
        assert_bool(true, "1 != true");
        assert_bool(true, "if (false) { 1 } == if (false) { 2 }");
    }

    #[test]
    fn environments_accumulate_across_eval_calls() {
        let evaluator = Evaluator::new();
        let env = shared(Environment::new());

        let mut parser = Parser::new(Lexer::new("let x = 41;"));
        evaluator.eval(&parser.parse_program(), &env).unwrap();

        let mut parser = Parser::new(Lexer::new("x + 1"));
        assert_eq!(
            Ok(Object::Integer(42)),
            evaluator.eval(&parser.parse_program(), &env)
        );
    }

    #[test]
    fn independent_evaluators_do_not_share_state() {
        let env_a = shared(Environment::new());
        let env_b = shared(Environment::new());
        let evaluator = Evaluator::new();

        let mut parser = Parser::new(Lexer::new("let x = 1;"));
        evaluator.eval(&parser.parse_program(), &env_a).unwrap();

        let mut parser = Parser::new(Lexer::new("x"));
        assert_eq!(
            Err(EvalError::IdentifierNotFound("x".to_string())),
            evaluator.eval(&parser.parse_program(), &env_b)
        );
    }

    #[test]
    fn builtins_can_be_shadowed_by_bindings() {
        assert_int(7, "let len = fn(x) { 7 }; len([1, 2, 3]);");
    }
}
