use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::environment::{EnvRef, Environment};
use crate::error::{RuntimeError, Unwind};
use crate::interpreter::Interpreter;
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;
use crate::token::{Token, Type};

/// A user-defined function or method: a pointer to its declaration plus the
/// environment captured when the `fun`/method was declared (its closure).
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionData>,
    pub closure: EnvRef,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionData>, closure: EnvRef, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Returns a copy of this function whose closure has been extended with
    /// a frame defining `this` as `instance` — used when a method is read
    /// off an instance via `Get`.
    pub fn bind(&self, instance: Object) -> Function {
        let environment = Environment::wrapped(Some(Rc::clone(&self.closure)));
        environment.borrow_mut().define("this", instance);
        Function::new(Rc::clone(&self.declaration), environment, self.is_initializer)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let environment = Environment::wrapped(Some(Rc::clone(&self.closure)));
        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &this_token())
                } else {
                    Ok(Object::from(Literal::Nil))
                }
            },
            Err(Unwind::Return(value)) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &this_token())
                } else {
                    Ok(value)
                }
            },
            Err(Unwind::Break) => unreachable!("break cannot escape a function body"),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

fn this_token() -> Token {
    Token::new(Type::This, "this".to_string(), None, 0)
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn '{}'>", self.declaration.name.lexeme)
    }
}

/// A built-in callable implemented in Rust rather than in the language.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter<'_>, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The language's only standard-library primitive: wall-clock seconds.
    pub fn clock() -> NativeFunction {
        NativeFunction {
            name: "clock",
            arity: 0,
            function: |_, _| {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("system clock to be after the unix epoch")
                    .as_secs_f64();
                Ok(Object::from(now))
            },
        }
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.function as usize == other.function as usize
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
