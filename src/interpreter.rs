use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::{EnvRef, Environment};
use crate::error::{RuntimeError, Unwind};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::*;
use crate::token::{Token, Type};

/// Walks the AST produced by the parser, using the resolver's depth table to
/// resolve locals and falling back to the global frame by name otherwise.
pub struct Interpreter<'a> {
    pub globals: EnvRef,
    environment: EnvRef,
    locals: HashMap<NodeId, usize>,
    stdout: Box<dyn Write + 'a>,
}

impl<'a> Interpreter<'a> {
    pub fn new(stdout: impl Write + 'a) -> Self {
        let globals = Environment::wrapped(None);
        globals.borrow_mut().define("clock", Object::from(NativeFunction::clock()));

        Interpreter { globals: Rc::clone(&globals), environment: globals, locals: HashMap::new(), stdout: Box::new(stdout) }
    }

    /// Records the scope depth the resolver computed for an expression node.
    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Executes a program's top-level statements, reporting the first runtime
    /// error encountered (evaluation aborts at that point, per the error model).
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut crate::error::Diagnostics) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {},
                Err(Unwind::Error(error)) => {
                    diagnostics.report(&error);
                    return;
                },
                Err(Unwind::Return(_)) | Err(Unwind::Break) => {
                    unreachable!("return/break cannot escape top-level code: the resolver rejects it")
                },
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    /// Runs `statements` with `environment` as the current frame, restoring
    /// the previous frame on every exit path including an error or signal.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));
        self.environment = previous;
        result
    }

    fn lookup_variable(&self, id: NodeId, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&depth) => self.environment.borrow().get_at(depth, name),
            None => self.globals.borrow().get(name),
        }
    }
}

fn numbers_error(operator: &Token) -> RuntimeError {
    RuntimeError { token: operator.clone(), message: "Operands must be numbers.".to_string() }
}

fn numeric_operands(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok((*l, *r)),
        _ => Err(numbers_error(operator)),
    }
}

impl<'a> ExprVisitor<Result<Object, RuntimeError>> for Interpreter<'a> {
    fn visit_literal_expr(&mut self, literal: &Literal) -> Result<Object, RuntimeError> {
        Ok(Object::from(literal.clone()))
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;

        match data.operator.r#type {
            Type::Or if left.is_truthy() => Ok(left),
            Type::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate(&data.right),
        }
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Result<Object, RuntimeError> {
        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Minus => (-right).ok_or_else(|| RuntimeError {
                token: data.operator.clone(),
                message: "Operand must be a number.".to_string(),
            }),
            Type::Bang => Ok(!right),
            _ => unreachable!("scanner/parser only produce '-'/'!' unary operators"),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let operator = &data.operator;

        match operator.r#type {
            Type::Minus => (left - right).ok_or_else(|| numbers_error(operator)),
            Type::Star => (left * right).ok_or_else(|| numbers_error(operator)),
            Type::Slash => {
                if let Object::Literal(Literal::Number(divisor)) = right {
                    if divisor == 0.0 {
                        return Err(RuntimeError {
                            token: operator.clone(),
                            message: "float division by zero".to_string(),
                        });
                    }
                }
                (left / right).ok_or_else(|| numbers_error(operator))
            },
            Type::Plus => (left + right).ok_or_else(|| RuntimeError {
                token: operator.clone(),
                message: "Operands must be two numbers or two strings.".to_string(),
            }),
            Type::Greater => {
                let (l, r) = numeric_operands(operator, &left, &right)?;
                Ok(Object::from(l > r))
            },
            Type::GreaterEqual => {
                let (l, r) = numeric_operands(operator, &left, &right)?;
                Ok(Object::from(l >= r))
            },
            Type::Less => {
                let (l, r) = numeric_operands(operator, &left, &right)?;
                Ok(Object::from(l < r))
            },
            Type::LessEqual => {
                let (l, r) = numeric_operands(operator, &left, &right)?;
                Ok(Object::from(l <= r))
            },
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!("scanner/parser only produce binary operators from this set"),
        }
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> Result<Object, RuntimeError> {
        self.evaluate(&data.expr)
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> Result<Object, RuntimeError> {
        self.lookup_variable(data.id, &data.name)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> Result<Object, RuntimeError> {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&depth) => self.environment.borrow_mut().assign_at(depth, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity_error = |expected: usize, got: usize| RuntimeError {
            token: data.paren.clone(),
            message: format!("Expected {expected} arguments but got {got}."),
        };

        match &callee {
            Object::Function(function) => {
                if arguments.len() != function.arity() {
                    return Err(arity_error(function.arity(), arguments.len()));
                }
                function.call(self, arguments)
            },
            Object::NativeFunction(function) => {
                if arguments.len() != function.arity() {
                    return Err(arity_error(function.arity(), arguments.len()));
                }
                function.call(self, arguments)
            },
            Object::Class(class) => {
                let arity = class.borrow().arity();
                if arguments.len() != arity {
                    return Err(arity_error(arity, arguments.len()));
                }
                let class = class.borrow().clone();
                class.call(self, arguments)
            },
            _ => Err(RuntimeError {
                token: data.paren.clone(),
                message: "Can only call functions and classes.".to_string(),
            }),
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        match &object {
            Object::Instance(instance) => {
                let instance = Rc::clone(instance);
                instance.borrow().get(&data.name, &object)
            },
            _ => Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have properties.".to_string(),
            }),
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        let Object::Instance(instance) = &object else {
            return Err(RuntimeError { token: data.name.clone(), message: "Only instances have fields.".to_string() });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> Result<Object, RuntimeError> {
        self.lookup_variable(data.id, &data.keyword)
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> Result<Object, RuntimeError> {
        let distance = *self.locals.get(&data.id).expect("resolver to have resolved 'super'");
        let superclass = self.environment.borrow().get_at(distance, &data.keyword)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("'super' always resolves to a class value")
        };

        let this_token = Token::new(Type::This, "this".to_string(), None, data.keyword.line);
        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let method = superclass.borrow().find_method(&data.method.lexeme).ok_or_else(|| RuntimeError {
            token: data.method.clone(),
            message: format!("Undefined property '{}'.", data.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

impl<'a> StmtVisitor<Result<(), Unwind>> for Interpreter<'a> {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<(), Unwind> {
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<(), Unwind> {
        let value = self.evaluate(&data.expr)?;
        writeln!(self.stdout, "{value}").expect("print sink to accept writes");
        Ok(())
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<(), Unwind> {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<(), Unwind> {
        let environment = Environment::wrapped(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, environment)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<(), Unwind> {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<(), Unwind> {
        while self.evaluate(&data.condition)?.is_truthy() {
            match self.execute(&data.body) {
                Ok(()) => {},
                Err(Unwind::Break) => break,
                Err(other) => return Err(other),
            }
        }

        Ok(())
    }

    fn visit_break_stmt(&mut self, _data: &BreakData) -> Result<(), Unwind> {
        Err(Unwind::Break)
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) -> Result<(), Unwind> {
        let function = Function::new(Rc::new(data.clone()), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<(), Unwind> {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };

        Err(Unwind::Return(value))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Result<(), Unwind> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                let Object::Class(class) = value else {
                    let Expr::Variable(variable) = expr else { unreachable!() };
                    return Err(Unwind::Error(RuntimeError {
                        token: variable.name.clone(),
                        message: "Superclass must be a class.".to_string(),
                    }));
                };
                Some(class)
            },
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        let method_environment = match &superclass {
            Some(superclass) => {
                let environment = Environment::wrapped(Some(Rc::clone(&self.environment)));
                environment.borrow_mut().define("super", Object::from(Rc::clone(superclass)));
                environment
            },
            None => Rc::clone(&self.environment),
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let function = Function::new(
                Rc::new(method.clone()),
                Rc::clone(&method_environment),
                method.name.lexeme == "init",
            );
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Rc::new(RefCell::new(Class::new(data.name.lexeme.clone(), superclass, methods)));
        self.environment.borrow_mut().assign(&data.name, Object::from(class))?;

        Ok(())
    }
}
