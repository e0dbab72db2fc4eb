use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

pub type EnvRef = Rc<RefCell<Environment>>;

/// One scope frame: a name-to-value mapping plus a link to its enclosing
/// frame. Frames are reference-counted because a closure must keep its
/// declaring frame alive for as long as the closure itself lives, which can
/// outlast the syntactic block where the frame was created.
#[derive(Debug)]
pub struct Environment {
    pub enclosing: Option<EnvRef>,
    pub variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<EnvRef>) -> Self {
        Environment { enclosing, variables: HashMap::new() }
    }

    pub fn wrapped(enclosing: Option<EnvRef>) -> EnvRef {
        Rc::new(RefCell::new(Self::new(enclosing)))
    }

    /// Defines `name` in this frame unconditionally. At global scope this is
    /// how redefinition is permitted; below global, the resolver is
    /// responsible for rejecting a second `var` declaration of the same name.
    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    fn ancestor(&self, distance: usize) -> EnvRef {
        let mut environment = self.enclosing.clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth 1"));

        for i in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("enclosing environment to exist at depth {i}"));
            environment = parent;
        }

        environment
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// The frame at `distance` is guaranteed by the resolver to contain
    /// `name`, so this never needs to fall back to `enclosing`.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance == 0 {
            self.variables.insert(name.lexeme.clone(), value);
        } else {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        }
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.variables.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        if distance == 0 {
            self.variables.get(&name.lexeme).cloned().ok_or_else(|| RuntimeError {
                token: name.clone(),
                message: format!("Undefined variable '{}'.", name.lexeme),
            })
        } else {
            let ancestor = self.ancestor(distance);
            let value = ancestor.borrow().variables.get(&name.lexeme).cloned();
            value.ok_or_else(|| RuntimeError {
                token: name.clone(),
                message: format!("Undefined variable '{}'.", name.lexeme),
            })
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}
