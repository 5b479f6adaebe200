use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A lexical scope: a name to value mapping with a link to the enclosing
/// scope. The chain terminates at the globals. Scopes are reference counted
/// because closures keep their defining scope alive past its block.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment {
            enclosing,
            variables: HashMap::new(),
        }
    }

    /// Defines a new variable in this scope, shadowing any enclosing binding
    /// and overwriting a previous one with the same name.
    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    /// Returns the environment `distance` hops up the chain.
    /// The resolver guarantees the chain is at least that long.
    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let parent = self.enclosing.clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth {}", 1));
        let mut environment = Rc::clone(&parent);

        for i in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("enclosing environment to exist at depth {}", i));
            environment = Rc::clone(&parent);
        }

        environment
    }

    /// Assigns to an existing variable, walking the chain outwards.
    /// Assigning to a name that is not defined anywhere is an error.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &mut self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'", name.lexeme),
        })
    }

    /// Assigns to the variable `distance` hops up the chain.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        } else {
            self.variables.insert(name.lexeme.clone(), value);
        }
    }

    /// Returns the value of a variable, walking the chain outwards.
    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(variable) = self.variables.get(&name.lexeme) {
            return Ok(variable.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'", name.lexeme),
        })
    }

    /// Returns the value of the variable `distance` hops up the chain.
    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let variable = if distance > 0 {
            self.ancestor(distance).borrow().variables.get(&name.lexeme).cloned()
        } else {
            self.variables.get(&name.lexeme).cloned()
        };

        variable.ok_or_else(|| RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'", name.lexeme),
        })
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Literal;

    fn wrap(environment: Environment) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(environment))
    }

    #[test]
    fn define_and_get() {
        let mut environment = Environment::default();
        environment.define("a", Object::from(1.0));

        assert_eq!(environment.get(&Token::from("a")).unwrap(), Object::from(1.0));
    }

    #[test]
    fn get_walks_the_chain() {
        let globals = wrap(Environment::default());
        globals.borrow_mut().define("a", Object::from(1.0));
        let inner = Environment::new(Some(Rc::clone(&globals)));

        assert_eq!(inner.get(&Token::from("a")).unwrap(), Object::from(1.0));
    }

    #[test]
    fn get_undefined_is_an_error() {
        let environment = Environment::default();

        assert!(environment.get(&Token::from("missing")).is_err());
    }

    #[test]
    fn assign_requires_existing_binding() {
        let mut environment = Environment::default();

        assert!(environment.assign(&Token::from("a"), Object::from(1.0)).is_err());

        environment.define("a", Object::from(1.0));
        assert!(environment.assign(&Token::from("a"), Object::from(2.0)).is_ok());
        assert_eq!(environment.get(&Token::from("a")).unwrap(), Object::from(2.0));
    }

    #[test]
    fn get_at_reaches_the_right_scope() {
        let globals = wrap(Environment::default());
        globals.borrow_mut().define("a", Object::from("global"));

        let middle = wrap(Environment::new(Some(Rc::clone(&globals))));
        middle.borrow_mut().define("a", Object::from("middle"));

        let inner = Environment::new(Some(Rc::clone(&middle)));

        assert_eq!(inner.get_at(1, &Token::from("a")).unwrap(), Object::from("middle"));
        assert_eq!(inner.get_at(2, &Token::from("a")).unwrap(), Object::from("global"));
    }

    #[test]
    fn assign_at_skips_shadowing_scopes() {
        let outer = wrap(Environment::default());
        outer.borrow_mut().define("a", Object::from(1.0));

        let mut inner = Environment::new(Some(Rc::clone(&outer)));
        inner.define("a", Object::from(2.0));

        inner.assign_at(1, &Token::from("a"), Object::from(3.0));

        assert_eq!(outer.borrow().get(&Token::from("a")).unwrap(), Object::from(3.0));
        assert_eq!(inner.get_at(0, &Token::from("a")).unwrap(), Object::from(2.0));
    }

    #[test]
    fn shared_parent_between_children() {
        let parent = wrap(Environment::default());
        parent.borrow_mut().define("shared", Object::from(Literal::Nil));

        let left = Environment::new(Some(Rc::clone(&parent)));
        let right = Environment::new(Some(Rc::clone(&parent)));

        left.enclosing.as_ref().unwrap().borrow_mut()
            .define("shared", Object::from(1.0));

        assert_eq!(right.get(&Token::from("shared")).unwrap(), Object::from(1.0));
    }
}
