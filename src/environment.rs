use std::collections::HashMap;

use log::trace;

use crate::{error::RuntimeError, interpreter::RuntimeValue, token::Token};

/// One scope's bindings plus the scope that encloses it. The chain is owned
/// front to back, so a child scope can never outlive its parent.
#[derive(Default)]
pub struct Environment {
    enclosing: Option<Box<Environment>>,
    values: HashMap<String, RuntimeValue>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: Box<Environment>) -> Self {
        Self {
            enclosing: Some(enclosing),
            values: HashMap::new(),
        }
    }

    /// Detaches and returns the enclosing scope, dropping this one's bindings.
    pub fn into_enclosing(self) -> Option<Box<Environment>> {
        self.enclosing
    }

    /// Binds `name` in this scope, replacing any earlier binding here.
    pub fn define(&mut self, name: &str, value: RuntimeValue) {
        trace!("define {} = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    pub fn assign(&mut self, name: &Token, value: RuntimeValue) -> Result<(), RuntimeError> {
        match self.values.get_mut(&name.lexeme) {
            Some(slot) => {
                trace!("assign {} = {}", name.lexeme, value);
                *slot = value;
                Ok(())
            }
            None => match &mut self.enclosing {
                Some(enclosing) => enclosing.assign(name, value),
                None => Err(RuntimeError::UndefinedVariable { name: name.clone() }),
            },
        }
    }

    pub fn get(&self, name: &Token) -> Result<RuntimeValue, RuntimeError> {
        match self.values.get(&name.lexeme) {
            Some(value) => Ok(value.clone()),
            None => match &self.enclosing {
                Some(enclosing) => enclosing.get(name),
                None => Err(RuntimeError::UndefinedVariable { name: name.clone() }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn name(lexeme: &str) -> Token {
        Token::new(TokenType::Identifier, lexeme, 1)
    }

    #[test]
    fn lookup_walks_outward() {
        let mut global = Box::new(Environment::new());
        global.define("a", RuntimeValue::Number(1.0));
        let child = Environment::with_enclosing(global);

        assert_eq!(child.get(&name("a")).unwrap(), RuntimeValue::Number(1.0));
    }

    #[test]
    fn inner_definition_shadows_without_touching_outer() {
        let mut global = Box::new(Environment::new());
        global.define("a", RuntimeValue::Number(1.0));
        let mut child = Environment::with_enclosing(global);
        child.define("a", RuntimeValue::Bool(true));

        assert_eq!(child.get(&name("a")).unwrap(), RuntimeValue::Bool(true));
        let global = child.into_enclosing().unwrap();
        assert_eq!(global.get(&name("a")).unwrap(), RuntimeValue::Number(1.0));
    }

    #[test]
    fn assign_updates_nearest_binding() {
        let mut global = Box::new(Environment::new());
        global.define("a", RuntimeValue::Nil);
        let mut child = Environment::with_enclosing(global);
        child.assign(&name("a"), RuntimeValue::Number(2.0)).unwrap();

        let global = child.into_enclosing().unwrap();
        assert_eq!(global.get(&name("a")).unwrap(), RuntimeValue::Number(2.0));
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let mut global = Environment::new();
        let error = global.assign(&name("y"), RuntimeValue::Nil).unwrap_err();

        assert!(matches!(error, RuntimeError::UndefinedVariable { .. }));
        assert!(global.get(&name("y")).is_err());
    }
}
