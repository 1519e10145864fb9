use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::object::Object;

/// Bindings of one scope plus the scope it is nested in.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed_environment(outer: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: HashMap::default(),
            outer: Some(outer),
        }
    }

    /// Looks `key` up in this scope, then in each enclosing one.
    pub fn get(&self, key: &str) -> Option<Object> {
        match self.store.get(key) {
            Some(obj) => Some(obj.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(key)),
        }
    }

    pub fn set(&mut self, key: String, val: Object) -> Object {
        self.store.insert(key, val.clone());
        val
    }

    /// Drops the bindings of this scope. Closures stored here that captured
    /// this scope are released with them.
    pub fn clear(&mut self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosed_lookup_and_shadowing() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().set(String::from("a"), Object::Integer(1));
        outer.borrow_mut().set(String::from("b"), Object::Integer(2));

        let mut inner = Environment::new_enclosed_environment(outer.clone());
        inner.set(String::from("b"), Object::Integer(3));

        assert_eq!(inner.get("a"), Some(Object::Integer(1)));
        assert_eq!(inner.get("b"), Some(Object::Integer(3)));
        assert_eq!(outer.borrow().get("b"), Some(Object::Integer(2)));
        assert_eq!(inner.get("c"), None);
    }

    #[test]
    fn test_clear_keeps_the_outer_scope() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().set(String::from("a"), Object::Integer(1));

        let mut inner = Environment::new_enclosed_environment(outer.clone());
        inner.set(String::from("b"), Object::Integer(2));
        inner.clear();

        assert_eq!(inner.get("b"), None);
        assert_eq!(inner.get("a"), Some(Object::Integer(1)));
    }
}
