use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

/// One scope in the lexical chain. Scopes are shared: a closure keeps its
/// defining scope alive through `Rc`, and a later `let` in that scope is
/// visible to the closure because the handle points at live state, not a
/// snapshot.
#[derive(Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// A child scope whose lookups fall back to `outer`. Function calls pass
    /// the callee's captured environment here, never the caller's.
    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Environment {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(obj) => Some(obj.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds in this scope. Rebinding an existing name overwrites it;
    /// shadowing an outer binding leaves the outer one untouched.
    pub fn set(&mut self, name: String, value: Object) {
        self.store.insert(name, value);
    }
}

/// Most call sites want the shared handle, not the bare struct.
pub fn shared(env: Environment) -> Rc<RefCell<Environment>> {
    Rc::new(RefCell::new(env))
}
