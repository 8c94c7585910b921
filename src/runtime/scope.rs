//! Lexical environments.
//!
//! A [`Scope`] is a shared, mutable frame with a parent link. Function calls create a *function scope*
//! (the target of `var` and the holder of `this`); blocks create plain child scopes for `let`/`const`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::value::Value;

/// How a name was declared; decides mutability and redeclaration rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    /// Function declarations and parameters behave like `var`.
    Function,
}

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    mutable: bool,
    /// `false` between block entry and the `let`/`const` declaration (the temporal dead zone).
    initialized: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ScopeData {
    vars: HashMap<String, Binding>,
    parent: Option<Scope>,
    /// `Some` on function scopes of non-arrow functions and on the top-level scope.
    this: Option<Value>,
    is_function: bool,
}

/// Why a lookup or assignment failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    NotDefined,
    Uninitialized,
    ConstAssignment,
}

/// Shared handle to a scope frame.
#[derive(Debug, Clone)]
pub struct Scope(Rc<RefCell<ScopeData>>);

impl Scope {
    /// A root scope (the globals frame).
    pub fn root() -> Scope {
        Scope(Rc::new(RefCell::new(ScopeData {
            this: Some(Value::Undefined),
            is_function: true,
            ..ScopeData::default()
        })))
    }

    /// A block scope nested in `self`.
    pub fn child(&self) -> Scope {
        Scope(Rc::new(RefCell::new(ScopeData {
            parent: Some(self.clone()),
            ..ScopeData::default()
        })))
    }

    /// A function scope nested in `self`. Arrow functions pass `None` so `this` resolves lexically.
    pub fn function(&self, this: Option<Value>) -> Scope {
        Scope(Rc::new(RefCell::new(ScopeData {
            parent: Some(self.clone()),
            this,
            is_function: true,
            ..ScopeData::default()
        })))
    }

    /// Bind `name` in this frame, replacing an existing binding.
    pub fn declare(&self, name: &str, value: Value, kind: BindingKind) {
        let binding = Binding {
            value,
            mutable: kind != BindingKind::Const,
            initialized: true,
        };
        self.0.borrow_mut().vars.insert(name.to_string(), binding);
    }

    /// Reserve a `let`/`const` name in this frame before its declaration runs.
    pub fn declare_uninitialized(&self, name: &str) {
        let mut data = self.0.borrow_mut();
        data.vars.entry(name.to_string()).or_insert(Binding {
            value: Value::Undefined,
            mutable: true,
            initialized: false,
        });
    }

    /// Hoist a `var` into the nearest function scope, keeping any existing value.
    pub fn declare_var(&self, name: &str) {
        let target = self.function_scope();
        let mut data = target.0.borrow_mut();
        data.vars.entry(name.to_string()).or_insert(Binding {
            value: Value::Undefined,
            mutable: true,
            initialized: true,
        });
    }

    /// The nearest enclosing function scope (or the root).
    pub fn function_scope(&self) -> Scope {
        let mut current = self.clone();
        loop {
            let parent = {
                let data = current.0.borrow();
                if data.is_function {
                    return current.clone();
                }
                data.parent.clone()
            };
            match parent {
                Some(p) => current = p,
                None => return current,
            }
        }
    }

    /// Resolve `name` through the scope chain.
    pub fn lookup(&self, name: &str) -> Result<Value, ScopeError> {
        let mut current = self.clone();
        loop {
            let parent = {
                let data = current.0.borrow();
                if let Some(binding) = data.vars.get(name) {
                    if !binding.initialized {
                        return Err(ScopeError::Uninitialized);
                    }
                    return Ok(binding.value.clone());
                }
                data.parent.clone()
            };
            match parent {
                Some(p) => current = p,
                None => return Err(ScopeError::NotDefined),
            }
        }
    }

    /// Whether `name` resolves anywhere in the chain (used by `typeof` on undeclared names).
    pub fn has(&self, name: &str) -> bool {
        !matches!(self.lookup(name), Err(ScopeError::NotDefined))
    }

    /// Assign to the nearest binding of `name`.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), ScopeError> {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut data = current.0.borrow_mut();
                if let Some(binding) = data.vars.get_mut(name) {
                    if !binding.initialized {
                        return Err(ScopeError::Uninitialized);
                    }
                    if !binding.mutable {
                        return Err(ScopeError::ConstAssignment);
                    }
                    binding.value = value;
                    return Ok(());
                }
                data.parent.clone()
            };
            match parent {
                Some(p) => current = p,
                None => return Err(ScopeError::NotDefined),
            }
        }
    }

    /// Initialize a binding reserved with [`Scope::declare_uninitialized`] (or create it).
    pub fn initialize(&self, name: &str, value: Value, kind: BindingKind) {
        self.declare(name, value, kind);
    }

    /// The `this` value visible from this scope.
    pub fn this(&self) -> Value {
        let mut current = self.clone();
        loop {
            let parent = {
                let data = current.0.borrow();
                if let Some(this) = &data.this {
                    return this.clone();
                }
                data.parent.clone()
            };
            match parent {
                Some(p) => current = p,
                None => return Value::Undefined,
            }
        }
    }

    /// Names bound directly in this frame, in no particular order.
    pub fn own_names(&self) -> Vec<String> {
        self.0.borrow().vars.keys().cloned().collect()
    }

    /// Read a binding of this frame only.
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0.borrow().vars.get(name).map(|b| b.value.clone())
    }

    /// Drop every binding in this frame. Breaks `Rc` cycles between closures and the scopes they capture.
    pub fn clear(&self) {
        let (vars, parent, this) = {
            let mut data = self.0.borrow_mut();
            (std::mem::take(&mut data.vars), data.parent.take(), data.this.take())
        };
        drop((vars, parent, this));
    }

    pub(crate) fn downgrade(&self) -> std::rc::Weak<RefCell<ScopeData>> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(weak: &std::rc::Weak<RefCell<ScopeData>>) -> Option<Scope> {
        weak.upgrade().map(Scope)
    }
}

/// Weak handle kept by the interpreter so captured scopes can be cleared at teardown.
pub(crate) type WeakScope = std::rc::Weak<RefCell<ScopeData>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_parents() {
        let root = Scope::root();
        root.declare("x", Value::Number(1.0), BindingKind::Let);
        let inner = root.child().child();
        assert!(matches!(inner.lookup("x"), Ok(Value::Number(n)) if n == 1.0));
        assert_eq!(inner.lookup("y").unwrap_err(), ScopeError::NotDefined);
    }

    #[test]
    fn test_const_assignment_is_rejected() {
        let root = Scope::root();
        root.declare("c", Value::Number(1.0), BindingKind::Const);
        assert_eq!(root.child().assign("c", Value::Null).unwrap_err(), ScopeError::ConstAssignment);
    }

    #[test]
    fn test_var_hoists_to_function_scope() {
        let root = Scope::root();
        let func = root.function(Some(Value::Undefined));
        let block = func.child();
        block.declare_var("v");
        assert!(func.get_own("v").is_some());
        assert!(root.get_own("v").is_none());
    }

    #[test]
    fn test_temporal_dead_zone() {
        let root = Scope::root();
        let block = root.child();
        block.declare_uninitialized("later");
        assert_eq!(block.lookup("later").unwrap_err(), ScopeError::Uninitialized);
        block.initialize("later", Value::Bool(true), BindingKind::Let);
        assert!(block.lookup("later").is_ok());
    }

    #[test]
    fn test_arrow_scopes_inherit_this() {
        let root = Scope::root();
        let method = root.function(Some(Value::Number(7.0)));
        let arrow = method.function(None);
        assert!(matches!(arrow.this(), Value::Number(n) if n == 7.0));
    }
}
