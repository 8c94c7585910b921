//! Destructuring and assignment targets.

use indexmap::IndexMap;

use duel_core::errors;
use duel_syntax::ast::{Expr, MemberProp, Pattern, PatternElement, PropKey, Spanned};

use super::Interpreter;
use crate::runtime::error::Interrupt;
use crate::runtime::scope::{BindingKind, Scope, ScopeError};
use crate::runtime::value::Value;

/// What binding a pattern does with each name it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindMode {
    Declare(BindingKind),
    Assign,
}

/// Collect every name a pattern declares.
pub(crate) fn pattern_names(pattern: &Pattern, out: &mut Vec<String>) {
    match pattern {
        Pattern::Ident(name) => out.push(name.clone()),
        Pattern::Member(_) => {}
        Pattern::Array(array) => {
            for element in array.elements.iter().flatten() {
                pattern_names(&element.target.node, out);
            }
            if let Some(rest) = &array.rest {
                pattern_names(&rest.node, out);
            }
        }
        Pattern::Object(object) => {
            for prop in &object.props {
                pattern_names(&prop.value.target.node, out);
            }
            if let Some(rest) = &object.rest {
                pattern_names(&rest.node, out);
            }
        }
    }
}

impl Interpreter {
    pub(crate) fn bind_pattern(
        &mut self,
        pattern: &Spanned<Pattern>,
        value: Value,
        scope: &Scope,
        mode: BindMode,
    ) -> Result<(), Interrupt> {
        match &pattern.node {
            Pattern::Ident(name) => self.bind_name(name, value, scope, mode),
            Pattern::Member(target) => {
                let Expr::Member { object, property, .. } = &target.node else {
                    return Err(self.throw(errors::ErrorKind::SyntaxError, "Invalid assignment target"));
                };
                let base = self.eval(object, scope)?;
                match property {
                    MemberProp::Static(key) => self.set_property(&base, key, value),
                    MemberProp::Computed(key) => {
                        let key = self.eval(key, scope)?;
                        self.set_member(&base, &key, value)
                    }
                }
            }
            Pattern::Array(array) => {
                if value.is_nullish() {
                    return Err(self.type_error(format!("{} is not iterable", value.kind_name())));
                }
                let items = self.iterate(&value)?;
                for (i, element) in array.elements.iter().enumerate() {
                    if let Some(element) = element {
                        let item = items.get(i).cloned().unwrap_or_default();
                        self.bind_element(element, item, scope, mode)?;
                    }
                }
                if let Some(rest) = &array.rest {
                    let remaining = items.get(array.elements.len()..).map(<[Value]>::to_vec).unwrap_or_default();
                    self.bind_pattern(rest, Value::array(remaining), scope, mode)?;
                }
                Ok(())
            }
            Pattern::Object(object) => {
                if value.is_nullish() {
                    return Err(self.type_error(format!(
                        "Cannot destructure '{}' as it is {}.",
                        value.kind_name(),
                        value.kind_name()
                    )));
                }
                let mut used = Vec::with_capacity(object.props.len());
                for prop in &object.props {
                    let key = match &prop.key {
                        PropKey::Static(key) => key.as_str().into(),
                        PropKey::Computed(expr) => {
                            let key = self.eval(expr, scope)?;
                            self.to_property_key(&key)?
                        }
                    };
                    let item = self.get_property(&value, &key)?;
                    used.push(key);
                    self.bind_element(&prop.value, item, scope, mode)?;
                }
                if let Some(rest) = &object.rest {
                    let mut remaining = IndexMap::new();
                    for key in self.own_keys(&value) {
                        if !used.contains(&key) {
                            let item = self.get_property(&value, &key)?;
                            remaining.insert(key.to_string(), item);
                        }
                    }
                    self.bind_pattern(rest, Value::object(remaining), scope, mode)?;
                }
                Ok(())
            }
        }
    }

    fn bind_element(
        &mut self,
        element: &PatternElement,
        value: Value,
        scope: &Scope,
        mode: BindMode,
    ) -> Result<(), Interrupt> {
        let value = match (&element.default, value) {
            (Some(default), Value::Undefined) => self.eval_named(default, scope, target_name(&element.target))?,
            (_, value) => value,
        };
        self.bind_pattern(&element.target, value, scope, mode)
    }

    fn bind_name(&mut self, name: &str, value: Value, scope: &Scope, mode: BindMode) -> Result<(), Interrupt> {
        match mode {
            BindMode::Declare(BindingKind::Var) => {
                scope.function_scope().declare(name, value, BindingKind::Var);
                Ok(())
            }
            BindMode::Declare(BindingKind::Function) => {
                scope.declare(name, value, BindingKind::Function);
                Ok(())
            }
            BindMode::Declare(kind) => {
                scope.initialize(name, value, kind);
                Ok(())
            }
            BindMode::Assign => self.assign_name(name, value, scope),
        }
    }

    /// Assign to an existing binding, mapping scope failures onto script errors.
    pub(crate) fn assign_name(&mut self, name: &str, value: Value, scope: &Scope) -> Result<(), Interrupt> {
        scope.assign(name, value).map_err(|err| self.scope_error(name, err))
    }

    pub(crate) fn scope_error(&self, name: &str, err: ScopeError) -> Interrupt {
        match err {
            ScopeError::NotDefined => self.throw(errors::ErrorKind::ReferenceError, errors::not_defined_message(name)),
            ScopeError::Uninitialized => self.throw(
                errors::ErrorKind::ReferenceError,
                format!("Cannot access '{name}' before initialization"),
            ),
            ScopeError::ConstAssignment => self.type_error(errors::CONST_ASSIGNMENT_MSG),
        }
    }
}

/// Name given to an anonymous function bound directly to an identifier.
pub(crate) fn target_name(pattern: &Spanned<Pattern>) -> Option<&str> {
    match &pattern.node {
        Pattern::Ident(name) => Some(name),
        _ => None,
    }
}
