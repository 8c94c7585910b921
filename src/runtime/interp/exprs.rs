//! Expression evaluation.

use indexmap::IndexMap;

use duel_core::errors::{self, ErrorKind, INVALID_ARRAY_LENGTH_MSG, INVALID_STRING_LENGTH_MSG};
use duel_syntax::ast::{
    Argument, ArrayElement, AssignOp, Expr, LogicalOp, MemberProp, Pattern, Property, PropKey, Spanned, TemplatePart,
    UnaryOp, UpdateOp,
};

use super::Interpreter;
use super::patterns::BindMode;
use crate::runtime::builtins::regexp;
use crate::runtime::error::Interrupt;
use crate::runtime::scope::{Scope, ScopeError};
use crate::runtime::value::Value;

/// A resolved assignment target, evaluated once for compound assignment and updates.
enum Reference {
    Name(String),
    Member(Value, Value),
}

impl Interpreter {
    pub(crate) fn eval(&mut self, expr: &Spanned<Expr>, scope: &Scope) -> Result<Value, Interrupt> {
        match &expr.node {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::string(s.as_str())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Template(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Str(s) => out.push_str(s),
                        TemplatePart::Expr(e) => {
                            let value = self.eval(e, scope)?;
                            out.push_str(&self.to_string(&value)?);
                        }
                    }
                    self.check_len(out.len(), INVALID_STRING_LENGTH_MSG)?;
                }
                Ok(Value::string(out))
            }
            Expr::Regex { pattern, flags } => regexp::new_regexp(self, pattern, flags),
            Expr::Ident(name) => scope.lookup(name).map_err(|err| self.scope_error(name, err)),
            Expr::This => Ok(scope.this()),
            Expr::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    match element {
                        ArrayElement::Expr(e) => items.push(self.eval(e, scope)?),
                        ArrayElement::Spread(e) => {
                            let spread = self.eval(e, scope)?;
                            items.extend(self.iterate(&spread)?);
                        }
                        ArrayElement::Hole => items.push(Value::Undefined),
                    }
                    self.check_len(items.len(), INVALID_ARRAY_LENGTH_MSG)?;
                }
                Ok(Value::array(items))
            }
            Expr::Object(props) => self.eval_object(props, scope),
            Expr::Function(def) => Ok(self.make_closure(def, scope, None)),
            Expr::Unary(op, operand) => self.eval_unary(*op, operand, scope),
            Expr::Update { op, prefix, target } => {
                let reference = self.resolve_expr(target, scope)?;
                let old = self.read_ref(&reference, scope)?;
                let old = self.to_number(&old)?;
                let new = match op {
                    UpdateOp::Inc => old + 1.0,
                    UpdateOp::Dec => old - 1.0,
                };
                self.write_ref(&reference, Value::Number(new), scope)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            Expr::Binary(left, op, right) => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                self.binary(*op, &left, &right)
            }
            Expr::Logical(left, op, right) => {
                let left = self.eval(left, scope)?;
                let short_circuit = match op {
                    LogicalOp::And => !left.truthy(),
                    LogicalOp::Or => left.truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit { Ok(left) } else { self.eval(right, scope) }
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test, scope)?.truthy() {
                    self.eval(consequent, scope)
                } else {
                    self.eval(alternate, scope)
                }
            }
            Expr::Assign { op, target, value } => self.eval_assign(*op, target, value, scope),
            Expr::Member { .. } | Expr::Call { .. } => Ok(self.eval_chain(expr, scope)?.unwrap_or_default()),
            Expr::New { callee, args } => {
                let ctor = self.eval(callee, scope)?;
                let args = self.eval_args(args, scope)?;
                self.construct(&ctor, args, || callee.node.describe())
            }
            Expr::Sequence(exprs) => {
                let mut last = Value::Undefined;
                for e in exprs {
                    last = self.eval(e, scope)?;
                }
                Ok(last)
            }
        }
    }

    /// Evaluate `expr`, naming an anonymous function after the binding it is assigned to.
    pub(crate) fn eval_named(
        &mut self,
        expr: &Spanned<Expr>,
        scope: &Scope,
        name: Option<&str>,
    ) -> Result<Value, Interrupt> {
        match (&expr.node, name) {
            (Expr::Function(def), Some(name)) if def.name.is_none() => Ok(self.make_closure(def, scope, Some(name))),
            _ => self.eval(expr, scope),
        }
    }

    fn eval_object(&mut self, props: &[Property], scope: &Scope) -> Result<Value, Interrupt> {
        let mut out = IndexMap::with_capacity(props.len());
        for prop in props {
            match prop {
                Property::KeyValue(key, value) => {
                    let key = match key {
                        PropKey::Static(key) => key.clone(),
                        PropKey::Computed(expr) => {
                            let key = self.eval(expr, scope)?;
                            self.to_property_key(&key)?.to_string()
                        }
                    };
                    let value = self.eval_named(value, scope, Some(&key))?;
                    out.insert(key, value);
                }
                Property::Shorthand(name) => {
                    let value = scope.lookup(name).map_err(|err| self.scope_error(name, err))?;
                    out.insert(name.clone(), value);
                }
                Property::Spread(expr) => {
                    let source = self.eval(expr, scope)?;
                    for key in self.own_keys(&source) {
                        let value = self.get_property(&source, &key)?;
                        out.insert(key.to_string(), value);
                    }
                }
            }
        }
        Ok(Value::object(out))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Spanned<Expr>, scope: &Scope) -> Result<Value, Interrupt> {
        match op {
            UnaryOp::TypeOf => {
                if let Expr::Ident(name) = &operand.node {
                    return match scope.lookup(name) {
                        Ok(value) => Ok(Value::string(value.type_of())),
                        Err(ScopeError::NotDefined) => Ok(Value::string("undefined")),
                        Err(err) => Err(self.scope_error(name, err)),
                    };
                }
                let value = self.eval(operand, scope)?;
                Ok(Value::string(value.type_of()))
            }
            UnaryOp::Delete => match &operand.node {
                Expr::Member { object, property, .. } => {
                    let base = self.eval(object, scope)?;
                    let key = self.member_key(property, scope)?;
                    Ok(Value::Bool(self.delete_property(&base, &key)?))
                }
                _ => {
                    self.eval(operand, scope)?;
                    Ok(Value::Bool(true))
                }
            },
            UnaryOp::Void => {
                self.eval(operand, scope)?;
                Ok(Value::Undefined)
            }
            UnaryOp::Not => Ok(Value::Bool(!self.eval(operand, scope)?.truthy())),
            UnaryOp::Neg => {
                let value = self.eval(operand, scope)?;
                Ok(Value::Number(-self.to_number(&value)?))
            }
            UnaryOp::Plus => {
                let value = self.eval(operand, scope)?;
                Ok(Value::Number(self.to_number(&value)?))
            }
            UnaryOp::BitNot => {
                let value = self.eval(operand, scope)?;
                let n = self.to_number(&value)?;
                Ok(Value::Number(f64::from(!duel_core::numbers::to_int32(n))))
            }
        }
    }

    fn eval_assign(
        &mut self,
        op: AssignOp,
        target: &Spanned<Pattern>,
        value: &Spanned<Expr>,
        scope: &Scope,
    ) -> Result<Value, Interrupt> {
        if op == AssignOp::Assign {
            let name = match &target.node {
                Pattern::Ident(name) => Some(name.as_str()),
                _ => None,
            };
            let value = self.eval_named(value, scope, name)?;
            self.bind_pattern(target, value.clone(), scope, BindMode::Assign)?;
            return Ok(value);
        }
        let reference = match &target.node {
            Pattern::Ident(name) => Reference::Name(name.clone()),
            Pattern::Member(expr) => self.resolve_expr(expr, scope)?,
            _ => return Err(self.throw(ErrorKind::SyntaxError, "Invalid left-hand side in assignment")),
        };
        let current = self.read_ref(&reference, scope)?;
        let result = match op {
            AssignOp::Compound(binary) => {
                let rhs = self.eval(value, scope)?;
                self.binary(binary, &current, &rhs)?
            }
            AssignOp::Logical(logical) => {
                let keep = match logical {
                    LogicalOp::And => !current.truthy(),
                    LogicalOp::Or => current.truthy(),
                    LogicalOp::Nullish => !current.is_nullish(),
                };
                if keep {
                    return Ok(current);
                }
                self.eval(value, scope)?
            }
            AssignOp::Assign => self.eval(value, scope)?,
        };
        self.write_ref(&reference, result.clone(), scope)?;
        Ok(result)
    }

    fn resolve_expr(&mut self, expr: &Spanned<Expr>, scope: &Scope) -> Result<Reference, Interrupt> {
        match &expr.node {
            Expr::Ident(name) => Ok(Reference::Name(name.clone())),
            Expr::Member { object, property, .. } => {
                let base = self.eval(object, scope)?;
                let key = self.member_key(property, scope)?;
                Ok(Reference::Member(base, key))
            }
            _ => Err(self.throw(ErrorKind::SyntaxError, "Invalid left-hand side in assignment")),
        }
    }

    fn read_ref(&mut self, reference: &Reference, scope: &Scope) -> Result<Value, Interrupt> {
        match reference {
            Reference::Name(name) => scope.lookup(name).map_err(|err| self.scope_error(name, err)),
            Reference::Member(base, key) => self.get_member(base, key),
        }
    }

    fn write_ref(&mut self, reference: &Reference, value: Value, scope: &Scope) -> Result<(), Interrupt> {
        match reference {
            Reference::Name(name) => self.assign_name(name, value, scope),
            Reference::Member(base, key) => self.set_member(base, key, value),
        }
    }

    fn member_key(&mut self, property: &MemberProp, scope: &Scope) -> Result<Value, Interrupt> {
        match property {
            MemberProp::Static(name) => Ok(Value::string(name.as_str())),
            MemberProp::Computed(expr) => self.eval(expr, scope),
        }
    }

    /// Evaluate a member/call chain. `None` means an optional link short-circuited the whole chain.
    fn eval_chain(&mut self, expr: &Spanned<Expr>, scope: &Scope) -> Result<Option<Value>, Interrupt> {
        match &expr.node {
            Expr::Member {
                object,
                property,
                optional,
            } => {
                let Some(base) = self.eval_chain(object, scope)? else {
                    return Ok(None);
                };
                if *optional && base.is_nullish() {
                    return Ok(None);
                }
                self.read_member(&base, property, scope).map(Some)
            }
            Expr::Call { callee, args, optional } => {
                let (function, this) = match &callee.node {
                    Expr::Member {
                        object,
                        property,
                        optional: member_optional,
                    } => {
                        let Some(base) = self.eval_chain(object, scope)? else {
                            return Ok(None);
                        };
                        if *member_optional && base.is_nullish() {
                            return Ok(None);
                        }
                        let function = self.read_member(&base, property, scope)?;
                        (function, base)
                    }
                    _ => {
                        let Some(function) = self.eval_chain(callee, scope)? else {
                            return Ok(None);
                        };
                        (function, Value::Undefined)
                    }
                };
                if *optional && function.is_nullish() {
                    return Ok(None);
                }
                if !matches!(function, Value::Function(_)) {
                    return Err(self.type_error(errors::not_a_function_message(&callee.node.describe())));
                }
                let args = self.eval_args(args, scope)?;
                self.call(&function, this, args).map(Some)
            }
            _ => self.eval(expr, scope).map(Some),
        }
    }

    fn read_member(&mut self, base: &Value, property: &MemberProp, scope: &Scope) -> Result<Value, Interrupt> {
        match property {
            MemberProp::Static(name) => self.get_property(base, name),
            MemberProp::Computed(expr) => {
                let key = self.eval(expr, scope)?;
                self.get_member(base, &key)
            }
        }
    }

    fn eval_args(&mut self, args: &[Argument], scope: &Scope) -> Result<Vec<Value>, Interrupt> {
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                Argument::Expr(e) => out.push(self.eval(e, scope)?),
                Argument::Spread(e) => {
                    let spread = self.eval(e, scope)?;
                    out.extend(self.iterate(&spread)?);
                }
            }
        }
        Ok(out)
    }
}
