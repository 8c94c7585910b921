//! Calling and constructing functions.

use std::rc::Rc;

use duel_core::errors::MAX_CALL_STACK_MSG;
use duel_syntax::ast::FunctionBody;

use super::Interpreter;
use super::patterns::BindMode;
use super::stmts::Completion;
use crate::runtime::error::Interrupt;
use crate::runtime::scope::BindingKind;
use crate::runtime::value::{Closure, Function, FunctionKind, JsObject, ObjectClass, Value};

impl Interpreter {
    /// Call `callee` with an explicit `this`.
    pub fn call(&mut self, callee: &Value, this: Value, args: Vec<Value>) -> Result<Value, Interrupt> {
        let Value::Function(function) = callee else {
            let shown = self.to_string_lossy(callee);
            return Err(self.type_error(duel_core::errors::not_a_function_message(&shown)));
        };
        self.call_function(function, this, args)
    }

    pub(crate) fn call_function(
        &mut self,
        function: &Rc<Function>,
        this: Value,
        args: Vec<Value>,
    ) -> Result<Value, Interrupt> {
        if self.call_depth >= self.limits.max_call_depth {
            return Err(self.range_error(MAX_CALL_STACK_MSG));
        }
        self.tick()?;
        self.call_depth += 1;
        let result = match &function.kind {
            FunctionKind::Closure(closure) => self.call_closure(function, closure, this, args),
            FunctionKind::Native(native) => (native.func)(self, &this, &args),
            FunctionKind::Bound(bound) => {
                let mut full = bound.args.clone();
                full.extend(args);
                let target = bound.target.clone();
                let this = bound.this.clone();
                self.call_function(&target, this, full)
            }
        };
        self.call_depth -= 1;
        result
    }

    fn call_closure(
        &mut self,
        function: &Rc<Function>,
        closure: &Closure,
        this: Value,
        args: Vec<Value>,
    ) -> Result<Value, Interrupt> {
        let def = &closure.def;
        let scope = if def.is_arrow {
            closure.scope.function(None)
        } else {
            let scope = closure.scope.function(Some(this));
            if let Some(name) = &def.name {
                if closure.scope.get_own(name).is_none() {
                    // a named function expression sees itself by name
                    scope.declare(name, Value::Function(function.clone()), BindingKind::Function);
                }
            }
            scope.declare("arguments", Value::array(args.clone()), BindingKind::Var);
            scope
        };
        for (i, param) in def.params.iter().enumerate() {
            let mut value = args.get(i).cloned().unwrap_or_default();
            if let (Value::Undefined, Some(default)) = (&value, &param.default) {
                value = self.eval_named(default, &scope, super::patterns::target_name(&param.pattern))?;
            }
            self.bind_pattern(&param.pattern, value, &scope, BindMode::Declare(BindingKind::Function))?;
        }
        if let Some(rest) = &def.rest {
            let remaining = args.get(def.params.len()..).map(<[Value]>::to_vec).unwrap_or_default();
            self.bind_pattern(rest, Value::array(remaining), &scope, BindMode::Declare(BindingKind::Function))?;
        }
        match &def.body {
            FunctionBody::Expr(expr) => self.eval(expr, &scope),
            FunctionBody::Block(body) => {
                for name in self.function_var_names(def).iter() {
                    scope.declare_var(name);
                }
                match self.exec_block_in(body, &scope)? {
                    Completion::Return(value) => Ok(value),
                    _ => Ok(Value::Undefined),
                }
            }
        }
    }

    /// The `new` operator.
    pub(crate) fn construct(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        describe: impl FnOnce() -> String,
    ) -> Result<Value, Interrupt> {
        let Value::Function(function) = callee else {
            return Err(self.type_error(format!("{} is not a constructor", describe())));
        };
        self.construct_function(function, args, describe)
    }

    fn construct_function(
        &mut self,
        function: &Rc<Function>,
        args: Vec<Value>,
        describe: impl FnOnce() -> String,
    ) -> Result<Value, Interrupt> {
        match &function.kind {
            FunctionKind::Native(native) => match native.construct {
                Some(construct) => {
                    if self.call_depth >= self.limits.max_call_depth {
                        return Err(self.range_error(MAX_CALL_STACK_MSG));
                    }
                    self.call_depth += 1;
                    let result = construct(self, &Value::Undefined, &args);
                    self.call_depth -= 1;
                    result
                }
                None => Err(self.type_error(format!("{} is not a constructor", describe()))),
            },
            FunctionKind::Closure(closure) if closure.def.is_arrow => {
                Err(self.type_error(format!("{} is not a constructor", describe())))
            }
            FunctionKind::Closure(_) => {
                let mut object = JsObject::new(ObjectClass::Plain);
                object.constructor = Some(function.clone());
                let instance = Value::from_object(object);
                let result = self.call_function(function, instance.clone(), args)?;
                Ok(if result.is_object_like() { result } else { instance })
            }
            FunctionKind::Bound(bound) => {
                let mut full = bound.args.clone();
                full.extend(args);
                let target = bound.target.clone();
                self.construct_function(&target, full, describe)
            }
        }
    }
}
