//! Statement execution, hoisting and loops.

use std::rc::Rc;

use duel_syntax::ast::{Block, DeclKind, ForEachStmt, ForInit, ForStmt, Spanned, Stmt, SwitchStmt, TryStmt, VarDecl};

use super::Interpreter;
use super::patterns::{BindMode, pattern_names, target_name};
use crate::runtime::error::Interrupt;
use crate::runtime::scope::{BindingKind, Scope};
use crate::runtime::value::{Function, Value, strict_equals};

/// How a statement finished.
#[derive(Debug, Clone)]
pub enum Completion {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// Collect `var` names declared anywhere in `block`, without entering nested functions.
pub(crate) fn collect_var_names(block: &[Spanned<Stmt>], out: &mut Vec<String>) {
    for stmt in block {
        collect_stmt_vars(&stmt.node, out);
    }
}

fn collect_stmt_vars(stmt: &Stmt, out: &mut Vec<String>) {
    match stmt {
        Stmt::VarDecl(decl) if decl.kind == DeclKind::Var => {
            for declarator in &decl.declarators {
                pattern_names(&declarator.target.node, out);
            }
        }
        Stmt::If(s) => {
            collect_stmt_vars(&s.consequent.node, out);
            if let Some(alt) = &s.alternate {
                collect_stmt_vars(&alt.node, out);
            }
        }
        Stmt::While(s) | Stmt::DoWhile(s) => collect_stmt_vars(&s.body.node, out),
        Stmt::For(s) => {
            if let Some(ForInit::VarDecl(decl)) = &s.init {
                if decl.kind == DeclKind::Var {
                    for declarator in &decl.declarators {
                        pattern_names(&declarator.target.node, out);
                    }
                }
            }
            collect_stmt_vars(&s.body.node, out);
        }
        Stmt::ForOf(s) | Stmt::ForIn(s) => {
            if s.kind == Some(DeclKind::Var) {
                pattern_names(&s.target.node, out);
            }
            collect_stmt_vars(&s.body.node, out);
        }
        Stmt::Try(s) => {
            collect_var_names(&s.block, out);
            if let Some(handler) = &s.handler {
                collect_var_names(&handler.body, out);
            }
            if let Some(finalizer) = &s.finalizer {
                collect_var_names(finalizer, out);
            }
        }
        Stmt::Switch(s) => {
            for case in &s.cases {
                collect_var_names(&case.body, out);
            }
        }
        Stmt::Block(block) => collect_var_names(block, out),
        _ => {}
    }
}

fn binding_kind(kind: DeclKind) -> BindingKind {
    match kind {
        DeclKind::Var => BindingKind::Var,
        DeclKind::Let => BindingKind::Let,
        DeclKind::Const => BindingKind::Const,
    }
}

/// Whether a block declares anything block-scoped and so needs its own frame.
fn declares_lexically<'a>(stmts: impl IntoIterator<Item = &'a Spanned<Stmt>>) -> bool {
    stmts.into_iter().any(|s| match &s.node {
        Stmt::VarDecl(decl) => decl.kind != DeclKind::Var,
        Stmt::Function(_) => true,
        _ => false,
    })
}

impl Interpreter {
    /// Run `block` directly in `scope` after hoisting its declarations there.
    pub(crate) fn exec_block_in(&mut self, block: &Block, scope: &Scope) -> Result<Completion, Interrupt> {
        self.hoist(block, scope);
        self.exec_stmts(block, scope)
    }

    fn exec_stmts<'a>(
        &mut self,
        stmts: impl IntoIterator<Item = &'a Spanned<Stmt>>,
        scope: &Scope,
    ) -> Result<Completion, Interrupt> {
        for stmt in stmts {
            match self.exec(stmt, scope)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    /// Run `block` in a fresh child scope when it declares block-scoped names.
    fn exec_block(&mut self, block: &Block, scope: &Scope) -> Result<Completion, Interrupt> {
        if declares_lexically(block) {
            let inner = scope.child();
            self.exec_block_in(block, &inner)
        } else {
            self.exec_stmts(block, scope)
        }
    }

    /// Function declarations become callable at block entry; `let`/`const` enter their dead zone.
    fn hoist<'a>(&mut self, stmts: impl IntoIterator<Item = &'a Spanned<Stmt>>, scope: &Scope) {
        for stmt in stmts {
            match &stmt.node {
                Stmt::Function(def) => {
                    let name = def.name.clone().unwrap_or_default();
                    let closure = self.make_closure(def, scope, None);
                    scope.declare(&name, closure, BindingKind::Function);
                }
                Stmt::VarDecl(decl) if decl.kind != DeclKind::Var => {
                    let mut names = Vec::new();
                    for declarator in &decl.declarators {
                        pattern_names(&declarator.target.node, &mut names);
                    }
                    for name in names {
                        scope.declare_uninitialized(&name);
                    }
                }
                _ => {}
            }
        }
    }

    pub(crate) fn exec(&mut self, stmt: &Spanned<Stmt>, scope: &Scope) -> Result<Completion, Interrupt> {
        self.tick()?;
        match &stmt.node {
            Stmt::VarDecl(decl) => {
                self.exec_var_decl(decl, scope)?;
                Ok(Completion::Normal)
            }
            Stmt::Function(_) | Stmt::Empty => Ok(Completion::Normal),
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr, scope)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Stmt::If(s) => {
                if self.eval(&s.test, scope)?.truthy() {
                    self.exec_nested(&s.consequent, scope)
                } else if let Some(alt) = &s.alternate {
                    self.exec_nested(alt, scope)
                } else {
                    Ok(Completion::Normal)
                }
            }
            Stmt::While(s) => {
                while self.eval(&s.test, scope)?.truthy() {
                    self.tick()?;
                    match self.exec_nested(&s.body, scope)? {
                        Completion::Break => break,
                        Completion::Return(v) => return Ok(Completion::Return(v)),
                        Completion::Normal | Completion::Continue => {}
                    }
                }
                Ok(Completion::Normal)
            }
            Stmt::DoWhile(s) => {
                loop {
                    self.tick()?;
                    match self.exec_nested(&s.body, scope)? {
                        Completion::Break => break,
                        Completion::Return(v) => return Ok(Completion::Return(v)),
                        Completion::Normal | Completion::Continue => {}
                    }
                    if !self.eval(&s.test, scope)?.truthy() {
                        break;
                    }
                }
                Ok(Completion::Normal)
            }
            Stmt::For(s) => self.exec_for(s, scope),
            Stmt::ForOf(s) => self.exec_for_of(s, scope),
            Stmt::ForIn(s) => self.exec_for_in(s, scope),
            Stmt::Break => Ok(Completion::Break),
            Stmt::Continue => Ok(Completion::Continue),
            Stmt::Throw(expr) => {
                let value = self.eval(expr, scope)?;
                Err(Interrupt::Throw(value))
            }
            Stmt::Try(s) => self.exec_try(s, scope),
            Stmt::Switch(s) => self.exec_switch(s, scope),
            Stmt::Block(block) => self.exec_block(block, scope),
            Stmt::Expr(expr) => {
                self.eval(expr, scope)?;
                Ok(Completion::Normal)
            }
        }
    }

    /// A statement in a body position (`if (x) let y = 1;` is rejected by the parser, but a lone
    /// function declaration still gets its own frame).
    fn exec_nested(&mut self, stmt: &Spanned<Stmt>, scope: &Scope) -> Result<Completion, Interrupt> {
        if declares_lexically(std::iter::once(stmt)) {
            let inner = scope.child();
            self.hoist(std::iter::once(stmt), &inner);
            self.exec(stmt, &inner)
        } else {
            self.exec(stmt, scope)
        }
    }

    fn exec_var_decl(&mut self, decl: &VarDecl, scope: &Scope) -> Result<(), Interrupt> {
        let kind = binding_kind(decl.kind);
        for declarator in &decl.declarators {
            let value = match &declarator.init {
                Some(init) => self.eval_named(init, scope, target_name(&declarator.target))?,
                // `var x;` keeps whatever the hoisted binding holds
                None if kind == BindingKind::Var => continue,
                None => Value::Undefined,
            };
            self.bind_pattern(&declarator.target, value, scope, BindMode::Declare(kind))?;
        }
        Ok(())
    }

    fn exec_for(&mut self, s: &ForStmt, scope: &Scope) -> Result<Completion, Interrupt> {
        let mut lexical: Vec<String> = Vec::new();
        let mut kind = BindingKind::Let;
        let mut iter_scope = scope.clone();
        match &s.init {
            Some(ForInit::VarDecl(decl)) if decl.kind != DeclKind::Var => {
                kind = binding_kind(decl.kind);
                for declarator in &decl.declarators {
                    pattern_names(&declarator.target.node, &mut lexical);
                }
                iter_scope = scope.child();
                for name in &lexical {
                    iter_scope.declare_uninitialized(name);
                }
                self.exec_var_decl(decl, &iter_scope)?;
            }
            Some(ForInit::VarDecl(decl)) => self.exec_var_decl(decl, scope)?,
            Some(ForInit::Expr(expr)) => {
                self.eval(expr, scope)?;
            }
            None => {}
        }
        loop {
            self.tick()?;
            if let Some(test) = &s.test {
                if !self.eval(test, &iter_scope)?.truthy() {
                    break;
                }
            }
            match self.exec_nested(&s.body, &iter_scope)? {
                Completion::Break => break,
                Completion::Return(v) => return Ok(Completion::Return(v)),
                Completion::Normal | Completion::Continue => {}
            }
            if !lexical.is_empty() {
                // each iteration closes over its own copy of the loop variables
                let next = scope.child();
                for name in &lexical {
                    let value = iter_scope.get_own(name).unwrap_or_default();
                    next.declare(name, value, kind);
                }
                iter_scope = next;
            }
            if let Some(update) = &s.update {
                self.eval(update, &iter_scope)?;
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_for_of(&mut self, s: &ForEachStmt, scope: &Scope) -> Result<Completion, Interrupt> {
        let iterable = self.eval(&s.iterable, scope)?;
        match &iterable {
            // arrays are walked live so pushes during iteration are visited
            Value::Array(items) => {
                let mut i = 0;
                loop {
                    let Some(item) = items.borrow().get(i).cloned() else { break };
                    i += 1;
                    match self.for_each_step(s, item, scope)? {
                        Completion::Break => break,
                        Completion::Return(v) => return Ok(Completion::Return(v)),
                        Completion::Normal | Completion::Continue => {}
                    }
                }
            }
            other => {
                for item in self.iterate(other)? {
                    match self.for_each_step(s, item, scope)? {
                        Completion::Break => break,
                        Completion::Return(v) => return Ok(Completion::Return(v)),
                        Completion::Normal | Completion::Continue => {}
                    }
                }
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_for_in(&mut self, s: &ForEachStmt, scope: &Scope) -> Result<Completion, Interrupt> {
        let object = self.eval(&s.iterable, scope)?;
        for key in self.own_keys(&object) {
            match self.for_each_step(s, Value::String(key), scope)? {
                Completion::Break => break,
                Completion::Return(v) => return Ok(Completion::Return(v)),
                Completion::Normal | Completion::Continue => {}
            }
        }
        Ok(Completion::Normal)
    }

    fn for_each_step(&mut self, s: &ForEachStmt, item: Value, scope: &Scope) -> Result<Completion, Interrupt> {
        self.tick()?;
        match s.kind {
            Some(DeclKind::Var) => {
                self.bind_pattern(&s.target, item, scope, BindMode::Declare(BindingKind::Var))?;
                self.exec_nested(&s.body, scope)
            }
            Some(kind) => {
                let inner = scope.child();
                self.bind_pattern(&s.target, item, &inner, BindMode::Declare(binding_kind(kind)))?;
                self.exec_nested(&s.body, &inner)
            }
            None => {
                self.bind_pattern(&s.target, item, scope, BindMode::Assign)?;
                self.exec_nested(&s.body, scope)
            }
        }
    }

    fn exec_try(&mut self, s: &TryStmt, scope: &Scope) -> Result<Completion, Interrupt> {
        let mut result = self.exec_block(&s.block, scope);
        if let (Err(Interrupt::Throw(thrown)), Some(handler)) = (&result, &s.handler) {
            let thrown = thrown.clone();
            let catch_scope = scope.child();
            result = match &handler.param {
                Some(param) => self
                    .bind_pattern(param, thrown, &catch_scope, BindMode::Declare(BindingKind::Let))
                    .and_then(|()| self.exec_block_in(&handler.body, &catch_scope)),
                None => self.exec_block_in(&handler.body, &catch_scope),
            };
        }
        // a halt skips `finally` like it skips `catch`
        if let Err(Interrupt::Halt(_)) = &result {
            return result;
        }
        if let Some(finalizer) = &s.finalizer {
            match self.exec_block(finalizer, scope)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        result
    }

    fn exec_switch(&mut self, s: &SwitchStmt, scope: &Scope) -> Result<Completion, Interrupt> {
        let discriminant = self.eval(&s.discriminant, scope)?;
        let body = s.cases.iter().flat_map(|c| c.body.iter());
        let inner = if declares_lexically(body.clone()) {
            let inner = scope.child();
            self.hoist(body, &inner);
            inner
        } else {
            scope.clone()
        };
        let mut start = None;
        for (i, case) in s.cases.iter().enumerate() {
            if let Some(test) = &case.test {
                let value = self.eval(test, &inner)?;
                if strict_equals(&discriminant, &value) {
                    start = Some(i);
                    break;
                }
            }
        }
        let start = start.or_else(|| s.cases.iter().position(|c| c.test.is_none()));
        let Some(start) = start else {
            return Ok(Completion::Normal);
        };
        let rest = s.cases[start..].iter().flat_map(|c| c.body.iter());
        match self.exec_stmts(rest, &inner)? {
            Completion::Break => Ok(Completion::Normal),
            other => Ok(other),
        }
    }

    /// Create a closure over `scope` and register the scope for teardown.
    pub(crate) fn make_closure(
        &mut self,
        def: &Rc<duel_syntax::ast::Function>,
        scope: &Scope,
        inferred: Option<&str>,
    ) -> Value {
        let name: Rc<str> = match (&def.name, inferred) {
            (Some(name), _) => Rc::from(name.as_str()),
            (None, Some(name)) => Rc::from(name),
            (None, None) => Rc::from(""),
        };
        self.track_capture(scope);
        Value::function(Function::closure(def.clone(), scope.clone(), name))
    }
}
