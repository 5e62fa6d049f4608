//! Lexical scope tracking for free-name classification.
//!
//! A name is *local* when some enclosing function literal, block, `catch`
//! clause or loop head inside the analyzed statement binds it. Everything
//! else is *free* and resolves against the top-level element index. Names
//! that are not recognized as bound stay free, which can only over-retain.

use rustc_hash::FxHashSet;

use crate::oxc::ast::{
    ArrowFunctionExpression, BindingIdentifier, BindingPattern, Class, Expression,
    FormalParameters, Function, Statement, VariableDeclaration, VariableDeclarationKind,
};
use crate::oxc::{ScopeFlags, Visit};

/// Stack of bound-name sets, innermost last.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    scopes: Vec<FxHashSet<String>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, names: FxHashSet<String>) {
        self.scopes.push(names);
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

/// Names bound inside a function literal: its parameters, its own name when
/// it is an expression, `var`-hoisted names and body-level lexical
/// declarations.
pub(crate) fn function_scope(func: &Function<'_>) -> FxHashSet<String> {
    let mut names = parameter_names(&func.params);
    if func.is_expression() {
        if let Some(id) = &func.id {
            names.insert(id.name.to_string());
        }
    }
    if let Some(body) = &func.body {
        names.extend(hoisted_var_names(&body.statements));
        names.extend(lexical_names(&body.statements));
    }
    names
}

pub(crate) fn arrow_scope(arrow: &ArrowFunctionExpression<'_>) -> FxHashSet<String> {
    let mut names = parameter_names(&arrow.params);
    names.extend(hoisted_var_names(&arrow.body.statements));
    names.extend(lexical_names(&arrow.body.statements));
    names
}

/// A named class expression binds its own name inside its body.
pub(crate) fn class_scope(class: &Class<'_>) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    if class.is_expression() {
        if let Some(id) = &class.id {
            names.insert(id.name.to_string());
        }
    }
    names
}

pub(crate) fn parameter_names(params: &FormalParameters<'_>) -> FxHashSet<String> {
    let mut collector = BindingNames::default();
    collector.visit_formal_parameters(params);
    collector.names.into_iter().collect()
}

/// Names bound by a pattern, in source order.
pub(crate) fn pattern_names(pattern: &BindingPattern<'_>) -> Vec<String> {
    let mut collector = BindingNames::default();
    collector.visit_binding_pattern(pattern);
    collector.names
}

/// Names bound by every declarator of one declaration statement.
pub(crate) fn declaration_names(decl: &VariableDeclaration<'_>) -> Vec<String> {
    let mut names = Vec::new();
    for declarator in &decl.declarations {
        for name in pattern_names(&declarator.id) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

pub(crate) fn is_lexical(decl: &VariableDeclaration<'_>) -> bool {
    !matches!(decl.kind, VariableDeclarationKind::Var)
}

/// Declarations made directly in a statement list that are scoped to it:
/// `let`/`const`, classes and function declarations.
pub(crate) fn lexical_names(statements: &[Statement<'_>]) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    for statement in statements {
        match statement {
            Statement::VariableDeclaration(decl) if is_lexical(decl) => {
                names.extend(declaration_names(decl));
            }
            Statement::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    names.insert(id.name.to_string());
                }
            }
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    names.insert(id.name.to_string());
                }
            }
            _ => {}
        }
    }
    names
}

/// `var` declarations anywhere in the statements, without entering nested
/// functions or classes.
pub(crate) fn hoisted_var_names(statements: &[Statement<'_>]) -> FxHashSet<String> {
    let mut collector = VarNames::default();
    for statement in statements {
        collector.visit_statement(statement);
    }
    collector.names
}

/// Collects binding identifiers of a pattern or parameter list.
///
/// Default values may contain function or class expressions whose own
/// bindings must not leak out, so those are not entered.
#[derive(Default)]
struct BindingNames {
    names: Vec<String>,
}

impl<'a> Visit<'a> for BindingNames {
    fn visit_binding_identifier(&mut self, it: &BindingIdentifier<'a>) {
        self.names.push(it.name.to_string());
    }

    fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

    fn visit_arrow_function_expression(&mut self, _it: &ArrowFunctionExpression<'a>) {}

    fn visit_class(&mut self, _it: &Class<'a>) {}
}

#[derive(Default)]
struct VarNames {
    names: FxHashSet<String>,
}

impl<'a> Visit<'a> for VarNames {
    fn visit_variable_declaration(&mut self, it: &VariableDeclaration<'a>) {
        if !is_lexical(it) {
            self.names.extend(declaration_names(it));
        }
    }

    // `var` cannot appear inside an expression outside a nested function.
    fn visit_expression(&mut self, _it: &Expression<'a>) {}

    fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

    fn visit_class(&mut self, _it: &Class<'a>) {}
}
