//! Per-node dependency computation.
//!
//! Given one reachable top-level statement, [`DependencyComputer::compute`]
//! walks it and collects the elements it needs. Name resolution is
//! scope-aware: a name bound anywhere between the reference and the top level
//! of the statement is local and never resolves against the element index.
//!
//! Virtual members (prototype methods) are only pulled in when their type has
//! been instantiated. Because an instantiation can be visited after the
//! reference it would satisfy, `new` expressions re-scan the members of the
//! instantiated type and its supertypes against every virtual name seen so
//! far in the run.

use indexmap::IndexSet;
use oxc_ast_visit::walk;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::trace;

use crate::element::{ElementGraph, ElementId};
use crate::oxc::ast::{
    ArrowFunctionExpression, BlockStatement, CatchClause, Class, ComputedMemberExpression,
    Expression, ForInStatement, ForOfStatement, ForStatement, ForStatementInit, ForStatementLeft,
    Function, IdentifierReference, NewExpression, Statement, StaticMemberExpression,
    VariableDeclaration,
};
use crate::oxc::{ScopeFlags, Visit};
use crate::path::{MemberPath, expression_path, member_path};
use crate::scope::{
    ScopeStack, arrow_scope, class_scope, declaration_names, function_scope, is_lexical,
    lexical_names, pattern_names,
};

/// Elements a statement depends on, in discovery order.
pub type Dependencies = IndexSet<ElementId, FxBuildHasher>;

/// Computes dependencies of top-level statements for one run.
///
/// The computer borrows the run's element graph mutably: `new` expressions
/// mark types as instantiated, and that state carries over to every later
/// call, as does the set of virtual names seen.
#[derive(Debug)]
pub struct DependencyComputer<'g> {
    graph: &'g mut ElementGraph,
    virtual_names: FxHashSet<String>,
}

impl<'g> DependencyComputer<'g> {
    pub fn new(graph: &'g mut ElementGraph) -> Self {
        Self {
            graph,
            virtual_names: FxHashSet::default(),
        }
    }

    /// Elements `statement` refers to.
    ///
    /// Local scope tracking starts fresh for each call. Returned elements may
    /// include native placeholders and elements already processed; filtering
    /// those is the caller's business.
    pub fn compute(&mut self, statement: &Statement<'_>) -> Dependencies {
        let mut visitor = DependencyVisitor {
            graph: self.graph,
            virtual_names: &mut self.virtual_names,
            scopes: ScopeStack::new(),
            dependencies: Dependencies::default(),
        };
        visitor.visit_statement(statement);
        debug_assert_eq!(visitor.scopes.depth(), 0, "unbalanced scope stack");
        visitor.dependencies
    }

    pub fn graph(&self) -> &ElementGraph {
        self.graph
    }

    /// Every free name and unresolved property name seen so far in the run.
    pub fn virtual_names(&self) -> &FxHashSet<String> {
        &self.virtual_names
    }
}

struct DependencyVisitor<'v> {
    graph: &'v mut ElementGraph,
    virtual_names: &'v mut FxHashSet<String>,
    scopes: ScopeStack,
    dependencies: Dependencies,
}

impl DependencyVisitor<'_> {
    fn is_free(&self, path: &MemberPath<'_, '_>) -> bool {
        !self.scopes.is_local(path.base_name())
    }

    fn add(&mut self, id: ElementId) {
        if self.dependencies.insert(id) {
            trace!(element = self.graph[id].qualified_name(), "dependency");
        }
    }

    /// Add `id`, and its enclosing element when `id` is not virtual.
    fn add_static(&mut self, id: ElementId) {
        self.add(id);
        if !self.graph[id].is_virtual() {
            if let Some(owner) = self.graph[id].enclosing() {
                self.add(owner);
            }
        }
    }

    /// Rule for a name that may be dispatched dynamically.
    ///
    /// Virtual elements are only taken when their enclosing type is
    /// instantiated at this point of the traversal.
    fn reference_name(&mut self, name: &str) {
        self.virtual_names.insert(name.to_string());
        let candidates = self.graph.lookup(name).to_vec();
        for id in candidates {
            let element = &self.graph[id];
            if element.is_virtual() {
                let live = element
                    .enclosing()
                    .is_none_or(|owner| self.graph[owner].is_instantiated());
                if live {
                    self.add(id);
                }
            } else {
                self.add_static(id);
            }
        }
    }

    /// Property names reach only virtual members.
    fn reference_property(&mut self, name: &str) {
        self.virtual_names.insert(name.to_string());
        let candidates = self.graph.lookup(name).to_vec();
        for id in candidates {
            let element = &self.graph[id];
            let live = element.is_virtual()
                && element
                    .enclosing()
                    .is_none_or(|owner| self.graph[owner].is_instantiated());
            if live {
                self.add(id);
            }
        }
    }

    /// Resolve a free dotted path against qualified names. Returns whether
    /// anything matched.
    fn reference_path(&mut self, path: &MemberPath<'_, '_>) -> bool {
        if !self.is_free(path) {
            return false;
        }
        let matched = self.graph.lookup(&path.qualified_name()).to_vec();
        for id in &matched {
            self.add_static(*id);
        }
        !matched.is_empty()
    }

    /// Mark the type as instantiated, then pick up members of it and its
    /// supertypes whose names were referenced before this point.
    fn instantiate(&mut self, path: &MemberPath<'_, '_>) {
        if !self.is_free(path) {
            return;
        }
        let types = self.graph.lookup(&path.qualified_name()).to_vec();
        for ty in &types {
            self.graph.set_instantiated(*ty);
        }

        let mut caught_up = Vec::new();
        for ty in &types {
            for ancestor in self.graph.ancestors(*ty) {
                caught_up.extend(
                    self.graph[ancestor]
                        .members()
                        .iter()
                        .copied()
                        .filter(|member| self.virtual_names.contains(self.graph[*member].name())),
                );
            }
        }
        for member in caught_up {
            self.add(member);
        }
    }

    fn lexical_declaration_scope(decl: &VariableDeclaration<'_>) -> FxHashSet<String> {
        if is_lexical(decl) {
            declaration_names(decl).into_iter().collect()
        } else {
            FxHashSet::default()
        }
    }
}

impl<'a> Visit<'a> for DependencyVisitor<'_> {
    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        self.scopes.push(function_scope(it));
        walk::walk_function(self, it, flags);
        self.scopes.pop();
    }

    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        self.scopes.push(arrow_scope(it));
        walk::walk_arrow_function_expression(self, it);
        self.scopes.pop();
    }

    fn visit_class(&mut self, it: &Class<'a>) {
        self.scopes.push(class_scope(it));
        walk::walk_class(self, it);
        self.scopes.pop();
    }

    fn visit_block_statement(&mut self, it: &BlockStatement<'a>) {
        self.scopes.push(lexical_names(&it.body));
        walk::walk_block_statement(self, it);
        self.scopes.pop();
    }

    fn visit_catch_clause(&mut self, it: &CatchClause<'a>) {
        let names = it
            .param
            .as_ref()
            .map(|param| pattern_names(&param.pattern).into_iter().collect())
            .unwrap_or_default();
        self.scopes.push(names);
        walk::walk_catch_clause(self, it);
        self.scopes.pop();
    }

    fn visit_for_statement(&mut self, it: &ForStatement<'a>) {
        let names = match &it.init {
            Some(ForStatementInit::VariableDeclaration(decl)) => {
                Self::lexical_declaration_scope(decl)
            }
            _ => FxHashSet::default(),
        };
        self.scopes.push(names);
        walk::walk_for_statement(self, it);
        self.scopes.pop();
    }

    fn visit_for_in_statement(&mut self, it: &ForInStatement<'a>) {
        let names = match &it.left {
            ForStatementLeft::VariableDeclaration(decl) => Self::lexical_declaration_scope(decl),
            _ => FxHashSet::default(),
        };
        self.scopes.push(names);
        walk::walk_for_in_statement(self, it);
        self.scopes.pop();
    }

    fn visit_for_of_statement(&mut self, it: &ForOfStatement<'a>) {
        let names = match &it.left {
            ForStatementLeft::VariableDeclaration(decl) => Self::lexical_declaration_scope(decl),
            _ => FxHashSet::default(),
        };
        self.scopes.push(names);
        walk::walk_for_of_statement(self, it);
        self.scopes.pop();
    }

    fn visit_static_member_expression(&mut self, it: &StaticMemberExpression<'a>) {
        if let Some(path) = member_path(it) {
            if self.reference_path(&path) {
                return;
            }
        }
        self.reference_property(it.property.name.as_str());
        walk::walk_static_member_expression(self, it);
    }

    fn visit_computed_member_expression(&mut self, it: &ComputedMemberExpression<'a>) {
        if let Expression::StringLiteral(key) = &it.expression {
            self.reference_property(key.value.as_str());
        }
        walk::walk_computed_member_expression(self, it);
    }

    fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
        if !self.scopes.is_local(it.name.as_str()) {
            self.reference_name(it.name.as_str());
        }
    }

    fn visit_new_expression(&mut self, it: &NewExpression<'a>) {
        if let Some(path) = expression_path(&it.callee) {
            self.instantiate(&path);
        }
        walk::walk_new_expression(self, it);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShakerConfig;
    use crate::indexer::{IndexedProgram, TopLevelElementIndexer};
    use crate::oxc::{Allocator, Parser};

    /// Index `source`, then compute dependencies of each statement named in
    /// `roots`, in order, sharing one computer.
    fn with_computer(
        source: &str,
        prepare: impl FnOnce(&mut IndexedProgram<'_, '_>),
        check: impl FnOnce(&mut dyn FnMut(&str) -> Vec<String>),
    ) {
        let config = ShakerConfig::default();
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, config.source_kind.to_oxc()).parse();
        assert!(ret.errors.is_empty(), "{:?}", ret.errors);
        let mut indexed = TopLevelElementIndexer::new(&config).index(&ret.program);
        prepare(&mut indexed);

        let roots: Vec<_> = indexed
            .graph
            .iter()
            .filter_map(|(_, element)| element.node().map(|node| (element.qualified_name().to_string(), node)))
            .collect();
        let items = indexed.items.clone();
        let mut computer = DependencyComputer::new(&mut indexed.graph);

        check(&mut |root: &str| {
            let node = roots
                .iter()
                .find(|(name, _)| name == root)
                .map(|(_, node)| *node)
                .expect("root is indexed");
            let statement = items[node.index()].statement.expect("root is a statement");
            computer
                .compute(statement)
                .iter()
                .map(|id| computer.graph()[*id].qualified_name().to_string())
                .collect()
        });
    }

    fn dependencies_of(source: &str, root: &str) -> Vec<String> {
        let mut result = Vec::new();
        with_computer(source, |_| {}, |compute| result = compute(root));
        result
    }

    const TWO_FOOS: &str = "function A(){}
        A.prototype.foo = function(){};
        function B(){}
        B.prototype.foo = function(){};";

    #[test]
    fn instantiated_type_unlocks_its_virtual_member() {
        let source = format!("{TWO_FOOS} function execute(){{ new A(); foo(); }}");
        assert_eq!(dependencies_of(&source, "execute"), vec!["A", "A.prototype.foo"]);
    }

    #[test]
    fn later_instantiation_catches_up_on_earlier_reference() {
        let source = format!("{TWO_FOOS} function execute(){{ foo(); new A(); }}");
        assert_eq!(dependencies_of(&source, "execute"), vec!["A.prototype.foo", "A"]);
    }

    #[test]
    fn catch_up_spans_calls_in_the_same_run() {
        let source = format!("{TWO_FOOS} function first(){{ foo(); }} function second(){{ new B(); }}");
        with_computer(&source, |_| {}, |compute| {
            assert!(compute("first").is_empty());
            assert_eq!(compute("second"), vec!["B.prototype.foo", "B"]);
        });
    }

    #[test]
    fn local_names_shadow_elements() {
        let source = format!("{TWO_FOOS} function execute(){{ var foo = 1; foo(); }}");
        assert!(dependencies_of(&source, "execute").is_empty());

        with_computer(
            &source,
            |indexed| {
                let a = indexed.graph.lookup("A")[0];
                indexed.graph.set_instantiated(a);
            },
            |compute| assert!(compute("execute").is_empty()),
        );
    }

    #[test]
    fn parameters_and_block_bindings_are_local() {
        let source = "function helper(){}
            function execute(helper){ helper(); }
            function other(){ { let helper = 1; helper(); } try {} catch (helper) { helper(); } }";
        assert!(dependencies_of(source, "execute").is_empty());
        assert!(dependencies_of(source, "other").is_empty());
    }

    #[test]
    fn static_member_pulls_in_its_owner() {
        let source = "function B(){} B.foo = function(){}; function execute(){ B.foo(); }";
        let mut deps = dependencies_of(source, "execute");
        deps.sort();
        assert_eq!(deps, vec!["B", "B.foo"]);
    }

    #[test]
    fn prototype_path_skips_the_owner() {
        let source = "function A(){} A.prototype.foo = function(){};
            function execute(){ A.prototype.foo.call(this); }";
        assert_eq!(dependencies_of(source, "execute"), vec!["A.prototype.foo"]);
    }

    #[test]
    fn property_names_dispatch_virtually() {
        let source = format!("{TWO_FOOS} function execute(obj){{ new A(); obj.foo(); obj['foo']; }}");
        assert_eq!(dependencies_of(&source, "execute"), vec!["A", "A.prototype.foo"]);
    }

    #[test]
    fn property_names_ignore_static_members() {
        let source = "function B(){} B.foo = function(){}; function execute(obj){ obj.foo(); }";
        assert!(dependencies_of(source, "execute").is_empty());
    }

    #[test]
    fn new_with_dotted_callee() {
        let source = "var ns = {}; ns.A = function(){}; function execute(){ new ns.A(); }";
        with_computer(source, |_| {}, |compute| {
            let mut deps = compute("execute");
            deps.sort();
            assert_eq!(deps, vec!["ns", "ns.A"]);
        });
    }

    #[test]
    fn catch_up_walks_supertypes() {
        let source = "function Base(){} Base.prototype.run = function(){};
            function Derived(){} $inherits(Derived, Base);
            function execute(){ run(); new Derived(); }";
        assert_eq!(
            dependencies_of(source, "execute"),
            vec!["Base.prototype.run", "Derived"]
        );
    }

    #[test]
    fn shared_variable_statement_is_one_dependency() {
        let source = "var a = 1, b = 2; function execute(){ return a + b; }";
        assert_eq!(dependencies_of(source, "execute"), vec!["a"]);
    }
}
