//! Top-level element indexing.
//!
//! One pass over the top-level statements of a parsed program classifies
//! each statement as an element declaration, an entry point, an inheritance
//! declaration or a global. Function bodies are never entered here.

use tracing::debug;

use crate::config::ShakerConfig;
use crate::element::{ElementGraph, ElementId, JavascriptElement, NodeId};
use crate::oxc::ast::{Argument, CallExpression, Expression, Program, Statement};
use crate::oxc::{GetSpan, Span};
use crate::path::{MemberPath, assignment_target_path};
use crate::scope::declaration_names;

/// One addressable top-level item of the program.
///
/// Hashbang and directives have no statement: they carry no references and
/// are always retained.
#[derive(Debug, Clone, Copy)]
pub struct TopLevelItem<'p, 'a> {
    pub span: Span,
    pub statement: Option<&'p Statement<'a>>,
}

/// Output of [`TopLevelElementIndexer::index`].
#[derive(Debug)]
pub struct IndexedProgram<'p, 'a> {
    /// Every top-level item in source order; a [`NodeId`] indexes this list.
    pub items: Vec<TopLevelItem<'p, 'a>>,
    pub graph: ElementGraph,
    /// Items that are not named declarations, always retained.
    pub globals: Vec<NodeId>,
    /// Top-level calls to the entry marker.
    pub entry_points: Vec<NodeId>,
}

impl<'p, 'a> IndexedProgram<'p, 'a> {
    pub fn item(&self, node: NodeId) -> &TopLevelItem<'p, 'a> {
        &self.items[node.index()]
    }
}

/// Builds the element graph of one program.
#[derive(Debug)]
pub struct TopLevelElementIndexer<'c> {
    config: &'c ShakerConfig,
    graph: ElementGraph,
    globals: Vec<NodeId>,
    entry_points: Vec<NodeId>,
}

impl<'c> TopLevelElementIndexer<'c> {
    pub fn new(config: &'c ShakerConfig) -> Self {
        Self {
            config,
            graph: ElementGraph::new(),
            globals: Vec::new(),
            entry_points: Vec::new(),
        }
    }

    /// Index the top-level structure of `program`.
    ///
    /// # Panics
    ///
    /// Panics when an inheritance marker call does not name exactly one
    /// indexed element for each of its two arguments, or when a marker call
    /// has the wrong arity. Such input did not come from the generator and
    /// shaking it would risk dropping live code.
    pub fn index<'p, 'a>(mut self, program: &'p Program<'a>) -> IndexedProgram<'p, 'a> {
        let mut items = Vec::with_capacity(program.body.len() + program.directives.len() + 1);

        if let Some(hashbang) = &program.hashbang {
            self.globals.push(NodeId::new(items.len()));
            items.push(TopLevelItem {
                span: hashbang.span,
                statement: None,
            });
        }

        for directive in &program.directives {
            self.globals.push(NodeId::new(items.len()));
            items.push(TopLevelItem {
                span: directive.span,
                statement: None,
            });
        }

        for statement in &program.body {
            let node = NodeId::new(items.len());
            items.push(TopLevelItem {
                span: statement.span(),
                statement: Some(statement),
            });
            self.classify(node, statement);
        }

        debug!(
            items = items.len(),
            elements = self.graph.len(),
            globals = self.globals.len(),
            entry_points = self.entry_points.len(),
            "indexed top-level program"
        );

        IndexedProgram {
            items,
            graph: self.graph,
            globals: self.globals,
            entry_points: self.entry_points,
        }
    }

    fn classify(&mut self, node: NodeId, statement: &Statement<'_>) {
        match statement {
            Statement::ExpressionStatement(stmt) => match stmt.expression.without_parentheses() {
                Expression::AssignmentExpression(assign) => {
                    match assignment_target_path(&assign.left) {
                        Some(path) => self.index_assignment(node, &path),
                        None => self.globals.push(node),
                    }
                }
                Expression::CallExpression(call) => self.index_call(node, call),
                _ => self.globals.push(node),
            },
            Statement::FunctionDeclaration(func) => match &func.id {
                Some(id) => self.index_declaration(node, id.name.as_str()),
                None => self.globals.push(node),
            },
            Statement::ClassDeclaration(class) => match &class.id {
                Some(id) => self.index_declaration(node, id.name.as_str()),
                None => self.globals.push(node),
            },
            Statement::VariableDeclaration(decl) => {
                let names = declaration_names(decl);
                match names.first() {
                    Some(first) => {
                        // One element for the whole statement: co-declared
                        // names are retained or dropped together.
                        let id = self
                            .graph
                            .insert(JavascriptElement::builder(first, first).node(node).build());
                        for name in &names {
                            self.graph.register(name, id);
                        }
                    }
                    None => self.globals.push(node),
                }
            }
            _ => self.globals.push(node),
        }
    }

    fn index_assignment(&mut self, node: NodeId, path: &MemberPath<'_, '_>) {
        let qualified = path.qualified_name();
        let name = path.segments.last().copied().unwrap_or_default();
        let is_virtual = path.prototype_position().is_some();
        let enclosing = (path.segments.len() > 1).then(|| self.enclosing_type(path.base_name()));

        let id = self.graph.insert(
            JavascriptElement::builder(name, qualified.as_str())
                .node(node)
                .enclosing(enclosing)
                .virtual_member(is_virtual)
                .build(),
        );
        self.graph.register(&qualified, id);
        if is_virtual {
            self.graph.register(name, id);
        }
    }

    /// The element a member is declared under, synthesizing a native
    /// placeholder for types the program never declares.
    fn enclosing_type(&mut self, type_name: &str) -> ElementId {
        if let Some(existing) = self.graph.lookup(type_name).first() {
            return *existing;
        }
        let id = self
            .graph
            .insert(JavascriptElement::builder(type_name, type_name).build());
        self.graph.register(type_name, id);
        id
    }

    fn index_declaration(&mut self, node: NodeId, name: &str) {
        if let [only] = self.graph.lookup(name) {
            let only = *only;
            if self.graph[only].is_native() {
                self.graph.adopt(only, node);
                return;
            }
        }
        let id = self
            .graph
            .insert(JavascriptElement::builder(name, name).node(node).build());
        self.graph.register(name, id);
    }

    fn index_call(&mut self, node: NodeId, call: &CallExpression<'_>) {
        let Expression::Identifier(callee) = call.callee.without_parentheses() else {
            self.globals.push(node);
            return;
        };
        let callee = callee.name.as_str();

        if callee == self.config.entry_marker {
            assert_eq!(
                call.arguments.len(),
                1,
                "entry marker `{callee}` must be called with exactly one argument"
            );
            self.entry_points.push(node);
        } else if callee == self.config.inherits_marker {
            let (sub, sup) = match &call.arguments[..] {
                [Argument::Identifier(sub), Argument::Identifier(sup)] => {
                    (sub.name.as_str(), sup.name.as_str())
                }
                _ => panic!(
                    "inheritance marker `{callee}` must be called with exactly two bare names"
                ),
            };
            let sub = self.single_element(sub);
            let sup = self.single_element(sup);
            self.graph.set_inherits(sub, sup, node);
        } else {
            self.globals.push(node);
        }
    }

    fn single_element(&self, name: &str) -> ElementId {
        match self.graph.lookup(name) {
            [only] => *only,
            [] => panic!(
                "inheritance marker `{}` names `{name}`, which is not declared before it",
                self.config.inherits_marker
            ),
            many => panic!(
                "inheritance marker `{}` names `{name}`, which is ambiguous ({} elements)",
                self.config.inherits_marker,
                many.len()
            ),
        }
    }
}
