//! Addressable top-level elements and the arena that owns them.
//!
//! Elements form a graph rather than a tree: a member points at its enclosing
//! element, the enclosing element lists its members, and a subtype points at
//! its supertype. All links are [`ElementId`] handles into one
//! [`ElementGraph`], so no element owns another.

use std::ops::Index;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Identity of one top-level item of the parsed program.
///
/// Assigned in source order (hashbang, directives, then body statements) when
/// the program is indexed, and stable for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of an element inside its [`ElementGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An addressable top-level construct.
///
/// `node` is absent for *native* elements: names that are used as an
/// enclosing type (`A` in `A.prototype.foo = …`) but never declared in the
/// analyzed source.
#[derive(Debug, Clone)]
pub struct JavascriptElement {
    name: String,
    qualified_name: String,
    node: Option<NodeId>,
    enclosing: Option<ElementId>,
    members: Vec<ElementId>,
    is_virtual: bool,
    instantiated: bool,
    inherits: Option<ElementId>,
    inherits_decl: Option<NodeId>,
}

impl JavascriptElement {
    /// Start building an element with its simple and qualified name.
    pub fn builder(
        name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> JavascriptElementBuilder {
        JavascriptElementBuilder {
            element: Self {
                name: name.into(),
                qualified_name: qualified_name.into(),
                node: None,
                enclosing: None,
                members: Vec::new(),
                is_virtual: false,
                instantiated: false,
                inherits: None,
                inherits_decl: None,
            },
        }
    }

    /// Simple name, e.g. `foo` for `A.prototype.foo`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path as written, e.g. `A.prototype.foo`.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The declaring top-level item, absent for native elements.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn enclosing(&self) -> Option<ElementId> {
        self.enclosing
    }

    /// Elements declared under this one, in declaration order.
    pub fn members(&self) -> &[ElementId] {
        &self.members
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn is_native(&self) -> bool {
        self.node.is_none()
    }

    /// Native elements count as instantiated: they are supplied externally
    /// and assumed live.
    pub fn is_instantiated(&self) -> bool {
        self.instantiated || self.is_native()
    }

    /// Supertype set by an inheritance marker call.
    pub fn inherits(&self) -> Option<ElementId> {
        self.inherits
    }

    /// The inheritance marker statement that declared [`Self::inherits`].
    pub fn inherits_decl(&self) -> Option<NodeId> {
        self.inherits_decl
    }
}

/// Builder for [`JavascriptElement`].
#[derive(Debug)]
pub struct JavascriptElementBuilder {
    element: JavascriptElement,
}

impl JavascriptElementBuilder {
    pub fn node(mut self, node: NodeId) -> Self {
        self.element.node = Some(node);
        self
    }

    pub fn enclosing(mut self, enclosing: Option<ElementId>) -> Self {
        self.element.enclosing = enclosing;
        self
    }

    pub fn virtual_member(mut self, is_virtual: bool) -> Self {
        self.element.is_virtual = is_virtual;
        self
    }

    pub fn build(self) -> JavascriptElement {
        self.element
    }
}

/// Arena of elements plus the name index.
///
/// A name maps to zero, one or several elements: two unrelated classes may
/// both define `prototype.foo`, and a prototype member is reachable under
/// both its qualified and its simple name.
#[derive(Debug, Default)]
pub struct ElementGraph {
    elements: Vec<JavascriptElement>,
    by_name: FxHashMap<String, Vec<ElementId>>,
}

impl ElementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element to the arena and append it to its enclosing element's
    /// member list. The element is not registered under any name yet.
    pub fn insert(&mut self, element: JavascriptElement) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        if let Some(owner) = element.enclosing {
            self.elements[owner.index()].members.push(id);
        }
        self.elements.push(element);
        id
    }

    /// Make `id` findable under `name`. Registering the same pair twice is a
    /// no-op.
    pub fn register(&mut self, name: &str, id: ElementId) {
        let slot = self.by_name.entry(name.to_string()).or_default();
        if !slot.contains(&id) {
            slot.push(id);
        }
    }

    /// Elements registered under `name`, in registration order.
    pub fn lookup(&self, name: &str) -> &[ElementId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, id: ElementId) -> &JavascriptElement {
        &self.elements[id.index()]
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &JavascriptElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementId(index as u32), element))
    }

    /// Mark `id` as instantiated and propagate along its supertype chain.
    ///
    /// Propagation runs toward the superclass: instantiating `B` where
    /// `$inherits(B, A)` also marks `A`, which is what lets `A`'s prototype
    /// members pass the instantiation check. The flag never goes back to
    /// false.
    pub fn set_instantiated(&mut self, id: ElementId) {
        let mut seen = FxHashSet::default();
        let mut current = Some(id);
        while let Some(next) = current {
            if !seen.insert(next) {
                break;
            }
            let element = &mut self.elements[next.index()];
            element.instantiated = true;
            current = element.inherits;
        }
    }

    /// `id` followed by its supertypes, nearest first. Stops on cycles.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: Some(id),
            seen: FxHashSet::default(),
        }
    }

    pub(crate) fn set_inherits(&mut self, sub: ElementId, sup: ElementId, decl: NodeId) {
        let element = &mut self.elements[sub.index()];
        element.inherits = Some(sup);
        element.inherits_decl = Some(decl);
    }

    /// Give a native placeholder its declaring node.
    pub(crate) fn adopt(&mut self, id: ElementId, node: NodeId) {
        let element = &mut self.elements[id.index()];
        debug_assert!(element.is_native(), "only native placeholders can adopt a node");
        element.node = Some(node);
    }
}

impl Index<ElementId> for ElementGraph {
    type Output = JavascriptElement;

    fn index(&self, id: ElementId) -> &Self::Output {
        self.get(id)
    }
}

/// Iterator returned by [`ElementGraph::ancestors`].
pub struct Ancestors<'g> {
    graph: &'g ElementGraph,
    next: Option<ElementId>,
    seen: FxHashSet<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if !self.seen.insert(current) {
            return None;
        }
        self.next = self.graph.get(current).inherits;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(graph: &mut ElementGraph, name: &str, node: usize) -> ElementId {
        let id = graph.insert(JavascriptElement::builder(name, name).node(NodeId::new(node)).build());
        graph.register(name, id);
        id
    }

    #[test]
    fn native_elements_are_instantiated() {
        let mut graph = ElementGraph::new();
        let native = graph.insert(JavascriptElement::builder("Object", "Object").build());
        assert!(graph[native].is_native());
        assert!(graph[native].is_instantiated());

        let declared = declared(&mut graph, "A", 0);
        assert!(!graph[declared].is_native());
        assert!(!graph[declared].is_instantiated());
    }

    #[test]
    fn insert_links_members_in_order() {
        let mut graph = ElementGraph::new();
        let a = declared(&mut graph, "A", 0);
        let foo = graph.insert(
            JavascriptElement::builder("foo", "A.prototype.foo")
                .node(NodeId::new(1))
                .enclosing(Some(a))
                .virtual_member(true)
                .build(),
        );
        let bar = graph.insert(
            JavascriptElement::builder("bar", "A.bar")
                .node(NodeId::new(2))
                .enclosing(Some(a))
                .build(),
        );

        assert_eq!(graph[a].members(), &[foo, bar]);
        assert_eq!(graph[foo].enclosing(), Some(a));
        assert!(graph[foo].is_virtual());
        assert!(!graph[bar].is_virtual());
    }

    #[test]
    fn names_can_be_ambiguous() {
        let mut graph = ElementGraph::new();
        let first = declared(&mut graph, "foo", 0);
        let second = declared(&mut graph, "foo", 1);
        graph.register("foo", first);

        assert_eq!(graph.lookup("foo"), &[first, second]);
        assert!(graph.lookup("missing").is_empty());
        assert!(!graph.contains_name("missing"));
    }

    #[test]
    fn instantiation_propagates_to_superclass_only() {
        let mut graph = ElementGraph::new();
        let base = declared(&mut graph, "Base", 0);
        let derived = declared(&mut graph, "Derived", 1);
        graph.set_inherits(derived, base, NodeId::new(2));

        graph.set_instantiated(derived);
        assert!(graph[derived].is_instantiated());
        assert!(graph[base].is_instantiated());

        let mut graph = ElementGraph::new();
        let base = declared(&mut graph, "Base", 0);
        let derived = declared(&mut graph, "Derived", 1);
        graph.set_inherits(derived, base, NodeId::new(2));

        graph.set_instantiated(base);
        assert!(graph[base].is_instantiated());
        assert!(!graph[derived].is_instantiated());
    }

    #[test]
    fn ancestors_stop_on_cycles() {
        let mut graph = ElementGraph::new();
        let a = declared(&mut graph, "A", 0);
        let b = declared(&mut graph, "B", 1);
        graph.set_inherits(a, b, NodeId::new(2));
        graph.set_inherits(b, a, NodeId::new(3));

        let chain: Vec<_> = graph.ancestors(a).collect();
        assert_eq!(chain, vec![a, b]);

        graph.set_instantiated(a);
        assert!(graph[b].is_instantiated());
    }

    #[test]
    fn adopt_turns_native_into_declared() {
        let mut graph = ElementGraph::new();
        let placeholder = graph.insert(JavascriptElement::builder("A", "A").build());
        graph.adopt(placeholder, NodeId::new(4));
        assert_eq!(graph[placeholder].node(), Some(NodeId::new(4)));
        assert!(!graph[placeholder].is_instantiated());
    }
}
