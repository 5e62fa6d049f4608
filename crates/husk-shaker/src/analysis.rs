//! Serializable view of an indexed and traversed program.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::element::{ElementId, NodeId};
use crate::indexer::IndexedProgram;

/// One element as reported by [`Analysis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSummary {
    pub id: ElementId,
    pub name: String,
    pub qualified_name: String,
    pub node: Option<NodeId>,
    pub is_virtual: bool,
    pub is_native: bool,
    pub instantiated: bool,
    pub enclosing: Option<ElementId>,
    pub inherits: Option<ElementId>,
    pub members: Vec<ElementId>,
    /// Whether the declaring item survives shaking. Always false for native
    /// elements, which have nothing to keep.
    pub reachable: bool,
}

/// Element graph and reachable set of one program, as computed by
/// [`TreeShaker::analyze`](crate::TreeShaker::analyze).
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Number of top-level items.
    pub items: usize,
    pub globals: Vec<NodeId>,
    pub entry_points: Vec<NodeId>,
    /// Reachable top-level items in source order.
    pub reachable: Vec<NodeId>,
    pub elements: Vec<ElementSummary>,
}

impl Analysis {
    pub(crate) fn new(indexed: &IndexedProgram<'_, '_>, reachable: &FxHashSet<NodeId>) -> Self {
        let mut reachable_nodes: Vec<_> = reachable.iter().copied().collect();
        reachable_nodes.sort_unstable();

        let elements = indexed
            .graph
            .iter()
            .map(|(id, element)| ElementSummary {
                id,
                name: element.name().to_string(),
                qualified_name: element.qualified_name().to_string(),
                node: element.node(),
                is_virtual: element.is_virtual(),
                is_native: element.is_native(),
                instantiated: element.is_instantiated(),
                enclosing: element.enclosing(),
                inherits: element.inherits(),
                members: element.members().to_vec(),
                reachable: element.node().is_some_and(|node| reachable.contains(&node)),
            })
            .collect();

        Self {
            items: indexed.items.len(),
            globals: indexed.globals.clone(),
            entry_points: indexed.entry_points.clone(),
            reachable: reachable_nodes,
            elements,
        }
    }

    /// First element with the given qualified name.
    pub fn element(&self, qualified_name: &str) -> Option<&ElementSummary> {
        self.elements
            .iter()
            .find(|element| element.qualified_name == qualified_name)
    }

    /// Declared elements that shaking removes.
    pub fn unreachable(&self) -> impl Iterator<Item = &ElementSummary> {
        self.elements
            .iter()
            .filter(|element| !element.is_native && !element.reachable)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::TreeShaker;

    #[test]
    fn reports_reachability_and_links() {
        let analysis = TreeShaker::default()
            .analyze(
                "function A(){}
                 A.prototype.go = function(){};
                 Widget.prototype.draw = function(){};
                 function main(){ new A().go(); }
                 RunEntry(main);",
            )
            .expect("parses");

        let a = analysis.element("A").unwrap();
        let go = analysis.element("A.prototype.go").unwrap();
        assert!(a.reachable && a.instantiated);
        assert!(go.reachable && go.is_virtual);
        assert_eq!(go.enclosing, Some(a.id));
        assert_eq!(a.members, vec![go.id]);

        let widget = analysis.element("Widget").unwrap();
        assert!(widget.is_native && !widget.reachable);

        let unreachable: Vec<_> = analysis
            .unreachable()
            .map(|element| element.qualified_name.as_str())
            .collect();
        assert_eq!(unreachable, vec!["Widget.prototype.draw"]);
        assert_eq!(analysis.items, 5);
        assert_eq!(analysis.entry_points.len(), 1);
    }

    #[test]
    fn json_uses_plain_ids() {
        let analysis = TreeShaker::default().analyze("function f(){} RunEntry(f);").unwrap();
        let json: serde_json::Value = serde_json::from_str(&analysis.to_json().unwrap()).unwrap();
        assert_eq!(json["entry_points"], serde_json::json!([1]));
        assert_eq!(json["elements"][0]["qualified_name"], "f");
        assert_eq!(json["elements"][0]["node"], 0);
    }

    #[test]
    fn unparsable_source_has_no_analysis() {
        assert!(TreeShaker::default().analyze("function (").is_none());
    }
}
