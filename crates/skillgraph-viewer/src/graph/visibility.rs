use skillgraph_core::NodeId;
use std::collections::BTreeSet;

use crate::graph::model::GraphTree;

pub type ExpandedSet = BTreeSet<NodeId>;

/// Depth-first, sibling-sorted list of visible nodes. The root is always first.
pub fn visible_nodes(tree: &GraphTree, expanded: &ExpandedSet) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![&tree.root];
    while let Some(id) = stack.pop() {
        out.push(id.clone());
        if expanded.contains(id) {
            stack.extend(tree.children(id).iter().rev());
        }
    }
    out
}

pub fn is_visible(tree: &GraphTree, expanded: &ExpandedSet, id: &NodeId) -> bool {
    tree.contains(id) && tree.ancestors(id).iter().all(|a| expanded.contains(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tree::{build_tree, NodeStyle};
    use skillgraph_core::{GraphKind, NodeRecord};

    fn tree() -> GraphTree {
        let records: Vec<NodeRecord> = ["DS", "DS01", "DS0101", "DS0102", "DS02", "DS0201"]
            .iter()
            .map(|id| NodeRecord::new(*id, *id))
            .collect();
        build_tree(GraphKind::Knowledge, &records, &NodeStyle::default()).0
    }

    fn set(ids: &[&str]) -> ExpandedSet {
        ids.iter().map(|id| NodeId::from(*id)).collect()
    }

    fn names(ids: &[NodeId]) -> Vec<&str> {
        ids.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn root_visible_even_when_not_expanded() {
        let t = tree();
        assert_eq!(names(&visible_nodes(&t, &set(&[]))), vec!["DS"]);
    }

    #[test]
    fn depth_first_sorted_order() {
        let t = tree();
        let vis = visible_nodes(&t, &set(&["DS", "DS01", "DS02"]));
        assert_eq!(
            names(&vis),
            vec!["DS", "DS01", "DS0101", "DS0102", "DS02", "DS0201"]
        );
    }

    #[test]
    fn expanded_descendant_of_collapsed_node_stays_hidden() {
        let t = tree();
        let vis = visible_nodes(&t, &set(&["DS01"]));
        assert_eq!(names(&vis), vec!["DS"]);
        assert!(!is_visible(&t, &set(&["DS01"]), &NodeId::from("DS0101")));
    }

    #[test]
    fn list_agrees_with_ancestor_rule() {
        let t = tree();
        let expanded = set(&["DS", "DS02"]);
        let vis = visible_nodes(&t, &expanded);
        for id in t.nodes.keys() {
            assert_eq!(vis.contains(id), is_visible(&t, &expanded, id), "{id}");
        }
    }
}
