use skillgraph_core::{GraphKind, NodeId, NodeRecord};
use std::collections::HashMap;

use crate::graph::model::{GraphNode, GraphTree};
use crate::util::ids::{self, IdProblem};
use crate::util::palette;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            size_min: 0.6,
            size_max: 1.6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub rejected: Vec<(String, IdProblem)>,
    pub duplicates: Vec<NodeId>,
    /// Nodes whose prefix parent was missing, with the ancestor they were attached to.
    pub reattached: Vec<(NodeId, NodeId)>,
    pub synthesized_root: bool,
}

pub fn build_tree(
    kind: GraphKind,
    records: &[NodeRecord],
    style: &NodeStyle,
) -> (GraphTree, BuildReport) {
    let mut report = BuildReport::default();
    let mut nodes: HashMap<NodeId, GraphNode> = HashMap::new();

    for record in records {
        let id = match ids::normalize_id(kind, record.id.as_str()) {
            Ok(id) => id,
            Err(problem) => {
                tracing::warn!(
                    graph = kind.display_name(),
                    id = %record.id,
                    reason = problem.describe(),
                    "skipping record with malformed id"
                );
                report.rejected.push((record.id.0.clone(), problem));
                continue;
            }
        };
        if nodes.contains_key(&id) {
            tracing::warn!(graph = kind.display_name(), id = %id, "duplicate id, keeping first row");
            report.duplicates.push(id);
            continue;
        }
        let mut record = record.clone();
        record.id = id.clone();
        nodes.insert(id, make_node(kind, record, style));
    }

    let root = kind.root_id();
    if !nodes.contains_key(&root) {
        let mut record = NodeRecord::new(kind.sentinel(), kind.display_name());
        record.importance = 1.0;
        record.difficulty = 0.0;
        nodes.insert(root.clone(), make_node(kind, record, style));
        report.synthesized_root = true;
    }

    let mut ids_sorted: Vec<NodeId> = nodes.keys().filter(|id| **id != root).cloned().collect();
    ids_sorted.sort();

    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    for id in ids_sorted {
        let direct = ids::parent_id(kind, id.as_str()).unwrap_or_else(|| root.clone());
        let attached = nearest_existing_ancestor(kind, &direct, &nodes, &root);
        if attached != direct {
            tracing::debug!(
                graph = kind.display_name(),
                id = %id,
                missing = %direct,
                attached = %attached,
                "gap in hierarchy, attaching to nearest ancestor"
            );
            report.reattached.push((id.clone(), attached.clone()));
        }
        if let Some(parent) = nodes.get_mut(&attached) {
            // ids_sorted is ascending, so children stay sorted.
            parent.children.push(id.clone());
        }
        parents.insert(id, attached);
    }
    count_descendants(&mut nodes, &parents);

    let tree = GraphTree {
        kind,
        root,
        nodes,
        parents,
    };
    (tree, report)
}

/// Attached parents always have shorter ids, so visiting longest ids first
/// folds every subtree before its parent reads it.
fn count_descendants(nodes: &mut HashMap<NodeId, GraphNode>, parents: &HashMap<NodeId, NodeId>) {
    let mut order: Vec<&NodeId> = parents.keys().collect();
    order.sort_by_key(|id| std::cmp::Reverse(id.as_str().len()));
    for id in order {
        let below = nodes.get(id).map_or(0, |n| n.descendants);
        if let Some(parent) = nodes.get_mut(&parents[id]) {
            parent.descendants += below + 1;
        }
    }
}

fn make_node(kind: GraphKind, record: NodeRecord, style: &NodeStyle) -> GraphNode {
    let level = ids::level_of(record.id.as_str());
    GraphNode {
        depth: ids::depth_of(record.id.as_str()),
        children: Vec::new(),
        descendants: 0,
        size: palette::node_size(level, record.importance, style.size_min, style.size_max),
        color: palette::node_color(kind, level),
        record,
    }
}

fn nearest_existing_ancestor(
    kind: GraphKind,
    start: &NodeId,
    nodes: &HashMap<NodeId, GraphNode>,
    root: &NodeId,
) -> NodeId {
    let mut cur = start.clone();
    loop {
        if nodes.contains_key(&cur) || cur == *root {
            return cur;
        }
        match ids::parent_id(kind, cur.as_str()) {
            Some(p) => cur = p,
            None => return root.clone(),
        }
    }
}
