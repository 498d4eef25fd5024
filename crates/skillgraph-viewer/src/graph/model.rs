use skillgraph_core::{GraphKind, Level, NodeId, NodeRecord};
use std::collections::HashMap;

use crate::util::ids::{self, AncestorChain};
use crate::util::palette::Rgb;

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub record: NodeRecord,
    pub depth: usize,
    pub children: Vec<NodeId>,
    /// Every node below this one, visible or not. Filled in by the builder.
    pub descendants: usize,
    pub size: f32,
    pub color: Rgb,
}

impl GraphNode {
    pub fn id(&self) -> &NodeId {
        &self.record.id
    }

    pub fn level(&self) -> Level {
        ids::level_of(self.record.id.as_str())
    }
}

/// One rooted tree (knowledge or ability). Built once per data load.
#[derive(Debug, Clone)]
pub struct GraphTree {
    pub kind: GraphKind,
    pub root: NodeId,
    pub nodes: HashMap<NodeId, GraphNode>,
    pub parents: HashMap<NodeId, NodeId>,
}

impl GraphTree {
    pub fn get(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Attached parent, which may be further up than the prefix parent when
    /// the hierarchy had gaps.
    pub fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        self.parents.get(id)
    }

    /// Attached ancestors, nearest first, ending at the root.
    pub fn ancestors(&self, id: &NodeId) -> AncestorChain {
        let mut out = AncestorChain::new();
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            out.push(p.clone());
            cur = self.parent_of(p);
        }
        out
    }

    pub fn descendant_count(&self, id: &NodeId) -> usize {
        self.nodes.get(id).map_or(0, |n| n.descendants)
    }
}
