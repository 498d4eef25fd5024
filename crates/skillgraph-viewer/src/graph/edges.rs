use glam::Vec3;
use skillgraph_core::{EdgeKind, MappingPair, NodeId};
use std::collections::HashMap;

use crate::graph::model::GraphTree;

/// Edge between two currently placed nodes. Derived on every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub source_position: Vec3,
    pub target_position: Vec3,
    pub weight: Option<f32>,
}

/// One edge per visible non-root node, from its attached parent. `positions`
/// must hold exactly the visible nodes of `tree`.
pub fn hierarchy_edges(
    tree: &GraphTree,
    visible: &[NodeId],
    positions: &HashMap<NodeId, Vec3>,
) -> Vec<Edge> {
    visible
        .iter()
        .filter_map(|id| {
            let parent = tree.parent_of(id)?;
            let target_position = *positions.get(id)?;
            let source_position = *positions.get(parent)?;
            Some(Edge {
                source: parent.clone(),
                target: id.clone(),
                kind: EdgeKind::Hierarchy,
                source_position,
                target_position,
                weight: None,
            })
        })
        .collect()
}

/// Cross-graph edges whose endpoints are both placed.
pub fn mapping_edges(
    mappings: &[MappingPair],
    knowledge: &HashMap<NodeId, Vec3>,
    ability: &HashMap<NodeId, Vec3>,
) -> Vec<Edge> {
    mappings
        .iter()
        .filter_map(|m| {
            Some(Edge {
                source: m.knowledge_id.clone(),
                target: m.ability_id.clone(),
                kind: EdgeKind::Mapping,
                source_position: *knowledge.get(&m.knowledge_id)?,
                target_position: *ability.get(&m.ability_id)?,
                weight: m.weight,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tree::{build_tree, NodeStyle};
    use skillgraph_core::{GraphKind, NodeRecord};

    fn positions(ids: &[&str]) -> HashMap<NodeId, Vec3> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| (NodeId::from(*id), Vec3::new(i as f32, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn hierarchy_edges_follow_visible_parent_links() {
        let records: Vec<NodeRecord> = ["DS", "DS01", "DS0101", "DS02"]
            .iter()
            .map(|id| NodeRecord::new(*id, *id))
            .collect();
        let (tree, _) = build_tree(GraphKind::Knowledge, &records, &NodeStyle::default());
        let visible: Vec<NodeId> = ["DS", "DS01", "DS02"].iter().map(|s| NodeId::from(*s)).collect();
        let pos = positions(&["DS", "DS01", "DS02"]);

        let edges = hierarchy_edges(&tree, &visible, &pos);

        let pairs: Vec<(&str, &str)> = edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("DS", "DS01"), ("DS", "DS02")]);
        assert_eq!(edges[0].target_position, pos[&NodeId::from("DS01")]);
    }

    #[test]
    fn mapping_edges_need_both_endpoints_placed() {
        let mappings = vec![
            MappingPair {
                knowledge_id: NodeId::from("DS01"),
                ability_id: NodeId::from("AB01"),
                weight: None,
            },
            MappingPair {
                knowledge_id: NodeId::from("DS0101"),
                ability_id: NodeId::from("AB01"),
                weight: Some(0.3),
            },
        ];
        let k = positions(&["DS", "DS01"]);
        let a = positions(&["AB", "AB01"]);

        let edges = mapping_edges(&mappings, &k, &a);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, NodeId::from("DS01"));
        assert_eq!(edges[0].kind, EdgeKind::Mapping);
        assert_eq!(edges[0].weight, None);
    }

    #[test]
    fn mapping_edges_carry_the_mapping_weight() {
        let mappings = vec![MappingPair {
            knowledge_id: NodeId::from("DS01"),
            ability_id: NodeId::from("AB01"),
            weight: Some(0.75),
        }];
        let k = positions(&["DS", "DS01"]);
        let a = positions(&["AB", "AB01"]);

        let edges = mapping_edges(&mappings, &k, &a);

        assert_eq!(edges[0].weight, Some(0.75));
    }
}
