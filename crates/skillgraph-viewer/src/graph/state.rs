use glam::Vec3;
use skillgraph_core::{GraphKind, MappingPair, NodeId, RenderEdge, RenderNode, Scene};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::data::Dataset;
use crate::graph::edges::{self, Edge};
use crate::graph::layout::{self, Layout};
use crate::graph::model::GraphTree;
use crate::graph::search::SearchHit;
use crate::graph::tree::{build_tree, BuildReport, NodeStyle};
use crate::graph::visibility::{visible_nodes, ExpandedSet};
use crate::util::config::ViewerConfig;
use crate::util::ids;

#[derive(Debug, Default)]
pub struct SpatialState {
    pub layout: Option<Layout>,
    pub visible_knowledge: Vec<NodeId>,
    pub visible_ability: Vec<NodeId>,
    /// Manual drag offsets layered on top of `layout`.
    pub drag_offsets: HashMap<NodeId, Vec3>,
    pub passes: u64,
}

#[derive(Debug, Default)]
pub struct UiState {
    pub expanded: ExpandedSet,
    pub selected: Option<NodeId>,
    pub search_query: String,
    pub search_hits: Vec<SearchHit>,
}

#[derive(Debug, Default, Clone)]
pub struct LoadReport {
    pub knowledge: BuildReport,
    pub ability: BuildReport,
    pub dropped_mappings: usize,
}

/// One browser-session's worth of graph state.
#[derive(Debug)]
pub struct GraphState {
    pub knowledge: GraphTree,
    pub ability: GraphTree,
    pub mappings: Vec<MappingPair>,
    pub spatial: SpatialState,
    pub ui: UiState,
    pub cfg: ViewerConfig,
    pub report: LoadReport,

    pub needs_relayout: AtomicBool,
}

impl Default for GraphState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl GraphState {
    pub fn new(cfg: ViewerConfig) -> Self {
        let style = node_style(&cfg);
        let mut st = Self {
            knowledge: build_tree(GraphKind::Knowledge, &[], &style).0,
            ability: build_tree(GraphKind::Ability, &[], &style).0,
            mappings: Vec::new(),
            spatial: SpatialState::default(),
            ui: UiState::default(),
            cfg,
            report: LoadReport::default(),
            needs_relayout: AtomicBool::new(true),
        };
        st.reset_expanded();
        st
    }

    /// Replaces all data and resets every piece of session state.
    pub fn load(&mut self, data: Dataset) {
        let style = node_style(&self.cfg);
        let (knowledge, k_report) = build_tree(GraphKind::Knowledge, &data.knowledge, &style);
        let (ability, a_report) = build_tree(GraphKind::Ability, &data.ability, &style);

        let total = data.mappings.len();
        self.mappings = data
            .mappings
            .into_iter()
            .filter_map(|m| normalize_mapping(m, &knowledge, &ability))
            .collect();
        let dropped = total - self.mappings.len();
        if dropped > 0 {
            tracing::warn!(dropped, "mapping rows reference unknown nodes");
        }

        tracing::info!(
            knowledge = knowledge.len(),
            ability = ability.len(),
            mappings = self.mappings.len(),
            rejected = k_report.rejected.len() + a_report.rejected.len(),
            "dataset loaded"
        );

        self.knowledge = knowledge;
        self.ability = ability;
        self.report = LoadReport {
            knowledge: k_report,
            ability: a_report,
            dropped_mappings: dropped,
        };
        self.spatial = SpatialState::default();
        self.ui = UiState::default();
        self.reset_expanded();
        self.recompute();
    }

    fn reset_expanded(&mut self) {
        self.ui.expanded.clear();
        self.ui.expanded.insert(self.knowledge.root.clone());
        self.ui.expanded.insert(self.ability.root.clone());
        self.mark_dirty();
    }

    pub fn tree(&self, kind: GraphKind) -> &GraphTree {
        match kind {
            GraphKind::Knowledge => &self.knowledge,
            GraphKind::Ability => &self.ability,
        }
    }

    pub fn visible(&self, kind: GraphKind) -> &[NodeId] {
        match kind {
            GraphKind::Knowledge => &self.spatial.visible_knowledge,
            GraphKind::Ability => &self.spatial.visible_ability,
        }
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.ui.expanded.contains(id)
    }

    pub(crate) fn mark_dirty(&self) {
        self.needs_relayout.store(true, Ordering::Relaxed);
    }

    pub fn is_dirty(&self) -> bool {
        self.needs_relayout.load(Ordering::Relaxed)
    }

    pub fn recompute_if_dirty(&mut self) -> bool {
        if !self.needs_relayout.swap(false, Ordering::Relaxed) {
            return false;
        }
        self.run_pass();
        true
    }

    /// Visibility, layout and drag reconciliation in one go.
    pub fn recompute(&mut self) {
        self.needs_relayout.store(false, Ordering::Relaxed);
        self.run_pass();
    }

    fn run_pass(&mut self) {
        let vis_k = visible_nodes(&self.knowledge, &self.ui.expanded);
        let vis_a = visible_nodes(&self.ability, &self.ui.expanded);
        let layout = layout::layout_all(
            (&self.knowledge, &vis_k),
            (&self.ability, &vis_a),
            &self.cfg.layout_config(),
        );

        self.reconcile_drag(&vis_k, &vis_a);
        self.spatial.visible_knowledge = vis_k;
        self.spatial.visible_ability = vis_a;
        self.spatial.layout = Some(layout);
        self.spatial.passes += 1;
        tracing::debug!(
            pass = self.spatial.passes,
            knowledge = self.spatial.visible_knowledge.len(),
            ability = self.spatial.visible_ability.len(),
            offsets = self.spatial.drag_offsets.len(),
            "layout pass"
        );
    }

    /// Offsets of hidden nodes are dropped. A node that just became visible
    /// under a dragged parent inherits the parent's offset.
    fn reconcile_drag(&mut self, vis_k: &[NodeId], vis_a: &[NodeId]) {
        if self.spatial.drag_offsets.is_empty() {
            return;
        }
        let mut kept: HashMap<NodeId, Vec3> = HashMap::new();
        for (tree, vis) in [(&self.knowledge, vis_k), (&self.ability, vis_a)] {
            for id in vis {
                let offset = self.spatial.drag_offsets.get(id).copied().or_else(|| {
                    tree.parent_of(id).and_then(|p| kept.get(p).copied())
                });
                if let Some(offset) = offset {
                    kept.insert(id.clone(), offset);
                }
            }
        }
        self.spatial.drag_offsets = kept;
    }

    /// Layout position plus any manual drag offset.
    pub fn effective_position(&self, kind: GraphKind, id: &NodeId) -> Option<Vec3> {
        let base = self.spatial.layout.as_ref()?.position(kind, id)?;
        let offset = self
            .spatial
            .drag_offsets
            .get(id)
            .copied()
            .unwrap_or(Vec3::ZERO);
        Some(base + offset)
    }

    pub fn effective_positions(&self, kind: GraphKind) -> HashMap<NodeId, Vec3> {
        self.visible(kind)
            .iter()
            .filter_map(|id| Some((id.clone(), self.effective_position(kind, id)?)))
            .collect()
    }

    pub fn edges(&self) -> Vec<Edge> {
        let k_pos = self.effective_positions(GraphKind::Knowledge);
        let a_pos = self.effective_positions(GraphKind::Ability);
        let mut out = edges::hierarchy_edges(&self.knowledge, self.visible(GraphKind::Knowledge), &k_pos);
        out.extend(edges::hierarchy_edges(
            &self.ability,
            self.visible(GraphKind::Ability),
            &a_pos,
        ));
        if self.cfg.show_mapping_edges {
            out.extend(edges::mapping_edges(&self.mappings, &k_pos, &a_pos));
        }
        out
    }

    /// Render contract for the external scene renderer.
    pub fn scene(&self) -> Scene {
        let mut nodes = Vec::new();
        for kind in GraphKind::ALL {
            let tree = self.tree(kind);
            for id in self.visible(kind) {
                let (Some(node), Some(pos)) = (tree.get(id), self.effective_position(kind, id))
                else {
                    continue;
                };
                nodes.push(RenderNode {
                    id: id.clone(),
                    graph: kind,
                    level: node.level(),
                    position: pos.to_array(),
                    radius: node.size,
                    color: node.color.to_hex(),
                    label: node.record.label.clone(),
                    is_expanded: self.is_expanded(id),
                    is_selected: self.ui.selected.as_ref() == Some(id),
                });
            }
        }

        let edges = self
            .edges()
            .into_iter()
            .map(|e| RenderEdge {
                source: e.source,
                target: e.target,
                kind: e.kind,
                source_position: e.source_position.to_array(),
                target_position: e.target_position.to_array(),
                weight: e.weight,
            })
            .collect();

        Scene { nodes, edges }
    }
}

fn node_style(cfg: &ViewerConfig) -> NodeStyle {
    NodeStyle {
        size_min: cfg.node_size_min,
        size_max: cfg.node_size_max,
    }
}

fn normalize_mapping(
    m: MappingPair,
    knowledge: &GraphTree,
    ability: &GraphTree,
) -> Option<MappingPair> {
    let k = ids::normalize_id(GraphKind::Knowledge, m.knowledge_id.as_str()).ok()?;
    let a = ids::normalize_id(GraphKind::Ability, m.ability_id.as_str()).ok()?;
    if !knowledge.contains(&k) || !ability.contains(&a) {
        tracing::debug!(knowledge = %k, ability = %a, "dropping mapping to unknown node");
        return None;
    }
    Some(MappingPair {
        knowledge_id: k,
        ability_id: a,
        weight: m.weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgraph_core::{EdgeKind, NodeRecord};

    fn recs(ids: &[&str]) -> Vec<NodeRecord> {
        ids.iter().map(|id| NodeRecord::new(*id, *id)).collect()
    }

    fn dataset() -> Dataset {
        Dataset {
            knowledge: recs(&["DS", "DS01", "DS0101", "DS02"]),
            ability: recs(&["AB", "AB01"]),
            mappings: vec![
                MappingPair {
                    knowledge_id: NodeId::from("ds01"),
                    ability_id: NodeId::from("AB01"),
                    weight: None,
                },
                MappingPair {
                    knowledge_id: NodeId::from("DS99"),
                    ability_id: NodeId::from("AB01"),
                    weight: None,
                },
            ],
        }
    }

    #[test]
    fn load_starts_with_both_roots_expanded() {
        let mut st = GraphState::default();
        st.load(dataset());

        assert!(st.is_expanded(&NodeId::from("DS")));
        assert!(st.is_expanded(&NodeId::from("AB")));
        assert_eq!(st.visible(GraphKind::Knowledge).len(), 3);
        assert_eq!(st.visible(GraphKind::Ability).len(), 2);
        assert!(!st.is_dirty());
        assert_eq!(st.report.dropped_mappings, 1);
    }

    #[test]
    fn scene_contains_hierarchy_and_mapping_edges() {
        let mut st = GraphState::default();
        st.load(dataset());

        let scene = st.scene();
        assert_eq!(scene.nodes.len(), 5);
        let mapping: Vec<_> = scene
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Mapping)
            .collect();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping[0].source, NodeId::from("DS01"));
        assert_eq!(scene.edges.len(), 4);
    }

    #[test]
    fn mapping_weight_reaches_the_rendered_edge() {
        let mut data = dataset();
        data.mappings[0].weight = Some(0.4);
        let mut st = GraphState::default();
        st.load(data);

        let scene = st.scene();
        let mapping = scene
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::Mapping)
            .expect("mapping edge");
        assert_eq!(mapping.weight, Some(0.4));
        assert!(scene
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Hierarchy)
            .all(|e| e.weight.is_none()));
    }

    #[test]
    fn mapping_edges_can_be_hidden() {
        let mut st = GraphState::new(ViewerConfig {
            show_mapping_edges: false,
            ..ViewerConfig::default()
        });
        st.load(dataset());
        assert!(st.edges().iter().all(|e| e.kind == EdgeKind::Hierarchy));
    }

    #[test]
    fn empty_state_still_renders_two_roots() {
        let mut st = GraphState::default();
        st.recompute();
        let scene = st.scene();
        assert_eq!(scene.nodes.len(), 2);
        assert!(scene.edges.is_empty());
    }
}
