use glam::Vec3;
use skillgraph_core::{GraphKind, NodeId};

use crate::graph::state::GraphState;
use crate::util::ids;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InteractionError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {0} is not currently visible")]
    NotVisible(NodeId),
    #[error("invalid position {position:?} for node {id}")]
    InvalidPosition { id: NodeId, position: [f32; 3] },
}

impl GraphState {
    fn resolve(&self, id: &NodeId) -> Result<GraphKind, InteractionError> {
        GraphKind::from_id(id.as_str())
            .filter(|kind| self.tree(*kind).contains(id))
            .ok_or_else(|| InteractionError::UnknownNode(id.clone()))
    }

    /// Flips `id` in the expanded set. Returns whether it is now expanded.
    pub fn toggle_expand(&mut self, id: &NodeId) -> Result<bool, InteractionError> {
        self.resolve(id)?;
        let now_expanded = if self.ui.expanded.remove(id) {
            false
        } else {
            self.ui.expanded.insert(id.clone());
            true
        };
        tracing::debug!(id = %id, expanded = now_expanded, "toggle");
        self.mark_dirty();
        Ok(now_expanded)
    }

    pub fn set_expanded(&mut self, id: &NodeId, expanded: bool) -> Result<(), InteractionError> {
        if self.is_expanded(id) != expanded {
            self.toggle_expand(id)?;
        } else {
            self.resolve(id)?;
        }
        Ok(())
    }

    /// Moves `id` and its visible subtree by the same delta. Takes effect
    /// immediately without a layout pass.
    pub fn drag(&mut self, id: &NodeId, position: Vec3) -> Result<(), InteractionError> {
        let kind = self.resolve(id)?;
        if !position.is_finite() {
            return Err(InteractionError::InvalidPosition {
                id: id.clone(),
                position: position.to_array(),
            });
        }
        let current = self
            .effective_position(kind, id)
            .ok_or_else(|| InteractionError::NotVisible(id.clone()))?;
        let delta = position - current;

        let moved: Vec<NodeId> = self
            .visible(kind)
            .iter()
            .filter(|other| ids::in_subtree(id.as_str(), other.as_str()))
            .cloned()
            .collect();
        for other in &moved {
            *self
                .spatial
                .drag_offsets
                .entry(other.clone())
                .or_insert(Vec3::ZERO) += delta;
        }
        tracing::trace!(id = %id, moved = moved.len(), "drag");
        Ok(())
    }

    /// Discards every manual drag offset.
    pub fn reset_drag(&mut self) {
        self.spatial.drag_offsets.clear();
    }

    /// Expands every ancestor of `id` so it becomes visible, and selects it.
    /// The node itself is left as it was.
    pub fn select(&mut self, id: &NodeId) -> Result<(), InteractionError> {
        let kind = self.resolve(id)?;
        let tree = self.tree(kind);
        let path: Vec<NodeId> = ids::ancestors(kind, id.as_str())
            .into_iter()
            .filter(|a| tree.contains(a))
            .collect();
        for a in path {
            self.ui.expanded.insert(a);
        }
        self.ui.selected = Some(id.clone());
        self.mark_dirty();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.ui.selected = None;
    }
}
