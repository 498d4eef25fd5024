use glam::Vec3;
use skillgraph_core::NodeId;

use crate::data::Dataset;
use crate::graph::interaction::InteractionError;

#[derive(Debug, Clone)]
pub enum Interaction {
    Toggle(NodeId),
    SetExpanded(NodeId, bool),
    Drag { id: NodeId, position: Vec3 },
    Search(String),
    Select(NodeId),
    ClearSelection,
    ResetDrag,
    Reload(Box<Dataset>),
}

/// Non-fatal problem reported back to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
}

impl From<InteractionError> for Notice {
    fn from(e: InteractionError) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PumpOutcome {
    pub applied: usize,
    pub notices: Vec<Notice>,
    pub recomputed: bool,
}
