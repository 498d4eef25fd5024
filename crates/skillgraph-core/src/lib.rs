use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which of the two trees a node belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    Knowledge,
    Ability,
}

impl GraphKind {
    pub const ALL: [GraphKind; 2] = [GraphKind::Knowledge, GraphKind::Ability];

    /// Two-character code every ID in this graph starts with.
    pub fn sentinel(self) -> &'static str {
        match self {
            GraphKind::Knowledge => "DS",
            GraphKind::Ability => "AB",
        }
    }

    /// Fixed per-graph salt mixed into the layout seed so the two graphs
    /// never share a jitter stream.
    pub const fn layout_salt(self) -> u64 {
        match self {
            GraphKind::Knowledge => 0x4453_6b6e_6f77_6c65,
            GraphKind::Ability => 0x4142_6162_696c_6974,
        }
    }

    pub fn root_id(self) -> NodeId {
        NodeId(self.sentinel().to_string())
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GraphKind::Knowledge => "Knowledge",
            GraphKind::Ability => "Ability",
        }
    }

    /// Picks the graph from an ID's sentinel prefix (case-insensitive).
    pub fn from_id(id: &str) -> Option<Self> {
        let prefix = id.get(..2)?;
        Self::ALL
            .into_iter()
            .find(|kind| prefix.eq_ignore_ascii_case(kind.sentinel()))
    }
}

/// Hierarchical level of a node, derived from its ID length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Root,
    Chapter,
    Section,
    Subsection,
    Point,
    Detail,
}

/// One spreadsheet row after column mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub label: String,
    pub difficulty: f32,
    pub importance: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: NodeId(id.into()),
            label: label.into(),
            difficulty: 0.5,
            importance: 0.5,
            description: None,
            tag: None,
        }
    }
}

/// Cross-graph link between a knowledge node and an ability node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappingPair {
    pub knowledge_id: NodeId,
    pub ability_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Hierarchy,
    Mapping,
}

/// Node as handed to the scene renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderNode {
    pub id: NodeId,
    pub graph: GraphKind,
    pub level: Level,
    pub position: [f32; 3],
    pub radius: f32,
    pub color: String,
    pub label: String,
    pub is_expanded: bool,
    #[serde(default)]
    pub is_selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub source_position: [f32; 3],
    pub target_position: [f32; 3],
    /// Mapping strength in [0, 1]; hierarchy edges carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

/// Everything the external renderer needs for one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_kind_from_id_prefix() {
        assert_eq!(GraphKind::from_id("DS0101"), Some(GraphKind::Knowledge));
        assert_eq!(GraphKind::from_id("ab01"), Some(GraphKind::Ability));
        assert_eq!(GraphKind::from_id("XY01"), None);
        assert_eq!(GraphKind::from_id("D"), None);
    }

    #[test]
    fn scene_serializes_snake_case_enums() {
        let scene = Scene {
            nodes: vec![RenderNode {
                id: NodeId::from("DS"),
                graph: GraphKind::Knowledge,
                level: Level::Root,
                position: [0.0, 0.0, 0.0],
                radius: 2.0,
                color: "#112233".to_string(),
                label: "Knowledge".to_string(),
                is_expanded: true,
                is_selected: false,
            }],
            edges: Vec::new(),
        };

        let json = serde_json::to_value(&scene).expect("serialize scene");
        assert_eq!(json["nodes"][0]["graph"], "knowledge");
        assert_eq!(json["nodes"][0]["level"], "root");
        assert_eq!(json["nodes"][0]["id"], "DS");
    }

    #[test]
    fn mapping_weight_is_serialized_only_when_present() {
        let edge = |weight| RenderEdge {
            source: NodeId::from("DS01"),
            target: NodeId::from("AB01"),
            kind: EdgeKind::Mapping,
            source_position: [0.0; 3],
            target_position: [1.0, 0.0, 0.0],
            weight,
        };

        let with = serde_json::to_value(edge(Some(0.25))).expect("serialize edge");
        let without = serde_json::to_value(edge(None)).expect("serialize edge");
        assert_eq!(with["weight"], 0.25);
        assert!(without.get("weight").is_none());
    }

    #[test]
    fn layout_salts_are_fixed_and_distinct() {
        assert_eq!(GraphKind::Knowledge.layout_salt(), 0x4453_6b6e_6f77_6c65);
        assert_ne!(GraphKind::Knowledge.layout_salt(), GraphKind::Ability.layout_salt());
    }
}
