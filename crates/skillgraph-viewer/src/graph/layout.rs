//! Weighted radial subdivision.
//!
//! Every visible node owns an angular slice of its parent's span. Slices are
//! proportional to the total number of descendants, hidden ones included, so
//! a sibling keeps its angle when a neighbour is expanded or collapsed. Children sit on a ring whose radius grows with hop depth and
//! is pushed outward when siblings are crowded. Each graph is laid out around
//! its own origin and then moved into its own region.

use glam::Vec3;
use skillgraph_core::{GraphKind, NodeId};
use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

use crate::graph::jitter::JitterRng;
use crate::graph::model::GraphTree;
use crate::util::config::{LayoutMode, RadiusCurve, ViewerConfig};

/// Upper bound on jitter as a fraction of the nominal slice or radius.
pub const MAX_JITTER: f32 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub base_radius: f32,
    pub radius_curve: RadiusCurve,
    pub shrink: f32,
    pub min_arc_spacing: f32,
    pub max_density: f32,
    pub jitter: f32,
    pub seed: u64,
    pub graph_gap: f32,
    pub plane_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        ViewerConfig::default().layout_config()
    }
}

impl LayoutConfig {
    fn shrink_factor(&self) -> f32 {
        if self.shrink.is_finite() {
            self.shrink.clamp(0.05, 0.999)
        } else {
            0.9
        }
    }

    fn jitter_fraction(&self) -> f32 {
        if self.jitter.is_finite() {
            self.jitter.clamp(0.0, MAX_JITTER)
        } else {
            0.0
        }
    }

    fn base(&self) -> f32 {
        if self.base_radius.is_finite() && self.base_radius > 0.0 {
            self.base_radius
        } else {
            12.0
        }
    }
}

/// Angular interval `[start, end)` in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub start: f32,
    pub end: f32,
}

impl Slice {
    pub const FULL: Slice = Slice {
        start: 0.0,
        end: TAU,
    };

    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    pub fn mid(&self) -> f32 {
        (self.start + self.end) * 0.5
    }

    pub fn shrink(&self, k: f32) -> Slice {
        let half = self.width() * k * 0.5;
        let mid = self.mid();
        Slice {
            start: mid - half,
            end: mid + half,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Slice allotted by the parent.
    pub slice: Slice,
    /// Span handed down to this node's own children.
    pub span: Slice,
    pub ring: f32,
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphLayout {
    pub kind: GraphKind,
    pub center: Vec3,
    pub extent: f32,
    pub nodes: HashMap<NodeId, Placement>,
}

impl GraphLayout {
    pub fn position(&self, id: &NodeId) -> Option<Vec3> {
        self.nodes.get(id).map(|p| p.position)
    }

    fn translate(&mut self, delta: Vec3) {
        self.center += delta;
        for p in self.nodes.values_mut() {
            p.position += delta;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub knowledge: GraphLayout,
    pub ability: GraphLayout,
}

impl Layout {
    pub fn graph(&self, kind: GraphKind) -> &GraphLayout {
        match kind {
            GraphKind::Knowledge => &self.knowledge,
            GraphKind::Ability => &self.ability,
        }
    }

    pub fn position(&self, kind: GraphKind, id: &NodeId) -> Option<Vec3> {
        self.graph(kind).position(id)
    }
}

/// Lays out both graphs and moves them into disjoint regions.
pub fn layout_all(
    knowledge: (&GraphTree, &[NodeId]),
    ability: (&GraphTree, &[NodeId]),
    cfg: &LayoutConfig,
) -> Layout {
    let mut k = layout_graph(knowledge.0, knowledge.1, cfg);
    let mut a = layout_graph(ability.0, ability.1, cfg);

    match cfg.mode {
        LayoutMode::Flat2d => {
            let gap = cfg.graph_gap.max(0.0) * 0.5;
            k.translate(Vec3::new(-(k.extent + gap), 0.0, 0.0));
            a.translate(Vec3::new(a.extent + gap, 0.0, 0.0));
        }
        LayoutMode::Planes3d => {
            a.translate(Vec3::new(0.0, 0.0, cfg.plane_spacing.max(1.0)));
        }
    }

    Layout {
        knowledge: k,
        ability: a,
    }
}

/// Lays out one graph around the origin. Nodes in `visible` that are not in
/// `tree` are ignored.
pub fn layout_graph(tree: &GraphTree, visible: &[NodeId], cfg: &LayoutConfig) -> GraphLayout {
    let vis: HashSet<&NodeId> = visible.iter().filter(|id| tree.contains(id)).collect();
    let seed = cfg.seed ^ tree.kind.layout_salt();
    let mut pass = Pass {
        tree,
        vis: &vis,
        cfg,
        base: cfg.base(),
        shrink: cfg.shrink_factor(),
        jitter: cfg.jitter_fraction(),
        rng: JitterRng::new(seed),
        out: HashMap::new(),
    };

    pass.out.insert(
        tree.root.clone(),
        Placement {
            position: Vec3::ZERO,
            slice: Slice::FULL,
            span: Slice::FULL,
            ring: 0.0,
            angle: 0.0,
        },
    );
    pass.place_children(&tree.root, Slice::FULL, 0.0, 0);

    let extent = pass
        .out
        .iter()
        .map(|(id, p)| p.position.length() + tree.get(id).map(|n| n.size).unwrap_or(0.0))
        .fold(0.0f32, f32::max);

    GraphLayout {
        kind: tree.kind,
        center: Vec3::ZERO,
        extent,
        nodes: pass.out,
    }
}

struct Pass<'a> {
    tree: &'a GraphTree,
    vis: &'a HashSet<&'a NodeId>,
    cfg: &'a LayoutConfig,
    base: f32,
    shrink: f32,
    jitter: f32,
    rng: JitterRng,
    out: HashMap<NodeId, Placement>,
}

impl<'a> Pass<'a> {
    fn visible_children(&self, id: &NodeId) -> Vec<&'a NodeId> {
        self.tree
            .children(id)
            .iter()
            .filter(|c| self.vis.contains(c))
            .collect()
    }

    fn place_children(&mut self, id: &NodeId, span: Slice, parent_ring: f32, depth: usize) {
        let kids = self.visible_children(id);
        if kids.is_empty() {
            return;
        }

        let tree = self.tree;
        let weight = |c: &NodeId| tree.descendant_count(c).max(1) as f32;
        let total: f32 = kids.iter().map(|c| weight(c)).sum();
        let span_w = span.width();

        let nominal = self.base * self.cfg.radius_curve.apply(depth + 1);
        let crowding =
            self.cfg.min_arc_spacing * kids.len() as f32 / (nominal * span_w).max(f32::EPSILON);
        let density = crowding.clamp(1.0, self.cfg.max_density.max(1.0));
        let ring = (nominal * density).max(parent_ring + self.base * 0.5);

        let mut cursor = span.start;
        let last = kids.len() - 1;
        for (i, kid) in kids.iter().enumerate() {
            let end = if i == last {
                span.end
            } else {
                cursor + span_w * weight(kid) / total
            };
            let slice = Slice { start: cursor, end };
            cursor = end;

            let (angle, r) = if self.jitter > 0.0 {
                let da = self.rng.signed_unit() * self.jitter * slice.width() * 0.5;
                let dr = self.rng.signed_unit() * self.jitter;
                (slice.mid() + da, ring * (1.0 + dr))
            } else {
                (slice.mid(), ring)
            };

            let child_span = slice.shrink(self.shrink);
            self.out.insert(
                (*kid).clone(),
                Placement {
                    position: Vec3::new(r * angle.cos(), r * angle.sin(), 0.0),
                    slice,
                    span: child_span,
                    ring,
                    angle,
                },
            );
            self.place_children(kid, child_span, ring, depth + 1);
        }
    }
}
