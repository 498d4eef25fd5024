use skillgraph_core::{GraphKind, Level, NodeId};
use smallvec::SmallVec;

/// Width of one hierarchy segment in an ID.
pub const SEGMENT: usize = 2;

/// Ancestor chains are short (five levels in practice).
pub type AncestorChain = SmallVec<[NodeId; 6]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdProblem {
    Empty,
    OddLength,
    NonAlphanumeric,
    WrongSentinel,
}

impl IdProblem {
    pub fn describe(self) -> &'static str {
        match self {
            IdProblem::Empty => "empty id",
            IdProblem::OddLength => "odd length",
            IdProblem::NonAlphanumeric => "non-alphanumeric characters",
            IdProblem::WrongSentinel => "does not start with the graph sentinel",
        }
    }
}

/// Trims and upper-cases a raw cell value, then checks it against the
/// encoding for `kind`.
pub fn normalize_id(kind: GraphKind, raw: &str) -> Result<NodeId, IdProblem> {
    let id = raw.trim().to_ascii_uppercase();
    if id.is_empty() {
        return Err(IdProblem::Empty);
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(IdProblem::NonAlphanumeric);
    }
    if id.len() % SEGMENT != 0 {
        return Err(IdProblem::OddLength);
    }
    if !id.starts_with(kind.sentinel()) {
        return Err(IdProblem::WrongSentinel);
    }
    Ok(NodeId(id))
}

/// Number of segments below the sentinel. The sentinel itself is depth 0.
pub fn depth_of(id: &str) -> usize {
    (id.len() / SEGMENT).saturating_sub(1)
}

pub fn level_of(id: &str) -> Level {
    match depth_of(id) {
        0 => Level::Root,
        1 => Level::Chapter,
        2 => Level::Section,
        3 => Level::Subsection,
        4 => Level::Point,
        _ => Level::Detail,
    }
}

/// Direct parent by prefix stripping. `None` for the sentinel itself.
pub fn parent_id(kind: GraphKind, id: &str) -> Option<NodeId> {
    if id.len() <= SEGMENT {
        return None;
    }
    let stripped = &id[..id.len() - SEGMENT];
    if stripped.len() < SEGMENT {
        return Some(kind.root_id());
    }
    Some(NodeId(stripped.to_string()))
}

/// Proper ancestors of `id`, nearest first, ending at the sentinel.
pub fn ancestors(kind: GraphKind, id: &str) -> AncestorChain {
    let mut out = AncestorChain::new();
    let mut cur = parent_id(kind, id);
    while let Some(p) = cur {
        cur = parent_id(kind, &p.0);
        out.push(p);
    }
    out
}

/// `id` lies in the subtree rooted at `root` (inclusive).
pub fn in_subtree(root: &str, id: &str) -> bool {
    id.starts_with(root)
}
