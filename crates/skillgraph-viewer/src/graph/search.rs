use skillgraph_core::{GraphKind, NodeId, NodeRecord};

use crate::graph::model::GraphTree;
use crate::graph::state::GraphState;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchHit {
    pub graph: GraphKind,
    pub id: NodeId,
}

fn record_matches(record: &NodeRecord, q: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(q);
    hit(record.id.as_str())
        || hit(&record.label)
        || record.description.as_deref().is_some_and(hit)
        || record.tag.as_deref().is_some_and(hit)
}

/// Case-insensitive substring search over id, label, description and tag.
/// Hits are sorted by graph then id and capped at `limit`; a limit of 0 means
/// no cap.
pub fn search_trees<'a>(
    trees: impl IntoIterator<Item = &'a GraphTree>,
    query: &str,
    limit: usize,
) -> Vec<SearchHit> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = trees
        .into_iter()
        .flat_map(|tree| {
            let q = q.as_str();
            tree.nodes
                .values()
                .filter(move |n| record_matches(&n.record, q))
                .map(move |n| SearchHit {
                    graph: tree.kind,
                    id: n.id().clone(),
                })
        })
        .collect();

    hits.sort();
    if limit > 0 {
        hits.truncate(limit);
    }
    hits
}

impl GraphState {
    /// Runs a search and keeps the hits for display. Never touches the expanded set.
    pub fn recompute_search_hits(&mut self, query: &str) -> &[SearchHit] {
        self.ui.search_query = query.to_string();
        self.ui.search_hits = search_trees(
            [&self.knowledge, &self.ability],
            query,
            self.cfg.search_limit,
        );
        tracing::debug!(query, hits = self.ui.search_hits.len(), "search");
        &self.ui.search_hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tree::{build_tree, NodeStyle};

    fn trees() -> (GraphTree, GraphTree) {
        let mut set = NodeRecord::new("DS0101", "Set Theory");
        set.description = Some("Unions and intersections".to_string());
        let mut logic = NodeRecord::new("DS0102", "Logic");
        logic.tag = Some("Foundations".to_string());
        let k = vec![NodeRecord::new("DS01", "Basics"), set, logic];
        let a = vec![NodeRecord::new("AB01", "Reasoning with sets")];
        (
            build_tree(GraphKind::Knowledge, &k, &NodeStyle::default()).0,
            build_tree(GraphKind::Ability, &a, &NodeStyle::default()).0,
        )
    }

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn matches_label_across_both_graphs_case_insensitively() {
        let (k, a) = trees();
        let hits = search_trees([&k, &a], "SET", 10);
        assert_eq!(ids(&hits), vec!["DS0101", "AB01"]);
        assert_eq!(hits[0].graph, GraphKind::Knowledge);
    }

    #[test]
    fn matches_description_tag_and_id() {
        let (k, a) = trees();
        assert_eq!(ids(&search_trees([&k, &a], "intersect", 10)), vec!["DS0101"]);
        assert_eq!(ids(&search_trees([&k, &a], "foundations", 10)), vec!["DS0102"]);
        assert_eq!(ids(&search_trees([&k, &a], "ds010", 10)), vec!["DS0101", "DS0102"]);
    }

    #[test]
    fn blank_query_and_limit() {
        let (k, a) = trees();
        assert!(search_trees([&k, &a], "   ", 10).is_empty());
        assert_eq!(search_trees([&k, &a], "s", 2).len(), 2);
    }

    #[test]
    fn zero_limit_returns_every_hit() {
        let (k, a) = trees();
        let all = search_trees([&k, &a], "s", 0);
        assert!(all.len() > 2);
        assert_eq!(all, search_trees([&k, &a], "s", usize::MAX));
    }
}
