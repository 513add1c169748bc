//! Read-only surface consumed by the knowledge-graph store.
//!
//! The store itself lives elsewhere. What it needs per record is a stable
//! node id, labels for the node, and one labelled edge per related anime.
//! [`NodeLinkGraph`] assembles those into a node-link document for export.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::AnimeId;
use crate::models::AnimeRecord;

/// Resolved titles usable as node labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeLabels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official: Option<String>,
}

/// Directed relation between two anime, labelled with the relation kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: AnimeId,
    pub target: AnimeId,
    pub kind: String,
}

/// Anything that can become a node in the relation graph.
pub trait GraphEntity {
    fn node_id(&self) -> AnimeId;

    fn labels(&self) -> NodeLabels;

    /// Outgoing edges, in source order.
    fn edges(&self) -> Vec<GraphEdge>;
}

impl GraphEntity for AnimeRecord {
    fn node_id(&self) -> AnimeId {
        self.id
    }

    fn labels(&self) -> NodeLabels {
        NodeLabels {
            main: self.main_title().map(str::to_string),
            official: self.official_title().map(str::to_string),
        }
    }

    fn edges(&self) -> Vec<GraphEdge> {
        self.relations
            .iter()
            .map(|link| GraphEdge {
                source: self.id,
                target: link.id,
                kind: link.kind.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: AnimeId,
    #[serde(flatten)]
    pub labels: NodeLabels,
}

/// Node-link document of a directed graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
}

impl NodeLinkGraph {
    /// Builds the graph spanned by `entities`.
    ///
    /// Each id appears once among the nodes, ordered by id. Targets that were
    /// not themselves supplied still get a node, just without labels. When an
    /// id is supplied twice, the first entity's labels are kept.
    pub fn from_entities<'a, E, I>(entities: I) -> Self
    where
        E: GraphEntity + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut nodes: BTreeMap<AnimeId, NodeLabels> = BTreeMap::new();
        let mut links = Vec::new();

        for entity in entities {
            nodes.entry(entity.node_id()).or_insert_with(|| entity.labels());
            links.extend(entity.edges());
        }
        for link in &links {
            nodes.entry(link.target).or_default();
        }

        Self {
            directed: true,
            nodes: nodes
                .into_iter()
                .map(|(id, labels)| GraphNode { id, labels })
                .collect(),
            links,
        }
    }

    #[must_use]
    pub fn from_records(records: &[AnimeRecord]) -> Self {
        Self::from_entities(records)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEIKAI: &str = r#"
        <anime id="1">
            <titles>
                <title xml:lang="x-jat" type="main">Seikai no Monshou</title>
                <title xml:lang="en" type="official">Crest of the Stars</title>
            </titles>
            <relatedanime>
                <anime id="4" type="Sequel">Seikai no Senki</anime>
                <anime id="6" type="Summary">Seikai no Monshou Tokubetsuhen</anime>
            </relatedanime>
        </anime>
    "#;

    const SENKI: &str = r#"
        <anime id="4">
            <titles><title xml:lang="x-jat" type="main">Seikai no Senki</title></titles>
            <relatedanime><anime id="1" type="Prequel">Seikai no Monshou</anime></relatedanime>
        </anime>
    "#;

    #[test]
    fn test_record_surface() {
        let record = AnimeRecord::from_xml(SEIKAI).unwrap();

        assert_eq!(record.node_id(), AnimeId::new(1));
        let labels = record.labels();
        assert_eq!(labels.main.as_deref(), Some("Seikai no Monshou"));
        assert_eq!(labels.official.as_deref(), Some("Crest of the Stars"));

        let edges = record.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].target, AnimeId::new(4));
        assert_eq!(edges[0].kind, "Sequel");
        assert_eq!(edges[1].kind, "Summary");
    }

    #[test]
    fn test_node_link_graph() {
        let records = vec![
            AnimeRecord::from_xml(SEIKAI).unwrap(),
            AnimeRecord::from_xml(SENKI).unwrap(),
        ];
        let graph = NodeLinkGraph::from_records(&records);

        assert!(graph.directed);
        let ids: Vec<_> = graph.nodes.iter().map(|node| node.id.value()).collect();
        assert_eq!(ids, vec![1, 4, 6]);
        assert_eq!(graph.links.len(), 3);

        let summary = graph.nodes.iter().find(|node| node.id == AnimeId::new(6)).unwrap();
        assert_eq!(summary.labels, NodeLabels::default());

        let json = graph.to_json().unwrap();
        assert!(json.contains("\"directed\": true"));
        assert!(json.contains("Crest of the Stars"));
    }
}
