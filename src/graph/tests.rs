use super::*;

//-----------------------------------------------------------------------------

#[test]
fn empty_graph() {
    let graph = VectorGraph::from_lengths(&[]);
    assert_eq!(graph.edge_count(), 0, "Invalid edge count for an empty graph");
    assert!(graph.edge_iter().next().is_none(), "Non-empty iterator for an empty graph");
}

#[test]
fn lengths_and_ids() {
    let lengths = [100, 250, 30];
    let graph = VectorGraph::from_lengths(&lengths);
    assert_eq!(graph.edge_count(), 2 * lengths.len(), "Invalid oriented edge count");

    for (pair, len) in lengths.iter().enumerate() {
        let forward = 2 * pair;
        let reverse = 2 * pair + 1;
        assert_eq!(graph.length(forward), *len, "Invalid length for edge {}", forward);
        assert_eq!(graph.length(reverse), *len, "Invalid length for edge {}", reverse);
        assert_eq!(graph.int_id(forward), forward as u64, "Invalid int id for edge {}", forward);
    }
}

#[test]
fn conjugate_is_an_involution() {
    let graph = VectorGraph::from_lengths(&[100, 250, 30]);
    for edge in graph.edge_iter() {
        let conjugate = graph.conjugate(edge);
        assert_ne!(conjugate, edge, "Edge {} is its own conjugate", edge);
        assert_eq!(graph.conjugate(conjugate), edge, "Conjugation is not an involution for edge {}", edge);
        assert_eq!(graph.length(conjugate), graph.length(edge), "Conjugate of edge {} has a different length", edge);
    }
}

#[test]
fn edge_iter_covers_all_edges() {
    let graph = VectorGraph::from_lengths(&[100, 250]);
    let edges: Vec<EdgeId> = graph.edge_iter().collect();
    assert_eq!(edges, vec![0, 1, 2, 3], "Invalid oriented edge list");
}

//-----------------------------------------------------------------------------
