use super::*;

use crate::graph::VectorGraph;
use crate::path::flip_path;
use crate::support::EdgeId;

//-----------------------------------------------------------------------------

// Three single-edge paths and their conjugates.
fn fixture() -> (VectorGraph, PathContainer, [PathId; 3]) {
    let graph = VectorGraph::from_lengths(&[100, 150, 200]);
    let mut paths = PathContainer::new();
    let a = paths.create(&graph, &[0]);
    let b = paths.create(&graph, &[2]);
    let c = paths.create(&graph, &[4]);
    (graph, paths, [a, b, c])
}

fn path_vertex(id: PathId) -> ScaffoldVertex {
    ScaffoldVertex::Path(id)
}

fn total_path_length(paths: &PathContainer) -> usize {
    paths.iter().map(|path| path.length()).sum()
}

//-----------------------------------------------------------------------------

#[test]
fn merge_univocal_chain() {
    let (graph, mut paths, [a, b, c]) = fixture();
    let length_before = total_path_length(&paths);

    let edges = vec![
        ScaffoldEdge::new(path_vertex(a), path_vertex(b), 10),
        ScaffoldEdge::new(path_vertex(b), path_vertex(c), 20),
        ScaffoldEdge::new(path_vertex(flip_path(c)), path_vertex(flip_path(b)), 10),
        ScaffoldEdge::new(path_vertex(flip_path(b)), path_vertex(flip_path(a)), 20),
    ];

    let scaffolder = PathScaffolder::new(&graph);
    scaffolder.merge_univocal_edges(&mut paths, &edges).unwrap();

    // The chain collapses into the path of its first vertex.
    let merged: Vec<EdgeId> = paths.path(a).iter().copied().collect();
    assert_eq!(merged, vec![0, 2, 4], "Invalid merged path");
    assert_eq!(paths.path(a).gap_before(1), 10, "Invalid gap before the second path");
    assert_eq!(paths.path(a).gap_before(2), 20, "Invalid gap before the third path");

    // The conjugate chain collapses symmetrically.
    let merged: Vec<EdgeId> = paths.path(flip_path(c)).iter().copied().collect();
    assert_eq!(merged, vec![5, 3, 1], "Invalid merged conjugate path");

    for id in [b, c, flip_path(a), flip_path(b)] {
        assert!(paths.path(id).is_empty(), "Path {} was not cleared", id);
    }

    // Merging preserves total length, counting the gaps as added length.
    let gaps = 10 + 20 + 10 + 20;
    assert_eq!(total_path_length(&paths), length_before + gaps, "Total path length was not preserved");
}

#[test]
fn merge_single_connection() {
    let (graph, mut paths, [a, b, _]) = fixture();

    let edges = vec![
        ScaffoldEdge::new(path_vertex(a), path_vertex(b), 30),
        ScaffoldEdge::new(path_vertex(flip_path(b)), path_vertex(flip_path(a)), 30),
    ];

    let scaffolder = PathScaffolder::new(&graph);
    scaffolder.merge_univocal_edges(&mut paths, &edges).unwrap();

    assert_eq!(paths.path(a).size(), 2, "The forward chain was not merged");
    assert_eq!(paths.path(a).length(), 100 + 30 + 150, "Invalid merged length");
    assert_eq!(paths.path(flip_path(b)).size(), 2, "The conjugate chain was not merged");
    assert!(paths.path(b).is_empty(), "The absorbed path was not cleared");
    assert!(paths.path(flip_path(a)).is_empty(), "The absorbed conjugate was not cleared");
}

#[test]
fn merge_nothing() {
    let (graph, mut paths, _) = fixture();
    let before = paths.clone();

    let scaffolder = PathScaffolder::new(&graph);
    scaffolder.merge_univocal_edges(&mut paths, &[]).unwrap();
    assert_eq!(paths, before, "Merging no connections changed the paths");
}

#[test]
fn ambiguous_merge() {
    let (graph, mut paths, [a, b, c]) = fixture();
    let before = paths.clone();

    // Two connections share the start vertex.
    let edges = vec![
        ScaffoldEdge::new(path_vertex(a), path_vertex(b), 10),
        ScaffoldEdge::new(path_vertex(a), path_vertex(c), 10),
    ];

    let scaffolder = PathScaffolder::new(&graph);
    let result = scaffolder.merge_univocal_edges(&mut paths, &edges);
    assert!(
        matches!(result, Err(Error::AmbiguousMerge)),
        "Merged connections with a duplicated start: {:?}", result
    );
    assert_eq!(paths, before, "A failed merge modified the paths");
}

#[test]
fn broken_conjugate_symmetry() {
    let (graph, mut paths, [a, b, _]) = fixture();
    let before = paths.clone();

    // The mirror connection is missing.
    let edges = vec![ScaffoldEdge::new(path_vertex(a), path_vertex(b), 10)];

    let scaffolder = PathScaffolder::new(&graph);
    let result = scaffolder.merge_univocal_edges(&mut paths, &edges);
    assert!(
        matches!(result, Err(Error::BrokenConjugateSymmetry)),
        "Merged connections without conjugate closure: {:?}", result
    );
    assert_eq!(paths, before, "A failed merge modified the paths");
}

#[test]
fn mismatched_conjugate_target() {
    let (graph, mut paths, [a, b, c]) = fixture();
    let before = paths.clone();

    // The conjugate of the end vertex connects to the wrong target.
    let edges = vec![
        ScaffoldEdge::new(path_vertex(a), path_vertex(b), 10),
        ScaffoldEdge::new(path_vertex(flip_path(b)), path_vertex(flip_path(c)), 10),
    ];

    let scaffolder = PathScaffolder::new(&graph);
    let result = scaffolder.merge_univocal_edges(&mut paths, &edges);
    assert!(
        matches!(result, Err(Error::BrokenConjugateSymmetry)),
        "Merged connections with a mismatched mirror: {:?}", result
    );
    assert_eq!(paths, before, "A failed merge modified the paths");
}

#[test]
fn empty_start_path_is_skipped() {
    let (graph, mut paths, [a, b, _]) = fixture();
    paths.clear(a);
    paths.clear(flip_path(a));

    let edges = vec![
        ScaffoldEdge::new(path_vertex(a), path_vertex(b), 10),
        ScaffoldEdge::new(path_vertex(flip_path(b)), path_vertex(flip_path(a)), 10),
    ];

    let scaffolder = PathScaffolder::new(&graph);
    scaffolder.merge_univocal_edges(&mut paths, &edges).unwrap();

    // The forward chain starts from an empty path and is skipped; the
    // conjugate chain still absorbs its (empty) successor.
    assert!(paths.path(a).is_empty(), "The empty start gained steps");
    assert_eq!(paths.path(b).size(), 1, "A chain with an empty start was merged");
    assert_eq!(paths.path(flip_path(b)).size(), 1, "The conjugate chain lost its path");
}

//-----------------------------------------------------------------------------
