use super::*;

use crate::graph::VectorGraph;

//-----------------------------------------------------------------------------

// Lengths 200, 50, 300; the middle edge is below the length threshold.
fn fixture() -> (VectorGraph, FrameBarcodeIndex, PathContainer, PathId) {
    let graph = VectorGraph::from_lengths(&[200, 50, 300]);
    let mut index = FrameBarcodeIndex::with_frame_size(10);
    index.initial_fill(&graph);

    // Barcode 0 is seen on both long edges of the path.
    index.insert_barcode(0, 0, 3, 10..50).unwrap();
    index.insert_barcode(4, 0, 4, 20..80).unwrap();
    // Barcode 1 only on the short edge, which is never queried.
    index.insert_barcode(2, 1, 100, 0..10).unwrap();
    // Barcode 2 appears beyond the remaining window of the last edge.
    index.insert_barcode(4, 2, 9, 160..200).unwrap();
    // Barcode 3 stays below the accumulated read threshold.
    index.insert_barcode(0, 3, 4, 0..30).unwrap();

    let mut paths = PathContainer::new();
    let path = paths.create(&graph, &[0, 2, 4]);
    (graph, index, paths, path)
}

fn entry_of(set: &[BarcodeId]) -> SimpleVertexEntry {
    set.iter().copied().collect()
}

//-----------------------------------------------------------------------------

#[test]
fn vertex_conjugation() {
    let graph = VectorGraph::from_lengths(&[200, 50]);

    let edge_vertex = ScaffoldVertex::Edge(2);
    assert_eq!(edge_vertex.conjugate(&graph), ScaffoldVertex::Edge(3), "Invalid edge vertex conjugate");
    assert_eq!(
        edge_vertex.conjugate(&graph).conjugate(&graph), edge_vertex,
        "Conjugation is not an involution for edge vertices"
    );

    let path_vertex = ScaffoldVertex::Path(4);
    assert_eq!(path_vertex.conjugate(&graph), ScaffoldVertex::Path(5), "Invalid path vertex conjugate");
    assert_eq!(
        path_vertex.conjugate(&graph).conjugate(&graph), path_vertex,
        "Conjugation is not an involution for path vertices"
    );
}

//-----------------------------------------------------------------------------

#[test]
fn extract_edge_vertex() {
    let (graph, index, paths, _) = fixture();
    let extractor = FrameBarcodeIndexInfoExtractor::new(&index, &graph);
    let extractor = ScaffoldVertexEntryExtractor::new(&graph, extractor, &paths, 400, 1, 100);

    let entry = extractor.extract_entry(ScaffoldVertex::Edge(0));
    assert_eq!(entry, entry_of(&[0, 3]), "Invalid entry for an edge vertex");

    // An edge missing from the index yields an empty entry.
    let entry = extractor.extract_entry(ScaffoldVertex::Edge(99));
    assert!(entry.is_empty(), "Extracted barcodes for an unindexed edge");
}

#[test]
fn extract_path_vertex() {
    let (graph, index, paths, path) = fixture();
    let extractor = FrameBarcodeIndexInfoExtractor::new(&index, &graph);
    let extractor = ScaffoldVertexEntryExtractor::new(&graph, extractor, &paths, 400, 1, 100);

    // The sweep queries the 400 bp window of the first edge and the
    // remaining 150 bp window of the last edge; the 50 bp edge between them
    // only consumes window. Barcode 0 accumulates 3 + 4 = 7 reads; barcode 1
    // is on the skipped edge, barcode 2 outside the remaining window, and
    // barcode 3 below the accumulated threshold.
    let entry = extractor.extract_entry(ScaffoldVertex::Path(path));
    assert_eq!(entry, entry_of(&[0]), "Invalid entry for a path vertex");

    // Extraction is pure.
    let again = extractor.extract_entry(ScaffoldVertex::Path(path));
    assert_eq!(again, entry, "Repeated extraction returned a different entry");

    // A stale path handle yields an empty entry.
    let entry = extractor.extract_entry(ScaffoldVertex::Path(99));
    assert!(entry.is_empty(), "Extracted barcodes for an unknown path");
}

#[test]
fn sweep_stops_at_the_window_end() {
    let (graph, index, paths, path) = fixture();
    let extractor = FrameBarcodeIndexInfoExtractor::new(&index, &graph);

    // A 150 bp window ends within the first edge, so no barcode accumulates
    // enough reads.
    let extractor = ScaffoldVertexEntryExtractor::new(&graph, extractor, &paths, 150, 1, 100);
    let entry = extractor.extract_entry(ScaffoldVertex::Path(path));
    assert!(entry.is_empty(), "The sweep did not stop at the window end");
}

//-----------------------------------------------------------------------------

#[test]
fn vertex_index_insert_and_get() {
    let mut index = ScaffoldVertexIndex::new();
    assert!(index.is_empty(), "Fresh index is not empty");

    let vertex = ScaffoldVertex::Edge(0);
    index.insert(vertex, entry_of(&[1, 2]));
    index.insert(vertex, entry_of(&[3]));
    assert_eq!(index.len(), 1, "Reinsertion did not replace the entry");
    assert_eq!(*index.get_entry(vertex).unwrap(), entry_of(&[3]), "Invalid entry after reinsertion");

    let missing = index.get_entry(ScaffoldVertex::Edge(1));
    assert!(
        matches!(missing, Err(Error::VertexNotIndexed)),
        "Unexpected result for a missing vertex: {:?}", missing
    );
}

#[test]
fn build_vertex_index() {
    let (graph, index, paths, path) = fixture();
    let barcode_extractor = FrameBarcodeIndexInfoExtractor::new(&index, &graph);
    let entry_extractor = ScaffoldVertexEntryExtractor::new(&graph, barcode_extractor, &paths, 400, 1, 100);

    let vertices = vec![
        ScaffoldVertex::Edge(0),
        ScaffoldVertex::Edge(4),
        ScaffoldVertex::Path(path),
    ];
    let builder = ScaffoldVertexIndexBuilder::new(entry_extractor, 2);
    let vertex_index = builder.build(vertices.iter().copied());

    assert_eq!(vertex_index.len(), 3, "Invalid number of indexed vertices");
    assert_eq!(
        *vertex_index.get_entry(ScaffoldVertex::Edge(0)).unwrap(),
        entry_of(&[0, 3]),
        "Invalid entry for an edge vertex"
    );
    assert_eq!(
        *vertex_index.get_entry(ScaffoldVertex::Path(path)).unwrap(),
        entry_of(&[0]),
        "Invalid entry for the path vertex"
    );
}

#[test]
fn build_with_the_convenience_wrapper() {
    let (graph, index, paths, path) = fixture();
    let vertices = vec![ScaffoldVertex::Edge(0), ScaffoldVertex::Path(path)];

    let vertex_index =
        construct_scaffold_vertex_index(&graph, &index, &paths, 400, 1, 100, 1, vertices.iter().copied());
    assert_eq!(vertex_index.len(), 2, "Invalid number of indexed vertices");
    assert_eq!(
        *vertex_index.get_entry(ScaffoldVertex::Path(path)).unwrap(),
        entry_of(&[0]),
        "Invalid entry for the path vertex"
    );
}

//-----------------------------------------------------------------------------
