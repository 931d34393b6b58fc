//! Minimum spanning trees over the undirected view of a graph.
//!
//! Both builders treat every edge as undirected and expect a connected graph.
//! Disconnected input is reported as `DisconnectedGraph` after the visitor has
//! seen whatever partial tree was built. A total length past the length
//! type's maximum stops the build with `LengthOverflow`.

use crate::error::{GraphError, Result};
use crate::graph::{Edge, EdgeHandle, EdgeLength, Graph, TraversalDirection, VertexHandle, VertexId};
use crate::order::{ByKey, Keyed, MinHeap};
use crate::scratch::{Discovered, VertexMap};

/// Summary of an accepted spanning tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanningTree<L> {
    pub edge_count: usize,
    pub total_length: L,
}

impl<L: EdgeLength> SpanningTree<L> {
    fn accept(&mut self, length: L) -> Result<()> {
        self.total_length = self
            .total_length
            .checked_add(&length)
            .ok_or(GraphError::LengthOverflow {
                accepted: self.edge_count,
            })?;
        self.edge_count += 1;
        Ok(())
    }
}

fn check_complete<L>(tree: SpanningTree<L>, vertex_count: usize) -> Result<SpanningTree<L>> {
    let required = vertex_count.saturating_sub(1);
    if tree.edge_count < required {
        return Err(GraphError::DisconnectedGraph {
            accepted: tree.edge_count,
            required,
        });
    }
    Ok(tree)
}

/// Prim's algorithm from the first vertex in enumeration order.
///
/// Keeps a heap of boundary edges keyed by length. An edge whose endpoints
/// are both in the tree by the time it surfaces is discarded.
pub fn minimum_spanning_tree_prim<I, D, L, F>(graph: &Graph<I, D, L>, mut visit: F) -> Result<SpanningTree<L>>
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Edge<I, L>),
{
    let mut tree = SpanningTree::default();
    let Some(start) = graph.vertices().next().map(|v| v.handle()) else {
        return Ok(tree);
    };

    let mut discovered = Discovered::for_graph(graph);
    let mut boundary: MinHeap<Keyed<L, EdgeHandle>, ByKey> = MinHeap::new();

    let grow = |vertex: VertexHandle,
                discovered: &mut Discovered,
                boundary: &mut MinHeap<Keyed<L, EdgeHandle>, ByKey>| {
        discovered.insert(vertex);
        for (edge, far, _) in graph.neighbors(vertex, TraversalDirection::Both) {
            if !discovered.contains(far) {
                boundary.push(Keyed::new(edge.length(), edge.handle()));
            }
        }
    };

    grow(start, &mut discovered, &mut boundary);

    while let Some(Keyed { value: handle, .. }) = boundary.pop() {
        let Some(edge) = graph.edge(handle) else {
            continue;
        };
        let far = match (
            discovered.contains(edge.from_handle()),
            discovered.contains(edge.to_handle()),
        ) {
            (true, false) => edge.to_handle(),
            (false, true) => edge.from_handle(),
            _ => {
                log::trace!("prim skips {:?}: both endpoints in tree", handle);
                continue;
            }
        };

        tree.accept(edge.length())?;
        visit(edge);
        grow(far, &mut discovered, &mut boundary);
    }

    log::debug!(
        "prim accepted {} edges over {} vertices, total {:?}",
        tree.edge_count,
        graph.vertex_count(),
        tree.total_length
    );
    check_complete(tree, graph.vertex_count())
}

/// Union-find over vertex handles with path compression and union by size.
struct DisjointSets {
    parent: VertexMap<VertexHandle>,
    size: VertexMap<usize>,
}

impl DisjointSets {
    fn new<I: VertexId, D, L: EdgeLength>(graph: &Graph<I, D, L>) -> Self {
        let mut parent = VertexMap::with_capacity(graph.vertex_slots());
        let mut size = VertexMap::with_capacity(graph.vertex_slots());
        for vertex in graph.vertices() {
            parent.insert(vertex.handle(), vertex.handle());
            size.insert(vertex.handle(), 1);
        }
        Self { parent, size }
    }

    fn leader(&mut self, vertex: VertexHandle) -> VertexHandle {
        let mut root = vertex;
        while let Some(&parent) = self.parent.get(root) {
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = vertex;
        while current != root {
            match self.parent.insert(current, root) {
                Some(next) => current = next,
                None => break,
            }
        }
        root
    }

    /// Merge the sets of `a` and `b`. Returns false if they were already one.
    fn union(&mut self, a: VertexHandle, b: VertexHandle) -> bool {
        let (a, b) = (self.leader(a), self.leader(b));
        if a == b {
            return false;
        }
        let size_a = self.size.get(a).copied().unwrap_or(1);
        let size_b = self.size.get(b).copied().unwrap_or(1);
        let (big, small) = if size_a >= size_b { (a, b) } else { (b, a) };
        self.parent.insert(small, big);
        self.size.insert(big, size_a + size_b);
        true
    }
}

/// Kruskal's algorithm: every edge goes into one heap keyed by length; an
/// edge is accepted when its endpoints have different leaders. Stops after
/// `vertex_count - 1` acceptances.
pub fn minimum_spanning_tree_kruskal<I, D, L, F>(graph: &Graph<I, D, L>, mut visit: F) -> Result<SpanningTree<L>>
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Edge<I, L>),
{
    let mut tree = SpanningTree::default();
    let required = graph.vertex_count().saturating_sub(1);
    if required == 0 {
        return Ok(tree);
    }

    let mut sets = DisjointSets::new(graph);
    let mut edges: MinHeap<Keyed<L, EdgeHandle>, ByKey> = graph
        .edges()
        .map(|e| Keyed::new(e.length(), e.handle()))
        .collect();

    while tree.edge_count < required {
        let Some(Keyed { value: handle, .. }) = edges.pop() else {
            break;
        };
        let Some(edge) = graph.edge(handle) else {
            continue;
        };
        if sets.union(edge.from_handle(), edge.to_handle()) {
            tree.accept(edge.length())?;
            visit(edge);
        } else {
            log::trace!("kruskal rejects {:?}: closes a cycle", handle);
        }
    }

    log::debug!(
        "kruskal accepted {} of {} edges, total {:?}",
        tree.edge_count,
        required,
        tree.total_length
    );
    check_complete(tree, graph.vertex_count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(edges: &[(u64, u64, u64)]) -> Graph {
        let mut g = Graph::new();
        g.load_edges(edges.iter().copied()).unwrap();
        g
    }

    fn triangle() -> Graph {
        graph_from(&[(0, 1, 1), (1, 2, 2), (0, 2, 3)])
    }

    fn rectangle() -> Graph {
        graph_from(&[(0, 1, 1), (1, 2, 1), (1, 3, 1), (2, 3, 2), (0, 3, 2)])
    }

    fn pentagon() -> Graph {
        graph_from(&[
            (0, 1, 2),
            (0, 2, 1),
            (0, 3, 3),
            (0, 4, 1),
            (1, 2, 2),
            (1, 3, 1),
            (1, 4, 1),
            (2, 3, 3),
            (2, 4, 2),
            (3, 4, 2),
        ])
    }

    fn both(g: &Graph) -> (SpanningTree<u64>, SpanningTree<u64>) {
        let mut prim_sum = 0;
        let prim = minimum_spanning_tree_prim(g, |e| prim_sum += e.length()).unwrap();
        assert_eq!(prim.total_length, prim_sum);

        let mut kruskal_sum = 0;
        let kruskal = minimum_spanning_tree_kruskal(g, |e| kruskal_sum += e.length()).unwrap();
        assert_eq!(kruskal.total_length, kruskal_sum);
        (prim, kruskal)
    }

    #[test]
    fn test_triangle() {
        let g = triangle();
        let (prim, kruskal) = both(&g);
        assert_eq!(prim, SpanningTree { edge_count: 2, total_length: 3 });
        assert_eq!(kruskal, prim);
    }

    #[test]
    fn test_rectangle() {
        let g = rectangle();
        let (prim, kruskal) = both(&g);
        assert_eq!(prim.total_length, 3);
        assert_eq!(prim.edge_count, 3);
        assert_eq!(kruskal.total_length, 3);
        assert_eq!(kruskal.edge_count, 3);
    }

    #[test]
    fn test_pentagon() {
        let g = pentagon();
        let (prim, kruskal) = both(&g);
        assert_eq!(prim.total_length, 4);
        assert_eq!(prim.edge_count, g.vertex_count() - 1);
        assert_eq!(kruskal.total_length, 4);
        assert_eq!(kruskal.edge_count, g.vertex_count() - 1);
    }

    #[test]
    fn test_edge_direction_ignored() {
        // Every edge points at 0; the tree still spans via incoming edges
        let g = graph_from(&[(1, 0, 5), (2, 0, 1), (3, 0, 2), (2, 1, 1)]);
        let (prim, kruskal) = both(&g);
        assert_eq!(prim.total_length, 4);
        assert_eq!(kruskal.total_length, 4);
    }

    #[test]
    fn test_self_loop_and_parallel_edges() {
        let g = graph_from(&[(0, 0, 0), (0, 1, 7), (0, 1, 2), (1, 2, 3)]);
        let mut prim_edges = Vec::new();
        let prim = minimum_spanning_tree_prim(&g, |e| prim_edges.push((e.from(), e.to()))).unwrap();
        assert_eq!(prim.total_length, 5);
        assert!(!prim_edges.contains(&(0, 0)));

        let (_, kruskal) = both(&g);
        assert_eq!(kruskal.total_length, 5);
    }

    #[test]
    fn test_disconnected_reported() {
        let g = graph_from(&[(0, 1, 1), (2, 3, 1)]);

        let mut seen = 0;
        let err = minimum_spanning_tree_prim(&g, |_| seen += 1).unwrap_err();
        assert_eq!(err, GraphError::DisconnectedGraph { accepted: 1, required: 3 });
        assert_eq!(seen, 1);

        let err = minimum_spanning_tree_kruskal(&g, |_| {}).unwrap_err();
        assert_eq!(err, GraphError::DisconnectedGraph { accepted: 2, required: 3 });
    }

    #[test]
    fn test_empty_and_single_vertex() {
        let empty: Graph = Graph::new();
        let (prim, kruskal) = both(&empty);
        assert_eq!(prim, SpanningTree::default());
        assert_eq!(kruskal, SpanningTree::default());

        let mut single: Graph = Graph::new();
        single.add_vertex(7, ()).unwrap();
        let (prim, kruskal) = both(&single);
        assert_eq!(prim.edge_count, 0);
        assert_eq!(kruskal.edge_count, 0);
    }

    #[test]
    fn test_after_vertex_removal() {
        let mut g = pentagon();
        g.remove_vertex(4).unwrap();
        // Remaining: 0-1 (2), 0-2 (1), 0-3 (3), 1-2 (2), 1-3 (1), 2-3 (3)
        let (prim, kruskal) = both(&g);
        assert_eq!(prim.total_length, 4);
        assert_eq!(kruskal.total_length, 4);
        assert_eq!(prim.edge_count, 3);
    }

    #[test]
    fn test_total_length_overflow_reported() {
        let half = u64::MAX / 2 + 1;
        let g = graph_from(&[(0, 1, half), (1, 2, half)]);

        let mut seen = 0;
        let err = minimum_spanning_tree_prim(&g, |_| seen += 1).unwrap_err();
        assert_eq!(err, GraphError::LengthOverflow { accepted: 1 });
        assert_eq!(seen, 1);

        let err = minimum_spanning_tree_kruskal(&g, |_| {}).unwrap_err();
        assert_eq!(err, GraphError::LengthOverflow { accepted: 1 });
    }

    #[test]
    fn test_large_lengths_within_range() {
        let g = graph_from(&[(0, 1, u64::MAX - 1), (1, 2, 1), (0, 2, u64::MAX)]);
        let (prim, kruskal) = both(&g);
        assert_eq!(prim.total_length, u64::MAX);
        assert_eq!(kruskal.total_length, u64::MAX);
    }

    #[test]
    fn test_disjoint_sets() {
        let g = graph_from(&[(0, 1, 1), (2, 3, 1)]);
        let h = |id| g.handle_of(id).unwrap();
        let mut sets = DisjointSets::new(&g);
        assert!(sets.union(h(0), h(1)));
        assert!(sets.union(h(2), h(3)));
        assert!(!sets.union(h(1), h(0)));
        assert_ne!(sets.leader(h(0)), sets.leader(h(3)));
        assert!(sets.union(h(1), h(3)));
        assert_eq!(sets.leader(h(0)), sets.leader(h(2)));
    }
}
