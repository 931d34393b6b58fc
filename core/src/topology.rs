//! Topological ordering and strongly connected components.
//!
//! Both build on the inverse-topological depth-first search: a vertex is
//! visited only after every neighbor reachable from it has been discovered,
//! so visits come out sinks first.

use std::collections::HashMap;

use crate::error::Result;
use crate::graph::{EdgeLength, Graph, TraversalDirection, Vertex, VertexHandle, VertexId};
use crate::scratch::Discovered;
use crate::traversal::{depth_first_from, SearchOptions};

/// Which end of a topological order to start visiting from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Sources first: every edge points from an earlier to a later vertex.
    #[default]
    Forward,
    /// Sinks first.
    Reverse,
}

/// Inverse-topological walk from an already resolved root.
///
/// The stack holds each open vertex with its remaining neighbor iterator.
/// The top vertex either discovers and pushes its next undiscovered neighbor
/// or, once none is left, is visited and popped.
fn inverse_topological_from<I, D, L, F>(
    graph: &Graph<I, D, L>,
    root: VertexHandle,
    direction: TraversalDirection,
    discovered: &mut Discovered,
    mut visit: F,
) -> usize
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>),
{
    if !discovered.insert(root) {
        return 0;
    }

    let mut visited = 0;
    let mut stack = vec![(root, graph.neighbors(root, direction))];

    while let Some((current, neighbors)) = stack.last_mut() {
        let current = *current;
        let next = neighbors
            .find(|&(_, n, _)| !discovered.contains(n))
            .map(|(_, n, _)| n);

        match next {
            Some(neighbor) => {
                discovered.insert(neighbor);
                stack.push((neighbor, graph.neighbors(neighbor, direction)));
            }
            None => {
                stack.pop();
                if let Some(vertex) = graph.vertex(current) {
                    visit(vertex);
                    visited += 1;
                }
            }
        }
    }

    visited
}

/// Depth-first search from `root` visiting vertices in inverse-topological
/// order: each vertex is visited after all of its undiscovered neighbors in
/// `direction`.
///
/// On a graph with cycles this still terminates and visits every reachable
/// vertex once; the order is then a finishing order, not a topological one.
pub fn inverse_topological_search<I, D, L, F>(
    graph: &Graph<I, D, L>,
    root: I,
    direction: TraversalDirection,
    discovered: &mut Discovered,
    options: SearchOptions,
    visit: F,
) -> Result<usize>
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>),
{
    let handle = graph.handle_of(root)?;
    let visited = inverse_topological_from(graph, handle, direction, discovered, visit);
    if options.clear_discovered {
        discovered.clear();
    }
    Ok(visited)
}

/// Finishing order over the whole graph: an inverse-topological walk started
/// from every vertex not yet discovered, in enumeration order.
fn finishing_order<I, D, L>(graph: &Graph<I, D, L>, direction: TraversalDirection) -> Vec<VertexHandle>
where
    I: VertexId,
    L: EdgeLength,
{
    let mut discovered = Discovered::for_graph(graph);
    let mut finished = Vec::with_capacity(graph.vertex_count());

    for vertex in graph.vertices() {
        if !discovered.contains(vertex.handle()) {
            inverse_topological_from(graph, vertex.handle(), direction, &mut discovered, |v| {
                finished.push(v.handle())
            });
        }
    }

    finished
}

/// Visit every vertex of a directed graph in topological order (or its
/// reverse). Returns the number of vertices visited.
///
/// The graph must be acyclic for the result to be a topological order.
/// Cycles are not detected: the call still terminates and visits every
/// vertex once, in an order that violates some edges.
pub fn topological_sort<I, D, L, F>(graph: &Graph<I, D, L>, order: SortOrder, mut visit: F) -> usize
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>),
{
    let mut sorted = finishing_order(graph, TraversalDirection::Outgoing);
    if order == SortOrder::Forward {
        sorted.reverse();
    }

    for &handle in &sorted {
        if let Some(vertex) = graph.vertex(handle) {
            visit(vertex);
        }
    }

    log::debug!("topological sort ({:?}) over {} vertices", order, sorted.len());
    sorted.len()
}

/// Vertex ids in topological order.
pub fn topological_order<I, D, L>(graph: &Graph<I, D, L>) -> Vec<I>
where
    I: VertexId,
    L: EdgeLength,
{
    let mut ids = Vec::with_capacity(graph.vertex_count());
    topological_sort(graph, SortOrder::Forward, |v| ids.push(v.id()));
    ids
}

/// Whether `order` lists vertices so that no edge points from a vertex to
/// one listed before it. Edges with an endpoint missing from `order` are
/// ignored.
pub fn is_topological_order<I, D, L>(graph: &Graph<I, D, L>, order: &[I]) -> bool
where
    I: VertexId,
    L: EdgeLength,
{
    let position: HashMap<I, usize> = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    graph.edges().all(|e| match (position.get(&e.from()), position.get(&e.to())) {
        (Some(from), Some(to)) => from <= to,
        _ => true,
    })
}

/// Kosaraju's algorithm: call `visit(vertex, scc_id)` for every vertex, where
/// `scc_id` is the id of the vertex that rooted its component's pass.
/// Returns the number of components.
///
/// The first pass orders vertices by finishing time over the transposed
/// graph; read latest-finished first, that puts the members of sink
/// components of the graph itself ahead of everything that reaches them.
/// The second pass runs a directed search from each vertex in that order
/// without clearing discoveries, so each search stays inside one component.
pub fn visit_strongly_connected_components<I, D, L, F>(graph: &Graph<I, D, L>, mut visit: F) -> usize
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>, I),
{
    let mut order = finishing_order(graph, TraversalDirection::Incoming);
    order.reverse();

    let mut discovered = Discovered::for_graph(graph);
    let mut components = 0;

    for handle in order {
        if discovered.contains(handle) {
            continue;
        }
        let Some(root) = graph.vertex(handle) else {
            continue;
        };
        let scc_id = root.id();
        depth_first_from(graph, handle, TraversalDirection::Outgoing, &mut discovered, |v| {
            visit(v, scc_id)
        });
        components += 1;
    }

    log::debug!(
        "kosaraju found {} components over {} vertices",
        components,
        graph.vertex_count()
    );
    components
}

/// Map from vertex id to the id of its strongly connected component.
pub fn strongly_connected_components<I, D, L>(graph: &Graph<I, D, L>) -> HashMap<I, I>
where
    I: VertexId,
    L: EdgeLength,
{
    let mut components = HashMap::with_capacity(graph.vertex_count());
    visit_strongly_connected_components(graph, |v, scc| {
        components.insert(v.id(), scc);
    });
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_dag() -> Graph {
        let mut g = Graph::new();
        for i in 0..10 {
            g.add_vertex(i, ()).unwrap();
        }
        for (from, to) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 4), (2, 5), (2, 6), (6, 7), (7, 8), (8, 9)] {
            g.add_edge(from, to, 1).unwrap();
        }
        g
    }

    fn graph_from(edges: &[(u64, u64)]) -> Graph {
        let mut g = Graph::new();
        g.load_edges(edges.iter().map(|&(a, b)| (a, b, 1))).unwrap();
        g
    }

    fn groups(components: &HashMap<u64, u64>) -> HashSet<Vec<u64>> {
        let mut by_root: HashMap<u64, Vec<u64>> = HashMap::new();
        for (&v, &root) in components {
            by_root.entry(root).or_default().push(v);
        }
        by_root
            .into_values()
            .map(|mut members| {
                members.sort();
                members
            })
            .collect()
    }

    // --- Topological sort ---

    #[test]
    fn test_topological_order_dag() {
        let g = make_dag();
        let order = topological_order(&g);
        assert_eq!(order.len(), 10);
        assert!(is_topological_order(&g, &order));

        let reversed: Vec<u64> = order.iter().rev().copied().collect();
        assert!(!is_topological_order(&g, &reversed));
    }

    #[test]
    fn test_topological_sort_reverse_visits_sinks_first() {
        let g = make_dag();
        let mut reverse = Vec::new();
        let n = topological_sort(&g, SortOrder::Reverse, |v| reverse.push(v.id()));
        assert_eq!(n, 10);
        assert_eq!(*reverse.last().unwrap(), 0);
        reverse.reverse();
        assert_eq!(reverse, topological_order(&g));
    }

    #[test]
    fn test_topological_sort_covers_all_components() {
        // Two disjoint chains, the second added first
        let g = graph_from(&[(10, 11), (11, 12), (0, 1), (1, 2)]);
        let order = topological_order(&g);
        assert_eq!(order.len(), 6);
        assert!(is_topological_order(&g, &order));
    }

    #[test]
    fn test_topological_sort_diamond_visits_once() {
        // 0→1, 0→2, 2→1: the shared sink must not be emitted twice
        let g = graph_from(&[(0, 1), (0, 2), (2, 1)]);
        let order = topological_order(&g);
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn test_topological_sort_empty_graph() {
        let g: Graph = Graph::new();
        assert!(topological_order(&g).is_empty());
        assert!(is_topological_order(&g, &[]));
    }

    #[test]
    fn test_topological_sort_cycle_terminates() {
        let g = graph_from(&[(0, 1), (1, 2), (2, 0)]);
        let order = topological_order(&g);
        assert_eq!(order.len(), 3);
        assert!(!is_topological_order(&g, &order));
    }

    #[test]
    fn test_is_topological_order_ignores_unlisted() {
        let g = graph_from(&[(0, 1), (1, 2)]);
        assert!(is_topological_order(&g, &[0, 2]));
        assert!(!is_topological_order(&g, &[2, 0, 1]));
    }

    #[test]
    fn test_inverse_topological_search_from_root() {
        let g = make_dag();
        let mut discovered = Discovered::for_graph(&g);
        let mut visited = Vec::new();
        let n = inverse_topological_search(
            &g,
            6,
            TraversalDirection::Outgoing,
            &mut discovered,
            SearchOptions::default(),
            |v| visited.push(v.id()),
        )
        .unwrap();
        assert_eq!(n, 4);
        assert_eq!(visited, vec![9, 8, 7, 6]);
        assert!(discovered.is_empty());
    }

    #[test]
    fn test_inverse_topological_search_chained() {
        let g = make_dag();
        let mut discovered = Discovered::for_graph(&g);
        let run = |root, discovered: &mut Discovered| {
            let mut visited = Vec::new();
            let n = inverse_topological_search(
                &g,
                root,
                TraversalDirection::Outgoing,
                discovered,
                SearchOptions::chained(),
                |v| visited.push(v.id()),
            )
            .unwrap();
            assert_eq!(n, visited.len());
            visited
        };

        assert_eq!(run(2, &mut discovered), vec![5, 9, 8, 7, 6, 2]);
        assert_eq!(discovered.len(), 6);

        // Second pass skips everything the first one reached
        assert_eq!(run(0, &mut discovered), vec![4, 1, 3, 0]);
        assert_eq!(discovered.len(), 10);

        assert!(run(6, &mut discovered).is_empty());
    }

    #[test]
    fn test_inverse_topological_search_missing_root() {
        let g = make_dag();
        let mut discovered = Discovered::new();
        let result = inverse_topological_search(
            &g,
            77,
            TraversalDirection::Outgoing,
            &mut discovered,
            SearchOptions::default(),
            |_| {},
        );
        assert!(result.is_err());
    }

    // --- Kosaraju ---

    #[test]
    fn test_scc_dag_all_singletons() {
        let g = make_dag();
        let mut count = 0;
        let components = visit_strongly_connected_components(&g, |v, scc| {
            assert_eq!(v.id(), scc);
            count += 1;
        });
        assert_eq!(components, 10);
        assert_eq!(count, 10);
    }

    #[test]
    fn test_scc_two_cycles_with_bridge() {
        // {1,2,3} → {4,5}
        let g = graph_from(&[(1, 2), (2, 3), (3, 1), (4, 5), (5, 4), (3, 4)]);
        let components = strongly_connected_components(&g);
        let expected: HashSet<Vec<u64>> = [vec![1, 2, 3], vec![4, 5]].into_iter().collect();
        assert_eq!(groups(&components), expected);
    }

    #[test]
    fn test_scc_back_edge_finishing_first() {
        // 0↔1 plus 0→2. A finishing order over the untransposed graph can close 1
        // before 2; the components must still separate.
        let g = graph_from(&[(0, 1), (1, 0), (0, 2)]);
        let components = strongly_connected_components(&g);
        let expected: HashSet<Vec<u64>> = [vec![0, 1], vec![2]].into_iter().collect();
        assert_eq!(groups(&components), expected);
    }

    #[test]
    fn test_scc_single_cycle() {
        let g = graph_from(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let components = strongly_connected_components(&g);
        assert_eq!(groups(&components).len(), 1);
    }

    #[test]
    fn test_scc_isolated_and_self_loop() {
        let mut g = graph_from(&[(0, 0)]);
        g.add_vertex(1, ()).unwrap();
        let components = strongly_connected_components(&g);
        assert_eq!(components[&0], 0);
        assert_eq!(components[&1], 1);
    }
}
