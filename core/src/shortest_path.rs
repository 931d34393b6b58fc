//! Single-source shortest paths (Dijkstra).
//!
//! Edge lengths must be non-negative. This is not checked; a negative length
//! silently yields wrong distances. A path whose total does not fit in the
//! length type is never recorded, so a vertex reachable only that way reads
//! as unreached.

use crate::error::{GraphError, Result};
use crate::graph::{EdgeLength, Graph, TraversalDirection, Vertex, VertexHandle, VertexId};
use crate::order::{ByKey, Keyed, MinHeap};
use crate::scratch::{Discovered, VertexMap};

/// Best known distance to a vertex and the vertex it was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRecord<L> {
    pub length: L,
    pub previous: Option<VertexHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortestPathOptions {
    /// Stop as soon as the target is finalized instead of exhausting the
    /// frontier.
    pub stop_at_target: bool,
}

impl Default for ShortestPathOptions {
    fn default() -> Self {
        Self {
            stop_at_target: true,
        }
    }
}

/// Shortest-path records kept after a full run from one source.
pub struct ShortestPaths<'g, I, D, L> {
    graph: &'g Graph<I, D, L>,
    source_id: I,
    source: VertexHandle,
    records: VertexMap<PathRecord<L>>,
}

impl<'g, I: VertexId, D, L: EdgeLength> ShortestPaths<'g, I, D, L> {
    pub fn source(&self) -> I {
        self.source_id
    }

    /// Shortest distance from the source, or `None` if `target` was not
    /// reached (or is not in the graph).
    pub fn distance(&self, target: I) -> Option<L> {
        let handle = self.graph.handle_of(target).ok()?;
        self.records.get(handle).map(|r| r.length)
    }

    /// The vertex preceding `target` on its shortest path.
    pub fn predecessor(&self, target: I) -> Option<I> {
        let handle = self.graph.handle_of(target).ok()?;
        let previous = self.records.get(handle)?.previous?;
        self.graph.vertex(previous).map(|v| v.id())
    }

    /// Number of vertices with a recorded distance, the source included.
    pub fn reached(&self) -> usize {
        self.records.len()
    }

    /// Vertices on the shortest path from the source to `target`, each with
    /// its cumulative distance.
    pub fn path_to(&self, target: I) -> Result<Vec<(I, L)>> {
        let mut path = Vec::new();
        self.replay(target, |v, length| path.push((v.id(), length)))?;
        Ok(path)
    }

    /// Walk the path source→`target`, calling `visit` with each vertex and
    /// its cumulative distance. Returns the total length.
    pub fn replay<F>(&self, target: I, visit: F) -> Result<L>
    where
        F: FnMut(&Vertex<I, D>, L),
    {
        let handle = self.graph.handle_of(target)?;
        replay_path(self.graph, &self.records, self.source, handle, visit)
    }
}

/// Core loop. Records every vertex it reaches; with `target` set, returns
/// once that vertex is finalized.
fn dijkstra<I, D, L>(
    graph: &Graph<I, D, L>,
    source: VertexHandle,
    target: Option<VertexHandle>,
    direction: TraversalDirection,
) -> VertexMap<PathRecord<L>>
where
    I: VertexId,
    L: EdgeLength,
{
    let mut records: VertexMap<PathRecord<L>> = VertexMap::with_capacity(graph.vertex_slots());
    let mut finalized = Discovered::for_graph(graph);
    let mut frontier: MinHeap<Keyed<L, VertexHandle>, ByKey> = MinHeap::new();
    let mut stale = 0usize;
    let mut overflowed = 0usize;

    records.insert(
        source,
        PathRecord {
            length: L::default(),
            previous: None,
        },
    );
    frontier.push(Keyed::new(L::default(), source));

    while let Some(Keyed { key: length, value: current }) = frontier.pop() {
        if !finalized.insert(current) {
            stale += 1;
            log::trace!("discarding stale frontier entry {:?} at {:?}", current, length);
            continue;
        }
        if target == Some(current) {
            break;
        }

        for (edge, neighbor, _) in graph.neighbors(current, direction) {
            if finalized.contains(neighbor) {
                continue;
            }
            let Some(candidate) = length.checked_add(&edge.length()) else {
                overflowed += 1;
                log::trace!("path to {:?} through {:?} overflows the length type", neighbor, current);
                continue;
            };
            let improves = match records.get(neighbor) {
                Some(record) => candidate < record.length,
                None => true,
            };
            if improves {
                records.insert(
                    neighbor,
                    PathRecord {
                        length: candidate,
                        previous: Some(current),
                    },
                );
                frontier.push(Keyed::new(candidate, neighbor));
            }
        }
    }

    log::debug!(
        "dijkstra from {:?} ({:?}) reached {} vertices, {} stale entries, {} overflowing paths, {} finalized",
        source,
        direction,
        records.len(),
        stale,
        overflowed,
        finalized.len()
    );
    records
}

/// Follow predecessor links back from `target`, then visit forward.
fn replay_path<I, D, L, F>(
    graph: &Graph<I, D, L>,
    records: &VertexMap<PathRecord<L>>,
    source: VertexHandle,
    target: VertexHandle,
    mut visit: F,
) -> Result<L>
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>, L),
{
    let no_path = || match (graph.vertex(source), graph.vertex(target)) {
        (Some(from), Some(to)) => GraphError::unreachable(&from.id(), &to.id()),
        _ => GraphError::unreachable(&source, &target),
    };

    let total = records.get(target).ok_or_else(no_path)?.length;

    let mut path = vec![target];
    let mut current = target;
    while let Some(previous) = records.get(current).and_then(|r| r.previous) {
        path.push(previous);
        current = previous;
    }

    for &handle in path.iter().rev() {
        let vertex = graph.vertex(handle).ok_or_else(no_path)?;
        let length = records.get(handle).ok_or_else(no_path)?.length;
        visit(vertex, length);
    }

    Ok(total)
}

/// Run Dijkstra from `source` to exhaustion and keep every record.
pub fn shortest_path_tree<I, D, L>(
    graph: &Graph<I, D, L>,
    source: I,
    direction: TraversalDirection,
) -> Result<ShortestPaths<'_, I, D, L>>
where
    I: VertexId,
    L: EdgeLength,
{
    let handle = graph.handle_of(source)?;
    let records = dijkstra(graph, handle, None, direction);
    Ok(ShortestPaths {
        graph,
        source_id: source,
        source: handle,
        records,
    })
}

/// Shortest path from `source` to `target`.
///
/// `visit` is called for every vertex on the path, source first, with its
/// cumulative distance. Returns the total length, or `Unreachable` (without
/// calling `visit`) if no path exists. Records are dropped on return; use
/// [`shortest_path_tree`] to keep them.
pub fn shortest_path<I, D, L, F>(
    graph: &Graph<I, D, L>,
    source: I,
    target: I,
    direction: TraversalDirection,
    options: ShortestPathOptions,
    visit: F,
) -> Result<L>
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>, L),
{
    let from = graph.handle_of(source)?;
    let to = graph.handle_of(target)?;
    let stop = options.stop_at_target.then_some(to);

    let records = dijkstra(graph, from, stop, direction);
    replay_path(graph, &records, from, to, visit)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1→2 (7), 1→3 (9), 1→6 (14), 2→3 (10), 2→4 (15),
    // 3→4 (11), 3→6 (2), 4→5 (6), 5→6 (9)
    fn make_weighted() -> Graph {
        let mut g = Graph::new();
        g.load_edges([
            (1, 2, 7),
            (1, 3, 9),
            (1, 6, 14),
            (2, 3, 10),
            (2, 4, 15),
            (3, 4, 11),
            (3, 6, 2),
            (4, 5, 6),
            (5, 6, 9),
        ])
        .unwrap();
        g
    }

    fn path_ids(
        g: &Graph,
        from: u64,
        to: u64,
        direction: TraversalDirection,
    ) -> Result<(Vec<u64>, Vec<u64>, u64)> {
        let mut ids = Vec::new();
        let mut lengths = Vec::new();
        let total = shortest_path(g, from, to, direction, ShortestPathOptions::default(), |v, len| {
            ids.push(v.id());
            lengths.push(len);
        })?;
        Ok((ids, lengths, total))
    }

    #[test]
    fn test_directed_shortest_path() {
        let g = make_weighted();
        let (ids, lengths, total) = path_ids(&g, 1, 5, TraversalDirection::Outgoing).unwrap();
        assert_eq!(ids, vec![1, 3, 4, 5]);
        assert_eq!(lengths, vec![0, 9, 20, 26]);
        assert_eq!(total, 26);
    }

    #[test]
    fn test_undirected_shortest_path() {
        let g = make_weighted();
        let (ids, lengths, total) = path_ids(&g, 1, 5, TraversalDirection::Both).unwrap();
        assert_eq!(ids, vec![1, 3, 6, 5]);
        assert_eq!(lengths, vec![0, 9, 11, 20]);
        assert_eq!(total, 20);
    }

    #[test]
    fn test_path_prefers_longer_hop_count_when_shorter() {
        // A→B (4), A→C (2), C→B (1), B→D (5), C→D (8)
        let mut g: Graph<char> = Graph::new();
        g.load_edges([('A', 'B', 4), ('A', 'C', 2), ('C', 'B', 1), ('B', 'D', 5), ('C', 'D', 8)])
            .unwrap();
        let mut ids = Vec::new();
        let total = shortest_path(
            &g,
            'A',
            'D',
            TraversalDirection::Outgoing,
            ShortestPathOptions::default(),
            |v, _| ids.push(v.id()),
        )
        .unwrap();
        assert_eq!(ids, vec!['A', 'C', 'B', 'D']);
        assert_eq!(total, 8);
    }

    #[test]
    fn test_source_equals_target() {
        let g = make_weighted();
        let (ids, lengths, total) = path_ids(&g, 4, 4, TraversalDirection::Outgoing).unwrap();
        assert_eq!(ids, vec![4]);
        assert_eq!(lengths, vec![0]);
        assert_eq!(total, 0);
    }

    #[test]
    fn test_unreachable_target_not_visited() {
        let g = make_weighted();
        let mut visited = 0;
        let result = shortest_path(
            &g,
            6,
            1,
            TraversalDirection::Outgoing,
            ShortestPathOptions::default(),
            |_, _| visited += 1,
        );
        assert!(matches!(result, Err(GraphError::Unreachable { .. })));
        assert_eq!(visited, 0);
    }

    #[test]
    fn test_missing_endpoint() {
        let g = make_weighted();
        let result = path_ids(&g, 1, 99, TraversalDirection::Outgoing);
        assert_eq!(result.unwrap_err(), GraphError::NotFound { id: "99".into() });
    }

    #[test]
    fn test_stop_at_target_same_answer() {
        let g = make_weighted();
        let mut full = Vec::new();
        let options = ShortestPathOptions {
            stop_at_target: false,
        };
        let total = shortest_path(&g, 1, 4, TraversalDirection::Outgoing, options, |v, _| {
            full.push(v.id())
        })
        .unwrap();
        let (early, _, early_total) = path_ids(&g, 1, 4, TraversalDirection::Outgoing).unwrap();
        assert_eq!(full, early);
        assert_eq!(total, early_total);
        assert_eq!(total, 20);
    }

    #[test]
    fn test_shortest_path_tree_records() {
        let g = make_weighted();
        let tree = shortest_path_tree(&g, 1, TraversalDirection::Outgoing).unwrap();
        assert_eq!(tree.source(), 1);
        assert_eq!(tree.reached(), 6);
        assert_eq!(tree.distance(1), Some(0));
        assert_eq!(tree.distance(2), Some(7));
        assert_eq!(tree.distance(3), Some(9));
        assert_eq!(tree.distance(6), Some(11));
        assert_eq!(tree.distance(99), None);
        assert_eq!(tree.predecessor(6), Some(3));
        assert_eq!(tree.predecessor(1), None);
        assert_eq!(tree.path_to(5).unwrap(), vec![(1, 0), (3, 9), (4, 20), (5, 26)]);
    }

    #[test]
    fn test_shortest_path_tree_unreached() {
        let mut g = make_weighted();
        g.add_vertex(42, ()).unwrap();
        let tree = shortest_path_tree(&g, 1, TraversalDirection::Both).unwrap();
        assert_eq!(tree.distance(42), None);
        assert!(matches!(tree.path_to(42), Err(GraphError::Unreachable { .. })));
    }

    #[test]
    fn test_zero_length_edges() {
        let mut g = Graph::new();
        g.load_edges([(0, 1, 0), (1, 2, 0), (0, 2, 1)]).unwrap();
        let (ids, _, total) = path_ids(&g, 0, 2, TraversalDirection::Outgoing).unwrap();
        assert_eq!(total, 0);
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_overflowing_path_not_recorded() {
        let half = u64::MAX / 2 + 1;
        let mut g = Graph::new();
        g.load_edges([(0, 1, half), (1, 2, half)]).unwrap();

        let tree = shortest_path_tree(&g, 0, TraversalDirection::Outgoing).unwrap();
        assert_eq!(tree.distance(1), Some(half));
        assert_eq!(tree.distance(2), None);
        assert_eq!(tree.reached(), 2);

        let result = path_ids(&g, 0, 2, TraversalDirection::Outgoing);
        assert!(matches!(result, Err(GraphError::Unreachable { .. })));
    }

    #[test]
    fn test_overflowing_path_falls_back_to_representable_one() {
        let half = u64::MAX / 2 + 1;
        let mut g = Graph::new();
        g.load_edges([(0, 1, half), (1, 2, half), (0, 3, 1), (3, 2, 5)]).unwrap();

        let (ids, _, total) = path_ids(&g, 0, 2, TraversalDirection::Outgoing).unwrap();
        assert_eq!(ids, vec![0, 3, 2]);
        assert_eq!(total, 6);
    }
}
